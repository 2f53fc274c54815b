use crate::error::{Result, VersionError};
use crate::git::{HeadState, Repository, TagRef};
use git2::Oid;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// Mock repository for testing without actual git operations.
///
/// Commits form an explicit graph: each commit stores its parents, first
/// parent first. Commit ids are generated from a counter unless given.
pub struct MockRepository {
    parents: HashMap<Oid, Vec<Oid>>,
    times: HashMap<Oid, i64>,
    head: Option<HeadState>,
    remote_branches: Vec<(String, String, Oid)>,
    tags: RefCell<Vec<TagRef>>,
    dirty: bool,
    untracked: bool,
    fail_tag_creation: Option<String>,
    next_id: u64,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            parents: HashMap::new(),
            times: HashMap::new(),
            head: None,
            remote_branches: Vec::new(),
            tags: RefCell::new(Vec::new()),
            dirty: false,
            untracked: false,
            fail_tag_creation: None,
            next_id: 1,
        }
    }

    /// Add a commit with a generated id
    pub fn commit(&mut self, parents: &[Oid]) -> Oid {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&self.next_id.to_be_bytes());
        self.next_id += 1;
        // 20 bytes is always a valid oid
        let oid = Oid::from_bytes(&bytes).unwrap_or_else(|_| Oid::zero());
        self.add_commit(oid, parents);
        oid
    }

    /// Add a commit with a chosen id
    pub fn add_commit(&mut self, oid: Oid, parents: &[Oid]) {
        let time = self.parents.len() as i64 * 60;
        self.parents.insert(oid, parents.to_vec());
        self.times.insert(oid, time);
    }

    /// Add `count` commits on top of `base`, each the first parent of the
    /// next. Returns the new tip.
    pub fn linear(&mut self, base: Oid, count: usize) -> Oid {
        let mut tip = base;
        for _ in 0..count {
            tip = self.commit(&[tip]);
        }
        tip
    }

    /// Point HEAD at `oid` on a local branch
    pub fn checkout(&mut self, branch: impl Into<String>, oid: Oid) {
        self.head = Some(HeadState {
            oid,
            branch: Some(branch.into()),
        });
    }

    /// Point HEAD at `oid` without a branch
    pub fn detach(&mut self, oid: Oid) {
        self.head = Some(HeadState { oid, branch: None });
    }

    /// Add a remote-tracking branch `remote/name`
    pub fn add_remote_branch(&mut self, remote: &str, name: &str, oid: Oid) {
        self.remote_branches
            .push((remote.to_string(), name.to_string(), oid));
    }

    /// Add a tag pointing to a commit. Duplicate names are allowed so that
    /// broken tag listings can be simulated.
    pub fn add_tag(&mut self, name: impl Into<String>, oid: Oid) {
        let time = self.times.get(&oid).copied().unwrap_or_default();
        self.add_tag_at(name, oid, time);
    }

    /// Add a tag with an explicit timestamp
    pub fn add_tag_at(&mut self, name: impl Into<String>, oid: Oid, time: i64) {
        self.tags.get_mut().push(TagRef {
            name: name.into(),
            target: oid,
            time,
        });
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// Mark the working tree as having untracked files only
    pub fn set_untracked(&mut self, untracked: bool) {
        self.untracked = untracked;
    }

    /// Make every tag creation fail with `reason`
    pub fn fail_tag_creation(&mut self, reason: impl Into<String>) {
        self.fail_tag_creation = Some(reason.into());
    }

    /// Names of all tags on `oid`
    pub fn tags_at(&self, oid: Oid) -> Vec<String> {
        self.tags
            .borrow()
            .iter()
            .filter(|t| t.target == oid)
            .map(|t| t.name.clone())
            .collect()
    }

    fn ancestors(&self, start: Oid) -> HashSet<Oid> {
        let mut seen = HashSet::new();
        let mut stack = vec![start];
        while let Some(oid) = stack.pop() {
            if seen.insert(oid) {
                if let Some(parents) = self.parents.get(&oid) {
                    stack.extend(parents.iter().copied());
                }
            }
        }
        seen
    }

    fn known(&self, oid: Oid) -> Result<()> {
        if self.parents.contains_key(&oid) {
            Ok(())
        } else {
            Err(git2::Error::from_str(&format!("object not found - no match for id ({})", oid)).into())
        }
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn head(&self) -> Result<HeadState> {
        self.head
            .clone()
            .ok_or_else(|| git2::Error::from_str("reference 'refs/heads/master' not found").into())
    }

    fn remote_branches(&self, remote: &str) -> Result<Vec<(String, Oid)>> {
        let mut branches: Vec<_> = self
            .remote_branches
            .iter()
            .filter(|(r, name, _)| r == remote && name != "HEAD")
            .map(|(_, name, oid)| (name.clone(), *oid))
            .collect();
        branches.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(branches)
    }

    fn tags(&self) -> Result<Vec<TagRef>> {
        let mut tags = self.tags.borrow().clone();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    fn is_ancestor_or_equal(&self, ancestor: Oid, descendant: Oid) -> Result<bool> {
        self.known(ancestor)?;
        self.known(descendant)?;
        Ok(self.ancestors(descendant).contains(&ancestor))
    }

    fn reachable(&self, tip: Oid) -> Result<HashSet<Oid>> {
        self.known(tip)?;
        Ok(self.ancestors(tip))
    }

    fn count_commits_between(
        &self,
        from: Oid,
        to: Oid,
        limit: Option<u32>,
    ) -> Result<Option<u32>> {
        self.known(from)?;
        self.known(to)?;

        let hidden = self.ancestors(from);
        let count = self
            .ancestors(to)
            .iter()
            .filter(|oid| !hidden.contains(oid))
            .count() as u32;
        Ok(match limit {
            Some(limit) if count > limit => None,
            _ => Some(count),
        })
    }

    fn count_first_parent_commits(&self, from: Oid, to: Oid) -> Result<u32> {
        self.known(from)?;
        self.known(to)?;

        let hidden = self.ancestors(from);
        let mut count = 0;
        let mut current = Some(to);
        while let Some(oid) = current {
            if hidden.contains(&oid) {
                break;
            }
            count += 1;
            current = self.parents.get(&oid).and_then(|p| p.first().copied());
        }
        Ok(count)
    }

    fn is_dirty(&self, include_untracked: bool) -> Result<bool> {
        Ok(self.dirty || (include_untracked && self.untracked))
    }

    fn create_annotated_tag(&self, name: &str, target: Oid, _message: &str) -> Result<()> {
        let failed = |reason: String| VersionError::TagCreationFailed {
            tag: name.to_string(),
            commit: target.to_string(),
            reason,
        };

        if let Some(reason) = &self.fail_tag_creation {
            return Err(failed(reason.clone()));
        }
        if self.tags.borrow().iter().any(|t| t.name == name) {
            return Err(failed("reference already exists".to_string()));
        }

        let time = self.times.get(&target).copied().unwrap_or_default();
        self.tags.borrow_mut().push(TagRef {
            name: name.to_string(),
            target,
            time,
        });
        Ok(())
    }
}
