use crate::error::{Result, VersionError};
use crate::git::{HeadState, TagRef};
use git2::{BranchType, Oid, Repository as Git2Repo, StatusOptions};
use std::collections::HashSet;
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open the repository containing `path`, searching parent directories.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Git2Repo::discover(path).map_err(|e| VersionError::RepositoryNotFound {
            path: path.to_path_buf(),
            reason: e.message().to_string(),
        })?;

        Ok(Git2Repository { repo })
    }

    /// Root of the working tree, `None` for bare repositories.
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }
}

impl super::Repository for Git2Repository {
    fn head(&self) -> Result<HeadState> {
        let head = self.repo.head()?;
        let oid = head.peel_to_commit()?.id();

        let branch = if self.repo.head_detached()? {
            None
        } else {
            head.shorthand().map(|s| s.to_string())
        };

        Ok(HeadState { oid, branch })
    }

    fn remote_branches(&self, remote: &str) -> Result<Vec<(String, Oid)>> {
        let prefix = format!("{}/", remote);
        let mut branches = Vec::new();

        for entry in self.repo.branches(Some(BranchType::Remote))? {
            let (branch, _) = entry?;
            let reference = branch.get();

            // origin/HEAD and friends
            if reference.symbolic_target().is_some() {
                continue;
            }
            let Some(target) = reference.target() else {
                continue;
            };
            let Some(name) = branch.name()? else {
                continue;
            };

            if let Some(short) = name.strip_prefix(&prefix) {
                if short != "HEAD" {
                    branches.push((short.to_string(), target));
                }
            }
        }

        branches.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(branches)
    }

    fn tags(&self) -> Result<Vec<TagRef>> {
        let names = self.repo.tag_names(None)?;
        let mut tags = Vec::new();

        for name in names.iter().flatten() {
            let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;

            // Tags on trees or blobs can't govern a version
            let commit = match reference.peel_to_commit() {
                Ok(commit) => commit,
                Err(e) => {
                    tracing::debug!(tag = name, error = %e, "skipping tag that does not point at a commit");
                    continue;
                }
            };

            tags.push(TagRef {
                name: name.to_string(),
                target: commit.id(),
                time: commit.time().seconds(),
            });
        }

        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    fn is_ancestor_or_equal(&self, ancestor: Oid, descendant: Oid) -> Result<bool> {
        if ancestor == descendant {
            return Ok(true);
        }
        Ok(self.repo.graph_descendant_of(descendant, ancestor)?)
    }

    fn reachable(&self, tip: Oid) -> Result<HashSet<Oid>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(tip)?;

        let mut commits = HashSet::new();
        for oid in revwalk {
            commits.insert(oid?);
        }
        Ok(commits)
    }

    fn count_commits_between(
        &self,
        from: Oid,
        to: Oid,
        limit: Option<u32>,
    ) -> Result<Option<u32>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(to)?;
        revwalk.hide(from)?;

        let mut count = 0;
        for oid in revwalk {
            oid?;
            count += 1;
            if limit.is_some_and(|limit| count > limit) {
                return Ok(None);
            }
        }
        Ok(Some(count))
    }

    fn count_first_parent_commits(&self, from: Oid, to: Oid) -> Result<u32> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(to)?;
        revwalk.hide(from)?;
        revwalk.simplify_first_parent()?;

        let mut count = 0;
        for oid in revwalk {
            oid?;
            count += 1;
        }
        Ok(count)
    }

    fn is_dirty(&self, include_untracked: bool) -> Result<bool> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(include_untracked)
            .include_ignored(false)
            .exclude_submodules(true);

        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(!statuses.is_empty())
    }

    fn create_annotated_tag(&self, name: &str, target: Oid, message: &str) -> Result<()> {
        let failed = |reason: String| VersionError::TagCreationFailed {
            tag: name.to_string(),
            commit: target.to_string(),
            reason,
        };

        let object = self
            .repo
            .find_object(target, None)
            .map_err(|e| failed(format!("cannot find object: {}", e.message())))?;
        let tagger = self
            .repo
            .signature()
            .map_err(|e| failed(format!("no git identity configured: {}", e.message())))?;

        self.repo
            .tag(name, &object, &tagger, message, false)
            .map_err(|e| failed(e.message().to_string()))?;

        Ok(())
    }
}
