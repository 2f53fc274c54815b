use flasher_version::boundary::BoundaryWarning;
use flasher_version::domain::{BranchKind, RenderOptions, VersionDescriptor, VersionTag};
use flasher_version::manager::ResolvedBranch;
use flasher_version::ui;

const HASH: &str = "b39e454f00dfeed00dfeed00dfeed00dfeed0000";

fn branch(name: &str, kind: BranchKind, detached: bool) -> ResolvedBranch {
    ResolvedBranch {
        name: name.to_string(),
        kind,
        detached,
    }
}

fn descriptor(
    name: &str,
    kind: BranchKind,
    tag: VersionTag,
    commits: u32,
    dirty: bool,
) -> VersionDescriptor {
    VersionDescriptor::new(name, kind, &tag, commits, dirty, HASH, &RenderOptions::default())
}

// ============================================================================
// BoundaryWarning Display Tests
// ============================================================================

#[test]
fn test_release_ahead_of_tag_display() {
    let warning = BoundaryWarning::ReleaseAheadOfTag {
        tag: "v3.0.0".to_string(),
        commits: 4,
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("4 commit(s) ahead"),
        "Message should contain the commit count, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("v3.0.0"),
        "Message should contain tag 'v3.0.0', got: {}",
        display_msg
    );
}

#[test]
fn test_dirty_working_tree_display() {
    let warning = BoundaryWarning::DirtyWorkingTree {
        version: "3.0.0+".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(display_msg.contains("uncommitted changes"));
    assert!(display_msg.contains("3.0.0+"));
}

#[test]
fn test_detached_head_display() {
    let resolved = BoundaryWarning::DetachedHeadResolved {
        branch: "dev_v2.1.0".to_string(),
    };
    assert!(resolved.to_string().contains("dev_v2.1.0"));

    let unresolved = BoundaryWarning::DetachedHeadUnresolved {
        remote: "origin".to_string(),
    };
    let msg = unresolved.to_string();
    assert!(msg.contains("origin"));
    assert!(msg.contains("'HEAD'"));
}

// ============================================================================
// BoundaryWarning::collect Tests
// ============================================================================

#[test]
fn test_clean_release_build_has_no_warnings() {
    let b = branch("master", BranchKind::Release, false);
    let d = descriptor("master", BranchKind::Release, VersionTag::release(3, 0, 0), 0, false);
    assert!(BoundaryWarning::collect(&b, &d, "origin").is_empty());
}

#[test]
fn test_release_ahead_and_dirty() {
    let b = branch("master", BranchKind::Release, false);
    let d = descriptor("master", BranchKind::Release, VersionTag::release(3, 0, 0), 2, true);

    let warnings = BoundaryWarning::collect(&b, &d, "origin");
    assert_eq!(
        warnings,
        vec![
            BoundaryWarning::ReleaseAheadOfTag {
                tag: "v3.0.0".to_string(),
                commits: 2,
            },
            BoundaryWarning::DirtyWorkingTree {
                version: "3.0.0-2+".to_string(),
            },
        ]
    );
}

#[test]
fn test_dev_build_commits_are_not_warned_about() {
    let b = branch("dev_v2.1.0", BranchKind::Dev, false);
    let d = descriptor("dev_v2.1.0", BranchKind::Dev, VersionTag::dev(2, 1, 0, 13), 5, true);
    assert!(BoundaryWarning::collect(&b, &d, "origin").is_empty());
}

#[test]
fn test_detached_head_warnings() {
    let b = branch("dev_v2.1.0", BranchKind::Dev, true);
    let d = descriptor("dev_v2.1.0", BranchKind::Dev, VersionTag::dev(2, 1, 0, 1), 0, false);
    assert_eq!(
        BoundaryWarning::collect(&b, &d, "origin"),
        vec![BoundaryWarning::DetachedHeadResolved {
            branch: "dev_v2.1.0".to_string(),
        }]
    );

    let b = branch("HEAD", BranchKind::Release, true);
    let d = descriptor("HEAD", BranchKind::Release, VersionTag::release(1, 0, 0), 0, false);
    assert_eq!(
        BoundaryWarning::collect(&b, &d, "upstream"),
        vec![BoundaryWarning::DetachedHeadUnresolved {
            remote: "upstream".to_string(),
        }]
    );
}

#[test]
fn test_display_boundary_warning_does_not_panic() {
    let warning = BoundaryWarning::DirtyWorkingTree {
        version: "1.0.0+".to_string(),
    };
    ui::display_boundary_warning(&warning);
}
