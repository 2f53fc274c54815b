//! Domain logic - pure version rules independent of git operations

pub mod branch;
pub mod descriptor;
pub mod tag;

pub use branch::BranchKind;
pub use descriptor::{RenderOptions, VersionDescriptor};
pub use tag::VersionTag;
