//! Command-line workflows

pub mod orchestration;

pub use orchestration::{
    error_hint, run_describe, run_tag_workflow, DescribeOutput, OutputFormat, TagWorkflowArgs,
    TagWorkflowResult,
};
