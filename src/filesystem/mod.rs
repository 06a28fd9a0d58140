//! Filesystem side of the tool: checking where entries go, creating them,
//! and rendering existing directories back into tree text.

mod materialize;
mod render;
mod target;

pub use materialize::{FailureReason, MaterializationReport, create_file_structure};
pub use render::{RenderError, count_items_in_directory, render_directory_tree};
pub use target::{
    TargetError, TargetStatus, ValidTarget, expand_path, validate_target_directory,
};
