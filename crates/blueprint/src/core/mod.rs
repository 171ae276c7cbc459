//! Core model for declaring diagrams
//!
//! Types, the declared tree, the scope-stack builder, structural checks,
//! errors and logging setup.

mod builder;
mod diagram;
mod error;
pub mod lint;
pub mod logging;
mod types;

pub use builder::*;
pub use diagram::*;
pub use error::*;
pub use lint::{check, check_unique_outputs, lint, LintIssue};
pub use types::*;
