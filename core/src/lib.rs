//! Pharo Context Core - Recipe to Docker build context
//!
//! Parses a two-stage build recipe, generates the matching Dockerfile and
//! writes both, together with the recipe's inline files, as a tar stream.

pub mod archive;
pub mod config;
pub mod dockerfile;
pub mod error;
pub mod recipe;

// Re-export commonly used types
pub use archive::{write_context, ContextSummary};
pub use config::BuildLayout;
pub use dockerfile::{Dockerfile, Instruction};
pub use error::{ContextError, Result};
pub use recipe::{ConfigurationStage, InlineFile, Recipe, RuntimeStage};
