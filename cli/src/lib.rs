//! Pharo Context CLI - turn a build recipe into a Docker build context.

pub mod commands;
