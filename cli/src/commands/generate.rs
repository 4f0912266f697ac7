//! Generate a gzip-compressed Docker build context from a recipe.
//!
//! The recipe is read and parsed before the output file is created, so a
//! bad input never leaves a file behind. A failure while writing removes
//! the incomplete output.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use flate2::write::GzEncoder;
use flate2::Compression;

use pharo_context_core::{
    write_context, BuildLayout, ContextError, ContextSummary, Recipe, Result,
};

#[derive(Args)]
pub struct GenerateArgs {
    /// YAML recipe file (required)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// tar.gz file to write the Docker context to (required)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn execute(args: GenerateArgs) -> Result<()> {
    let input = require(args.input, "input")?;
    let output = require(args.output, "output")?;

    let recipe = Recipe::from_file(&input)?;

    let file = File::create(&output).map_err(|source| ContextError::Write {
        entry: output.display().to_string(),
        source,
    })?;
    let summary = write_output(&recipe, &output, file)?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        entries = summary.entries.len(),
        "Build context ready"
    );
    Ok(())
}

/// Reject a missing or empty path argument.
fn require(path: Option<PathBuf>, name: &str) -> Result<PathBuf> {
    match path {
        Some(p) if !p.as_os_str().is_empty() => Ok(p),
        _ => Err(ContextError::Usage(format!("{name} file is empty"))),
    }
}

/// Write the recipe's context to `sink` (the opened `output`) through a
/// gzip encoder. On failure the incomplete `output` is removed.
fn write_output<W: Write>(recipe: &Recipe, output: &Path, sink: W) -> Result<ContextSummary> {
    let result = write_compressed(recipe, output, sink);
    if result.is_err() {
        remove_partial(output);
    }
    result
}

fn write_compressed<W: Write>(recipe: &Recipe, output: &Path, sink: W) -> Result<ContextSummary> {
    let write_error = |source: std::io::Error| ContextError::Write {
        entry: output.display().to_string(),
        source,
    };

    let encoder = GzEncoder::new(sink, Compression::default());
    let (encoder, summary) = write_context(recipe, &BuildLayout::default(), encoder)?;
    let mut sink = encoder.finish().map_err(write_error)?;
    sink.flush().map_err(write_error)?;

    Ok(summary)
}

fn remove_partial(output: &Path) {
    if !output.exists() {
        return;
    }
    if let Err(e) = std::fs::remove_file(output) {
        tracing::warn!(
            output = %output.display(),
            error = %e,
            "Failed to remove incomplete build context"
        );
    }
}
