//! Build-context archive writer.
//!
//! Writes a recipe's inline files and its generated Dockerfile as a tar
//! stream. Compression is left to the caller, which wraps the sink.

use std::io::Write;

use crate::config::BuildLayout;
use crate::dockerfile::Dockerfile;
use crate::error::{ContextError, Result};
use crate::recipe::{InlineFile, Recipe};

/// Directory prefix for configuration-stage files.
pub const CONF_PREFIX: &str = "conf/";

/// Directory prefix for runtime-stage files.
pub const RUN_PREFIX: &str = "run/";

/// Entry name of the generated build script.
pub const DOCKERFILE_NAME: &str = "Dockerfile";

/// Permission mode recorded for every entry.
pub const ENTRY_MODE: u32 = 0o644;

/// Entry name reported when the archive framing itself fails.
const ARCHIVE_ENTRY: &str = "<archive>";

/// Name of the pseudo-entry carrying a GNU long path.
const GNU_LONG_NAME: &[u8] = b"././@LongLink";

/// What a successful write put into the archive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextSummary {
    /// Entry names in write order
    pub entries: Vec<String>,
    /// Sum of entry content sizes in bytes
    pub content_bytes: u64,
}

/// Write the build context for `recipe` into `sink`.
///
/// Entries are written as `conf/<name>` for each configuration file,
/// `run/<name>` for each runtime file, then `Dockerfile`. The tar framing
/// is finalized before the sink is returned.
pub fn write_context<W: Write>(
    recipe: &Recipe,
    layout: &BuildLayout,
    sink: W,
) -> Result<(W, ContextSummary)> {
    let mut builder = tar::Builder::new(sink);
    let mut summary = ContextSummary::default();

    append_stage_files(
        &mut builder,
        &mut summary,
        CONF_PREFIX,
        &recipe.configuration.files,
    )?;
    append_stage_files(&mut builder, &mut summary, RUN_PREFIX, &recipe.runtime.files)?;

    let dockerfile = Dockerfile::generate(recipe, layout).render();
    append_entry(&mut builder, &mut summary, DOCKERFILE_NAME, dockerfile.as_bytes())?;

    let sink = builder.into_inner().map_err(|source| ContextError::Write {
        entry: ARCHIVE_ENTRY.to_string(),
        source,
    })?;

    tracing::info!(
        entries = summary.entries.len(),
        bytes = summary.content_bytes,
        "Wrote build context"
    );
    Ok((sink, summary))
}

fn append_stage_files<W: Write>(
    builder: &mut tar::Builder<W>,
    summary: &mut ContextSummary,
    prefix: &str,
    files: &[InlineFile],
) -> Result<()> {
    for file in files {
        let name = format!("{}{}", prefix, file.name);
        append_entry(builder, summary, &name, file.content.as_bytes())?;
    }
    Ok(())
}

/// Append one regular-file entry with a fixed mode and no ownership or mtime.
///
/// The name is stored byte-for-byte; `tar::Builder::append_data` would
/// normalize it and reject `..` components.
fn append_entry<W: Write>(
    builder: &mut tar::Builder<W>,
    summary: &mut ContextSummary,
    name: &str,
    content: &[u8],
) -> Result<()> {
    let write_error = |source: std::io::Error| ContextError::Write {
        entry: name.to_string(),
        source,
    };

    let mut header = tar::Header::new_gnu();
    set_raw_name(builder, &mut header, name.as_bytes()).map_err(write_error)?;
    header.set_size(content.len() as u64);
    header.set_mode(ENTRY_MODE);
    header.set_entry_type(tar::EntryType::Regular);
    header.set_cksum();

    builder.append(&header, content).map_err(write_error)?;

    tracing::debug!(entry = name, size = content.len(), "Added context entry");
    summary.entries.push(name.to_string());
    summary.content_bytes += content.len() as u64;
    Ok(())
}

/// Copy `name` into the header's name field, preceding the entry with a
/// GNU long-name record when it does not fit.
fn set_raw_name<W: Write>(
    builder: &mut tar::Builder<W>,
    header: &mut tar::Header,
    name: &[u8],
) -> std::io::Result<()> {
    let field = &mut header.as_old_mut().name;
    if name.len() <= field.len() {
        field[..name.len()].copy_from_slice(name);
        return Ok(());
    }
    let truncated = field.len();
    field.copy_from_slice(&name[..truncated]);

    let mut long_name = tar::Header::new_gnu();
    long_name.as_old_mut().name[..GNU_LONG_NAME.len()].copy_from_slice(GNU_LONG_NAME);
    long_name.set_entry_type(tar::EntryType::GNULongName);
    long_name.set_mode(ENTRY_MODE);
    // NUL-terminated
    long_name.set_size(name.len() as u64 + 1);
    long_name.set_cksum();

    let mut data = name.to_vec();
    data.push(0);
    builder.append(&long_name, data.as_slice())
}
