//! Recipe model and YAML parser.
//!
//! A recipe describes a two-stage image build: a configuration stage that
//! runs commands against a base image, and a runtime stage that starts the
//! configured image on a VM image. Both stages can embed inline files.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::BuildLayout;
use crate::dockerfile::Dockerfile;
use crate::error::{ContextError, Result};

/// A file embedded in the recipe and materialized in the build context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InlineFile {
    /// Relative path inside the stage directory
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,

    /// Declared content type (not used in the generated context)
    #[serde(
        default,
        rename = "content-type",
        alias = "type",
        deserialize_with = "nullable"
    )]
    pub content_type: String,

    /// Literal file content
    #[serde(default, deserialize_with = "nullable")]
    pub content: String,
}

/// Configuration stage: commands run against the base image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationStage {
    #[serde(default, deserialize_with = "nullable")]
    pub image: String,

    #[serde(default, deserialize_with = "nullable")]
    pub commands: Vec<String>,

    #[serde(default, rename = "write_files", deserialize_with = "nullable")]
    pub files: Vec<InlineFile>,
}

/// Runtime stage: the final image started on the VM.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeStage {
    #[serde(default, deserialize_with = "nullable")]
    pub vm: String,

    #[serde(default, deserialize_with = "nullable")]
    pub command: String,

    #[serde(default, rename = "write_files", deserialize_with = "nullable")]
    pub files: Vec<InlineFile>,
}

/// Parsed two-stage build recipe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default, deserialize_with = "nullable")]
    pub configuration: ConfigurationStage,

    #[serde(default, deserialize_with = "nullable")]
    pub runtime: RuntimeStage,
}

impl Recipe {
    /// Parse a recipe from raw document bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(data)
            .map_err(|e| ContextError::Parse(format!("recipe is not valid UTF-8: {}", e)))?;
        text.parse()
    }

    /// Read and parse a recipe file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|source| ContextError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let recipe = Self::parse(&data)?;

        tracing::debug!(
            path = %path.display(),
            commands = recipe.configuration.commands.len(),
            conf_files = recipe.configuration.files.len(),
            run_files = recipe.runtime.files.len(),
            "Parsed recipe"
        );
        Ok(recipe)
    }

    /// Render the Dockerfile for this recipe with the default layout.
    pub fn dockerfile(&self) -> String {
        Dockerfile::generate(self, &BuildLayout::default()).render()
    }
}

impl std::str::FromStr for Recipe {
    type Err = ContextError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }
}

/// Treat an explicit null the same as an absent field.
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
