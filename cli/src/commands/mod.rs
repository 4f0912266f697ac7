//! CLI definition and dispatch.

mod generate;

use clap::Parser;

use pharo_context_core::Result;

pub use generate::GenerateArgs;

/// Pharo Context: build a Docker context from a two-stage recipe.
#[derive(Parser)]
#[command(name = "pharo-context", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub generate: GenerateArgs,
}

/// Dispatch a parsed CLI to the command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    generate::execute(cli.generate)
}
