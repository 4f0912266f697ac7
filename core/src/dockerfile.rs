//! Dockerfile generation.
//!
//! Derives a two-stage Dockerfile from a recipe: the configuration stage
//! copies its inline files next to the image and runs each command through
//! the interpreter; the runtime stage takes the saved image state from the
//! configuration stage, adds its own files and starts the interpreter.
//!
//! Commands are embedded verbatim, without quoting or escaping.

use std::fmt;

use crate::archive::{CONF_PREFIX, RUN_PREFIX};
use crate::config::BuildLayout;
use crate::recipe::Recipe;

/// A single Dockerfile instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// `FROM <image> [AS <alias>]`
    From {
        image: String,
        alias: Option<String>,
    },
    /// `COPY [--from=<stage>] <src>... <dst>`
    Copy {
        src: Vec<String>,
        dst: String,
        from: Option<String>,
    },
    /// `RUN <command>` (shell form)
    Run { command: String },
    /// `CMD <command>` (shell form)
    Cmd { command: String },
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::From { image, alias } => {
                write!(f, "FROM {}", image)?;
                if let Some(alias) = alias {
                    write!(f, " AS {}", alias)?;
                }
                Ok(())
            }
            Instruction::Copy { src, dst, from } => {
                f.write_str("COPY")?;
                if let Some(stage) = from {
                    write!(f, " --from={}", stage)?;
                }
                for s in src {
                    write!(f, " {}", s)?;
                }
                write!(f, " {}", dst)
            }
            Instruction::Run { command } => write!(f, "RUN {}", command),
            Instruction::Cmd { command } => write!(f, "CMD {}", command),
        }
    }
}

/// Generated Dockerfile: a list of instructions in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dockerfile {
    pub instructions: Vec<Instruction>,
}

impl Dockerfile {
    /// Build the instruction list for a recipe.
    pub fn generate(recipe: &Recipe, layout: &BuildLayout) -> Self {
        let conf = &recipe.configuration;
        let run = &recipe.runtime;
        let script = layout.script_path();

        let mut instructions = Vec::with_capacity(conf.commands.len() + 6);

        instructions.push(Instruction::From {
            image: conf.image.clone(),
            alias: Some(layout.stage_name.clone()),
        });
        instructions.push(Instruction::Copy {
            src: vec![CONF_PREFIX.to_string()],
            dst: layout.image_dir.clone(),
            from: None,
        });
        for command in &conf.commands {
            instructions.push(Instruction::Run {
                command: interpreter_line(layout, &script, command),
            });
        }

        instructions.push(Instruction::From {
            image: run.vm.clone(),
            alias: None,
        });
        instructions.push(Instruction::Copy {
            src: vec![layout.image_artifacts()],
            dst: layout.image_dir.clone(),
            from: Some(layout.stage_name.clone()),
        });
        instructions.push(Instruction::Copy {
            src: vec![RUN_PREFIX.to_string()],
            dst: layout.image_dir.clone(),
            from: None,
        });
        instructions.push(Instruction::Cmd {
            command: interpreter_line(layout, &script, &run.command),
        });

        Dockerfile { instructions }
    }

    /// Render the Dockerfile text, one newline-terminated line per instruction.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for instruction in &self.instructions {
            out.push_str(&instruction.to_string());
            out.push('\n');
        }
        out
    }
}

/// `<interpreter> <image> <args>`, args appended as-is.
fn interpreter_line(layout: &BuildLayout, script: &str, args: &str) -> String {
    format!("{} {} {}", layout.interpreter, script, args)
}
