//! spvbake CLI - build SPIR-V tensor operation shader variants

pub mod build;
pub mod completions;
pub mod list;
pub mod output;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "spvbake")]
#[command(version, about = "Compile tensor operation compute shaders for every data type")]
#[command(after_help = "Use 'spvbake <COMMAND> --help' for more information about a command.")]
pub struct Cli {
    /// Print every tool invocation (same as SPVBAKE_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile the selected shader variants
    Build(build::BuildArgs),

    /// List operations and the variants they expand to
    List(list::ListArgs),

    /// Generate shell completion scripts
    Completions(completions::CompletionsArgs),
}
