//! Completions command - print a completion script for `spvbake`

use clap::{Args, Command, CommandFactory};
use clap_complete::Shell;
use std::io::{self, Write};

#[derive(Args)]
pub struct CompletionsArgs {
    /// Target shell (bash, zsh, fish, powershell, elvish)
    #[arg(value_enum)]
    pub shell: Shell,
}

fn write_completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    let bin_name = cmd.get_name().to_string();
    clap_complete::generate(shell, cmd, bin_name, out);
}

pub fn execute<C: CommandFactory>(args: CompletionsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = io::stdout().lock();
    write_completions(args.shell, &mut C::command(), &mut stdout);
    stdout.flush()?;
    Ok(())
}
