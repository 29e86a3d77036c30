use clap::Args;
use clap_complete::{Shell, generate};

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate the completion script for.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write a completion script for the `nippou` command tree to stdout.
pub fn run_completions(args: &CompletionsArgs, command: &mut clap::Command) -> anyhow::Result<()> {
    let bin_name = command.get_name().to_string();
    generate(args.shell, command, bin_name, &mut std::io::stdout().lock());
    Ok(())
}
