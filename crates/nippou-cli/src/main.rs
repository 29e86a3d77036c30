#![forbid(unsafe_code)]

mod cmd;
mod output;
mod remote;
mod validate;
mod workspace;

use clap::{CommandFactory, Parser, Subcommand};
use nippou_core::config;
use output::OutputMode;
use std::env;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "nippou",
    author,
    version,
    about = "nippou: daily report checklist",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging (debug level unless NIPPOU_LOG is set).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (pretty, text, json).
    #[arg(long, value_enum, global = true)]
    format: Option<OutputMode>,

    /// Shorthand for --format json.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self, settings_output: Option<&str>) -> OutputMode {
        output::resolve_output_mode(self.format, self.json, settings_output)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Working Copy",
        about = "Load the configuration into the working copy",
        long_about = "Fetch the configuration from the store (or the bundled defaults) into .nippou/working.json.",
        after_help = "EXAMPLES:\n    # Load from the configured store\n    nippou load\n\n    # Start over from the bundled defaults\n    nippou load --defaults"
    )]
    Load(cmd::load::LoadArgs),

    #[command(
        next_help_heading = "Working Copy",
        about = "Re-indent the working copy",
        long_about = "Re-indent .nippou/working.json with two spaces. Malformed JSON is reported and the file is left untouched.",
        after_help = "EXAMPLES:\n    nippou pretty"
    )]
    Pretty,

    #[command(
        next_help_heading = "Working Copy",
        about = "Show the working configuration",
        long_about = "Print the working configuration as a tree, tab-separated text, or JSON.",
        after_help = "EXAMPLES:\n    # Human view\n    nippou show\n\n    # Rendering shape (title/label)\n    nippou show --render --format json"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Working Copy",
        about = "Edit categories",
        after_help = "EXAMPLES:\n    nippou category add \"Side Project\"\n    nippou category move study --up"
    )]
    Category {
        #[command(subcommand)]
        command: cmd::category::CategoryCommand,
    },

    #[command(
        next_help_heading = "Working Copy",
        about = "Edit items",
        after_help = "EXAMPLES:\n    nippou item add exercise \"Push-ups\" --type count --suffix 回\n    nippou item move work bo-e --down"
    )]
    Item {
        #[command(subcommand)]
        command: cmd::item::ItemCommand,
    },

    #[command(
        next_help_heading = "Store",
        about = "Save the working copy to the store",
        long_about = "Validate the working copy and replace the stored configuration. Requires the admin token.",
        after_help = "EXAMPLES:\n    nippou save --token \"$ADMIN_TOKEN\"\n\n    # Token from the environment\n    NIPPOU_TOKEN=... nippou save"
    )]
    Save(cmd::save::TokenArgs),

    #[command(
        next_help_heading = "Store",
        about = "Reset the store to the bundled defaults",
        long_about = "Overwrite the stored configuration with the bundled defaults and refresh the working copy. Requires the admin token.",
        after_help = "EXAMPLES:\n    nippou reset --token \"$ADMIN_TOKEN\""
    )]
    Reset(cmd::save::TokenArgs),

    #[command(
        next_help_heading = "Report",
        about = "Generate the daily report",
        long_about = "Build the daily report text from the configuration and the checked items.",
        after_help = "EXAMPLES:\n    # Today's report\n    nippou generate --today --check work/bo-e --check social/x-posts=3 --note \"good day\"\n\n    # Answers from a file, dated\n    nippou generate --date 2024-01-15 --answers answers.json\n\n    # Use the working copy\n    nippou generate --working --check study/duo=42"
    )]
    Generate(cmd::generate::GenerateArgs),

    #[command(
        next_help_heading = "Maintenance",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    nippou completions bash\n    nippou completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("NIPPOU_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "nippou=debug,nippou_core=debug,info"
        } else {
            "nippou=info,nippou_core=info,warn"
        })
    });

    let format = env::var("NIPPOU_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if cli.verbose {
        info!("verbose mode enabled");
    }

    let project_root = env::current_dir()?;
    // Broken settings are reported by the commands that read them.
    let settings_output = config::load_settings(&project_root)
        .ok()
        .and_then(|settings| settings.output);
    let output = cli.output_mode(settings_output.as_deref());

    match &cli.command {
        Commands::Load(args) => cmd::load::run_load(args, output, &project_root),
        Commands::Pretty => cmd::pretty::run_pretty(output, &project_root),
        Commands::Show(args) => cmd::show::run_show(args, output, &project_root),
        Commands::Category { command } => {
            cmd::category::run_category(command, output, &project_root)
        }
        Commands::Item { command } => cmd::item::run_item(command, output, &project_root),
        Commands::Save(args) => cmd::save::run_save(args, output, &project_root),
        Commands::Reset(args) => cmd::save::run_reset(args, output, &project_root),
        Commands::Generate(args) => cmd::generate::run_generate(args, output, &project_root),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args, &mut command)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_parses_after_subcommand() {
        let cli = Cli::parse_from(["nippou", "show", "--json"]);
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Show(_)));
    }

    #[test]
    fn format_flag_wins() {
        let cli = Cli::parse_from(["nippou", "--format", "text", "--json", "show"]);
        assert_eq!(cli.output_mode(Some("pretty")), OutputMode::Text);
    }

    #[test]
    fn nested_edit_commands_parse() {
        let cli = Cli::parse_from(["nippou", "category", "add", "Side Project"]);
        assert!(matches!(cli.command, Commands::Category { .. }));
        let cli = Cli::parse_from(["nippou", "item", "type", "study", "duo", "count", "--suffix", "日"]);
        assert!(matches!(cli.command, Commands::Item { .. }));
    }

    #[test]
    fn completions_subcommand_parses() {
        let cli = Cli::parse_from(["nippou", "completions", "bash"]);
        assert!(matches!(
            cli.command,
            Commands::Completions(cmd::completions::CompletionsArgs {
                shell: clap_complete::Shell::Bash,
            })
        ));
    }

    #[test]
    fn all_subcommands_listed() {
        let subcommands = [
            vec!["nippou", "load"],
            vec!["nippou", "load", "--defaults"],
            vec!["nippou", "pretty"],
            vec!["nippou", "show", "--render"],
            vec!["nippou", "save", "--token", "t"],
            vec!["nippou", "reset"],
            vec!["nippou", "category", "delete", "work"],
            vec!["nippou", "category", "rename", "work", "本業"],
            vec!["nippou", "category", "move", "work", "--down"],
            vec!["nippou", "item", "add", "work", "Inbox"],
            vec!["nippou", "item", "delete", "work", "bo-e"],
            vec!["nippou", "item", "rename", "work", "bo-e", "E"],
            vec!["nippou", "item", "move", "work", "bo-e", "--to", "2"],
            vec!["nippou", "generate", "--today"],
            vec!["nippou", "completions", "zsh"],
        ];
        for args in &subcommands {
            let result = Cli::try_parse_from(args.iter());
            assert!(
                result.is_ok(),
                "Failed to parse: {:?}: {:?}",
                args,
                result.err()
            );
        }
    }

    #[test]
    fn clap_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
