#![forbid(unsafe_code)]

mod cmd;
mod output;
mod source;

use clap::{CommandFactory, Parser, Subcommand};
use output::OutputMode;
use skein_core::config::load_user_config;
use std::env;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "skein: group work items under their parents and sort the clusters",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output (same as `--format json`).
    #[arg(long, global = true)]
    json: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Suppress confirmations and summaries; overrides `--verbose`.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags, `FORMAT` and the user config.
    fn output_mode(&self) -> OutputMode {
        let user = load_user_config().unwrap_or_else(|e| {
            warn!("ignoring user config: {e:#}");
            skein_core::config::UserConfig::default()
        });
        output::resolve_output_mode(self.format, self.json, user.output.as_deref())
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Read",
        about = "Group and sort items",
        long_about = "Read a JSON array of items, place each child right after its parent \
                      (pulling in missing parents) and order the clusters.",
        after_help = "EXAMPLES:\n    # Sort with the project default (number, descending)\n    sk sort items.json\n\n    # Sort by assignee, ascending, from stdin\n    cat items.json | sk sort --by \"assigned to\" --direction ascending\n\n    # Emit machine-readable output\n    sk sort items.json --json"
    )]
    Sort(cmd::sort::SortArgs),

    #[command(
        next_help_heading = "Read",
        about = "List sort aliases",
        long_about = "List the sort aliases accepted by `sk sort --by` and the key path each reads.",
        after_help = "EXAMPLES:\n    # Show aliases\n    sk fields"
    )]
    Fields,

    #[command(
        next_help_heading = "Metadata",
        about = "Add tags to an item",
        long_about = "Attach one or more tags to an item in a JSON items file.",
        after_help = "EXAMPLES:\n    # Add tags\n    sk tag items.json --product 1 --number 4 bug urgent"
    )]
    Tag(cmd::tag::TagArgs),

    #[command(
        next_help_heading = "Metadata",
        about = "Remove tags from an item",
        long_about = "Remove one or more tags from an item in a JSON items file.",
        after_help = "EXAMPLES:\n    # Remove a tag\n    sk untag items.json --product 1 --number 4 urgent"
    )]
    Untag(cmd::tag::TagArgs),

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Inspect configuration",
        after_help = "EXAMPLES:\n    # Show the effective configuration\n    sk config show"
    )]
    Config(cmd::config::ConfigArgs),

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    sk completions bash\n\n    # Generate zsh completions\n    sk completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("SKEIN_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "skein=debug,info"
        } else {
            "skein=info,warn"
        })
    });

    let format = env::var("SKEIN_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

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
    init_tracing(cli.verbose && !cli.quiet);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = env::current_dir()?;
    let output = cli.output_mode();

    match cli.command {
        Commands::Sort(ref args) => cmd::sort::run_sort(args, output, cli.quiet, &project_root),
        Commands::Fields => cmd::fields::run_fields(output),
        Commands::Tag(ref args) => cmd::tag::run_tag(args, output, cli.quiet),
        Commands::Untag(ref args) => cmd::tag::run_untag(args, output, cli.quiet),
        Commands::Config(ref args) => cmd::config::run_config(args, &project_root, output),
        Commands::Completions(ref args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}
