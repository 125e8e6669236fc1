//! ragdocs CLI entry point.

use clap::Parser;
use ragdocs::cli::commands::{self, RunContext};
use ragdocs::cli::{Cli, Commands};
use ragdocs::config::Overrides;
use ragdocs::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Resolve effective JSON mode: --json OR non-TTY stdout
    let json = cli.json || !std::io::IsTerminal::is_terminal(&std::io::stdout());

    // Run the command and handle errors
    match run(&cli, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                eprintln!("{}", e.to_structured_json());
            } else if !cli.quiet {
                if let Some(hint) = e.hint() {
                    eprintln!("Error: {e}\n  Hint: {hint}");
                } else {
                    eprintln!("Error: {e}");
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug,h2=info,hyper=info,tower=info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

/// Flags given as empty strings (e.g. `QDRANT_URL=`) count as unset.
fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).cloned()
}

fn run(cli: &Cli, json: bool) -> Result<(), Error> {
    let ctx = RunContext {
        config_path: cli.config.clone(),
        overrides: Overrides {
            qdrant_url: non_empty(cli.qdrant_url.as_ref()),
            qdrant_api_key: non_empty(cli.qdrant_api_key.as_ref()),
            collection: non_empty(cli.collection.as_ref()),
        },
        timeout_secs: cli.timeout,
        json,
    };

    match &cli.command {
        Commands::Collection { command } => commands::collection::execute(command, &ctx),
        Commands::Embed { text, full } => commands::embed::execute(text, *full, &ctx),
        Commands::Add(args) => commands::add::execute(args, &ctx),
        Commands::Search { query, limit } => commands::search::execute(query, *limit, &ctx),
        Commands::Status => commands::status::execute(&ctx),
        Commands::Config { command } => commands::config::execute(command, &ctx),
        Commands::Version => commands::version::execute(json),

        // Shell completions
        Commands::Completions { shell } => commands::completions::execute(shell),
    }
}
