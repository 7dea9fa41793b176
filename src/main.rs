// Copyright 2026 Pricewatch Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use pricewatch::cli;

#[derive(Parser)]
#[command(
    name = "pricewatch",
    about = "pricewatch — track product prices and alert on changes",
    version,
    after_help = "Run 'pricewatch <command> --help' for details on each command."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start tracking a product page
    Track {
        /// Product page URL
        url: String,
        /// CSS selector to pin the price element on this page
        #[arg(long)]
        selector: Option<String>,
        /// Display title (default: extracted from the page)
        #[arg(long)]
        title: Option<String>,
    },
    /// Stop tracking a product page
    Untrack {
        /// Product page URL
        url: String,
    },
    /// List tracked items
    List,
    /// Show price history for a tracked item
    History {
        /// Product page URL
        url: String,
        /// Maximum number of entries to show, newest last
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Check all tracked items now
    Check {
        /// Ignore the interval throttle and fetch every item
        #[arg(long)]
        force: bool,
    },
    /// Show or set the check interval in minutes
    Interval {
        /// New interval in minutes (omit to show the current value)
        minutes: Option<u64>,
    },
    /// Run the periodic check loop in the foreground
    Watch,
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global flags via environment variables so all modules can check them
    if cli.json {
        std::env::set_var("PRICEWATCH_JSON", "1");
    }
    if cli.quiet {
        std::env::set_var("PRICEWATCH_QUIET", "1");
    }
    if cli.verbose {
        std::env::set_var("PRICEWATCH_VERBOSE", "1");
    }
    if cli.no_color {
        std::env::set_var("PRICEWATCH_NO_COLOR", "1");
    }

    let result = match cli.command {
        Commands::Track {
            url,
            selector,
            title,
        } => cli::track_cmd::run(&url, selector.as_deref(), title.as_deref()).await,
        Commands::Untrack { url } => cli::untrack_cmd::run(&url).await,
        Commands::List => cli::list_cmd::run().await,
        Commands::History { url, limit } => cli::history_cmd::run(&url, limit).await,
        Commands::Check { force } => cli::check_cmd::run(force).await,
        Commands::Interval { minutes } => cli::interval_cmd::run(minutes).await,
        Commands::Watch => cli::watch_cmd::run().await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "pricewatch", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if !cli::output::is_quiet() && !cli::output::is_json() {
            eprintln!("  Error: {e:#}");
        }
        if cli::output::is_json() {
            cli::output::print_json(&serde_json::json!({
                "error": true,
                "message": format!("{e:#}"),
            }));
        }
        std::process::exit(1);
    }

    result
}
