// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use std::io;

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Validate { profile }) => commands::cmd_validate(&profile),
        Some(Commands::Source { profile, kitchen }) => commands::cmd_source(&profile, &kitchen),
        Some(Commands::Create {
            profile,
            kitchen,
            deps,
            output,
            cmake,
            jobs,
            keep_build_folder,
        }) => commands::cmd_create(
            &profile,
            &kitchen,
            &deps,
            output.as_deref(),
            cmake.as_deref(),
            jobs,
            keep_build_folder,
        ),
        Some(Commands::Info { profile }) => commands::cmd_info(&profile),
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "ruy-recipe", &mut io::stdout());
            Ok(())
        }
        None => {
            // No command provided, show help
            println!("ruy-recipe v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'ruy-recipe --help' for usage information");
            Ok(())
        }
    }
}
