// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Logging --> Command Dispatch
//!   Backup | Report | Options | Version
//! ```

use std::process::ExitCode;

use repo_vault::cli::{self, Command};
use repo_vault::cmd::backup::run_backup_command;
use repo_vault::cmd::config::{load_config, run_options_command};
use repo_vault::cmd::report::run_report_command;
use repo_vault::logging::init_logging;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let _log_guard = match init_logging(&cli.global.log_config()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli).await
}

async fn dispatch_command(cli: &cli::Cli) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Options) => load_config(&cli.global)
            .map(|config| run_options_command(&config, &cli.global))
            .map_err(Into::into),
        Some(Command::Backup(args)) => match load_config(&cli.global) {
            Ok(config) => run_backup_command(args, &config, &cli.global).await,
            Err(e) => Err(e.into()),
        },
        Some(Command::Report(args)) => match load_config(&cli.global) {
            Ok(config) => run_report_command(args, &config, &cli.global).await,
            Err(e) => Err(e.into()),
        },
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}
