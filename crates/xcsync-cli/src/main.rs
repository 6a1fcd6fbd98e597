//! xcsync CLI
//!
//! Keeps an Xcode `project.pbxproj` in step with the files on disk.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};
use commands::AddArgs;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    // stdout is reserved for command output
    let installed = if verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    };
    installed.expect("Failed to set tracing subscriber");
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    if cli.verbose {
        tracing::debug!("Verbose mode enabled");
    }

    let Some(command) = cli.command else {
        println!("{} Xcode manifest synchronizer", "xcsync".green().bold());
        println!();
        println!("Run {} for available commands.", "xcsync --help".cyan());
        return Ok(());
    };

    let cwd = std::env::current_dir()?;
    let project = context::resolve(&cwd, &cli.source)?;
    if let Some(path) = &project.config_path {
        tracing::debug!(%path, "using config");
    }
    let engine = project.engine()?;

    match command {
        Commands::Sync { dry_run, json } => commands::run_sync(&engine, dry_run, json),
        Commands::Plan { json } => commands::run_plan(&engine, json),
        Commands::Check { json } => commands::run_check(&engine, json),
        Commands::Scan { json } => commands::run_scan(&engine, json),
        Commands::Add {
            file,
            group,
            file_id,
            build_id,
            dry_run,
        } => commands::run_add(
            &engine,
            &cwd,
            &file,
            AddArgs {
                group: group.as_deref(),
                file_id: file_id.as_deref(),
                build_id: build_id.as_deref(),
                dry_run,
            },
        ),
        Commands::Remove { names, dry_run } => commands::run_remove(&engine, &names, dry_run),
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_cli_error_user() {
        let error = crate::error::CliError::user("test error");
        assert_eq!(format!("{}", error), "test error");
    }
}
