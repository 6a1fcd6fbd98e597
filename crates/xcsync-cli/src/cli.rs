//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// xcsync - Keep an Xcode project manifest in step with its source tree
#[derive(Parser, Debug)]
#[command(name = "xcsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub source: SourceArgs,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Values layered over the config file
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceArgs {
    /// Config file (default: xcsync.toml, .json, .yaml or .yml found from the
    /// working directory upwards)
    #[arg(long, global = true, env = "XCSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to project.pbxproj
    #[arg(long, global = true)]
    pub manifest: Option<PathBuf>,

    /// Source root to scan
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Allow-listed extension; replaces the configured list (repeatable)
    #[arg(long = "ext", global = true, value_name = "EXT")]
    pub extensions: Vec<String>,

    /// File name to purge from the manifest (repeatable)
    #[arg(long, global = true, value_name = "NAME")]
    pub deny: Vec<String>,

    /// Keep entries whose files are missing on disk
    #[arg(long, global = true)]
    pub no_prune: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Add new files to the manifest and remove stale ones
    ///
    /// Examples:
    ///   xcsync sync              # Update project.pbxproj in place
    ///   xcsync sync --dry-run    # Show what would change
    Sync {
        /// Preview changes without writing the manifest
        #[arg(long)]
        dry_run: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show planned additions and removals with a unified diff
    Plan {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Check the manifest for dangling or duplicated references
    ///
    /// Exits with a non-zero status unless the manifest is healthy.
    Check {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List allow-listed files found under the source root
    Scan {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Add one file to the manifest
    ///
    /// Examples:
    ///   xcsync add KnowMaps/Views/MapView.swift
    ///   xcsync add KnowMaps/MainUI.swift --file-id A1B2... --build-id B1C2...
    Add {
        /// Path to the file, relative to the working directory
        file: PathBuf,

        /// Group by display name or identifier
        #[arg(short, long)]
        group: Option<String>,

        /// Fixed file reference identifier (24 hex digits)
        #[arg(long, requires = "build_id")]
        file_id: Option<String>,

        /// Fixed build file identifier (24 hex digits)
        #[arg(long, requires = "file_id")]
        build_id: Option<String>,

        /// Preview changes without writing the manifest
        #[arg(long)]
        dry_run: bool,
    },

    /// Remove files from the manifest by name
    Remove {
        /// File names, e.g. SettingsView.swift
        #[arg(required = true)]
        names: Vec<String>,

        /// Preview changes without writing the manifest
        #[arg(long)]
        dry_run: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_no_command() {
        let cli = Cli::parse_from(["xcsync"]);
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert_eq!(cli.source, SourceArgs::default());
    }

    #[test]
    fn parse_sync_dry_run() {
        let cli = Cli::parse_from(["xcsync", "sync", "--dry-run"]);
        assert_eq!(
            cli.command,
            Some(Commands::Sync {
                dry_run: true,
                json: false
            })
        );
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "xcsync", "plan", "--ext", "swift", "--ext", "json", "--deny", "Old.swift", "-v",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.source.extensions, vec!["swift", "json"]);
        assert_eq!(cli.source.deny, vec!["Old.swift"]);
        assert!(!cli.source.no_prune);
    }

    #[test]
    fn parse_no_prune() {
        let cli = Cli::parse_from(["xcsync", "sync", "--no-prune"]);
        assert!(cli.source.no_prune);
    }

    #[test]
    fn parse_add_with_ids() {
        let cli = Cli::parse_from([
            "xcsync",
            "add",
            "App/MainUI.swift",
            "--file-id",
            "A1B2C3D4E5F6789012345678",
            "--build-id",
            "B1C2D3E4F5A6789012345678",
        ]);
        match cli.command {
            Some(Commands::Add {
                file,
                file_id,
                build_id,
                group,
                dry_run,
            }) => {
                assert_eq!(file, PathBuf::from("App/MainUI.swift"));
                assert_eq!(file_id.as_deref(), Some("A1B2C3D4E5F6789012345678"));
                assert_eq!(build_id.as_deref(), Some("B1C2D3E4F5A6789012345678"));
                assert!(group.is_none());
                assert!(!dry_run);
            }
            other => panic!("Expected Add, got {other:?}"),
        }
    }

    #[test]
    fn add_file_id_requires_build_id() {
        let result = Cli::try_parse_from(["xcsync", "add", "A.swift", "--file-id", "X"]);
        assert!(result.is_err());
    }

    #[test]
    fn remove_requires_a_name() {
        assert!(Cli::try_parse_from(["xcsync", "remove"]).is_err());

        let cli = Cli::parse_from(["xcsync", "remove", "A.swift", "B.swift"]);
        assert_eq!(
            cli.command,
            Some(Commands::Remove {
                names: vec!["A.swift".into(), "B.swift".into()],
                dry_run: false
            })
        );
    }
}
