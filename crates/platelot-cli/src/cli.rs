//! CLI definition using clap

use clap::{Parser, Subcommand};
use platelot_types::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "platelot")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "License plate parking ledger")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Ledger database file. Uses config value if not specified.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect the plate in one image and book the car in or out
    Detect {
        /// Path to image file
        image: PathBuf,
    },

    /// Process every image in a folder, in file name order
    Batch {
        /// Path to folder containing images
        folder: PathBuf,
    },

    /// Book a car in or out by typed plate text
    Plate {
        /// Plate text; non-alphanumeric characters are dropped
        text: String,
    },

    /// Show the slot grid
    Slots,

    /// Show the most recent exits
    History {
        /// Number of exits. Uses config value if not specified.
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Show cars currently in the lot
    Sessions,

    /// Export exit history to Excel
    Export {
        /// Output Excel file path
        output: PathBuf,

        /// Number of exits to export (default: all)
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set the ledger database file
        #[arg(long)]
        set_db: Option<PathBuf>,

        /// Set the OCR command ({image} is replaced by the crop path)
        #[arg(long)]
        set_ocr_command: Option<String>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["platelot", "history", "-n", "3", "--format", "json", "--db", "lot.db"])
            .unwrap();
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert_eq!(cli.db, Some(PathBuf::from("lot.db")));
        assert!(matches!(cli.command, Commands::History { limit: Some(3) }));
    }

    #[test]
    fn test_config_flags() {
        let cli = Cli::try_parse_from([
            "platelot",
            "config",
            "--set-ocr-command",
            "tesseract {image} stdout --psm 7",
        ])
        .unwrap();
        match cli.command {
            Commands::Config { set_ocr_command, show, .. } => {
                assert_eq!(set_ocr_command.as_deref(), Some("tesseract {image} stdout --psm 7"));
                assert!(!show);
            }
            _ => panic!("expected config command"),
        }
    }
}
