//! Command handlers

use crate::cli::{Cli, Commands};
use crate::output::{output_history, output_scan, output_sessions, output_slots, print_outcome};
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use platelot_app::app::{process_plate_text, scan_image, LotSnapshot, Pipeline, ScanResult};
use platelot_app::config::Config;
use platelot_app::export::export_history_to_excel;
use platelot_app::repository::open_ledger;
use platelot_app::scanner::scan_directory;
use platelot_domain::Outcome;
use platelot_types::{Error, OutputFormat, Result};
use std::path::PathBuf;

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref db) = cli.db {
        config.database_path = Some(db.clone());
    }
    let output_format = cli.format.unwrap_or(config.output_format);

    match cli.command {
        Commands::Detect { image } => cmd_detect(&config, image, output_format),
        Commands::Batch { folder } => cmd_batch(&config, folder, output_format),
        Commands::Plate { text } => cmd_plate(&config, &text, output_format),
        Commands::Slots => cmd_slots(&config, output_format),
        Commands::History { limit } => {
            cmd_history(&config, limit.unwrap_or(config.history_limit), output_format)
        }
        Commands::Sessions => cmd_sessions(&config, output_format),
        Commands::Export { output, limit } => cmd_export(&config, output, limit),
        Commands::Config {
            show,
            set_db,
            set_ocr_command,
            set_output,
            reset,
        } => cmd_config(show, set_db, set_ocr_command, set_output, reset),
    }
}

fn cmd_detect(config: &Config, image: PathBuf, output_format: OutputFormat) -> Result<()> {
    let ledger = open_ledger(config)?;
    let pipeline = Pipeline::from_config(config);

    let now = Local::now().naive_local();
    let result = scan_image(&image, &ledger, &pipeline, now)?;
    output_scan(output_format, &result)
}

fn cmd_batch(config: &Config, folder: PathBuf, output_format: OutputFormat) -> Result<()> {
    let images = scan_directory(&folder)?;
    if images.is_empty() {
        return Err(Error::FileNotFound(format!(
            "No images found in {}",
            folder.display()
        )));
    }
    debug!("Found {} images in {}", images.len(), folder.display());

    let ledger = open_ledger(config)?;
    let pipeline = Pipeline::from_config(config);

    let pb = ProgressBar::new(images.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-"),
    );

    let mut results = Vec::new();
    let mut failures = 0usize;

    for image in &images {
        let filename = image
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();
        pb.set_message(filename.clone());

        let now = Local::now().naive_local();
        match scan_image(image, &ledger, &pipeline, now) {
            Ok(result) => results.push(result),
            Err(e) => {
                failures += 1;
                pb.println(format!("{}: {}", filename, e));
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("done");

    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    let mut entered = 0;
    let mut exited = 0;
    let mut full = 0;
    let mut no_plate = 0;
    for result in &results {
        match result {
            ScanResult::NoPlate { .. } => no_plate += 1,
            ScanResult::Processed(scan) => match scan.outcome {
                Outcome::Entered { .. } => entered += 1,
                Outcome::Exited { .. } => exited += 1,
                Outcome::LotFull => full += 1,
            },
        }
        output_scan(output_format, result)?;
    }

    println!("\nBatch Summary");
    println!("=============");
    println!("Images:    {}", images.len());
    println!("Entered:   {}", entered);
    println!("Exited:    {}", exited);
    println!("Lot full:  {}", full);
    println!("No plate:  {}", no_plate);
    println!("Failed:    {}", failures);

    Ok(())
}

fn cmd_plate(config: &Config, text: &str, output_format: OutputFormat) -> Result<()> {
    let ledger = open_ledger(config)?;
    let now = Local::now().naive_local();
    let (plate, outcome) = process_plate_text(&ledger, text, now)?;
    print_outcome(output_format, &plate, &outcome)
}

fn cmd_slots(config: &Config, output_format: OutputFormat) -> Result<()> {
    let ledger = open_ledger(config)?;
    let snapshot = LotSnapshot::load(&ledger, config.history_limit)?;
    output_slots(output_format, &snapshot)
}

fn cmd_history(config: &Config, limit: usize, output_format: OutputFormat) -> Result<()> {
    let ledger = open_ledger(config)?;
    let records = ledger.recent_exits(limit)?;
    output_history(output_format, &records)
}

fn cmd_sessions(config: &Config, output_format: OutputFormat) -> Result<()> {
    let ledger = open_ledger(config)?;
    let sessions = ledger.open_sessions()?;
    output_sessions(output_format, &sessions)
}

fn cmd_export(config: &Config, output: PathBuf, limit: Option<usize>) -> Result<()> {
    let ledger = open_ledger(config)?;
    let records = ledger.recent_exits(limit.unwrap_or(usize::MAX))?;
    let occupancy = ledger.occupancy()?;

    export_history_to_excel(&records, occupancy, &output)?;
    println!("Exported {} exits to {}", records.len(), output.display());
    Ok(())
}

fn cmd_config(
    show: bool,
    set_db: Option<PathBuf>,
    set_ocr_command: Option<String>,
    set_output: Option<OutputFormat>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(db) = set_db {
        config.database_path = Some(db);
        modified = true;
    }

    if let Some(command) = set_ocr_command {
        config.ocr_command = command;
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration saved to {}", Config::config_path()?.display());
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}
