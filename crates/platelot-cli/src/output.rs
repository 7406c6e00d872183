//! Output formatting module

use platelot_app::app::{LotSnapshot, ScanResult};
use platelot_domain::model::format_timestamp;
use platelot_domain::{HistoryRecord, Outcome, Session};
use platelot_types::{OutputFormat, Result};
use serde_json::json;

pub fn output_scan(output_format: OutputFormat, result: &ScanResult) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    match result {
        ScanResult::NoPlate { image_path } => {
            println!("\n{}", image_path.display());
            println!("No license plate found");
        }
        ScanResult::Processed(scan) => {
            println!("\n{}", scan.image_path.display());
            println!("License plate:   {}", display_plate(&scan.plate));
            println!(
                "Region:          {}x{} at ({}, {})",
                scan.reading.region.width,
                scan.reading.region.height,
                scan.reading.region.x,
                scan.reading.region.y
            );
            println!("{}", scan.outcome);
        }
    }
    Ok(())
}

pub fn print_outcome(output_format: OutputFormat, plate: &str, outcome: &Outcome) -> Result<()> {
    if output_format == OutputFormat::Json {
        let value = json!({ "plate": plate, "outcome": outcome });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("License plate:   {}", display_plate(plate));
        println!("{}", outcome);
    }
    Ok(())
}

pub fn output_slots(output_format: OutputFormat, snapshot: &LotSnapshot) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&snapshot.slots)?);
        return Ok(());
    }

    println!(
        "\nParking Slots ({}/{} occupied)",
        snapshot.occupancy.occupied, snapshot.occupancy.total
    );
    println!("{}", "=".repeat(40));

    for row in 0..snapshot.grid_rows() {
        let cells: Vec<String> = snapshot
            .slots
            .iter()
            .filter(|s| s.row == row)
            .map(|s| {
                let mark = if s.occupied { "#" } else { "." };
                format!("[{:>2}{}]", s.id.get(), mark)
            })
            .collect();
        println!("{}", cells.join(" "));
    }

    let parked: Vec<_> = snapshot.slots.iter().filter(|s| s.plate.is_some()).collect();
    if !parked.is_empty() {
        println!();
        for slot in parked {
            println!(
                "Slot {:>2}: {}",
                slot.id.get(),
                display_plate(slot.plate.as_deref().unwrap_or(""))
            );
        }
    }

    if !snapshot.waiting.is_empty() {
        println!("\nRecorded while full: {}", snapshot.waiting.join(", "));
    }

    Ok(())
}

pub fn output_history(output_format: OutputFormat, records: &[HistoryRecord]) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No exits recorded");
        return Ok(());
    }

    println!(
        "{:<12} {:<20} {:<20} {:>16}",
        "Plate", "Time In", "Time Out", "Duration"
    );
    println!("{}", "-".repeat(71));
    for record in records {
        println!(
            "{:<12} {:<20} {:<20} {:>16}",
            display_plate(&record.plate),
            format_timestamp(&record.time_in),
            format_timestamp(&record.time_out),
            record.duration.to_string()
        );
    }
    Ok(())
}

pub fn output_sessions(output_format: OutputFormat, sessions: &[Session]) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!("The lot is empty");
        return Ok(());
    }

    println!("{:<12} {:<20} {:>6}", "Plate", "Entered", "Slot");
    println!("{}", "-".repeat(40));
    for session in sessions {
        let slot = session
            .slot
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<12} {:<20} {:>6}",
            display_plate(&session.plate),
            format_timestamp(&session.entered_at),
            slot
        );
    }
    Ok(())
}

/// OCR can yield an empty key; show it explicitly
fn display_plate(plate: &str) -> &str {
    if plate.is_empty() {
        "(unread)"
    } else {
        plate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_plate() {
        assert_eq!(display_plate(""), "(unread)");
        assert_eq!(display_plate("AB12"), "AB12");
    }
}
