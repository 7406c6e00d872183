//! Excel export of the exit history

use platelot_domain::model::format_timestamp;
use platelot_domain::{HistoryRecord, Occupancy};
use platelot_types::{Error, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

fn excel_err(e: rust_xlsxwriter::XlsxError) -> Error {
    Error::Excel(e.to_string())
}

/// Export exits and current occupancy to an Excel file
pub fn export_history_to_excel(
    records: &[HistoryRecord],
    occupancy: Occupancy,
    output_path: &Path,
) -> Result<()> {
    let mut workbook = Workbook::new();

    let summary_sheet = workbook.add_worksheet();
    write_summary_sheet(summary_sheet, records, occupancy)?;

    let exits_sheet = workbook.add_worksheet();
    write_exits_sheet(exits_sheet, records)?;

    workbook.save(output_path).map_err(excel_err)?;

    Ok(())
}

fn write_summary_sheet(
    sheet: &mut Worksheet,
    records: &[HistoryRecord],
    occupancy: Occupancy,
) -> Result<()> {
    sheet.set_name("Summary").map_err(excel_err)?;

    let header_format = Format::new().set_bold();
    sheet
        .write_string_with_format(0, 0, "Parking Lot Report", &header_format)
        .map_err(excel_err)?;

    let rows: [(&str, f64); 4] = [
        ("Slots:", occupancy.total as f64),
        ("Occupied:", occupancy.occupied as f64),
        ("Free:", occupancy.free() as f64),
        ("Exits exported:", records.len() as f64),
    ];
    for (i, (label, value)) in rows.iter().enumerate() {
        let row = 2 + i as u32;
        sheet.write_string(row, 0, *label).map_err(excel_err)?;
        sheet.write_number(row, 1, *value).map_err(excel_err)?;
    }

    if !records.is_empty() {
        let total_secs: i64 = records.iter().map(|r| r.duration.as_secs()).sum();
        let average_minutes = total_secs as f64 / records.len() as f64 / 60.0;
        sheet
            .write_string(7, 0, "Average stay (min):")
            .map_err(excel_err)?;
        sheet
            .write_number(7, 1, (average_minutes * 10.0).round() / 10.0)
            .map_err(excel_err)?;
    }

    Ok(())
}

fn write_exits_sheet(sheet: &mut Worksheet, records: &[HistoryRecord]) -> Result<()> {
    sheet.set_name("Exits").map_err(excel_err)?;

    let header_format = Format::new().set_bold();
    let headers = ["License Plate", "Time In", "Time Out", "Duration", "Seconds"];
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(excel_err)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, &record.plate).map_err(excel_err)?;
        sheet
            .write_string(row, 1, format_timestamp(&record.time_in))
            .map_err(excel_err)?;
        sheet
            .write_string(row, 2, format_timestamp(&record.time_out))
            .map_err(excel_err)?;
        sheet
            .write_string(row, 3, record.duration.to_string())
            .map_err(excel_err)?;
        sheet
            .write_number(row, 4, record.duration.as_secs() as f64)
            .map_err(excel_err)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use platelot_domain::StayDuration;
    use tempfile::tempdir;

    #[test]
    fn test_export_writes_file() {
        let time_in = NaiveDate::from_ymd_opt(2024, 4, 4)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap();
        let records = vec![HistoryRecord {
            plate: "XY99".to_string(),
            time_in,
            time_out: time_in + Duration::minutes(42),
            duration: StayDuration::from_secs(42 * 60),
        }];
        let occupancy = Occupancy {
            occupied: 3,
            total: 20,
        };

        let dir = tempdir().unwrap();
        let out = dir.path().join("exits.xlsx");
        export_history_to_excel(&records, occupancy, &out).unwrap();

        let bytes = std::fs::read(&out).unwrap();
        // xlsx files are zip archives
        assert_eq!(&bytes[..2], b"PK");
    }
}
