//! Recent exits table

use eframe::egui::{Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use platelot_domain::model::format_timestamp;
use platelot_domain::HistoryRecord;

pub struct HistoryPanel;

impl HistoryPanel {
    pub fn ui(ui: &mut Ui, records: &[HistoryRecord]) {
        ui.heading("Recent Exits");
        ui.add_space(4.0);

        if records.is_empty() {
            ui.label(RichText::new("No exits recorded").color(Color32::GRAY));
            return;
        }

        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(100.0))
            .column(Column::auto().at_least(150.0))
            .column(Column::auto().at_least(150.0))
            .column(Column::remainder())
            .header(20.0, |mut header| {
                for title in ["License Plate", "Time In", "Time Out", "Duration"] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for record in records {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.monospace(&record.plate);
                        });
                        row.col(|ui| {
                            ui.label(format_timestamp(&record.time_in));
                        });
                        row.col(|ui| {
                            ui.label(format_timestamp(&record.time_out));
                        });
                        row.col(|ui| {
                            ui.label(record.duration.to_string());
                        });
                    });
                }
            });
    }
}
