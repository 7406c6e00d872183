//! Slot grid: one colored cell per parking slot

use eframe::egui::{self, Color32, RichText, Ui};
use platelot_app::app::LotSnapshot;

const FREE_COLOR: Color32 = Color32::from_rgb(100, 200, 100);
const OCCUPIED_COLOR: Color32 = Color32::from_rgb(230, 200, 60);

pub struct SlotPanel;

impl SlotPanel {
    pub fn ui(ui: &mut Ui, snapshot: &LotSnapshot) {
        ui.heading("Parking Slots");
        ui.label(format!(
            "{} of {} occupied, {} free",
            snapshot.occupancy.occupied,
            snapshot.occupancy.total,
            snapshot.occupancy.free()
        ));
        ui.add_space(6.0);

        egui::Grid::new("slot_grid")
            .spacing([8.0, 8.0])
            .show(ui, |ui| {
                for row in 0..snapshot.grid_rows() {
                    for slot in snapshot.slots.iter().filter(|s| s.row == row) {
                        let color = if slot.occupied {
                            OCCUPIED_COLOR
                        } else {
                            FREE_COLOR
                        };
                        egui::Frame::new()
                            .fill(color)
                            .inner_margin(8.0)
                            .corner_radius(4.0)
                            .show(ui, |ui| {
                                ui.set_min_size(egui::vec2(110.0, 36.0));
                                ui.vertical(|ui| {
                                    ui.label(
                                        RichText::new(format!("Slot {}", slot.id))
                                            .strong()
                                            .color(Color32::BLACK),
                                    );
                                    if let Some(ref plate) = slot.plate {
                                        ui.label(
                                            RichText::new(plate)
                                                .monospace()
                                                .color(Color32::from_gray(40)),
                                        );
                                    }
                                });
                            });
                    }
                    ui.end_row();
                }
            });

        if !snapshot.waiting.is_empty() {
            ui.add_space(6.0);
            ui.label(
                RichText::new(format!(
                    "Recorded while full: {}",
                    snapshot.waiting.join(", ")
                ))
                .color(Color32::YELLOW),
            );
        }
    }
}
