//! Main application: image selection, preview, slot grid and exits

use chrono::Local;
use eframe::egui::{self, Color32, ColorImage, RichText, TextureHandle};
use log::{error, info};
use platelot_app::app::{scan_image, LotSnapshot, Pipeline, ScanResult};
use platelot_app::config::Config;
use platelot_app::repository::open_ledger;
use platelot_app::scanner::IMAGE_EXTENSIONS;
use platelot_domain::Ledger;
use platelot_store::SqliteLedgerRepository;

use crate::history_panel::HistoryPanel;
use crate::slot_panel::SlotPanel;

/// Modal dialog currently shown
#[derive(Debug, Clone, PartialEq, Eq)]
enum Dialog {
    /// Result of the last detection
    Outcome(String),
    /// "scan another image?" prompt
    Continue,
    Error(String),
}

/// Main application state
pub struct PlatelotApp {
    config: Config,
    ledger: Option<Ledger<SqliteLedgerRepository>>,
    pipeline: Pipeline,
    snapshot: Option<LotSnapshot>,
    /// Annotated image of the last detection
    preview_texture: Option<TextureHandle>,
    status: Option<String>,
    dialog: Option<Dialog>,
    /// Open the file picker on the next frame
    pick_requested: bool,
}

impl PlatelotApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let (config, config_error) = match Config::load() {
            Ok(config) => (config, None),
            Err(e) => (Config::default(), Some(e)),
        };
        let pipeline = Pipeline::from_config(&config);

        let mut app = Self {
            config,
            ledger: None,
            pipeline,
            snapshot: None,
            preview_texture: None,
            status: None,
            dialog: None,
            pick_requested: false,
        };

        match open_ledger(&app.config) {
            Ok(ledger) => app.ledger = Some(ledger),
            Err(e) => {
                error!("Could not open the parking database: {}", e);
                app.dialog = Some(Dialog::Error(format!(
                    "Could not open the parking database:\n{}",
                    e
                )));
            }
        }
        if let Some(e) = config_error {
            error!("Invalid configuration, using defaults: {}", e);
            app.dialog = Some(Dialog::Error(format!(
                "Invalid configuration, using defaults:\n{}",
                e
            )));
        }
        app.refresh();
        app
    }

    /// Reload slot occupancy and recent exits
    fn refresh(&mut self) {
        let Some(ref ledger) = self.ledger else {
            return;
        };
        match LotSnapshot::load(ledger, self.config.history_limit) {
            Ok(snapshot) => self.snapshot = Some(snapshot),
            Err(e) => self.dialog = Some(Dialog::Error(e.to_string())),
        }
    }

    fn pick_and_scan(&mut self, ctx: &egui::Context) {
        let Some(path) = rfd::FileDialog::new()
            .set_title("Select Image File")
            .add_filter("Image Files", IMAGE_EXTENSIONS)
            .pick_file()
        else {
            return;
        };

        let Some(ref ledger) = self.ledger else {
            return;
        };

        let now = Local::now().naive_local();
        match scan_image(&path, ledger, &self.pipeline, now) {
            Ok(ScanResult::Processed(scan)) => {
                info!("{}: {}", scan.plate, scan.outcome.label());
                let size = [
                    scan.annotated.width() as usize,
                    scan.annotated.height() as usize,
                ];
                let color_image = ColorImage::from_rgb(size, scan.annotated.as_raw());
                self.preview_texture = Some(ctx.load_texture(
                    "preview",
                    color_image,
                    egui::TextureOptions::LINEAR,
                ));
                self.status = Some(format!("License plate: {}", scan.plate));
                self.dialog = Some(Dialog::Outcome(format!(
                    "License plate detected and saved to database!\n{}",
                    scan.outcome
                )));
            }
            Ok(ScanResult::NoPlate { image_path }) => {
                self.status = Some(format!(
                    "No license plate found in {}",
                    image_path.display()
                ));
            }
            Err(e) => {
                self.dialog = Some(Dialog::Error(e.to_string()));
            }
        }
        self.refresh();
    }

    fn render_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Select an image file:");
            let enabled = self.ledger.is_some() && self.dialog.is_none();
            if ui.add_enabled(enabled, egui::Button::new("Browse")).clicked() {
                self.pick_requested = true;
            }
            if let Some(ref status) = self.status {
                ui.add_space(10.0);
                ui.label(RichText::new(status).color(Color32::LIGHT_BLUE));
            }
        });
    }

    fn render_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.dialog.clone() else {
            return;
        };

        let title = match dialog {
            Dialog::Outcome(_) => "Parking Information",
            Dialog::Continue => "Continue?",
            Dialog::Error(_) => "Error",
        };

        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| match dialog {
                Dialog::Outcome(ref message) => {
                    ui.label(message);
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        self.dialog = Some(Dialog::Continue);
                    }
                }
                Dialog::Continue => {
                    ui.label("Do you want to scan another image?");
                    ui.add_space(8.0);
                    ui.horizontal(|ui| {
                        if ui.button("Yes").clicked() {
                            self.dialog = None;
                            self.preview_texture = None;
                            self.pick_requested = true;
                        }
                        if ui.button("No").clicked() {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                }
                Dialog::Error(ref message) => {
                    ui.label(RichText::new(message).color(Color32::LIGHT_RED));
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        self.dialog = None;
                    }
                }
            });
    }
}

impl eframe::App for PlatelotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.pick_requested {
            self.pick_requested = false;
            self.pick_and_scan(ctx);
        }

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.add_space(4.0);
            self.render_controls(ui);
            ui.add_space(4.0);
        });

        egui::SidePanel::left("preview")
            .resizable(true)
            .default_width(520.0)
            .show(ctx, |ui| {
                if let Some(ref texture) = self.preview_texture {
                    ui.add(egui::Image::new(texture).shrink_to_fit());
                } else {
                    ui.label(
                        RichText::new("No image selected")
                            .italics()
                            .color(Color32::GRAY),
                    );
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(ref snapshot) = self.snapshot {
                SlotPanel::ui(ui, snapshot);
                ui.separator();
                HistoryPanel::ui(ui, &snapshot.recent_exits);
            }
        });

        self.render_dialog(ctx);
    }
}
