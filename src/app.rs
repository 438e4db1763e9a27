//! Main application state and UI

use std::path::Path;

use eframe::egui;
use serde::{Deserialize, Serialize};

use crate::plate::{
    HitBand, PlateData, batch_stats, format_value, load_plate_file, plate_stats, write_csv,
    write_xlsx,
};

/// One successfully loaded plate file.
struct PlateFileEntry {
    file_name: String,
    /// File name without extension, used to derive export names.
    stem: String,
    plate: PlateData,
}

/// Serialized form of a loaded plate, for JSON session save/load.
#[derive(Serialize, Deserialize)]
struct PlateSession {
    file_name: String,
    plate: PlateData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorPalette {
    BlueRed,
    GreenRed,
    PurpleYellow,
    Grayscale,
}

impl ColorPalette {
    const ALL: [ColorPalette; 4] = [
        ColorPalette::BlueRed,
        ColorPalette::GreenRed,
        ColorPalette::PurpleYellow,
        ColorPalette::Grayscale,
    ];

    fn label(self) -> &'static str {
        match self {
            ColorPalette::BlueRed => "Blue-Red",
            ColorPalette::GreenRed => "Green-Red",
            ColorPalette::PurpleYellow => "Purple-Yellow",
            ColorPalette::Grayscale => "Grayscale",
        }
    }

    /// Gradient stops (low, mid, high) as RGB.
    fn stops(self) -> [(f64, f64, f64); 3] {
        match self {
            ColorPalette::BlueRed => {
                [(37.0, 99.0, 235.0), (255.0, 255.0, 255.0), (220.0, 38.0, 38.0)]
            }
            ColorPalette::GreenRed => {
                [(16.0, 185.0, 129.0), (255.0, 255.0, 255.0), (220.0, 38.0, 38.0)]
            }
            ColorPalette::PurpleYellow => {
                [(139.0, 92.0, 246.0), (255.0, 255.0, 255.0), (250.0, 204.0, 21.0)]
            }
            ColorPalette::Grayscale => {
                [(248.0, 250.0, 252.0), (148.0, 163.0, 184.0), (30.0, 41.0, 59.0)]
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DisplayMode {
    Heatmap,
    Numeric,
    Hybrid,
}

/// Application state
pub struct PlateVisApp {
    // Loaded files
    files: Vec<PlateFileEntry>,
    current_file: usize,
    /// Per-file load failures from the last open batch; a failed file
    /// never aborts its siblings.
    load_errors: Vec<String>,

    // View settings, shared across files
    min_threshold: f64,
    max_threshold: f64,
    palette: ColorPalette,
    display_mode: DisplayMode,
    zoom_level: f32,

    // Export / session state
    export_status: Option<String>,
    export_error: Option<String>,
    session_error: Option<String>,
}

impl Default for PlateVisApp {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            current_file: 0,
            load_errors: Vec::new(),
            min_threshold: 0.0,
            max_threshold: 100.0,
            palette: ColorPalette::BlueRed,
            display_mode: DisplayMode::Heatmap,
            zoom_level: 1.0,
            export_status: None,
            export_error: None,
            session_error: None,
        }
    }
}

impl PlateVisApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::default()
    }

    fn current_entry(&self) -> Option<&PlateFileEntry> {
        self.files.get(self.current_file)
    }

    /// Data-derived slider bounds for the current file.
    fn data_bounds(&self) -> (f64, f64) {
        match self.current_entry() {
            Some(entry) => (entry.plate.min_value(), entry.plate.max_value()),
            None => (0.0, 100.0),
        }
    }

    /// Reset the threshold band to the current file's value range.
    fn apply_data_thresholds(&mut self) {
        let (min, max) = self.data_bounds();
        self.min_threshold = min;
        self.max_threshold = max;
    }

    fn reset_settings(&mut self) {
        self.apply_data_thresholds();
        self.palette = ColorPalette::BlueRed;
        self.display_mode = DisplayMode::Heatmap;
        self.zoom_level = 1.0;
    }

    fn select_file(&mut self, index: usize) {
        if index < self.files.len() && index != self.current_file {
            self.current_file = index;
            self.apply_data_thresholds();
        }
    }

    /// Open one or more plate-reader exports. Each file is parsed
    /// independently; failures are collected per file.
    fn open_data_files(&mut self) {
        let Some(paths) = rfd::FileDialog::new()
            .add_filter("Excel", &["xlsx", "xls"])
            .pick_files()
        else {
            return;
        };

        self.load_errors.clear();
        let mut loaded_any = false;
        for path in paths {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            match load_plate_file(&path) {
                Ok(plate) => {
                    self.files.push(PlateFileEntry {
                        stem: file_stem(&file_name),
                        file_name,
                        plate,
                    });
                    loaded_any = true;
                }
                Err(e) => {
                    log::warn!("failed to load {}: {}", file_name, e);
                    self.load_errors.push(format!("{}: {}", file_name, e));
                }
            }
        }

        if loaded_any {
            self.current_file = self.files.len() - 1;
            self.apply_data_thresholds();
        }
    }

    fn export_csv(&mut self) {
        let Some(entry) = self.current_entry() else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_file_name(format!("{}_data.csv", entry.stem))
            .save_file()
        else {
            return;
        };
        match write_csv(&entry.plate, &path) {
            Ok(()) => {
                log::info!("exported CSV to {}", path.display());
                self.export_status = Some(format!("Saved {}", path.display()));
                self.export_error = None;
            }
            Err(e) => {
                self.export_error = Some(format!("CSV export failed: {}", e));
                self.export_status = None;
            }
        }
    }

    fn export_xlsx(&mut self) {
        let Some(entry) = self.current_entry() else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Excel", &["xlsx"])
            .set_file_name(format!("{}_data.xlsx", entry.stem))
            .save_file()
        else {
            return;
        };
        match write_xlsx(&entry.plate, &path) {
            Ok(()) => {
                log::info!("exported XLSX to {}", path.display());
                self.export_status = Some(format!("Saved {}", path.display()));
                self.export_error = None;
            }
            Err(e) => {
                self.export_error = Some(format!("XLSX export failed: {}", e));
                self.export_status = None;
            }
        }
    }

    fn save_session(&mut self) {
        let Some(entry) = self.current_entry() else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name(format!("{}_plate.json", entry.stem))
            .save_file()
        else {
            return;
        };
        let session = PlateSession {
            file_name: entry.file_name.clone(),
            plate: entry.plate.clone(),
        };
        match serde_json::to_string_pretty(&session) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    self.session_error = Some(format!("Failed to write file: {}", e));
                } else {
                    self.session_error = None;
                }
            }
            Err(e) => {
                self.session_error = Some(format!("Failed to serialize: {}", e));
            }
        }
    }

    fn load_session(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .pick_file()
        else {
            return;
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str::<PlateSession>(&json) {
                Ok(session) => {
                    let file_name = format!("(loaded) {}", session.file_name);
                    self.files.push(PlateFileEntry {
                        stem: file_stem(&session.file_name),
                        file_name,
                        plate: session.plate,
                    });
                    self.current_file = self.files.len() - 1;
                    self.apply_data_thresholds();
                    self.session_error = None;
                }
                Err(e) => {
                    self.session_error = Some(format!("Failed to parse: {}", e));
                }
            },
            Err(e) => {
                self.session_error = Some(format!("Failed to read file: {}", e));
            }
        }
    }
}

impl eframe::App for PlateVisApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Data Files...").clicked() {
                        self.open_data_files();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Load Plate JSON...").clicked() {
                        self.load_session();
                        ui.close_menu();
                    }
                    let has_plate = !self.files.is_empty();
                    if ui
                        .add_enabled(has_plate, egui::Button::new("Save Plate JSON..."))
                        .clicked()
                    {
                        self.save_session();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui
                        .add_enabled(has_plate, egui::Button::new("Export CSV..."))
                        .clicked()
                    {
                        self.export_csv();
                        ui.close_menu();
                    }
                    if ui
                        .add_enabled(has_plate, egui::Button::new("Export XLSX..."))
                        .clicked()
                    {
                        self.export_xlsx();
                        ui.close_menu();
                    }
                });
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.files.is_empty() {
                    ui.label("Open plate-reader exports (.xlsx / .xls) to begin");
                } else {
                    let mut parts = vec![format!("{} file(s) loaded", self.files.len())];
                    if let Some(entry) = self.current_entry() {
                        let stats = plate_stats(
                            &entry.plate.wells,
                            self.min_threshold,
                            self.max_threshold,
                        );
                        parts.push(entry.file_name.clone());
                        parts.push(format!(
                            "hits: {}/{} ({}%)",
                            stats.wells_in_threshold, stats.non_zero_wells, stats.hit_percentage
                        ));
                    }
                    ui.label(parts.join(" | "));
                }
                if let Some(ref status) = self.export_status {
                    ui.separator();
                    ui.colored_label(egui::Color32::from_rgb(100, 200, 100), status);
                }
            });
        });

        if self.files.is_empty() {
            egui::CentralPanel::default().show(ctx, |ui| {
                self.show_welcome(ui);
            });
            return;
        }

        // File list + settings sidebar
        egui::SidePanel::left("sidebar")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.show_file_list(ui);
                    ui.add_space(10.0);
                    self.show_settings(ui);
                });
            });

        // Main content: the plate grid
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_plate_view(ui);
        });
    }
}

impl PlateVisApp {
    fn show_welcome(&mut self, ui: &mut egui::Ui) {
        ui.add_space(60.0);
        ui.vertical_centered(|ui| {
            ui.heading("96-Well Plate Confluence Visualizer");
            ui.add_space(10.0);
            ui.label("Open plate-reader Excel exports to visualize well confluence.");
            ui.label(
                "Expected: first sheet, data block B5:E101 with 'Well' and '% confluence' columns.",
            );
            ui.add_space(20.0);
            if ui.button("Open Data Files...").clicked() {
                self.open_data_files();
            }
            ui.add_space(10.0);
            for error in &self.load_errors {
                ui.colored_label(egui::Color32::RED, error);
            }
            if let Some(ref error) = self.session_error {
                ui.colored_label(egui::Color32::RED, error);
            }
        });
    }

    fn show_file_list(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Files");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Open...").clicked() {
                    self.open_data_files();
                }
            });
        });
        ui.separator();

        let mut selected = None;
        for (i, entry) in self.files.iter().enumerate() {
            let stats = plate_stats(&entry.plate.wells, self.min_threshold, self.max_threshold);
            ui.horizontal(|ui| {
                let (rect, _) =
                    ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
                ui.painter().rect_filled(
                    rect,
                    5.0,
                    band_color(HitBand::from_percentage(stats.hit_percentage)),
                );
                let label = format!("{} ({}%)", entry.file_name, stats.hit_percentage);
                if ui.selectable_label(i == self.current_file, label).clicked() {
                    selected = Some(i);
                }
            });
        }
        if let Some(i) = selected {
            self.select_file(i);
        }

        // Batch totals across files
        if self.files.len() > 1 {
            ui.add_space(5.0);
            ui.group(|ui| {
                let totals = batch_stats(
                    self.files.iter().map(|f| f.plate.wells.as_slice()),
                    self.min_threshold,
                    self.max_threshold,
                );
                ui.label(format!("All files: {}", totals.files));
                ui.label(format!(
                    "Non-zero wells: {} / {}",
                    totals.non_zero_wells, totals.total_wells
                ));
                ui.colored_label(
                    band_color(HitBand::from_percentage(totals.hit_percentage)),
                    format!(
                        "Total hits: {}/{} ({}%)",
                        totals.wells_in_threshold, totals.non_zero_wells, totals.hit_percentage
                    ),
                );
            });
        }

        if !self.load_errors.is_empty() {
            ui.add_space(5.0);
            for error in &self.load_errors {
                ui.colored_label(egui::Color32::RED, error);
            }
            if ui.small_button("Clear errors").clicked() {
                self.load_errors.clear();
            }
        }
    }

    fn show_settings(&mut self, ui: &mut egui::Ui) {
        ui.heading("Display Settings");
        ui.separator();

        let (data_min, data_max) = self.data_bounds();

        ui.label("Lower threshold:");
        ui.add(egui::Slider::new(
            &mut self.min_threshold,
            data_min..=self.max_threshold.max(data_min),
        ));
        ui.label("Upper threshold:");
        ui.add(egui::Slider::new(
            &mut self.max_threshold,
            self.min_threshold..=data_max.max(self.min_threshold),
        ));
        if self.min_threshold > self.max_threshold {
            self.max_threshold = self.min_threshold;
        }

        ui.add_space(5.0);
        ui.label("Color mapping:");
        ui.horizontal_wrapped(|ui| {
            for palette in ColorPalette::ALL {
                ui.radio_value(&mut self.palette, palette, palette.label());
            }
        });

        ui.add_space(5.0);
        ui.label("Display mode:");
        ui.horizontal(|ui| {
            ui.radio_value(&mut self.display_mode, DisplayMode::Heatmap, "Heatmap");
            ui.radio_value(&mut self.display_mode, DisplayMode::Numeric, "Numeric");
            ui.radio_value(&mut self.display_mode, DisplayMode::Hybrid, "Hybrid");
        });

        ui.add_space(10.0);
        if ui.button("Reset settings").clicked() {
            self.reset_settings();
        }

        if let Some(ref error) = self.export_error {
            ui.add_space(5.0);
            ui.colored_label(egui::Color32::RED, error);
        }
        if let Some(ref error) = self.session_error {
            ui.add_space(5.0);
            ui.colored_label(egui::Color32::RED, error);
        }
    }

    fn show_plate_view(&mut self, ui: &mut egui::Ui) {
        let Some(entry) = self.files.get(self.current_file) else {
            ui.label("Select a file to view its plate.");
            return;
        };
        let file_name = entry.file_name.clone();
        let plate = entry.plate.clone();

        ui.horizontal(|ui| {
            ui.heading(&file_name);
            ui.separator();
            ui.label("Zoom:");
            ui.add(egui::Slider::new(&mut self.zoom_level, 0.5..=2.0));
        });

        let stats = plate_stats(&plate.wells, self.min_threshold, self.max_threshold);
        ui.horizontal(|ui| {
            ui.colored_label(
                band_color(HitBand::from_percentage(stats.hit_percentage)),
                format!(
                    "Hit wells: {}/{} ({}%)",
                    stats.wells_in_threshold, stats.non_zero_wells, stats.hit_percentage
                ),
            );
            ui.separator();
            ui.label(format!(
                "Threshold: {} - {}",
                format_value(self.min_threshold),
                format_value(self.max_threshold)
            ));
        });
        ui.add_space(5.0);

        egui::ScrollArea::both().show(ui, |ui| {
            self.show_plate_grid(ui, &plate);
            ui.add_space(8.0);
            self.show_legend(ui);
        });
    }

    fn show_plate_grid(&self, ui: &mut egui::Ui, plate: &PlateData) {
        let cell = 50.0 * self.zoom_level;
        let label_w: f32 = 28.0;
        let header_h: f32 = 20.0;
        let total_width = label_w + cell * 12.0;
        let total_height = header_h + cell * 8.0;

        let (response, painter) =
            ui.allocate_painter(egui::vec2(total_width, total_height), egui::Sense::hover());
        let origin = response.rect.min;

        // Column headers 1-12
        for col in 0..12 {
            painter.text(
                egui::pos2(
                    origin.x + label_w + col as f32 * cell + cell / 2.0,
                    origin.y + header_h / 2.0,
                ),
                egui::Align2::CENTER_CENTER,
                format!("{}", col + 1),
                egui::FontId::proportional(12.0),
                ui.visuals().text_color(),
            );
        }

        // Row labels A-H
        for row in 0..8 {
            painter.text(
                egui::pos2(
                    origin.x + label_w / 2.0,
                    origin.y + header_h + row as f32 * cell + cell / 2.0,
                ),
                egui::Align2::CENTER_CENTER,
                ((b'A' + row as u8) as char).to_string(),
                egui::FontId::proportional(12.0),
                ui.visuals().text_color(),
            );
        }

        // Well cells
        let mut hovered: Option<usize> = None;
        for (i, well) in plate.wells.iter().enumerate() {
            let cell_rect = egui::Rect::from_min_size(
                egui::pos2(
                    origin.x + label_w + well.col as f32 * cell,
                    origin.y + header_h + well.row as f32 * cell,
                ),
                egui::vec2(cell - 1.0, cell - 1.0),
            );

            let in_band = well.value >= self.min_threshold && well.value <= self.max_threshold;
            let fill = if in_band {
                palette_color(
                    self.palette,
                    gradient_t(well.value, self.min_threshold, self.max_threshold),
                )
            } else {
                OUT_OF_BAND_FILL
            };
            painter.rect_filled(cell_rect, 2.0, fill);

            // In-band wells get a highlight border
            let stroke = if in_band {
                egui::Stroke::new(2.0, egui::Color32::BLACK)
            } else {
                egui::Stroke::new(1.0, egui::Color32::from_gray(200))
            };
            painter.rect_stroke(cell_rect, 2.0, stroke, egui::StrokeKind::Inside);

            // Value text in numeric / hybrid modes
            if self.display_mode != DisplayMode::Heatmap {
                let text_color = if !in_band {
                    egui::Color32::from_gray(130)
                } else if luminance(fill) > 125.0 {
                    egui::Color32::BLACK
                } else {
                    egui::Color32::WHITE
                };
                painter.text(
                    cell_rect.center(),
                    egui::Align2::CENTER_CENTER,
                    format!("{:.1}", well.value),
                    egui::FontId::proportional(11.0 * self.zoom_level.max(0.8)),
                    text_color,
                );
            }

            if let Some(pointer) = response.hover_pos() {
                if cell_rect.contains(pointer) {
                    hovered = Some(i);
                    painter.rect_stroke(
                        cell_rect,
                        2.0,
                        egui::Stroke::new(1.5, egui::Color32::WHITE),
                        egui::StrokeKind::Outside,
                    );
                }
            }
        }

        if let Some(i) = hovered {
            let well = &plate.wells[i];
            let in_band = well.value >= self.min_threshold && well.value <= self.max_threshold;
            let status = if in_band {
                "within threshold"
            } else {
                "outside threshold"
            };
            response.on_hover_text(format!(
                "Well: {}\n% confluence: {:.1}\nStatus: {}",
                well.id, well.value, status
            ));
        }
    }

    /// Gradient legend for the active palette and threshold band.
    fn show_legend(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("% confluence:");
            ui.label(format_value(self.min_threshold));

            let steps = 10;
            let (rect, _) =
                ui.allocate_exact_size(egui::vec2(200.0, 15.0), egui::Sense::hover());
            let step_w = rect.width() / steps as f32;
            for i in 0..steps {
                let t = i as f64 / (steps - 1) as f64;
                let step_rect = egui::Rect::from_min_size(
                    egui::pos2(rect.min.x + i as f32 * step_w, rect.min.y),
                    egui::vec2(step_w + 0.5, rect.height()),
                );
                ui.painter()
                    .rect_filled(step_rect, 0.0, palette_color(self.palette, t));
            }

            ui.label(format_value(self.max_threshold));
            ui.add_space(10.0);

            let (rect, _) =
                ui.allocate_exact_size(egui::vec2(15.0, 15.0), egui::Sense::hover());
            ui.painter().rect_filled(rect, 2.0, OUT_OF_BAND_FILL);
            ui.label("outside threshold");
        });
    }
}

fn file_stem(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file_name.to_string())
}

/// Neutral fill for wells outside the threshold band.
const OUT_OF_BAND_FILL: egui::Color32 = egui::Color32::from_rgb(230, 230, 230);

/// Position of a value within the threshold band, clamped to 0..1.
/// A degenerate band maps everything to the gradient midpoint.
fn gradient_t(value: f64, min: f64, max: f64) -> f64 {
    if max > min {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        0.5
    }
}

/// Convert t (0..1) into the palette's 3-stop gradient RGB.
fn palette_color(palette: ColorPalette, t: f64) -> egui::Color32 {
    let [low, mid, high] = palette.stops();
    let (a, b, s) = if t <= 0.5 {
        (low, mid, t * 2.0)
    } else {
        (mid, high, (t - 0.5) * 2.0)
    };
    egui::Color32::from_rgb(
        (a.0 + (b.0 - a.0) * s).clamp(0.0, 255.0) as u8,
        (a.1 + (b.1 - a.1) * s).clamp(0.0, 255.0) as u8,
        (a.2 + (b.2 - a.2) * s).clamp(0.0, 255.0) as u8,
    )
}

/// Indicator color for a hit-percentage band.
fn band_color(band: HitBand) -> egui::Color32 {
    match band {
        HitBand::High => egui::Color32::from_rgb(16, 185, 129),   // green
        HitBand::Medium => egui::Color32::from_rgb(245, 158, 11), // amber
        HitBand::Low => egui::Color32::from_rgb(239, 68, 68),     // red
        HitBand::None => egui::Color32::from_gray(156),
    }
}

/// Perceived brightness, used to pick readable value-text color.
fn luminance(color: egui::Color32) -> f64 {
    (color.r() as f64 * 299.0 + color.g() as f64 * 587.0 + color.b() as f64 * 114.0) / 1000.0
}
