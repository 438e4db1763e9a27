//! 96-well plate confluence visualizer.

mod app;
mod plate;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 840.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "96-Well Plate Confluence Visualizer",
        options,
        Box::new(|cc| Ok(Box::new(app::PlateVisApp::new(cc)))),
    )
}
