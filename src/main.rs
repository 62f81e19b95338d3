use std::path::PathBuf;

use eframe::egui;

mod app;
mod clipboard;
mod editor;
mod export;
mod load;
mod model;

use app::AreaEditApp;

fn main() {
    env_logger::init();

    // Optional image path; an image can also be opened, dropped or pasted
    // once the window is up.
    let image_path = std::env::args().nth(1).map(PathBuf::from);
    if let Some(path) = &image_path {
        if !path.exists() {
            eprintln!("File not found: {}", path.display());
            std::process::exit(1);
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("area-edit"),
        ..Default::default()
    };

    eframe::run_native(
        "area-edit",
        options,
        Box::new(move |_cc| Ok(Box::new(AreaEditApp::new(image_path)))),
    )
    .expect("Failed to run eframe");
}
