#[cfg(feature = "gui")]
use eframe::{NativeOptions, egui::ViewportBuilder};
#[cfg(feature = "gui")]
use fesprite::gui::models::FespriteGui;

#[cfg(feature = "gui")]
fn main() -> Result<(), eframe::Error> {
    let options = NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size([900.0, 640.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "FESPRITE",
        options,
        Box::new(|_cc| Ok(Box::new(FespriteGui::default()))),
    )
}

#[cfg(not(feature = "gui"))]
fn main() {
    eprintln!("GUI feature is not enabled. Please build with --features gui");
    std::process::exit(1);
}
