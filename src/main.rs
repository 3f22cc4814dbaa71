use eframe::egui;
use heic_converter::app::ConverterApp;

fn main() -> eframe::Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([560.0, 680.0])
            .with_min_inner_size([420.0, 480.0])
            .with_title("HEIC Converter"),
        ..Default::default()
    };
    eframe::run_native(
        "HEIC Converter",
        options,
        Box::new(|cc| Ok(Box::new(ConverterApp::new(cc)))),
    )
}
