use eframe::egui;
use log::{error, info};

mod ui;

use ui::WaterMeterApp;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();
    info!("Starting WaterMeter egui application");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("WaterMeter")
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "WaterMeter",
        options,
        Box::new(|_cc| match WaterMeterApp::new() {
            Ok(app) => {
                info!("Successfully initialized WaterMeter app");
                Ok(Box::new(app))
            }
            Err(e) => {
                error!("Failed to initialize app: {}", e);
                Err(format!("Failed to initialize app: {}", e).into())
            }
        }),
    )
}
