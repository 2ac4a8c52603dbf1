mod app;
mod color;
mod config;
mod report;
mod state;
mod ui;

use app::BikeDashboardApp;
use bike_rental_dashboard::data;
use clap::Parser;
use config::Config;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();
    let config = Config::parse();

    if config.summary {
        if let Err(e) = report::print_summary(&config) {
            log::error!("{e:#}");
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Bike Rental Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(BikeDashboardApp::new(&config)))),
    )
}
