//! Application entry point for the cluster animation viewer.
//!
//! This binary sets up logging and eframe/egui and delegates all
//! interactive logic and rendering to [`Viewer`] from the `viewer` module.

mod afterimage;
mod viewer;

use cluster_core::config::Config;
use viewer::Viewer;

/// Reads the configuration named by the first command-line argument.
///
/// Without an argument the defaults are used. A file that cannot be read
/// or parsed is reported and the defaults are used instead.
fn load_config() -> Config {
    let Some(path) = std::env::args().nth(1) else {
        return Config::default();
    };

    match Config::load(&path) {
        Ok(cfg) => {
            log::info!("loaded config from {}", path);
            cfg
        }
        Err(e) => {
            log::error!("{} ({}); falling back to defaults", e, path);
            Config::default()
        }
    }
}

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if eframe fails to create the native window or event loop.
fn main() -> eframe::Result<()> {
    env_logger::init();
    log::info!("Cluster Drift starting...");

    let cfg = load_config();
    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Cluster Drift",
        options,
        Box::new(|_cc| Ok(Box::new(Viewer::new(cfg)))),
    )
}
