#![cfg(not(tarpaulin_include))]

use smart_timetable::app;
use smart_timetable::config::AppConfig;
use std::env;
use std::path::Path;

/// Main entry point for the timetable web application.
///
/// Serves the interactive lookup page and the JSON/export API. An
/// optional first argument overrides the data directory (default
/// `./data`).
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config = if args.len() >= 2 {
        AppConfig::from_data_dir(Path::new(&args[1]))
    } else {
        AppConfig::default()
    };

    app::run(config).await
}
