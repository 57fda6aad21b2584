// Small dev utility: export the hourly and operator CSV reports of one model.
//
// Usage:
//   cargo run --bin export_daily_report -- [data_dir] [line] [model] [out_dir]
//
// If model is empty or "-", the line's active model is exported.
// Reading the model runs the day rollover check first, so the export may persist a reset.

use std::path::PathBuf;

use production_tracker::app::{get_default_data_dir, AppState};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    production_tracker::logging::init();

    let mut args = std::env::args().skip(1);
    let data_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(get_default_data_dir);
    let line = args.next().ok_or("missing line name")?;
    let model = args
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && s != "-");
    let out_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let state = AppState::new(&data_dir)?;
    let model = match model {
        Some(m) => m,
        None => state.production_api.get_active_model(&line)?.model_name,
    };
    let files = state.export_api.export_model_to_dir(&line, &model, &out_dir)?;
    for file in files {
        println!("{}", file.display());
    }
    Ok(())
}
