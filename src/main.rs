use anyhow::{Context, Result, anyhow};
use eframe::egui;
use graduation_dashboard::app::GraduationDashboardApp;
use graduation_dashboard::config::DashboardConfig;
use graduation_dashboard::data;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::from_env();

    // The dataset is loaded once; a missing or malformed file ends the process.
    let dataset = data::loader::load_file(&config.data_path).inspect_err(|e| {
        log::error!("Failed to load dataset: {e:#}");
    })?;
    log::info!(
        "Loaded {} students from {} with feature columns {:?}",
        dataset.len(),
        config.data_path.display(),
        dataset.feature_names
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Graduation Prediction Dashboard",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(GraduationDashboardApp::new(
                dataset,
                config.histogram_bins,
            )))
        }),
    )
    .map_err(|e| anyhow!("{e}"))
    .context("running dashboard window")
}
