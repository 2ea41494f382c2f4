use anyhow::Context;
use log::info;
use voter_difficulty::{PipelineConfig, run_with_progress};

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = PipelineConfig::default();
    for line in config.to_string().lines() {
        info!("{line}");
    }

    let report = run_with_progress(&config, true).with_context(|| {
        format!(
            "Failed to build voter difficulty dataset from {}",
            config.input_path.display()
        )
    })?;

    info!("Analytic table: {}", report.paths.table.display());
    info!("Statistics: {}", report.paths.statistics.display());
    Ok(())
}
