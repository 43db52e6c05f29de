use crate::error::Result;
use crate::pipeline::PipelineConfig;
use crate::settings::{load_settings, settings_path};

pub fn run() -> Result<()> {
    let settings = load_settings();
    let config = PipelineConfig::from_settings(&settings);
    let path = settings_path();

    println!(
        "Settings:   {}{}",
        path.display(),
        if path.exists() { "" } else { " (not saved, using defaults)" }
    );
    println!("Output dir: {}", config.output_dir.display());
    println!("Combined:   {}", config.combined_path().display());
    println!("Bloomerang: {}", config.target_path().display());
    Ok(())
}
