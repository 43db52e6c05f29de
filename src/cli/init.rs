use std::path::PathBuf;

use crate::error::Result;
use crate::settings::{load_settings, save_settings, shellexpand_path, Settings};

pub fn run(output_dir: Option<String>) -> Result<()> {
    let mut settings = load_settings();
    let defaults = Settings::default();

    if let Some(dir) = output_dir {
        settings.output_dir = shellexpand_path(&dir);
    } else if settings.output_dir == defaults.output_dir {
        println!("Output directory [{}]: ", settings.output_dir);
        let mut input = String::new();
        std::io::stdin().read_line(&mut input).ok();
        let chosen = input.trim();
        if !chosen.is_empty() {
            settings.output_dir = shellexpand_path(chosen);
        }
    }

    save_settings(&settings)?;

    let resolved = PathBuf::from(&settings.output_dir);
    std::fs::create_dir_all(&resolved)?;

    println!("Converted files will be written to {}", resolved.display());
    Ok(())
}
