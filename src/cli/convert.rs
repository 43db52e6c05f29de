use colored::Colorize;

use crate::cli::read_sources;
use crate::error::Result;
use crate::pipeline::{run_batch, write_outputs, PipelineConfig};
use crate::settings::{load_settings, shellexpand_path};

pub fn run(files: &[String], output_dir: Option<String>) -> Result<()> {
    let mut config = PipelineConfig::from_settings(&load_settings());
    if let Some(dir) = output_dir {
        config = config.with_output_dir(shellexpand_path(&dir));
    }

    let sources = read_sources(files)?;
    let output = run_batch(&sources)?;
    let paths = write_outputs(&output, &config)?;

    println!("{}", "Files processed successfully.".green().bold());
    println!("Total Rows Processed: {}", output.row_count());
    println!("Combined CSV:         {}", paths.combined.display());
    println!("Bloomerang-ready CSV: {}", paths.target.display());
    Ok(())
}
