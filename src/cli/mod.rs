pub mod convert;
pub mod init;
pub mod preview;
pub mod status;

use std::path::Path;

use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::models::SourceFile;
use crate::pipeline::is_csv_name;

/// Read the given exports in argument order, skipping anything that is not a CSV.
pub(crate) fn read_sources(files: &[String]) -> Result<Vec<SourceFile>> {
    let mut sources = Vec::with_capacity(files.len());
    for file in files {
        let path = Path::new(file);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file.clone());
        if !is_csv_name(&name) {
            tracing::warn!(file = %file, "skipping non-CSV file");
            continue;
        }
        let bytes = std::fs::read(path)?;
        sources.push(SourceFile { name, bytes });
    }
    Ok(sources)
}

#[derive(Parser)]
#[command(
    name = "benevity-bridge",
    about = "Convert Benevity donation exports into a Bloomerang-ready CSV."
)]
pub struct Cli {
    /// Log each file as it is processed
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose where converted files are written.
    Init {
        /// Output directory (default: ~/Documents/benevity-bridge)
        #[arg(long = "output-dir")]
        output_dir: Option<String>,
    },
    /// Show the current settings and output paths.
    Status,
    /// Combine Benevity exports and write the Bloomerang import file.
    Convert {
        /// Benevity CSV exports, processed in the order given
        #[arg(required = true)]
        files: Vec<String>,
        /// Write to this directory instead of the configured one
        #[arg(long = "output-dir")]
        output_dir: Option<String>,
    },
    /// Show the Bloomerang rows a conversion would produce without writing them.
    Preview {
        /// Benevity CSV exports, processed in the order given
        #[arg(required = true)]
        files: Vec<String>,
        /// Maximum number of rows to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },
}
