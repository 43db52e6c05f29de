use std::path::{Path, PathBuf};

use crate::error::{BridgeError, Result};
use crate::fmt::amount;
use crate::mapper::{combine, to_target, TARGET_HEADERS};
use crate::models::{CombinedTable, SourceFile, TargetRecord};
use crate::normalizer::{normalize, read_export};
use crate::settings::Settings;

/// Where a batch writes its two tables.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub output_dir: PathBuf,
    pub combined_file_name: String,
    pub target_file_name: String,
}

impl PipelineConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            output_dir: PathBuf::from(&settings.output_dir),
            combined_file_name: settings.combined_file_name.clone(),
            target_file_name: settings.target_file_name.clone(),
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn combined_path(&self) -> PathBuf {
        self.output_dir.join(&self.combined_file_name)
    }

    pub fn target_path(&self) -> PathBuf {
        self.output_dir.join(&self.target_file_name)
    }
}

#[derive(Debug)]
pub struct BatchOutput {
    pub combined: CombinedTable,
    pub target: Vec<TargetRecord>,
}

impl BatchOutput {
    pub fn row_count(&self) -> usize {
        self.target.len()
    }

    pub fn combined_csv(&self) -> Result<Vec<u8>> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(&self.combined.headers)?;
        for row in &self.combined.rows {
            wtr.write_record(&row.fields)?;
        }
        wtr.into_inner().map_err(|e| BridgeError::Io(e.into_error()))
    }

    pub fn target_csv(&self) -> Result<Vec<u8>> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(TARGET_HEADERS)?;
        for gift in &self.target {
            wtr.write_record([
                gift.account_number.as_str(),
                gift.first_name.as_str(),
                gift.last_name.as_str(),
                gift.organization.as_str(),
                gift.date.as_str(),
                amount(gift.amount).as_str(),
                gift.fund.as_str(),
                gift.transaction_method.as_str(),
                gift.email.as_str(),
                gift.source.as_str(),
            ])?;
        }
        wtr.into_inner().map_err(|e| BridgeError::Io(e.into_error()))
    }
}

pub fn is_csv_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map_or(false, |e| e.eq_ignore_ascii_case("csv"))
}

/// Normalize every file in upload order, combine, and map. Any failing file
/// fails the whole batch.
pub fn run_batch(files: &[SourceFile]) -> Result<BatchOutput> {
    let mut tables = Vec::with_capacity(files.len());
    for file in files {
        let raw = read_export(file)?;
        tables.push(normalize(raw)?);
    }
    let combined = combine(tables)?;
    let target = to_target(&combined)?;
    tracing::info!(
        files = files.len(),
        rows = target.len(),
        "processed batch"
    );
    Ok(BatchOutput { combined, target })
}

#[derive(Debug)]
pub struct OutputPaths {
    pub combined: PathBuf,
    pub target: PathBuf,
}

/// Overwrite both output files. Nothing is written unless both tables render.
pub fn write_outputs(output: &BatchOutput, config: &PipelineConfig) -> Result<OutputPaths> {
    let combined_bytes = output.combined_csv()?;
    let target_bytes = output.target_csv()?;

    std::fs::create_dir_all(&config.output_dir)?;
    let paths = OutputPaths {
        combined: config.combined_path(),
        target: config.target_path(),
    };
    std::fs::write(&paths.combined, combined_bytes)?;
    std::fs::write(&paths.target, target_bytes)?;
    tracing::debug!(
        combined = %paths.combined.display(),
        target = %paths.target.display(),
        "wrote outputs"
    );
    Ok(paths)
}
