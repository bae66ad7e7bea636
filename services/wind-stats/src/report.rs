//! JSON run report written to stdout.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use wind_sectors::{summarize, EnsembleAnomalies, FieldSummary, Period, SectorGrids};

/// One written file.
#[derive(Debug, Clone, Serialize)]
pub struct OutputReport {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldSummary>,
}

impl OutputReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            model: None,
            period: None,
            fields: Vec::new(),
        }
    }

    pub fn for_model(mut self, model: impl Into<String>, period: Period) -> Self {
        self.model = Some(model.into());
        self.period = Some(period);
        self
    }

    pub fn with_grids<T: Copy + Into<f64>>(mut self, grids: &SectorGrids<T>) -> Self {
        self.fields = grids.summaries();
        self
    }

    pub fn with_ensemble(mut self, ensemble: &EnsembleAnomalies) -> Self {
        self.fields = ensemble
            .variables()
            .into_iter()
            .map(|(name, grid)| summarize(name, grid))
            .collect();
        self
    }
}

/// A model that could not be processed.
#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    pub model: String,
    pub error: String,
}

impl Failure {
    pub fn new(model: impl Into<String>, error: &anyhow::Error) -> Self {
        Self {
            model: model.into(),
            // Full context chain on one line
            error: format!("{:#}", error),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub outputs: Vec<OutputReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<Failure>,
}

impl Report {
    pub fn single(output: OutputReport) -> Self {
        Self {
            outputs: vec![output],
            failures: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Pretty JSON followed by a newline.
    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self).context("Failed to serialize report")?;
        writeln!(writer)?;
        Ok(())
    }
}
