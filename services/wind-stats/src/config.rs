//! Run file for batch processing of several WRF models.
//!
//! A run file names the models, where their historical and future WRF files
//! live, what to compute, and where results go. Paths are templates with a
//! `{model}` placeholder; output names also take `{field}` and `{period}`.
//!
//! Supports environment variable substitution using ${VAR} syntax.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use wind_common::LatLonBox;
use wind_sectors::{AggregateRequest, CountRequest, Period};

// ============================================================================
// Run Configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Model names substituted for `{model}`
    pub models: Vec<String>,
    pub inputs: InputConfig,
    /// Mask as "lon_min,lon_max,lat_min,lat_max"
    #[serde(default)]
    pub mask: Option<String>,
    /// Degrees added on every side of the mask before cropping
    #[serde(default)]
    pub mask_margin: f64,
    #[serde(default)]
    pub mode: RunMode,
    #[serde(default)]
    pub aggregate: AggregateRequest,
    #[serde(default)]
    pub count: CountRequest,
    pub output: OutputConfig,
    /// Print a JSON summary of every written grid to stdout
    #[serde(default)]
    pub summary: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Historical-period WRF file template
    pub historical: String,
    /// Future-period WRF file template
    #[serde(default)]
    pub future: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Aggregate,
    Count,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
    #[serde(default = "default_pattern")]
    pub pattern: String,
    /// Ensemble anomaly file, relative to `dir`
    #[serde(default)]
    pub ensemble: Option<String>,
}

fn default_pattern() -> String {
    "{field}quad_{period}_{model}.nc".to_string()
}

impl RunConfig {
    /// Parsed mask, grown by `mask_margin`.
    pub fn mask_box(&self) -> Result<Option<LatLonBox>> {
        self.mask
            .as_deref()
            .map(|s| {
                LatLonBox::from_mask_string(s)
                    .map(|bbox| bbox.expanded(self.mask_margin))
                    .with_context(|| format!("Invalid mask '{}'", s))
            })
            .transpose()
    }

    /// Periods with an input template, in processing order.
    pub fn periods(&self) -> Vec<Period> {
        let mut periods = vec![Period::Historical];
        if self.inputs.future.is_some() {
            periods.push(Period::Future);
        }
        periods
    }

    pub fn input_path(&self, period: Period, model: &str) -> Option<PathBuf> {
        let template = match period {
            Period::Historical => Some(&self.inputs.historical),
            Period::Future => self.inputs.future.as_ref(),
            Period::Change => None,
        }?;
        Some(PathBuf::from(template.replace("{model}", model)))
    }

    pub fn output_path(&self, field: &str, period: Period, model: &str) -> PathBuf {
        let name = self
            .output
            .pattern
            .replace("{field}", field)
            .replace("{period}", period.as_str())
            .replace("{model}", model);
        self.output.dir.join(name)
    }

    /// Ensemble output path; only set when both periods are configured.
    pub fn ensemble_path(&self) -> Option<PathBuf> {
        match (&self.output.ensemble, &self.inputs.future) {
            (Some(name), Some(_)) => Some(self.output.dir.join(name)),
            _ => None,
        }
    }

    /// Prefix used for `{field}` in output names.
    pub fn output_field(&self) -> &str {
        match self.mode {
            RunMode::Aggregate => &self.aggregate.field,
            RunMode::Count => wind_sectors::WIND_DAYS_PREFIX,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load and parse a run file with environment variable substitution
pub fn load_run_config<P: AsRef<Path>>(path: P) -> Result<RunConfig> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read run config from {:?}", path.as_ref()))?;

    parse_run_config(&content)
        .with_context(|| format!("Invalid run config {:?}", path.as_ref()))
}

/// Parse run file content, expanding environment variables first.
pub fn parse_run_config(content: &str) -> Result<RunConfig> {
    let expanded = expand_env_vars(content)?;

    let config: RunConfig =
        serde_yaml::from_str(&expanded).with_context(|| "Failed to parse run config YAML")?;

    validate_run_config(&config)?;

    Ok(config)
}

// ============================================================================
// Environment Variable Expansion
// ============================================================================

/// Expand environment variables in YAML content
/// Supports ${VAR} and ${VAR:-default} syntax
fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::new();
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'

            let mut var_expr = String::new();
            let mut brace_count = 1;

            while brace_count > 0 {
                match chars.next() {
                    Some('{') => {
                        brace_count += 1;
                        var_expr.push('{');
                    }
                    Some('}') => {
                        brace_count -= 1;
                        if brace_count > 0 {
                            var_expr.push('}');
                        }
                    }
                    Some(c) => var_expr.push(c),
                    None => anyhow::bail!("Unclosed variable substitution: ${{{}", var_expr),
                }
            }

            result.push_str(&resolve_var_expr(&var_expr)?);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}

/// Resolve variable expression (supports VAR and VAR:-default syntax)
fn resolve_var_expr(expr: &str) -> Result<String> {
    if let Some((var_name, default)) = expr.split_once(":-") {
        match std::env::var(var_name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        }
    } else {
        std::env::var(expr.trim()).with_context(|| format!("Environment variable {} not set", expr))
    }
}

// ============================================================================
// Validation
// ============================================================================

fn validate_run_config(config: &RunConfig) -> Result<()> {
    anyhow::ensure!(!config.models.is_empty(), "At least one model is required");
    anyhow::ensure!(
        config.models.iter().all(|m| !m.trim().is_empty()),
        "Model names cannot be empty"
    );

    let mut seen = std::collections::HashSet::new();
    for model in &config.models {
        anyhow::ensure!(seen.insert(model.as_str()), "Duplicate model: {}", model);
    }

    anyhow::ensure!(
        config.inputs.historical.contains("{model}") || config.models.len() == 1,
        "inputs.historical must contain {{model}} when more than one model is configured"
    );
    anyhow::ensure!(
        config.output.pattern.contains("{model}") && config.output.pattern.contains("{period}"),
        "output.pattern must contain {{model}} and {{period}}: {}",
        config.output.pattern
    );
    anyhow::ensure!(
        config.mask_margin.is_finite() && config.mask_margin >= 0.0,
        "mask_margin must be a non-negative number"
    );
    config.mask_box()?;

    match config.mode {
        RunMode::Aggregate => config.aggregate.validate()?,
        RunMode::Count => {
            anyhow::ensure!(
                config.count.min_speed.is_finite() && config.count.min_speed >= 0.0,
                "count.min_speed must be a non-negative number"
            );
            anyhow::ensure!(
                config.output.ensemble.is_none(),
                "Ensemble anomalies need mode: aggregate"
            );
        }
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
