//! Batch processing of every model in a run file.
//!
//! Each model is loaded, aggregated (or counted) and written for every
//! configured period. A model that fails is recorded and skipped; the
//! remaining models still run. With both periods and an ensemble file
//! configured, the anomalies of every successful model are averaged and
//! written at the end.

use anyhow::{Context, Result};
use netcdf_parser::{write_aggregation, write_ensemble, write_wind_day_counts};
use tracing::{error, info, warn};
use wind_common::LatLonBox;
use wind_sectors::{AggregationResult, EnsembleAccumulator};

use crate::commands::{aggregate_file, count_file};
use crate::config::{RunConfig, RunMode};
use crate::report::{Failure, OutputReport, Report};

/// Model name used for failures of the ensemble step itself.
pub const ENSEMBLE: &str = "ensemble";

/// Process every configured model, or only those in `only` when given.
///
/// Errors in the configuration itself (an unparsable mask, an unknown model
/// in `only`) are returned; per-model errors end up in the report.
pub fn run_batch(config: &RunConfig, only: &[String]) -> Result<Report> {
    for name in only {
        anyhow::ensure!(
            config.models.contains(name),
            "Model {} is not in the run config (known: {:?})",
            name,
            config.models
        );
    }
    let mask = config.mask_box()?;

    let models: Vec<&String> = config
        .models
        .iter()
        .filter(|m| only.is_empty() || only.contains(*m))
        .collect();

    let ensemble_path = config.ensemble_path();
    let mut accumulator = ensemble_path
        .as_ref()
        .map(|_| EnsembleAccumulator::new(&config.aggregate.sectors));

    info!(
        models = models.len(),
        mode = ?config.mode,
        periods = ?config.periods(),
        ensemble = ensemble_path.is_some(),
        "Starting batch run"
    );

    let mut report = Report::default();
    for model in models {
        match process_model(config, model, mask.as_ref()) {
            Ok(processed) => {
                report.outputs.extend(processed.outputs);
                if let (Some(acc), [hist, fut]) = (accumulator.as_mut(), processed.results.as_slice()) {
                    if let Err(e) = acc.add_member(model.as_str(), hist, fut) {
                        let e = anyhow::Error::new(e).context("Not added to the ensemble");
                        warn!(model = %model, error = %e, "Skipping ensemble member");
                        report.failures.push(Failure::new(model.as_str(), &e));
                    }
                }
            }
            Err(e) => {
                error!(model = %model, error = %format!("{:#}", e), "Model failed");
                report.failures.push(Failure::new(model.as_str(), &e));
            }
        }
    }

    if let (Some(acc), Some(path)) = (accumulator, ensemble_path) {
        let written = acc
            .finish()
            .context("No model completed both periods")
            .and_then(|ensemble| {
                write_ensemble(&path, &ensemble)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                let output = OutputReport::new(&path);
                Ok(if config.summary {
                    output.with_ensemble(&ensemble)
                } else {
                    output
                })
            });
        match written {
            Ok(output) => report.outputs.push(output),
            Err(e) => {
                error!(error = %format!("{:#}", e), "Ensemble failed");
                report.failures.push(Failure::new(ENSEMBLE, &e));
            }
        }
    }

    info!(
        outputs = report.outputs.len(),
        failures = report.failures.len(),
        "Batch run finished"
    );
    Ok(report)
}

/// Files written for one model and, in aggregate mode, the results kept for
/// the ensemble in period order.
struct ModelOutputs {
    outputs: Vec<OutputReport>,
    results: Vec<AggregationResult>,
}

fn process_model(config: &RunConfig, model: &str, mask: Option<&LatLonBox>) -> Result<ModelOutputs> {
    let mut processed = ModelOutputs {
        outputs: Vec::new(),
        results: Vec::new(),
    };

    for period in config.periods() {
        let input = config
            .input_path(period, model)
            .with_context(|| format!("No input configured for {}", period))?;
        let output = config.output_path(config.output_field(), period, model);
        info!(model, %period, input = %input.display(), "Processing");

        let report = OutputReport::new(&output).for_model(model, period);
        let report = match config.mode {
            RunMode::Aggregate => {
                let result = aggregate_file(&input, &config.aggregate, mask)?;
                write_aggregation(&output, &result)
                    .with_context(|| format!("Failed to write {}", output.display()))?;
                let report = if config.summary {
                    report.with_grids(result.grids())
                } else {
                    report
                };
                processed.results.push(result);
                report
            }
            RunMode::Count => {
                let counts = count_file(&input, &config.count, mask)?;
                write_wind_day_counts(&output, &counts)
                    .with_context(|| format!("Failed to write {}", output.display()))?;
                if config.summary {
                    report.with_grids(&counts)
                } else {
                    report
                }
            }
        };
        processed.outputs.push(report);
    }

    Ok(processed)
}
