//! wind-stats command-line tool.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use netcdf_parser::silence_hdf5_errors;
use wind_common::{LatLonBox, SectorSpec, Statistic};
use wind_sectors::{AggregateRequest, CountRequest};
use wind_stats::commands::{run_aggregate, run_count, run_ensemble, MemberFiles};
use wind_stats::{load_run_config, run_batch, Report};

#[derive(Parser, Debug)]
#[command(name = "wind-stats")]
#[command(about = "Wind-direction sector statistics for WRF output")]
struct Cli {
    /// Log level
    #[arg(long, global = true, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Aggregate one field of a WRF file by wind sector
    Aggregate {
        #[command(flatten)]
        files: FileArgs,

        /// Field to aggregate, or "wind-speed"
        #[arg(long, default_value = "T2")]
        field: String,

        /// "mean" or a percentile between 0 and 100
        #[arg(long, default_value = "mean")]
        statistic: Statistic,
    },

    /// Count time steps per wind sector
    Count {
        #[command(flatten)]
        files: FileArgs,

        /// Field whose 95th percentile defines a heatwave step
        #[arg(long, default_value = "T2")]
        heatwave_field: String,
    },

    /// Process every model of a YAML run file
    Run {
        /// Run file path
        #[arg(short, long, env = "WIND_STATS_CONFIG")]
        config: PathBuf,

        /// Only process these models (default: all configured)
        #[arg(short, long)]
        model: Vec<String>,
    },

    /// Ensemble-mean sector anomalies from existing result files
    Ensemble {
        /// Output NetCDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Print a JSON summary of the written grids
        #[arg(long)]
        summary: bool,

        /// Member result files as HIST.nc:FUT.nc
        #[arg(required = true)]
        members: Vec<MemberFiles>,
    },
}

/// Options shared by the single-file commands.
#[derive(Args, Debug)]
struct FileArgs {
    /// WRF NetCDF input file
    #[arg(short, long)]
    input: PathBuf,

    /// Output NetCDF file
    #[arg(short, long)]
    output: PathBuf,

    /// Sectors as LABEL:START:END,... (default: NE, SE, SW, NW quadrants)
    #[arg(long, value_parser = SectorSpec::parse_list)]
    sectors: Option<SectorSpec>,

    /// Leave steps with wind speed at or below this value (m/s) out of every sector
    #[arg(long, default_value_t = 0.0)]
    min_speed: f64,

    /// Keep only steps above the per-cell 95th percentile
    #[arg(long)]
    heatwave: bool,

    /// Mask as lon_min,lon_max,lat_min,lat_max
    #[arg(long, value_parser = LatLonBox::from_mask_string, allow_hyphen_values = true)]
    mask: Option<LatLonBox>,

    /// Print a JSON summary of the written grids
    #[arg(long)]
    summary: bool,
}

impl FileArgs {
    fn sectors(&self) -> SectorSpec {
        self.sectors.clone().unwrap_or_else(SectorSpec::quadrants)
    }
}

fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format);
    silence_hdf5_errors();

    match execute(cli.command) {
        Ok((report, print)) => {
            if print {
                if let Err(e) = report.write_json(io::stdout().lock()) {
                    error!(error = %format!("{:#}", e), "Failed to print report");
                    return ExitCode::FAILURE;
                }
            }
            if report.is_success() {
                ExitCode::SUCCESS
            } else {
                error!(failures = report.failures.len(), "Finished with failures");
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            error!(error = %format!("{:#}", e), "wind-stats failed");
            ExitCode::FAILURE
        }
    }
}

/// Run a command; the flag says whether its report goes to stdout.
fn execute(command: Command) -> Result<(Report, bool)> {
    match command {
        Command::Aggregate {
            files,
            field,
            statistic,
        } => {
            let request = AggregateRequest::new(files.sectors())
                .field(field)
                .statistic(statistic)
                .min_speed(files.min_speed)
                .heatwave_filter(files.heatwave);
            let output = run_aggregate(&files.input, &files.output, &request, files.mask.as_ref(), files.summary)?;
            Ok((Report::single(output), files.summary))
        }
        Command::Count {
            files,
            heatwave_field,
        } => {
            let request = CountRequest::new(files.sectors())
                .min_speed(files.min_speed)
                .heatwave_filter(files.heatwave)
                .heatwave_field(heatwave_field);
            let output = run_count(&files.input, &files.output, &request, files.mask.as_ref(), files.summary)?;
            Ok((Report::single(output), files.summary))
        }
        Command::Run { config, model } => {
            let run = load_run_config(&config)?;
            info!(config = %config.display(), models = ?run.models, "Loaded run config");
            let report = run_batch(&run, &model)?;
            // Failures are listed in the report, so print it whenever there are any
            let print = run.summary || !report.is_success();
            Ok((report, print))
        }
        Command::Ensemble {
            output,
            summary,
            members,
        } => {
            let output = run_ensemble(&members, &output, summary)?;
            Ok((Report::single(output), summary))
        }
    }
}

fn init_tracing(log_level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
