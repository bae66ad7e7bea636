//! Wind-sector statistics for gridded model output.
//!
//! The centre of this crate is [`aggregate`]: time steps at every grid cell
//! are bucketed by wind direction and each bucket of a target field (usually
//! 2 m temperature) is reduced to a mean or percentile.
//!
//! ```ignore
//! use wind_common::{SectorSpec, Statistic};
//! use wind_sectors::{aggregate, AggregateRequest};
//!
//! let request = AggregateRequest::new(SectorSpec::quadrants())
//!     .field("T2")
//!     .min_speed(1.0)
//!     .statistic(Statistic::median());
//! let result = aggregate(&series, &request)?;
//! let warm_side = result.get("T2_SW");
//! ```
//!
//! Around it sit the pieces needed to use the result: wind-day counts per
//! sector, sector anomalies averaged over a model ensemble, and per-field
//! summaries for reporting.

pub mod aggregate;
pub mod count;
pub mod direction;
pub mod ensemble;
mod filter;
pub mod grids;
pub mod reduce;
pub mod summary;

pub use aggregate::{aggregate, AggregateRequest, AggregationResult};
pub use count::{count_wind_days, CountRequest, WindDayCounts, WIND_DAYS_PREFIX};
pub use direction::{wind_direction, wind_speed};
pub use ensemble::{sector_anomaly, EnsembleAccumulator, EnsembleAnomalies, Period};
pub use grids::SectorGrids;
pub use reduce::{nan_mean, nan_percentile, reduce};
pub use summary::{summarize, FieldSummary};

/// Percentile used as the per-cell heatwave threshold.
pub const HEATWAVE_PERCENTILE: f64 = 95.0;
