//! Wind-sector aggregation of a gridded field.
//!
//! For every grid cell independently, time steps are filtered (optional
//! heatwave filter, optional minimum wind speed), the remaining values of
//! the target field are reduced over all directions, and then once per
//! sector over the steps whose wind direction falls inside it.
//!
//! Cells are processed in parallel. Each cell only reads its own column of
//! the input, so the output does not depend on scheduling.

use ndarray::{s, Array2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use wind_common::{
    GriddedTimeSeries, SectorSpec, Statistic, WindStatsError, WindStatsResult,
};

use crate::filter::StepFilter;
use crate::grids::SectorGrids;
use crate::reduce::reduce;

/// Parameters of one aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateRequest {
    /// Direction sectors, in output order.
    pub sectors: SectorSpec,
    /// Field to summarize, or `wind-speed` for the derived speed.
    pub field: String,
    /// When positive, steps with `hypot(U, V) <= min_speed` are left out
    /// of every sector. The all-direction statistic keeps them.
    pub min_speed: f64,
    pub statistic: Statistic,
    /// Keep only steps above the per-cell 95th percentile of `field`.
    pub heatwave_filter: bool,
}

impl Default for AggregateRequest {
    fn default() -> Self {
        Self {
            sectors: SectorSpec::quadrants(),
            field: "T2".to_string(),
            min_speed: 0.0,
            statistic: Statistic::Mean,
            heatwave_filter: false,
        }
    }
}

impl AggregateRequest {
    /// Mean of `T2` over the given sectors with no filtering.
    pub fn new(sectors: SectorSpec) -> Self {
        Self {
            sectors,
            ..Default::default()
        }
    }

    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    pub fn min_speed(mut self, min_speed: f64) -> Self {
        self.min_speed = min_speed;
        self
    }

    pub fn statistic(mut self, statistic: Statistic) -> Self {
        self.statistic = statistic;
        self
    }

    pub fn heatwave_filter(mut self, enabled: bool) -> Self {
        self.heatwave_filter = enabled;
        self
    }

    /// Check the statistic and speed threshold before any work is done.
    pub fn validate(&self) -> WindStatsResult<()> {
        self.statistic.validate()?;
        validate_min_speed(self.min_speed)
    }
}

pub(crate) fn validate_min_speed(min_speed: f64) -> WindStatsResult<()> {
    if !min_speed.is_finite() || min_speed < 0.0 {
        return Err(WindStatsError::invalid_parameter(
            "min_speed",
            format!("{} must be a finite, non-negative speed", min_speed),
        ));
    }
    Ok(())
}

/// Result of [`aggregate`]: `<field>_all` and `<field>_<label>` grids.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationResult {
    grids: SectorGrids<f32>,
    statistic: Statistic,
}

impl AggregationResult {
    pub fn new(grids: SectorGrids<f32>, statistic: Statistic) -> Self {
        Self { grids, statistic }
    }

    /// Name of the summarized field.
    pub fn field(&self) -> &str {
        self.grids.prefix()
    }

    pub fn statistic(&self) -> Statistic {
        self.statistic
    }

    pub fn sectors(&self) -> &SectorSpec {
        self.grids.sectors()
    }

    pub fn grids(&self) -> &SectorGrids<f32> {
        &self.grids
    }

    pub fn into_grids(self) -> SectorGrids<f32> {
        self.grids
    }

    pub fn all(&self) -> &Array2<f32> {
        self.grids.all()
    }

    pub fn sector(&self, label: &str) -> Option<&Array2<f32>> {
        self.grids.sector(label)
    }

    /// Look up a grid by full variable name, e.g. `T2_all` or `T2_NE`.
    pub fn get(&self, name: &str) -> Option<&Array2<f32>> {
        self.grids.get(name)
    }

    pub fn variables(&self) -> Vec<(String, &Array2<f32>)> {
        self.grids.variables()
    }

    pub fn variable_name(&self, label: &str) -> String {
        self.grids.variable_name(label)
    }

    pub fn lat(&self) -> &Array2<f32> {
        self.grids.lat()
    }

    pub fn lon(&self) -> &Array2<f32> {
        self.grids.lon()
    }

    pub fn grid_shape(&self) -> (usize, usize) {
        self.grids.grid_shape()
    }
}

/// Reduce `request.field` per wind-direction sector at every grid cell.
///
/// Fails with `InvalidStatistic` or `InvalidParameter` before touching any
/// data, and with `FieldNotFound` when the field is neither stored in the
/// series nor the derived `wind-speed`. Cells where no time step survives
/// the filters hold NaN.
///
/// The series is only read. A derived wind-speed field lives for the
/// duration of the call.
pub fn aggregate(
    series: &GriddedTimeSeries,
    request: &AggregateRequest,
) -> WindStatsResult<AggregationResult> {
    request.validate()?;

    let field = series.resolve_field(&request.field)?;
    let (rows, cols) = series.grid_shape();
    let n_sectors = request.sectors.len();

    debug!(
        field = %request.field,
        statistic = %request.statistic,
        sectors = n_sectors,
        min_speed = request.min_speed,
        heatwave = request.heatwave_filter,
        times = series.n_times(),
        rows,
        cols,
        "Aggregating by wind sector"
    );

    let filter = StepFilter::new(request.min_speed, request.heatwave_filter);
    let (u, v) = (series.u(), series.v());

    let cells: Vec<Vec<f32>> = (0..rows * cols)
        .into_par_iter()
        .map(|idx| {
            let (row, col) = (idx / cols, idx % cols);
            let values = field.slice(s![.., row, col]);
            let steps = filter.retain(
                u.slice(s![.., row, col]),
                v.slice(s![.., row, col]),
                values,
            );

            let mut out = Vec::with_capacity(n_sectors + 1);
            let mut bucket: Vec<f64> = steps
                .iter()
                .map(|step| f64::from(values[step.time]))
                .collect();
            out.push(reduce(request.statistic, &bucket) as f32);

            for sector in &request.sectors {
                bucket.clear();
                bucket.extend(
                    steps
                        .iter()
                        .filter(|step| step.in_sector(sector))
                        .map(|step| f64::from(values[step.time])),
                );
                out.push(reduce(request.statistic, &bucket) as f32);
            }
            out
        })
        .collect();

    let mut all = Array2::from_elem((rows, cols), f32::NAN);
    let mut by_sector = vec![Array2::from_elem((rows, cols), f32::NAN); n_sectors];
    for (idx, cell) in cells.into_iter().enumerate() {
        let (row, col) = (idx / cols, idx % cols);
        all[[row, col]] = cell[0];
        for (grid, value) in by_sector.iter_mut().zip(&cell[1..]) {
            grid[[row, col]] = *value;
        }
    }

    if rows * cols > 0 && all.iter().all(|x| x.is_nan()) {
        warn!(field = %request.field, "Every cell of the all-direction statistic is missing");
    }

    let grids = SectorGrids::new(
        request.field.clone(),
        request.sectors.clone(),
        all,
        by_sector,
        series.lat().clone(),
        series.lon().clone(),
    )?;

    Ok(AggregationResult::new(grids, request.statistic))
}
