//! Number of time steps per wind sector.
//!
//! Uses the same filters as aggregation. `wind_days_all` counts every step
//! that passes the heatwave filter and has a wind direction. A step is
//! counted in a sector when it is faster than `min_speed` and its direction
//! lies strictly inside the sector.

use ndarray::{s, Array2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;
use wind_common::{GriddedTimeSeries, SectorSpec, WindStatsResult};

use crate::aggregate::validate_min_speed;
use crate::filter::StepFilter;
use crate::grids::SectorGrids;

/// Variable prefix of wind-day counts: `wind_days_all`, `wind_days_NE`, ...
pub const WIND_DAYS_PREFIX: &str = "wind_days";

/// Per-cell step counts, all directions and per sector.
pub type WindDayCounts = SectorGrids<u32>;

/// Parameters of one count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountRequest {
    pub sectors: SectorSpec,
    pub min_speed: f64,
    pub heatwave_filter: bool,
    /// Field whose 95th percentile defines a heatwave step.
    pub heatwave_field: String,
}

impl Default for CountRequest {
    fn default() -> Self {
        Self {
            sectors: SectorSpec::quadrants(),
            min_speed: 0.0,
            heatwave_filter: false,
            heatwave_field: "T2".to_string(),
        }
    }
}

impl CountRequest {
    pub fn new(sectors: SectorSpec) -> Self {
        Self {
            sectors,
            ..Default::default()
        }
    }

    pub fn min_speed(mut self, min_speed: f64) -> Self {
        self.min_speed = min_speed;
        self
    }

    pub fn heatwave_filter(mut self, enabled: bool) -> Self {
        self.heatwave_filter = enabled;
        self
    }

    pub fn heatwave_field(mut self, field: impl Into<String>) -> Self {
        self.heatwave_field = field.into();
        self
    }
}

/// Count filtered time steps per sector at every grid cell.
///
/// The heatwave field is only looked up when the heatwave filter is on.
pub fn count_wind_days(
    series: &GriddedTimeSeries,
    request: &CountRequest,
) -> WindStatsResult<WindDayCounts> {
    validate_min_speed(request.min_speed)?;

    let reference = if request.heatwave_filter {
        Some(series.resolve_field(&request.heatwave_field)?)
    } else {
        None
    };

    let (rows, cols) = series.grid_shape();
    let n_sectors = request.sectors.len();
    debug!(
        sectors = n_sectors,
        min_speed = request.min_speed,
        heatwave = request.heatwave_filter,
        rows,
        cols,
        "Counting wind days by sector"
    );

    let filter = StepFilter::new(request.min_speed, request.heatwave_filter);
    let (u, v) = (series.u(), series.v());

    let cells: Vec<Vec<u32>> = (0..rows * cols)
        .into_par_iter()
        .map(|idx| {
            let (row, col) = (idx / cols, idx % cols);
            let u_cell = u.slice(s![.., row, col]);
            let reference_cell = match &reference {
                Some(field) => field.slice(s![.., row, col]),
                None => u_cell.view(),
            };
            let steps = filter.retain(u_cell.view(), v.slice(s![.., row, col]), reference_cell);

            let mut out = Vec::with_capacity(n_sectors + 1);
            out.push(saturating_count(steps.iter().filter(|st| !st.direction.is_nan())));
            for sector in &request.sectors {
                out.push(saturating_count(steps.iter().filter(|st| st.in_sector(sector))));
            }
            out
        })
        .collect();

    let mut all = Array2::<u32>::zeros((rows, cols));
    let mut by_sector = vec![Array2::<u32>::zeros((rows, cols)); n_sectors];
    for (idx, cell) in cells.into_iter().enumerate() {
        let (row, col) = (idx / cols, idx % cols);
        all[[row, col]] = cell[0];
        for (grid, count) in by_sector.iter_mut().zip(&cell[1..]) {
            grid[[row, col]] = *count;
        }
    }

    SectorGrids::new(
        WIND_DAYS_PREFIX,
        request.sectors.clone(),
        all,
        by_sector,
        series.lat().clone(),
        series.lon().clone(),
    )
}

fn saturating_count<I: Iterator>(steps: I) -> u32 {
    u32::try_from(steps.count()).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array;
    use wind_common::WindStatsError;

    fn series(u: Vec<f32>, v: Vec<f32>) -> GriddedTimeSeries {
        let n = u.len();
        GriddedTimeSeries::new(
            Array::from_shape_vec((n, 1, 1), u).unwrap(),
            Array::from_shape_vec((n, 1, 1), v).unwrap(),
            Array2::zeros((1, 1)),
            Array2::zeros((1, 1)),
        )
        .unwrap()
    }

    #[test]
    fn test_counts_per_quadrant() {
        // From SW, SW, NE, calm (180, on a boundary), missing
        let s = series(
            vec![1.0, 2.0, -1.0, 0.0, f32::NAN],
            vec![1.0, 2.0, -1.0, 0.0, 1.0],
        );
        let counts = count_wind_days(&s, &CountRequest::default()).unwrap();
        assert_eq!(counts.get("wind_days_all").unwrap()[[0, 0]], 4);
        assert_eq!(counts.get("wind_days_SW").unwrap()[[0, 0]], 2);
        assert_eq!(counts.get("wind_days_NE").unwrap()[[0, 0]], 1);
        assert_eq!(counts.get("wind_days_SE").unwrap()[[0, 0]], 0);
        assert_eq!(counts.get("wind_days_NW").unwrap()[[0, 0]], 0);
    }

    #[test]
    fn test_min_speed_drops_light_wind() {
        let s = series(vec![0.5, 3.0], vec![0.5, 3.0]);
        let counts = count_wind_days(&s, &CountRequest::default().min_speed(1.0)).unwrap();
        assert_eq!(counts.get("wind_days_SW").unwrap()[[0, 0]], 1);
        // The light step still has a direction
        assert_eq!(counts.get("wind_days_all").unwrap()[[0, 0]], 2);
    }

    #[test]
    fn test_saturating_count() {
        assert_eq!(saturating_count(0..5), 5);
        assert_eq!(saturating_count(std::iter::empty::<()>()), 0);
    }

    #[test]
    fn test_heatwave_needs_reference_field() {
        let s = series(vec![1.0], vec![1.0]);
        let err = count_wind_days(&s, &CountRequest::default().heatwave_filter(true)).unwrap_err();
        assert_eq!(err, WindStatsError::FieldNotFound("T2".to_string()));

        // Without the filter the field is never needed
        assert!(count_wind_days(&s, &CountRequest::default()).is_ok());
    }
}
