//! Compact per-variable summaries for reports.

use ndarray::Array2;
use serde::Serialize;

use crate::grids::SectorGrids;

/// Range and mean of one output grid, ignoring missing cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSummary {
    pub name: String,
    pub min: Option<f32>,
    pub max: Option<f32>,
    pub mean: Option<f64>,
    pub missing_cells: usize,
    pub total_cells: usize,
}

/// Summarize a grid. Statistics are `None` when every cell is missing.
pub fn summarize<T>(name: impl Into<String>, grid: &Array2<T>) -> FieldSummary
where
    T: Copy + Into<f64>,
{
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0f64;
    let mut valid = 0usize;

    for &x in grid.iter() {
        let x: f64 = x.into();
        if x.is_nan() {
            continue;
        }
        min = min.min(x);
        max = max.max(x);
        sum += x;
        valid += 1;
    }

    let total_cells = grid.len();
    let (min, max, mean) = if valid == 0 {
        (None, None, None)
    } else {
        (Some(min as f32), Some(max as f32), Some(sum / valid as f64))
    };

    FieldSummary {
        name: name.into(),
        min,
        max,
        mean,
        missing_cells: total_cells - valid,
        total_cells,
    }
}

impl<T> SectorGrids<T>
where
    T: Copy + Into<f64>,
{
    /// One summary per variable, in output order.
    pub fn summaries(&self) -> Vec<FieldSummary> {
        self.variables()
            .into_iter()
            .map(|(name, grid)| summarize(name, grid))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;
    use wind_common::SectorSpec;

    #[test]
    fn test_summary_skips_nan() {
        let grid = arr2(&[[1.0f32, f32::NAN], [3.0, 5.0]]);
        let s = summarize("T2_all", &grid);
        assert_eq!(s.min, Some(1.0));
        assert_eq!(s.max, Some(5.0));
        assert_eq!(s.mean, Some(3.0));
        assert_eq!(s.missing_cells, 1);
        assert_eq!(s.total_cells, 4);
    }

    #[test]
    fn test_all_missing() {
        let grid = Array2::from_elem((2, 2), f32::NAN);
        let s = summarize("T2_NE", &grid);
        assert_eq!(s.mean, None);
        assert_eq!(s.missing_cells, 4);
    }

    #[test]
    fn test_count_summaries() {
        let grids = SectorGrids::new(
            "wind_days",
            SectorSpec::parse_list("N:270:90").unwrap(),
            arr2(&[[4u32, 2]]),
            vec![arr2(&[[1u32, 0]])],
            Array2::zeros((1, 2)),
            Array2::zeros((1, 2)),
        )
        .unwrap();
        let summaries = grids.summaries();
        assert_eq!(summaries[0].name, "wind_days_all");
        assert_eq!(summaries[0].mean, Some(3.0));
        assert_eq!(summaries[1].max, Some(1.0));

        let json = serde_json::to_value(&summaries[1]).unwrap();
        assert_eq!(json["total_cells"], 2);
    }
}
