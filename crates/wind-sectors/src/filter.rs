//! Per-cell time step selection shared by aggregation and counting.

use ndarray::ArrayView1;
use wind_common::Sector;

use crate::direction::{wind_direction, wind_speed};
use crate::reduce::nan_percentile;
use crate::HEATWAVE_PERCENTILE;

/// A time step that survived the heatwave filter, with its wind direction.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RetainedStep {
    pub time: usize,
    pub direction: f64,
    /// Wind speed exceeds the minimum, or no minimum is set.
    pub fast: bool,
}

impl RetainedStep {
    /// Counts toward `sector`: fast enough and strictly inside it.
    pub fn in_sector(&self, sector: &Sector) -> bool {
        self.fast && sector.contains(self.direction)
    }
}

/// Heatwave and minimum-speed filters for one grid cell.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StepFilter {
    min_speed: f64,
    heatwave: bool,
}

impl StepFilter {
    pub fn new(min_speed: f64, heatwave: bool) -> Self {
        Self { min_speed, heatwave }
    }

    /// Select the time steps of one cell.
    ///
    /// With the heatwave filter on, only steps where `reference` strictly
    /// exceeds its own 95th percentile at this cell are kept. The speed
    /// filter drops nothing: with a positive `min_speed`, steps where
    /// `hypot(u, v) <= min_speed` are kept with `fast == false`, so they
    /// still count toward the all-direction bucket but toward no sector.
    /// `reference` is only read when the heatwave filter is on.
    pub fn retain(
        &self,
        u: ArrayView1<'_, f32>,
        v: ArrayView1<'_, f32>,
        reference: ArrayView1<'_, f32>,
    ) -> Vec<RetainedStep> {
        let threshold = if self.heatwave {
            let samples: Vec<f64> = reference.iter().map(|&x| f64::from(x)).collect();
            Some(nan_percentile(&samples, HEATWAVE_PERCENTILE))
        } else {
            None
        };

        let mut steps = Vec::with_capacity(u.len());
        for (time, (&u_t, &v_t)) in u.iter().zip(v.iter()).enumerate() {
            if let Some(threshold) = threshold {
                // NaN fails the comparison and is dropped
                if !(f64::from(reference[time]) > threshold) {
                    continue;
                }
            }

            let (u_t, v_t) = (f64::from(u_t), f64::from(v_t));
            let fast = self.min_speed <= 0.0 || wind_speed(u_t, v_t) > self.min_speed;

            steps.push(RetainedStep {
                time,
                direction: wind_direction(u_t, v_t),
                fast,
            });
        }
        steps
    }
}
