//! Sector anomalies and their mean over an ensemble of climate models.
//!
//! A sector anomaly is the sector statistic minus the all-direction
//! statistic at the same cell. For each model the anomaly is taken in a
//! historical and a future period, and the change between them; the
//! ensemble value is the plain member mean of each.

use std::collections::BTreeMap;
use std::fmt;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;
use wind_common::{SectorSpec, WindStatsError, WindStatsResult};

use crate::aggregate::AggregationResult;

/// Period of an ensemble anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Historical,
    Future,
    /// Future minus historical.
    Change,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::Historical, Period::Future, Period::Change];

    /// Short name used in output variable names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Historical => "hist",
            Period::Future => "fut",
            Period::Change => "diff",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `<field>_<label> - <field>_all` for one sector of a result.
pub fn sector_anomaly(result: &AggregationResult, label: &str) -> WindStatsResult<Array2<f32>> {
    let sector = result
        .sector(label)
        .ok_or_else(|| WindStatsError::FieldNotFound(result.variable_name(label)))?;
    Ok(sector - result.all())
}

/// Running sums of per-member sector anomalies.
///
/// Sums are kept in f64. A NaN in any member stays NaN in the mean.
#[derive(Debug, Clone)]
pub struct EnsembleAccumulator {
    labels: Vec<String>,
    members: Vec<String>,
    sums: BTreeMap<(Period, usize), Array2<f64>>,
    grid: Option<(Array2<f32>, Array2<f32>)>,
}

impl EnsembleAccumulator {
    /// Accumulate anomalies for every sector of `sectors`.
    pub fn new(sectors: &SectorSpec) -> Self {
        Self::with_labels(sectors.labels().into_iter().map(String::from).collect())
    }

    pub fn with_labels(labels: Vec<String>) -> Self {
        Self {
            labels,
            members: Vec::new(),
            sums: BTreeMap::new(),
            grid: None,
        }
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Add one model's historical and future results.
    ///
    /// Both results must be on the grid of the members added so far and
    /// carry every accumulated sector label. On error the accumulator is
    /// left unchanged.
    pub fn add_member(
        &mut self,
        name: impl Into<String>,
        historical: &AggregationResult,
        future: &AggregationResult,
    ) -> WindStatsResult<()> {
        let name = name.into();
        let (rows, cols) = historical.grid_shape();

        if future.grid_shape() != (rows, cols) {
            return Err(WindStatsError::shape_mismatch(
                format!("{} future", name),
                &[rows, cols],
                future.all().shape(),
            ));
        }
        if let Some((lat, _)) = &self.grid {
            if lat.dim() != (rows, cols) {
                return Err(WindStatsError::shape_mismatch(
                    name,
                    lat.shape(),
                    historical.all().shape(),
                ));
            }
        }

        let mut anomalies = Vec::with_capacity(self.labels.len() * Period::ALL.len());
        for (i, label) in self.labels.iter().enumerate() {
            let hist = sector_anomaly(historical, label)?;
            let fut = sector_anomaly(future, label)?;
            let change = &fut - &hist;
            anomalies.push(((Period::Historical, i), hist));
            anomalies.push(((Period::Future, i), fut));
            anomalies.push(((Period::Change, i), change));
        }

        for (key, anomaly) in anomalies {
            let sum = self
                .sums
                .entry(key)
                .or_insert_with(|| Array2::zeros((rows, cols)));
            *sum += &anomaly.mapv(f64::from);
        }

        if self.grid.is_none() {
            self.grid = Some((historical.lat().clone(), historical.lon().clone()));
        }
        debug!(member = %name, members = self.members.len() + 1, "Added ensemble member");
        self.members.push(name);
        Ok(())
    }

    /// Member mean of every (period, sector) anomaly.
    pub fn finish(self) -> WindStatsResult<EnsembleAnomalies> {
        let Some((lat, lon)) = self.grid else {
            return Err(WindStatsError::invalid_parameter(
                "members",
                "no ensemble members were added",
            ));
        };

        let n = self.members.len() as f64;
        let fields = self
            .sums
            .into_iter()
            .map(|(key, sum)| (key, sum.mapv(|x| (x / n) as f32)))
            .collect();

        Ok(EnsembleAnomalies {
            members: self.members,
            labels: self.labels,
            fields,
            lat,
            lon,
        })
    }
}

/// Ensemble-mean sector anomalies, named `<period>_<label>`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleAnomalies {
    members: Vec<String>,
    labels: Vec<String>,
    fields: BTreeMap<(Period, usize), Array2<f32>>,
    lat: Array2<f32>,
    lon: Array2<f32>,
}

impl EnsembleAnomalies {
    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn get(&self, period: Period, label: &str) -> Option<&Array2<f32>> {
        let i = self.labels.iter().position(|l| l == label)?;
        self.fields.get(&(period, i))
    }

    pub fn variable_name(period: Period, label: &str) -> String {
        format!("{}_{}", period, label)
    }

    /// Variables grouped by period, sectors in their configured order.
    pub fn variables(&self) -> Vec<(String, &Array2<f32>)> {
        self.fields
            .iter()
            .map(|((period, i), grid)| (Self::variable_name(*period, &self.labels[*i]), grid))
            .collect()
    }

    pub fn lat(&self) -> &Array2<f32> {
        &self.lat
    }

    pub fn lon(&self) -> &Array2<f32> {
        &self.lon
    }

    pub fn grid_shape(&self) -> (usize, usize) {
        self.lat.dim()
    }
}
