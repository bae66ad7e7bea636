//! The summary statistic applied to each bucket of time steps.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{WindStatsError, WindStatsResult};

/// Either the arithmetic mean or a percentile in `[0, 100]`.
///
/// `Percentile` can be built directly, so consumers call
/// [`validate`](Self::validate) once before reducing anything.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "StatisticRepr", into = "StatisticRepr")]
pub enum Statistic {
    #[default]
    Mean,
    Percentile(f64),
}

impl Statistic {
    /// Checked percentile constructor.
    pub fn percentile(p: f64) -> WindStatsResult<Self> {
        let stat = Statistic::Percentile(p);
        stat.validate()?;
        Ok(stat)
    }

    /// The median (50th percentile).
    pub fn median() -> Self {
        Statistic::Percentile(50.0)
    }

    /// Reject percentiles that are NaN or outside `[0, 100]`.
    pub fn validate(&self) -> WindStatsResult<()> {
        match *self {
            Statistic::Mean => Ok(()),
            Statistic::Percentile(p) if p.is_finite() && (0.0..=100.0).contains(&p) => Ok(()),
            Statistic::Percentile(p) => Err(WindStatsError::InvalidStatistic(p.to_string())),
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statistic::Mean => write!(f, "mean"),
            Statistic::Percentile(p) => write!(f, "{}", p),
        }
    }
}

/// Accepts `mean` (any case) or a number.
impl FromStr for Statistic {
    type Err = WindStatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("mean") {
            return Ok(Statistic::Mean);
        }
        let p: f64 = s
            .parse()
            .map_err(|_| WindStatsError::InvalidStatistic(s.to_string()))?;
        Statistic::percentile(p)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum StatisticRepr {
    Value(f64),
    Name(String),
}

impl TryFrom<StatisticRepr> for Statistic {
    type Error = WindStatsError;

    fn try_from(repr: StatisticRepr) -> Result<Self, Self::Error> {
        match repr {
            StatisticRepr::Value(p) => Statistic::percentile(p),
            StatisticRepr::Name(name) => name.parse(),
        }
    }
}

impl From<Statistic> for StatisticRepr {
    fn from(stat: Statistic) -> Self {
        match stat {
            Statistic::Mean => StatisticRepr::Name("mean".to_string()),
            Statistic::Percentile(p) => StatisticRepr::Value(p),
        }
    }
}
