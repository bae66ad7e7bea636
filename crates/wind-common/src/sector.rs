//! Wind-direction sectors.
//!
//! Directions use the meteorological convention: degrees clockwise from
//! north, naming where the wind blows *from*. A sector whose start is
//! greater than its end wraps through north.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{WindStatsError, WindStatsResult};

/// A labelled angular range of wind directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    pub label: String,
    pub start: f64,
    pub end: f64,
}

impl Sector {
    pub fn new(label: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            label: label.into(),
            start,
            end,
        }
    }

    /// True when the range passes through 0°/360°.
    pub fn wraps(&self) -> bool {
        self.start > self.end
    }

    /// Membership test with strict bounds on both ends.
    ///
    /// A direction exactly on a boundary belongs to neither neighbour, and
    /// NaN never matches.
    #[inline]
    pub fn contains(&self, direction: f64) -> bool {
        if self.wraps() {
            direction > self.start || direction < self.end
        } else {
            direction > self.start && direction < self.end
        }
    }

    fn validate(&self) -> WindStatsResult<()> {
        if self.label.trim().is_empty() {
            return Err(WindStatsError::InvalidSector("empty label".to_string()));
        }
        // Labels end up in variable names and in the `sectors` table attribute
        if let Some(c) = self
            .label
            .chars()
            .find(|&c| matches!(c, ',' | ':' | '/') || c.is_whitespace())
        {
            return Err(WindStatsError::InvalidSector(format!(
                "label '{}' contains {:?}",
                self.label, c
            )));
        }
        // "<field>_all" is the all-direction output
        if self.label == "all" {
            return Err(WindStatsError::InvalidSector("label 'all' is reserved".to_string()));
        }
        for bound in [self.start, self.end] {
            if !bound.is_finite() || !(0.0..=360.0).contains(&bound) {
                return Err(WindStatsError::InvalidSector(format!(
                    "{}: bound {} outside [0, 360]",
                    self.label, bound
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.label, self.start, self.end)
    }
}

/// Parses `LABEL:START:END`, e.g. `NE:0:90`.
impl FromStr for Sector {
    type Err = WindStatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(WindStatsError::InvalidSector(format!(
                "'{}', expected LABEL:START:END",
                s
            )));
        }

        let bound = |p: &str| {
            p.parse::<f64>()
                .map_err(|_| WindStatsError::InvalidSector(format!("invalid bound '{}' in '{}'", p, s)))
        };

        let sector = Sector::new(parts[0], bound(parts[1])?, bound(parts[2])?);
        sector.validate()?;
        Ok(sector)
    }
}

/// Ordered list of sectors. Output fields follow this order.
///
/// Sectors may overlap or leave gaps; only bounds and label uniqueness are
/// checked.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Sector>", into = "Vec<Sector>")]
pub struct SectorSpec {
    sectors: Vec<Sector>,
}

impl SectorSpec {
    /// Validate and wrap a list of sectors.
    pub fn new(sectors: Vec<Sector>) -> WindStatsResult<Self> {
        for (i, sector) in sectors.iter().enumerate() {
            sector.validate()?;
            if sectors[..i].iter().any(|s| s.label == sector.label) {
                return Err(WindStatsError::InvalidSector(format!(
                    "duplicate label '{}'",
                    sector.label
                )));
            }
        }
        Ok(Self { sectors })
    }

    /// Build from parallel arrays of `[start, end]` limits and labels.
    pub fn from_limits(limits: &[[f64; 2]], labels: &[&str]) -> WindStatsResult<Self> {
        if limits.len() != labels.len() {
            return Err(WindStatsError::InvalidSector(format!(
                "{} ranges but {} labels",
                limits.len(),
                labels.len()
            )));
        }
        Self::new(
            limits
                .iter()
                .zip(labels)
                .map(|([start, end], label)| Sector::new(*label, *start, *end))
                .collect(),
        )
    }

    /// No sectors: only the all-direction statistic is produced.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The four compass quadrants NE, SE, SW, NW.
    pub fn quadrants() -> Self {
        Self {
            sectors: vec![
                Sector::new("NE", 0.0, 90.0),
                Sector::new("SE", 90.0, 180.0),
                Sector::new("SW", 180.0, 270.0),
                Sector::new("NW", 270.0, 360.0),
            ],
        }
    }

    /// Parse a comma-separated list, e.g. `NE:0:90,SE:90:180`.
    pub fn parse_list(s: &str) -> WindStatsResult<Self> {
        let sectors = s
            .split(',')
            .filter(|p| !p.trim().is_empty())
            .map(str::parse)
            .collect::<WindStatsResult<Vec<Sector>>>()?;
        Self::new(sectors)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sector> {
        self.sectors.iter()
    }

    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.sectors.iter().map(|s| s.label.as_str()).collect()
    }

    pub fn get(&self, label: &str) -> Option<&Sector> {
        self.sectors.iter().find(|s| s.label == label)
    }
}

impl TryFrom<Vec<Sector>> for SectorSpec {
    type Error = WindStatsError;

    fn try_from(sectors: Vec<Sector>) -> Result<Self, Self::Error> {
        Self::new(sectors)
    }
}

impl From<SectorSpec> for Vec<Sector> {
    fn from(spec: SectorSpec) -> Self {
        spec.sectors
    }
}

impl<'a> IntoIterator for &'a SectorSpec {
    type Item = &'a Sector;
    type IntoIter = std::slice::Iter<'a, Sector>;

    fn into_iter(self) -> Self::IntoIter {
        self.sectors.iter()
    }
}
