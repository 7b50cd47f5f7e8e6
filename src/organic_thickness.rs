// src/organic_thickness.rs - Laterally varying organic layer thickness

use crate::error::{MeshError, MeshResult};
use crate::transect::{ColumnSampling, Transect};
use serde::{Deserialize, Serialize};

/// One end of an interval along the transect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    Unbounded,
    Inclusive(f64),
    Exclusive(f64),
}

impl Bound {
    fn value(&self) -> Option<f64> {
        match self {
            Bound::Unbounded => None,
            Bound::Inclusive(v) | Bound::Exclusive(v) => Some(*v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lower: Bound,
    pub upper: Bound,
}

impl Interval {
    pub fn new(lower: Bound, upper: Bound) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, x: f64) -> bool {
        let above = match self.lower {
            Bound::Unbounded => true,
            Bound::Inclusive(lo) => x >= lo,
            Bound::Exclusive(lo) => x > lo,
        };
        let below = match self.upper {
            Bound::Unbounded => true,
            Bound::Inclusive(hi) => x <= hi,
            Bound::Exclusive(hi) => x < hi,
        };
        above && below
    }

    pub fn is_empty(&self) -> bool {
        match (self.lower, self.upper) {
            (Bound::Inclusive(lo), Bound::Inclusive(hi)) => lo > hi,
            (lo, hi) => match (lo.value(), hi.value()) {
                (Some(lo), Some(hi)) => lo >= hi,
                _ => false,
            },
        }
    }

    /// True when `self` ends before `next` starts, sharing at most an
    /// endpoint that only one of them includes.
    fn precedes(&self, next: &Interval) -> bool {
        match (self.upper, next.lower) {
            (Bound::Unbounded, _) | (_, Bound::Unbounded) => false,
            (Bound::Inclusive(a), Bound::Inclusive(b)) => a < b,
            (a, b) => match (a.value(), b.value()) {
                (Some(a), Some(b)) => a <= b,
                _ => false,
            },
        }
    }
}

/// How thickness is computed inside a segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    Constant { value_m: f64 },
    Linear { slope: f64, intercept_m: f64 },
}

impl Rule {
    pub fn apply(&self, x: f64) -> f64 {
        match *self {
            Rule::Constant { value_m } => value_m,
            Rule::Linear { slope, intercept_m } => slope * x + intercept_m,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub range: Interval,
    pub rule: Rule,
}

/// Ordered `(range, rule)` pairs; the first range containing `x` wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiecewiseProfile {
    pub segments: Vec<Segment>,
}

impl PiecewiseProfile {
    /// Thick organic cover at the ridge and toe, a thin band mid-slope, and
    /// linear transitions between them. Transition ranges are closed.
    pub fn hillslope_default() -> Self {
        use Bound::*;
        Self {
            segments: vec![
                Segment {
                    range: Interval::new(Unbounded, Exclusive(100.0)),
                    rule: Rule::Constant { value_m: 0.5 },
                },
                Segment {
                    range: Interval::new(Inclusive(100.0), Inclusive(200.0)),
                    rule: Rule::Linear {
                        slope: -0.0045,
                        intercept_m: 0.95,
                    },
                },
                Segment {
                    range: Interval::new(Exclusive(200.0), Exclusive(800.0)),
                    rule: Rule::Constant { value_m: 0.05 },
                },
                Segment {
                    range: Interval::new(Inclusive(800.0), Inclusive(900.0)),
                    rule: Rule::Linear {
                        slope: 0.0025,
                        intercept_m: -1.95,
                    },
                },
                Segment {
                    range: Interval::new(Exclusive(900.0), Unbounded),
                    rule: Rule::Constant { value_m: 0.3 },
                },
            ],
        }
    }

    pub fn validate(&self) -> MeshResult<()> {
        if self.segments.is_empty() {
            return Err(MeshError::invalid("organic_thickness.segments", "no segments"));
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if segment.range.is_empty() {
                return Err(MeshError::invalid(
                    "organic_thickness.segments",
                    format!("segment {} has an empty range", i),
                ));
            }
        }
        for (i, pair) in self.segments.windows(2).enumerate() {
            if !pair[0].range.precedes(&pair[1].range) {
                return Err(MeshError::invalid(
                    "organic_thickness.segments",
                    format!("segments {} and {} overlap or are out of order", i, i + 1),
                ));
            }
        }
        Ok(())
    }

    pub fn evaluate(&self, x_m: f64) -> MeshResult<f64> {
        self.segments
            .iter()
            .find(|s| s.range.contains(x_m))
            .map(|s| s.rule.apply(x_m))
            .ok_or(MeshError::UncoveredPosition { x_m })
    }
}

/// Organic layer thickness per surface column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrganicThickness {
    Uniform { thickness_m: f64 },
    Piecewise(PiecewiseProfile),
}

impl OrganicThickness {
    pub fn validate(&self) -> MeshResult<()> {
        match self {
            OrganicThickness::Uniform { thickness_m } => {
                if !thickness_m.is_finite() || *thickness_m < 0.0 {
                    return Err(MeshError::invalid(
                        "organic_thickness.thickness_m",
                        format!("{} is not a usable thickness", thickness_m),
                    ));
                }
                Ok(())
            }
            OrganicThickness::Piecewise(profile) => profile.validate(),
        }
    }

    pub fn at(&self, x_m: f64) -> MeshResult<f64> {
        match self {
            OrganicThickness::Uniform { thickness_m } => Ok(*thickness_m),
            OrganicThickness::Piecewise(profile) => profile.evaluate(x_m),
        }
    }

    pub fn sample_columns(
        &self,
        transect: &Transect,
        sampling: ColumnSampling,
    ) -> MeshResult<Vec<f64>> {
        transect
            .column_xs(sampling)
            .into_iter()
            .map(|x| self.at(x))
            .collect()
    }
}
