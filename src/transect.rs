// src/transect.rs - 1-D surface profile the 2-D mesh is built from

use crate::error::{MeshError, MeshResult};
use crate::math_utils::{lerp, linspace};
use serde::{Deserialize, Serialize};

/// Straight-line hillslope: `z = intercept_m - slope * x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransectConfig {
    pub x_start_m: f64,
    pub x_end_m: f64,
    pub num_points: usize,
    pub intercept_m: f64, // elevation at x = 0
    pub slope: f64,       // drop in elevation per metre of run
}

impl TransectConfig {
    pub fn validate(&self) -> MeshResult<()> {
        if self.num_points < 2 {
            return Err(MeshError::invalid(
                "transect.num_points",
                format!("need at least 2 points, got {}", self.num_points),
            ));
        }
        if !self.x_start_m.is_finite() || !self.x_end_m.is_finite() {
            return Err(MeshError::invalid("transect.x_start_m", "extent must be finite"));
        }
        if self.x_end_m <= self.x_start_m {
            return Err(MeshError::invalid(
                "transect.x_end_m",
                format!("{} is not past x_start_m {}", self.x_end_m, self.x_start_m),
            ));
        }
        if !self.intercept_m.is_finite() || !self.slope.is_finite() {
            return Err(MeshError::invalid("transect.slope", "slope and intercept must be finite"));
        }
        Ok(())
    }

    pub fn elevation_at(&self, x_m: f64) -> f64 {
        self.intercept_m - self.slope * x_m
    }
}

/// Where a surface column takes its horizontal position from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnSampling {
    /// Column `i` uses node `i`, its upslope edge.
    LeftNode,
    /// Column `i` uses the midpoint of nodes `i` and `i + 1`.
    Centroid,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransectPoint {
    pub x_m: f64,
    pub z_m: f64,
}

/// Where the surface nodes come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum TransectSource {
    Linear(TransectConfig),
    /// Surveyed or exported surface nodes, upslope first
    Points { points: Vec<TransectPoint> },
}

impl TransectSource {
    pub fn validate(&self) -> MeshResult<()> {
        match self {
            TransectSource::Linear(config) => config.validate(),
            TransectSource::Points { points } => check_points(points),
        }
    }

    pub fn build(&self) -> MeshResult<Transect> {
        match self {
            TransectSource::Linear(config) => Transect::linear(config),
            TransectSource::Points { points } => Transect::from_points(points.clone()),
        }
    }
}

fn check_points(points: &[TransectPoint]) -> MeshResult<()> {
    if points.len() < 2 {
        return Err(MeshError::invalid(
            "transect.points",
            format!("need at least 2 points, got {}", points.len()),
        ));
    }
    if points.iter().any(|p| !p.x_m.is_finite() || !p.z_m.is_finite()) {
        return Err(MeshError::invalid("transect.points", "coordinates must be finite"));
    }
    if points.windows(2).any(|w| w[1].x_m <= w[0].x_m) {
        return Err(MeshError::invalid("transect.points", "x must be strictly increasing"));
    }
    Ok(())
}

/// Ordered surface nodes, strictly increasing in x.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transect {
    points: Vec<TransectPoint>,
}

impl Transect {
    pub fn linear(config: &TransectConfig) -> MeshResult<Transect> {
        config.validate()?;
        let points = linspace(config.x_start_m, config.x_end_m, config.num_points)
            .into_iter()
            .map(|x_m| TransectPoint {
                x_m,
                z_m: config.elevation_at(x_m),
            })
            .collect();
        Ok(Transect { points })
    }

    pub fn from_points(points: Vec<TransectPoint>) -> MeshResult<Transect> {
        check_points(&points)?;
        Ok(Transect { points })
    }

    pub fn points(&self) -> &[TransectPoint] {
        &self.points
    }

    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x_m).collect()
    }

    pub fn zs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.z_m).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// One surface cell between each pair of neighbouring nodes.
    pub fn num_columns(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn column_x(&self, column: usize, sampling: ColumnSampling) -> Option<f64> {
        if column >= self.num_columns() {
            return None;
        }
        let left = self.points[column].x_m;
        Some(match sampling {
            ColumnSampling::LeftNode => left,
            ColumnSampling::Centroid => lerp(left, self.points[column + 1].x_m, 0.5),
        })
    }

    pub fn column_xs(&self, sampling: ColumnSampling) -> Vec<f64> {
        (0..self.num_columns())
            .filter_map(|c| self.column_x(c, sampling))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn hillslope() -> TransectConfig {
        TransectConfig {
            x_start_m: 0.0,
            x_end_m: 1000.0,
            num_points: 101,
            intercept_m: 100.0,
            slope: 0.1,
        }
    }

    #[test]
    fn test_linear_elevation_matches_slope() {
        let config = hillslope();
        let transect = Transect::linear(&config).unwrap();
        assert_eq!(transect.len(), 101);
        assert_eq!(transect.num_columns(), 100);
        for p in transect.points() {
            assert_eq!(p.z_m, 100.0 - 0.1 * p.x_m);
        }
        assert_eq!(transect.points()[0].z_m, 100.0);
        assert_abs_diff_eq!(transect.points()[100].z_m, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_column_sampling() {
        let transect = Transect::linear(&hillslope()).unwrap();
        assert_eq!(transect.column_x(0, ColumnSampling::LeftNode), Some(0.0));
        assert_eq!(transect.column_x(15, ColumnSampling::LeftNode), Some(150.0));
        assert_eq!(transect.column_x(15, ColumnSampling::Centroid), Some(155.0));
        assert_eq!(transect.column_x(100, ColumnSampling::LeftNode), None);
        assert_eq!(transect.column_xs(ColumnSampling::Centroid).len(), 100);
    }

    #[test]
    fn test_rejects_bad_extent() {
        let mut config = hillslope();
        config.num_points = 1;
        assert!(matches!(
            Transect::linear(&config),
            Err(MeshError::InvalidConfig { field: "transect.num_points", .. })
        ));

        let mut config = hillslope();
        config.x_end_m = -5.0;
        assert!(Transect::linear(&config).is_err());
    }

    #[test]
    fn test_from_points_requires_increasing_x() {
        let points = vec![
            TransectPoint { x_m: 0.0, z_m: 1.0 },
            TransectPoint { x_m: 0.0, z_m: 0.5 },
        ];
        assert!(Transect::from_points(points).is_err());
    }

    #[test]
    fn test_point_source() {
        let json = r#"{
            "source": "points",
            "points": [
                { "x_m": 0.0, "z_m": 12.0 },
                { "x_m": 7.5, "z_m": 11.0 },
                { "x_m": 20.0, "z_m": 8.5 }
            ]
        }"#;
        let source: TransectSource = serde_json::from_str(json).unwrap();
        source.validate().unwrap();
        let transect = source.build().unwrap();
        assert_eq!(transect.num_columns(), 2);
        assert_eq!(transect.zs(), vec![12.0, 11.0, 8.5]);
        assert_eq!(transect.column_x(1, ColumnSampling::Centroid), Some(13.75));

        let single = TransectSource::Points {
            points: vec![TransectPoint { x_m: 0.0, z_m: 1.0 }],
        };
        assert!(matches!(
            single.validate(),
            Err(MeshError::InvalidConfig { field: "transect.points", .. })
        ));
    }
}
