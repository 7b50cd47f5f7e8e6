// src/layer_schedule.rs - Telescoping vertical discretization
//
// Layers project downwards from the surface: layer 0 is the top.

use crate::constants::{LAYER_TYPE_CONSTANT, LAYER_TYPE_SNAPPED, MAX_SCHEDULE_ITERATIONS};
use crate::error::{MeshError, MeshResult};
use crate::math_utils::ordered_sum;
use crate::transect::Transect;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// How the extruder spaces cells inside a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// dz is constant within the layer
    Constant,
    /// Bottom pinned to an absolute elevation; thickness follows the surface
    Snapped,
}

impl LayerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::Constant => LAYER_TYPE_CONSTANT,
            LayerKind::Snapped => LAYER_TYPE_SNAPPED,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            LAYER_TYPE_CONSTANT => Some(LayerKind::Constant),
            LAYER_TYPE_SNAPPED => Some(LayerKind::Snapped),
            _ => None,
        }
    }
}

/// Which part of the schedule produced a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Organic,
    Mineral,
    Bedrock,
    /// Closing layer that brings the column to its target depth
    Fill,
    /// Listed by hand rather than grown
    Explicit,
}

/// One logical layer. All four per-layer quantities are built together.
///
/// A snapped layer has no fixed thickness: `thickness_m` is zero,
/// `cumulative_depth_m` is the depth of its top and `bottom_elevation_m`
/// holds the elevation its bottom is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub kind: LayerKind,
    pub zone: Zone,
    pub thickness_m: f64,
    pub cell_count: usize,
    pub cumulative_depth_m: f64, // depth of the layer bottom
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_elevation_m: Option<f64>,
}

impl Layer {
    pub fn top_depth_m(&self) -> f64 {
        self.cumulative_depth_m - self.thickness_m
    }

    /// The number the extruder takes for this layer.
    pub fn layer_data(&self) -> f64 {
        self.bottom_elevation_m.unwrap_or(self.thickness_m)
    }

    /// Thickness under a surface node at elevation `surface_z_m`.
    pub fn thickness_below(&self, surface_z_m: f64) -> f64 {
        match self.bottom_elevation_m {
            Some(bottom) => surface_z_m - self.top_depth_m() - bottom,
            None => self.thickness_m,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IterationZone {
    pub zone: Zone,
    pub factor: f64,
    /// Last iteration index (inclusive) grown with this factor; `None` for the remainder
    pub max_iteration: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthZone {
    pub zone: Zone,
    pub factor: f64,
    /// Cumulative depth (inclusive) up to which this factor applies; `None` for the remainder
    pub max_depth_m: Option<f64>,
}

/// Growth zones, selected either by loop iteration or by depth reached so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "by", content = "zones", rename_all = "snake_case")]
pub enum GrowthZones {
    Iteration(Vec<IterationZone>),
    Depth(Vec<DepthZone>),
}

impl GrowthZones {
    fn select(&self, iteration: usize, depth_m: f64) -> Option<(Zone, f64)> {
        match self {
            GrowthZones::Iteration(zones) => zones
                .iter()
                .find(|z| z.max_iteration.is_none_or(|max| iteration <= max))
                .map(|z| (z.zone, z.factor)),
            GrowthZones::Depth(zones) => zones
                .iter()
                .find(|z| z.max_depth_m.is_none_or(|max| depth_m <= max))
                .map(|z| (z.zone, z.factor)),
        }
    }

    fn factors(&self) -> Vec<f64> {
        match self {
            GrowthZones::Iteration(zones) => zones.iter().map(|z| z.factor).collect(),
            GrowthZones::Depth(zones) => zones.iter().map(|z| z.factor).collect(),
        }
    }

    fn validate(&self) -> MeshResult<()> {
        let factors = self.factors();
        if factors.is_empty() {
            return Err(MeshError::invalid("schedule.zones", "no growth zones"));
        }
        if let Some(f) = factors.iter().find(|f| !(**f > 1.0) || !f.is_finite()) {
            return Err(MeshError::invalid(
                "schedule.zones.factor",
                format!("growth factor {} must be finite and > 1", f),
            ));
        }

        // Limits must increase and only the last zone may be open-ended
        let limits: Vec<Option<f64>> = match self {
            GrowthZones::Iteration(zones) => zones
                .iter()
                .map(|z| z.max_iteration.map(|m| m as f64))
                .collect(),
            GrowthZones::Depth(zones) => zones.iter().map(|z| z.max_depth_m).collect(),
        };
        let last = limits.len() - 1;
        for (i, limit) in limits.iter().enumerate() {
            match limit {
                None if i != last => {
                    return Err(MeshError::invalid(
                        "schedule.zones",
                        format!("zone {} is open-ended but is not the last zone", i),
                    ));
                }
                Some(_) if i == last => {
                    return Err(MeshError::invalid(
                        "schedule.zones",
                        "the last zone must be open-ended",
                    ));
                }
                _ => {}
            }
        }
        let bounded: Vec<f64> = limits.iter().flatten().copied().collect();
        if bounded.windows(2).any(|w| w[1] <= w[0]) {
            return Err(MeshError::invalid("schedule.zones", "zone limits must increase"));
        }
        Ok(())
    }
}

/// Loop condition of the growth phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StopCondition {
    /// Keep growing while dz is below the cap
    ThicknessBelow { cap_m: f64 },
    /// Keep growing while the accumulated depth has not passed the target
    DepthAtMost,
}

impl StopCondition {
    fn keep_growing(&self, dz_m: f64, depth_m: f64, target_depth_m: f64) -> bool {
        match *self {
            StopCondition::ThicknessBelow { cap_m } => dz_m < cap_m,
            StopCondition::DepthAtMost => depth_m <= target_depth_m,
        }
    }
}

/// How the grown layers are closed off at the target depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Closure {
    /// Add one thick layer covering the remainder, split into cells of about the last dz
    AppendFill,
    /// Drop the layer that overshot the target and replace it with an exact one-cell remainder
    ReplaceOvershoot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelescopingConfig {
    pub initial_dz_m: f64,
    pub zones: GrowthZones,
    pub stop: StopCondition,
    pub closure: Closure,
    pub target_depth_m: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

fn default_max_iterations() -> usize {
    MAX_SCHEDULE_ITERATIONS
}

impl TelescopingConfig {
    pub fn validate(&self) -> MeshResult<()> {
        if !(self.initial_dz_m > 0.0) || !self.initial_dz_m.is_finite() {
            return Err(MeshError::invalid(
                "schedule.initial_dz_m",
                format!("{} must be positive", self.initial_dz_m),
            ));
        }
        if !(self.target_depth_m > self.initial_dz_m) || !self.target_depth_m.is_finite() {
            return Err(MeshError::invalid(
                "schedule.target_depth_m",
                format!(
                    "{} must exceed initial_dz_m {}",
                    self.target_depth_m, self.initial_dz_m
                ),
            ));
        }
        if let StopCondition::ThicknessBelow { cap_m } = self.stop {
            if !(cap_m > 0.0) || !cap_m.is_finite() {
                return Err(MeshError::invalid(
                    "schedule.stop.cap_m",
                    format!("{} must be positive", cap_m),
                ));
            }
        }
        if self.max_iterations == 0 {
            return Err(MeshError::invalid("schedule.max_iterations", "must be at least 1"));
        }
        self.zones.validate()
    }
}

/// A hand-listed layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExplicitLayer {
    Constant { thickness_m: f64, cell_count: usize },
    /// Runs from the layer above down to `bottom_elevation_m`; only allowed last
    Snapped {
        bottom_elevation_m: f64,
        cell_count: usize,
    },
}

impl ExplicitLayer {
    pub fn constant(thickness_m: f64, cell_count: usize) -> Self {
        ExplicitLayer::Constant {
            thickness_m,
            cell_count,
        }
    }

    pub fn snapped(bottom_elevation_m: f64, cell_count: usize) -> Self {
        ExplicitLayer::Snapped {
            bottom_elevation_m,
            cell_count,
        }
    }

    pub fn cell_count(&self) -> usize {
        match *self {
            ExplicitLayer::Constant { cell_count, .. } => cell_count,
            ExplicitLayer::Snapped { cell_count, .. } => cell_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "generator", rename_all = "snake_case")]
pub enum ScheduleConfig {
    Telescoping(TelescopingConfig),
    Explicit { layers: Vec<ExplicitLayer> },
}

impl ScheduleConfig {
    pub fn validate(&self) -> MeshResult<()> {
        match self {
            ScheduleConfig::Telescoping(config) => config.validate(),
            ScheduleConfig::Explicit { layers } => validate_explicit(layers),
        }
    }

    pub fn build(&self) -> MeshResult<LayerSchedule> {
        match self {
            ScheduleConfig::Telescoping(config) => LayerSchedule::telescoping(config),
            ScheduleConfig::Explicit { layers } => LayerSchedule::explicit(layers),
        }
    }
}

fn validate_explicit(layers: &[ExplicitLayer]) -> MeshResult<()> {
    if layers.is_empty() {
        return Err(MeshError::invalid("schedule.layers", "no layers listed"));
    }
    let last = layers.len() - 1;
    for (i, layer) in layers.iter().enumerate() {
        match *layer {
            ExplicitLayer::Constant { thickness_m, .. } => {
                if !(thickness_m > 0.0) || !thickness_m.is_finite() {
                    return Err(MeshError::invalid(
                        "schedule.layers.thickness_m",
                        format!("layer {} has thickness {}", i, thickness_m),
                    ));
                }
            }
            ExplicitLayer::Snapped {
                bottom_elevation_m, ..
            } => {
                if i != last {
                    return Err(MeshError::invalid(
                        "schedule.layers.kind",
                        format!("layer {} is snapped but is not the last layer", i),
                    ));
                }
                if !bottom_elevation_m.is_finite() {
                    return Err(MeshError::invalid(
                        "schedule.layers.bottom_elevation_m",
                        "must be finite",
                    ));
                }
            }
        }
        if layer.cell_count() == 0 {
            return Err(MeshError::invalid(
                "schedule.layers.cell_count",
                format!("layer {} has no cells", i),
            ));
        }
    }
    Ok(())
}

/// Ordered layers from the surface down, ending exactly at the target depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSchedule {
    layers: Vec<Layer>,
}

impl LayerSchedule {
    pub fn telescoping(config: &TelescopingConfig) -> MeshResult<LayerSchedule> {
        config.validate()?;
        let target = config.target_depth_m;

        let mut layers: Vec<Layer> = Vec::new();
        let mut dz = config.initial_dz_m;
        let mut depth = 0.0;
        let mut iteration = 0;

        while config.stop.keep_growing(dz, depth, target) {
            if iteration >= config.max_iterations {
                return Err(MeshError::ScheduleDiverged {
                    iterations: iteration,
                    dz_m: dz,
                });
            }
            let (zone, factor) = config.zones.select(iteration, depth).ok_or_else(|| {
                MeshError::invalid("schedule.zones", format!("no zone for iteration {}", iteration))
            })?;
            dz *= factor;
            depth += dz;
            layers.push(Layer {
                kind: LayerKind::Constant,
                zone,
                thickness_m: dz,
                cell_count: 1,
                cumulative_depth_m: depth,
                bottom_elevation_m: None,
            });
            iteration += 1;
        }
        debug!("grew {} layers to {:.4} m (dz = {:.4} m)", layers.len(), depth, dz);

        let cell_count = match config.closure {
            Closure::AppendFill => None,
            Closure::ReplaceOvershoot => {
                layers.pop();
                Some(1)
            }
        };

        let fill = target - ordered_sum(layers.iter().map(|l| l.thickness_m));
        if !(fill > 0.0) {
            return Err(MeshError::invalid(
                "schedule.target_depth_m",
                format!(
                    "grown layers already reach {:.4} m, past the {} m target",
                    target - fill,
                    target
                ),
            ));
        }
        let cell_count = cell_count.unwrap_or_else(|| ((fill / dz).floor() as usize).max(1));
        layers.push(Layer {
            kind: LayerKind::Constant,
            zone: Zone::Fill,
            thickness_m: fill,
            cell_count,
            cumulative_depth_m: target,
            bottom_elevation_m: None,
        });

        let schedule = LayerSchedule { layers };
        info!(
            "telescoping schedule: {} layers, {} vertical cells, {} m deep",
            schedule.len(),
            schedule.total_cells(),
            schedule.total_depth_m()
        );
        Ok(schedule)
    }

    pub fn explicit(listed: &[ExplicitLayer]) -> MeshResult<LayerSchedule> {
        validate_explicit(listed)?;
        let mut depth = 0.0;
        let layers = listed
            .iter()
            .map(|l| match *l {
                ExplicitLayer::Constant {
                    thickness_m,
                    cell_count,
                } => {
                    depth += thickness_m;
                    Layer {
                        kind: LayerKind::Constant,
                        zone: Zone::Explicit,
                        thickness_m,
                        cell_count,
                        cumulative_depth_m: depth,
                        bottom_elevation_m: None,
                    }
                }
                ExplicitLayer::Snapped {
                    bottom_elevation_m,
                    cell_count,
                } => Layer {
                    kind: LayerKind::Snapped,
                    zone: Zone::Explicit,
                    thickness_m: 0.0,
                    cell_count,
                    cumulative_depth_m: depth,
                    bottom_elevation_m: Some(bottom_elevation_m),
                },
            })
            .collect();
        Ok(LayerSchedule { layers })
    }

    /// Checks that a snapped bottom lies below the fixed layers under every surface node.
    pub fn fit_to_surface(&self, transect: &Transect) -> MeshResult<()> {
        for layer in self.layers.iter().filter(|l| l.kind == LayerKind::Snapped) {
            if let Some(p) = transect
                .points()
                .iter()
                .find(|p| !(layer.thickness_below(p.z_m) > 0.0))
            {
                return Err(MeshError::invalid(
                    "schedule.layers.bottom_elevation_m",
                    format!(
                        "{} m is not below the fixed layers at x = {} (surface {} m, {} m deep)",
                        layer.layer_data(),
                        p.x_m,
                        p.z_m,
                        layer.top_depth_m()
                    ),
                ));
            }
        }
        Ok(())
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn total_cells(&self) -> usize {
        self.layers.iter().map(|l| l.cell_count).sum()
    }

    pub fn total_depth_m(&self) -> f64 {
        self.layers.last().map_or(0.0, |l| l.cumulative_depth_m)
    }

    pub fn zone_count(&self, zone: Zone) -> usize {
        self.layers.iter().filter(|l| l.zone == zone).count()
    }

    pub fn layer_types(&self) -> Vec<&'static str> {
        self.layers.iter().map(|l| l.kind.as_str()).collect()
    }

    pub fn thicknesses(&self) -> Vec<f64> {
        self.layers.iter().map(|l| l.thickness_m).collect()
    }

    /// Per-layer numbers for the extruder: thickness, or bottom elevation when snapped.
    pub fn layer_data(&self) -> Vec<f64> {
        self.layers.iter().map(|l| l.layer_data()).collect()
    }

    pub fn cell_counts(&self) -> Vec<usize> {
        self.layers.iter().map(|l| l.cell_count).collect()
    }

    pub fn cumulative_depths(&self) -> Vec<f64> {
        self.layers.iter().map(|l| l.cumulative_depth_m).collect()
    }
}
