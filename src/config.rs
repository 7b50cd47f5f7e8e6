// src/config.rs - Full description of one mesh build

use crate::constants::*;
use crate::error::{MeshError, MeshResult};
use crate::layer_schedule::{
    Closure, DepthZone, GrowthZones, IterationZone, ScheduleConfig, StopCondition,
    TelescopingConfig, Zone,
};
use crate::material::{ClassificationConfig, ClassificationRule, MaterialType, TrailingFill};
use crate::organic_thickness::{OrganicThickness, PiecewiseProfile};
use crate::transect::{ColumnSampling, TransectConfig, TransectSource};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshConfig {
    pub name: String,
    /// Mesh file written by the backend; overwritten on rerun.
    pub output: PathBuf,
    pub transect: TransectSource,
    pub column_sampling: ColumnSampling,
    pub organic_thickness: OrganicThickness,
    pub schedule: ScheduleConfig,
    pub classification: ClassificationConfig,
}

impl MeshConfig {
    pub fn validate(&self) -> MeshResult<()> {
        if self.output.as_os_str().is_empty() {
            return Err(MeshError::invalid("output", "no output file given"));
        }
        self.transect.validate()?;
        self.organic_thickness.validate()?;
        self.schedule.validate()?;
        self.classification.validate()
    }

    /// 1 km hillslope at 10% slope with a laterally varying organic layer,
    /// telescoped from 1 cm to ~2 m cells and filled down to 45 m.
    pub fn hillslope_organic() -> Self {
        MeshConfig {
            name: "hillslope_organic".to_string(),
            output: PathBuf::from(HILLSLOPE_OUTPUT),
            transect: TransectSource::Linear(TransectConfig {
                x_start_m: 0.0,
                x_end_m: HILLSLOPE_LENGTH_M,
                num_points: HILLSLOPE_NUM_POINTS,
                intercept_m: HILLSLOPE_INTERCEPT_M,
                slope: HILLSLOPE_SLOPE,
            }),
            column_sampling: ColumnSampling::LeftNode,
            organic_thickness: OrganicThickness::Piecewise(PiecewiseProfile::hillslope_default()),
            schedule: ScheduleConfig::Telescoping(TelescopingConfig {
                initial_dz_m: INITIAL_DZ_M,
                zones: GrowthZones::Iteration(vec![
                    IterationZone {
                        zone: Zone::Organic,
                        factor: ORGANIC_GROWTH_FACTOR,
                        max_iteration: Some(HILLSLOPE_ORGANIC_MAX_ITERATION),
                    },
                    IterationZone {
                        zone: Zone::Mineral,
                        factor: MINERAL_GROWTH_FACTOR,
                        max_iteration: Some(HILLSLOPE_MINERAL_MAX_ITERATION),
                    },
                    IterationZone {
                        zone: Zone::Bedrock,
                        factor: BEDROCK_GROWTH_FACTOR,
                        max_iteration: None,
                    },
                ]),
                stop: StopCondition::ThicknessBelow {
                    cap_m: HILLSLOPE_DZ_CAP_M,
                },
                closure: Closure::AppendFill,
                target_depth_m: HILLSLOPE_TARGET_DEPTH_M,
                max_iterations: MAX_SCHEDULE_ITERATIONS,
            }),
            classification: ClassificationConfig {
                rule: ClassificationRule::OrganicThickness {
                    organic_id: MaterialType::Organic.default_id(),
                    mineral_id: MaterialType::Mineral.default_id(),
                },
                classified_layers: Some(HILLSLOPE_CLASSIFIED_LAYERS),
                filler_id: MaterialType::Filler.default_id(),
                trailing_fill: TrailingFill::PadToCellCount,
            },
        }
    }

    /// Yakou catchment: 1 km at 20% slope, organic to 0.6 m, mineral to
    /// 30 m, bedrock to 40 m.
    pub fn yakou_catchment() -> Self {
        MeshConfig {
            name: "yakou_catchment".to_string(),
            output: PathBuf::from(YAKOU_OUTPUT),
            transect: TransectSource::Linear(TransectConfig {
                x_start_m: 0.0,
                x_end_m: HILLSLOPE_LENGTH_M,
                num_points: HILLSLOPE_NUM_POINTS,
                intercept_m: YAKOU_INTERCEPT_M,
                slope: YAKOU_SLOPE,
            }),
            column_sampling: ColumnSampling::LeftNode,
            organic_thickness: OrganicThickness::Uniform {
                thickness_m: YAKOU_ORGANIC_DEPTH_M,
            },
            schedule: ScheduleConfig::Telescoping(TelescopingConfig {
                initial_dz_m: INITIAL_DZ_M,
                zones: GrowthZones::Depth(vec![
                    DepthZone {
                        zone: Zone::Organic,
                        factor: ORGANIC_GROWTH_FACTOR,
                        max_depth_m: Some(YAKOU_ORGANIC_DEPTH_M),
                    },
                    DepthZone {
                        zone: Zone::Mineral,
                        factor: MINERAL_GROWTH_FACTOR,
                        max_depth_m: Some(YAKOU_MINERAL_DEPTH_M),
                    },
                    DepthZone {
                        zone: Zone::Bedrock,
                        factor: BEDROCK_GROWTH_FACTOR,
                        max_depth_m: None,
                    },
                ]),
                stop: StopCondition::DepthAtMost,
                closure: Closure::ReplaceOvershoot,
                target_depth_m: YAKOU_BEDROCK_DEPTH_M,
                max_iterations: MAX_SCHEDULE_ITERATIONS,
            }),
            classification: ClassificationConfig {
                rule: ClassificationRule::FixedDepths {
                    organic_depth_m: YAKOU_ORGANIC_DEPTH_M,
                    mineral_depth_m: YAKOU_MINERAL_DEPTH_M,
                    organic_id: MaterialType::Organic.default_id(),
                    mineral_id: MaterialType::Mineral.default_id(),
                    bedrock_id: MaterialType::Bedrock.default_id(),
                },
                classified_layers: None,
                filler_id: MaterialType::Filler.default_id(),
                trailing_fill: TrailingFill::PadToCellCount,
            },
        }
    }
}
