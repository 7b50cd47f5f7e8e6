// src/material.rs - Material classes and per-cell material ID assignment

use crate::constants::{
    BEDROCK_MATERIAL_ID, FILLER_MATERIAL_ID, MINERAL_MATERIAL_ID, ORGANIC_MATERIAL_ID,
};
use crate::error::{MeshError, MeshResult};
use crate::layer_schedule::LayerSchedule;
use log::{debug, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Integer code the simulator uses to look up soil/rock properties.
pub type MaterialId = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialType {
    Organic,
    Mineral,
    Bedrock,
    Filler,
}

impl MaterialType {
    pub fn default_id(&self) -> MaterialId {
        DEFAULT_MATERIAL_IDS
            .get(self)
            .copied()
            .unwrap_or(FILLER_MATERIAL_ID)
    }
}

pub static DEFAULT_MATERIAL_IDS: Lazy<HashMap<MaterialType, MaterialId>> = Lazy::new(|| {
    use MaterialType::*;
    let mut m = HashMap::new();
    m.insert(Organic, ORGANIC_MATERIAL_ID);
    m.insert(Mineral, MINERAL_MATERIAL_ID);
    m.insert(Bedrock, BEDROCK_MATERIAL_ID);
    m.insert(Filler, FILLER_MATERIAL_ID);
    m
});

/// Material for one layer: a single ID, or one ID per surface column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayerMaterial {
    Uniform(MaterialId),
    PerColumn(Vec<MaterialId>),
}

impl LayerMaterial {
    /// Collapses a per-column vector that holds a single repeated ID.
    pub fn from_columns(ids: &[MaterialId]) -> Self {
        match ids.split_first() {
            Some((first, rest)) if rest.iter().all(|id| id == first) => {
                LayerMaterial::Uniform(*first)
            }
            _ => LayerMaterial::PerColumn(ids.to_vec()),
        }
    }

    pub fn at(&self, column: usize) -> Option<MaterialId> {
        match self {
            LayerMaterial::Uniform(id) => Some(*id),
            LayerMaterial::PerColumn(ids) => ids.get(column).copied(),
        }
    }

    fn ids(&self) -> Vec<MaterialId> {
        match self {
            LayerMaterial::Uniform(id) => vec![*id],
            LayerMaterial::PerColumn(ids) => ids.clone(),
        }
    }
}

/// How a layer is mapped onto materials: by its cumulative depth, or listed per layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ClassificationRule {
    /// Organic above the column's organic thickness, mineral at and below it.
    OrganicThickness {
        organic_id: MaterialId,
        mineral_id: MaterialId,
    },
    /// Organic above `organic_depth_m`, mineral down to `mineral_depth_m`, bedrock below.
    FixedDepths {
        organic_depth_m: f64,
        mineral_depth_m: f64,
        organic_id: MaterialId,
        mineral_id: MaterialId,
        bedrock_id: MaterialId,
    },
    /// Layer `j` takes `ids[j]`, whatever its depth.
    PerLayer { ids: Vec<LayerMaterial> },
}

impl ClassificationRule {
    /// Depth-based ID; `None` for the per-layer rule, which ignores depth.
    pub fn classify(&self, depth_m: f64, organic_thickness_m: f64) -> Option<MaterialId> {
        match *self {
            ClassificationRule::OrganicThickness {
                organic_id,
                mineral_id,
            } => Some(if depth_m < organic_thickness_m {
                organic_id
            } else {
                mineral_id
            }),
            ClassificationRule::FixedDepths {
                organic_depth_m,
                mineral_depth_m,
                organic_id,
                mineral_id,
                bedrock_id,
            } => Some(if depth_m < organic_depth_m {
                organic_id
            } else if depth_m < mineral_depth_m {
                mineral_id
            } else {
                bedrock_id
            }),
            ClassificationRule::PerLayer { .. } => None,
        }
    }

    /// IDs for every column of layer `index`.
    fn layer_ids(
        &self,
        index: usize,
        depth_m: f64,
        column_thickness_m: &[f64],
    ) -> MeshResult<Vec<MaterialId>> {
        let num_columns = column_thickness_m.len();
        if let ClassificationRule::PerLayer { ids } = self {
            let material = ids.get(index).ok_or(MeshError::LengthMismatch {
                what: "per-layer material ids",
                expected: index + 1,
                actual: ids.len(),
            })?;
            return (0..num_columns)
                .map(|column| {
                    material.at(column).ok_or(MeshError::LengthMismatch {
                        what: "material ids per layer",
                        expected: num_columns,
                        actual: column,
                    })
                })
                .collect();
        }
        Ok(column_thickness_m
            .iter()
            .filter_map(|&t| self.classify(depth_m, t))
            .collect())
    }

    pub fn ids(&self) -> Vec<MaterialId> {
        match *self {
            ClassificationRule::OrganicThickness {
                organic_id,
                mineral_id,
            } => vec![organic_id, mineral_id],
            ClassificationRule::FixedDepths {
                organic_id,
                mineral_id,
                bedrock_id,
                ..
            } => vec![organic_id, mineral_id, bedrock_id],
            ClassificationRule::PerLayer { ref ids } => {
                ids.iter().flat_map(LayerMaterial::ids).collect()
            }
        }
    }
}

/// What to do with material entries past the last schedule layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailingFill {
    /// Exactly one entry per schedule layer.
    Omit,
    /// Keep adding filler entries until there is one per vertical cell.
    PadToCellCount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationConfig {
    pub rule: ClassificationRule,
    /// Only this many layers from the top are classified; `None` classifies all of them.
    pub classified_layers: Option<usize>,
    pub filler_id: MaterialId,
    pub trailing_fill: TrailingFill,
}

impl ClassificationConfig {
    pub fn validate(&self) -> MeshResult<()> {
        if let ClassificationRule::FixedDepths {
            organic_depth_m,
            mineral_depth_m,
            ..
        } = self.rule
        {
            if !(organic_depth_m >= 0.0) || !(mineral_depth_m > organic_depth_m) {
                return Err(MeshError::invalid(
                    "classification.rule",
                    format!(
                        "need 0 <= organic_depth_m ({}) < mineral_depth_m ({})",
                        organic_depth_m, mineral_depth_m
                    ),
                ));
            }
        }
        if let ClassificationRule::PerLayer { ids } = &self.rule {
            if ids.is_empty() {
                return Err(MeshError::invalid("classification.rule.ids", "no layers listed"));
            }
            if ids.iter().any(|m| matches!(m, LayerMaterial::PerColumn(c) if c.is_empty())) {
                return Err(MeshError::invalid(
                    "classification.rule.ids",
                    "per-column entry lists no ids",
                ));
            }
        }
        if self.classified_layers == Some(0) {
            return Err(MeshError::invalid(
                "classification.classified_layers",
                "must classify at least one layer",
            ));
        }
        Ok(())
    }

    /// Every ID the table may contain under this config.
    pub fn allowed_ids(&self) -> BTreeSet<MaterialId> {
        let mut ids: BTreeSet<MaterialId> = self.rule.ids().into_iter().collect();
        ids.insert(self.filler_id);
        ids
    }
}

/// Material IDs stored one sequence per layer entry, each a vector over columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialTable {
    num_columns: usize,
    layers: Vec<Vec<MaterialId>>,
}

impl MaterialTable {
    pub fn assign(
        schedule: &LayerSchedule,
        column_thickness_m: &[f64],
        config: &ClassificationConfig,
    ) -> MeshResult<MaterialTable> {
        config.validate()?;
        let num_columns = column_thickness_m.len();
        if num_columns == 0 {
            return Err(MeshError::LengthMismatch {
                what: "organic thickness samples",
                expected: 1,
                actual: 0,
            });
        }

        let classified = config
            .classified_layers
            .unwrap_or(schedule.len())
            .min(schedule.len());
        if config.classified_layers.is_some_and(|n| n > schedule.len()) {
            warn!(
                "classified_layers = {:?} exceeds the {} schedule layers",
                config.classified_layers,
                schedule.len()
            );
        }

        if let ClassificationRule::PerLayer { ids } = &config.rule {
            if ids.len() < classified {
                return Err(MeshError::LengthMismatch {
                    what: "per-layer material ids",
                    expected: classified,
                    actual: ids.len(),
                });
            }
            if ids.len() > classified {
                warn!(
                    "{} per-layer material ids for {} classified layers; the rest are ignored",
                    ids.len(),
                    classified
                );
            }
        }

        let mut layers: Vec<Vec<MaterialId>> = schedule
            .layers()
            .iter()
            .enumerate()
            .map(|(j, layer)| {
                if j < classified {
                    config
                        .rule
                        .layer_ids(j, layer.cumulative_depth_m, column_thickness_m)
                } else {
                    Ok(vec![config.filler_id; num_columns])
                }
            })
            .collect::<MeshResult<_>>()?;

        if config.trailing_fill == TrailingFill::PadToCellCount {
            let total_cells = schedule.total_cells();
            while layers.len() < total_cells {
                layers.push(vec![config.filler_id; num_columns]);
            }
        }

        debug!(
            "material table: {} columns x {} entries ({} classified)",
            num_columns,
            layers.len(),
            classified
        );
        Ok(MaterialTable {
            num_columns,
            layers,
        })
    }

    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    /// Number of per-layer entries, including any trailing filler.
    pub fn num_entries(&self) -> usize {
        self.layers.len()
    }

    pub fn get(&self, column: usize, layer: usize) -> Option<MaterialId> {
        self.layers.get(layer).and_then(|ids| ids.get(column)).copied()
    }

    pub fn layer(&self, layer: usize) -> Option<&[MaterialId]> {
        self.layers.get(layer).map(|ids| ids.as_slice())
    }

    pub fn layers(&self) -> &[Vec<MaterialId>] {
        &self.layers
    }

    /// IDs down one surface column, top first.
    pub fn column(&self, column: usize) -> Option<Vec<MaterialId>> {
        if column >= self.num_columns {
            return None;
        }
        Some(self.layers.iter().map(|ids| ids[column]).collect())
    }

    pub fn distinct_ids(&self) -> BTreeSet<MaterialId> {
        self.layers.iter().flatten().copied().collect()
    }
}
