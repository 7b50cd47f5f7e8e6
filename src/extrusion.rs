// src/extrusion.rs - The four per-layer lists handed to the extruder

use crate::error::{MeshError, MeshResult};
use crate::layer_schedule::LayerSchedule;
use crate::material::{LayerMaterial, MaterialTable};
use log::warn;
use serde::{Deserialize, Serialize};

/// Arguments of the extrusion call, in the order the extruder takes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtrusionPlan {
    pub layer_types: Vec<String>,
    pub layer_data: Vec<f64>,
    pub layer_ncells: Vec<usize>,
    pub material_ids: Vec<LayerMaterial>,
}

impl ExtrusionPlan {
    pub fn new(schedule: &LayerSchedule, table: &MaterialTable) -> MeshResult<ExtrusionPlan> {
        if table.num_entries() < schedule.len() {
            return Err(MeshError::LengthMismatch {
                what: "material entries per layer",
                expected: schedule.len(),
                actual: table.num_entries(),
            });
        }
        if table.num_entries() > schedule.len() {
            warn!(
                "{} material entries for {} layers; trailing filler is passed through",
                table.num_entries(),
                schedule.len()
            );
        }

        Ok(ExtrusionPlan {
            layer_types: schedule
                .layer_types()
                .into_iter()
                .map(str::to_string)
                .collect(),
            layer_data: schedule.layer_data(),
            layer_ncells: schedule.cell_counts(),
            material_ids: table
                .layers()
                .iter()
                .map(|ids| LayerMaterial::PerColumn(ids.clone()))
                .collect(),
        })
    }

    /// Same plan with uniform layers written as a single ID.
    pub fn compacted(mut self) -> Self {
        self.material_ids = self
            .material_ids
            .iter()
            .map(|m| match m {
                LayerMaterial::PerColumn(ids) => LayerMaterial::from_columns(ids),
                uniform => uniform.clone(),
            })
            .collect();
        self
    }

    pub fn num_layers(&self) -> usize {
        self.layer_types.len()
    }

    pub fn total_cells(&self) -> usize {
        self.layer_ncells.iter().sum()
    }

    /// Checks the parallel lists against each other and the surface column count.
    pub fn validate(&self, num_columns: usize) -> MeshResult<()> {
        let n = self.layer_types.len();
        for (what, len) in [
            ("layer_data", self.layer_data.len()),
            ("layer_ncells", self.layer_ncells.len()),
        ] {
            if len != n {
                return Err(MeshError::LengthMismatch {
                    what,
                    expected: n,
                    actual: len,
                });
            }
        }
        if self.material_ids.len() < n {
            return Err(MeshError::LengthMismatch {
                what: "material_ids",
                expected: n,
                actual: self.material_ids.len(),
            });
        }
        for m in &self.material_ids {
            if let LayerMaterial::PerColumn(ids) = m {
                if ids.len() != num_columns {
                    return Err(MeshError::LengthMismatch {
                        what: "material ids per layer",
                        expected: num_columns,
                        actual: ids.len(),
                    });
                }
            }
        }
        Ok(())
    }
}
