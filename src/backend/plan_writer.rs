use super::{MeshBackend, PendingVolume, SurfaceMesh, TransectSurface};
use crate::error::MeshResult;
use crate::extrusion::ExtrusionPlan;
use crate::transect::Transect;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Everything the external library needs to build and export one mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshJob {
    pub x: Vec<f64>,
    pub z: Vec<f64>,
    #[serde(flatten)]
    pub plan: ExtrusionPlan,
}

impl MeshJob {
    pub fn new(volume: &PendingVolume) -> Self {
        MeshJob {
            x: volume.surface.transect.xs(),
            z: volume.surface.transect.zs(),
            plan: volume.plan.clone(),
        }
    }

    pub fn write_json(&self, path: &Path) -> MeshResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn read_json(path: &Path) -> MeshResult<MeshJob> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

pub(crate) fn pending_volume(
    surface: &TransectSurface,
    plan: &ExtrusionPlan,
) -> MeshResult<PendingVolume> {
    plan.validate(surface.num_cells())?;
    Ok(PendingVolume {
        surface: surface.clone(),
        plan: plan.clone(),
    })
}

/// Dry-run backend: writes the mesh job as JSON instead of calling the library.
#[derive(Debug, Default, Clone)]
pub struct PlanWriter;

impl PlanWriter {
    pub fn new() -> Self {
        PlanWriter
    }
}

impl MeshBackend for PlanWriter {
    type Surface = TransectSurface;
    type Volume = PendingVolume;

    fn surface_from_transect(&mut self, transect: &Transect) -> MeshResult<TransectSurface> {
        Ok(TransectSurface {
            transect: transect.clone(),
        })
    }

    fn extrude(
        &mut self,
        surface: &TransectSurface,
        plan: &ExtrusionPlan,
    ) -> MeshResult<PendingVolume> {
        pending_volume(surface, plan)
    }

    fn write(&mut self, volume: &PendingVolume, path: &Path) -> MeshResult<()> {
        MeshJob::new(volume).write_json(path)?;
        info!("wrote mesh job to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer_schedule::{ExplicitLayer, LayerSchedule};
    use crate::material::{ClassificationConfig, ClassificationRule, MaterialTable, TrailingFill};
    use crate::transect::TransectConfig;
    use tempfile::tempdir;

    #[test]
    fn test_plan_writer_round_trip() {
        let transect = Transect::linear(&TransectConfig {
            x_start_m: 0.0,
            x_end_m: 20.0,
            num_points: 3,
            intercept_m: 10.0,
            slope: 0.5,
        })
        .unwrap();
        let schedule = LayerSchedule::explicit(&[
            ExplicitLayer::constant(0.5, 5),
            ExplicitLayer::constant(4.5, 3),
        ])
        .unwrap();
        let table = MaterialTable::assign(
            &schedule,
            &[1.0, 0.2],
            &ClassificationConfig {
                rule: ClassificationRule::OrganicThickness {
                    organic_id: 1001,
                    mineral_id: 1002,
                },
                classified_layers: None,
                filler_id: 101,
                trailing_fill: TrailingFill::Omit,
            },
        )
        .unwrap();
        let plan = ExtrusionPlan::new(&schedule, &table).unwrap();

        let mut backend = PlanWriter::new();
        let surface = backend.surface_from_transect(&transect).unwrap();
        assert_eq!(surface.num_cells(), 2);
        let volume = backend.extrude(&surface, &plan).unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("plan.job.json");
        backend.write(&volume, &path).unwrap();

        let job = MeshJob::read_json(&path).unwrap();
        assert_eq!(job.x, vec![0.0, 10.0, 20.0]);
        assert_eq!(job.z, vec![10.0, 5.0, 0.0]);
        assert_eq!(job.plan, plan);
    }
}
