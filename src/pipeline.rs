// src/pipeline.rs - Linear build: transect, layers, materials, hand-off

use crate::backend::{MeshBackend, SurfaceMesh};
use crate::config::MeshConfig;
use crate::error::{MeshError, MeshResult};
use crate::extrusion::ExtrusionPlan;
use crate::layer_schedule::LayerSchedule;
use crate::material::{MaterialId, MaterialTable};
use crate::transect::Transect;
use log::info;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Everything computed before the external library is involved.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedMesh {
    pub transect: Transect,
    pub schedule: LayerSchedule,
    pub column_thickness_m: Vec<f64>,
    pub materials: MaterialTable,
    pub plan: ExtrusionPlan,
}

/// Summary of a finished build.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshReport {
    pub name: String,
    pub output: PathBuf,
    pub surface_cells: usize,
    pub layers: usize,
    pub vertical_cells: usize,
    pub depth_m: f64,
    pub material_ids: BTreeSet<MaterialId>,
}

impl MeshReport {
    pub fn volume_cells(&self) -> usize {
        self.surface_cells * self.vertical_cells
    }
}

pub struct MeshBuild {
    config: MeshConfig,
}

impl MeshBuild {
    pub fn new(config: MeshConfig) -> MeshResult<MeshBuild> {
        config.validate()?;
        Ok(MeshBuild { config })
    }

    pub fn prepare(&self) -> MeshResult<PreparedMesh> {
        let config = &self.config;

        let transect = config.transect.build()?;
        info!(
            "[{}] transect: {} nodes, {} columns",
            config.name,
            transect.len(),
            transect.num_columns()
        );

        let schedule = config.schedule.build()?;
        schedule.fit_to_surface(&transect)?;
        let column_thickness_m = config
            .organic_thickness
            .sample_columns(&transect, config.column_sampling)?;
        let materials =
            MaterialTable::assign(&schedule, &column_thickness_m, &config.classification)?;
        let plan = ExtrusionPlan::new(&schedule, &materials)?.compacted();

        Ok(PreparedMesh {
            transect,
            schedule,
            column_thickness_m,
            materials,
            plan,
        })
    }

    pub fn run<B: MeshBackend>(&self, backend: &mut B) -> MeshResult<MeshReport> {
        let prepared = self.prepare()?;

        let surface = backend.surface_from_transect(&prepared.transect)?;
        if surface.num_cells() != prepared.materials.num_columns() {
            return Err(MeshError::LengthMismatch {
                what: "surface cells",
                expected: prepared.materials.num_columns(),
                actual: surface.num_cells(),
            });
        }

        let volume = backend.extrude(&surface, &prepared.plan)?;
        backend.write(&volume, &self.config.output)?;

        let report = MeshReport {
            name: self.config.name.clone(),
            output: self.config.output.clone(),
            surface_cells: surface.num_cells(),
            layers: prepared.schedule.len(),
            vertical_cells: prepared.schedule.total_cells(),
            depth_m: prepared.schedule.total_depth_m(),
            material_ids: prepared.materials.distinct_ids(),
        };
        info!(
            "[{}] {} surface cells x {} vertical cells ({} layers, {} m) -> {}",
            report.name,
            report.surface_cells,
            report.vertical_cells,
            report.layers,
            report.depth_m,
            report.output.display()
        );
        Ok(report)
    }
}
