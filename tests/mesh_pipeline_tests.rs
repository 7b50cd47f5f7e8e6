// End-to-end checks of the two hillslope setups against a recording backend

use approx::assert_abs_diff_eq;
use hillslope_mesh::backend::{MeshBackend, MeshJob, PlanWriter, SurfaceMesh};
use hillslope_mesh::extrusion::ExtrusionPlan;
use hillslope_mesh::json_parser::load_config;
use hillslope_mesh::layer_schedule::Zone;
use hillslope_mesh::material::LayerMaterial;
use hillslope_mesh::transect::Transect;
use hillslope_mesh::{MeshBuild, MeshConfig, MeshError, MeshResult};
use more_asserts::assert_gt;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

struct RecordedSurface {
    cells: usize,
}

impl SurfaceMesh for RecordedSurface {
    fn num_cells(&self) -> usize {
        self.cells
    }
}

/// Stands in for meshing_ats and keeps every call it receives.
#[derive(Default)]
struct RecordingBackend {
    surface_cells_override: Option<usize>,
    transect: Option<Transect>,
    plan: Option<ExtrusionPlan>,
    written: Vec<PathBuf>,
    fail_write: bool,
}

impl MeshBackend for RecordingBackend {
    type Surface = RecordedSurface;
    type Volume = ExtrusionPlan;

    fn surface_from_transect(&mut self, transect: &Transect) -> MeshResult<RecordedSurface> {
        self.transect = Some(transect.clone());
        Ok(RecordedSurface {
            cells: self
                .surface_cells_override
                .unwrap_or(transect.num_columns()),
        })
    }

    fn extrude(
        &mut self,
        surface: &RecordedSurface,
        plan: &ExtrusionPlan,
    ) -> MeshResult<ExtrusionPlan> {
        plan.validate(surface.num_cells())?;
        self.plan = Some(plan.clone());
        Ok(plan.clone())
    }

    fn write(&mut self, _volume: &ExtrusionPlan, path: &Path) -> MeshResult<()> {
        if self.fail_write {
            return Err(MeshError::Backend("disk full".to_string()));
        }
        self.written.push(path.to_path_buf());
        Ok(())
    }
}

fn per_column(material: &LayerMaterial) -> Vec<i32> {
    match material {
        LayerMaterial::PerColumn(ids) => ids.clone(),
        LayerMaterial::Uniform(id) => vec![*id],
    }
}

#[test]
fn test_hillslope_end_to_end() {
    println!("🏔️ Hillslope with varying organic layer");

    let mut backend = RecordingBackend::default();
    let build = MeshBuild::new(MeshConfig::hillslope_organic()).unwrap();
    let report = build.run(&mut backend).unwrap();

    assert_eq!(report.output, PathBuf::from("test_org_rk.exo"));
    assert_eq!(backend.written, vec![PathBuf::from("test_org_rk.exo")]);
    assert_eq!(report.surface_cells, 100);
    assert_eq!(report.depth_m, 45.0);

    let transect = backend.transect.as_ref().unwrap();
    for p in transect.points() {
        assert_eq!(p.z_m, 100.0 - 0.1 * p.x_m);
    }

    let prepared = build.prepare().unwrap();
    let schedule = &prepared.schedule;
    assert_eq!(schedule.zone_count(Zone::Organic), 21);
    assert_eq!(schedule.zone_count(Zone::Fill), 1);
    let layers = schedule.layers();
    let fill = layers[layers.len() - 1];
    let final_dz = layers[layers.len() - 2].thickness_m;
    assert_eq!(fill.cell_count, (fill.thickness_m / final_dz).floor() as usize);

    // 21 classified layers, filler for the rest and one entry per vertical cell
    let plan = backend.plan.as_ref().unwrap();
    assert_eq!(plan.num_layers(), schedule.len());
    assert_eq!(plan.material_ids.len(), schedule.total_cells());
    for (j, material) in plan.material_ids.iter().enumerate() {
        let ids = per_column(material);
        if j < 21 {
            assert!(ids.iter().all(|id| *id == 1001 || *id == 1002));
        } else {
            assert!(ids.iter().all(|id| *id == 101));
        }
    }
    assert_eq!(report.material_ids, BTreeSet::from([101, 1001, 1002]));
}

#[test]
fn test_hillslope_organic_transition() {
    let prepared = MeshBuild::new(MeshConfig::hillslope_organic())
        .unwrap()
        .prepare()
        .unwrap();
    let depths = prepared.schedule.cumulative_depths();

    for (column, &thickness) in prepared.column_thickness_m.iter().enumerate() {
        let ids = prepared.materials.column(column).unwrap();
        let first_mineral = depths
            .iter()
            .position(|&d| d >= thickness)
            .unwrap();
        assert_gt!(first_mineral, 0);
        assert!(first_mineral < 21);
        for (j, id) in ids.iter().take(21).enumerate() {
            let expected = if j < first_mineral { 1001 } else { 1002 };
            assert_eq!(*id, expected, "column {} layer {}", column, j);
        }
    }

    // Ridge columns are thickest, mid-slope thinnest
    assert_abs_diff_eq!(prepared.column_thickness_m[0], 0.5, epsilon = 1e-9);
    assert_abs_diff_eq!(prepared.column_thickness_m[50], 0.05, epsilon = 1e-9);
    let organic_layers = |c: usize| {
        prepared
            .materials
            .column(c)
            .unwrap()
            .iter()
            .filter(|id| **id == 1001)
            .count()
    };
    assert_eq!(organic_layers(0), 12);
    assert_eq!(organic_layers(50), 3);
}

#[test]
fn test_yakou_end_to_end() {
    println!("⛰️ Yakou catchment with fixed layer depths");

    let mut backend = RecordingBackend::default();
    let build = MeshBuild::new(MeshConfig::yakou_catchment()).unwrap();
    let report = build.run(&mut backend).unwrap();

    assert_eq!(backend.written, vec![PathBuf::from("Yakou_model_trial.exo")]);
    assert_eq!(report.depth_m, 40.0);

    let transect = backend.transect.as_ref().unwrap();
    for p in transect.points() {
        assert_eq!(p.z_m, 200.0 - 0.2 * p.x_m);
    }

    // One layer per cell, so padding adds nothing and the lists line up
    let plan = backend.plan.as_ref().unwrap();
    assert_eq!(plan.layer_types.len(), plan.layer_data.len());
    assert_eq!(plan.layer_ncells.len(), plan.layer_data.len());
    assert_eq!(plan.material_ids.len(), plan.layer_data.len());
    assert!(plan.layer_ncells.iter().all(|n| *n == 1));

    assert_eq!(report.material_ids, BTreeSet::from([1001, 1002, 1003]));

    let prepared = build.prepare().unwrap();
    for (layer, ids) in prepared.schedule.layers().iter().zip(prepared.materials.layers()) {
        let expected = if layer.cumulative_depth_m < 0.6 {
            1001
        } else if layer.cumulative_depth_m < 30.0 {
            1002
        } else {
            1003
        };
        assert!(ids.iter().all(|id| *id == expected));
    }
}

#[test]
fn test_reruns_are_identical() {
    for config in [MeshConfig::hillslope_organic(), MeshConfig::yakou_catchment()] {
        let build = MeshBuild::new(config).unwrap();
        let a = build.prepare().unwrap();
        let b = build.prepare().unwrap();
        assert_eq!(a, b);
        let bits = |p: &hillslope_mesh::PreparedMesh| -> Vec<u64> {
            p.schedule.thicknesses().iter().map(|t| t.to_bits()).collect()
        };
        assert_eq!(bits(&a), bits(&b));
    }
}

#[test]
fn test_surface_cell_mismatch() {
    let mut backend = RecordingBackend {
        surface_cells_override: Some(99),
        ..Default::default()
    };
    let build = MeshBuild::new(MeshConfig::yakou_catchment()).unwrap();
    assert!(matches!(
        build.run(&mut backend),
        Err(MeshError::LengthMismatch { what: "surface cells", expected: 100, actual: 99 })
    ));
    assert!(backend.written.is_empty());
}

#[test]
fn test_backend_errors_propagate() {
    let mut backend = RecordingBackend {
        fail_write: true,
        ..Default::default()
    };
    let build = MeshBuild::new(MeshConfig::hillslope_organic()).unwrap();
    assert!(matches!(build.run(&mut backend), Err(MeshError::Backend(_))));
}

#[test]
fn test_shipped_configs_match_presets() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("configs");

    let hillslope = load_config(dir.join("hillslope_organic.json")).unwrap();
    assert_eq!(hillslope, MeshConfig::hillslope_organic());

    let yakou = load_config(dir.join("yakou_catchment.json")).unwrap();
    assert_eq!(yakou, MeshConfig::yakou_catchment());
}

#[test]
fn test_explicit_config_dry_run() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("configs");
    let mut config = load_config(dir.join("lobster_explicit.json")).unwrap();
    let out = tempdir().unwrap();
    config.output = out.path().join("lobster_explicit.job.json");

    let report = MeshBuild::new(config.clone())
        .unwrap()
        .run(&mut PlanWriter::new())
        .unwrap();

    // Five fixed layers and a sixth snapped to -40 m
    assert_eq!(report.layers, 6);
    assert_eq!(report.vertical_cells, 118);
    assert_eq!(report.surface_cells, 10);
    assert_abs_diff_eq!(report.depth_m, 20.0, epsilon = 1e-9);
    assert_eq!(report.material_ids, BTreeSet::from([10000, 20000]));

    let job = MeshJob::read_json(&config.output).unwrap();
    assert_eq!(job.x.len(), 11);
    assert_eq!(job.plan.layer_types.last().map(String::as_str), Some("snapped"));
    assert_eq!(job.plan.layer_data, vec![0.2, 0.8, 1.0, 5.0, 13.0, -40.0]);
    assert_eq!(job.plan.layer_ncells, vec![10, 40, 20, 25, 13, 10]);
    let mut expected = vec![LayerMaterial::Uniform(10000)];
    expected.extend(vec![LayerMaterial::Uniform(20000); 5]);
    assert_eq!(job.plan.material_ids, expected);
}
