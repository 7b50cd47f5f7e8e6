// src/backend/ats.rs - Hand-off to the ATS `meshing_ats` Python library

use super::plan_writer::{MeshJob, pending_volume};
use super::{MeshBackend, PendingVolume, TransectSurface};
use crate::constants::{ATS_PYTHON_ENV, ATS_SRC_DIR_ENV, DEFAULT_PYTHON, MESHING_ATS_SUBDIR};
use crate::error::{MeshError, MeshResult};
use crate::extrusion::ExtrusionPlan;
use crate::transect::Transect;
use log::{debug, info};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Reads a mesh job, builds the surface and the extrusion with meshing_ats,
/// and writes the Exodus file. argv: meshing_ats dir, job path, output path.
const DRIVER: &str = r#"
import sys, json
sys.path.append(sys.argv[1])
import numpy as np
import meshing_ats

with open(sys.argv[2]) as f:
    job = json.load(f)

m2 = meshing_ats.Mesh2D.from_Transect(np.array(job['x']), np.array(job['z']))
mat_ids = [np.array(m, 'i') if isinstance(m, list) else m for m in job['material_ids']]
m3 = meshing_ats.Mesh3D.extruded_Mesh2D(
    m2, job['layer_types'], job['layer_data'], job['layer_ncells'], mat_ids)
m3.write_exodus(sys.argv[3])
"#;

#[derive(Debug, Clone)]
pub struct AtsMeshing {
    meshing_dir: PathBuf,
    python: OsString,
}

impl AtsMeshing {
    /// Locate meshing_ats under `$ATS_SRC_DIR/tools/meshing_ats`, running it
    /// with `$ATS_PYTHON` when set.
    pub fn from_env() -> MeshResult<Self> {
        Self::locate(
            std::env::var_os(ATS_SRC_DIR_ENV),
            std::env::var_os(ATS_PYTHON_ENV),
        )
    }

    fn locate(ats_src_dir: Option<OsString>, python: Option<OsString>) -> MeshResult<Self> {
        let root = ats_src_dir.ok_or(MeshError::MissingEnv(ATS_SRC_DIR_ENV))?;
        let backend = Self::new(PathBuf::from(root))?;
        Ok(match python {
            Some(python) => backend.with_python(python),
            None => backend,
        })
    }

    pub fn new(ats_src_dir: impl AsRef<Path>) -> MeshResult<Self> {
        let meshing_dir = MESHING_ATS_SUBDIR
            .iter()
            .fold(ats_src_dir.as_ref().to_path_buf(), |dir, part| dir.join(part));
        if !meshing_dir.is_dir() {
            return Err(MeshError::Backend(format!(
                "meshing_ats not found at {}",
                meshing_dir.display()
            )));
        }
        Ok(Self {
            meshing_dir,
            python: OsString::from(DEFAULT_PYTHON),
        })
    }

    pub fn with_python(mut self, python: impl Into<OsString>) -> Self {
        self.python = python.into();
        self
    }

    pub fn meshing_dir(&self) -> &Path {
        &self.meshing_dir
    }

    /// Where the job JSON for `output` is written (`mesh.exo` -> `mesh.job.json`).
    /// It is removed once the driver succeeds and left in place for inspection when it fails.
    pub fn job_path(output: &Path) -> PathBuf {
        output.with_extension("job.json")
    }
}

impl MeshBackend for AtsMeshing {
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
        let job_path = Self::job_path(path);
        MeshJob::new(volume).write_json(&job_path)?;
        debug!("mesh job written to {}", job_path.display());

        let output = Command::new(&self.python)
            .arg("-c")
            .arg(DRIVER)
            .arg(&self.meshing_dir)
            .arg(&job_path)
            .arg(path)
            .output()?;

        if !output.status.success() {
            return Err(MeshError::Backend(format!(
                "{} exited with {}: {} (job kept at {})",
                self.python.to_string_lossy(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim(),
                job_path.display()
            )));
        }
        fs::remove_file(&job_path)?;
        info!("wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::LayerMaterial;
    use crate::transect::TransectPoint;
    use tempfile::tempdir;

    fn ats_root() -> tempfile::TempDir {
        let root = tempdir().unwrap();
        fs::create_dir_all(root.path().join("tools").join("meshing_ats")).unwrap();
        root
    }

    fn small_volume() -> PendingVolume {
        let transect = Transect::from_points(vec![
            TransectPoint { x_m: 0.0, z_m: 1.0 },
            TransectPoint { x_m: 10.0, z_m: 0.5 },
        ])
        .unwrap();
        PendingVolume {
            surface: TransectSurface { transect },
            plan: ExtrusionPlan {
                layer_types: vec!["constant".to_string()],
                layer_data: vec![1.0],
                layer_ncells: vec![2],
                material_ids: vec![LayerMaterial::Uniform(1001)],
            },
        }
    }

    #[test]
    fn test_missing_env() {
        assert!(matches!(
            AtsMeshing::locate(None, None),
            Err(MeshError::MissingEnv("ATS_SRC_DIR"))
        ));
    }

    #[test]
    fn test_locates_meshing_dir() {
        let root = ats_root();
        let meshing = root.path().join("tools").join("meshing_ats");

        let backend = AtsMeshing::locate(Some(root.path().into()), None).unwrap();
        assert_eq!(backend.meshing_dir(), meshing.as_path());
        assert_eq!(backend.python, OsString::from("python3"));

        let backend =
            AtsMeshing::locate(Some(root.path().into()), Some("/opt/ats/bin/python".into()))
                .unwrap();
        assert_eq!(backend.python, OsString::from("/opt/ats/bin/python"));

        assert!(matches!(
            AtsMeshing::new(root.path().join("missing")),
            Err(MeshError::Backend(_))
        ));
    }

    #[test]
    fn test_job_path() {
        assert_eq!(
            AtsMeshing::job_path(Path::new("out/test_org_rk.exo")),
            PathBuf::from("out/test_org_rk.job.json")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_job_removed_after_success() {
        let root = ats_root();
        let out = tempdir().unwrap();
        let path = out.path().join("mesh.exo");

        // `true` accepts any arguments and exits 0
        let mut backend = AtsMeshing::new(root.path()).unwrap().with_python("true");
        backend.write(&small_volume(), &path).unwrap();
        assert!(!AtsMeshing::job_path(&path).exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_job_kept_after_failure() {
        let root = ats_root();
        let out = tempdir().unwrap();
        let path = out.path().join("mesh.exo");

        let mut backend = AtsMeshing::new(root.path()).unwrap().with_python("false");
        assert!(matches!(
            backend.write(&small_volume(), &path),
            Err(MeshError::Backend(_))
        ));
        let job = MeshJob::read_json(&AtsMeshing::job_path(&path)).unwrap();
        assert_eq!(job.x, vec![0.0, 10.0]);
        assert_eq!(job.plan.layer_ncells, vec![2]);
    }
}
