/// Seam between mesh preparation and the external meshing library.
///
/// The library owns 2-D mesh construction, extrusion and file export. A
/// backend exposes those three calls; errors it reports are returned to the
/// caller unchanged.

pub mod ats;
pub mod plan_writer;

pub use ats::AtsMeshing;
pub use plan_writer::{MeshJob, PlanWriter};

use crate::error::MeshResult;
use crate::extrusion::ExtrusionPlan;
use crate::transect::Transect;
use std::path::Path;

/// Opaque 2-D surface mesh produced by a backend.
pub trait SurfaceMesh {
    fn num_cells(&self) -> usize;
}

pub trait MeshBackend {
    type Surface: SurfaceMesh;
    type Volume;

    /// Build the 2-D surface from the transect nodes.
    fn surface_from_transect(&mut self, transect: &Transect) -> MeshResult<Self::Surface>;

    /// Extrude the surface downwards layer by layer.
    fn extrude(&mut self, surface: &Self::Surface, plan: &ExtrusionPlan)
    -> MeshResult<Self::Volume>;

    /// Write the 3-D mesh to `path`, replacing any existing file.
    fn write(&mut self, volume: &Self::Volume, path: &Path) -> MeshResult<()>;
}

/// Surface built from a transect: one cell between each node pair.
#[derive(Debug, Clone, PartialEq)]
pub struct TransectSurface {
    pub transect: Transect,
}

impl SurfaceMesh for TransectSurface {
    fn num_cells(&self) -> usize {
        self.transect.num_columns()
    }
}

/// Surface plus extrusion plan, ready to hand to the library in one call.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingVolume {
    pub surface: TransectSurface,
    pub plan: ExtrusionPlan,
}
