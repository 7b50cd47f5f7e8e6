pub mod backend;
pub mod config;
pub mod constants;
pub mod error;
pub mod extrusion;
pub mod json_parser;
pub mod layer_schedule;
pub mod logging;
pub mod material;
pub mod math_utils;
pub mod organic_thickness;
pub mod pipeline;
pub mod transect;

pub use config::MeshConfig;
pub use error::{MeshError, MeshResult};
pub use pipeline::{MeshBuild, MeshReport, PreparedMesh};
