// Dry run: build a mesh job from a JSON config without calling meshing_ats.
//
//   cargo run --example plan_from_config -- configs/lobster_explicit.json
//
// The job JSON lands next to the config's output path (`mesh.exo` -> `mesh.job.json`).

use hillslope_mesh::backend::{AtsMeshing, PlanWriter};
use hillslope_mesh::json_parser::load_config;
use hillslope_mesh::logging::init_logging;
use hillslope_mesh::{MeshBuild, MeshConfig, MeshResult};

fn main() -> MeshResult<()> {
    init_logging(Some("debug"));

    let mut config = match std::env::args().nth(1) {
        Some(path) => load_config(path)?,
        None => MeshConfig::hillslope_organic(),
    };
    config.output = AtsMeshing::job_path(&config.output);

    let build = MeshBuild::new(config)?;
    let report = build.run(&mut PlanWriter::new())?;

    println!("📝 {} -> {}", report.name, report.output.display());
    println!(
        "   {} layers, {} vertical cells, {} volume cells",
        report.layers,
        report.vertical_cells,
        report.volume_cells()
    );
    Ok(())
}
