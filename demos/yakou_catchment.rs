// Yakou catchment: organic / mineral / bedrock at fixed depths down to 40 m.
// Needs ATS_SRC_DIR pointing at an ATS checkout with tools/meshing_ats.

use hillslope_mesh::backend::AtsMeshing;
use hillslope_mesh::logging::init_logging;
use hillslope_mesh::{MeshBuild, MeshConfig, MeshResult};

fn main() -> MeshResult<()> {
    init_logging(None);

    let build = MeshBuild::new(MeshConfig::yakou_catchment())?;

    println!("📐 Layer schedule");
    println!("Layer | Zone     | dz (m)  | Cells | Depth (m)");
    println!("------|----------|---------|-------|----------");
    let prepared = build.prepare()?;
    for (j, layer) in prepared.schedule.layers().iter().enumerate() {
        println!(
            "{:5} | {:8} | {:7.4} | {:5} | {:8.3}",
            j,
            format!("{:?}", layer.zone),
            layer.thickness_m,
            layer.cell_count,
            layer.cumulative_depth_m
        );
    }

    let mut backend = AtsMeshing::from_env()?;
    let report = build.run(&mut backend)?;
    println!(
        "\n✅ {} x {} cells written to {}",
        report.surface_cells,
        report.vertical_cells,
        report.output.display()
    );
    Ok(())
}
