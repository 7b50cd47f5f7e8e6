// 1 km hillslope, 10% slope, organic layer thickness varying along the slope.
// Needs ATS_SRC_DIR pointing at an ATS checkout with tools/meshing_ats.

use hillslope_mesh::backend::AtsMeshing;
use hillslope_mesh::logging::init_logging;
use hillslope_mesh::{MeshBuild, MeshConfig, MeshResult};

fn main() -> MeshResult<()> {
    init_logging(None);

    let build = MeshBuild::new(MeshConfig::hillslope_organic())?;
    let mut backend = AtsMeshing::from_env()?;
    let report = build.run(&mut backend)?;

    println!("🏔️  Hillslope mesh");
    println!("   surface cells:  {}", report.surface_cells);
    println!("   layers:         {}", report.layers);
    println!("   vertical cells: {}", report.vertical_cells);
    println!("   depth:          {} m", report.depth_m);
    println!("   material ids:   {:?}", report.material_ids);
    println!("   output:         {}", report.output.display());
    Ok(())
}
