// Material ID codes read by the downstream simulator
pub const ORGANIC_MATERIAL_ID: i32 = 1001;
pub const MINERAL_MATERIAL_ID: i32 = 1002;
pub const BEDROCK_MATERIAL_ID: i32 = 1003;
pub const FILLER_MATERIAL_ID: i32 = 101; // everything past the classified layers

// Layer type tags understood by the extruder
pub const LAYER_TYPE_CONSTANT: &str = "constant"; // dz constant within the layer
pub const LAYER_TYPE_SNAPPED: &str = "snapped"; // bottom pinned to an elevation

// Telescoping defaults shared by both hillslope setups
pub const INITIAL_DZ_M: f64 = 0.01; // 1 cm top cell
pub const ORGANIC_GROWTH_FACTOR: f64 = 1.2;
pub const MINERAL_GROWTH_FACTOR: f64 = 1.4;
pub const BEDROCK_GROWTH_FACTOR: f64 = 1.5;
pub const MAX_SCHEDULE_ITERATIONS: usize = 10_000;

// === 1 km hillslope, 10% slope, laterally varying organic layer ===

pub const HILLSLOPE_LENGTH_M: f64 = 1000.0;
pub const HILLSLOPE_NUM_POINTS: usize = 101; // 10 m columns
pub const HILLSLOPE_INTERCEPT_M: f64 = 100.0;
pub const HILLSLOPE_SLOPE: f64 = 0.1;
pub const HILLSLOPE_ORGANIC_MAX_ITERATION: usize = 20; // i <= 20 grows at 1.2
pub const HILLSLOPE_MINERAL_MAX_ITERATION: usize = 26; // 20 < i <= 26 grows at 1.4
pub const HILLSLOPE_DZ_CAP_M: f64 = 2.0;
pub const HILLSLOPE_TARGET_DEPTH_M: f64 = 45.0;
pub const HILLSLOPE_CLASSIFIED_LAYERS: usize = 21;
pub const HILLSLOPE_OUTPUT: &str = "test_org_rk.exo";

// === Yakou catchment, 1 km at 20% slope, fixed layer depths ===

pub const YAKOU_INTERCEPT_M: f64 = 200.0;
pub const YAKOU_SLOPE: f64 = 0.2;
pub const YAKOU_ORGANIC_DEPTH_M: f64 = 0.60;
pub const YAKOU_MINERAL_DEPTH_M: f64 = 30.0;
pub const YAKOU_BEDROCK_DEPTH_M: f64 = 40.0;
pub const YAKOU_OUTPUT: &str = "Yakou_model_trial.exo";

// Environment variable pointing at the ATS source tree
pub const ATS_SRC_DIR_ENV: &str = "ATS_SRC_DIR";
pub const ATS_PYTHON_ENV: &str = "ATS_PYTHON"; // interpreter override, python3 otherwise
pub const DEFAULT_PYTHON: &str = "python3";
pub const MESHING_ATS_SUBDIR: [&str; 2] = ["tools", "meshing_ats"];
