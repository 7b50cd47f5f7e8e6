// src/logging.rs - env_logger setup for the demo binaries

use env_logger::{Builder, Target};
use log::LevelFilter;
use std::io::Write;

/// Initialize logging.
///
/// `level` ("info", "debug", ...) wins over `RUST_LOG`; with neither set the
/// level is `Info`. Calling it twice is harmless.
pub fn init_logging(level: Option<&str>) {
    let log_level = level
        .and_then(|l| l.parse::<LevelFilter>().ok())
        .or_else(|| {
            std::env::var("RUST_LOG")
                .ok()
                .and_then(|v| v.parse::<LevelFilter>().ok())
        })
        .unwrap_or(LevelFilter::Info);

    let _ = Builder::new()
        .filter_level(log_level)
        .target(Target::Stdout)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {:5} {}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init();
}
