use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

/// Dependency targets that flood the log at debug level
const NOISY_TARGETS: &[&str] = &["actix_server", "actix_http", "mio"];

/// Initialize the logger with custom formatting
///
/// Noisy dependency targets are capped at `warn` unless tracing is requested.
pub fn init_logger(level: LevelFilter) {
    let mut builder = Builder::new();

    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .filter(None, level);

    for target in NOISY_TARGETS.iter().copied() {
        builder.filter(Some(target), dependency_level(level));
    }

    builder.init();
}

/// Level applied to dependency targets for a given application level
fn dependency_level(level: LevelFilter) -> LevelFilter {
    if level == LevelFilter::Trace {
        LevelFilter::Trace
    } else {
        level.min(LevelFilter::Warn)
    }
}

/// Get log level from string
pub fn get_log_level(level: &str) -> LevelFilter {
    match level.trim().to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" | "warning" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}
