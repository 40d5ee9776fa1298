//! Logger setup.
//!
//! The sandbox logs through the `log` facade; [`init`] installs a `fern`
//! dispatcher writing to stderr.

use log::LevelFilter;

/// Picks the effective level. `RUST_LOG` wins over the configured value when
/// it parses, and anything unparsable falls back to `Info`.
fn resolve_level(configured: &str, env: Option<&str>) -> LevelFilter {
    env.and_then(|s| s.trim().parse().ok())
        .or_else(|| configured.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Installs the global logger. Returns an error if a logger is already set.
pub fn init(configured_level: &str) -> Result<(), log::SetLoggerError> {
    let env = std::env::var("RUST_LOG").ok();
    let level = resolve_level(configured_level, env.as_deref());

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {:<5} {}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .level_for("egui_glow", LevelFilter::Warn)
        .chain(std::io::stderr())
        .apply()?;

    log::debug!("logging initialized at {level}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_overrides_config() {
        assert_eq!(resolve_level("info", Some("debug")), LevelFilter::Debug);
        assert_eq!(resolve_level("warn", None), LevelFilter::Warn);
    }

    #[test]
    fn test_garbage_falls_back() {
        assert_eq!(resolve_level("trace", Some("loud")), LevelFilter::Trace);
        assert_eq!(resolve_level("nope", Some("")), LevelFilter::Info);
    }
}
