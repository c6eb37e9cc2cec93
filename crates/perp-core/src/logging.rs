//! Logging initialization using the `tracing` ecosystem.
//!
//! Console output is human-readable. When a log directory is given, the same
//! events are also written as JSON lines to a daily-rotating file named after
//! the module, so fills and rejections can be grepped or shipped later.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter from `RUST_LOG` if set, otherwise from `log_level`.
pub fn build_filter(log_level: &str) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => level_filter(log_level),
    }
}

/// Filter for an explicit directive string (`"info"`, `"perp_td=debug,warn"`).
pub fn level_filter(log_level: &str) -> anyhow::Result<EnvFilter> {
    Ok(EnvFilter::try_new(log_level)?)
}

/// Install the global subscriber.
///
/// Call once at program start; a second call returns an error.
///
/// - `log_level`: default directive when `RUST_LOG` is unset (e.g. `"info"`,
///   `"perp_td=debug"`)
/// - `log_dir`: optional directory for JSON log files
/// - `module_name`: log file prefix (e.g. `"gate_td"`)
pub fn init_logging(
    log_level: &str,
    log_dir: Option<&str>,
    module_name: &str,
) -> anyhow::Result<()> {
    let console = fmt::layer().with_target(true).with_thread_ids(true);
    let file = log_dir.map(|dir| {
        fmt::layer()
            .json()
            .with_writer(tracing_appender::rolling::daily(dir, module_name))
            .with_current_span(false)
            .with_thread_ids(true)
    });

    tracing_subscriber::registry()
        .with(build_filter(log_level)?)
        .with(console)
        .with(file)
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_directives() {
        assert!(level_filter("info").is_ok());
        assert!(level_filter("perp_td=debug,warn").is_ok());
        assert!(level_filter("perp_td=loud").is_err());
    }

    #[test]
    fn level_filter_keeps_directive() {
        let filter = level_filter("perp_td=debug,warn").unwrap();
        let text = filter.to_string();
        assert!(text.contains("perp_td=debug"));
        assert!(text.contains("warn"));
    }
}
