use std::sync::Once;

/// Crates whose `info` output drowns the renderer's own messages.
const NOISY_MODULES: [&str; 3] = ["wgpu_core", "wgpu_hal", "naga"];

/// Logger configuration.
///
/// `env_filter` uses the `env_logger` directive syntax, e.g.
/// `"tessera_tilemap=debug,warn"`. When it is `None`, `RUST_LOG` applies, then `Info`
/// with the GPU stack capped at `Warn`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    /// Routes output through the test harness capture.
    pub capture_for_tests: bool,
}

impl LoggingConfig {
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self { env_filter: Some(filter.into()), ..Self::default() }
    }

    /// Debug output from the tessera crates, warnings from everything else, captured
    /// per test.
    pub fn for_tests() -> Self {
        Self { capture_for_tests: true, ..Self::with_filter("tessera=debug,warn") }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            capture_for_tests: false,
        }
    }
}

fn builder(config: &LoggingConfig) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    match config.env_filter.clone().or_else(|| std::env::var("RUST_LOG").ok()) {
        Some(filter) => {
            builder.parse_filters(&filter);
        }
        None => {
            builder.filter_level(log::LevelFilter::Info);
            for module in NOISY_MODULES {
                builder.filter_module(module, log::LevelFilter::Warn);
            }
        }
    }
    builder.write_style(config.write_style).is_test(config.capture_for_tests);
    builder
}

static INIT: Once = Once::new();

/// Installs the global logger on first call; later calls do nothing.
///
/// A logger installed by someone else wins silently.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        if builder(&config).try_init().is_ok() {
            log::debug!("logging: env_logger installed");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_keeps_tessera_debug_output() {
        let config = LoggingConfig::for_tests();
        assert_eq!(config.env_filter.as_deref(), Some("tessera=debug,warn"));
        assert!(config.capture_for_tests);

        init_logging(config);
        init_logging(LoggingConfig::default());
        assert!(log::log_enabled!(target: "tessera_engine::worker", log::Level::Debug));
        assert!(!log::log_enabled!(target: "wgpu_core", log::Level::Info));
    }
}
