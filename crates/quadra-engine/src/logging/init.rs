use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "quadra_engine=debug,wgpu=warn"). When it is `None`, `RUST_LOG` is used,
/// then `default_level`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub default_level: log::LevelFilter,
    /// Caps wgpu's own crates at `warn` unless the filter names them.
    pub quiet_wgpu: bool,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: log::LevelFilter::Info,
            quiet_wgpu: true,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Installs the `env_logger` backend once.
///
/// Later calls are ignored. If another logger was installed first, this
/// leaves it in place.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = config.env_filter.or_else(|| std::env::var("RUST_LOG").ok());

        let mut builder = env_logger::Builder::new();
        builder.filter_level(config.default_level);

        if config.quiet_wgpu {
            for module in ["wgpu_core", "wgpu_hal", "naga"] {
                builder.filter_module(module, log::LevelFilter::Warn);
            }
        }

        // Explicit directives last so they override the defaults above.
        if let Some(filter) = filter.as_deref() {
            builder.parse_filters(filter);
        }

        builder.write_style(config.write_style);

        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}
