//! Opt-in log output for hosts and benches that want to watch the model.
//!
//! The model crates only emit `tracing` events (`intern:` hits and misses on
//! `tsm_model::intern`, aggregate freezes on `tsm_model::type_definition`).
//! Whether anything is printed is the host's call; this module is the
//! default answer for binaries that have no subscriber of their own.
//!
//! ```bash
//! TSM_LOG=tsm_model::intern=trace cargo bench
//! TSM_LOG=debug TSM_LOG_FORMAT=tree my-analyzer src/
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// How installed events are rendered. All formats write to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    /// Spans nest, via `tracing-tree`.
    Tree,
    /// One object per line.
    Json,
}

impl LogFormat {
    /// Unknown names render as `Text`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Which model events to show, and how.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TracingConfig {
    /// `RUST_LOG` syntax, e.g. `tsm_model::intern=trace`. `None` installs
    /// nothing.
    pub filter: Option<String>,
    pub format: LogFormat,
}

impl TracingConfig {
    pub fn new(filter: impl Into<String>, format: LogFormat) -> Self {
        TracingConfig {
            filter: Some(filter.into()),
            format,
        }
    }

    /// `TSM_LOG` wins over `RUST_LOG`; `TSM_LOG_FORMAT` picks the format.
    pub fn from_env() -> Self {
        let filter = std::env::var("TSM_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok()
            .filter(|directives| !directives.trim().is_empty());
        let format = std::env::var("TSM_LOG_FORMAT")
            .map(|value| LogFormat::parse(&value))
            .unwrap_or_default();
        TracingConfig { filter, format }
    }

    /// Install as the global subscriber.
    ///
    /// Returns `false` without side effects when there is no filter or a
    /// global subscriber is already in place.
    pub fn install(&self) -> bool {
        let Some(directives) = self.filter.as_deref() else {
            return false;
        };
        let filter = EnvFilter::builder().parse_lossy(directives);

        let installed = match self.format {
            LogFormat::Text => Registry::default()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .try_init(),
            LogFormat::Tree => Registry::default()
                .with(filter)
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_writer(std::io::stderr)
                        .with_targets(true),
                )
                .try_init(),
            LogFormat::Json => Registry::default()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init(),
        };
        installed.is_ok()
    }
}

/// `TracingConfig::from_env().install()`.
pub fn init_tracing() -> bool {
    TracingConfig::from_env().install()
}
