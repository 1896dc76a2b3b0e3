//! Structured event logging for the engine.
//!
//! The engine only emits `tracing` events; the embedding program decides
//! whether and where they are printed. [`init_logging`] installs a stderr
//! subscriber for programs that want the stock behaviour:
//!
//! ```ignore
//! use ig_core::logging::{init_logging, LogSettings, LogContext, Stage, event_names};
//!
//! init_logging(&LogSettings::from_env());
//!
//! let ctx = LogContext::generate();
//! log_event!(ctx, INFO, event_names::RUN_STARTED, Stage::Init, "starting analysis");
//! ```
//!
//! Run ids live only in logs so that bundles stay reproducible.

pub mod events;

pub use events::{event_names, LogContext, Stage};

use std::io::IsTerminal;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

type StderrLayer = Box<dyn Layer<Layered<EnvFilter, Registry>> + Send + Sync>;

const DEFAULT_DIRECTIVE: &str = "info";

/// Line format on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Human,
    /// One JSON object per event, fields flattened.
    Jsonl,
}

impl LogFormat {
    /// Accepts `human` / `pretty` and `jsonl` / `json`, any case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "human" | "pretty" => Some(LogFormat::Human),
            "jsonl" | "json" => Some(LogFormat::Jsonl),
            _ => None,
        }
    }
}

/// What [`init_logging`] installs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub format: LogFormat,
    /// `EnvFilter` directive such as `info` or `ig_core=debug,warn`.
    pub directive: String,
    pub timestamps: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            format: LogFormat::Human,
            directive: DEFAULT_DIRECTIVE.to_string(),
            timestamps: true,
        }
    }
}

impl LogSettings {
    /// Read `IG_LOG` (falling back to `RUST_LOG`) and `IG_LOG_FORMAT`.
    pub fn from_env() -> Self {
        let directive = std::env::var("IG_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok();
        let format = std::env::var("IG_LOG_FORMAT").ok();
        Self::from_values(directive.as_deref(), format.as_deref())
    }

    /// Blank or missing values keep the defaults; an unknown format is
    /// ignored rather than rejected.
    pub fn from_values(directive: Option<&str>, format: Option<&str>) -> Self {
        let mut settings = Self::default();
        if let Some(d) = directive.map(str::trim).filter(|d| !d.is_empty()) {
            settings.directive = d.to_string();
        }
        if let Some(f) = format.and_then(LogFormat::parse) {
            settings.format = f;
        }
        settings
    }

    pub fn without_timestamps(mut self) -> Self {
        self.timestamps = false;
        self
    }
}

/// Install a global stderr subscriber.
///
/// An unparsable directive falls back to `info`. Returns false when a
/// global subscriber was already installed.
pub fn init_logging(settings: &LogSettings) -> bool {
    let filter = EnvFilter::try_new(&settings.directive)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let layer: StderrLayer = match settings.format {
        LogFormat::Human => {
            let human = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal());
            if settings.timestamps {
                human.boxed()
            } else {
                human.without_time().boxed()
            }
        }
        LogFormat::Jsonl => fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .with_span_list(false)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .is_ok()
}

/// Generate a unique run ID for this invocation.
pub fn generate_run_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    // First 12 hex chars are enough to tell runs apart in a log stream
    format!("run-{}", &uuid.simple().to_string()[..12])
}

/// Convenience macro for structured event logging with context.
///
/// Usage:
/// ```ignore
/// log_event!(ctx, INFO, event_names::METRICS_FINISHED, Stage::Metrics, "KPIs computed",
///     kpis = 12, series = 4);
/// ```
#[macro_export]
macro_rules! log_event {
    ($ctx:expr, INFO, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)*) => {
        tracing::info!(
            target: $event,
            run_id = %$ctx.run_id,
            stage = %$stage,
            message = $msg,
            $($key = $val,)*
        )
    };
    ($ctx:expr, DEBUG, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)*) => {
        tracing::debug!(
            target: $event,
            run_id = %$ctx.run_id,
            stage = %$stage,
            message = $msg,
            $($key = $val,)*
        )
    };
    ($ctx:expr, WARN, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)*) => {
        tracing::warn!(
            target: $event,
            run_id = %$ctx.run_id,
            stage = %$stage,
            message = $msg,
            $($key = $val,)*
        )
    };
    ($ctx:expr, ERROR, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)*) => {
        tracing::error!(
            target: $event,
            run_id = %$ctx.run_id,
            stage = %$stage,
            message = $msg,
            $($key = $val,)*
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_run_id() {
        let id1 = generate_run_id();
        let id2 = generate_run_id();

        assert!(id1.starts_with("run-"));
        assert_ne!(id1, id2);
        // Format: run-<12 hex chars>
        assert_eq!(id1.len(), 16);
        assert!(id1[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_settings_default_to_human_info() {
        let settings = LogSettings::from_values(None, None);
        assert_eq!(settings, LogSettings::default());
        assert_eq!(settings.directive, "info");
        assert_eq!(settings.format, LogFormat::Human);
    }

    #[test]
    fn test_settings_read_directive_and_format() {
        let settings = LogSettings::from_values(Some(" ig_core=debug "), Some("JSON"));
        assert_eq!(settings.directive, "ig_core=debug");
        assert_eq!(settings.format, LogFormat::Jsonl);
    }

    #[test]
    fn test_blank_or_unknown_values_keep_defaults() {
        let settings = LogSettings::from_values(Some("   "), Some("xml"));
        assert_eq!(settings.directive, "info");
        assert_eq!(settings.format, LogFormat::Human);
        assert!(!settings.without_timestamps().timestamps);
    }

    #[test]
    fn test_log_event_macro_expands() {
        let ctx = LogContext::new("run-000000000000");
        crate::log_event!(
            ctx,
            DEBUG,
            event_names::RUN_STARTED,
            Stage::Init,
            "macro smoke test",
            rows = 3usize
        );
    }
}
