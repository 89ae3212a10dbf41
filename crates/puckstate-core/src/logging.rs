//! Structured logging foundation for puckstate-core.
//!
//! Dual-mode logging on stderr: human-readable console output for
//! interactive use, JSON lines for machine consumption. stdout stays
//! reserved for command payloads (the rendered report), so piping the
//! report never mixes in log lines.
//!
//! The filter respects `RUST_LOG` when set; otherwise verbosity flags pick
//! the level for the `puckstate` crates.

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable console lines.
    #[default]
    Human,
    /// One JSON object per line.
    Json,
}

/// Logging configuration resolved from CLI flags.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level directive for the puckstate crates (error/info/debug/trace).
    pub level: &'static str,
    pub format: LogFormat,
    pub timestamps: bool,
}

impl LogConfig {
    /// Resolve from the global CLI flags.
    pub fn from_flags(verbose: u8, quiet: bool, json: bool) -> Self {
        let level = if quiet {
            "error"
        } else {
            match verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        };
        Self {
            level,
            format: if json { LogFormat::Json } else { LogFormat::Human },
            timestamps: json,
        }
    }
}

/// Initialize the logging subsystem.
///
/// Must be called once at startup before any logging occurs.
pub fn init_logging(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "puckstate_core={level},puckstate_common={level},puckstate_math={level}",
            level = config.level
        ))
    });

    match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(use_ansi);

            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .init();
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .init();
            }
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer().json().with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .init();
        }
    }
}
