//! File logging.
//!
//! The terminal belongs to the UI, so log lines go to `logging.file`
//! (`~/.local/share/kalkulacka/kalkulacka.log` on Linux).
//!
//! ```toml
//! [logging]
//! level = "warn"
//!
//! [logging.modules]
//! "kalkulacka::oracle" = "debug"
//! ```
//!
//! `RUST_LOG` takes precedence over the config:
//! ```bash
//! RUST_LOG=kalkulacka=debug kalkulacka
//! ```

use std::fs::{self, OpenOptions};
use std::sync::{Mutex, Once};

use anyhow::Result;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::LoggingConfig;

static INIT: Once = Once::new();

/// Compact time format: HH:MM:SS.mmm
struct CompactTime;

impl FormatTime for CompactTime {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S%.3f"))
    }
}

/// Filter directive built from the config: default level plus module overrides.
pub fn filter_directive(config: &LoggingConfig) -> String {
    let mut directive = config.level.clone();
    for (module, level) in &config.modules {
        directive.push_str(&format!(",{module}={level}"));
    }
    directive
}

/// Install the global subscriber. Only the first call has an effect.
///
/// Fails if the log file cannot be opened; the caller decides whether to run
/// without logs.
pub fn init_with_config(config: &LoggingConfig) -> Result<()> {
    if let Some(parent) = config.file.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)?;

    INIT.call_once(|| {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(filter_directive(config))
        };

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(true)
            .with_timer(CompactTime)
            .with_level(true)
            .with_filter(filter);

        tracing_subscriber::registry().with(fmt_layer).init();
    });
    Ok(())
}
