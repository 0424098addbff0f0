use std::path::Path;
use std::sync::Arc;

use eyre::WrapErr;
use time::format_description::well_known::Rfc3339;
use time::UtcOffset;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Console (coloured by level) plus a plain log file that is truncated on
/// every run. `RUST_LOG` overrides the default `info` filter.
pub fn init(log_path: &Path) -> eyre::Result<()> {
    crate::config::ensure_parent_dir(log_path).wrap_err("create log directory")?;
    let file = std::fs::File::create(log_path)
        .wrap_err_with(|| format!("create log file {}", log_path.display()))?;

    // Must be resolved before any other thread exists.
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let timer = OffsetTime::new(offset, Rfc3339);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_timer(timer.clone()))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_timer(timer)
                .with_writer(Arc::new(file)),
        )
        .try_init()
        .wrap_err("install tracing subscriber")?;
    Ok(())
}
