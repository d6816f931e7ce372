//! Log setup
//!
//! Stdout belongs to the VT writer, so logs go to a file next to the
//! config (`.../aesop/aesop.log`) through a non-blocking appender.
//! `AESOP_LOG` takes the usual env-filter directives.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Install the global subscriber. The returned guard must stay alive
/// for the process lifetime or buffered log lines are lost.
pub fn init() -> Option<WorkerGuard> {
    let dir = Config::path()?.parent()?.to_path_buf();
    let appender = tracing_appender::rolling::never(dir, "aesop.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env("AESOP_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}
