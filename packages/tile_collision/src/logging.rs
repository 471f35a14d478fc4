//! Global logging system.

use std::{
    fs::File,
    sync::Arc,
    env,
    panic,
};
use anyhow::*;
use backtrace::Backtrace;
use tracing_subscriber::{
    fmt::{
        self,
        time::uptime,
    },
    prelude::*,
    Registry,
    EnvFilter,
};


/// Default logging environment filter. Our crates are debug, everything else is warn.
const DEFAULT_FILTER: &'static str = "warn,tile_grid=debug,tile_collision=debug";

/// Name of the file logs are also written to, when enabled.
pub const LOG_FILE_NAME: &'static str = "log";

// default filter with the RUST_LOG env var, if any, appended
fn filter_string(env_filter: Option<&str>) -> String {
    let mut filter = DEFAULT_FILTER.to_owned();
    if let Some(env_filter) = env_filter {
        filter.push(',');
        filter.push_str(env_filter);
    }
    filter
}

/// Initializes a `tracing` logging backend which outputs to stdout, and also a `log` file if
/// `log_file` is set. Accepts ecosystem-standard `RUST_LOG` env filters. Routes panics through
/// the logging system too.
///
/// Errors if a global subscriber is already installed or the log file can't be created.
pub fn init_logging(log_file: bool) -> Result<()> {
    let format = fmt::format()
        .compact()
        .with_timer(uptime())
        .with_line_number(true);
    let stdout_log = fmt::layer()
        .event_format(format);

    let log_file_log = if log_file {
        let file = File::create(LOG_FILE_NAME)
            .context("unable to create log file")?;
        Some(fmt::layer()
            .with_ansi(false)
            .with_writer(Arc::new(file)))
    } else {
        None
    };

    let filter = filter_string(env::var(EnvFilter::DEFAULT_ENV).ok().as_deref());

    let subscriber = Registry::default()
        .with(EnvFilter::new(filter))
        .with(stdout_log)
        .with(log_file_log);
    tracing::subscriber::set_global_default(subscriber)
        .context("unable to install log subscriber")?;
    info!("starting program");

    // make panic messages and backtrace go through logging system
    panic::set_hook(Box::new(|info| {
        error!("{}", info);
        if env::var("RUST_BACKTRACE").map(|val| val == "1").unwrap_or(true) {
            error!("{:?}", Backtrace::new());
        }
    }));
    trace!("installed custom panic hook");
    Ok(())
}


#[test]
fn test_filter_string() {
    assert_eq!(filter_string(None), DEFAULT_FILTER);
    assert_eq!(
        filter_string(Some("tile_collision=trace")),
        "warn,tile_grid=debug,tile_collision=debug,tile_collision=trace",
    );
}
