use std::time::{Duration, Instant};

use crate::routines::output::OutputFile;
use crate::routines::settings::Settings;
use eyre::{Result, WrapErr};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Setup logging for the library
///
/// This function sets up logging for the library. It uses the `tracing` crate, and the `tracing-subscriber` crate for formatting.
///
/// The log level is defined in the configuration file, and defaults to `INFO`.
///
/// If `output.write` is set, the log is also written to `log.file` inside the output folder.
/// If `log.stdout` is set, the log messages are written to stdout.
///
/// Only one subscriber can be installed per process; a second call returns an error.
pub fn setup_log(settings: &Settings) -> Result<()> {
    // Use the log level defined in configuration file
    let log_level = settings.log.level.as_str();
    let level = log_level
        .parse::<LevelFilter>()
        .wrap_err_with(|| format!("Invalid log level: {}", log_level))?;
    let env_filter = EnvFilter::new(level.to_string());

    let timestamper = CompactTimestamp {
        start: Instant::now(),
    };

    // Define a registry with that level as an environment filter
    let subscriber = Registry::default().with(env_filter);

    // Define layer for file
    let file_layer = if settings.output.write {
        let outputfile = OutputFile::new(&settings.output.path, &settings.log.file)?;
        let layer = fmt::layer()
            .with_writer(outputfile.file_owned())
            .with_ansi(false)
            .with_timer(timestamper.clone());
        Some(layer)
    } else {
        None
    };

    // Define layer for stdout
    let stdout_layer = if settings.log.stdout {
        let layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(false)
            .with_timer(timestamper.clone());
        Some(layer)
    } else {
        None
    };

    // Combine layers with subscriber
    subscriber
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .wrap_err("A global subscriber is already installed")?;

    tracing::debug!("Logging is configured with level: {}", log_level);
    Ok(())
}

/// Elapsed time since logging was set up, with millisecond precision
#[derive(Clone)]
struct CompactTimestamp {
    start: Instant,
}

impl FormatTime for CompactTimestamp {
    fn format_time(
        &self,
        w: &mut tracing_subscriber::fmt::format::Writer<'_>,
    ) -> Result<(), std::fmt::Error> {
        write!(w, "{}", compact(self.start.elapsed()))
    }
}

fn compact(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!(
        "{:02}h {:02}m {:02}.{:03}s",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60,
        elapsed.subsec_millis()
    )
}
