use std::path::PathBuf;
use std::sync::Arc;

use spdlog::sink::{RotatingFileSink, RotationPolicy, StdStream, StdStreamSink};
use spdlog::{Level, LevelFilter, Logger, LoggerBuilder};

use crate::config::{Config, LogLevel};

pub const DEFAULT_STDERR_LEVEL: LogLevel = LogLevel::Warn;

pub fn to_level(level: LogLevel) -> Level {
    match level {
        LogLevel::Critical => Level::Critical,
        LogLevel::Error => Level::Error,
        LogLevel::Warn => Level::Warn,
        LogLevel::Info => Level::Info,
        LogLevel::Debug => Level::Debug,
        LogLevel::Trace => Level::Trace,
    }
}

// Messages at `stderr_level` or more severe go to stderr, the rest to stdout
fn add_console_sinks(builder: &mut LoggerBuilder, stderr_level: Level) -> spdlog::Result<()> {
    let progress = StdStreamSink::builder()
        .std_stream(StdStream::Stdout)
        .level_filter(LevelFilter::MoreVerbose(stderr_level))
        .build()?;
    let problems = StdStreamSink::builder()
        .std_stream(StdStream::Stderr)
        .level_filter(LevelFilter::MoreSevereEqual(stderr_level))
        .build()?;

    builder.sink(Arc::new(progress)).sink(Arc::new(problems));
    Ok(())
}

pub fn default_log_location() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("postpress").join("log").join("postpress.log"))
}

/// Without a `log` section the console logger from spdlog is kept as is.
pub fn configure_logger(config: &Config) -> spdlog::Result<()> {
    let Some(ref log) = config.log else {
        return Ok(());
    };

    let mut builder = Logger::builder();

    if let Some(location) = log.location.clone().or_else(default_log_location) {
        let daily_sink = Arc::new(RotatingFileSink::builder()
            .base_path(location)
            .rotation_policy(RotationPolicy::Daily { hour: 0, minute: 0 })
            .max_files(30)
            .rotate_on_open(false)
            .build()?);
        builder.sink(daily_sink);
    }

    if log.log_to_console {
        let stderr_level = log.stderr_level.unwrap_or(DEFAULT_STDERR_LEVEL);
        add_console_sinks(&mut builder, to_level(stderr_level))?;
    }

    let logger = Arc::new(builder.build()?);
    logger.set_flush_level_filter(LevelFilter::MoreSevereEqual(Level::Info));
    logger.set_level_filter(LevelFilter::MoreSevereEqual(to_level(log.level)));

    spdlog::set_default_logger(logger);

    Ok(())
}
