use std::{fmt, path::Path};

use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level: LevelFilter = (*self).into();
        write!(f, "{}", level.as_str().to_lowercase())
    }
}

/// Install the global logger
///
/// Terminal output goes to stderr so command results on stdout stay
/// parseable. The optional log file never receives color codes.
pub fn setup_logger(
    level: LogLevel,
    file_level: Option<LogLevel>,
    log_file: Option<&Path>,
    disable_color: bool,
    datetime_format: &str,
) -> Result<(), fern::InitError> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Cyan)
        .trace(Color::Magenta);

    let terminal_format = datetime_format.to_owned();
    let terminal = fern::Dispatch::new()
        .level(level.into())
        .format(move |out, message, record| {
            let now = chrono::Local::now().format(&terminal_format);
            if disable_color {
                out.finish(format_args!(
                    "{} [{:>5}] [{}] {}",
                    now,
                    record.level(),
                    record.target(),
                    message
                ))
            } else {
                out.finish(format_args!(
                    "{} [{:>5}] [{}] {}",
                    now,
                    colors.color(record.level()),
                    record.target(),
                    message
                ))
            }
        })
        .chain(std::io::stderr());

    let mut dispatch = fern::Dispatch::new().chain(terminal);
    if let Some(path) = log_file {
        let file_format = datetime_format.to_owned();
        let file = fern::Dispatch::new()
            .level(file_level.unwrap_or(level).into())
            .format(move |out, message, record| {
                out.finish(format_args!(
                    "{} [{:>5}] [{}] {}",
                    chrono::Local::now().format(&file_format),
                    record.level(),
                    record.target(),
                    message
                ))
            })
            .chain(fern::log_file(path)?);
        dispatch = dispatch.chain(file);
    }

    dispatch.apply()?;
    Ok(())
}
