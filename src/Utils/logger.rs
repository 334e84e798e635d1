use crate::symbolic::expander::ExpansionSettings;
use crate::symbolic::expansion_error::ExpansionError;
use chrono::Local;
use simplelog::*;
use std::fs::File;

/// maps the loglevel names used in settings documents to a filter; None means info
pub fn level_filter(loglevel: Option<&str>) -> Result<LevelFilter, ExpansionError> {
    match loglevel {
        None => Ok(LevelFilter::Info),
        Some("debug") => Ok(LevelFilter::Debug),
        Some("info") => Ok(LevelFilter::Info),
        Some("warn") => Ok(LevelFilter::Warn),
        Some("error") => Ok(LevelFilter::Error),
        Some("off") => Ok(LevelFilter::Off),
        Some(other) => Err(ExpansionError::Config(format!(
            "loglevel must be debug, info, warn, error or off, got '{}'",
            other
        ))),
    }
}

/// log file name stamped with the current date and time
pub fn default_log_file_name() -> String {
    let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
    format!("expansion_log_{}.txt", date_and_time)
}

/// Installs a terminal logger and, if `log_file` is given, a file logger.
/// Returns false when a logger was already installed, which is not treated as an error.
pub fn init_logger(loglevel: Option<&str>, log_file: Option<&str>) -> Result<bool, ExpansionError> {
    let log_option = level_filter(loglevel)?;
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(
        log_option,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ));
    if let Some(name) = log_file {
        let file = File::create(name)?;
        loggers.push(WriteLogger::new(log_option, Config::default(), file));
    }
    Ok(CombinedLogger::init(loggers).is_ok())
}

/// logger set up from the `loglevel` and `log_file` of the settings
pub fn init_logger_from_settings(settings: &ExpansionSettings) -> Result<bool, ExpansionError> {
    init_logger(settings.loglevel.as_deref(), settings.log_file.as_deref())
}
