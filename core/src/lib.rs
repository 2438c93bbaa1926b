//! Shared, dependency-light types used across the server: vnums, dice
//! expressions, directions and other small bitset constants, and the
//! logging initializer shared by every binary.

use log::LevelFilter;
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        file::FileAppender,
    },
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};

pub mod constants;
pub mod dice;
pub mod error;

/// Initializes the process-wide `log` backend: a stderr appender at
/// `log_level`, plus an optional file appender (always at `Trace`, so the
/// log file keeps everything regardless of the console's verbosity).
pub fn initialize_logger(log_level: LevelFilter, file_path: Option<&str>) -> anyhow::Result<()> {
    let stderr = ConsoleAppender::builder().target(Target::Stderr).build();

    let mut config_builder = Config::builder();

    if let Some(path) = file_path {
        let logfile = FileAppender::builder()
            // Pattern: https://docs.rs/log4rs/*/log4rs/encode/pattern/index.html
            .encoder(Box::new(PatternEncoder::new("{d} {l} - {m}\n")))
            .build(path)?;

        config_builder =
            config_builder.appender(Appender::builder().build("logfile", Box::new(logfile)));
    }

    let mut root = Root::builder();
    if file_path.is_some() {
        root = root.appender("logfile");
    }

    let config = config_builder
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(log_level)))
                .build("stderr", Box::new(stderr)),
        )
        .build(root.appender("stderr").build(LevelFilter::Trace))?;

    log4rs::init_config(config)?;
    Ok(())
}
