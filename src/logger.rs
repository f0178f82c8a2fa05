//! Logging setup on top of the `log` facade.
//!
//! The crate itself only emits through `log`; applications that want those
//! records can install a `fern` dispatcher built from [`LoggingConfig`].

use anyhow::{Context, Result};

use crate::config::LoggingConfig;

/// Build a dispatcher for `config` without installing it.
pub fn dispatch(config: &LoggingConfig) -> Result<fern::Dispatch> {
    let base = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(config.level_filter()?);

    let dispatch = match &config.file {
        Some(path) => base.chain(
            fern::log_file(path).with_context(|| format!("Failed to open log file: {}", path.display()))?,
        ),
        None => base.chain(std::io::stderr()),
    };

    Ok(dispatch)
}

/// Install the dispatcher for `config` as the global logger.
pub fn init(config: &LoggingConfig) -> Result<()> {
    dispatch(config)?
        .apply()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))?;
    Ok(())
}
