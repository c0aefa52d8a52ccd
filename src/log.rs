use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing_subscriber::{
    filter::LevelFilter, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
    EnvFilter,
};

use crate::settings::Settings;

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: String::from("warn"),
        }
    }
}

impl LogSettings {
    pub fn global() -> &'static Self {
        &Settings::global().log
    }
}

/// Logs to stderr, stdout belongs to the alert display.
pub fn setup_logging() -> Result<()> {
    let level_name = LogSettings::global().level.as_str();
    let level = tracing::Level::from_str(level_name)
        .with_context(|| format!("invalid log level {level_name}"))?;

    let fmt_layer = fmt::layer().with_writer(std::io::stderr);

    let filter_layer = EnvFilter::default()
        .add_directive(LevelFilter::from_level(level).into())
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    #[cfg(feature = "console")]
    let filter_layer = filter_layer
        .add_directive("tokio=trace".parse()?)
        .add_directive("runtime=trace".parse()?);

    let registry = tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer);

    #[cfg(feature = "console")]
    let registry = registry.with(console_subscriber::spawn());

    registry.init();

    Ok(())
}
