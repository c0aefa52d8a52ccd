use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgMatches, Command};
use config::Config;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use serde_with::{serde_as, DurationSeconds};
use url::Url;

use crate::{
    error::PatternError,
    log::LogSettings,
    matcher::{DisplayMode, Patterns},
    source::SourceDescriptor,
};

static SETTINGS: OnceCell<Settings> = OnceCell::new();

/// name of the config file inside the config directory
const CONFIG_FILE: &str = "tetik.yaml";

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub sources: Vec<SourceDescriptor>,
    /// bounds every single request
    #[serde_as(as = "DurationSeconds<f64>")]
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
    /// pause between two cycles in summary mode
    #[serde_as(as = "DurationSeconds<f64>")]
    #[serde(default = "default_interval")]
    pub interval: Duration,
    /// `None` for summary mode, alert name patterns for detail mode
    #[serde(default)]
    pub details: Option<Vec<String>>,
    #[serde(default)]
    pub log: LogSettings,
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_interval() -> Duration {
    Duration::from_secs(30)
}

impl Settings {
    /// Parses the command line and loads the config file. clap exits the
    /// process on `--help`, `--version` and malformed arguments.
    pub fn init() -> Result<&'static Self> {
        let opts = command().get_matches();
        let settings = Self::from_matches(&opts)?;

        Ok(SETTINGS.get_or_init(|| settings))
    }

    pub fn global() -> &'static Self {
        #[allow(clippy::expect_used)]
        SETTINGS.get().expect("settings are initialized on startup")
    }

    /// Loads the config file given by `--config` (or the default one if it
    /// exists) and applies the command line overrides.
    fn from_matches(opts: &ArgMatches) -> Result<Self> {
        let (config_path, required) = match opts.value_of("config") {
            Some(path) => (Some(PathBuf::from(path)), true),
            None => (default_config_path(), false),
        };

        let mut conf = Config::builder();
        if let Some(path) = &config_path {
            conf = conf.add_source(config::File::from(path.as_path()).required(required));
        }

        let mut settings: Settings = conf
            .build()
            .and_then(Config::try_deserialize)
            .context("can't load config")?;

        if let Some(sources) = opts.values_of("sources") {
            settings.sources = sources
                .map(|source| {
                    Url::parse(source)
                        .map(SourceDescriptor::from_url)
                        .with_context(|| format!("invalid source url {source}"))
                })
                .collect::<Result<_>>()?;
        }

        if let Some(timeout) = opts.value_of("timeout") {
            settings.timeout = parse_seconds(timeout).context("invalid timeout")?;
        }

        if let Some(interval) = opts.value_of("interval") {
            settings.interval = parse_seconds(interval).context("invalid interval")?;
        }

        if opts.is_present("details") {
            settings.details = Some(
                opts.values_of("details")
                    .map(|patterns| patterns.map(String::from).collect())
                    .unwrap_or_default(),
            );
        }

        if let Some(level) = opts.value_of("level") {
            settings.log.level = level.to_string();
        }

        Ok(settings)
    }

    /// compiles the alert name patterns of detail mode
    pub fn display_mode(&self) -> Result<DisplayMode, PatternError> {
        match &self.details {
            Some(patterns) => Ok(DisplayMode::Detail(Patterns::case_insensitive(patterns.as_slice())?)),
            None => Ok(DisplayMode::Summary),
        }
    }
}

/// the command line interface
pub fn command() -> Command<'static> {
    Command::new(clap::crate_name!())
        .version(clap::crate_version!())
        .about(clap::crate_description!())
        .author(clap::crate_authors!())
        .args([
            Arg::new("config")
                .help("path of config file [default: $XDG_CONFIG_HOME/tetik.yaml]")
                .takes_value(true)
                .short('c')
                .long("config"),
            Arg::new("sources")
                .help("alertmanager urls, replace the sources of the config file")
                .takes_value(true)
                .multiple_values(true)
                .long("sources"),
            Arg::new("details")
                .help("print annotations and labels of alerts whose name starts with one of the patterns, then exit")
                .takes_value(true)
                .multiple_values(true)
                .min_values(0)
                .long("details"),
            Arg::new("timeout")
                .help("request timeout in seconds [default: 10]")
                .takes_value(true)
                .long("timeout"),
            Arg::new("interval")
                .help("seconds to wait between updates [default: 30]")
                .takes_value(true)
                .long("interval"),
            Arg::new("level")
                .help("log level")
                .possible_values(["error", "warn", "info", "debug", "trace"])
                .takes_value(true)
                .long("log"),
        ])
}

/// `$XDG_CONFIG_HOME/tetik.yaml`, falling back to `$HOME/.config/tetik.yaml`
fn default_config_path() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
        .map(|dir| dir.join(CONFIG_FILE))
}

fn parse_seconds(value: &str) -> Result<Duration> {
    let secs: f64 = value
        .parse()
        .with_context(|| format!("`{value}` is not a number"))?;

    if !secs.is_finite() || secs < 0. {
        bail!("`{value}` is not a positive number of seconds");
    }

    Ok(Duration::from_secs_f64(secs))
}
