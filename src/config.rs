use crate::cli::Cli;
use crate::notifier::DEFAULT_REQUEST_TIMEOUT;
use crate::sampler::SamplerKind;
use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_REQUEST_URL: &str = "http://127.0.0.1:5000/alarm";
pub const DEFAULT_LOG_FILE: &str = "memory_alarm.log";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub alarm: AlarmConfig,
    pub monitoring: MonitoringConfig,
    pub request: RequestConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlarmConfig {
    /// Threshold in percent; an alert fires when usage is at or above it.
    pub memory_usage: f64,
    pub request_url: String,
    /// Take a fresh sample for the alert body instead of reusing the threshold-check sample.
    pub resample_on_alert: bool,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            memory_usage: 80.0,
            request_url: DEFAULT_REQUEST_URL.into(),
            resample_on_alert: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub poll_interval_ms: u64,
    pub sampler: SamplerKind,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            sampler: SamplerKind::Auto,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    pub timeout_secs: u64,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: PathBuf,
    /// Used when RUST_LOG is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_LOG_FILE),
            level: "info".into(),
        }
    }
}

impl AppConfig {
    /// Resolve the effective config: defaults, then the config file, then CLI flags.
    ///
    /// The file comes from `--config` or `CONFIG_FILE`. An explicitly named file must
    /// exist; without one, `config.toml` is read only if present.
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let explicit = cli
            .config
            .clone()
            .or_else(|| std::env::var_os("CONFIG_FILE").map(PathBuf::from));
        let mut config = match explicit {
            Some(path) => Self::load_file(&path)?,
            None if Path::new("config.toml").exists() => Self::load_file(Path::new("config.toml"))?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn load_file(path: &Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&s).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(v) = cli.memory_usage {
            self.alarm.memory_usage = v;
        }
        if let Some(v) = &cli.request_url {
            self.alarm.request_url = v.clone();
        }
        if cli.single_sample {
            self.alarm.resample_on_alert = false;
        }
        if let Some(v) = cli.poll_interval_ms {
            self.monitoring.poll_interval_ms = v;
        }
        if let Some(v) = cli.sampler {
            self.monitoring.sampler = v;
        }
        if let Some(v) = cli.request_timeout_secs {
            self.request.timeout_secs = v;
        }
        if let Some(v) = &cli.log_file {
            self.logging.file = v.clone();
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.alarm.memory_usage.is_finite() && (0.0..=100.0).contains(&self.alarm.memory_usage),
            "alarm.memory_usage must be between 0 and 100, got {}",
            self.alarm.memory_usage
        );
        let url = reqwest::Url::parse(&self.alarm.request_url).with_context(|| {
            format!(
                "alarm.request_url must be a valid URL, got {:?}",
                self.alarm.request_url
            )
        })?;
        anyhow::ensure!(
            matches!(url.scheme(), "http" | "https"),
            "alarm.request_url must use http or https, got {}",
            url.scheme()
        );
        anyhow::ensure!(
            self.monitoring.poll_interval_ms > 0,
            "monitoring.poll_interval_ms must be > 0, got {}",
            self.monitoring.poll_interval_ms
        );
        anyhow::ensure!(
            self.request.timeout_secs > 0,
            "request.timeout_secs must be > 0, got {}",
            self.request.timeout_secs
        );
        anyhow::ensure!(
            !self.logging.file.as_os_str().is_empty(),
            "logging.file must be non-empty"
        );
        Ok(())
    }
}
