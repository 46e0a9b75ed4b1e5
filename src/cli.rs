// Command-line flags. Unset flags fall back to the config file, then built-in defaults.

use crate::sampler::SamplerKind;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(
    name = "memory-alarm",
    version,
    about = "Monitor system memory usage every second and send an alarm when it exceeds a threshold"
)]
pub struct Cli {
    /// Memory usage threshold in percent [default: 80.0]
    #[arg(short = 'm', long, env = "MEMORY_ALARM_THRESHOLD")]
    pub memory_usage: Option<f64>,

    /// URL the alarm is POSTed to [default: http://127.0.0.1:5000/alarm]
    #[arg(short = 'r', long, env = "MEMORY_ALARM_URL")]
    pub request_url: Option<String>,

    /// TOML config file (also CONFIG_FILE)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Delay between samples in milliseconds [default: 1000]
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Alarm request timeout in seconds [default: 5]
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,

    /// Memory sampling strategy [default: auto]
    #[arg(long, value_enum)]
    pub sampler: Option<SamplerKind>,

    /// Report the threshold-check sample instead of re-sampling before sending
    #[arg(long)]
    pub single_sample: bool,

    /// Log file path [default: memory_alarm.log]
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
