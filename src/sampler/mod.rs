// Memory sampling strategies, selected once at startup.

mod linux;

pub use linux::{FREE_COMMAND_TIMEOUT, FreeCommandSampler, parse_free_output};

use crate::models::MemorySample;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use sysinfo::System;

#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("memory sampling is not supported on {platform}")]
    Unsupported { platform: &'static str },
    #[error("failed to run memory command: {0}")]
    Command(#[from] std::io::Error),
    #[error("unexpected memory command output: {0}")]
    Parse(String),
    #[error("memory command did not finish within {0:?}")]
    Timeout(Duration),
    #[error("total memory reported as 0")]
    NoTotal,
    #[error("sampling task failed: {0}")]
    Task(String),
}

/// Which sampling strategy to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SamplerKind {
    /// `sysinfo` where supported, otherwise unsupported.
    #[default]
    Auto,
    Sysinfo,
    /// Linux `free -m`.
    Free,
}

#[async_trait]
pub trait MemorySampler: Send {
    fn name(&self) -> &'static str;

    async fn sample(&mut self) -> Result<MemorySample, SampleError>;

    fn is_supported(&self) -> bool {
        true
    }
}

pub struct SysinfoSampler {
    sys: Arc<Mutex<System>>,
}

impl Default for SysinfoSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoSampler {
    pub fn new() -> Self {
        Self {
            sys: Arc::new(Mutex::new(System::new())),
        }
    }
}

#[async_trait]
impl MemorySampler for SysinfoSampler {
    fn name(&self) -> &'static str {
        "sysinfo"
    }

    async fn sample(&mut self) -> Result<MemorySample, SampleError> {
        let sys = self.sys.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| SampleError::Task(format!("sysinfo lock poisoned: {}", e)))?;
            sys.refresh_memory();

            let total = sys.total_memory();
            let used = total.saturating_sub(sys.available_memory());
            MemorySample::from_used_total(used, total).ok_or(SampleError::NoTotal)
        })
        .await
        .map_err(|e| SampleError::Task(format!("sysinfo task join: {}", e)))?
    }
}

/// Stands in on platforms with no sampling strategy; every call fails.
pub struct UnsupportedSampler {
    platform: &'static str,
}

impl Default for UnsupportedSampler {
    fn default() -> Self {
        Self {
            platform: std::env::consts::OS,
        }
    }
}

#[async_trait]
impl MemorySampler for UnsupportedSampler {
    fn name(&self) -> &'static str {
        "unsupported"
    }

    async fn sample(&mut self) -> Result<MemorySample, SampleError> {
        Err(SampleError::Unsupported {
            platform: self.platform,
        })
    }

    fn is_supported(&self) -> bool {
        false
    }
}

pub fn select_sampler(kind: SamplerKind) -> Box<dyn MemorySampler> {
    match kind {
        SamplerKind::Auto | SamplerKind::Sysinfo if sysinfo::IS_SUPPORTED_SYSTEM => {
            Box::new(SysinfoSampler::new())
        }
        SamplerKind::Free if cfg!(target_os = "linux") => Box::new(FreeCommandSampler::default()),
        _ => Box::new(UnsupportedSampler::default()),
    }
}
