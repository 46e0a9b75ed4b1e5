// Poll loop: sample, compare against the threshold, alert, sleep, repeat.
// Runs until the shutdown future resolves; no cycle outcome ends the loop.

use crate::models::MemorySample;
use crate::notifier::Notifier;
use crate::sampler::{MemorySampler, SampleError};
use std::future::Future;
use tokio::time::{Duration, sleep};
use tracing::Instrument;

pub struct MonitorConfig {
    pub threshold: f64,
    pub poll_interval: Duration,
    pub resample_on_alert: bool,
}

/// What one poll cycle did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CycleOutcome {
    /// No usable sample this cycle.
    Skipped,
    BelowThreshold { usage: f64 },
    /// An alert was attempted; `status` is set only for a 2xx response.
    Alerted { usage: f64, status: Option<u16> },
}

/// Alert when usage is at or above the threshold.
pub fn should_alert(usage: f64, threshold: f64) -> bool {
    usage >= threshold
}

pub struct Monitor {
    sampler: Box<dyn MemorySampler>,
    notifier: Notifier,
    config: MonitorConfig,
}

impl Monitor {
    pub fn new(sampler: Box<dyn MemorySampler>, notifier: Notifier, config: MonitorConfig) -> Self {
        Self {
            sampler,
            notifier,
            config,
        }
    }

    /// Run one cycle without the trailing sleep.
    pub async fn tick(&mut self) -> CycleOutcome {
        let sample = match self.sampler.sample().await {
            Ok(s) => s,
            Err(SampleError::Unsupported { platform }) => {
                tracing::debug!(platform, "Memory sampling unsupported; skipping cycle");
                return CycleOutcome::Skipped;
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    sampler = self.sampler.name(),
                    operation = "sample",
                    "Memory sample failed"
                );
                return CycleOutcome::Skipped;
            }
        };

        if !should_alert(sample.usage_percent, self.config.threshold) {
            tracing::debug!(
                usage_percent = sample.usage_percent,
                threshold = self.config.threshold,
                "Memory usage below threshold"
            );
            return CycleOutcome::BelowThreshold {
                usage: sample.usage_percent,
            };
        }

        let reported = self.alert_sample(sample).await;
        tracing::debug!(
            usage_percent = reported.usage_percent,
            used = reported.used,
            total = reported.total,
            threshold = self.config.threshold,
            "Memory usage at or above threshold"
        );
        let status = self.notifier.send(reported.usage_percent).await;
        CycleOutcome::Alerted {
            usage: reported.usage_percent,
            status,
        }
    }

    /// The sample whose value goes into the alert body.
    async fn alert_sample(&mut self, checked: MemorySample) -> MemorySample {
        if !self.config.resample_on_alert {
            return checked;
        }
        match self.sampler.sample().await {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    sampler = self.sampler.name(),
                    operation = "resample",
                    "Re-sample failed; reporting threshold-check sample"
                );
                checked
            }
        }
    }

    pub async fn run<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let monitor_span = tracing::span!(
            tracing::Level::DEBUG,
            "monitor",
            threshold = self.config.threshold,
            sampler = self.sampler.name()
        );

        async move {
            tokio::pin!(shutdown);
            loop {
                tokio::select! {
                    _ = self.tick() => {}
                    _ = &mut shutdown => break,
                }
                tokio::select! {
                    _ = sleep(self.config.poll_interval) => {}
                    _ = &mut shutdown => break,
                }
            }
            tracing::debug!("Monitor shutting down");
        }
        .instrument(monitor_span)
        .await
    }
}
