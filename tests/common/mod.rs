// Shared test helpers

#![allow(dead_code)]

use async_trait::async_trait;
use memory_alarm::models::MemorySample;
use memory_alarm::sampler::{MemorySampler, SampleError};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Sample with `total = 10_000` so `used` maps to hundredths of a percent.
pub fn sample(usage_percent: f64) -> MemorySample {
    MemorySample::from_used_total((usage_percent * 100.0).round() as u64, 10_000)
        .expect("non-zero total")
}

/// Replays scripted results, then keeps returning `fallback`.
pub struct ScriptedSampler {
    script: VecDeque<Result<MemorySample, SampleError>>,
    fallback: f64,
    pub calls: Arc<AtomicUsize>,
}

impl ScriptedSampler {
    pub fn repeating(usage_percent: f64) -> Self {
        Self::script(vec![], usage_percent)
    }

    pub fn script(script: Vec<Result<MemorySample, SampleError>>, fallback: f64) -> Self {
        Self {
            script: script.into(),
            fallback,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl MemorySampler for ScriptedSampler {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn sample(&mut self) -> Result<MemorySample, SampleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .pop_front()
            .unwrap_or_else(|| Ok(sample(self.fallback)))
    }
}
