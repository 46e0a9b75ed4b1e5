// Sample and alert models

use serde::Serialize;

/// One point-in-time memory reading. `usage_percent` is `used / total * 100`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemorySample {
    pub used: u64,
    pub total: u64,
    pub usage_percent: f64,
}

impl MemorySample {
    /// Returns `None` when `total` is 0.
    pub fn from_used_total(used: u64, total: u64) -> Option<Self> {
        if total == 0 {
            return None;
        }
        Some(Self {
            used,
            total,
            usage_percent: (used as f64 / total as f64) * 100.0,
        })
    }
}

/// Alert body POSTed to the configured endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertMessage {
    pub memory_usage: String,
    pub message: String,
}

impl AlertMessage {
    pub fn new(usage_percent: f64) -> Self {
        let memory_usage = format!("{:.2}", usage_percent);
        let message = format!("Memory is {}% full.", memory_usage);
        Self {
            memory_usage,
            message,
        }
    }
}
