// Linux-specific sampling via `free -m`.

use super::{MemorySampler, SampleError};
use crate::models::MemorySample;
use async_trait::async_trait;
use std::ffi::OsString;
use std::time::Duration;

/// Bound on one `free` invocation; a slower child is killed and the cycle skipped.
pub const FREE_COMMAND_TIMEOUT: Duration = Duration::from_secs(1);

/// Runs `free -m` on every call and reads the `Mem:` row.
pub struct FreeCommandSampler {
    program: OsString,
    args: Vec<OsString>,
    timeout: Duration,
}

impl Default for FreeCommandSampler {
    fn default() -> Self {
        Self::with_command("free", ["-m"], FREE_COMMAND_TIMEOUT)
    }
}

impl FreeCommandSampler {
    /// Run `program args..` instead of `free -m`; its stdout must look like `free` output.
    pub fn with_command<P, I, A>(program: P, args: I, timeout: Duration) -> Self
    where
        P: Into<OsString>,
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            timeout,
        }
    }
}

#[async_trait]
impl MemorySampler for FreeCommandSampler {
    fn name(&self) -> &'static str {
        "free"
    }

    async fn sample(&mut self) -> Result<MemorySample, SampleError> {
        #[cfg(target_os = "linux")]
        {
            let result = tokio::time::timeout(
                self.timeout,
                tokio::process::Command::new(&self.program)
                    .args(&self.args)
                    .kill_on_drop(true)
                    .output(),
            )
            .await;

            let output = match result {
                Ok(output) => output?,
                Err(_) => return Err(SampleError::Timeout(self.timeout)),
            };
            if !output.status.success() {
                return Err(SampleError::Parse(format!(
                    "free exited with {}",
                    output.status
                )));
            }
            let stdout = String::from_utf8_lossy(&output.stdout);
            let (used, total) = parse_free_output(&stdout)?;
            MemorySample::from_used_total(used, total).ok_or(SampleError::NoTotal)
        }
        #[cfg(not(target_os = "linux"))]
        {
            Err(SampleError::Unsupported {
                platform: std::env::consts::OS,
            })
        }
    }
}

/// Parse `(used, total)` from the `Mem:` row of `free` output.
///
/// ```text
///                total        used        free      shared  buff/cache   available
/// Mem:           15902        6120        1533         911        8248        8432
/// ```
pub fn parse_free_output(output: &str) -> Result<(u64, u64), SampleError> {
    let row = output
        .lines()
        .find(|l| l.trim_start().starts_with("Mem:"))
        .ok_or_else(|| SampleError::Parse("no Mem: row".into()))?;
    let mut fields = row.split_whitespace().skip(1);
    let mut next_number = |column: &str| -> Result<u64, SampleError> {
        let raw = fields
            .next()
            .ok_or_else(|| SampleError::Parse(format!("missing {column} column")))?;
        raw.parse::<u64>()
            .map_err(|e| SampleError::Parse(format!("{column} column {raw:?}: {e}")))
    };
    let total = next_number("total")?;
    let used = next_number("used")?;
    Ok((used, total))
}
