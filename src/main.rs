use anyhow::Result;
use clap::Parser;
use memory_alarm::*;
use std::time::Duration;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    let app_config = config::AppConfig::resolve(&cli)?;
    let _log_guard = logging::init(&app_config.logging)?;

    let sampler = sampler::select_sampler(app_config.monitoring.sampler);
    if !sampler.is_supported() {
        tracing::warn!(
            os = std::env::consts::OS,
            requested = ?app_config.monitoring.sampler,
            "Memory sampling is not supported on this platform; no alerts will be sent"
        );
    }

    let notifier = notifier::Notifier::new(
        &app_config.alarm.request_url,
        Duration::from_secs(app_config.request.timeout_secs),
    )?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        threshold = app_config.alarm.memory_usage,
        request_url = %notifier.url(),
        sampler = sampler.name(),
        poll_interval_ms = app_config.monitoring.poll_interval_ms,
        log_file = %app_config.logging.file.display(),
        "Starting memory alarm"
    );

    let monitor = monitor::Monitor::new(
        sampler,
        notifier,
        monitor::MonitorConfig {
            threshold: app_config.alarm.memory_usage,
            poll_interval: Duration::from_millis(app_config.monitoring.poll_interval_ms),
            resample_on_alert: app_config.alarm.resample_on_alert,
        },
    );

    monitor.run(shutdown_signal()).await;
    tracing::info!("Received shutdown signal");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
