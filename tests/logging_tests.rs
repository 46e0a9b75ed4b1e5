// Log file output. Runs in its own test binary because it installs the global subscriber.

use memory_alarm::config::LoggingConfig;
use memory_alarm::logging;

#[test]
fn test_init_writes_plain_leveled_lines_to_file() {
    unsafe { std::env::remove_var("RUST_LOG") };
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("logs").join("alarm.log");

    let guard = logging::init(&LoggingConfig {
        file: path.clone(),
        level: "info".into(),
    })
    .expect("init logging");
    tracing::info!(memory_usage = "85.12", "log file check message");
    tracing::debug!("filtered out at info");
    drop(guard);

    let content = std::fs::read_to_string(&path).expect("log file created");
    let line = content
        .lines()
        .find(|l| l.contains("log file check message"))
        .expect("event written to file");
    assert!(line.contains("INFO"), "{line}");
    assert!(line.contains("memory_usage=\"85.12\"") || line.contains("memory_usage=85.12"), "{line}");
    assert!(!content.contains('\u{1b}'), "ANSI escapes in log file");
    assert!(!content.contains("filtered out at info"));

    // Local timestamp prefix, e.g. 2026-10-14T09:30:00.123+02:00
    let stamp = line.split_whitespace().next().unwrap();
    assert!(stamp.len() >= 23, "{stamp}");
    assert!(stamp[..4].chars().all(|c| c.is_ascii_digit()), "{stamp}");
    assert_eq!(&stamp[10..11], "T", "{stamp}");
}
