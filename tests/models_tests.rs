// Sample arithmetic and alert body formatting

use memory_alarm::models::{AlertMessage, MemorySample};
use proptest::prelude::*;

#[test]
fn test_sample_usage_is_used_over_total() {
    let s = MemorySample::from_used_total(6120, 15902).expect("sample");
    assert_eq!(s.used, 6120);
    assert_eq!(s.total, 15902);
    assert!((s.usage_percent - (6120.0 / 15902.0 * 100.0)).abs() < 1e-9);
}

#[test]
fn test_sample_rejects_zero_total() {
    assert!(MemorySample::from_used_total(10, 0).is_none());
}

#[test]
fn test_sample_full_and_empty() {
    assert_eq!(
        MemorySample::from_used_total(0, 512).unwrap().usage_percent,
        0.0
    );
    assert_eq!(
        MemorySample::from_used_total(512, 512).unwrap().usage_percent,
        100.0
    );
}

#[test]
fn test_alert_message_scenario_body() {
    let alert = AlertMessage::new(85.12);
    assert_eq!(alert.memory_usage, "85.12");
    assert_eq!(alert.message, "Memory is 85.12% full.");
    assert_eq!(
        serde_json::to_string(&alert).unwrap(),
        r#"{"memory_usage":"85.12","message":"Memory is 85.12% full."}"#
    );
}

#[test]
fn test_alert_message_rounds_to_two_decimals() {
    assert_eq!(AlertMessage::new(83.333333).memory_usage, "83.33");
    assert_eq!(AlertMessage::new(42.0).memory_usage, "42.00");
    assert_eq!(AlertMessage::new(99.999).memory_usage, "100.00");
    assert_eq!(AlertMessage::new(100.0).message, "Memory is 100.00% full.");
}

proptest! {
    #[test]
    fn prop_usage_matches_ratio(total in 1u64..=u32::MAX as u64, frac in 0.0f64..=1.0) {
        let used = (total as f64 * frac) as u64;
        let s = MemorySample::from_used_total(used, total).unwrap();
        let expected = used as f64 / total as f64 * 100.0;
        prop_assert!((s.usage_percent - expected).abs() < 1e-9);
        prop_assert!((0.0..=100.0).contains(&s.usage_percent));
    }

    #[test]
    fn prop_memory_usage_has_two_decimals(usage in 0.0f64..=100.0) {
        let alert = AlertMessage::new(usage);
        let (_, decimals) = alert.memory_usage.split_once('.').expect("decimal point");
        prop_assert_eq!(decimals.len(), 2);
        prop_assert_eq!(alert.message, format!("Memory is {}% full.", alert.memory_usage));
    }
}
