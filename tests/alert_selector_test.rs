// ==========================================
// AlertSelector 集成测试
// ==========================================
// 测试目标: 告警名单 / 复苏名单的筛选、排序、截断
// ==========================================

mod helpers;

use helpers::test_data_builder::StoreBuilder;
use store_sales_analytics::config::{ThresholdConfig, ThresholdOverrides};
use store_sales_analytics::domain::{PeriodCapabilities, StatusLabel, StoreMetrics};
use store_sales_analytics::engine::AlertSelector;

fn metrics(id: i64, bimonthly: (f64, f64), status: StatusLabel) -> StoreMetrics {
    let store = StoreBuilder::new(id).bimonthly(bimonthly.0, bimonthly.1).build();
    StoreMetrics {
        annual_change: 0.0,
        half_year_change: None,
        quarter_yoy_change: None,
        quarter_seq_change: None,
        bimonthly_change: Some((bimonthly.1 - bimonthly.0) / bimonthly.0),
        status,
        status_reason: String::new(),
        is_active: true,
        rank: None,
        store,
    }
}

fn caps() -> PeriodCapabilities {
    PeriodCapabilities {
        bimonthly: true,
        ..PeriodCapabilities::default()
    }
}

#[test]
fn test_alert_in_and_out() {
    let selector = AlertSelector::new(ThresholdConfig::default(), caps());
    let steep = metrics(1, (100.0, 80.0), StatusLabel::Erosion); // -20%
    let mild = metrics(2, (100.0, 90.0), StatusLabel::Erosion); // -10%

    let alerts = selector.alerts(&[&steep, &mild], 20);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].store_id, 1);
}

#[test]
fn test_recovery_requires_declining_status() {
    let selector = AlertSelector::new(ThresholdConfig::default(), caps());
    let eroding = metrics(1, (100.0, 103.0), StatusLabel::Erosion); // +3%
    let growing = metrics(2, (100.0, 150.0), StatusLabel::Growth);

    let list = selector.recoveries(&[&eroding, &growing], 20);
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].store_id, 1);
    assert_eq!(list[0].status, StatusLabel::Erosion);
}

#[test]
fn test_recovery_threshold_override() {
    let thresholds = ThresholdConfig::from_overrides(&ThresholdOverrides {
        recovery_bimonthly: Some(0.05),
        ..Default::default()
    })
    .unwrap();
    let selector = AlertSelector::new(thresholds, caps());
    let eroding = metrics(1, (100.0, 103.0), StatusLabel::Erosion);

    assert!(selector.recoveries(&[&eroding], 20).is_empty());
}

#[test]
fn test_lists_sorted_and_capped() {
    let selector = AlertSelector::new(ThresholdConfig::default(), caps());
    let all: Vec<StoreMetrics> = (1..=30)
        .map(|i| metrics(i, (100.0, 100.0 - i as f64), StatusLabel::Danger))
        .collect();
    let refs: Vec<&StoreMetrics> = all.iter().collect();

    let alerts = selector.alerts(&refs, 20);
    // -16% .. -30% 共 15 家
    assert_eq!(alerts.len(), 15);
    assert_eq!(alerts[0].store_id, 30);
    assert!(alerts
        .windows(2)
        .all(|w| w[0].bimonthly_change <= w[1].bimonthly_change));

    assert_eq!(selector.alerts(&refs, 5).len(), 5);
}
