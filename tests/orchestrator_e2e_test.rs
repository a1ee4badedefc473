// ==========================================
// 分析编排 端到端测试
// ==========================================
// 测试目标: 一次完整分析 (变化率 → 状态 → 排名 → 划分 → 渗透率 → 告警)
// 数据: helpers::small_network (两家活跃 + 一家关店)
// ==========================================

mod helpers;

use helpers::test_data_builder::{bimonthly_caps, dataset, small_network, StoreBuilder};
use std::sync::Arc;
use store_sales_analytics::config::AnalysisSettings;
use store_sales_analytics::domain::StatusLabel;
use store_sales_analytics::engine::{AnalyticsOrchestrator, ReportCache};
use store_sales_analytics::logging;

#[test]
fn test_full_pass_on_small_network() {
    logging::init_test();
    let ds = small_network();
    let report = AnalyticsOrchestrator::new(AnalysisSettings::default()).run(&ds);

    assert_eq!(report.dataset_version, "test-v1");
    assert_eq!(report.stores.len(), 3);

    // 状态
    let s1 = report.find_store(1).unwrap();
    let s2 = report.find_store(2).unwrap();
    let s3 = report.find_store(3).unwrap();
    assert_eq!(s1.status, StatusLabel::Growth);
    assert_eq!(s2.status, StatusLabel::Danger);

    // 活跃划分与排名
    assert!(s1.is_active && s2.is_active);
    assert!(!s3.is_active);
    assert_eq!(s1.rank, Some(1));
    assert_eq!(s2.rank, Some(2));
    assert_eq!(s3.rank, None);
    assert_eq!(report.active_stores().count(), 2);

    // KPI
    assert_eq!(report.kpis.total_sales, 1900.0);
    assert_eq!(report.kpis.previous_sales, 2000.0);
    assert_eq!(report.kpis.active_count, 2);
    assert_eq!(report.kpis.closed_count, 1);
    assert_eq!(report.kpis.growth_count, 1);
    assert_eq!(report.kpis.at_risk_count, 1);

    // 关店报告
    assert_eq!(report.closed.closed_count, 1);
    assert_eq!(report.closed.lost_sales, 800.0);
    assert!((report.closed.closed_share - 1.0 / 3.0).abs() < 1e-12);
    assert_eq!(report.closed.rows[0].store_id, 3);

    // 告警/复苏
    assert_eq!(report.alerts.len(), 1);
    assert_eq!(report.alerts[0].store_id, 2);
    assert!(report.recoveries.is_empty());

    // 默认下限 0.7: 商品20 渗透率 0.5 → 不算高渗透; 商品10 全覆盖 → 无机会
    assert!(report.opportunities.is_empty());
}

#[test]
fn test_summaries_cover_active_stores_only() {
    let report = AnalyticsOrchestrator::new(AnalysisSettings::default()).run(&small_network());

    let counted: usize = report.status_summary.iter().map(|s| s.count).sum();
    assert_eq!(counted, 2);
    assert!(report
        .status_summary
        .iter()
        .any(|s| s.key == StatusLabel::Growth.to_string()));

    assert_eq!(report.city_summary.len(), 1);
    assert_eq!(report.city_summary[0].key, "Haifa");
    assert_eq!(report.city_summary[0].current_total, 1900.0);

    let categories: Vec<&str> = report
        .category_summary
        .iter()
        .map(|s| s.key.as_str())
        .collect();
    assert!(categories.contains(&"Dairy"));
    assert!(categories.contains(&"Bakery"));
}

#[test]
fn test_trend_points_from_active_stores() {
    let report = AnalyticsOrchestrator::new(AnalysisSettings::default()).run(&small_network());

    let labels: Vec<&str> = report.trend.points.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["Y1", "H1", "H2"]);
    assert_eq!(report.trend.points[1].total, 1000.0);
    assert_eq!(report.trend.points[2].total, 950.0);

    let bimonthly = report.trend.bimonthly.as_ref().unwrap();
    assert_eq!(bimonthly.previous_total, 200.0);
    assert_eq!(bimonthly.current_total, 190.0);
    assert!(report.trend.quarter_seq.is_none());
}

#[test]
fn test_lower_min_penetration_surfaces_opportunity() {
    let settings = AnalysisSettings::default().with_min_penetration(0.5).unwrap();
    let report = AnalyticsOrchestrator::new(settings).run(&small_network());

    assert_eq!(report.opportunities.len(), 1);
    let record = &report.opportunities[0];
    assert_eq!(record.store_id, 2);
    assert_eq!(record.missing_product_ids, vec![20]);
    assert_eq!(record.potential_value, 60.0);
}

#[test]
fn test_without_bimonthly_data_lists_are_empty() {
    let stores = vec![
        StoreBuilder::new(1).annual(1000.0, 500.0).build(),
        StoreBuilder::new(2).annual(1000.0, 0.0).build(),
    ];
    let caps = store_sales_analytics::domain::PeriodCapabilities::default();
    let ds = dataset(caps, stores, vec![], vec![]);

    let report = AnalyticsOrchestrator::new(AnalysisSettings::default()).run(&ds);

    assert!(report.alerts.is_empty());
    assert!(report.recoveries.is_empty());
    // 无双月数据时以年度本期销售判断活跃
    assert_eq!(report.kpis.closed_count, 1);
    assert!(report.trend.points.is_empty());
}

#[test]
fn test_report_cache_reuses_and_invalidates() {
    let ds = small_network();
    let settings = AnalysisSettings::default();
    let mut cache = ReportCache::new();

    let first = cache.get_or_run(&ds, &settings);
    let second = cache.get_or_run(&ds, &settings);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);

    // 参数变化 → 新条目
    let lowered = settings.with_min_penetration(0.5).unwrap();
    let third = cache.get_or_run(&ds, &lowered);
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(cache.len(), 2);

    // 数据集版本变化 → 新条目
    let mut reloaded = small_network();
    reloaded.version = "test-v2".to_string();
    cache.get_or_run(&reloaded, &settings);
    assert_eq!(cache.len(), 3);

    cache.invalidate_dataset("test-v1");
    assert_eq!(cache.len(), 1);

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn test_closed_store_excluded_from_all_active_outputs() {
    let stores = vec![
        StoreBuilder::new(1).bimonthly(100.0, 50.0).annual(1000.0, 800.0).build(),
        StoreBuilder::new(2).bimonthly(100.0, 0.0).annual(1000.0, 100.0).build(),
    ];
    let ds = dataset(bimonthly_caps(), stores, vec![], vec![]);

    let report = AnalyticsOrchestrator::new(AnalysisSettings::default()).run(&ds);

    assert!(report.alerts.iter().all(|a| a.store_id != 2));
    assert!(report.opportunities.iter().all(|o| o.store_id != 2));
    assert_eq!(report.kpis.total_sales, 800.0);
    assert_eq!(report.closed.rows.len(), 1);
    assert_eq!(report.closed.rows[0].store_id, 2);
}

#[test]
fn test_list_counts_survive_display_limit() {
    let stores: Vec<_> = (1..=4)
        .map(|id| {
            StoreBuilder::new(id)
                .annual(1000.0, 900.0)
                .bimonthly(100.0, 100.0 - 10.0 * (id as f64 + 1.0))
                .build()
        })
        .collect();
    let ds = dataset(bimonthly_caps(), stores, vec![], vec![]);
    let settings = AnalysisSettings {
        display_limit: 2,
        ..AnalysisSettings::default()
    };

    let report = AnalyticsOrchestrator::new(settings).run(&ds);

    // 双月 -20% .. -50%, 全部低于 -15%
    assert_eq!(report.alert_count, 4);
    assert_eq!(report.alerts.len(), 2);
    assert_eq!(report.alerts[0].store_id, 4);
    assert_eq!(report.recovery_count, 0);
}

#[test]
fn test_opportunity_summary() {
    let report = AnalyticsOrchestrator::new(AnalysisSettings::default()).run(&small_network());
    assert_eq!(report.opportunity_summary.store_count, 0);
    assert_eq!(report.opportunity_summary.mean_potential, 0.0);

    let settings = AnalysisSettings::default().with_min_penetration(0.5).unwrap();
    let report = AnalyticsOrchestrator::new(settings).run(&small_network());
    let summary = &report.opportunity_summary;
    assert_eq!(summary.store_count, 1);
    assert_eq!(summary.total_potential, 60.0);
    assert_eq!(summary.mean_potential, 60.0);
}
