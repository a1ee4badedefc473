// ==========================================
// 门店销售分析系统 - 告警/复苏名单
// ==========================================
// 告警: 活跃门店,双月变化 < 告警阈值,升序 (跌得最深在前)
// 复苏: 活跃门店,状态为 侵蚀/危险,双月变化 > 复苏阈值,降序
// 红线: 数据集不含双月数据 → 两个名单都为空
// ==========================================

use crate::config::ThresholdConfig;
use crate::domain::report::AlertRecord;
use crate::domain::store::{PeriodCapabilities, StoreMetrics};
use tracing::debug;

pub struct AlertSelector {
    thresholds: ThresholdConfig,
    capabilities: PeriodCapabilities,
}

impl AlertSelector {
    pub fn new(thresholds: ThresholdConfig, capabilities: PeriodCapabilities) -> Self {
        Self {
            thresholds,
            capabilities,
        }
    }

    /// 告警名单 (最多 limit 行)
    pub fn alerts(&self, active: &[&StoreMetrics], limit: usize) -> Vec<AlertRecord> {
        let mut records = self.all_alerts(active);
        records.truncate(limit);
        records
    }

    /// 全部告警门店 (不截断,用于统计总数)
    pub fn all_alerts(&self, active: &[&StoreMetrics]) -> Vec<AlertRecord> {
        if !self.capabilities.bimonthly {
            return Vec::new();
        }

        let alarm = self.thresholds.alarm_bimonthly();
        let mut records: Vec<AlertRecord> = active
            .iter()
            .filter_map(|m| to_record(m))
            .filter(|r| r.bimonthly_change < alarm)
            .collect();

        records.sort_by(|a, b| a.bimonthly_change.total_cmp(&b.bimonthly_change));

        debug!(alerts = records.len(), alarm, "告警名单生成");
        records
    }

    /// 复苏名单 (最多 limit 行)
    pub fn recoveries(&self, active: &[&StoreMetrics], limit: usize) -> Vec<AlertRecord> {
        let mut records = self.all_recoveries(active);
        records.truncate(limit);
        records
    }

    /// 全部复苏门店 (不截断)
    pub fn all_recoveries(&self, active: &[&StoreMetrics]) -> Vec<AlertRecord> {
        if !self.capabilities.bimonthly {
            return Vec::new();
        }

        let rebound = self.thresholds.recovery_bimonthly();
        let mut records: Vec<AlertRecord> = active
            .iter()
            .filter(|m| m.status.is_declining())
            .filter_map(|m| to_record(m))
            .filter(|r| r.bimonthly_change > rebound)
            .collect();

        records.sort_by(|a, b| b.bimonthly_change.total_cmp(&a.bimonthly_change));

        debug!(recoveries = records.len(), rebound, "复苏名单生成");
        records
    }
}

fn to_record(m: &StoreMetrics) -> Option<AlertRecord> {
    let change = m.bimonthly_change?;
    Some(AlertRecord {
        store_id: m.store_id(),
        store_name: m.name().to_string(),
        city: m.store.city.clone(),
        current_sales: m.current_sales(),
        bimonthly_change: change,
        status: m.status,
    })
}
