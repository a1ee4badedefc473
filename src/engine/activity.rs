// ==========================================
// 门店销售分析系统 - 活跃/关店划分
// ==========================================
// 规则: 最近双月销售 > 0 → 活跃; 否则关店
//       数据集不含双月数据时,以本年销售 > 0 作为活跃信号
// 红线: 划分互斥且完备 (缺值/NaN 一律视为关店)
// ==========================================

use crate::domain::report::{ClosedStoreReport, ClosedStoreRow};
use crate::domain::store::{PeriodCapabilities, Store, StoreMetrics};

pub struct ActivityPartitioner {
    capabilities: PeriodCapabilities,
}

impl ActivityPartitioner {
    pub fn new(capabilities: PeriodCapabilities) -> Self {
        Self { capabilities }
    }

    /// 活跃信号值
    fn activity_signal(&self, store: &Store) -> f64 {
        if self.capabilities.bimonthly {
            store.bimonthly.map(|p| p.current).unwrap_or(0.0)
        } else {
            store.annual.current
        }
    }

    /// 是否活跃 (NaN 比较恒为 false,归入关店)
    pub fn is_active(&self, store: &Store) -> bool {
        self.activity_signal(store) > 0.0
    }

    /// 划分为 (活跃, 关店),保持输入顺序
    pub fn partition<'a>(
        &self,
        stores: &'a [StoreMetrics],
    ) -> (Vec<&'a StoreMetrics>, Vec<&'a StoreMetrics>) {
        stores.iter().partition(|m| self.is_active(&m.store))
    }

    /// 关店报告
    ///
    /// # 参数
    /// - `closed`: 关店门店
    /// - `total_count`: 全部门店数 (活跃 + 关店)
    pub fn closed_report(&self, closed: &[&StoreMetrics], total_count: usize) -> ClosedStoreReport {
        let mut rows: Vec<ClosedStoreRow> = closed
            .iter()
            .map(|m| ClosedStoreRow {
                store_id: m.store_id(),
                store_name: m.name().to_string(),
                city: m.store.city.clone(),
                previous_sales: m.previous_sales(),
                current_sales: m.current_sales(),
            })
            .collect();
        rows.sort_by(|a, b| b.previous_sales.total_cmp(&a.previous_sales));

        let closed_share = if total_count > 0 {
            closed.len() as f64 / total_count as f64
        } else {
            0.0
        };

        ClosedStoreReport {
            closed_count: closed.len(),
            lost_sales: rows.iter().map(|r| r.previous_sales).sum(),
            closed_share,
            rows,
        }
    }
}
