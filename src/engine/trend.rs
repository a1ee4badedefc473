// ==========================================
// 门店销售分析系统 - 趋势与驾驶舱指标
// ==========================================
// 职责: 全网各周期合计 + 时间序列点 + KPI
// 口径: 只统计传入的门店 (通常为活跃门店)
// ==========================================

use crate::domain::report::{DashboardKpis, PeriodComparison, TrendPoint, TrendReport};
use crate::domain::store::{PeriodCapabilities, StoreMetrics};
use crate::domain::types::{PeriodKind, StatusLabel};
use crate::engine::change::relative_change;

pub struct TrendEngine;

impl TrendEngine {
    pub fn new() -> Self {
        Self
    }

    /// 各周期合计
    ///
    /// 时间序列点仅在含半年数据时生成: 上年, H1, H2 (+ Q2, Q3)
    pub fn period_totals(
        &self,
        stores: &[&StoreMetrics],
        capabilities: PeriodCapabilities,
    ) -> TrendReport {
        let comparison = |kind: PeriodKind| -> Option<PeriodComparison> {
            if !capabilities.has(kind) {
                return None;
            }
            let (previous_total, current_total) = stores
                .iter()
                .filter_map(|m| m.store.period(kind))
                .fold((0.0, 0.0), |(p, c), pair| (p + pair.previous, c + pair.current));
            Some(PeriodComparison {
                previous_total,
                current_total,
                change: relative_change(current_total, Some(previous_total)),
            })
        };

        let annual = comparison(PeriodKind::Annual).unwrap_or(PeriodComparison {
            previous_total: 0.0,
            current_total: 0.0,
            change: 0.0,
        });
        let half_year = comparison(PeriodKind::HalfYear);
        let quarter_seq = comparison(PeriodKind::QuarterSeq);

        let mut points = Vec::new();
        if let Some(h) = &half_year {
            points.push(point("Y1", annual.previous_total));
            points.push(point("H1", h.previous_total));
            points.push(point("H2", h.current_total));
            if let Some(q) = &quarter_seq {
                points.push(point("Q2", q.previous_total));
                points.push(point("Q3", q.current_total));
            }
        }

        TrendReport {
            points,
            annual,
            half_year,
            quarter_yoy: comparison(PeriodKind::QuarterYoy),
            quarter_seq,
            bimonthly: comparison(PeriodKind::Bimonthly),
        }
    }

    /// 驾驶舱 KPI
    ///
    /// # 参数
    /// - `active`: 活跃门店
    /// - `closed_count`: 关店数
    pub fn kpis(&self, active: &[&StoreMetrics], closed_count: usize) -> DashboardKpis {
        let total_sales: f64 = active.iter().map(|m| m.current_sales()).sum();
        let previous_sales: f64 = active.iter().map(|m| m.previous_sales()).sum();
        let growth_count = active
            .iter()
            .filter(|m| m.status == StatusLabel::Growth)
            .count();
        let at_risk_count = active.iter().filter(|m| m.status.is_declining()).count();

        DashboardKpis {
            total_sales,
            previous_sales,
            sales_change: relative_change(total_sales, Some(previous_sales)),
            active_count: active.len(),
            closed_count,
            growth_count,
            growth_share: share(growth_count, active.len()),
            at_risk_count,
            at_risk_share: share(at_risk_count, active.len()),
        }
    }
}

impl Default for TrendEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn point(label: &str, total: f64) -> TrendPoint {
    TrendPoint {
        label: label.to_string(),
        total,
    }
}

fn share(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}
