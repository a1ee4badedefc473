// ==========================================
// 门店销售分析系统 - 变化率计算
// ==========================================
// 职责: 两期数值的相对变化
// 红线: 无基期 (缺失/NaN/0) 视为无变化,返回 0,绝不除零
// ==========================================

use crate::domain::store::PeriodPair;

/// 相对变化率 (current - previous) / previous
///
/// # 规则
/// - previous 缺失、NaN 或恰为 0 → 0
/// - current 为 NaN → 0
/// - 其他 → (current - previous) / previous
pub fn relative_change(current: f64, previous: Option<f64>) -> f64 {
    match previous {
        Some(prev) if !prev.is_nan() && prev != 0.0 && !current.is_nan() => {
            (current - prev) / prev
        }
        _ => 0.0,
    }
}

/// 数据对的变化率
pub fn pair_change(pair: &PeriodPair) -> f64 {
    relative_change(pair.current, Some(pair.previous))
}

/// 可选周期的变化率
///
/// - 数据集不含该周期 (available=false) → None
/// - 数据集含该周期但本行缺值 → Some(0.0)
pub fn optional_pair_change(available: bool, pair: Option<&PeriodPair>) -> Option<f64> {
    if !available {
        return None;
    }
    Some(pair.map(pair_change).unwrap_or(0.0))
}
