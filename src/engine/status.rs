// ==========================================
// 门店销售分析系统 - 门店状态判定引擎
// ==========================================
// 红线: 状态是"六选一"的判定表,顺序执行,命中即返回
// 红线: 基期销售为 0 的门店永远判定为 NEW
// ==========================================
// 职责: 变化向量 + 阈值 → 状态标签
// 输入: Store + ThresholdConfig + PeriodCapabilities
// 输出: (StatusLabel, status_reason)
// ==========================================

use crate::config::ThresholdConfig;
use crate::domain::store::{PeriodCapabilities, Store};
use crate::domain::types::StatusLabel;
use crate::engine::change::pair_change;
use serde_json::json;

/// 复苏规则中次级周期的固定反弹线
pub const RECOVERY_SECONDARY_REBOUND: f64 = 0.05;

// ==========================================
// ChangeVector - 判定输入
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChangeVector {
    pub baseline: f64,         // 全年基期销售
    pub annual: f64,           // 全年变化率
    pub secondary: f64,        // 次级周期变化率 (半年 或 双月; 无则 0)
    pub tertiary: Option<f64>, // 季度同比变化率 (数据集不含时为 None)
}

// ==========================================
// StatusClassifier - 状态判定引擎
// ==========================================
pub struct StatusClassifier {
    thresholds: ThresholdConfig,
    capabilities: PeriodCapabilities,
}

impl StatusClassifier {
    /// 构造函数
    ///
    /// # 参数
    /// - `thresholds`: 本次计算的阈值 (按值持有,计算期间不可变)
    /// - `capabilities`: 数据集周期能力
    pub fn new(thresholds: ThresholdConfig, capabilities: PeriodCapabilities) -> Self {
        Self {
            thresholds,
            capabilities,
        }
    }

    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 判定门店状态
    pub fn classify(&self, store: &Store) -> StatusLabel {
        self.classify_with_reason(store).0
    }

    /// 判定门店状态 (附带可解释原因)
    pub fn classify_with_reason(&self, store: &Store) -> (StatusLabel, String) {
        let vector = self.change_vector(store);
        self.classify_vector(&vector)
    }

    /// 从门店数据提取判定输入
    ///
    /// 缺失的周期按能力描述降级: 次级周期缺失 → 0, 第三周期缺失 → None
    pub fn change_vector(&self, store: &Store) -> ChangeVector {
        let secondary = self
            .capabilities
            .secondary_period()
            .and_then(|kind| store.period(kind))
            .map(pair_change)
            .unwrap_or(0.0);

        let tertiary = self
            .capabilities
            .tertiary_period()
            .map(|kind| store.period(kind).map(pair_change).unwrap_or(0.0));

        ChangeVector {
            baseline: store.baseline(),
            annual: pair_change(&store.annual),
            secondary,
            tertiary,
        }
    }

    /// 判定表
    ///
    /// 规则（顺序执行，命中即返回）:
    /// 1) baseline = 0 → NEW
    /// 2) annual < danger_annual 且 secondary < danger_secondary → DANGER
    /// 3) annual < erosion_annual 且 secondary > 0.05 且 (tertiary > 0, 若有) → RECOVERY
    /// 4) annual > growth_annual 且 secondary > growth_secondary → GROWTH
    /// 5) stable_lower <= annual <= stable_upper → STABLE
    /// 6) 其他 → EROSION
    pub fn classify_vector(&self, v: &ChangeVector) -> (StatusLabel, String) {
        let t = &self.thresholds;

        // 规则1: 新店
        if v.baseline == 0.0 || v.baseline.is_nan() {
            return (
                StatusLabel::New,
                json!({ "rule": "NEW", "baseline": 0.0 }).to_string(),
            );
        }

        // 规则2: 危险
        if v.annual < t.danger_annual() && v.secondary < t.danger_secondary() {
            return (
                StatusLabel::Danger,
                self.reason("DANGER", v, t.danger_annual(), t.danger_secondary()),
            );
        }

        // 规则3: 复苏 (长周期下滑,短周期反弹)
        let tertiary_ok = v.tertiary.map_or(true, |tertiary| tertiary > 0.0);
        if v.annual < t.erosion_annual() && v.secondary > RECOVERY_SECONDARY_REBOUND && tertiary_ok
        {
            return (
                StatusLabel::Recovery,
                self.reason("RECOVERY", v, t.erosion_annual(), RECOVERY_SECONDARY_REBOUND),
            );
        }

        // 规则4: 增长
        if v.annual > t.growth_annual() && v.secondary > t.growth_secondary() {
            return (
                StatusLabel::Growth,
                self.reason("GROWTH", v, t.growth_annual(), t.growth_secondary()),
            );
        }

        // 规则5: 稳定
        if v.annual >= t.stable_lower() && v.annual <= t.stable_upper() {
            return (
                StatusLabel::Stable,
                self.reason("STABLE", v, t.stable_lower(), t.stable_upper()),
            );
        }

        // 规则6: 兜底
        (
            StatusLabel::Erosion,
            self.reason("EROSION", v, t.stable_lower(), t.stable_upper()),
        )
    }

    fn reason(&self, rule: &str, v: &ChangeVector, bound_a: f64, bound_b: f64) -> String {
        json!({
            "rule": rule,
            "annual_change": v.annual,
            "secondary_change": v.secondary,
            "secondary_period": self.capabilities.secondary_period().map(|k| k.to_string()),
            "tertiary_change": v.tertiary,
            "bounds": [bound_a, bound_b],
        })
        .to_string()
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThresholdOverrides;

    fn classifier(capabilities: PeriodCapabilities) -> StatusClassifier {
        StatusClassifier::new(ThresholdConfig::default(), capabilities)
    }

    fn vector(annual: f64, secondary: f64, tertiary: Option<f64>) -> ChangeVector {
        ChangeVector {
            baseline: 100.0,
            annual,
            secondary,
            tertiary,
        }
    }

    #[test]
    fn test_new_store_wins_over_everything() {
        let c = classifier(PeriodCapabilities::full());
        let v = ChangeVector {
            baseline: 0.0,
            annual: -0.9,
            secondary: -0.9,
            tertiary: Some(-0.9),
        };
        assert_eq!(c.classify_vector(&v).0, StatusLabel::New);
    }

    #[test]
    fn test_danger() {
        let c = classifier(PeriodCapabilities::full());
        assert_eq!(c.classify_vector(&vector(-0.20, -0.15, Some(0.1))).0, StatusLabel::Danger);
    }

    #[test]
    fn test_deep_annual_decline_without_secondary_decline() {
        // 年度跌破危险线,但次级周期未跌破 → 不是危险
        let c = classifier(PeriodCapabilities::full());
        assert_eq!(c.classify_vector(&vector(-0.20, -0.05, Some(0.1))).0, StatusLabel::Erosion);
    }

    #[test]
    fn test_recovery_with_tertiary() {
        let c = classifier(PeriodCapabilities::full());
        assert_eq!(c.classify_vector(&vector(-0.10, 0.08, Some(0.02))).0, StatusLabel::Recovery);
        // 季度同比未转正 → 不算复苏,落入侵蚀
        assert_eq!(c.classify_vector(&vector(-0.10, 0.08, Some(-0.02))).0, StatusLabel::Erosion);
    }

    #[test]
    fn test_recovery_without_tertiary_capability() {
        let c = classifier(PeriodCapabilities {
            half_year: true,
            ..PeriodCapabilities::default()
        });
        assert_eq!(c.classify_vector(&vector(-0.10, 0.08, None)).0, StatusLabel::Recovery);
    }

    #[test]
    fn test_growth() {
        let c = classifier(PeriodCapabilities::full());
        assert_eq!(c.classify_vector(&vector(0.10, 0.0, Some(0.0))).0, StatusLabel::Growth);
        // 次级周期跌破增长次级阈值 → 不算增长
        assert_eq!(c.classify_vector(&vector(0.10, -0.08, Some(0.0))).0, StatusLabel::Erosion);
    }

    #[test]
    fn test_stable_bounds_inclusive() {
        let c = classifier(PeriodCapabilities::full());
        assert_eq!(c.classify_vector(&vector(0.05, 0.0, None)).0, StatusLabel::Stable);
        assert_eq!(c.classify_vector(&vector(-0.05, 0.0, None)).0, StatusLabel::Stable);
        assert_eq!(c.classify_vector(&vector(0.0, -0.3, None)).0, StatusLabel::Stable);
    }

    #[test]
    fn test_erosion_fallback() {
        let c = classifier(PeriodCapabilities::full());
        assert_eq!(c.classify_vector(&vector(-0.10, 0.0, None)).0, StatusLabel::Erosion);
    }

    #[test]
    fn test_raising_growth_raises_stable_upper() {
        let thresholds = ThresholdConfig::from_overrides(&ThresholdOverrides {
            growth_annual: Some(0.10),
            ..Default::default()
        })
        .unwrap();
        let c = StatusClassifier::new(thresholds, PeriodCapabilities::full());

        // 0.08 在默认阈值下为增长,调高后落入稳定
        assert_eq!(c.classify_vector(&vector(0.08, 0.0, None)).0, StatusLabel::Stable);
    }

    #[test]
    fn test_annual_only_dataset_degrades() {
        let c = classifier(PeriodCapabilities::annual_only());
        let store = Store::new(1, "S1", crate::domain::PeriodPair::new(100.0, 110.0));

        let v = c.change_vector(&store);
        assert_eq!(v.secondary, 0.0);
        assert_eq!(v.tertiary, None);
        // 次级变化率 0 > growth_secondary(-0.05) → 增长
        assert_eq!(c.classify(&store), StatusLabel::Growth);
    }

    #[test]
    fn test_bimonthly_used_as_secondary_without_half_year() {
        let c = classifier(PeriodCapabilities {
            bimonthly: true,
            ..PeriodCapabilities::default()
        });
        let mut store = Store::new(1, "S1", crate::domain::PeriodPair::new(100.0, 80.0));
        store.bimonthly = Some(crate::domain::PeriodPair::new(100.0, 85.0));

        assert_eq!(c.classify(&store), StatusLabel::Danger);
    }

    #[test]
    fn test_reason_is_json() {
        let c = classifier(PeriodCapabilities::full());
        let (_, reason) = c.classify_vector(&vector(-0.20, -0.15, Some(0.1)));
        let value: serde_json::Value = serde_json::from_str(&reason).unwrap();

        assert_eq!(value["rule"], "DANGER");
        assert_eq!(value["secondary_period"], "HALF_YEAR");
    }
}
