// ==========================================
// 门店销售分析系统 - 状态阈值配置
// ==========================================
// 职责: 状态分类/告警/复苏所用的全部阈值
// 红线: stable_upper ≡ growth_annual, erosion_annual ≡ stable_lower
//       两个派生值不存储,只通过访问器得到,调高增长阈值即同时抬高稳定上限
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 阈值配置键
pub mod threshold_keys {
    pub const GROWTH_ANNUAL: &str = "growth_annual";
    pub const GROWTH_SECONDARY: &str = "growth_secondary";
    pub const STABLE_UPPER: &str = "stable_upper";
    pub const STABLE_LOWER: &str = "stable_lower";
    pub const STABLE_SECONDARY: &str = "stable_secondary";
    pub const EROSION_ANNUAL: &str = "erosion_annual";
    pub const DANGER_ANNUAL: &str = "danger_annual";
    pub const DANGER_SECONDARY: &str = "danger_secondary";
    pub const ALARM_BIMONTHLY: &str = "alarm_bimonthly";
    pub const RECOVERY_BIMONTHLY: &str = "recovery_bimonthly";
}

use threshold_keys::*;

// ==========================================
// 默认值与允许范围
// ==========================================
pub const DEFAULT_GROWTH_ANNUAL: f64 = 0.05;
pub const DEFAULT_GROWTH_SECONDARY: f64 = -0.05;
pub const DEFAULT_STABLE_LOWER: f64 = -0.05;
pub const DEFAULT_STABLE_SECONDARY: f64 = -0.10;
pub const DEFAULT_DANGER_ANNUAL: f64 = -0.15;
pub const DEFAULT_DANGER_SECONDARY: f64 = -0.10;
pub const DEFAULT_ALARM_BIMONTHLY: f64 = -0.15;
pub const DEFAULT_RECOVERY_BIMONTHLY: f64 = 0.0;

/// (key, min, max)
const RANGES: [(&str, f64, f64); 8] = [
    (GROWTH_ANNUAL, 0.0, 0.20),
    (GROWTH_SECONDARY, -0.20, 0.10),
    (STABLE_LOWER, -0.15, 0.0),
    (STABLE_SECONDARY, -0.20, 0.0),
    (DANGER_ANNUAL, -0.30, 0.0),
    (DANGER_SECONDARY, -0.30, 0.0),
    (ALARM_BIMONTHLY, -0.30, 0.0),
    (RECOVERY_BIMONTHLY, -0.10, 0.10),
];

// ==========================================
// ThresholdOverrides - 用户覆写 (全部可选)
// ==========================================
// 用途: 配置文件/调用方覆写的原始输入,未经校验
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdOverrides {
    #[serde(default)]
    pub growth_annual: Option<f64>,
    #[serde(default)]
    pub growth_secondary: Option<f64>,
    #[serde(default)]
    pub stable_lower: Option<f64>,
    #[serde(default)]
    pub stable_secondary: Option<f64>,
    #[serde(default)]
    pub danger_annual: Option<f64>,
    #[serde(default)]
    pub danger_secondary: Option<f64>,
    #[serde(default)]
    pub alarm_bimonthly: Option<f64>,
    #[serde(default)]
    pub recovery_bimonthly: Option<f64>,

    /// 派生键: 若提供必须与 growth_annual 一致
    #[serde(default)]
    pub stable_upper: Option<f64>,

    /// 派生键: 若提供必须与 stable_lower 一致
    #[serde(default)]
    pub erosion_annual: Option<f64>,
}

// ==========================================
// ThresholdConfig - 校验后的阈值 (值对象)
// ==========================================
// 字段私有: 只能经 default()/from_overrides() 构造
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdConfig {
    growth_annual: f64,
    growth_secondary: f64,
    stable_lower: f64,
    stable_secondary: f64,
    danger_annual: f64,
    danger_secondary: f64,
    alarm_bimonthly: f64,
    recovery_bimonthly: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            growth_annual: DEFAULT_GROWTH_ANNUAL,
            growth_secondary: DEFAULT_GROWTH_SECONDARY,
            stable_lower: DEFAULT_STABLE_LOWER,
            stable_secondary: DEFAULT_STABLE_SECONDARY,
            danger_annual: DEFAULT_DANGER_ANNUAL,
            danger_secondary: DEFAULT_DANGER_SECONDARY,
            alarm_bimonthly: DEFAULT_ALARM_BIMONTHLY,
            recovery_bimonthly: DEFAULT_RECOVERY_BIMONTHLY,
        }
    }
}

impl ThresholdConfig {
    /// 在默认值上合并覆写并校验
    ///
    /// # 返回
    /// - Ok(ThresholdConfig): 校验通过
    /// - Err(ConfigError::OutOfRange): 任一阈值超出允许范围
    /// - Err(ConfigError::DerivedKeyConflict): 派生键与源键不一致
    pub fn from_overrides(overrides: &ThresholdOverrides) -> ConfigResult<Self> {
        let d = Self::default();
        let config = Self {
            growth_annual: overrides.growth_annual.unwrap_or(d.growth_annual),
            growth_secondary: overrides.growth_secondary.unwrap_or(d.growth_secondary),
            stable_lower: overrides.stable_lower.unwrap_or(d.stable_lower),
            stable_secondary: overrides.stable_secondary.unwrap_or(d.stable_secondary),
            danger_annual: overrides.danger_annual.unwrap_or(d.danger_annual),
            danger_secondary: overrides.danger_secondary.unwrap_or(d.danger_secondary),
            alarm_bimonthly: overrides.alarm_bimonthly.unwrap_or(d.alarm_bimonthly),
            recovery_bimonthly: overrides.recovery_bimonthly.unwrap_or(d.recovery_bimonthly),
        };

        if let Some(upper) = overrides.stable_upper {
            check_derived(STABLE_UPPER, upper, GROWTH_ANNUAL, config.growth_annual)?;
        }
        if let Some(erosion) = overrides.erosion_annual {
            check_derived(EROSION_ANNUAL, erosion, STABLE_LOWER, config.stable_lower)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// 校验所有独立阈值的范围
    pub fn validate(&self) -> ConfigResult<()> {
        let values = self.independent_values();
        for (key, min, max) in RANGES {
            let value = values.get(key).copied().unwrap_or(f64::NAN);
            if !value.is_finite() || value < min || value > max {
                return Err(ConfigError::OutOfRange {
                    key: key.to_string(),
                    value,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }

    // ===== 访问器 =====

    pub fn growth_annual(&self) -> f64 {
        self.growth_annual
    }

    pub fn growth_secondary(&self) -> f64 {
        self.growth_secondary
    }

    /// 稳定区间上限 (派生: = growth_annual)
    pub fn stable_upper(&self) -> f64 {
        self.growth_annual
    }

    pub fn stable_lower(&self) -> f64 {
        self.stable_lower
    }

    pub fn stable_secondary(&self) -> f64 {
        self.stable_secondary
    }

    /// 侵蚀阈值 (派生: = stable_lower)
    pub fn erosion_annual(&self) -> f64 {
        self.stable_lower
    }

    pub fn danger_annual(&self) -> f64 {
        self.danger_annual
    }

    pub fn danger_secondary(&self) -> f64 {
        self.danger_secondary
    }

    pub fn alarm_bimonthly(&self) -> f64 {
        self.alarm_bimonthly
    }

    pub fn recovery_bimonthly(&self) -> f64 {
        self.recovery_bimonthly
    }

    /// 全部阈值快照 (含派生键),用于报告与日志
    pub fn snapshot(&self) -> BTreeMap<&'static str, f64> {
        let mut map = self.independent_values();
        map.insert(STABLE_UPPER, self.stable_upper());
        map.insert(EROSION_ANNUAL, self.erosion_annual());
        map
    }

    /// 缓存键用的位表示 (精确比较)
    pub fn fingerprint(&self) -> [u64; 8] {
        [
            self.growth_annual.to_bits(),
            self.growth_secondary.to_bits(),
            self.stable_lower.to_bits(),
            self.stable_secondary.to_bits(),
            self.danger_annual.to_bits(),
            self.danger_secondary.to_bits(),
            self.alarm_bimonthly.to_bits(),
            self.recovery_bimonthly.to_bits(),
        ]
    }

    fn independent_values(&self) -> BTreeMap<&'static str, f64> {
        BTreeMap::from([
            (GROWTH_ANNUAL, self.growth_annual),
            (GROWTH_SECONDARY, self.growth_secondary),
            (STABLE_LOWER, self.stable_lower),
            (STABLE_SECONDARY, self.stable_secondary),
            (DANGER_ANNUAL, self.danger_annual),
            (DANGER_SECONDARY, self.danger_secondary),
            (ALARM_BIMONTHLY, self.alarm_bimonthly),
            (RECOVERY_BIMONTHLY, self.recovery_bimonthly),
        ])
    }
}

fn check_derived(key: &str, actual: f64, source_key: &str, expected: f64) -> ConfigResult<()> {
    if actual.to_bits() != expected.to_bits() {
        return Err(ConfigError::DerivedKeyConflict {
            key: key.to_string(),
            source_key: source_key.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ThresholdConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.growth_annual(), 0.05);
        assert_eq!(config.danger_annual(), -0.15);
        assert_eq!(config.alarm_bimonthly(), -0.15);
    }

    #[test]
    fn test_stable_upper_follows_growth() {
        let overrides = ThresholdOverrides {
            growth_annual: Some(0.10),
            ..Default::default()
        };
        let config = ThresholdConfig::from_overrides(&overrides).unwrap();

        assert_eq!(config.stable_upper(), 0.10);
    }

    #[test]
    fn test_erosion_follows_stable_lower() {
        let overrides = ThresholdOverrides {
            stable_lower: Some(-0.08),
            ..Default::default()
        };
        let config = ThresholdConfig::from_overrides(&overrides).unwrap();

        assert_eq!(config.erosion_annual(), -0.08);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let overrides = ThresholdOverrides {
            danger_annual: Some(-0.5),
            ..Default::default()
        };
        let err = ThresholdConfig::from_overrides(&overrides).unwrap_err();

        match err {
            ConfigError::OutOfRange { key, .. } => assert_eq!(key, DANGER_ANNUAL),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_nan_rejected() {
        let overrides = ThresholdOverrides {
            alarm_bimonthly: Some(f64::NAN),
            ..Default::default()
        };
        assert!(ThresholdConfig::from_overrides(&overrides).is_err());
    }

    #[test]
    fn test_derived_key_conflict() {
        let overrides = ThresholdOverrides {
            growth_annual: Some(0.08),
            stable_upper: Some(0.05),
            ..Default::default()
        };
        let err = ThresholdConfig::from_overrides(&overrides).unwrap_err();

        assert!(matches!(err, ConfigError::DerivedKeyConflict { .. }));
    }

    #[test]
    fn test_derived_key_consistent_accepted() {
        let overrides = ThresholdOverrides {
            growth_annual: Some(0.08),
            stable_upper: Some(0.08),
            ..Default::default()
        };
        assert!(ThresholdConfig::from_overrides(&overrides).is_ok());
    }

    #[test]
    fn test_snapshot_contains_derived_keys() {
        let snapshot = ThresholdConfig::default().snapshot();

        assert_eq!(snapshot.len(), 10);
        assert_eq!(snapshot[STABLE_UPPER], snapshot[GROWTH_ANNUAL]);
        assert_eq!(snapshot[EROSION_ANNUAL], snapshot[STABLE_LOWER]);
    }

    #[test]
    fn test_fingerprint_changes_with_any_value() {
        let base = ThresholdConfig::default();
        let changed = ThresholdConfig::from_overrides(&ThresholdOverrides {
            recovery_bimonthly: Some(0.01),
            ..Default::default()
        })
        .unwrap();

        assert_ne!(base.fingerprint(), changed.fingerprint());
        assert_eq!(base.fingerprint(), ThresholdConfig::default().fingerprint());
    }
}
