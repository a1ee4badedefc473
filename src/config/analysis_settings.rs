// ==========================================
// 门店销售分析系统 - 分析参数
// ==========================================
// 职责: 一次计算所需的全部参数 (阈值 + 渗透率下限 + 展示条数)
// 红线: 计算期间不可变,按值传入引擎
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::thresholds::{ThresholdConfig, ThresholdOverrides};
use serde::{Deserialize, Serialize};

/// 默认高渗透率下限
pub const DEFAULT_MIN_PENETRATION: f64 = 0.7;

/// 高渗透率下限允许范围
pub const MIN_PENETRATION_RANGE: (f64, f64) = (0.5, 0.9);

/// 告警/复苏名单默认展示条数
pub const DEFAULT_DISPLAY_LIMIT: usize = 20;

// ==========================================
// SettingsOverrides - 配置文件格式
// ==========================================
// 示例:
// {
//   "thresholds": { "growth_annual": 0.08 },
//   "min_penetration": 0.6,
//   "display_limit": 10
// }
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsOverrides {
    #[serde(default)]
    pub thresholds: ThresholdOverrides,
    #[serde(default)]
    pub min_penetration: Option<f64>,
    #[serde(default)]
    pub display_limit: Option<usize>,
}

// ==========================================
// AnalysisSettings - 校验后的分析参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalysisSettings {
    pub thresholds: ThresholdConfig,
    pub min_penetration: f64,
    pub display_limit: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            thresholds: ThresholdConfig::default(),
            min_penetration: DEFAULT_MIN_PENETRATION,
            display_limit: DEFAULT_DISPLAY_LIMIT,
        }
    }
}

impl AnalysisSettings {
    /// 合并覆写并校验
    pub fn from_overrides(overrides: &SettingsOverrides) -> ConfigResult<Self> {
        let thresholds = ThresholdConfig::from_overrides(&overrides.thresholds)?;
        let min_penetration = overrides
            .min_penetration
            .unwrap_or(DEFAULT_MIN_PENETRATION);
        validate_min_penetration(min_penetration)?;

        Ok(Self {
            thresholds,
            min_penetration,
            display_limit: overrides.display_limit.unwrap_or(DEFAULT_DISPLAY_LIMIT),
        })
    }

    /// 替换渗透率下限 (例如命令行参数)
    pub fn with_min_penetration(self, min_penetration: f64) -> ConfigResult<Self> {
        validate_min_penetration(min_penetration)?;
        Ok(Self {
            min_penetration,
            ..self
        })
    }
}

/// 校验高渗透率下限
pub fn validate_min_penetration(value: f64) -> ConfigResult<()> {
    let (min, max) = MIN_PENETRATION_RANGE;
    if !value.is_finite() || value < min || value > max {
        return Err(ConfigError::OutOfRange {
            key: "min_penetration".to_string(),
            value,
            min,
            max,
        });
    }
    Ok(())
}
