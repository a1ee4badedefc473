// ==========================================
// 门店销售分析系统 - 配置层
// ==========================================
// 职责: 阈值配置管理,支持默认值 + 文件覆写 + 调用方覆写
// 存储: JSON 文件
// ==========================================

pub mod analysis_settings;
pub mod config_manager;
pub mod error;
pub mod thresholds;

// 重导出核心配置类型
pub use analysis_settings::{
    validate_min_penetration, AnalysisSettings, SettingsOverrides, DEFAULT_DISPLAY_LIMIT,
    DEFAULT_MIN_PENETRATION,
};
pub use config_manager::{get_default_settings_path, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use thresholds::{threshold_keys, ThresholdConfig, ThresholdOverrides};
