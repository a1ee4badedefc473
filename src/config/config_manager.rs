// ==========================================
// 门店销售分析系统 - 配置管理器
// ==========================================
// 职责: 配置加载 (默认值 → 配置文件 → 调用方覆写)
// 存储: JSON 文件 (默认位于用户配置目录)
// ==========================================

use crate::config::analysis_settings::{AnalysisSettings, SettingsOverrides};
use crate::config::error::{ConfigError, ConfigResult};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 配置目录名
pub const CONFIG_DIR_NAME: &str = "store-sales-analytics";

/// 配置文件名
pub const SETTINGS_FILE_NAME: &str = "settings.json";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    settings_path: Option<PathBuf>,
    explicit: bool,
}

impl ConfigManager {
    /// 使用显式配置文件 (文件必须存在)
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            settings_path: Some(path.as_ref().to_path_buf()),
            explicit: true,
        }
    }

    /// 使用默认配置文件位置 (文件不存在时回退默认值)
    pub fn from_default_location() -> Self {
        Self {
            settings_path: get_default_settings_path(),
            explicit: false,
        }
    }

    /// 当前配置文件路径
    pub fn settings_path(&self) -> Option<&Path> {
        self.settings_path.as_deref()
    }

    /// 加载分析参数
    ///
    /// # 返回
    /// - Ok(AnalysisSettings): 合并并校验后的参数
    /// - Err(ConfigError::FileNotFound): 显式路径不存在
    /// - Err(ConfigError): 文件读取/解析/校验失败
    pub fn load(&self) -> ConfigResult<AnalysisSettings> {
        let path = match &self.settings_path {
            Some(p) => p,
            None => {
                debug!("未找到用户配置目录,使用默认阈值");
                return Ok(AnalysisSettings::default());
            }
        };

        if !path.exists() {
            if self.explicit {
                return Err(ConfigError::FileNotFound(path.display().to_string()));
            }
            debug!(path = %path.display(), "配置文件不存在,使用默认阈值");
            return Ok(AnalysisSettings::default());
        }

        let raw = fs::read_to_string(path)?;
        let settings = Self::load_from_str(&raw)?;
        info!(path = %path.display(), "已加载阈值配置");
        Ok(settings)
    }

    /// 从 JSON 字符串加载
    pub fn load_from_str(raw: &str) -> ConfigResult<AnalysisSettings> {
        let overrides: SettingsOverrides = serde_json::from_str(raw)?;
        AnalysisSettings::from_overrides(&overrides)
    }

    /// 获取参数快照 (JSON格式)
    ///
    /// # 用途
    /// - 随报告一起输出,保证结果可复现
    pub fn get_config_snapshot(settings: &AnalysisSettings) -> ConfigResult<String> {
        let snapshot = json!({
            "thresholds": settings.thresholds.snapshot(),
            "min_penetration": settings.min_penetration,
            "display_limit": settings.display_limit,
        });
        Ok(serde_json::to_string(&snapshot)?)
    }
}

/// 默认配置文件路径: <config_dir>/store-sales-analytics/settings.json
pub fn get_default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(SETTINGS_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"thresholds": {{"growth_annual": 0.08}}, "min_penetration": 0.6}}"#
        )
        .unwrap();

        let settings = ConfigManager::with_path(file.path()).load().unwrap();

        assert_eq!(settings.thresholds.growth_annual(), 0.08);
        assert_eq!(settings.thresholds.stable_upper(), 0.08);
        assert_eq!(settings.min_penetration, 0.6);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let manager = ConfigManager::with_path("/nonexistent/settings.json");
        assert!(matches!(manager.load(), Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let result = ConfigManager::load_from_str("{ not json");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_out_of_range_in_file() {
        let result = ConfigManager::load_from_str(r#"{"min_penetration": 0.2}"#);
        assert!(matches!(result, Err(ConfigError::OutOfRange { .. })));
    }

    #[test]
    fn test_config_snapshot() {
        let snapshot = ConfigManager::get_config_snapshot(&AnalysisSettings::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&snapshot).unwrap();

        assert_eq!(value["thresholds"]["stable_upper"], 0.05);
        assert_eq!(value["min_penetration"], 0.7);
    }
}
