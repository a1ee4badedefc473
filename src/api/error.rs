// ==========================================
// 门店销售分析系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，把下层错误转换为面向调用方的错误消息
// ==========================================

use crate::config::ConfigError;
use crate::importer::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 请求错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("数据集版本不匹配: 报告={report}, 数据集={dataset}")]
    VersionMismatch { report: String, dataset: String },

    // ==========================================
    // 下层错误
    // ==========================================
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("文件导入失败: {0}")]
    Import(#[from] ImportError),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_error_conversion() {
        let err: ApiError = ImportError::FileNotFound("/tmp/x.xlsx".to_string()).into();
        match err {
            ApiError::Import(inner) => assert!(inner.to_string().contains("/tmp/x.xlsx")),
            _ => panic!("Expected Import"),
        }
    }

    #[test]
    fn test_config_error_conversion() {
        let err: ApiError = ConfigError::FileNotFound("settings.json".to_string()).into();
        assert!(matches!(err, ApiError::Config(_)));
        assert!(err.to_string().contains("settings.json"));
    }
}
