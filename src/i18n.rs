// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持中文（默认）、英文、希伯来语
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

use crate::domain::types::StatusLabel;
use crate::importer::ImportError;

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"zh-CN"、"en" 或 "he"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 翻译消息（无参数）
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use store_sales_analytics::i18n::t_with_args;
/// let msg = t_with_args("import.file_not_found", &[("path", "/tmp/stores.csv")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

/// 状态标签显示名
pub fn status_display_name(status: StatusLabel) -> String {
    t(status.i18n_key())
}

/// 城市显示名 (空城市键显示为"未知城市")
pub fn city_display_name(city: &str) -> String {
    if city.is_empty() {
        t("city.unknown")
    } else {
        city.to_string()
    }
}

/// 导入失败的用户提示
///
/// 文件缺失与校验失败给出本地化文案,其余错误沿用错误本身的描述
pub fn import_error_message(err: &ImportError) -> String {
    match err {
        ImportError::FileNotFound(path) => {
            t_with_args("import.file_not_found", &[("path", path.as_str())])
        }
        ImportError::ValidationFailed { errors, .. } => t_with_args(
            "import.validation_failed",
            &[("count", errors.to_string().as_str())],
        ),
        other => other.to_string(),
    }
}
