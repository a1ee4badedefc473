// ==========================================
// 门店销售分析系统 - 命令行入口
// ==========================================
// 用法:
//   sales-report <workbook.xlsx|csv_dir> [settings.json] [min_penetration]
//
// 输出: 分析快照 (JSON) 写到 stdout; 日志写到 stderr
// 环境变量: RUST_LOG 日志级别, SALES_REPORT_LOCALE 显示语言 (zh-CN/en/he)
// ==========================================

use anyhow::{bail, Context};
use serde_json::json;
use store_sales_analytics::config::ConfigManager;
use store_sales_analytics::engine::AnalyticsOrchestrator;
use store_sales_analytics::importer::DatasetImporter;
use store_sales_analytics::{i18n, logging, APP_NAME, VERSION};

fn main() -> anyhow::Result<()> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let Some(input) = args.next() else {
        bail!("用法: sales-report <workbook.xlsx|csv_dir> [settings.json] [min_penetration]");
    };
    let settings_path = args.next().filter(|s| !s.trim().is_empty());
    let min_penetration = args
        .next()
        .map(|raw| {
            raw.trim()
                .parse::<f64>()
                .with_context(|| format!("min_penetration 不是数值: {raw}"))
        })
        .transpose()?;

    if let Ok(locale) = std::env::var("SALES_REPORT_LOCALE") {
        i18n::set_locale(&locale);
    }

    tracing::info!("{} v{}", APP_NAME, VERSION);

    // 配置: 显式文件 > 默认位置 > 内置默认值
    let manager = match &settings_path {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::from_default_location(),
    };
    let mut settings = manager.load().context("加载阈值配置失败")?;
    if let Some(value) = min_penetration {
        settings = settings.with_min_penetration(value)?;
    }

    // 导入
    let outcome = match DatasetImporter::new().import(&input) {
        Ok(outcome) => outcome,
        Err(err) => {
            let message = i18n::import_error_message(&err);
            return Err(anyhow::Error::new(err).context(message));
        }
    };

    // 分析
    let report = AnalyticsOrchestrator::new(settings).run(&outcome.dataset);

    let output = json!({
        "report": report,
        "data_quality": outcome.dq_report,
        "config_snapshot": ConfigManager::get_config_snapshot(&settings)?,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
