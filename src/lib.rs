// ==========================================
// 门店销售分析系统 - 核心库
// ==========================================
// 技术栈: Rust (纯计算引擎 + 文件导入)
// 系统定位: 指标/状态分类引擎 (展示层由外部负责)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 指标计算与分类规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 阈值配置
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 驾驶舱查询接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{GroupDimension, StatusLabel};

// 领域实体
pub use domain::{
    Dataset, PeriodCapabilities, PeriodPair, Product, ProductMetrics, SalesFact, Store,
    StoreMetrics,
};

// 配置
pub use config::{ConfigManager, ThresholdConfig, ThresholdOverrides};

// 引擎
pub use engine::{
    relative_change, ActivityPartitioner, AlertSelector, AnalyticsOrchestrator,
    AnalyticsReport, PenetrationEngine, RankingEngine, ReportCache, StatusClassifier,
    TrendEngine,
};

// API
pub use api::DashboardApi;

// 导入
pub use importer::DatasetImporter;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "门店销售分析系统";
