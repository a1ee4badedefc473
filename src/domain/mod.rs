// ==========================================
// 门店销售分析系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、输出记录
// 红线: 不含文件读取逻辑,不含引擎逻辑
// ==========================================

pub mod dataset;
pub mod product;
pub mod quality;
pub mod report;
pub mod store;
pub mod types;

// 重导出核心类型
pub use dataset::Dataset;
pub use product::{Product, ProductMetrics, SalesFact};
pub use quality::{DqLevel, DqReport, DqTable, DqViolation};
pub use report::{
    AlertRecord, ClosedStoreReport, ClosedStoreRow, DashboardKpis, GroupSummary,
    OpportunityRecord, OpportunitySummary, PeriodComparison, ProductPenetration, ProductStoreRow,
    StoreProductRow, TrendPoint, TrendReport,
};
pub use store::{PeriodCapabilities, PeriodPair, Store, StoreMetrics};
pub use types::{GroupDimension, PeriodKind, StatusLabel};
