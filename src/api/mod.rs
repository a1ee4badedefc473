// ==========================================
// 门店销售分析系统 - API 层
// ==========================================
// 职责: 提供驾驶舱查询接口,供展示层调用
// ==========================================

pub mod dashboard_api;
pub mod error;

// 重导出核心类型
pub use dashboard_api::{DashboardApi, EmptySection, ProductDetail, StoreDetail, StoreFilter};
pub use error::{ApiError, ApiResult};
