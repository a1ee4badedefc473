// ==========================================
// 门店销售分析系统 - 引擎层
// ==========================================
// 职责: 实现指标计算与分类规则
// 红线: 引擎是纯函数,不读文件、不返回错误; 判定规则必须输出 reason
// ==========================================

pub mod activity;
pub mod alert;
pub mod cache;
pub mod change;
pub mod drilldown;
pub mod orchestrator;
pub mod penetration;
pub mod ranking;
pub mod status;
pub mod trend;

// 重导出核心引擎
pub use activity::ActivityPartitioner;
pub use alert::AlertSelector;
pub use cache::ReportCache;
pub use change::{optional_pair_change, pair_change, relative_change};
pub use drilldown::DrilldownEngine;
pub use orchestrator::{AnalyticsOrchestrator, AnalyticsReport};
pub use penetration::PenetrationEngine;
pub use ranking::RankingEngine;
pub use status::{ChangeVector, StatusClassifier, RECOVERY_SECONDARY_REBOUND};
pub use trend::TrendEngine;
