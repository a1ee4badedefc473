// ==========================================
// 门店销售分析系统 - 输出记录模型
// ==========================================
// 用途: 引擎输出的扁平记录,供展示层渲染/导出
// 红线: 只读数据,不含计算逻辑
// ==========================================

use crate::domain::types::{GroupDimension, StatusLabel};
use serde::{Deserialize, Serialize};

// ==========================================
// GroupSummary - 分组汇总
// ==========================================
// change = (Σ本期 - Σ基期) / Σ基期, 先求和后相除
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub dimension: GroupDimension,
    pub key: String,
    pub count: usize,
    pub previous_total: f64,
    pub current_total: f64,
    pub change: f64,
}

// ==========================================
// ProductPenetration - 商品渗透率
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPenetration {
    pub product_id: i64,
    pub stores_carrying: usize, // 在售活跃门店数 (去重)
    pub avg_sales: f64,         // 在售门店本期销售均值
    pub penetration: f64,       // stores_carrying / 活跃门店数
    pub high_penetration: bool,
}

// ==========================================
// OpportunityRecord - 潜力机会
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityRecord {
    pub store_id: i64,
    pub store_name: String,
    pub city: Option<String>,
    pub current_sales: f64,
    pub missing_count: usize,
    pub missing_product_ids: Vec<i64>, // 升序
    pub potential_value: f64,          // 取整
}

/// 潜力机会汇总 (门店数 / 潜力合计 / 平均潜力)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpportunitySummary {
    pub store_count: usize,
    pub total_potential: f64,
    pub mean_potential: f64, // 无机会时为 0
}

// ==========================================
// AlertRecord - 告警/复苏名单行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub store_id: i64,
    pub store_name: String,
    pub city: Option<String>,
    pub current_sales: f64,
    pub bimonthly_change: f64,
    pub status: StatusLabel,
}

// ==========================================
// ClosedStoreRow / ClosedStoreReport - 关店报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedStoreRow {
    pub store_id: i64,
    pub store_name: String,
    pub city: Option<String>,
    pub previous_sales: f64,
    pub current_sales: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClosedStoreReport {
    pub closed_count: usize,
    pub lost_sales: f64,   // 关店门店的基期销售合计
    pub closed_share: f64, // 关店数 / 全部门店数
    pub rows: Vec<ClosedStoreRow>, // 按基期销售降序
}

// ==========================================
// 趋势
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodComparison {
    pub previous_total: f64,
    pub current_total: f64,
    pub change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub label: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub points: Vec<TrendPoint>, // 时间序列 (仅含半年数据时生成)
    pub annual: PeriodComparison,
    pub half_year: Option<PeriodComparison>,
    pub quarter_yoy: Option<PeriodComparison>,
    pub quarter_seq: Option<PeriodComparison>,
    pub bimonthly: Option<PeriodComparison>,
}

// ==========================================
// DashboardKpis - 驾驶舱指标
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardKpis {
    pub total_sales: f64,
    pub previous_sales: f64,
    pub sales_change: f64,
    pub active_count: usize,
    pub closed_count: usize,
    pub growth_count: usize,
    pub growth_share: f64,
    pub at_risk_count: usize, // 危险 + 侵蚀
    pub at_risk_share: f64,
}

// ==========================================
// 下钻明细
// ==========================================

/// 门店下钻: 该店的商品行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreProductRow {
    pub product_id: i64,
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub previous_sales: f64,
    pub current_sales: f64,
    pub annual_change: f64,
    pub half_year_change: Option<f64>,
    pub quarter_yoy_change: Option<f64>,
    pub bimonthly_change: Option<f64>,
}

/// 商品下钻: 在售门店行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductStoreRow {
    pub store_id: i64,
    pub store_name: Option<String>,
    pub city: Option<String>,
    pub previous_sales: f64,
    pub current_sales: f64,
    pub annual_change: f64,
}
