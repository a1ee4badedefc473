// ==========================================
// 门店销售分析系统 - 商品与销售事实模型
// ==========================================
// 门店 × 商品 为多对多,通过销售事实表关联
// 事实表中不存在某 (门店, 商品) 行 = 该门店从未销售该商品
// ==========================================

use crate::domain::store::PeriodPair;
use crate::domain::types::PeriodKind;
use serde::{Deserialize, Serialize};

// ==========================================
// Product - 商品目录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: i64,
    pub name: String,
    pub category: Option<String>,
    pub annual: PeriodPair, // 全网汇总
}

impl Product {
    pub fn new(product_id: i64, name: impl Into<String>, annual: PeriodPair) -> Self {
        Self {
            product_id,
            name: name.into(),
            category: None,
            annual,
        }
    }
}

// ==========================================
// ProductMetrics - 商品派生指标
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMetrics {
    pub product: Product,
    pub annual_change: f64,
    pub rank: u32,
}

// ==========================================
// SalesFact - 门店商品销售事实
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesFact {
    pub store_id: i64,
    pub product_id: i64,

    // ===== 冗余描述字段 (源表自带) =====
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub store_name: Option<String>,
    pub city: Option<String>,

    // ===== 周期销售 =====
    pub annual: PeriodPair,
    pub half_year: Option<PeriodPair>,
    pub quarter_yoy: Option<PeriodPair>,
    pub bimonthly: Option<PeriodPair>,
}

impl SalesFact {
    pub fn new(store_id: i64, product_id: i64, annual: PeriodPair) -> Self {
        Self {
            store_id,
            product_id,
            product_name: None,
            category: None,
            store_name: None,
            city: None,
            annual,
            half_year: None,
            quarter_yoy: None,
            bimonthly: None,
        }
    }

    pub fn period(&self, kind: PeriodKind) -> Option<&PeriodPair> {
        match kind {
            PeriodKind::Annual => Some(&self.annual),
            PeriodKind::HalfYear => self.half_year.as_ref(),
            PeriodKind::QuarterYoy => self.quarter_yoy.as_ref(),
            PeriodKind::Bimonthly => self.bimonthly.as_ref(),
            // 事实表不含季度环比
            PeriodKind::QuarterSeq => None,
        }
    }

    /// 本期销售
    pub fn current_sales(&self) -> f64 {
        self.annual.current
    }
}
