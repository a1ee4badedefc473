// ==========================================
// 门店销售分析系统 - 数据集快照
// ==========================================
// 职责: 一次计算所用的只读输入 (门店/商品/销售事实 + 能力描述)
// 红线: 计算期间不可变; 数据变化 = 新版本
// ==========================================

use crate::domain::product::{Product, SalesFact};
use crate::domain::store::{PeriodCapabilities, Store};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub version: String, // 数据集版本 (缓存键的一部分)
    pub capabilities: PeriodCapabilities,
    pub stores: Vec<Store>,
    pub products: Vec<Product>,
    pub sales: Vec<SalesFact>,
}

impl Dataset {
    pub fn new(
        version: impl Into<String>,
        capabilities: PeriodCapabilities,
        stores: Vec<Store>,
        products: Vec<Product>,
        sales: Vec<SalesFact>,
    ) -> Self {
        Self {
            version: version.into(),
            capabilities,
            stores,
            products,
            sales,
        }
    }

    /// 商品ID → 商品 索引
    pub fn product_index(&self) -> HashMap<i64, &Product> {
        self.products.iter().map(|p| (p.product_id, p)).collect()
    }

    /// 按ID查找门店
    pub fn find_store(&self, store_id: i64) -> Option<&Store> {
        self.stores.iter().find(|s| s.store_id == store_id)
    }

    /// 按ID查找商品
    pub fn find_product(&self, product_id: i64) -> Option<&Product> {
        self.products.iter().find(|p| p.product_id == product_id)
    }
}
