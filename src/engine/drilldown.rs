// ==========================================
// 门店销售分析系统 - 下钻明细
// ==========================================
// 门店下钻: 该店销售的全部商品 (本期销售降序)
// 商品下钻: 活跃门店中该商品的全部事实行 (含本期销售为 0 的行,本期销售降序)
//          渗透率口径 (本期销售 > 0) 由 PenetrationEngine 负责
// 孤儿事实: 商品名称/分类从商品目录取,目录缺失时退回事实表冗余字段
// ==========================================

use crate::domain::product::{Product, SalesFact};
use crate::domain::report::{ProductStoreRow, StoreProductRow};
use crate::domain::store::PeriodCapabilities;
use crate::domain::types::PeriodKind;
use crate::engine::change::{optional_pair_change, pair_change};
use std::collections::{HashMap, HashSet};

pub struct DrilldownEngine {
    capabilities: PeriodCapabilities,
}

impl DrilldownEngine {
    pub fn new(capabilities: PeriodCapabilities) -> Self {
        Self { capabilities }
    }

    /// 门店的商品明细
    pub fn store_products(
        &self,
        store_id: i64,
        sales: &[SalesFact],
        catalog: &HashMap<i64, &Product>,
    ) -> Vec<StoreProductRow> {
        let mut rows: Vec<StoreProductRow> = sales
            .iter()
            .filter(|f| f.store_id == store_id)
            .map(|f| {
                let product = catalog.get(&f.product_id);
                StoreProductRow {
                    product_id: f.product_id,
                    product_name: product
                        .map(|p| p.name.clone())
                        .or_else(|| f.product_name.clone()),
                    category: product
                        .and_then(|p| p.category.clone())
                        .or_else(|| f.category.clone()),
                    previous_sales: f.annual.previous,
                    current_sales: f.annual.current,
                    annual_change: pair_change(&f.annual),
                    half_year_change: self.change(f, PeriodKind::HalfYear),
                    quarter_yoy_change: self.change(f, PeriodKind::QuarterYoy),
                    bimonthly_change: self.change(f, PeriodKind::Bimonthly),
                }
            })
            .collect();

        rows.sort_by(|a, b| b.current_sales.total_cmp(&a.current_sales));
        rows
    }

    /// 商品的门店明细 (仅活跃门店)
    pub fn product_stores(
        &self,
        product_id: i64,
        sales: &[SalesFact],
        active_ids: &HashSet<i64>,
    ) -> Vec<ProductStoreRow> {
        let mut rows: Vec<ProductStoreRow> = sales
            .iter()
            .filter(|f| {
                f.product_id == product_id && active_ids.contains(&f.store_id)
            })
            .map(|f| ProductStoreRow {
                store_id: f.store_id,
                store_name: f.store_name.clone(),
                city: f.city.clone(),
                previous_sales: f.annual.previous,
                current_sales: f.annual.current,
                annual_change: pair_change(&f.annual),
            })
            .collect();

        rows.sort_by(|a, b| b.current_sales.total_cmp(&a.current_sales));
        rows
    }

    fn change(&self, fact: &SalesFact, kind: PeriodKind) -> Option<f64> {
        optional_pair_change(self.capabilities.has(kind), fact.period(kind))
    }
}
