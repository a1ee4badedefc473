// ==========================================
// 门店销售分析系统 - 渗透率与潜力引擎
// ==========================================
// 职责: 识别高渗透率商品,计算每家活跃门店缺失的高渗透商品及潜力值
// 输入: 活跃门店 + 销售事实 + 高渗透率下限
// 输出: 商品渗透率表 + 潜力机会表 (潜力值降序)
// ==========================================
// 口径:
// 1. 仅统计 活跃门店 且 本期销售 > 0 的事实行
// 2. penetration = 在售门店数(去重) / 活跃门店数
// 3. avg_sales = 在售事实行本期销售的算术平均
// 4. potential = Σ avg_sales(缺失的高渗透商品), 四舍五入取整
// 红线: 活跃门店数为 0 → 空结果,不除零
// ==========================================

use crate::domain::product::SalesFact;
use crate::domain::report::{OpportunityRecord, OpportunitySummary, ProductPenetration};
use crate::domain::store::Store;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, instrument};

#[derive(Default)]
struct ProductAccumulator {
    stores: HashSet<i64>,
    total_sales: f64,
    rows: usize,
}

// ==========================================
// PenetrationEngine - 渗透率与潜力引擎
// ==========================================
pub struct PenetrationEngine {
    min_penetration: f64,
}

impl PenetrationEngine {
    /// 构造函数
    ///
    /// # 参数
    /// - `min_penetration`: 高渗透率下限 (已由配置层校验)
    pub fn new(min_penetration: f64) -> Self {
        Self { min_penetration }
    }

    pub fn min_penetration(&self) -> f64 {
        self.min_penetration
    }

    // ==========================================
    // 渗透率
    // ==========================================

    /// 全部商品的渗透率 (按商品ID升序)
    ///
    /// 孤儿事实 (商品不在目录中) 仍参与统计: 渗透率只依赖事实表
    pub fn product_stats(&self, active: &[&Store], sales: &[SalesFact]) -> Vec<ProductPenetration> {
        if active.is_empty() {
            return Vec::new();
        }

        let active_ids: HashSet<i64> = active.iter().map(|s| s.store_id).collect();
        let active_count = active_ids.len() as f64;

        let mut accumulators: BTreeMap<i64, ProductAccumulator> = BTreeMap::new();
        for fact in qualifying_facts(&active_ids, sales) {
            let acc = accumulators.entry(fact.product_id).or_default();
            acc.stores.insert(fact.store_id);
            acc.total_sales += fact.current_sales();
            acc.rows += 1;
        }

        accumulators
            .into_iter()
            .map(|(product_id, acc)| {
                let penetration = acc.stores.len() as f64 / active_count;
                ProductPenetration {
                    product_id,
                    stores_carrying: acc.stores.len(),
                    avg_sales: acc.total_sales / acc.rows as f64,
                    penetration,
                    high_penetration: penetration >= self.min_penetration,
                }
            })
            .collect()
    }

    /// 单个商品的渗透率 (商品下钻)
    pub fn product_penetration(
        &self,
        product_id: i64,
        active: &[&Store],
        sales: &[SalesFact],
    ) -> Option<ProductPenetration> {
        self.product_stats(active, sales)
            .into_iter()
            .find(|p| p.product_id == product_id)
    }

    // ==========================================
    // 潜力机会
    // ==========================================

    /// 计算潜力机会
    ///
    /// # 返回
    /// 每家存在缺失高渗透商品的活跃门店一行,按潜力值降序 (稳定排序)
    #[instrument(skip(self, active, sales), fields(active_count = active.len(), facts = sales.len()))]
    pub fn opportunities(&self, active: &[&Store], sales: &[SalesFact]) -> Vec<OpportunityRecord> {
        let stats = self.product_stats(active, sales);

        // 高渗透商品 → 均值
        let high: BTreeMap<i64, f64> = stats
            .iter()
            .filter(|p| p.high_penetration)
            .map(|p| (p.product_id, p.avg_sales))
            .collect();

        debug!(
            products = stats.len(),
            high_penetration = high.len(),
            min_penetration = self.min_penetration,
            "渗透率统计完成"
        );

        if high.is_empty() {
            return Vec::new();
        }

        // 门店 → 在售商品
        let active_ids: HashSet<i64> = active.iter().map(|s| s.store_id).collect();
        let mut carried: HashMap<i64, HashSet<i64>> = HashMap::new();
        for fact in qualifying_facts(&active_ids, sales) {
            carried
                .entry(fact.store_id)
                .or_default()
                .insert(fact.product_id);
        }

        let empty = HashSet::new();
        let mut records: Vec<OpportunityRecord> = active
            .iter()
            .filter_map(|store| {
                let store_products = carried.get(&store.store_id).unwrap_or(&empty);
                let missing: Vec<i64> = high
                    .keys()
                    .filter(|pid| !store_products.contains(pid))
                    .copied()
                    .collect();

                if missing.is_empty() {
                    return None;
                }

                let potential: f64 = missing.iter().filter_map(|pid| high.get(pid)).sum();

                Some(OpportunityRecord {
                    store_id: store.store_id,
                    store_name: store.name.clone(),
                    city: store.city.clone(),
                    current_sales: store.current_sales(),
                    missing_count: missing.len(),
                    missing_product_ids: missing,
                    potential_value: potential.round(),
                })
            })
            .collect();

        records.sort_by(|a, b| b.potential_value.total_cmp(&a.potential_value));

        debug!(opportunities = records.len(), "潜力机会计算完成");
        records
    }

    /// 潜力机会汇总 (基于完整机会表)
    pub fn summarize(records: &[OpportunityRecord]) -> OpportunitySummary {
        let total_potential: f64 = records.iter().map(|r| r.potential_value).sum();
        let mean_potential = if records.is_empty() {
            0.0
        } else {
            total_potential / records.len() as f64
        };

        OpportunitySummary {
            store_count: records.len(),
            total_potential,
            mean_potential,
        }
    }
}

/// 活跃门店且本期销售 > 0 的事实行
fn qualifying_facts<'a>(
    active_ids: &'a HashSet<i64>,
    sales: &'a [SalesFact],
) -> impl Iterator<Item = &'a SalesFact> + 'a {
    sales
        .iter()
        .filter(move |f| active_ids.contains(&f.store_id) && f.current_sales() > 0.0)
}
