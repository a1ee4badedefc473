// ==========================================
// 门店销售分析系统 - 排名与分组汇总引擎
// ==========================================
// 职责: 竞争式排名 (1,1,3) + 按状态/城市/分类汇总
// 红线: 汇总变化率 = 先求和后相除,不是个体变化率的均值
// ==========================================

use crate::domain::product::{Product, ProductMetrics};
use crate::domain::report::GroupSummary;
use crate::domain::store::StoreMetrics;
use crate::domain::types::{GroupDimension, StatusLabel};
use crate::engine::change::{pair_change, relative_change};
use std::collections::HashMap;

// ==========================================
// RankingEngine - 排名与汇总
// ==========================================
// 无状态引擎,所有方法都是纯函数
pub struct RankingEngine;

impl RankingEngine {
    pub fn new() -> Self {
        Self
    }

    // ==========================================
    // 排名
    // ==========================================

    /// 竞争式排名 (降序,并列取最小名次)
    ///
    /// # 示例
    /// [300, 300, 100] → [1, 1, 3]
    ///
    /// NaN 视为最小值
    pub fn competition_rank(&self, values: &[f64]) -> Vec<u32> {
        let normalized: Vec<f64> = values
            .iter()
            .map(|v| if v.is_nan() { f64::NEG_INFINITY } else { *v })
            .collect();

        let mut order: Vec<usize> = (0..normalized.len()).collect();
        order.sort_by(|&a, &b| normalized[b].total_cmp(&normalized[a]));

        let mut ranks = vec![0u32; normalized.len()];
        let mut previous: Option<(f64, u32)> = None;
        for (position, &idx) in order.iter().enumerate() {
            let value = normalized[idx];
            let rank = match previous {
                Some((prev_value, prev_rank)) if prev_value == value => prev_rank,
                _ => position as u32 + 1,
            };
            ranks[idx] = rank;
            previous = Some((value, rank));
        }

        ranks
    }

    /// 商品排名 (按本期销售)
    pub fn rank_products(&self, products: &[Product]) -> Vec<ProductMetrics> {
        let current: Vec<f64> = products.iter().map(|p| p.annual.current).collect();
        let ranks = self.competition_rank(&current);

        products
            .iter()
            .zip(ranks)
            .map(|(product, rank)| ProductMetrics {
                annual_change: pair_change(&product.annual),
                product: product.clone(),
                rank,
            })
            .collect()
    }

    // ==========================================
    // 分组汇总
    // ==========================================

    /// 按状态汇总 (按标签判定顺序输出)
    pub fn summarize_by_status(&self, stores: &[&StoreMetrics]) -> Vec<GroupSummary> {
        let mut summaries = self.group(
            GroupDimension::Status,
            stores.iter().map(|s| {
                (s.status.to_string(), s.previous_sales(), s.current_sales())
            }),
        );
        summaries.sort_by_key(|s| {
            StatusLabel::parse(&s.key)
                .and_then(|label| StatusLabel::ALL.iter().position(|l| *l == label))
                .unwrap_or(usize::MAX)
        });
        summaries
    }

    /// 按城市汇总 (本期销售降序; 无城市归入空字符串分组)
    pub fn summarize_by_city(&self, stores: &[&StoreMetrics]) -> Vec<GroupSummary> {
        let mut summaries = self.group(
            GroupDimension::City,
            stores.iter().map(|s| {
                (
                    s.city().unwrap_or_default().to_string(),
                    s.previous_sales(),
                    s.current_sales(),
                )
            }),
        );
        sort_by_current_desc(&mut summaries);
        summaries
    }

    /// 按商品分类汇总 (本期销售降序)
    pub fn summarize_by_category(&self, products: &[ProductMetrics]) -> Vec<GroupSummary> {
        let mut summaries = self.group(
            GroupDimension::Category,
            products.iter().map(|p| {
                (
                    p.product.category.clone().unwrap_or_default(),
                    p.product.annual.previous,
                    p.product.annual.current,
                )
            }),
        );
        sort_by_current_desc(&mut summaries);
        summaries
    }

    /// 通用分组: (key, previous, current) → 汇总行 (按首次出现顺序)
    fn group<I>(&self, dimension: GroupDimension, rows: I) -> Vec<GroupSummary>
    where
        I: Iterator<Item = (String, f64, f64)>,
    {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut summaries: Vec<GroupSummary> = Vec::new();

        for (key, previous, current) in rows {
            let slot = *index.entry(key.clone()).or_insert_with(|| {
                summaries.push(GroupSummary {
                    dimension,
                    key,
                    count: 0,
                    previous_total: 0.0,
                    current_total: 0.0,
                    change: 0.0,
                });
                summaries.len() - 1
            });

            let summary = &mut summaries[slot];
            summary.count += 1;
            summary.previous_total += previous;
            summary.current_total += current;
        }

        for summary in &mut summaries {
            summary.change = relative_change(summary.current_total, Some(summary.previous_total));
        }

        summaries
    }
}

impl Default for RankingEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn sort_by_current_desc(summaries: &mut [GroupSummary]) {
    summaries.sort_by(|a, b| b.current_total.total_cmp(&a.current_total));
}
