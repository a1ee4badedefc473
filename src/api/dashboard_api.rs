// ==========================================
// 门店销售分析系统 - 驾驶舱 API
// ==========================================
// 职责: 基于一次分析快照提供驾驶舱查询
// - 城市/状态筛选, KPI, 排行榜 (前N/后N)
// - 门店下钻, 商品下钻, 关店报告
// - 告警/复苏/潜力名单, 空状态文案
// 红线: 只读快照,不触发重算; 重算由 ReportCache/Orchestrator 负责
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::dataset::Dataset;
use crate::domain::product::ProductMetrics;
use crate::domain::report::{
    AlertRecord, ClosedStoreReport, DashboardKpis, GroupSummary, OpportunityRecord,
    OpportunitySummary, ProductPenetration, ProductStoreRow, StoreProductRow, TrendReport,
};
use crate::domain::store::{Store, StoreMetrics};
use crate::domain::types::StatusLabel;
use crate::engine::{
    AnalyticsReport, DrilldownEngine, PenetrationEngine, RankingEngine, TrendEngine,
};
use crate::i18n;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::debug;

// ==========================================
// 请求/响应 DTO
// ==========================================

/// 门店筛选条件 (均为可选,None 表示不过滤)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreFilter {
    pub city: Option<String>,
    pub status: Option<StatusLabel>,
}

impl StoreFilter {
    pub fn matches(&self, m: &StoreMetrics) -> bool {
        let city_ok = self
            .city
            .as_deref()
            .map_or(true, |city| m.city().unwrap_or_default() == city);
        let status_ok = self.status.map_or(true, |status| m.status == status);
        city_ok && status_ok
    }
}

/// 门店下钻
#[derive(Debug, Clone, Serialize)]
pub struct StoreDetail {
    pub metrics: StoreMetrics,
    pub status_display: String,
    pub products: Vec<StoreProductRow>,
    pub opportunity: Option<OpportunityRecord>,
}

/// 商品下钻
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    pub product_id: i64,
    pub product: Option<ProductMetrics>, // 商品目录中不存在时为 None (孤儿事实)
    pub penetration: Option<ProductPenetration>,
    pub stores: Vec<ProductStoreRow>,
}

/// 空状态区块
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptySection {
    Alerts,
    Recovery,
    Closed,
    Opportunities,
    Stores,
}

impl EmptySection {
    fn i18n_key(&self) -> &'static str {
        match self {
            EmptySection::Alerts => "empty.alerts",
            EmptySection::Recovery => "empty.recovery",
            EmptySection::Closed => "empty.closed",
            EmptySection::Opportunities => "empty.opportunities",
            EmptySection::Stores => "empty.stores",
        }
    }
}

// ==========================================
// DashboardApi - 驾驶舱 API
// ==========================================
pub struct DashboardApi {
    report: Arc<AnalyticsReport>,
    dataset: Arc<Dataset>,
}

impl DashboardApi {
    /// 创建驾驶舱 API
    ///
    /// # 参数
    /// - report: 分析快照
    /// - dataset: 生成该快照的数据集 (下钻需要事实表)
    ///
    /// # 返回
    /// - Err(ApiError::VersionMismatch): 快照与数据集版本不一致
    pub fn new(report: Arc<AnalyticsReport>, dataset: Arc<Dataset>) -> ApiResult<Self> {
        if report.dataset_version != dataset.version {
            return Err(ApiError::VersionMismatch {
                report: report.dataset_version.clone(),
                dataset: dataset.version.clone(),
            });
        }
        Ok(Self { report, dataset })
    }

    pub fn report(&self) -> &AnalyticsReport {
        &self.report
    }

    // ==========================================
    // 筛选
    // ==========================================

    /// 活跃门店筛选 (按排名升序)
    pub fn filter_stores(&self, filter: &StoreFilter) -> Vec<&StoreMetrics> {
        let mut stores: Vec<&StoreMetrics> = self
            .report
            .active_stores()
            .filter(|m| filter.matches(m))
            .collect();
        stores.sort_by_key(|m| m.rank.unwrap_or(u32::MAX));
        stores
    }

    /// 城市选项 (活跃门店中出现过的城市,升序)
    pub fn city_options(&self) -> Vec<String> {
        self.report
            .active_stores()
            .filter_map(|m| m.city())
            .map(|c| c.to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// 状态选项 (活跃门店中出现过的状态,按判定顺序)
    pub fn status_options(&self) -> Vec<StatusLabel> {
        let present: HashSet<StatusLabel> = self.report.active_stores().map(|m| m.status).collect();
        StatusLabel::ALL
            .iter()
            .copied()
            .filter(|s| present.contains(s))
            .collect()
    }

    // ==========================================
    // 汇总
    // ==========================================

    /// 筛选后的 KPI
    ///
    /// 关店数始终为全网口径,不受城市/状态筛选影响
    pub fn kpis(&self, filter: &StoreFilter) -> DashboardKpis {
        if *filter == StoreFilter::default() {
            return self.report.kpis.clone();
        }

        let active = self.filter_stores(filter);
        TrendEngine::new().kpis(&active, self.report.closed.closed_count)
    }

    /// 筛选后的状态汇总
    pub fn status_summary(&self, filter: &StoreFilter) -> Vec<GroupSummary> {
        if *filter == StoreFilter::default() {
            return self.report.status_summary.clone();
        }
        RankingEngine::new().summarize_by_status(&self.filter_stores(filter))
    }

    /// 筛选后的城市汇总
    pub fn city_summary(&self, filter: &StoreFilter) -> Vec<GroupSummary> {
        if *filter == StoreFilter::default() {
            return self.report.city_summary.clone();
        }
        RankingEngine::new().summarize_by_city(&self.filter_stores(filter))
    }

    pub fn category_summary(&self) -> &[GroupSummary] {
        &self.report.category_summary
    }

    pub fn trend(&self) -> &TrendReport {
        &self.report.trend
    }

    // ==========================================
    // 排行榜
    // ==========================================

    /// 前 N 名门店 (按排名)
    pub fn top_stores(&self, n: usize, filter: &StoreFilter) -> ApiResult<Vec<&StoreMetrics>> {
        validate_limit(n)?;
        let mut stores = self.filter_stores(filter);
        stores.truncate(n);
        Ok(stores)
    }

    /// 后 N 名门店 (有基期销售,全年变化率最低)
    pub fn bottom_stores(&self, n: usize, filter: &StoreFilter) -> ApiResult<Vec<&StoreMetrics>> {
        validate_limit(n)?;
        let mut stores: Vec<&StoreMetrics> = self
            .filter_stores(filter)
            .into_iter()
            .filter(|m| m.previous_sales() > 0.0)
            .collect();
        stores.sort_by(|a, b| a.annual_change.total_cmp(&b.annual_change));
        stores.truncate(n);
        Ok(stores)
    }

    /// 前 N 名商品 (按排名)
    pub fn top_products(&self, n: usize) -> ApiResult<Vec<&ProductMetrics>> {
        validate_limit(n)?;
        let mut products: Vec<&ProductMetrics> = self.report.products.iter().collect();
        products.sort_by_key(|p| p.rank);
        products.truncate(n);
        Ok(products)
    }

    // ==========================================
    // 下钻
    // ==========================================

    /// 门店下钻
    pub fn store_detail(&self, store_id: i64) -> ApiResult<StoreDetail> {
        let metrics = self
            .report
            .find_store(store_id)
            .ok_or_else(|| ApiError::NotFound(format!("门店(id={})不存在", store_id)))?;

        let drilldown = DrilldownEngine::new(self.dataset.capabilities);
        let products =
            drilldown.store_products(store_id, &self.dataset.sales, &self.dataset.product_index());

        let opportunity = self
            .report
            .opportunities
            .iter()
            .find(|o| o.store_id == store_id)
            .cloned();

        debug!(store_id, products = products.len(), "门店下钻");

        Ok(StoreDetail {
            status_display: i18n::status_display_name(metrics.status),
            metrics: metrics.clone(),
            products,
            opportunity,
        })
    }

    /// 商品下钻
    pub fn product_detail(&self, product_id: i64) -> ApiResult<ProductDetail> {
        let product = self.report.find_product(product_id).cloned();
        let in_facts = self.dataset.sales.iter().any(|f| f.product_id == product_id);
        if product.is_none() && !in_facts {
            return Err(ApiError::NotFound(format!(
                "商品(id={})不存在",
                product_id
            )));
        }

        let active: Vec<&Store> = self.report.active_stores().map(|m| &m.store).collect();
        let active_ids: HashSet<i64> = active.iter().map(|s| s.store_id).collect();

        let penetration = PenetrationEngine::new(self.report.settings.min_penetration)
            .product_penetration(product_id, &active, &self.dataset.sales);
        let stores = DrilldownEngine::new(self.dataset.capabilities).product_stores(
            product_id,
            &self.dataset.sales,
            &active_ids,
        );

        Ok(ProductDetail {
            product_id,
            product,
            penetration,
            stores,
        })
    }

    // ==========================================
    // 名单
    // ==========================================

    pub fn closed_report(&self) -> &ClosedStoreReport {
        &self.report.closed
    }

    pub fn alerts(&self) -> &[AlertRecord] {
        &self.report.alerts
    }

    pub fn recoveries(&self) -> &[AlertRecord] {
        &self.report.recoveries
    }

    /// 告警门店总数 (截断前)
    pub fn alert_count(&self) -> usize {
        self.report.alert_count
    }

    /// 复苏门店总数 (截断前)
    pub fn recovery_count(&self) -> usize {
        self.report.recovery_count
    }

    pub fn opportunity_summary(&self) -> &OpportunitySummary {
        &self.report.opportunity_summary
    }

    /// 潜力机会 (可选截断)
    pub fn opportunities(&self, limit: Option<usize>) -> &[OpportunityRecord] {
        let all = &self.report.opportunities;
        match limit {
            Some(n) => &all[..n.min(all.len())],
            None => all,
        }
    }

    /// 区块为空时的提示文案 (非空返回 None)
    pub fn empty_state_message(&self, section: EmptySection) -> Option<String> {
        let is_empty = match section {
            EmptySection::Alerts => self.report.alerts.is_empty(),
            EmptySection::Recovery => self.report.recoveries.is_empty(),
            EmptySection::Closed => self.report.closed.rows.is_empty(),
            EmptySection::Opportunities => self.report.opportunities.is_empty(),
            EmptySection::Stores => self.report.active_stores().next().is_none(),
        };
        is_empty.then(|| i18n::t(section.i18n_key()))
    }
}

fn validate_limit(n: usize) -> ApiResult<()> {
    if n == 0 {
        return Err(ApiError::InvalidInput("条数必须大于 0".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisSettings;
    use crate::domain::product::{Product, SalesFact};
    use crate::domain::store::{PeriodCapabilities, PeriodPair};
    use crate::engine::AnalyticsOrchestrator;

    fn store(id: i64, city: &str, annual: (f64, f64)) -> Store {
        let mut s = Store::new(id, format!("S{id}"), PeriodPair::new(annual.0, annual.1));
        s.city = Some(city.to_string());
        s
    }

    fn api() -> DashboardApi {
        let dataset = Dataset::new(
            "v1",
            PeriodCapabilities::annual_only(),
            vec![
                store(1, "Haifa", (100.0, 150.0)),
                store(2, "Haifa", (100.0, 80.0)),
                store(3, "Eilat", (100.0, 100.0)),
                store(4, "Eilat", (100.0, 0.0)),
            ],
            vec![Product::new(10, "P10", PeriodPair::new(10.0, 20.0))],
            vec![
                SalesFact::new(1, 10, PeriodPair::new(5.0, 10.0)),
                SalesFact::new(2, 10, PeriodPair::new(5.0, 10.0)),
                SalesFact::new(1, 77, PeriodPair::new(1.0, 2.0)),
            ],
        );
        let report = AnalyticsOrchestrator::new(AnalysisSettings::default()).run(&dataset);
        DashboardApi::new(Arc::new(report), Arc::new(dataset)).unwrap()
    }

    #[test]
    fn test_version_mismatch() {
        let a = api();
        let other = Dataset::new("v2", PeriodCapabilities::annual_only(), vec![], vec![], vec![]);
        let result = DashboardApi::new(Arc::new(a.report().clone()), Arc::new(other));
        assert!(matches!(result, Err(ApiError::VersionMismatch { .. })));
    }

    #[test]
    fn test_filter_and_options() {
        let api = api();
        assert_eq!(api.city_options(), vec!["Eilat".to_string(), "Haifa".to_string()]);

        let haifa = api.filter_stores(&StoreFilter {
            city: Some("Haifa".to_string()),
            status: None,
        });
        assert_eq!(haifa.iter().map(|m| m.store_id()).collect::<Vec<_>>(), vec![1, 2]);

        // 门店4 已关店,不出现在筛选结果中
        let eilat = api.filter_stores(&StoreFilter {
            city: Some("Eilat".to_string()),
            status: None,
        });
        assert_eq!(eilat.len(), 1);

        let kpis = api.kpis(&StoreFilter {
            city: Some("Eilat".to_string()),
            status: None,
        });
        assert_eq!(kpis.active_count, 1);
        assert_eq!(kpis.closed_count, 1);
    }

    #[test]
    fn test_top_and_bottom() {
        let api = api();
        let filter = StoreFilter::default();

        let top = api.top_stores(1, &filter).unwrap();
        assert_eq!(top[0].store_id(), 1);

        let bottom = api.bottom_stores(1, &filter).unwrap();
        assert_eq!(bottom[0].store_id(), 2);

        assert!(matches!(api.top_stores(0, &filter), Err(ApiError::InvalidInput(_))));
    }

    #[test]
    fn test_store_detail() {
        let api = api();
        let detail = api.store_detail(1).unwrap();

        assert_eq!(detail.products.len(), 2);
        assert!(!detail.status_display.is_empty());
        assert!(matches!(api.store_detail(999), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_product_detail_orphan_and_missing() {
        let api = api();

        let orphan = api.product_detail(77).unwrap();
        assert!(orphan.product.is_none());
        assert_eq!(orphan.stores.len(), 1);

        let p10 = api.product_detail(10).unwrap();
        // 3 家活跃门店中 2 家在售
        assert_eq!(p10.penetration.as_ref().map(|p| p.stores_carrying), Some(2));

        assert!(matches!(api.product_detail(404), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_empty_states() {
        let api = api();
        // 不含双月数据 → 告警名单为空
        assert!(api.empty_state_message(EmptySection::Alerts).is_some());
        assert!(api.empty_state_message(EmptySection::Closed).is_none());
        assert_eq!(api.opportunities(Some(100)).len(), api.report().opportunities.len());
    }
}
