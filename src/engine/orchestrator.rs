// ==========================================
// 门店销售分析系统 - 引擎编排器
// ==========================================
// 用途: 协调各引擎的执行顺序,产出一次完整的分析快照
// 流程: 变化率 → 状态判定 → 活跃划分 → 排名/汇总
//       → 渗透率潜力 → 告警/复苏 → 趋势/KPI/关店报告
// 红线: 全量重算,不做增量更新; 输入数据集只读
// ==========================================

use crate::config::AnalysisSettings;
use crate::domain::dataset::Dataset;
use crate::domain::product::ProductMetrics;
use crate::domain::report::{
    AlertRecord, ClosedStoreReport, DashboardKpis, GroupSummary, OpportunityRecord,
    OpportunitySummary, TrendReport,
};
use crate::domain::store::{PeriodCapabilities, Store, StoreMetrics};
use crate::domain::types::PeriodKind;
use crate::engine::{
    change::{optional_pair_change, pair_change},
    ActivityPartitioner, AlertSelector, PenetrationEngine, RankingEngine, StatusClassifier,
    TrendEngine,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument};
use uuid::Uuid;

// ==========================================
// AnalyticsReport - 分析快照
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub report_id: String,
    pub generated_at: DateTime<Utc>,
    pub dataset_version: String,
    pub capabilities: PeriodCapabilities,
    pub settings: AnalysisSettings,

    // 门店 (全部,含关店) 与商品
    pub stores: Vec<StoreMetrics>,
    pub products: Vec<ProductMetrics>,

    // 汇总 (状态/城市基于活跃门店,分类基于商品表)
    pub status_summary: Vec<GroupSummary>,
    pub city_summary: Vec<GroupSummary>,
    pub category_summary: Vec<GroupSummary>,

    pub opportunities: Vec<OpportunityRecord>,
    pub opportunity_summary: OpportunitySummary,

    // 名单按展示条数截断; 计数为截断前的总数
    pub alerts: Vec<AlertRecord>,
    pub alert_count: usize,
    pub recoveries: Vec<AlertRecord>,
    pub recovery_count: usize,

    pub trend: TrendReport,
    pub closed: ClosedStoreReport,
    pub kpis: DashboardKpis,
}

impl AnalyticsReport {
    /// 活跃门店 (保持输入顺序)
    pub fn active_stores(&self) -> impl Iterator<Item = &StoreMetrics> {
        self.stores.iter().filter(|m| m.is_active)
    }

    pub fn find_store(&self, store_id: i64) -> Option<&StoreMetrics> {
        self.stores.iter().find(|m| m.store_id() == store_id)
    }

    pub fn find_product(&self, product_id: i64) -> Option<&ProductMetrics> {
        self.products
            .iter()
            .find(|p| p.product.product_id == product_id)
    }
}

// ==========================================
// AnalyticsOrchestrator - 引擎编排器
// ==========================================
pub struct AnalyticsOrchestrator {
    settings: AnalysisSettings,
    ranking: RankingEngine,
    penetration: PenetrationEngine,
    trend: TrendEngine,
}

impl AnalyticsOrchestrator {
    /// 创建编排器
    ///
    /// # 参数
    /// - settings: 已校验的分析参数
    pub fn new(settings: AnalysisSettings) -> Self {
        Self {
            ranking: RankingEngine::new(),
            penetration: PenetrationEngine::new(settings.min_penetration),
            trend: TrendEngine::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// 执行一次完整分析
    #[instrument(skip(self, dataset), fields(version = %dataset.version))]
    pub fn run(&self, dataset: &Dataset) -> AnalyticsReport {
        let caps = dataset.capabilities;
        info!(
            stores = dataset.stores.len(),
            products = dataset.products.len(),
            facts = dataset.sales.len(),
            "开始分析"
        );

        // ==========================================
        // 步骤1: 变化率 + 状态判定 + 活跃划分
        // ==========================================
        let classifier = StatusClassifier::new(self.settings.thresholds, caps);
        let partitioner = ActivityPartitioner::new(caps);

        let mut stores: Vec<StoreMetrics> = dataset
            .stores
            .iter()
            .map(|store| derive_metrics(store, caps, &classifier, &partitioner))
            .collect();

        // ==========================================
        // 步骤2: 排名 (仅活跃门店)
        // ==========================================
        let active_idx: Vec<usize> = stores
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_active)
            .map(|(i, _)| i)
            .collect();
        let current: Vec<f64> = active_idx
            .iter()
            .map(|&i| stores[i].current_sales())
            .collect();
        for (&i, rank) in active_idx
            .iter()
            .zip(self.ranking.competition_rank(&current))
        {
            stores[i].rank = Some(rank);
        }

        let (active, closed) = partitioner.partition(&stores);
        debug!(active = active.len(), closed = closed.len(), "活跃划分完成");

        // ==========================================
        // 步骤3: 汇总
        // ==========================================
        let products = self.ranking.rank_products(&dataset.products);
        let status_summary = self.ranking.summarize_by_status(&active);
        let city_summary = self.ranking.summarize_by_city(&active);
        let category_summary = self.ranking.summarize_by_category(&products);

        // ==========================================
        // 步骤4: 渗透率潜力
        // ==========================================
        let active_stores: Vec<&Store> = active.iter().map(|m| &m.store).collect();
        let opportunities = self.penetration.opportunities(&active_stores, &dataset.sales);
        let opportunity_summary = PenetrationEngine::summarize(&opportunities);

        // ==========================================
        // 步骤5: 告警/复苏
        // ==========================================
        let selector = AlertSelector::new(self.settings.thresholds, caps);
        let mut alerts = selector.all_alerts(&active);
        let mut recoveries = selector.all_recoveries(&active);
        let alert_count = alerts.len();
        let recovery_count = recoveries.len();
        alerts.truncate(self.settings.display_limit);
        recoveries.truncate(self.settings.display_limit);

        // ==========================================
        // 步骤6: 趋势/KPI/关店报告
        // ==========================================
        let trend = self.trend.period_totals(&active, caps);
        let kpis = self.trend.kpis(&active, closed.len());
        let closed_report = partitioner.closed_report(&closed, stores.len());

        info!(
            active = active.len(),
            closed = closed.len(),
            opportunities = opportunities.len(),
            alerts = alert_count,
            recoveries = recovery_count,
            "分析完成"
        );

        AnalyticsReport {
            report_id: Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            dataset_version: dataset.version.clone(),
            capabilities: caps,
            settings: self.settings,
            status_summary,
            city_summary,
            category_summary,
            opportunities,
            opportunity_summary,
            alerts,
            alert_count,
            recoveries,
            recovery_count,
            trend,
            closed: closed_report,
            kpis,
            products,
            stores,
        }
    }
}

/// 单个门店的派生指标
fn derive_metrics(
    store: &Store,
    caps: PeriodCapabilities,
    classifier: &StatusClassifier,
    partitioner: &ActivityPartitioner,
) -> StoreMetrics {
    let change = |kind: PeriodKind| optional_pair_change(caps.has(kind), store.period(kind));
    let (status, status_reason) = classifier.classify_with_reason(store);

    StoreMetrics {
        annual_change: pair_change(&store.annual),
        half_year_change: change(PeriodKind::HalfYear),
        quarter_yoy_change: change(PeriodKind::QuarterYoy),
        quarter_seq_change: change(PeriodKind::QuarterSeq),
        bimonthly_change: change(PeriodKind::Bimonthly),
        status,
        status_reason,
        is_active: partitioner.is_active(store),
        rank: None,
        store: store.clone(),
    }
}
