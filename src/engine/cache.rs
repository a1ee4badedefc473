// ==========================================
// 门店销售分析系统 - 分析结果缓存
// ==========================================
// 缓存键: (数据集版本, 阈值指纹, 渗透率下限, 展示条数)
// 红线: 键的任一部分变化 → 未命中,重新计算
// 容量: 条目数有上限,超出时淘汰最早写入的快照
// ==========================================

use crate::config::AnalysisSettings;
use crate::domain::dataset::Dataset;
use crate::engine::orchestrator::{AnalyticsOrchestrator, AnalyticsReport};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    dataset_version: String,
    thresholds: [u64; 8],
    min_penetration: u64,
    display_limit: usize,
}

impl CacheKey {
    fn new(dataset: &Dataset, settings: &AnalysisSettings) -> Self {
        Self {
            dataset_version: dataset.version.clone(),
            thresholds: settings.thresholds.fingerprint(),
            min_penetration: settings.min_penetration.to_bits(),
            display_limit: settings.display_limit,
        }
    }
}

/// 默认容量 (快照数)
pub const DEFAULT_CACHE_CAPACITY: usize = 8;

pub struct ReportCache {
    entries: HashMap<CacheKey, Arc<AnalyticsReport>>,
    order: VecDeque<CacheKey>, // 写入顺序,队首最早
    capacity: usize,
}

impl Default for ReportCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl ReportCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定容量 (至少 1)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 命中则返回缓存快照,否则执行一次分析并写入
    pub fn get_or_run(
        &mut self,
        dataset: &Dataset,
        settings: &AnalysisSettings,
    ) -> Arc<AnalyticsReport> {
        let key = CacheKey::new(dataset, settings);
        if let Some(report) = self.entries.get(&key) {
            debug!(version = %dataset.version, "分析缓存命中");
            return Arc::clone(report);
        }

        debug!(version = %dataset.version, "分析缓存未命中");
        let report = Arc::new(AnalyticsOrchestrator::new(*settings).run(dataset));

        while self.entries.len() >= self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            debug!(version = %oldest.dataset_version, "分析缓存淘汰");
        }

        self.order.push_back(key.clone());
        self.entries.insert(key, Arc::clone(&report));
        report
    }

    /// 移除某个数据集版本的全部缓存
    pub fn invalidate_dataset(&mut self, dataset_version: &str) {
        self.entries
            .retain(|key, _| key.dataset_version != dataset_version);
        self.order
            .retain(|key| key.dataset_version != dataset_version);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
