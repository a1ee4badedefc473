// ==========================================
// 门店销售分析系统 - 门店领域模型
// ==========================================
// 职责: 门店实体 + 周期数据对 + 数据集能力描述
// 红线: 派生字段不落在输入实体上,每次全量重算
// ==========================================

use crate::domain::types::{PeriodKind, StatusLabel};
use serde::{Deserialize, Serialize};

// ==========================================
// PeriodPair - 周期数据对 (上期, 本期)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PeriodPair {
    pub previous: f64, // 基期
    pub current: f64,  // 本期
}

impl PeriodPair {
    pub fn new(previous: f64, current: f64) -> Self {
        Self { previous, current }
    }
}

// ==========================================
// PeriodCapabilities - 数据集周期能力描述
// ==========================================
// 全年数据对必有; 其余周期视数据集版本而定
// 引擎根据此描述裁剪规则,不在调用点探测列是否存在
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PeriodCapabilities {
    pub half_year: bool,   // 6v6 (H1/H2)
    pub quarter_yoy: bool, // 3v3 同比
    pub quarter_seq: bool, // Q2/Q3 环比
    pub bimonthly: bool,   // 2v2
}

impl PeriodCapabilities {
    /// 仅全年数据
    pub fn annual_only() -> Self {
        Self::default()
    }

    /// 全部周期齐备
    pub fn full() -> Self {
        Self {
            half_year: true,
            quarter_yoy: true,
            quarter_seq: true,
            bimonthly: true,
        }
    }

    pub fn has(&self, kind: PeriodKind) -> bool {
        match kind {
            PeriodKind::Annual => true,
            PeriodKind::HalfYear => self.half_year,
            PeriodKind::QuarterYoy => self.quarter_yoy,
            PeriodKind::QuarterSeq => self.quarter_seq,
            PeriodKind::Bimonthly => self.bimonthly,
        }
    }

    /// 状态判定使用的次级周期: 优先半年,其次双月
    pub fn secondary_period(&self) -> Option<PeriodKind> {
        if self.half_year {
            Some(PeriodKind::HalfYear)
        } else if self.bimonthly {
            Some(PeriodKind::Bimonthly)
        } else {
            None
        }
    }

    /// 复苏规则的第三周期 (季度同比),仅在数据集提供时生效
    pub fn tertiary_period(&self) -> Option<PeriodKind> {
        if self.quarter_yoy {
            Some(PeriodKind::QuarterYoy)
        } else {
            None
        }
    }
}

// ==========================================
// Store - 门店 (输入实体)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub store_id: i64,        // 门店ID (唯一)
    pub name: String,         // 门店名称
    pub city: Option<String>, // 城市

    // ===== 周期销售 =====
    pub annual: PeriodPair,              // 全年 (必有)
    pub half_year: Option<PeriodPair>,   // 半年
    pub quarter_yoy: Option<PeriodPair>, // 季度同比
    pub quarter_seq: Option<PeriodPair>, // 季度环比
    pub bimonthly: Option<PeriodPair>,   // 双月
}

impl Store {
    pub fn new(store_id: i64, name: impl Into<String>, annual: PeriodPair) -> Self {
        Self {
            store_id,
            name: name.into(),
            city: None,
            annual,
            half_year: None,
            quarter_yoy: None,
            quarter_seq: None,
            bimonthly: None,
        }
    }

    /// 按周期类型取数据对
    pub fn period(&self, kind: PeriodKind) -> Option<&PeriodPair> {
        match kind {
            PeriodKind::Annual => Some(&self.annual),
            PeriodKind::HalfYear => self.half_year.as_ref(),
            PeriodKind::QuarterYoy => self.quarter_yoy.as_ref(),
            PeriodKind::QuarterSeq => self.quarter_seq.as_ref(),
            PeriodKind::Bimonthly => self.bimonthly.as_ref(),
        }
    }

    /// 基期销售 (上年)
    pub fn baseline(&self) -> f64 {
        self.annual.previous
    }

    /// 本期销售 (本年)
    pub fn current_sales(&self) -> f64 {
        self.annual.current
    }
}

// ==========================================
// StoreMetrics - 门店派生指标 (输出行)
// ==========================================
// 用途: 增强后的门店表,供展示层与导出使用
// 变化率字段: 数据集不含该周期时为 None
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreMetrics {
    pub store: Store,

    // ===== 变化率 =====
    pub annual_change: f64,
    pub half_year_change: Option<f64>,
    pub quarter_yoy_change: Option<f64>,
    pub quarter_seq_change: Option<f64>,
    pub bimonthly_change: Option<f64>,

    // ===== 分类与排名 =====
    pub status: StatusLabel,
    pub status_reason: String, // 可解释性 (JSON)
    pub is_active: bool,
    pub rank: Option<u32>, // 仅活跃门店参与排名
}

impl StoreMetrics {
    pub fn store_id(&self) -> i64 {
        self.store.store_id
    }

    pub fn name(&self) -> &str {
        &self.store.name
    }

    pub fn city(&self) -> Option<&str> {
        self.store.city.as_deref()
    }

    pub fn previous_sales(&self) -> f64 {
        self.store.annual.previous
    }

    pub fn current_sales(&self) -> f64 {
        self.store.annual.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secondary_period_priority() {
        assert_eq!(
            PeriodCapabilities::full().secondary_period(),
            Some(PeriodKind::HalfYear)
        );

        let bimonthly_only = PeriodCapabilities {
            bimonthly: true,
            ..PeriodCapabilities::default()
        };
        assert_eq!(bimonthly_only.secondary_period(), Some(PeriodKind::Bimonthly));
        assert_eq!(PeriodCapabilities::annual_only().secondary_period(), None);
    }

    #[test]
    fn test_store_period_lookup() {
        let mut store = Store::new(1, "S1", PeriodPair::new(100.0, 120.0));
        store.bimonthly = Some(PeriodPair::new(20.0, 15.0));

        assert_eq!(store.period(PeriodKind::Annual).map(|p| p.current), Some(120.0));
        assert_eq!(store.period(PeriodKind::Bimonthly).map(|p| p.current), Some(15.0));
        assert!(store.period(PeriodKind::HalfYear).is_none());
        assert_eq!(store.baseline(), 100.0);
    }
}
