// ==========================================
// 门店销售分析系统 - 领域类型定义
// ==========================================
// 状态标签: 六类互斥,每次计算无状态重新判定
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 门店状态标签 (Status Label)
// ==========================================
// 红线: 判定顺序即优先级,先命中者胜出
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusLabel {
    New,      // 新店(无基期销售)
    Danger,   // 危险
    Growth,   // 增长
    Stable,   // 稳定
    Recovery, // 复苏
    Erosion,  // 侵蚀(兜底)
}

impl StatusLabel {
    /// 全部标签,按判定顺序排列
    pub const ALL: [StatusLabel; 6] = [
        StatusLabel::New,
        StatusLabel::Danger,
        StatusLabel::Growth,
        StatusLabel::Stable,
        StatusLabel::Recovery,
        StatusLabel::Erosion,
    ];

    /// 是否处于下滑状态 (复苏名单的候选范围)
    pub fn is_declining(&self) -> bool {
        matches!(self, StatusLabel::Erosion | StatusLabel::Danger)
    }

    /// 从字符串解析状态
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "NEW" => Some(StatusLabel::New),
            "DANGER" => Some(StatusLabel::Danger),
            "GROWTH" => Some(StatusLabel::Growth),
            "STABLE" => Some(StatusLabel::Stable),
            "RECOVERY" => Some(StatusLabel::Recovery),
            "EROSION" => Some(StatusLabel::Erosion),
            _ => None,
        }
    }

    /// 国际化键 (locales/*.yml)
    pub fn i18n_key(&self) -> &'static str {
        match self {
            StatusLabel::New => "status.new",
            StatusLabel::Danger => "status.danger",
            StatusLabel::Growth => "status.growth",
            StatusLabel::Stable => "status.stable",
            StatusLabel::Recovery => "status.recovery",
            StatusLabel::Erosion => "status.erosion",
        }
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusLabel::New => write!(f, "NEW"),
            StatusLabel::Danger => write!(f, "DANGER"),
            StatusLabel::Growth => write!(f, "GROWTH"),
            StatusLabel::Stable => write!(f, "STABLE"),
            StatusLabel::Recovery => write!(f, "RECOVERY"),
            StatusLabel::Erosion => write!(f, "EROSION"),
        }
    }
}

// ==========================================
// 汇总维度 (Group Dimension)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupDimension {
    Status,   // 按状态
    City,     // 按城市
    Category, // 按商品分类
}

impl fmt::Display for GroupDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupDimension::Status => write!(f, "STATUS"),
            GroupDimension::City => write!(f, "CITY"),
            GroupDimension::Category => write!(f, "CATEGORY"),
        }
    }
}

// ==========================================
// 周期类型 (Period Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodKind {
    Annual,     // 全年 (上年 vs 本年)
    HalfYear,   // 半年 (H1 vs H2)
    QuarterYoy, // 季度同比 (3v3)
    QuarterSeq, // 季度环比 (Q2 vs Q3)
    Bimonthly,  // 双月 (上期 vs 最近一期)
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodKind::Annual => write!(f, "ANNUAL"),
            PeriodKind::HalfYear => write!(f, "HALF_YEAR"),
            PeriodKind::QuarterYoy => write!(f, "QUARTER_YOY"),
            PeriodKind::QuarterSeq => write!(f, "QUARTER_SEQ"),
            PeriodKind::Bimonthly => write!(f, "BIMONTHLY"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_roundtrip() {
        for label in StatusLabel::ALL {
            assert_eq!(StatusLabel::parse(&label.to_string()), Some(label));
        }
        assert_eq!(StatusLabel::parse("unknown"), None);
    }

    #[test]
    fn test_is_declining() {
        assert!(StatusLabel::Erosion.is_declining());
        assert!(StatusLabel::Danger.is_declining());
        assert!(!StatusLabel::Growth.is_declining());
        assert!(!StatusLabel::Recovery.is_declining());
    }
}
