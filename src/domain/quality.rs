// ==========================================
// 门店销售分析系统 - 数据质量模型
// ==========================================
// 职责: 导入阶段的校验结果 (计算前拦截畸形输入)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// DqTable - 违规所属的输入表
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DqTable {
    Stores,
    Products,
    Sales,
}

impl fmt::Display for DqTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DqTable::Stores => write!(f, "STORES"),
            DqTable::Products => write!(f, "PRODUCTS"),
            DqTable::Sales => write!(f, "SALES"),
        }
    }
}

// ==========================================
// DqLevel - 数据质量级别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DqLevel {
    Error,   // 错误（阻断计算）
    Warning, // 警告（允许计算）
    Info,    // 提示（仅记录）
}

// ==========================================
// DqViolation - 数据质量违规记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DqViolation {
    pub table: DqTable,
    pub row_number: usize, // 数据行号 (表头为第 1 行)
    pub level: DqLevel,
    pub field: String,
    pub message: String,
}

// ==========================================
// DqReport - 数据质量报告
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DqReport {
    pub violations: Vec<DqViolation>,
}

impl DqReport {
    pub fn extend(&mut self, violations: Vec<DqViolation>) {
        self.violations.extend(violations);
    }

    pub fn error_count(&self) -> usize {
        self.count(DqLevel::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(DqLevel::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    fn count(&self, level: DqLevel) -> usize {
        self.violations.iter().filter(|v| v.level == level).count()
    }

    /// 错误摘要 (用于错误消息,最多列出前 5 条)
    pub fn error_summary(&self) -> String {
        let errors: Vec<String> = self
            .violations
            .iter()
            .filter(|v| v.level == DqLevel::Error)
            .take(5)
            .map(|v| format!("[{} 行 {}] {}: {}", v.table, v.row_number, v.field, v.message))
            .collect();
        errors.join("; ")
    }
}
