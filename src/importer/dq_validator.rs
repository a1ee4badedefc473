// ==========================================
// 门店销售分析系统 - 数据质量校验器实现
// ==========================================
// 职责: 计算前拦截畸形输入 + DQ 报告生成
// 级别:
// - Error: 主键重复 / 无法解析 / 非有限数值 (inf) → 阻断计算
// - Warning: 负销售额 / 全年数据缺失 / 事实行引用未知门店 / 重复事实行
// - Info: 事实行引用未知商品 (孤儿事实,不参与商品关联)
// ==========================================

use crate::domain::product::{Product, SalesFact};
use crate::domain::quality::{DqLevel, DqTable, DqViolation};
use crate::domain::store::{PeriodPair, Store};
use crate::importer::error::ImportError;
use std::collections::HashSet;

pub struct DqValidator;

impl DqValidator {
    pub fn new() -> Self {
        Self
    }

    /// 映射失败转为 DQ 错误
    pub fn conversion_violation(&self, table: DqTable, err: &ImportError) -> DqViolation {
        let (row_number, field) = match err {
            ImportError::TypeConversionError { row, field, .. } => (*row, field.clone()),
            _ => (0, String::new()),
        };
        DqViolation {
            table,
            row_number,
            level: DqLevel::Error,
            field,
            message: err.to_string(),
        }
    }

    /// 门店表: 主键唯一 + 数值合理
    pub fn validate_stores(&self, stores: &[(usize, Store)]) -> Vec<DqViolation> {
        let mut violations = Vec::new();
        let mut seen_ids = HashSet::new();

        for (row_number, store) in stores {
            if !seen_ids.insert(store.store_id) {
                violations.push(violation(
                    DqTable::Stores,
                    *row_number,
                    DqLevel::Error,
                    "store_id",
                    format!("重复门店ID: {}", store.store_id),
                ));
            }

            if store.annual.previous.is_nan() || store.annual.current.is_nan() {
                violations.push(violation(
                    DqTable::Stores,
                    *row_number,
                    DqLevel::Warning,
                    "annual",
                    "全年销售缺失,按无基期处理".to_string(),
                ));
            }

            let pairs = [
                Some(&store.annual),
                store.half_year.as_ref(),
                store.quarter_yoy.as_ref(),
                store.quarter_seq.as_ref(),
                store.bimonthly.as_ref(),
            ];
            if pairs.iter().flatten().any(|p| has_infinite(p)) {
                violations.push(violation(
                    DqTable::Stores,
                    *row_number,
                    DqLevel::Error,
                    "sales",
                    format!("门店 {} 存在非有限销售额", store.store_id),
                ));
            }
            if pairs.into_iter().flatten().any(has_negative) {
                violations.push(violation(
                    DqTable::Stores,
                    *row_number,
                    DqLevel::Warning,
                    "sales",
                    format!("门店 {} 存在负销售额", store.store_id),
                ));
            }
        }

        violations
    }

    /// 商品表: 主键唯一
    pub fn validate_products(&self, products: &[(usize, Product)]) -> Vec<DqViolation> {
        let mut violations = Vec::new();
        let mut seen_ids = HashSet::new();

        for (row_number, product) in products {
            if !seen_ids.insert(product.product_id) {
                violations.push(violation(
                    DqTable::Products,
                    *row_number,
                    DqLevel::Error,
                    "product_id",
                    format!("重复商品ID: {}", product.product_id),
                ));
            }
        }

        violations
    }

    /// 销售事实表: 引用完整性
    pub fn validate_facts(
        &self,
        facts: &[(usize, SalesFact)],
        store_ids: &HashSet<i64>,
        product_ids: &HashSet<i64>,
    ) -> Vec<DqViolation> {
        let mut violations = Vec::new();
        let mut seen_pairs = HashSet::new();

        for (row_number, fact) in facts {
            if !store_ids.contains(&fact.store_id) {
                violations.push(violation(
                    DqTable::Sales,
                    *row_number,
                    DqLevel::Warning,
                    "store_id",
                    format!("未知门店ID: {}", fact.store_id),
                ));
            }

            if !product_ids.contains(&fact.product_id) {
                violations.push(violation(
                    DqTable::Sales,
                    *row_number,
                    DqLevel::Info,
                    "product_id",
                    format!("商品目录中不存在商品ID: {}", fact.product_id),
                ));
            }

            if !seen_pairs.insert((fact.store_id, fact.product_id)) {
                violations.push(violation(
                    DqTable::Sales,
                    *row_number,
                    DqLevel::Warning,
                    "store_id,product_id",
                    format!("重复事实行: 门店 {} 商品 {}", fact.store_id, fact.product_id),
                ));
            }

            let pairs = [
                Some(&fact.annual),
                fact.half_year.as_ref(),
                fact.quarter_yoy.as_ref(),
                fact.bimonthly.as_ref(),
            ];
            if pairs.into_iter().flatten().any(has_infinite) {
                violations.push(violation(
                    DqTable::Sales,
                    *row_number,
                    DqLevel::Error,
                    "sales",
                    "非有限销售额".to_string(),
                ));
            }

            if has_negative(&fact.annual) {
                violations.push(violation(
                    DqTable::Sales,
                    *row_number,
                    DqLevel::Warning,
                    "annual",
                    "负销售额".to_string(),
                ));
            }
        }

        violations
    }
}

impl Default for DqValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn has_infinite(pair: &PeriodPair) -> bool {
    pair.previous.is_infinite() || pair.current.is_infinite()
}

fn has_negative(pair: &PeriodPair) -> bool {
    pair.previous < 0.0 || pair.current < 0.0
}

fn violation(
    table: DqTable,
    row_number: usize,
    level: DqLevel,
    field: &str,
    message: String,
) -> DqViolation {
    DqViolation {
        table,
        row_number,
        level,
        field: field.to_string(),
        message,
    }
}
