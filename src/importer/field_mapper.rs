// ==========================================
// 门店销售分析系统 - 字段映射器实现
// ==========================================
// 职责: 源列名 (希伯来语原表头 / 英文别名) → 领域字段 + 类型转换
// 规则: 空单元格 = 缺值; 周期数据对两侧都缺 → None, 单侧缺 → NaN
// ==========================================

use crate::domain::product::{Product, SalesFact};
use crate::domain::quality::DqTable;
use crate::domain::store::{PeriodCapabilities, PeriodPair, Store};
use crate::domain::types::PeriodKind;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{RawRow, RawTable};

// ==========================================
// 列名别名表
// ==========================================
pub mod columns {
    // 门店表
    pub const STORE_ID: &[&str] = &["מזהה", "store_id", "id"];
    pub const STORE_NAME: &[&str] = &["שם חנות", "store_name", "name"];
    pub const CITY: &[&str] = &["עיר", "city"];

    // 商品表
    pub const PRODUCT_ID: &[&str] = &["מזהה", "product_id", "id"];
    pub const PRODUCT_NAME: &[&str] = &["מוצר", "product_name", "name"];
    pub const CATEGORY: &[&str] = &["סיווג", "category"];

    // 销售事实表
    pub const FACT_STORE_ID: &[&str] = &["מזהה_חנות", "store_id"];
    pub const FACT_PRODUCT_ID: &[&str] = &["מזהה_מוצר", "product_id"];
    pub const FACT_STORE_NAME: &[&str] = &["שם_חנות", "שם חנות", "store_name"];
    pub const FACT_PRODUCT_NAME: &[&str] = &["מוצר", "product_name"];

    // 周期数据对 (上期, 本期)
    pub const ANNUAL: (&[&str], &[&str]) = (
        &["שנה1", "annual_previous", "year1"],
        &["שנה2", "annual_current", "year2"],
    );
    pub const HALF_YEAR: (&[&str], &[&str]) = (
        &["6v6_H1", "half_year_previous", "h1"],
        &["6v6_H2", "half_year_current", "h2"],
    );
    pub const QUARTER_YOY: (&[&str], &[&str]) = (
        &["3v3_שנה1", "quarter_yoy_previous"],
        &["3v3_שנה2", "quarter_yoy_current"],
    );
    pub const QUARTER_SEQ: (&[&str], &[&str]) = (
        &["3v3_Q2", "quarter_seq_previous", "q2"],
        &["3v3_Q3", "quarter_seq_current", "q3"],
    );
    pub const BIMONTHLY: (&[&str], &[&str]) = (
        &["2v2_קודם", "bimonthly_previous"],
        &["2v2_אחרון", "bimonthly_current"],
    );
}

/// 周期对应的列别名
pub fn period_columns(kind: PeriodKind) -> (&'static [&'static str], &'static [&'static str]) {
    match kind {
        PeriodKind::Annual => columns::ANNUAL,
        PeriodKind::HalfYear => columns::HALF_YEAR,
        PeriodKind::QuarterYoy => columns::QUARTER_YOY,
        PeriodKind::QuarterSeq => columns::QUARTER_SEQ,
        PeriodKind::Bimonthly => columns::BIMONTHLY,
    }
}

pub struct FieldMapper;

impl FieldMapper {
    // ==========================================
    // 表级检查
    // ==========================================

    /// 从门店表表头识别周期能力 (数据对两列都存在才算具备)
    pub fn detect_capabilities(&self, headers: &[String]) -> PeriodCapabilities {
        let has_pair = |kind: PeriodKind| {
            let (previous, current) = period_columns(kind);
            has_column(headers, previous) && has_column(headers, current)
        };

        PeriodCapabilities {
            half_year: has_pair(PeriodKind::HalfYear),
            quarter_yoy: has_pair(PeriodKind::QuarterYoy),
            quarter_seq: has_pair(PeriodKind::QuarterSeq),
            bimonthly: has_pair(PeriodKind::Bimonthly),
        }
    }

    /// 必填列检查
    pub fn check_required_columns(&self, table: DqTable, raw: &RawTable) -> ImportResult<()> {
        let required: &[&[&str]] = match table {
            DqTable::Stores => &[
                columns::STORE_ID,
                columns::STORE_NAME,
                columns::ANNUAL.0,
                columns::ANNUAL.1,
            ],
            DqTable::Products => &[
                columns::PRODUCT_ID,
                columns::PRODUCT_NAME,
                columns::ANNUAL.0,
                columns::ANNUAL.1,
            ],
            DqTable::Sales => &[
                columns::FACT_STORE_ID,
                columns::FACT_PRODUCT_ID,
                columns::ANNUAL.0,
                columns::ANNUAL.1,
            ],
        };

        for aliases in required {
            if !has_column(&raw.headers, aliases) {
                return Err(ImportError::MissingColumn {
                    table: table.to_string(),
                    column: aliases.join(" / "),
                });
            }
        }
        Ok(())
    }

    // ==========================================
    // 行映射
    // ==========================================

    pub fn map_store(&self, row: &RawRow) -> ImportResult<Store> {
        let store_id = self.parse_id(row, columns::STORE_ID)?;
        let mut store = Store::new(
            store_id,
            self.get_string(row, columns::STORE_NAME).unwrap_or_default(),
            self.parse_pair(row, PeriodKind::Annual)?.unwrap_or(PeriodPair::new(f64::NAN, f64::NAN)),
        );
        store.city = self.get_string(row, columns::CITY);
        store.half_year = self.parse_pair(row, PeriodKind::HalfYear)?;
        store.quarter_yoy = self.parse_pair(row, PeriodKind::QuarterYoy)?;
        store.quarter_seq = self.parse_pair(row, PeriodKind::QuarterSeq)?;
        store.bimonthly = self.parse_pair(row, PeriodKind::Bimonthly)?;
        Ok(store)
    }

    pub fn map_product(&self, row: &RawRow) -> ImportResult<Product> {
        let mut product = Product::new(
            self.parse_id(row, columns::PRODUCT_ID)?,
            self.get_string(row, columns::PRODUCT_NAME).unwrap_or_default(),
            self.parse_pair(row, PeriodKind::Annual)?.unwrap_or_default(),
        );
        product.category = self.get_string(row, columns::CATEGORY);
        Ok(product)
    }

    pub fn map_fact(&self, row: &RawRow) -> ImportResult<SalesFact> {
        let mut fact = SalesFact::new(
            self.parse_id(row, columns::FACT_STORE_ID)?,
            self.parse_id(row, columns::FACT_PRODUCT_ID)?,
            self.parse_pair(row, PeriodKind::Annual)?.unwrap_or_default(),
        );
        fact.product_name = self.get_string(row, columns::FACT_PRODUCT_NAME);
        fact.category = self.get_string(row, columns::CATEGORY);
        fact.store_name = self.get_string(row, columns::FACT_STORE_NAME);
        fact.city = self.get_string(row, columns::CITY);
        fact.half_year = self.parse_pair(row, PeriodKind::HalfYear)?;
        fact.quarter_yoy = self.parse_pair(row, PeriodKind::QuarterYoy)?;
        fact.bimonthly = self.parse_pair(row, PeriodKind::Bimonthly)?;
        Ok(fact)
    }

    // ==========================================
    // 字段提取
    // ==========================================

    /// 提取字符串字段（空值返回 None），按别名顺序尝试
    fn get_string(&self, row: &RawRow, aliases: &[&str]) -> Option<String> {
        aliases
            .iter()
            .filter_map(|alias| row.values.get(*alias))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .map(|v| v.to_string())
    }

    /// 解析ID (Excel 数值单元格可能带 ".0")
    fn parse_id(&self, row: &RawRow, aliases: &[&str]) -> ImportResult<i64> {
        let value = self.get_string(row, aliases).ok_or_else(|| {
            ImportError::TypeConversionError {
                row: row.row_number,
                field: aliases[0].to_string(),
                message: "主键为空".to_string(),
            }
        })?;

        value
            .parse::<i64>()
            .ok()
            .or_else(|| {
                value
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.fract() == 0.0 && f.is_finite())
                    .map(|f| f as i64)
            })
            .ok_or_else(|| ImportError::TypeConversionError {
                row: row.row_number,
                field: aliases[0].to_string(),
                message: format!("无法解析为整数ID: {}", value),
            })
    }

    /// 解析浮点数 (允许千分位逗号; "NaN"/"inf" 等非有限值视为无法解析)
    fn parse_f64(&self, row: &RawRow, aliases: &[&str]) -> ImportResult<Option<f64>> {
        match self.get_string(row, aliases) {
            None => Ok(None),
            Some(value) => value
                .replace(',', "")
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Some)
                .ok_or_else(|| ImportError::TypeConversionError {
                    row: row.row_number,
                    field: aliases[0].to_string(),
                    message: format!("无法解析为数值: {}", value),
                }),
        }
    }

    /// 解析周期数据对
    fn parse_pair(&self, row: &RawRow, kind: PeriodKind) -> ImportResult<Option<PeriodPair>> {
        let (previous_aliases, current_aliases) = period_columns(kind);
        let previous = self.parse_f64(row, previous_aliases)?;
        let current = self.parse_f64(row, current_aliases)?;

        Ok(match (previous, current) {
            (None, None) => None,
            (p, c) => Some(PeriodPair::new(
                p.unwrap_or(f64::NAN),
                c.unwrap_or(f64::NAN),
            )),
        })
    }
}

fn has_column(headers: &[String], aliases: &[&str]) -> bool {
    aliases.iter().any(|alias| headers.iter().any(|h| h == alias))
}
