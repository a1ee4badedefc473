// ==========================================
// 门店销售分析系统 - 数据集导入器
// ==========================================
// 导入流程:
// 1. 读取三张输入表 (工作簿或 CSV 目录)
// 2. 必填列检查 + 周期能力识别 (门店表表头)
// 3. 字段映射与类型转换 (失败行记为 DQ 错误,不中断)
// 4. DQ 校验 → 存在错误则拒绝导入
// 5. 内容指纹作为数据集版本
// ==========================================

use crate::domain::dataset::Dataset;
use crate::domain::quality::{DqLevel, DqReport, DqTable, DqViolation};
use crate::importer::dq_validator::DqValidator;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::{reader_for_path, RawRow, RawTable, TableReader};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::path::Path;
use tracing::{info, instrument, warn};

// ==========================================
// ImportOutcome - 导入结果
// ==========================================
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub dataset: Dataset,
    pub dq_report: DqReport, // 仅含 Warning/Info (有 Error 时导入失败)
}

pub struct DatasetImporter {
    mapper: FieldMapper,
    validator: DqValidator,
}

impl DatasetImporter {
    pub fn new() -> Self {
        Self {
            mapper: FieldMapper,
            validator: DqValidator::new(),
        }
    }

    /// 从路径导入 (目录 → CSV, 文件 → 工作簿)
    pub fn import<P: AsRef<Path>>(&self, path: P) -> ImportResult<ImportOutcome> {
        let reader = reader_for_path(path.as_ref())?;
        self.import_from(reader.as_ref())
    }

    /// 从任意表读取器导入
    #[instrument(skip(self, reader), fields(source = %reader.source()))]
    pub fn import_from(&self, reader: &dyn TableReader) -> ImportResult<ImportOutcome> {
        // ==========================================
        // 阶段1: 读取
        // ==========================================
        let store_table = reader.read_table(DqTable::Stores)?;
        let product_table = reader.read_table(DqTable::Products)?;
        let sales_table = reader.read_table(DqTable::Sales)?;

        info!(
            stores = store_table.rows.len(),
            products = product_table.rows.len(),
            facts = sales_table.rows.len(),
            "输入表读取完成"
        );

        for (table, raw) in [
            (DqTable::Stores, &store_table),
            (DqTable::Products, &product_table),
            (DqTable::Sales, &sales_table),
        ] {
            self.mapper.check_required_columns(table, raw)?;
        }

        let capabilities = self.mapper.detect_capabilities(&store_table.headers);
        info!(?capabilities, "周期能力识别完成");

        // ==========================================
        // 阶段2: 映射
        // ==========================================
        let mut report = DqReport::default();

        let stores = self.map_rows(DqTable::Stores, &store_table, &mut report, |r| {
            self.mapper.map_store(r)
        });
        let products = self.map_rows(DqTable::Products, &product_table, &mut report, |r| {
            self.mapper.map_product(r)
        });
        let facts = self.map_rows(DqTable::Sales, &sales_table, &mut report, |r| {
            self.mapper.map_fact(r)
        });

        // ==========================================
        // 阶段3: DQ 校验
        // ==========================================
        report.extend(self.validator.validate_stores(&stores));
        report.extend(self.validator.validate_products(&products));

        let store_ids: HashSet<i64> = stores.iter().map(|(_, s)| s.store_id).collect();
        let product_ids: HashSet<i64> = products.iter().map(|(_, p)| p.product_id).collect();
        report.extend(self.validator.validate_facts(&facts, &store_ids, &product_ids));

        log_violations(&report.violations);

        if report.has_errors() {
            return Err(ImportError::ValidationFailed {
                errors: report.error_count(),
                summary: report.error_summary(),
            });
        }

        // ==========================================
        // 阶段4: 组装
        // ==========================================
        let version = fingerprint(&[&store_table, &product_table, &sales_table]);
        let dataset = Dataset::new(
            version,
            capabilities,
            stores.into_iter().map(|(_, s)| s).collect(),
            products.into_iter().map(|(_, p)| p).collect(),
            facts.into_iter().map(|(_, f)| f).collect(),
        );

        info!(
            version = %dataset.version,
            warnings = report.warning_count(),
            "数据集导入完成"
        );

        Ok(ImportOutcome {
            dataset,
            dq_report: report,
        })
    }

    /// 逐行映射,失败行转为 DQ 错误
    fn map_rows<T, F>(
        &self,
        table: DqTable,
        raw: &RawTable,
        report: &mut DqReport,
        map: F,
    ) -> Vec<(usize, T)>
    where
        F: Fn(&RawRow) -> ImportResult<T>,
    {
        let mut mapped = Vec::with_capacity(raw.rows.len());
        for row in &raw.rows {
            match map(row) {
                Ok(value) => mapped.push((row.row_number, value)),
                Err(err) => report
                    .violations
                    .push(self.validator.conversion_violation(table, &err)),
            }
        }
        mapped
    }
}

impl Default for DatasetImporter {
    fn default() -> Self {
        Self::new()
    }
}

/// 内容指纹 (表头 + 按行号排序的单元格)
fn fingerprint(tables: &[&RawTable]) -> String {
    let mut hasher = DefaultHasher::new();
    for table in tables {
        table.headers.hash(&mut hasher);
        for row in &table.rows {
            row.row_number.hash(&mut hasher);
            for header in &table.headers {
                row.values.get(header).hash(&mut hasher);
            }
        }
    }
    format!("{:016x}", hasher.finish())
}

fn log_violations(violations: &[DqViolation]) {
    for v in violations {
        match v.level {
            DqLevel::Error | DqLevel::Warning => warn!(
                table = %v.table,
                row = v.row_number,
                field = %v.field,
                level = ?v.level,
                "{}",
                v.message
            ),
            DqLevel::Info => tracing::debug!(
                table = %v.table,
                row = v.row_number,
                field = %v.field,
                "{}",
                v.message
            ),
        }
    }
}
