// ==========================================
// 门店销售分析系统 - 文件解析器实现
// ==========================================
// 支持: 工作簿 (.xlsx/.xls/.ods, 三个工作表) / CSV 目录 (三个文件)
// 输出: RawTable (表头 + 按行号的 列名→文本 映射)
// ==========================================

use crate::domain::quality::DqTable;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

// ==========================================
// 输入表命名
// ==========================================

/// 工作表名候选 (原始希伯来语表名 + 英文表名)
pub fn sheet_aliases(table: DqTable) -> &'static [&'static str] {
    match table {
        DqTable::Stores => &["נתוני בסיס חנויות", "stores"],
        DqTable::Products => &["נתוני בסיס מוצרים", "products"],
        DqTable::Sales => &["מוצרים-חנויות", "store_products", "sales"],
    }
}

/// CSV 文件名候选 (不含扩展名)
fn csv_file_stems(table: DqTable) -> &'static [&'static str] {
    sheet_aliases(table)
}

// ==========================================
// RawTable - 原始表
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    pub row_number: usize, // 源文件行号 (表头为第 1 行)
    pub values: HashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub source: String,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    fn push_row(&mut self, row_number: usize, cells: impl Iterator<Item = String>) {
        let mut values = HashMap::new();
        for (col_idx, value) in cells.enumerate() {
            if let Some(header) = self.headers.get(col_idx) {
                values.insert(header.clone(), value.trim().to_string());
            }
        }

        // 跳过完全空白的行
        if values.values().all(|v| v.is_empty()) {
            return;
        }

        self.rows.push(RawRow { row_number, values });
    }
}

/// 表头清洗: 去空白 + 去 UTF-8 BOM
fn clean_header(raw: &str) -> String {
    raw.trim().trim_start_matches('\u{feff}').trim().to_string()
}

// ==========================================
// TableReader - 输入表读取接口
// ==========================================
pub trait TableReader {
    /// 读取一张输入表
    fn read_table(&self, table: DqTable) -> ImportResult<RawTable>;

    /// 数据源描述 (日志用)
    fn source(&self) -> String;
}

// ==========================================
// CSV 解析
// ==========================================

/// 解析单个 CSV 文件 (首行为表头)
pub fn parse_csv(path: &Path) -> ImportResult<RawTable> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // 允许行长度不一致
        .from_reader(file);

    let mut table = RawTable {
        source: path.display().to_string(),
        headers: reader.headers()?.iter().map(clean_header).collect(),
        rows: Vec::new(),
    };

    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        table.push_row(idx + 2, record.iter().map(|v| v.to_string()));
    }

    Ok(table)
}

pub struct CsvDirectoryReader {
    dir: PathBuf,
}

impl CsvDirectoryReader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn locate(&self, table: DqTable) -> ImportResult<PathBuf> {
        csv_file_stems(table)
            .iter()
            .map(|stem| self.dir.join(format!("{stem}.csv")))
            .find(|p| p.exists())
            .ok_or_else(|| {
                ImportError::FileNotFound(
                    self.dir
                        .join(format!("{}.csv", csv_file_stems(table)[1]))
                        .display()
                        .to_string(),
                )
            })
    }
}

impl TableReader for CsvDirectoryReader {
    fn read_table(&self, table: DqTable) -> ImportResult<RawTable> {
        parse_csv(&self.locate(table)?)
    }

    fn source(&self) -> String {
        self.dir.display().to_string()
    }
}

// ==========================================
// 工作簿解析
// ==========================================
pub struct WorkbookReader {
    path: PathBuf,
}

impl WorkbookReader {
    pub fn new(path: impl Into<PathBuf>) -> ImportResult<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if !matches!(ext.as_str(), "xlsx" | "xls" | "xlsm" | "ods") {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        Ok(Self { path })
    }
}

impl TableReader for WorkbookReader {
    fn read_table(&self, table: DqTable) -> ImportResult<RawTable> {
        let mut workbook = open_workbook_auto(&self.path)?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_aliases(table)
            .iter()
            .find_map(|alias| {
                sheet_names
                    .iter()
                    .find(|name| name.trim().eq_ignore_ascii_case(alias))
            })
            .cloned()
            .ok_or_else(|| ImportError::SheetNotFound {
                table: table.to_string(),
                available: sheet_names.join(", "),
            })?;

        let range = workbook.worksheet_range(&sheet_name)?;

        // 表头（第一行）
        let mut rows = range.rows();
        let header_row = rows.next().ok_or_else(|| {
            ImportError::ExcelParseError(format!("工作表 {sheet_name} 无表头"))
        })?;

        let mut raw = RawTable {
            source: format!("{}#{}", self.path.display(), sheet_name),
            headers: header_row
                .iter()
                .map(|cell| clean_header(&cell.to_string()))
                .collect(),
            rows: Vec::new(),
        };

        for (idx, data_row) in rows.enumerate() {
            raw.push_row(idx + 2, data_row.iter().map(|cell| cell.to_string()));
        }

        Ok(raw)
    }

    fn source(&self) -> String {
        self.path.display().to_string()
    }
}

/// 根据路径选择读取器: 目录 → CSV, 文件 → 工作簿
pub fn reader_for_path(path: &Path) -> ImportResult<Box<dyn TableReader>> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    if path.is_dir() {
        Ok(Box::new(CsvDirectoryReader::new(path)))
    } else {
        Ok(Box::new(WorkbookReader::new(path)?))
    }
}
