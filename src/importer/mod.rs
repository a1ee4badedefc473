// ==========================================
// 门店销售分析系统 - 导入层
// ==========================================
// 职责: 外部数据导入,生成只读数据集快照
// 支持: Excel 工作簿 (三个工作表), CSV 目录 (三个文件)
// ==========================================

// 模块声明
pub mod dataset_importer;
pub mod dq_validator;
pub mod error;
pub mod field_mapper;
pub mod file_parser;

// 重导出核心类型
pub use dataset_importer::{DatasetImporter, ImportOutcome};
pub use dq_validator::DqValidator;
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{
    parse_csv, reader_for_path, CsvDirectoryReader, RawRow, RawTable, TableReader,
    WorkbookReader,
};
