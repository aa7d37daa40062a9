// ==========================================
// 例会分桌轮换系统 - 导入层
// ==========================================
// 职责: 外部名册/历史文件 → 领域对象
// 支持: Excel, CSV
// 红线: 单行问题不中止导入，记录为 ImportIssue
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod history_importer;
pub mod roster_importer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::{FieldMapper, HistoryRow, RosterRow, RowRejection};
pub use file_parser::{
    records_from_rows, CsvParser, ExcelParser, FileParser, RawRecord, UniversalFileParser,
};
pub use history_importer::{window_records, HistoryImport, HistoryImporter};
pub use roster_importer::{ImportIssue, NoVenueHistory, RosterImport, RosterImporter, VenueLookup};
