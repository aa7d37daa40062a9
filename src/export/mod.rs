// ==========================================
// 例会分桌轮换系统 - 导出层
// ==========================================
// 职责: 分桌结果 → CSV / JSON / 评估文本
// 红线: 只做渲染，不改变行与结论的顺序
// ==========================================

pub mod assignment_csv;
pub mod error;
pub mod evaluation_report;

pub use assignment_csv::{read_back, AssignmentCsvWriter};
pub use error::{ExportError, ExportResult};
pub use evaluation_report::{describe_finding, write_findings_json, EvaluationReport};
