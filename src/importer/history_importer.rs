// ==========================================
// 例会分桌轮换系统 - 历史记录导入器
// ==========================================
// 列: 開催月(YYYYMM) / 卓番 / 名前 / 所属会場
// 开催月格式错误的行跳过并记录
// ==========================================

use crate::domain::history::PastSeatingRecord;
use crate::domain::types::YearMonth;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{FieldMapper, HistoryRow, COL_HOLDING_MONTH, COL_TABLE};
use crate::importer::file_parser::{RawRecord, UniversalFileParser};
use crate::importer::roster_importer::{ImportIssue, VenueLookup};
use std::path::Path;
use tracing::{debug, info, warn};

/// 历史导入结果
#[derive(Debug, Clone)]
pub struct HistoryImport {
    pub rows: Vec<HistoryRow>,
    pub issues: Vec<ImportIssue>,
}

pub struct HistoryImporter {
    mapper: FieldMapper,
}

impl Default for HistoryImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryImporter {
    pub fn new() -> Self {
        Self {
            mapper: FieldMapper,
        }
    }

    pub fn import_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<HistoryImport> {
        let path = file_path.as_ref();
        let records = UniversalFileParser.parse_records(path)?;
        let result = self.import_records(&records)?;
        info!(
            file = %path.display(),
            rows = result.rows.len(),
            skipped = result.issues.len(),
            "历史记录读取完成"
        );
        Ok(result)
    }

    pub fn import_records(&self, records: &[RawRecord]) -> ImportResult<HistoryImport> {
        if let Some(first) = records.first() {
            for required in [COL_HOLDING_MONTH, COL_TABLE] {
                if !first.has_any(required) {
                    return Err(ImportError::MissingColumn(required.join("/")));
                }
            }
        }

        let mut rows = Vec::with_capacity(records.len());
        let mut issues = Vec::new();
        for record in records {
            match self.mapper.map_history_row(record) {
                Ok(row) => rows.push(row),
                Err(reason) => {
                    warn!(row = record.row_number, reason = %reason, "历史行被跳过");
                    issues.push(ImportIssue {
                        row_number: record.row_number,
                        reason,
                    });
                }
            }
        }
        Ok(HistoryImport { rows, issues })
    }
}

// 直接用历史文件补全名册会场（不经过数据库时）
impl VenueLookup for HistoryImport {
    fn first_known_venue(&self, name: &str) -> Option<String> {
        self.rows
            .iter()
            .find(|row| row.name == name && !row.venue.is_empty())
            .map(|row| row.venue.clone())
    }
}

/// 取本月之前 1~6 个月的记录
pub fn window_records(rows: &[HistoryRow], current_month: &YearMonth) -> Vec<PastSeatingRecord> {
    let records: Vec<PastSeatingRecord> = rows
        .iter()
        .filter_map(|row| {
            PastSeatingRecord::observed(
                &row.name,
                &row.table_label,
                &row.holding_month,
                current_month,
                &row.venue,
            )
        })
        .collect();
    debug!(
        current_month = %current_month,
        total = rows.len(),
        in_window = records.len(),
        "历史窗口过滤"
    );
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::field_mapper::RowRejection;

    fn record(row_number: usize, month: &str, table: &str, name: &str) -> RawRecord {
        RawRecord {
            row_number,
            fields: [
                ("開催月", month),
                ("卓番", table),
                ("名前", name),
                ("所属会場", "本会場"),
            ]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        }
    }

    #[test]
    fn test_import_and_window() {
        let imported = HistoryImporter::new()
            .import_records(&[
                record(2, "202410", "A", "佐藤"),
                record(3, "202403", "B", "佐藤"),
                record(4, "2024/10", "C", "鈴木"),
                record(5, "202502", "D", "鈴木"),
            ])
            .unwrap();

        assert_eq!(imported.rows.len(), 3);
        assert_eq!(imported.issues.len(), 1);
        assert!(matches!(
            imported.issues[0].reason,
            RowRejection::InvalidHoldingMonth { .. }
        ));

        let current = YearMonth::new(2025, 2).unwrap();
        let window = window_records(&imported.rows, &current);
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].participant_name, "佐藤");
        assert_eq!(window[0].months_ago, 4);

        assert_eq!(
            imported.first_known_venue("佐藤"),
            Some("本会場".to_string())
        );
        assert_eq!(imported.first_known_venue("田中"), None);
    }
}
