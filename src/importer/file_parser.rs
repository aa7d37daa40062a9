// ==========================================
// 例会分桌轮换系统 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 输出: 原始行（含表头行）或 表头 -> 值 的记录
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

// ==========================================
// RawRecord - 按表头取值的一行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub row_number: usize, // 文件内行号（表头为第 1 行）
    pub fields: HashMap<String, String>,
}

impl RawRecord {
    /// 按别名依次取第一个非空值（已 trim）
    pub fn first_of(&self, aliases: &[&str]) -> Option<&str> {
        aliases
            .iter()
            .filter_map(|alias| self.fields.get(*alias))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
    }

    /// 任一别名列是否存在（不论取值）
    pub fn has_any(&self, aliases: &[&str]) -> bool {
        aliases.iter().any(|alias| self.fields.contains_key(*alias))
    }
}

// ==========================================
// FileParser Trait
// ==========================================
pub trait FileParser {
    /// 读取全部非空行（第一行通常为表头）
    fn read_rows(&self, file_path: &Path) -> ImportResult<Vec<Vec<String>>>;
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(ImportError::FileNotFound(path.display().to_string()))
    }
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|v| v.is_empty())
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn read_rows(&self, file_path: &Path) -> ImportResult<Vec<Vec<String>>> {
        ensure_exists(file_path)?;

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: Vec<String> = record
                .iter()
                .map(|v| v.trim().trim_start_matches('\u{feff}').to_string())
                .collect();
            if !is_blank(&row) {
                rows.push(row);
            }
        }
        Ok(rows)
    }
}

// ==========================================
// Excel Parser 实现（读取第一个工作表）
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn read_rows(&self, file_path: &Path) -> ImportResult<Vec<Vec<String>>> {
        ensure_exists(file_path)?;

        let mut workbook = open_workbook_auto(file_path)?;
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        Ok(range
            .rows()
            .map(|cells| {
                cells
                    .iter()
                    .map(|cell| cell.to_string().trim().to_string())
                    .collect::<Vec<String>>()
            })
            .filter(|row| !is_blank(row))
            .collect())
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn read_rows<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<Vec<String>>> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.read_rows(path),
            "xlsx" | "xls" | "xlsm" => ExcelParser.read_rows(path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }

    /// 以第一行为表头，转换为记录
    pub fn parse_records<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<RawRecord>> {
        Ok(records_from_rows(self.read_rows(file_path)?))
    }
}

/// 第一行为表头；其余行按列位置映射（超出表头的列忽略）
pub fn records_from_rows(rows: Vec<Vec<String>>) -> Vec<RawRecord> {
    let mut rows = rows.into_iter();
    let Some(headers) = rows.next() else {
        return Vec::new();
    };

    rows.enumerate()
        .map(|(idx, row)| RawRecord {
            row_number: idx + 2,
            fields: headers
                .iter()
                .zip(row)
                .filter(|(header, _)| !header.is_empty())
                .map(|(header, value)| (header.clone(), value))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn csv_file(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    #[test]
    fn test_csv_records_by_header() {
        let file = csv_file(&["名前,会場", "佐藤, 東会場 ", "鈴木,"]);

        let records = UniversalFileParser.parse_records(file.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].row_number, 2);
        assert_eq!(records[0].first_of(&["名前"]), Some("佐藤"));
        assert_eq!(records[0].first_of(&["venue", "会場"]), Some("東会場"));
        assert_eq!(records[1].first_of(&["会場"]), None);
        assert!(records[1].has_any(&["会場"]));
    }

    #[test]
    fn test_csv_skips_blank_rows() {
        let file = csv_file(&["名前,会場", ",", "佐藤,本会場"]);

        let rows = CsvParser.read_rows(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_missing_file_and_unknown_extension() {
        assert!(matches!(
            CsvParser.read_rows(Path::new("non_existent.csv")),
            Err(ImportError::FileNotFound(_))
        ));
        assert!(matches!(
            UniversalFileParser.read_rows("roster.txt"),
            Err(ImportError::UnsupportedFormat(_))
        ));
    }
}
