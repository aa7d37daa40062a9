// ==========================================
// 例会分桌轮换系统 - 设定读取器
// ==========================================
// 文件格式: 第一列为键，第二列为值（CSV / Excel 均可，无表头）
// 键: 日文原始键名优先，英文别名兼容
// ==========================================

use crate::config::run_settings::ConfigError;
use crate::config::settings_reader_trait::SettingsReader;
use crate::importer::UniversalFileParser;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

// ==========================================
// 设定键
// ==========================================
pub mod config_keys {
    pub const SELF_VENUE: &[&str] = &["自会場", "self_venue"];
    pub const ROTATION_COUNT: &[&str] = &["車座回数", "rotation_count"];
    pub const TABLE_COUNT: &[&str] = &["テーブル数", "table_count"];
    pub const CURRENT_MONTH: &[&str] = &["今月", "current_month"];
}

// ==========================================
// FileSettingsReader - 键值文件
// ==========================================
#[derive(Debug, Clone)]
pub struct FileSettingsReader {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl FileSettingsReader {
    /// 读取设定文件（同一键出现多次时取第一次）
    pub fn from_file<P: AsRef<Path>>(file_path: P) -> Result<Self, ConfigError> {
        let path = file_path.as_ref().to_path_buf();
        let rows = UniversalFileParser.read_rows(&path)?;

        let mut values = HashMap::new();
        for row in rows {
            let mut cells = row.into_iter();
            let (Some(key), Some(value)) = (cells.next(), cells.next()) else {
                continue;
            };
            if key.is_empty() || value.is_empty() {
                continue;
            }
            values.entry(key).or_insert(value);
        }

        debug!(file = %path.display(), keys = values.len(), "设定文件读取完成");
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsReader for FileSettingsReader {
    fn get_value(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

// ==========================================
// InMemorySettingsReader - 内存设定
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct InMemorySettingsReader {
    values: HashMap<String, String>,
}

impl InMemorySettingsReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        let value = value.to_string();
        if !value.trim().is_empty() {
            self.values.insert(key.to_string(), value.trim().to_string());
        }
        self
    }
}

impl SettingsReader for InMemorySettingsReader {
    fn get_value(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::YearMonth;
    use std::io::Write;

    #[test]
    fn test_file_reader_japanese_keys() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "自会場,本会場").unwrap();
        writeln!(file, "車座回数,3").unwrap();
        writeln!(file, "テーブル数,4.0").unwrap();
        writeln!(file, "今月,202503").unwrap();
        writeln!(file, "備考").unwrap();

        let reader = FileSettingsReader::from_file(file.path()).unwrap();
        let settings = reader.load_run_settings().unwrap();

        assert_eq!(settings.settings.self_venue_name, "本会場");
        assert_eq!(settings.settings.rotation_count, 3);
        assert_eq!(settings.settings.table_count, 4);
        assert_eq!(settings.current_month, YearMonth::new(2025, 3).unwrap());
    }

    #[test]
    fn test_in_memory_reader_english_keys() {
        let reader = InMemorySettingsReader::new()
            .with("self_venue", "Main")
            .with("rotation_count", 2)
            .with("table_count", 5);

        let settings = reader.load_run_settings().unwrap();
        assert_eq!(settings.settings.self_venue_name, "Main");
        assert_eq!(settings.settings.table_count, 5);
    }

    #[test]
    fn test_missing_and_invalid_values() {
        let reader = InMemorySettingsReader::new().with("自会場", "本会場");
        assert!(matches!(
            reader.rotation_count(),
            Err(ConfigError::MissingKey(key)) if key == "車座回数"
        ));

        let reader = InMemorySettingsReader::new()
            .with("車座回数", "three")
            .with("今月", "2025-03");
        assert!(matches!(
            reader.rotation_count(),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(reader.current_month().is_err());
    }
}
