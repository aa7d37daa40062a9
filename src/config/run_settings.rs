// ==========================================
// 例会分桌轮换系统 - 运行设定
// ==========================================
// RunSettings = 引擎设定 + 今月（历史窗口与登记用）
// ==========================================

use crate::domain::settings::{Settings, MAX_ROTATION_COUNT, MAX_TABLE_COUNT};
use crate::domain::types::YearMonth;
use crate::importer::ImportError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// 历史数据库路径的环境变量
pub const DB_PATH_ENV: &str = "SEATING_ROTATION_DB_PATH";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("缺少设定项: {0}")]
    MissingKey(String),

    #[error("设定值无效 (key: {key}, value: {value}): {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },

    #[error("设定文件读取失败: {0}")]
    Source(#[from] ImportError),
}

// ==========================================
// RunSettings
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSettings {
    pub settings: Settings,
    pub current_month: YearMonth,
}

impl RunSettings {
    pub fn new(settings: Settings, current_month: YearMonth) -> Self {
        Self {
            settings,
            current_month,
        }
    }

    /// 命令行覆写（None 表示沿用）
    pub fn with_overrides(
        mut self,
        self_venue: Option<String>,
        rotation_count: Option<u32>,
        table_count: Option<u32>,
        current_month: Option<YearMonth>,
    ) -> Self {
        if let Some(venue) = self_venue {
            self.settings.self_venue_name = venue;
        }
        if let Some(count) = rotation_count {
            self.settings.rotation_count = count;
        }
        if let Some(count) = table_count {
            self.settings.table_count = count;
        }
        if let Some(month) = current_month {
            self.current_month = month;
        }
        self
    }

    /// 与引擎相同的取值范围检查（在读取阶段尽早报错）
    pub fn validate(&self) -> Result<(), ConfigError> {
        let settings = &self.settings;
        if settings.self_venue_name.trim().is_empty() {
            return Err(invalid("self_venue", "", "自会场名不能为空"));
        }
        if settings.rotation_count == 0 || settings.rotation_count > MAX_ROTATION_COUNT {
            return Err(invalid(
                "rotation_count",
                &settings.rotation_count.to_string(),
                &format!("轮换次数必须在 1..={} 之间", MAX_ROTATION_COUNT),
            ));
        }
        if settings.table_count == 0 || settings.table_count > MAX_TABLE_COUNT {
            return Err(invalid(
                "table_count",
                &settings.table_count.to_string(),
                &format!("桌数必须在 1..={} 之间", MAX_TABLE_COUNT),
            ));
        }
        Ok(())
    }
}

pub(crate) fn invalid(key: &str, value: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    }
}

/// 历史数据库默认路径
///
/// 顺序: 环境变量 → 用户数据目录 → 当前目录
pub fn default_history_db_path() -> PathBuf {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }
    dirs::data_dir()
        .map(|dir| dir.join("seating-rotation").join("history.db"))
        .unwrap_or_else(|| PathBuf::from("./seating_rotation.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> RunSettings {
        RunSettings::new(
            Settings::new("本会場", 3, 4),
            YearMonth::new(2025, 1).unwrap(),
        )
    }

    #[test]
    fn test_overrides_replace_only_given_values() {
        let settings = base().with_overrides(None, Some(2), None, YearMonth::new(2025, 2));
        assert_eq!(settings.settings.self_venue_name, "本会場");
        assert_eq!(settings.settings.rotation_count, 2);
        assert_eq!(settings.settings.table_count, 4);
        assert_eq!(settings.current_month.month, 2);
    }

    #[test]
    fn test_validate_ranges() {
        assert!(base().validate().is_ok());
        assert!(base()
            .with_overrides(None, None, Some(27), None)
            .validate()
            .is_err());
        assert!(base()
            .with_overrides(Some(" ".to_string()), None, None, None)
            .validate()
            .is_err());
        assert!(base()
            .with_overrides(None, Some(0), None, None)
            .validate()
            .is_err());
        assert!(base()
            .with_overrides(None, Some(u32::MAX), None, None)
            .validate()
            .is_err());
    }
}
