// ==========================================
// 例会分桌轮换系统 - 设定读取 Trait
// ==========================================
// 职责: 定义设定读取接口；取值解析与默认值在默认方法中完成
// 红线: 不包含设定写入
// ==========================================

use crate::config::run_settings::{invalid, ConfigError, RunSettings};
use crate::config::settings_reader::config_keys;
use crate::domain::settings::Settings;
use crate::domain::types::YearMonth;

// ==========================================
// SettingsReader Trait
// ==========================================
// 实现者: FileSettingsReader（键值文件）, InMemorySettingsReader（测试）
pub trait SettingsReader {
    /// 读取原始值（已 trim；空值视为不存在）
    fn get_value(&self, key: &str) -> Option<String>;

    /// 按别名依次读取
    fn lookup(&self, aliases: &[&str]) -> Option<String> {
        aliases.iter().find_map(|key| self.get_value(key))
    }

    /// 自会场名（必需）
    fn self_venue(&self) -> Result<String, ConfigError> {
        self.lookup(config_keys::SELF_VENUE)
            .ok_or_else(|| ConfigError::MissingKey(config_keys::SELF_VENUE[0].to_string()))
    }

    /// 轮换次数（必需）
    fn rotation_count(&self) -> Result<u32, ConfigError> {
        self.required_count(config_keys::ROTATION_COUNT)
    }

    /// 桌数（必需）
    fn table_count(&self) -> Result<u32, ConfigError> {
        self.required_count(config_keys::TABLE_COUNT)
    }

    /// 今月（YYYYMM；未设定时为 None）
    fn current_month(&self) -> Result<Option<YearMonth>, ConfigError> {
        match self.lookup(config_keys::CURRENT_MONTH) {
            None => Ok(None),
            Some(raw) => YearMonth::parse(&raw).map(Some).ok_or_else(|| {
                invalid(config_keys::CURRENT_MONTH[0], &raw, "必须是 YYYYMM 形式")
            }),
        }
    }

    /// 整数设定（Excel 数值可能带 ".0"）
    fn required_count(&self, aliases: &[&str]) -> Result<u32, ConfigError> {
        let key = aliases[0];
        let raw = self
            .lookup(aliases)
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))?;
        let digits = raw.strip_suffix(".0").unwrap_or(&raw);
        digits
            .parse::<u32>()
            .map_err(|_| invalid(key, &raw, "必须是非负整数"))
    }

    /// 读取完整运行设定；今月未设定时取本地当前月
    fn load_run_settings(&self) -> Result<RunSettings, ConfigError> {
        let settings = Settings::new(
            &self.self_venue()?,
            self.rotation_count()?,
            self.table_count()?,
        );
        let current_month = self.current_month()?.unwrap_or_else(YearMonth::current);
        Ok(RunSettings::new(settings, current_month))
    }
}
