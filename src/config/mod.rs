// ==========================================
// 例会分桌轮换系统 - 配置层
// ==========================================
// 职责: 运行设定的读取、校验与覆写
// 来源: 键值设定文件（CSV/Excel）或内存（测试）
// ==========================================

pub mod run_settings;
pub mod settings_reader;
pub mod settings_reader_trait;

// 重导出核心配置类型
pub use run_settings::{default_history_db_path, ConfigError, RunSettings, DB_PATH_ENV};
pub use settings_reader::{config_keys, FileSettingsReader, InMemorySettingsReader};
pub use settings_reader_trait::SettingsReader;
