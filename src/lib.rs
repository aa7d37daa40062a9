// ==========================================
// 例会分桌轮换系统 - 核心库
// ==========================================
// 职责: 多轮次分桌（桌长固定、来宾随介绍人、会场分散、避免过去同桌）
// 技术栈: Rust + SQLite（历史卓番）
// 系统定位: 分桌方案生成 + 规则适合性评估（人工最终确认）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "ja");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 分桌规则
pub mod engine;

// 导入层 - 名册/历史文件
pub mod importer;

// 数据仓储层 - 历史卓番
pub mod repository;

// 配置层 - 运行设定
pub mod config;

// 导出层 - CSV / 评估文本
pub mod export;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{
    AssignmentRow, EvaluationFinding, FindingCategory, FindingDetail, FindingScope,
    MembershipTier, Participant, PastSeatingRecord, SeatingOutcome, Settings, Severity,
    YearMonth,
};

// 引擎
pub use engine::{assign_tables, EngineError, RandomSource, SeatingOrchestrator, SeededRandom};

// 配置
pub use config::{RunSettings, SettingsReader};

// 仓储
pub use repository::HistoryRepository;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "例会分桌轮换系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
