// ==========================================
// 例会分桌轮换系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含分桌逻辑
// 职责: 历史卓番的追加登记与窗口读取
// 约束: 所有查询使用参数化；同一开催月只能登记一次
// ==========================================

pub mod error;
pub mod history_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use history_repo::{CommitRow, HistoryRepository, LegacyImportSummary};
