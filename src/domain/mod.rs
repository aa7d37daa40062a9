// ==========================================
// 例会分桌轮换系统 - 领域模型层
// ==========================================
// 职责: 定义参加者、历史记录、设定、桌、结论等实体
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod assignment;
pub mod finding;
pub mod history;
pub mod participant;
pub mod settings;
pub mod table;
pub mod types;

// 重导出核心类型
pub use assignment::{AssignmentRow, RowNote, SeatingOutcome};
pub use finding::{
    EvaluationFinding, FindingCategory, FindingDetail, FindingScope, Severity, VenueHeadcount,
};
pub use history::{PastSeatingRecord, HISTORY_WINDOW_MONTHS};
pub use participant::{Participant, PREFERENCE_ROTATIONS};
pub use settings::{table_label, Settings, MAX_ROTATION_COUNT, MAX_TABLE_COUNT};
pub use table::{Placement, Table};
pub use types::{MembershipTier, YearMonth};
