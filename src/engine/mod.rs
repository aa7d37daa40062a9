// ==========================================
// 例会分桌轮换系统 - 引擎层
// ==========================================
// 职责: 纯计算的分桌引擎（无 I/O，无持久化）
// 红线: 所有随机性来自注入的 RandomSource
// 红线: 规则问题以评价结论输出，只有前提条件错误才中止
// ==========================================

pub mod error;
pub mod evaluation;
pub mod fixed_leader;
pub mod guest_group;
pub mod occupancy;
pub mod orchestrator;
pub mod output_shaper;
pub mod random;
pub mod role;
pub mod scoring;
pub mod seatmate;
pub mod validator;

// 重导出核心引擎
pub use error::{EngineError, EngineResult};
pub use evaluation::RotationEvaluator;
pub use fixed_leader::FixedLeaderAssignment;
pub use guest_group::{GuestGroup, GuestGroupBuilder};
pub use occupancy::TargetOccupancy;
pub use orchestrator::{assign_tables, SeatingOrchestrator};
pub use output_shaper::{collation_key, compare_names};
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use role::{display_role, Role};
pub use scoring::{PlacementScorer, RoleAverages};
pub use seatmate::SeatmateHistory;
pub use validator::{PlacementValidator, Rejection};
