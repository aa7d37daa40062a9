// ==========================================
// 例会分桌轮换系统 - 评估结论
// ==========================================
// 职责: 规则适合性评估的结构化结论
// 红线: 每次运行重新生成，引擎不落库
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 结论范围
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum FindingScope {
    Run,
    Rotation { rotation: u32 },
    Table { rotation: u32, table: String },
}

// ==========================================
// 结论类别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingCategory {
    LeaderPresence,    // 桌长在席
    GuestPlacement,    // 来宾与介绍人
    TableSize,         // 人数
    VenueCollision,    // 同一他会场同桌
    VenueBalance,      // 自/他会场比例
    PastSeatmate,      // 过去同桌
    ManagementBalance, // 运营部分布
    CaretakerBalance,  // 世话人分布
    LeaderPreference,  // 桌长卓番指定不一致
    ManualPlacement,   // 手动卓番无法落实
    ForcedPlacement,   // 强制入座
}

impl fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FindingCategory::LeaderPresence => "LEADER_PRESENCE",
            FindingCategory::GuestPlacement => "GUEST_PLACEMENT",
            FindingCategory::TableSize => "TABLE_SIZE",
            FindingCategory::VenueCollision => "VENUE_COLLISION",
            FindingCategory::VenueBalance => "VENUE_BALANCE",
            FindingCategory::PastSeatmate => "PAST_SEATMATE",
            FindingCategory::ManagementBalance => "MANAGEMENT_BALANCE",
            FindingCategory::CaretakerBalance => "CARETAKER_BALANCE",
            FindingCategory::LeaderPreference => "LEADER_PREFERENCE",
            FindingCategory::ManualPlacement => "MANUAL_PLACEMENT",
            FindingCategory::ForcedPlacement => "FORCED_PLACEMENT",
        };
        write!(f, "{}", s)
    }
}

// ==========================================
// 严重度
// ==========================================
// 顺序: Info < Warning < Violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,
    Warning,
    Violation,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Violation => write!(f, "VIOLATION"),
        }
    }
}

/// 他会场人数（会场同桌冲突明细）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueHeadcount {
    pub venue: String,
    pub count: usize,
}

// ==========================================
// 结论明细（按检查项区分）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FindingDetail {
    // ===== 桌长 =====
    LeaderCount { count: usize },
    LeaderPreferenceMismatch {
        leader: String,
        rotation: u32,
        requested: String,
        fixed: String,
    },

    // ===== 来宾 =====
    NoGuests,
    GuestWithoutIntroducer { guest: String },
    IntroducerAbsent { guest: String, introducer: String },
    MultipleIntroducers { introducers: Vec<String> },
    GuestsCompliant { guest_count: usize },

    // ===== 人数 =====
    TableSize {
        size: usize,
        target_min: usize,
        target_max: usize,
    },
    ManualOverCapacity {
        participant: String,
        size: usize,
        target_max: usize,
    },

    // ===== 会场 =====
    VenueCollision { venues: Vec<VenueHeadcount> },
    NoVenueCollision,
    VenueBalance { self_venue: usize, other_venue: usize },

    // ===== 过去同桌 =====
    PastSeatmates { pairs: Vec<(String, String)> },
    NoPastSeatmates,

    // ===== 角色分布 =====
    Distribution { counts: Vec<usize>, even: bool },

    // ===== 入座回退 =====
    ManualTableMissing { participant: String, requested: String },
    GroupForced {
        introducer: String,
        members: Vec<String>,
        table: String,
    },
    IndividualForced { participant: String, table: String },
}

// ==========================================
// EvaluationFinding - 评估结论
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationFinding {
    pub scope: FindingScope,
    pub category: FindingCategory,
    pub severity: Severity,
    pub detail: FindingDetail,
}

impl EvaluationFinding {
    pub fn new(
        scope: FindingScope,
        category: FindingCategory,
        severity: Severity,
        detail: FindingDetail,
    ) -> Self {
        Self {
            scope,
            category,
            severity,
            detail,
        }
    }

    /// 桌级结论
    pub fn for_table(
        rotation: u32,
        table: &str,
        category: FindingCategory,
        severity: Severity,
        detail: FindingDetail,
    ) -> Self {
        Self::new(
            FindingScope::Table {
                rotation,
                table: table.to_string(),
            },
            category,
            severity,
            detail,
        )
    }

    /// 轮级结论
    pub fn for_rotation(
        rotation: u32,
        category: FindingCategory,
        severity: Severity,
        detail: FindingDetail,
    ) -> Self {
        Self::new(FindingScope::Rotation { rotation }, category, severity, detail)
    }

    /// 所属轮次（运行级结论为 None）
    pub fn rotation(&self) -> Option<u32> {
        match &self.scope {
            FindingScope::Run => None,
            FindingScope::Rotation { rotation } | FindingScope::Table { rotation, .. } => {
                Some(*rotation)
            }
        }
    }

    /// 所属桌（非桌级结论为 None）
    pub fn table(&self) -> Option<&str> {
        match &self.scope {
            FindingScope::Table { table, .. } => Some(table),
            _ => None,
        }
    }

    /// Warning 或 Violation
    pub fn is_problem(&self) -> bool {
        self.severity > Severity::Info
    }
}
