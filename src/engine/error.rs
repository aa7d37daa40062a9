// ==========================================
// 例会分桌轮换系统 - 引擎错误类型
// ==========================================
// 职责: 致命级错误（中止整次运行，不产出任何结果）
// 红线: 可恢复的规则问题一律记为评估结论，不走错误通道
// ==========================================

use thiserror::Error;

/// 引擎致命错误
///
/// 任一变体出现时整次多轮运行中止，已完成轮次的结果全部丢弃
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    // ===== 桌长固定 =====
    #[error("桌长「{leader}」没有第1轮的指定卓番，分桌处理中止")]
    LeaderWithoutPreference { leader: String },

    #[error("桌长「{leader}」（第{rotation}轮）的指定卓番「{table}」不存在，请确认桌数设定，分桌处理中止")]
    LeaderTableNotFound {
        leader: String,
        rotation: u32,
        table: String,
    },

    #[error("桌长「{leader}」（第{rotation}轮）的指定卓番「{table}」已有其他桌长，每桌仅限1名桌长，分桌处理中止")]
    LeaderTableOccupied {
        leader: String,
        rotation: u32,
        table: String,
    },

    // ===== 输入前置条件 =====
    #[error("名册为空，无法分桌")]
    EmptyRoster,

    #[error("名册中姓名重复: {0}")]
    DuplicateParticipant(String),

    #[error("设定无效: {0}")]
    InvalidSettings(String),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
