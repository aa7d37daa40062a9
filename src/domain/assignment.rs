// ==========================================
// 例会分桌轮换系统 - 分桌结果
// ==========================================
// 职责: 输出给外部渲染器的行记录与整体结果
// ==========================================

use crate::domain::finding::EvaluationFinding;
use crate::domain::types::MembershipTier;
use serde::{Deserialize, Serialize};

// ==========================================
// 备注
// ==========================================
// 由渲染层本地化
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowNote {
    TableLeader,
}

// ==========================================
// AssignmentRow - 分桌结果行
// ==========================================
// 每个 (轮次, 参加者) 一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRow {
    pub rotation: u32,
    pub table_label: String,
    pub name: String,
    pub venue: String,
    pub is_management: bool,
    pub is_leader: bool,
    pub is_caretaker: bool,
    pub introducer: Option<String>,
    pub membership: MembershipTier,
    pub note: Option<RowNote>,
}

// ==========================================
// SeatingOutcome - 一次运行的完整结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatingOutcome {
    pub rows: Vec<AssignmentRow>,
    pub findings: Vec<EvaluationFinding>,
}

impl SeatingOutcome {
    /// 指定轮次的结果行
    pub fn rows_for(&self, rotation: u32) -> impl Iterator<Item = &AssignmentRow> {
        self.rows.iter().filter(move |row| row.rotation == rotation)
    }

    /// 指定轮次、指定桌的结果行
    pub fn table_rows<'s>(
        &'s self,
        rotation: u32,
        table: &'s str,
    ) -> impl Iterator<Item = &'s AssignmentRow> + 's {
        self.rows_for(rotation).filter(move |row| row.table_label == table)
    }

    /// 指定轮次中某参加者所在的卓番
    pub fn table_of(&self, rotation: u32, name: &str) -> Option<&str> {
        self.rows_for(rotation)
            .find(|row| row.name == name)
            .map(|row| row.table_label.as_str())
    }

    /// 指定轮次的全部结论（含桌级）
    pub fn findings_for(&self, rotation: u32) -> impl Iterator<Item = &EvaluationFinding> {
        self.findings
            .iter()
            .filter(move |finding| finding.rotation() == Some(rotation))
    }
}
