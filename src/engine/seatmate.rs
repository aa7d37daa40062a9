// ==========================================
// 例会分桌轮换系统 - 过去同桌索引
// ==========================================
// 规则: 两人在 6 个月窗口内各有一条卓番相同的记录即视为过去同桌
// 注: 不要求两条记录属于同一开催月（卓番每月复用，可能误判），保持现行判定
// ==========================================

use crate::domain::history::PastSeatingRecord;
use std::collections::{BTreeSet, HashMap};

// ==========================================
// SeatmateHistory - 姓名 -> 窗口内卓番集合
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct SeatmateHistory {
    tables_by_name: HashMap<String, BTreeSet<String>>,
}

impl SeatmateHistory {
    /// 由历史记录构建索引（窗口外记录直接丢弃）
    pub fn from_records(records: &[PastSeatingRecord]) -> Self {
        let mut tables_by_name: HashMap<String, BTreeSet<String>> = HashMap::new();
        for record in records.iter().filter(|r| r.within_window()) {
            tables_by_name
                .entry(record.participant_name.clone())
                .or_default()
                .insert(record.table_label.clone());
        }
        Self { tables_by_name }
    }

    /// 两人是否共享过窗口内的卓番
    pub fn shared_past_table(&self, a: &str, b: &str) -> bool {
        match (self.tables_by_name.get(a), self.tables_by_name.get(b)) {
            (Some(tables_a), Some(tables_b)) => !tables_a.is_disjoint(tables_b),
            _ => false,
        }
    }

    /// 有窗口内记录的人数
    pub fn len(&self) -> usize {
        self.tables_by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables_by_name.is_empty()
    }
}
