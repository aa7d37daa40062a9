// ==========================================
// 例会分桌轮换系统 - 历史同桌记录
// ==========================================
// 职责: 过去开催月的卓番记录（只读语料）
// 红线: 仅 1~6 个月前的记录参与过去同桌判定
// ==========================================

use crate::domain::types::YearMonth;
use serde::{Deserialize, Serialize};

/// 过去同桌判定的回看窗口（月）
pub const HISTORY_WINDOW_MONTHS: u32 = 6;

// ==========================================
// PastSeatingRecord - 历史卓番记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PastSeatingRecord {
    pub participant_name: String, // 姓名
    pub table_label: String,      // 卓番（字母）
    pub months_ago: u32,          // 距本月的月数
    pub venue: String,            // 当时的所属会场
}

impl PastSeatingRecord {
    pub fn new(participant_name: &str, table_label: &str, months_ago: u32, venue: &str) -> Self {
        Self {
            participant_name: participant_name.to_string(),
            table_label: table_label.trim().to_uppercase(),
            months_ago,
            venue: venue.to_string(),
        }
    }

    /// 是否落在 1..=6 个月窗口内
    pub fn within_window(&self) -> bool {
        (1..=HISTORY_WINDOW_MONTHS).contains(&self.months_ago)
    }

    /// 由开催月构造；不在窗口内（含未来月、本月）时返回 None
    pub fn observed(
        participant_name: &str,
        table_label: &str,
        holding_month: &YearMonth,
        current_month: &YearMonth,
        venue: &str,
    ) -> Option<Self> {
        let months_ago = u32::try_from(current_month.months_since(holding_month)).ok()?;
        let record = Self::new(participant_name, table_label, months_ago, venue);
        record.within_window().then_some(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observed_keeps_only_window() {
        let current = YearMonth::new(2025, 3).unwrap();
        let at = |y, m| YearMonth::new(y, m).unwrap();

        let record = PastSeatingRecord::observed("A", "b", &at(2024, 12), &current, "本会場");
        assert_eq!(record.map(|r| (r.months_ago, r.table_label)), Some((3, "B".to_string())));

        assert!(PastSeatingRecord::observed("A", "B", &at(2024, 9), &current, "").is_some());
        assert!(PastSeatingRecord::observed("A", "B", &at(2024, 8), &current, "").is_none());
        assert!(PastSeatingRecord::observed("A", "B", &current, &current, "").is_none());
        assert!(PastSeatingRecord::observed("A", "B", &at(2025, 4), &current, "").is_none());
    }
}
