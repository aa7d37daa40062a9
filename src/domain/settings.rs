// ==========================================
// 例会分桌轮换系统 - 运行设定
// ==========================================

use serde::{Deserialize, Serialize};

/// 卓番使用单个字母 A..Z
pub const MAX_TABLE_COUNT: u32 = 26;

/// 一次运行的轮换次数上限
pub const MAX_ROTATION_COUNT: u32 = 99;

// ==========================================
// Settings - 引擎设定（一次运行内不可变）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub self_venue_name: String, // 自会场名
    pub rotation_count: u32,     // 轮换次数（1..=99）
    pub table_count: u32,        // 桌数（1..=26）
}

impl Settings {
    pub fn new(self_venue_name: &str, rotation_count: u32, table_count: u32) -> Self {
        Self {
            self_venue_name: self_venue_name.to_string(),
            rotation_count,
            table_count,
        }
    }

    /// 全部卓番（A, B, C...）
    pub fn table_labels(&self) -> Vec<String> {
        (0..self.table_count.min(MAX_TABLE_COUNT))
            .map(table_label)
            .collect()
    }
}

/// 第 index 张桌（0 起）的卓番
pub fn table_label(index: u32) -> String {
    char::from(b'A' + (index % MAX_TABLE_COUNT) as u8).to_string()
}
