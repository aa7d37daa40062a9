// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 名册构建、临时历史库、临时输入文件
// ==========================================

#![allow(dead_code)]

use seating_rotation::domain::{FindingCategory, MembershipTier, Participant, SeatingOutcome, Settings};
use seating_rotation::repository::HistoryRepository;
use std::collections::HashMap;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

pub const SELF_VENUE: &str = "本会場";

/// 自会场正会员
pub fn local(name: &str) -> Participant {
    Participant::new(name, SELF_VENUE, MembershipTier::RegularOrAbove)
}

/// 他会场正会员
pub fn visitor(name: &str, venue: &str) -> Participant {
    Participant::new(name, venue, MembershipTier::RegularOrAbove)
}

/// 来宾
pub fn guest(name: &str, introducer: &str) -> Participant {
    Participant::new(name, SELF_VENUE, MembershipTier::Guest).introduced_by(introducer)
}

/// P01, P02, ... 自会场名册
pub fn locals(count: usize) -> Vec<Participant> {
    (1..=count).map(|i| local(&format!("P{:02}", i))).collect()
}

pub fn settings(rotations: u32, tables: u32) -> Settings {
    Settings::new(SELF_VENUE, rotations, tables)
}

/// (轮次, 卓番) → 人数
pub fn table_sizes(outcome: &SeatingOutcome) -> HashMap<(u32, String), usize> {
    let mut sizes = HashMap::new();
    for row in &outcome.rows {
        *sizes
            .entry((row.rotation, row.table_label.clone()))
            .or_insert(0) += 1;
    }
    sizes
}

/// 指定轮次是否存在某类别的 Warning/Violation
pub fn has_problem(outcome: &SeatingOutcome, rotation: u32, category: FindingCategory) -> bool {
    outcome
        .findings_for(rotation)
        .any(|f| f.category == category && f.is_problem())
}

/// 临时历史数据库（TempDir 需要保持存活）
pub fn create_test_repo() -> (TempDir, HistoryRepository) {
    let dir = TempDir::new().unwrap();
    let repo = HistoryRepository::new(dir.path().join("history.db")).unwrap();
    (dir, repo)
}

/// 写入临时 CSV 文件
pub fn write_csv(lines: &[&str]) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}
