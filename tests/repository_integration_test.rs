// ==========================================
// 历史仓储集成测试
// ==========================================
// 场景: 分桌 → CSV 导出 → 回读 → 登记 → 下月读取窗口
// ==========================================

mod test_helpers;

use seating_rotation::domain::{FindingCategory, YearMonth};
use seating_rotation::engine::{assign_tables, SeededRandom};
use seating_rotation::export::{read_back, AssignmentCsvWriter};
use seating_rotation::importer::HistoryImporter;
use seating_rotation::repository::RepositoryError;
use std::collections::HashSet;
use test_helpers::*;

#[test]
fn test_commit_cycle_feeds_next_month() {
    let (dir, repo) = create_test_repo();
    let roster = locals(12);
    let march = YearMonth::new(2025, 3).unwrap();
    let april = YearMonth::new(2025, 4).unwrap();

    let history = repo.load_window(&march).unwrap();
    assert!(history.is_empty());

    let outcome = assign_tables(
        &roster,
        &history,
        &settings(2, 4),
        &mut SeededRandom::from_seed(8),
    )
    .unwrap();

    let csv_path = dir.path().join("assignment.csv");
    AssignmentCsvWriter::new("ja")
        .write_file(&csv_path, &outcome.rows)
        .unwrap();

    let rows = read_back(&csv_path).unwrap();
    assert_eq!(rows.len(), 24);
    assert_eq!(repo.append_month(&march, &rows).unwrap(), 24);

    let again = repo.append_month(&march, &rows);
    assert!(matches!(
        again,
        Err(RepositoryError::MonthAlreadyCommitted { .. })
    ));
    assert_eq!(repo.count().unwrap(), 24);

    // 下月: 3 月的两轮记录都在窗口内（1 个月前）
    let window = repo.load_window(&april).unwrap();
    assert_eq!(window.len(), 24);
    assert!(window.iter().all(|r| r.months_ago == 1));

    // 同月的记录不参与本月
    assert!(repo.load_window(&march).unwrap().is_empty());
}

#[test]
fn test_committed_history_produces_past_seatmate_findings() {
    let (_dir, repo) = create_test_repo();
    let roster = locals(6);
    let january = YearMonth::new(2025, 1).unwrap();
    let february = YearMonth::new(2025, 2).unwrap();

    // 1 桌: 全员必然同桌
    let outcome = assign_tables(
        &roster,
        &[],
        &settings(1, 1),
        &mut SeededRandom::from_seed(1),
    )
    .unwrap();
    assert!(!outcome
        .findings
        .iter()
        .any(|f| f.category == FindingCategory::PastSeatmate && f.is_problem()));

    let dir = tempfile::TempDir::new().unwrap();
    let csv_path = dir.path().join("january.csv");
    AssignmentCsvWriter::new("en")
        .write_file(&csv_path, &outcome.rows)
        .unwrap();
    repo.append_month(&january, &read_back(&csv_path).unwrap())
        .unwrap();

    let history = repo.load_window(&february).unwrap();
    let next = assign_tables(
        &roster,
        &history,
        &settings(1, 1),
        &mut SeededRandom::from_seed(1),
    )
    .unwrap();
    assert!(next
        .findings
        .iter()
        .any(|f| f.category == FindingCategory::PastSeatmate && f.is_problem()));
}

#[test]
fn test_legacy_history_import_and_venue_lookup() {
    let (_dir, repo) = create_test_repo();
    let file = write_csv(&[
        "開催月,卓番,名前,所属会場",
        "202411,A,佐藤,",
        "202411,B,鈴木,北会場",
        "202412,テーブルA,佐藤,南会場",
    ]);

    let imported = HistoryImporter::new().import_file(file.path()).unwrap();
    let summary = repo.import_records(&imported.rows).unwrap();
    assert_eq!(summary.inserted, 3);
    assert!(summary.skipped_months.is_empty());

    // 同じ月を再取込すると月単位で飛ばす
    let summary = repo.import_records(&imported.rows).unwrap();
    assert_eq!(summary.inserted, 0);
    assert_eq!(summary.skipped_months.len(), 2);

    assert_eq!(
        repo.first_known_venue("佐藤").unwrap(),
        Some("南会場".to_string())
    );

    let window = repo.load_window(&YearMonth::new(2025, 1).unwrap()).unwrap();
    let tables: HashSet<(&str, &str)> = window
        .iter()
        .map(|r| (r.participant_name.as_str(), r.table_label.as_str()))
        .collect();
    assert!(tables.contains(&("佐藤", "A")));
    assert!(tables.contains(&("鈴木", "B")));
}
