// ==========================================
// 导入层集成测试
// ==========================================
// 场景: 名册 CSV / 设定 CSV / 历史 CSV → 领域对象
// ==========================================

mod test_helpers;

use seating_rotation::config::{FileSettingsReader, SettingsReader};
use seating_rotation::domain::{MembershipTier, YearMonth};
use seating_rotation::importer::{
    window_records, HistoryImporter, ImportError, NoVenueHistory, RosterImporter, RowRejection,
};
use seating_rotation::repository::CommitRow;
use test_helpers::*;

const ROSTER_HEADER: &str =
    "名前,所属会場,会員区分,1巡目卓番,2巡目卓番,3巡目卓番,運営部,世話人,テーブルリーダー,紹介者";

#[test]
fn test_roster_csv_maps_all_columns() {
    let file = write_csv(&[
        ROSTER_HEADER,
        "佐藤,,正会員以上,b,,,1,0,TRUE,",
        "鈴木,北会場,準会員,,テーブルc,,0,○,,",
        "田中,本会場,ゲスト,,,,,,,佐藤",
        ",本会場,正会員以上,,,,,,,",
        "高橋,本会場,名誉会員,,,,,,,",
        "鈴木,南会場,正会員以上,,,,,,,",
    ]);

    let imported = RosterImporter::new(SELF_VENUE, &NoVenueHistory)
        .import_file(file.path())
        .unwrap();

    assert_eq!(imported.participants.len(), 3);
    let sato = &imported.participants[0];
    assert_eq!(sato.venue, SELF_VENUE);
    assert!(sato.is_leader && sato.is_management && !sato.is_caretaker);
    assert_eq!(sato.preference_for(1), Some("B"));

    let suzuki = &imported.participants[1];
    assert_eq!(suzuki.membership, MembershipTier::Associate);
    assert!(suzuki.is_caretaker);
    assert_eq!(suzuki.preference_for(2), Some("C"));

    let tanaka = &imported.participants[2];
    assert!(tanaka.is_guest());
    assert_eq!(tanaka.guest_introducer(), Some("佐藤"));

    let reasons: Vec<_> = imported.issues.iter().map(|i| i.reason.clone()).collect();
    assert_eq!(reasons.len(), 3);
    assert_eq!(reasons[0], RowRejection::MissingName);
    assert!(matches!(reasons[1], RowRejection::UnknownMembership { .. }));
    assert!(matches!(reasons[2], RowRejection::DuplicateName { .. }));
}

#[test]
fn test_roster_venue_filled_from_history_repository() {
    let (_dir, repo) = create_test_repo();
    repo.append_month(
        &YearMonth::new(2024, 12).unwrap(),
        &[CommitRow {
            rotation: 1,
            table_label: "A".to_string(),
            participant_name: "佐藤".to_string(),
            venue: "北会場".to_string(),
        }],
    )
    .unwrap();

    let file = write_csv(&[ROSTER_HEADER, "佐藤,,正会員以上,,,,,,,", "鈴木,,正会員以上,,,,,,,"]);
    let imported = RosterImporter::new(SELF_VENUE, &repo)
        .import_file(file.path())
        .unwrap();

    assert_eq!(imported.participants[0].venue, "北会場");
    assert_eq!(imported.participants[1].venue, SELF_VENUE);
    assert_eq!(imported.venues_filled, 1);
}

#[test]
fn test_roster_without_usable_rows_is_an_error() {
    let file = write_csv(&[ROSTER_HEADER, ",本会場,正会員以上,,,,,,,"]);
    let result = RosterImporter::new(SELF_VENUE, &NoVenueHistory).import_file(file.path());
    assert!(matches!(result, Err(ImportError::EmptyRoster { skipped: 1 })));

    let missing = write_csv(&["氏名,会場", "佐藤,本会場"]);
    let result = RosterImporter::new(SELF_VENUE, &NoVenueHistory).import_file(missing.path());
    assert!(matches!(result, Err(ImportError::MissingColumn(_))));
}

#[test]
fn test_settings_and_history_files_feed_the_window() {
    let settings_file = write_csv(&["自会場,本会場", "車座回数,3", "テーブル数,5", "今月,202503"]);
    let run_settings = FileSettingsReader::from_file(settings_file.path())
        .unwrap()
        .load_run_settings()
        .unwrap();
    assert_eq!(run_settings.settings.table_count, 5);

    let history_file = write_csv(&[
        "開催月,卓番,名前,所属会場",
        "202502,A,佐藤,本会場",
        "202409,テーブルB,鈴木,北会場",
        "202408,C,田中,本会場",
        "不明,D,高橋,本会場",
    ]);
    let imported = HistoryImporter::new()
        .import_file(history_file.path())
        .unwrap();
    assert_eq!(imported.rows.len(), 3);
    assert_eq!(imported.issues.len(), 1);

    let window = window_records(&imported.rows, &run_settings.current_month);
    let summary: Vec<_> = window
        .iter()
        .map(|r| (r.participant_name.as_str(), r.table_label.as_str(), r.months_ago))
        .collect();
    assert_eq!(summary, vec![("佐藤", "A", 1), ("鈴木", "B", 6)]);
}

#[test]
fn test_unsupported_extension_is_rejected() {
    let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    let result = HistoryImporter::new().import_file(file.path());
    assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
}
