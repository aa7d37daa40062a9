// ==========================================
// 例会分桌轮换系统 - 分桌结果 CSV
// ==========================================
// 列: 轮次, 卓番, 姓名, 会场, 运营部, 桌长, 世话人, 介绍人, 会员区分, 备注
// 标志列: 1 / 0
// 回读: 只取前 4 列（轮次, 卓番, 姓名, 会场），与表头语言无关
// ==========================================

use crate::domain::assignment::{AssignmentRow, RowNote};
use crate::domain::types::MembershipTier;
use crate::export::error::{ExportError, ExportResult};
use crate::i18n::t_in;
use crate::importer::FieldMapper;
use crate::repository::CommitRow;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

const HEADER_KEYS: [&str; 10] = [
    "csv.rotation",
    "csv.table",
    "csv.name",
    "csv.venue",
    "csv.management",
    "csv.leader",
    "csv.caretaker",
    "csv.introducer",
    "csv.membership",
    "csv.note",
];

// ==========================================
// AssignmentCsvWriter
// ==========================================
pub struct AssignmentCsvWriter {
    locale: String,
}

impl AssignmentCsvWriter {
    pub fn new(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
        }
    }

    /// 本地化表头
    pub fn header(&self) -> Vec<String> {
        HEADER_KEYS
            .iter()
            .map(|key| t_in(&self.locale, key, &[]))
            .collect()
    }

    /// 一行输出
    pub fn record(&self, row: &AssignmentRow) -> Vec<String> {
        vec![
            row.rotation.to_string(),
            row.table_label.clone(),
            row.name.clone(),
            row.venue.clone(),
            flag(row.is_management),
            flag(row.is_leader),
            flag(row.is_caretaker),
            row.introducer.clone().unwrap_or_default(),
            self.membership_label(row.membership),
            row.note.map(|note| self.note_label(note)).unwrap_or_default(),
        ]
    }

    pub fn write<W: Write>(&self, writer: W, rows: &[AssignmentRow]) -> ExportResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(self.header())?;
        for row in rows {
            csv_writer.write_record(self.record(row))?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn write_file<P: AsRef<Path>>(&self, path: P, rows: &[AssignmentRow]) -> ExportResult<()> {
        let path = path.as_ref();
        self.write(File::create(path)?, rows)?;
        info!(file = %path.display(), rows = rows.len(), "分桌结果已写出");
        Ok(())
    }

    fn membership_label(&self, membership: MembershipTier) -> String {
        let key = match membership {
            MembershipTier::RegularOrAbove => "membership.regular",
            MembershipTier::Associate => "membership.associate",
            MembershipTier::Guest => "membership.guest",
        };
        t_in(&self.locale, key, &[])
    }

    fn note_label(&self, note: RowNote) -> String {
        match note {
            RowNote::TableLeader => t_in(&self.locale, "note.table_leader", &[]),
        }
    }
}

fn flag(value: bool) -> String {
    let text = if value { "1" } else { "0" };
    text.to_string()
}

// ==========================================
// 回读（登记用）
// ==========================================

/// 读取分桌结果 CSV 的 (轮次, 卓番, 姓名, 会场)
///
/// 姓名为空的行跳过；轮次或卓番缺失视为错误。
pub fn read_back<P: AsRef<Path>>(path: P) -> ExportResult<Vec<CommitRow>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mapper = FieldMapper;
    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result?;
        let row_number = index + 2;
        let cell = |i: usize| record.get(i).map(str::trim).unwrap_or_default();

        let name = cell(2);
        if name.is_empty() {
            continue;
        }

        let raw_rotation = cell(0);
        let rotation = raw_rotation
            .strip_suffix(".0")
            .unwrap_or(raw_rotation)
            .parse::<u32>()
            .map_err(|_| ExportError::InvalidRow {
                row: row_number,
                message: format!("轮次无效: {:?}", raw_rotation),
            })?;

        let table_label = mapper.clean_table_label(cell(1));
        if table_label.is_empty() {
            return Err(ExportError::InvalidRow {
                row: row_number,
                message: "卓番为空".to_string(),
            });
        }

        rows.push(CommitRow {
            rotation,
            table_label,
            participant_name: name.to_string(),
            venue: cell(3).to_string(),
        });
    }

    debug!(file = %path.display(), rows = rows.len(), "分桌结果回读完成");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(rotation: u32, table: &str, name: &str, leader: bool) -> AssignmentRow {
        AssignmentRow {
            rotation,
            table_label: table.to_string(),
            name: name.to_string(),
            venue: "本会場".to_string(),
            is_management: false,
            is_leader: leader,
            is_caretaker: true,
            introducer: None,
            membership: MembershipTier::RegularOrAbove,
            note: leader.then_some(RowNote::TableLeader),
        }
    }

    #[test]
    fn test_write_japanese_header_and_flags() {
        let mut buffer = Vec::new();
        AssignmentCsvWriter::new("ja")
            .write(&mut buffer, &[row(1, "A", "佐藤", true)])
            .unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "巡目,卓番,名前,所属会場,運営部,テーブルリーダー,世話人,紹介者,会員区分,備考"
        );
        assert_eq!(
            lines.next().unwrap(),
            "1,A,佐藤,本会場,0,1,1,,正会員以上,テーブルリーダー"
        );
    }

    #[test]
    fn test_read_back_after_write() {
        let file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        AssignmentCsvWriter::new("en")
            .write_file(
                file.path(),
                &[row(1, "A", "Sato", true), row(2, "B", "Sato", false)],
            )
            .unwrap();

        let rows = read_back(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].rotation, 2);
        assert_eq!(rows[1].table_label, "B");
        assert_eq!(rows[1].participant_name, "Sato");
        assert_eq!(rows[1].venue, "本会場");
    }

    #[test]
    fn test_read_back_strips_table_prefix_and_rejects_bad_rotation() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "巡目,卓番,名前,所属会場").unwrap();
        writeln!(file, "1.0,テーブルc,鈴木,北会場").unwrap();
        writeln!(file, ",,,").unwrap();
        file.flush().unwrap();

        let rows = read_back(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].table_label, "C");

        let mut bad = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(bad, "巡目,卓番,名前,所属会場").unwrap();
        writeln!(bad, "x,A,鈴木,北会場").unwrap();
        bad.flush().unwrap();
        assert!(matches!(
            read_back(bad.path()),
            Err(ExportError::InvalidRow { row: 2, .. })
        ));
    }
}
