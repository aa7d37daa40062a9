// ==========================================
// 例会分桌轮换系统 - 字段映射器
// ==========================================
// 职责: 名册/历史行 → 领域字段（列名别名 + 取值清洗）
// 列名: 日文原始列名优先，英文别名兼容
// ==========================================

use crate::domain::participant::PREFERENCE_ROTATIONS;
use crate::domain::types::{MembershipTier, YearMonth};
use crate::importer::file_parser::RawRecord;

// ===== 名册列 =====
pub const COL_NAME: &[&str] = &["名前", "name"];
pub const COL_VENUE: &[&str] = &["会場", "所属会場", "venue"];
pub const COL_MEMBERSHIP: &[&str] = &["会員区分", "membership"];
pub const COL_PREFERENCES: [&[&str]; PREFERENCE_ROTATIONS] = [
    &["1巡目卓番", "table_1", "pref_1"],
    &["2巡目卓番", "table_2", "pref_2"],
    &["3巡目卓番", "table_3", "pref_3"],
];
pub const COL_MANAGEMENT: &[&str] = &["運営部", "management"];
pub const COL_CARETAKER: &[&str] = &["世話人", "caretaker"];
pub const COL_LEADER: &[&str] = &["テーブルリーダー", "leader"];
pub const COL_INTRODUCER: &[&str] = &["紹介者", "introducer"];

// ===== 历史列 =====
pub const COL_HOLDING_MONTH: &[&str] = &["開催月", "holding_month"];
pub const COL_TABLE: &[&str] = &["卓番", "table"];
pub const COL_HISTORY_VENUE: &[&str] = &["所属会場", "会場", "venue"];

/// 名册一行的映射结果（会场补全前）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRow {
    pub row_number: usize,
    pub name: String,
    pub venue: Option<String>,
    pub membership: MembershipTier,
    pub preferences: [Option<String>; PREFERENCE_ROTATIONS],
    pub is_management: bool,
    pub is_caretaker: bool,
    pub is_leader: bool,
    pub introducer: Option<String>,
}

/// 历史一行的映射结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub row_number: usize,
    pub holding_month: YearMonth,
    pub table_label: String,
    pub name: String,
    pub venue: String,
}

/// 行被跳过的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRejection {
    MissingName,
    MissingMembership { name: String },
    UnknownMembership { name: String, value: String },
    DuplicateName { name: String },
    InvalidHoldingMonth { value: String },
    MissingTable,
}

impl std::fmt::Display for RowRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowRejection::MissingName => write!(f, "姓名为空"),
            RowRejection::MissingMembership { name } => write!(f, "{} 的会员区分为空", name),
            RowRejection::UnknownMembership { name, value } => {
                write!(f, "{} 的会员区分无法识别: {}", name, value)
            }
            RowRejection::DuplicateName { name } => write!(f, "姓名重复: {}", name),
            RowRejection::InvalidHoldingMonth { value } => {
                write!(f, "开催月不是 YYYYMM 格式: {}", value)
            }
            RowRejection::MissingTable => write!(f, "卓番为空"),
        }
    }
}

pub struct FieldMapper;

impl FieldMapper {
    /// 名册行映射
    pub fn map_roster_row(&self, record: &RawRecord) -> Result<RosterRow, RowRejection> {
        let name = record
            .first_of(COL_NAME)
            .ok_or(RowRejection::MissingName)?
            .to_string();

        let raw_membership =
            record
                .first_of(COL_MEMBERSHIP)
                .ok_or_else(|| RowRejection::MissingMembership { name: name.clone() })?;
        let membership = MembershipTier::parse(raw_membership).ok_or_else(|| {
            RowRejection::UnknownMembership {
                name: name.clone(),
                value: raw_membership.to_string(),
            }
        })?;

        let preferences = COL_PREFERENCES.map(|aliases| {
            record
                .first_of(aliases)
                .map(|letter| self.clean_table_label(letter))
        });

        Ok(RosterRow {
            row_number: record.row_number,
            name,
            venue: record.first_of(COL_VENUE).map(str::to_string),
            membership,
            preferences,
            is_management: self.parse_flag(record.first_of(COL_MANAGEMENT)),
            is_caretaker: self.parse_flag(record.first_of(COL_CARETAKER)),
            is_leader: self.parse_flag(record.first_of(COL_LEADER)),
            introducer: record.first_of(COL_INTRODUCER).map(str::to_string),
        })
    }

    /// 历史行映射
    pub fn map_history_row(&self, record: &RawRecord) -> Result<HistoryRow, RowRejection> {
        let raw_month = record.first_of(COL_HOLDING_MONTH).unwrap_or("");
        let holding_month =
            YearMonth::parse(raw_month).ok_or_else(|| RowRejection::InvalidHoldingMonth {
                value: raw_month.to_string(),
            })?;
        let name = record
            .first_of(COL_NAME)
            .ok_or(RowRejection::MissingName)?
            .to_string();
        let table_label = record
            .first_of(COL_TABLE)
            .map(|t| self.clean_table_label(t))
            .ok_or(RowRejection::MissingTable)?;

        Ok(HistoryRow {
            row_number: record.row_number,
            holding_month,
            table_label,
            name,
            venue: record
                .first_of(COL_HISTORY_VENUE)
                .unwrap_or_default()
                .to_string(),
        })
    }

    /// 真值: 1 / true / TRUE / ○（Excel 数值 1.0 同样视为真）
    pub fn parse_flag(&self, value: Option<&str>) -> bool {
        matches!(
            value.map(str::trim),
            Some("1" | "1.0" | "true" | "TRUE" | "True" | "○")
        )
    }

    /// 卓番: 去掉 "テーブル"/"Table" 前缀后大写
    pub fn clean_table_label(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        let stripped = trimmed
            .strip_prefix("テーブル")
            .or_else(|| trimmed.strip_prefix("Table"))
            .or_else(|| trimmed.strip_prefix("table"))
            .unwrap_or(trimmed);
        stripped.trim().to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn record(pairs: &[(&str, &str)]) -> RawRecord {
        RawRecord {
            row_number: 2,
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn test_map_roster_row_japanese_headers() {
        let row = FieldMapper
            .map_roster_row(&record(&[
                ("名前", "佐藤"),
                ("会場", ""),
                ("会員区分", "ゲスト"),
                ("1巡目卓番", " b "),
                ("3巡目卓番", "テーブルC"),
                ("運営部", "1"),
                ("世話人", "0"),
                ("テーブルリーダー", "○"),
                ("紹介者", "鈴木"),
            ]))
            .unwrap();

        assert_eq!(row.name, "佐藤");
        assert_eq!(row.venue, None);
        assert_eq!(row.membership, MembershipTier::Guest);
        assert_eq!(
            row.preferences,
            [Some("B".to_string()), None, Some("C".to_string())]
        );
        assert!(row.is_management);
        assert!(!row.is_caretaker);
        assert!(row.is_leader);
        assert_eq!(row.introducer.as_deref(), Some("鈴木"));
    }

    #[test]
    fn test_map_roster_row_rejections() {
        assert_eq!(
            FieldMapper.map_roster_row(&record(&[("会員区分", "準会員")])),
            Err(RowRejection::MissingName)
        );
        assert_eq!(
            FieldMapper.map_roster_row(&record(&[("name", "A"), ("membership", "vip")])),
            Err(RowRejection::UnknownMembership {
                name: "A".to_string(),
                value: "vip".to_string()
            })
        );
    }

    #[test]
    fn test_map_history_row() {
        let row = FieldMapper
            .map_history_row(&record(&[
                ("開催月", "202501.0"),
                ("卓番", "a"),
                ("名前", "佐藤"),
                ("所属会場", "東会場"),
            ]))
            .unwrap();
        assert_eq!(row.holding_month, YearMonth::new(2025, 1).unwrap());
        assert_eq!(row.table_label, "A");

        assert!(matches!(
            FieldMapper.map_history_row(&record(&[("開催月", "2025-01"), ("卓番", "A")])),
            Err(RowRejection::InvalidHoldingMonth { .. })
        ));
    }
}
