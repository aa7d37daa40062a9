// ==========================================
// 例会分桌轮换系统 - 名册导入器
// ==========================================
// 流程:
// 1) 文件解析（CSV/Excel，第一行表头）
// 2) 字段映射（无姓名/无会员区分/重复姓名 → 跳过并记录）
// 3) 会场补全: 空会场取历史中首个非空会场，否则为自会场
// ==========================================

use crate::domain::participant::Participant;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{FieldMapper, RosterRow, RowRejection, COL_NAME};
use crate::importer::file_parser::{RawRecord, UniversalFileParser};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

/// 会场补全来源（历史记录中该姓名的首个非空会场）
pub trait VenueLookup {
    fn first_known_venue(&self, name: &str) -> Option<String>;
}

/// 无历史时的补全来源
pub struct NoVenueHistory;

impl VenueLookup for NoVenueHistory {
    fn first_known_venue(&self, _name: &str) -> Option<String> {
        None
    }
}

/// 被跳过的行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportIssue {
    pub row_number: usize,
    pub reason: RowRejection,
}

/// 名册导入结果
#[derive(Debug, Clone)]
pub struct RosterImport {
    pub participants: Vec<Participant>,
    pub issues: Vec<ImportIssue>,
    pub venues_filled: usize, // 由历史补全会场的人数
}

// ==========================================
// RosterImporter
// ==========================================
pub struct RosterImporter<'v, V: VenueLookup> {
    self_venue: String,
    venues: &'v V,
    mapper: FieldMapper,
}

impl<'v, V: VenueLookup> RosterImporter<'v, V> {
    pub fn new(self_venue: &str, venues: &'v V) -> Self {
        Self {
            self_venue: self_venue.to_string(),
            venues,
            mapper: FieldMapper,
        }
    }

    /// 从文件导入名册
    pub fn import_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<RosterImport> {
        let path = file_path.as_ref();
        let records = UniversalFileParser.parse_records(path)?;
        let result = self.import_records(&records)?;

        info!(
            file = %path.display(),
            participants = result.participants.len(),
            skipped = result.issues.len(),
            venues_filled = result.venues_filled,
            "名册导入完成"
        );
        Ok(result)
    }

    /// 从已解析记录导入名册
    ///
    /// # 错误
    /// - 缺少姓名列
    /// - 无任何有效行
    pub fn import_records(&self, records: &[RawRecord]) -> ImportResult<RosterImport> {
        if let Some(first) = records.first() {
            if !first.has_any(COL_NAME) {
                return Err(ImportError::MissingColumn(COL_NAME.join("/")));
            }
        }

        let mut participants = Vec::with_capacity(records.len());
        let mut issues = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut venues_filled = 0;

        for record in records {
            let row = match self.mapper.map_roster_row(record) {
                Ok(row) => row,
                Err(reason) => {
                    warn!(row = record.row_number, reason = %reason, "名册行被跳过");
                    issues.push(ImportIssue {
                        row_number: record.row_number,
                        reason,
                    });
                    continue;
                }
            };

            if !seen.insert(row.name.clone()) {
                let reason = RowRejection::DuplicateName {
                    name: row.name.clone(),
                };
                warn!(row = row.row_number, reason = %reason, "名册行被跳过");
                issues.push(ImportIssue {
                    row_number: row.row_number,
                    reason,
                });
                continue;
            }

            let (participant, filled) = self.build_participant(row);
            venues_filled += usize::from(filled);
            participants.push(participant);
        }

        if participants.is_empty() {
            return Err(ImportError::EmptyRoster {
                skipped: issues.len(),
            });
        }

        Ok(RosterImport {
            participants,
            issues,
            venues_filled,
        })
    }

    /// 返回 (参加者, 是否由历史补全了会场)
    fn build_participant(&self, row: RosterRow) -> (Participant, bool) {
        let (venue, filled) = match row.venue {
            Some(venue) => (venue, false),
            None => match self.venues.first_known_venue(&row.name) {
                Some(venue) => (venue, true),
                None => (self.self_venue.clone(), false),
            },
        };

        let participant = Participant {
            name: row.name,
            venue,
            membership: row.membership,
            preferences: row.preferences,
            is_management: row.is_management,
            is_caretaker: row.is_caretaker,
            is_leader: row.is_leader,
            introducer: row.introducer,
        };
        (participant, filled)
    }
}
