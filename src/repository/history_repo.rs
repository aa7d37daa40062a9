// ==========================================
// 例会分桌轮换系统 - 历史卓番仓储
// ==========================================
// 表: seating_history（只追加）
// 红线: 同一开催月只能登记一次，不做删除/覆写
// ==========================================

use crate::db::{ensure_schema_version, open_sqlite_connection};
use crate::domain::history::PastSeatingRecord;
use crate::domain::types::YearMonth;
use crate::importer::{HistoryRow, VenueLookup};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Local;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

// ==========================================
// CommitRow - 登记用的一行（分桌结果回读）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRow {
    pub rotation: u32,
    pub table_label: String,
    pub participant_name: String,
    pub venue: String,
}

/// 旧历史批量导入的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyImportSummary {
    pub inserted: usize,
    pub skipped_months: Vec<YearMonth>,
}

// ==========================================
// HistoryRepository
// ==========================================
pub struct HistoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl HistoryRepository {
    /// 创建新的 HistoryRepository 实例
    pub fn new<P: AsRef<Path>>(db_path: P) -> RepositoryResult<Self> {
        let path = db_path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        }
        let conn = open_sqlite_connection(path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    /// 从已有连接创建（测试用内存库等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_table()?;
        Ok(repo)
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 确保表存在（如果不存在则创建）
    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS seating_history (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              holding_month INTEGER NOT NULL,
              table_label TEXT NOT NULL,
              participant_name TEXT NOT NULL,
              venue TEXT NOT NULL DEFAULT '',
              rotation INTEGER,
              committed_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_seating_history_month
              ON seating_history(holding_month);
            CREATE INDEX IF NOT EXISTS idx_seating_history_name
              ON seating_history(participant_name);
            "#,
        )?;
        ensure_schema_version(&conn)?;
        Ok(())
    }

    /// 该月是否已登记
    pub fn is_month_committed(&self, month: &YearMonth) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        month_exists(&conn, month)
    }

    /// 登记一个开催月的卓番（单事务）
    ///
    /// 该月已有任何记录时返回 `MonthAlreadyCommitted`，不写入任何行。
    pub fn append_month(&self, month: &YearMonth, rows: &[CommitRow]) -> RepositoryResult<usize> {
        if rows.is_empty() {
            debug!(month = %month, "没有可登记的行");
            return Ok(0);
        }

        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        if month_exists(&tx, month)? {
            return Err(RepositoryError::MonthAlreadyCommitted {
                month: month.to_string(),
            });
        }

        let committed_at = Local::now().to_rfc3339();
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO seating_history (
                    holding_month, table_label, participant_name, venue, rotation, committed_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )?;
            for row in rows {
                stmt.execute(params![
                    month.as_number(),
                    row.table_label,
                    row.participant_name,
                    row.venue,
                    row.rotation,
                    committed_at,
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        info!(month = %month, rows = rows.len(), "卓番登记完成");
        Ok(rows.len())
    }

    /// 批量导入旧历史（按开催月分组；已存在的月整体跳过）
    pub fn import_records(&self, rows: &[HistoryRow]) -> RepositoryResult<LegacyImportSummary> {
        let mut by_month: BTreeMap<YearMonth, Vec<&HistoryRow>> = BTreeMap::new();
        for row in rows {
            by_month.entry(row.holding_month).or_default().push(row);
        }

        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let committed_at = Local::now().to_rfc3339();
        let mut summary = LegacyImportSummary::default();
        for (month, month_rows) in by_month {
            if month_exists(&tx, &month)? {
                warn!(month = %month, "该月已存在历史记录，跳过");
                summary.skipped_months.push(month);
                continue;
            }
            let mut stmt = tx.prepare_cached(
                r#"
                INSERT INTO seating_history (
                    holding_month, table_label, participant_name, venue, rotation, committed_at
                ) VALUES (?1, ?2, ?3, ?4, NULL, ?5)
                "#,
            )?;
            for row in month_rows {
                stmt.execute(params![
                    month.as_number(),
                    row.table_label,
                    row.name,
                    row.venue,
                    committed_at,
                ])?;
                summary.inserted += 1;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        info!(
            inserted = summary.inserted,
            skipped_months = summary.skipped_months.len(),
            "旧历史导入完成"
        );
        Ok(summary)
    }

    /// 读取本月之前 1~6 个月的记录
    pub fn load_window(&self, current_month: &YearMonth) -> RepositoryResult<Vec<PastSeatingRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT holding_month, table_label, participant_name, venue
            FROM seating_history
            WHERE holding_month < ?1
            ORDER BY id
            "#,
        )?;

        let rows = stmt.query_map(params![current_month.as_number()], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (raw_month, table_label, name, venue) = row?;
            let holding_month = YearMonth::from_number(raw_month)
                .ok_or_else(|| RepositoryError::InvalidMonth(raw_month.to_string()))?;
            if let Some(record) =
                PastSeatingRecord::observed(&name, &table_label, &holding_month, current_month, &venue)
            {
                records.push(record);
            }
        }

        debug!(current_month = %current_month, records = records.len(), "历史窗口读取完成");
        Ok(records)
    }

    /// 该姓名第一条带会场的历史记录的会场
    pub fn first_known_venue(&self, name: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let venue = conn
            .query_row(
                r#"
                SELECT venue FROM seating_history
                WHERE participant_name = ?1 AND venue <> ''
                ORDER BY id
                LIMIT 1
                "#,
                params![name],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(venue)
    }

    /// 记录总数
    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM seating_history", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl VenueLookup for HistoryRepository {
    fn first_known_venue(&self, name: &str) -> Option<String> {
        match HistoryRepository::first_known_venue(self, name) {
            Ok(venue) => venue,
            Err(e) => {
                warn!(name, error = %e, "历史会场查询失败");
                None
            }
        }
    }
}

fn month_exists(conn: &Connection, month: &YearMonth) -> RepositoryResult<bool> {
    let exists = conn
        .query_row(
            "SELECT 1 FROM seating_history WHERE holding_month = ?1 LIMIT 1",
            params![month.as_number()],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);
    Ok(exists)
}
