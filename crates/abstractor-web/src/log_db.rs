//! Best-effort upload log backed by SQLite.
//!
//! Every successful extraction is recorded with the uploader's IP, a
//! coarse geolocation string and the SDG classification. Log failures are
//! swallowed by the callers; the log must never fail a request.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;

pub struct UploadLog {
    conn: Mutex<Connection>,
}

#[derive(Debug, Serialize)]
pub struct InsightSummary {
    pub total: i64,
    pub latest: Option<String>,
    pub recent: Vec<RecentUpload>,
}

#[derive(Debug, Serialize)]
pub struct RecentUpload {
    pub filename: String,
    pub upload_time: String,
    pub ip: String,
    pub location: String,
    pub sdg: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct SubmissionDetail {
    pub id: i64,
    pub filename: String,
    pub created_at: String,
    pub sdg: serde_json::Value,
}

impl UploadLog {
    pub fn open(path: &Path) -> rusqlite::Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS uploads (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                filename TEXT NOT NULL,
                upload_time TEXT NOT NULL DEFAULT (datetime('now')),
                ip TEXT NOT NULL,
                location TEXT NOT NULL,
                sdg TEXT NOT NULL
            );",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Insert one upload row; returns the new submission id.
    pub fn record(
        &self,
        filename: &str,
        ip: &str,
        location: &str,
        sdg: &serde_json::Value,
    ) -> rusqlite::Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO uploads (filename, ip, location, sdg) VALUES (?1, ?2, ?3, ?4)",
            params![filename, ip, location, sdg.to_string()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Totals plus the ten most recent uploads, for the admin dashboard.
    pub fn insight(&self) -> rusqlite::Result<InsightSummary> {
        let conn = self.conn.lock().unwrap();
        let (total, latest) = conn.query_row(
            "SELECT COUNT(*), MAX(upload_time) FROM uploads",
            [],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, Option<String>>(1)?)),
        )?;

        let mut stmt = conn.prepare(
            "SELECT filename, upload_time, ip, location, sdg FROM uploads
             ORDER BY upload_time DESC LIMIT 10",
        )?;
        let recent = stmt
            .query_map([], |row| {
                let sdg_raw: String = row.get(4)?;
                Ok(RecentUpload {
                    filename: row.get(0)?,
                    upload_time: row.get(1)?,
                    ip: row.get(2)?,
                    location: row.get(3)?,
                    sdg: serde_json::from_str(&sdg_raw).unwrap_or(serde_json::Value::Null),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(InsightSummary {
            total,
            latest,
            recent,
        })
    }

    pub fn submission(&self, id: i64) -> rusqlite::Result<Option<SubmissionDetail>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT id, filename, upload_time, sdg FROM uploads WHERE id = ?1",
            params![id],
            |row| {
                let sdg_raw: String = row.get(3)?;
                Ok(SubmissionDetail {
                    id: row.get(0)?,
                    filename: row.get(1)?,
                    created_at: row.get(2)?,
                    sdg: serde_json::from_str(&sdg_raw).unwrap_or(serde_json::Value::Null),
                })
            },
        )
        .optional()
    }
}
