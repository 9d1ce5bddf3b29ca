use crate::model::{CategorizedListing, Heuristic, JobDetails, RawListing, StorageError};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

const JOB_COLUMNS: &str = "url, title, source, category, description, deadline, details, heuristic, collected_at";

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens the database and runs migrations.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;
        Self::migrate(conn)
    }

    pub fn in_memory() -> Result<Self, StorageError> {
        Self::migrate(Connection::open_in_memory()?)
    }

    fn migrate(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS jobs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                url TEXT UNIQUE,
                title TEXT NOT NULL,
                source TEXT NOT NULL DEFAULT '',
                category TEXT NOT NULL,
                collected_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_jobs_category ON jobs (category);
            "
        )?;

        // Columns added after the first schema
        Self::migrate_add_column_if_missing(&conn, "jobs", "description", "TEXT")?;
        Self::migrate_add_column_if_missing(&conn, "jobs", "deadline", "TEXT")?;
        Self::migrate_add_column_if_missing(&conn, "jobs", "details", "TEXT")?;
        Self::migrate_add_column_if_missing(&conn, "jobs", "heuristic", "TEXT")?;

        Ok(Self { conn })
    }

    fn migrate_add_column_if_missing(
        conn: &Connection,
        table: &str,
        column: &str,
        column_def: &str,
    ) -> Result<(), StorageError> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
        let existing_columns: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<_, _>>()?;

        if !existing_columns.iter().any(|c| c == column) {
            let alter_sql = format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def);
            conn.execute(&alter_sql, [])?;
        }

        Ok(())
    }

    /// Inserts a categorized job. Returns false when its key is already stored.
    pub fn save_job(&self, job: &CategorizedListing) -> Result<bool, StorageError> {
        insert_job(&self.conn, job)
    }

    /// Inserts a batch in one transaction, returning how many rows were new.
    pub fn save_jobs(&mut self, jobs: &[CategorizedListing]) -> Result<usize, StorageError> {
        let tx = self.conn.transaction()?;
        let mut saved = 0;
        for job in jobs {
            if insert_job(&tx, job)? {
                saved += 1;
            }
        }
        tx.commit()?;
        Ok(saved)
    }

    pub fn contains_key(&self, key: &str) -> Result<bool, StorageError> {
        let mut stmt = self.conn.prepare("SELECT 1 FROM jobs WHERE url = ?1")?;
        let mut rows = stmt.query(params![key])?;
        Ok(rows.next()?.is_some())
    }

    /// Every identifying key already stored.
    pub fn known_keys(&self) -> Result<HashSet<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT url FROM jobs WHERE url IS NOT NULL")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut keys = HashSet::new();
        for key in rows {
            keys.insert(key?);
        }
        Ok(keys)
    }

    pub fn all_jobs(&self) -> Result<Vec<CategorizedListing>, StorageError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {JOB_COLUMNS} FROM jobs ORDER BY id ASC"))?;

        let rows = stmt.query_map([], Self::map_job)?;
        let mut jobs = Vec::new();
        for job in rows {
            jobs.push(job?);
        }
        Ok(jobs)
    }

    pub fn category_counts(&self) -> Result<BTreeMap<String, usize>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT category, COUNT(*) FROM jobs GROUP BY category")?;

        let rows = stmt.query_map([], |row| {
            let category: String = row.get(0)?;
            let count: usize = row.get(1)?;
            Ok((category, count))
        })?;

        let mut result = BTreeMap::new();
        for row in rows {
            let (category, count) = row?;
            result.insert(category, count);
        }
        Ok(result)
    }

    fn map_job(row: &Row) -> Result<CategorizedListing, rusqlite::Error> {
        let details: Option<String> = row.get(6)?;
        let heuristic: Option<String> = row.get(7)?;
        let collected_at: String = row.get(8)?;

        let details = details
            .map(|d| serde_json::from_str::<JobDetails>(&d))
            .transpose()
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
            })?;
        let heuristic = heuristic
            .map(|h| serde_json::from_str::<Heuristic>(&h))
            .transpose()
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
            })?;
        let collected_at: DateTime<Utc> = collected_at.parse().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(CategorizedListing {
            listing: RawListing {
                link: row.get(0)?,
                title: row.get(1)?,
                source: row.get(2)?,
                description: row.get(4)?,
                deadline: row.get(5)?,
            },
            category: row.get(3)?,
            details,
            heuristic,
            collected_at,
        })
    }
}

fn insert_job(conn: &Connection, job: &CategorizedListing) -> Result<bool, StorageError> {
    let details = job.details.as_ref().map(serde_json::to_string).transpose()?;
    let heuristic = job.heuristic.as_ref().map(serde_json::to_string).transpose()?;
    let inserted = conn.execute(
        &format!(
            "INSERT OR IGNORE INTO jobs ({JOB_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
        ),
        params![
            job.listing.key(),
            &job.listing.title,
            &job.listing.source,
            &job.category,
            &job.listing.description,
            &job.listing.deadline,
            details,
            heuristic,
            job.collected_at.to_rfc3339(),
        ],
    )?;
    Ok(inserted > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn job(title: &str, link: Option<&str>, category: &str) -> CategorizedListing {
        CategorizedListing {
            listing: RawListing {
                title: title.to_string(),
                description: Some("desc".into()),
                link: link.map(str::to_string),
                deadline: None,
                source: "test".into(),
            },
            heuristic: Some(Heuristic {
                keyword_hits: vec!["python".into()],
                fuzzy_score: 100.0,
                fuzzy_keyword: Some("python".into()),
                combined_score: 1.0,
            }),
            details: Some(JobDetails {
                company: Some("Acme".into()),
                skills: vec!["Rust".into()],
                ..JobDetails::default()
            }),
            category: category.to_string(),
            collected_at: Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    #[test]
    fn test_save_and_reload_round_trips_metadata() {
        let storage = SqliteStorage::in_memory().unwrap();
        let original = job("Python Developer", Some("https://a/1"), "Software Engineering");
        assert!(storage.save_job(&original).unwrap());

        let all = storage.all_jobs().unwrap();
        assert_eq!(all, vec![original]);
    }

    #[test]
    fn test_duplicate_key_ignored() {
        let storage = SqliteStorage::in_memory().unwrap();
        assert!(storage.save_job(&job("A", Some("k"), "X")).unwrap());
        assert!(!storage.save_job(&job("B", Some("k"), "Y")).unwrap());
        assert!(storage.contains_key("k").unwrap());
        assert!(!storage.contains_key("other").unwrap());
        assert_eq!(storage.all_jobs().unwrap().len(), 1);
    }

    #[test]
    fn test_jobs_without_key_are_all_kept() {
        let mut storage = SqliteStorage::in_memory().unwrap();
        let saved = storage
            .save_jobs(&[job("A", None, "X"), job("B", None, "X")])
            .unwrap();
        assert_eq!(saved, 2);
        assert!(storage.known_keys().unwrap().is_empty());
    }

    #[test]
    fn test_known_keys_and_counts() {
        let mut storage = SqliteStorage::in_memory().unwrap();
        storage
            .save_jobs(&[
                job("A", Some("1"), "Data & AI"),
                job("B", Some("2"), "Data & AI"),
                job("C", Some("3"), "QA & Testing"),
            ])
            .unwrap();
        let keys = storage.known_keys().unwrap();
        assert_eq!(keys.len(), 3);
        assert!(keys.contains("2"));
        let counts = storage.category_counts().unwrap();
        assert_eq!(counts.get("Data & AI"), Some(&2));
        assert_eq!(counts.get("QA & Testing"), Some(&1));
    }

    #[test]
    fn test_reopen_file_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.db");
        {
            let storage = SqliteStorage::new(&path).unwrap();
            storage.save_job(&job("A", Some("1"), "X")).unwrap();
        }
        let storage = SqliteStorage::new(&path).unwrap();
        assert!(storage.contains_key("1").unwrap());
    }
}
