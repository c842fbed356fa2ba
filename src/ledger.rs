//! Durable prediction ledger
//!
//! Every inference attempt is appended as one row to an SQLite table. Rows are
//! never updated or deleted by the gateway.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use crate::error::Result;
use crate::model::FeatureVector;

/// Prediction value recorded when inference itself failed
pub const NO_PREDICTION: i64 = -1;

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS predictions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ts TEXT NOT NULL,
    sepal_length REAL NOT NULL,
    sepal_width  REAL NOT NULL,
    petal_length REAL NOT NULL,
    petal_width  REAL NOT NULL,
    prediction   INTEGER NOT NULL,
    latency_ms   REAL NOT NULL
)
"#;

const INSERT: &str = r#"
INSERT INTO predictions
    (ts, sepal_length, sepal_width, petal_length, petal_width, prediction, latency_ms)
VALUES (?, ?, ?, ?, ?, ?, ?)
"#;

/// One inference attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRecord {
    /// ISO-8601 UTC timestamp
    pub ts: String,
    pub features: FeatureVector,
    /// Class id, or [`NO_PREDICTION`]
    pub prediction: i64,
    pub latency_ms: f64,
}

/// A record read back with its surrogate id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    pub id: i64,
    #[serde(flatten)]
    pub record: PredictionRecord,
}

/// Append-only SQLite store of prediction records
#[derive(Clone)]
pub struct Ledger {
    pool: SqlitePool,
    path: PathBuf,
}

impl Ledger {
    /// Open (creating if needed) the ledger database and ensure the schema
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        let ledger = Self { pool, path };
        ledger.init().await?;
        tracing::debug!("Prediction ledger ready at {}", ledger.path.display());
        Ok(ledger)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the predictions table if missing; idempotent
    pub async fn init(&self) -> Result<()> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    /// Persist one record, returning its id
    pub async fn append(&self, record: &PredictionRecord) -> Result<i64> {
        let result = sqlx::query(INSERT)
            .bind(record.ts.as_str())
            .bind(record.features.sepal_length)
            .bind(record.features.sepal_width)
            .bind(record.features.petal_length)
            .bind(record.features.petal_width)
            .bind(record.prediction)
            .bind(record.latency_ms)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Most recent records, newest first
    pub async fn recent(&self, limit: u32) -> Result<Vec<LedgerEntry>> {
        let rows = sqlx::query(
            "SELECT id, ts, sepal_length, sepal_width, petal_length, petal_width, prediction, latency_ms \
             FROM predictions ORDER BY id DESC LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<LedgerEntry> {
                Ok(LedgerEntry {
                    id: row.try_get("id")?,
                    record: PredictionRecord {
                        ts: row.try_get("ts")?,
                        features: FeatureVector {
                            sepal_length: row.try_get("sepal_length")?,
                            sepal_width: row.try_get("sepal_width")?,
                            petal_length: row.try_get("petal_length")?,
                            petal_width: row.try_get("petal_width")?,
                        },
                        prediction: row.try_get("prediction")?,
                        latency_ms: row.try_get("latency_ms")?,
                    },
                })
            })
            .collect()
    }

    /// Total number of records
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM predictions")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Close all pooled connections
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
