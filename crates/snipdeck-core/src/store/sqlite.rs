//! SQLite snippet store.
//!
//! Snippets, their review state, and their embeddings share one row; the
//! review state has no identity of its own and disappears with the snippet.
//! Cosine distance is computed in Rust over the owner's embedded rows.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use ordered_float::OrderedFloat;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{ErrorCode, SnipError, SnipResult};
use crate::traits::{DistanceHit, SnippetStore};
use crate::types::{latest_review_at, title_contains, MemoryState, ReviewItem, Snippet, SnippetSummary, DEFAULT_EASINESS};

const SUMMARY_COLUMNS: &str = "id, title, language, updated_at";

const SNIPPET_COLUMNS: &str = "id, owner_id, title, language, code, notes, created_at, updated_at, \
     reviewable, interval_days, repetitions, easiness_factor, next_review_at, last_reviewed_at, embedding";

/// SQLite-backed [`SnippetStore`].
pub struct SqliteSnippetStore {
    conn: Mutex<Connection>,
}

impl SqliteSnippetStore {
    /// Open (or create) a store at the given database path.
    pub fn open<P: AsRef<Path>>(path: P) -> SnipResult<Self> {
        let conn = Connection::open(path.as_ref()).map_err(|e| SnipError::Storage {
            message: format!("Failed to open SQLite database: {}", e),
            code: ErrorCode::DbConnectionFailed,
            source: Some(Box::new(e)),
        })?;
        tracing::info!(path = %path.as_ref().display(), "opened snippet store");
        Self::with_connection(conn)
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> SnipResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> SnipResult<Self> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn lock(&self) -> SnipResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| SnipError::storage(e.to_string()))
    }

    fn init_schema(&self) -> SnipResult<()> {
        let conn = self.lock()?;

        conn.execute_batch(&format!(
            "
            CREATE TABLE IF NOT EXISTS snippets (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                title TEXT NOT NULL,
                language TEXT,
                code TEXT NOT NULL,
                notes TEXT NOT NULL DEFAULT 'null',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                reviewable INTEGER NOT NULL DEFAULT 0,
                interval_days INTEGER NOT NULL DEFAULT 0,
                repetitions INTEGER NOT NULL DEFAULT 0,
                easiness_factor REAL NOT NULL DEFAULT {},
                next_review_at TEXT,
                last_reviewed_at TEXT,
                embedding TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_snippets_owner_updated ON snippets(owner_id, updated_at);
            CREATE INDEX IF NOT EXISTS idx_snippets_owner_next_review ON snippets(owner_id, reviewable, next_review_at);
            ",
            DEFAULT_EASINESS
        ))?;

        Ok(())
    }

    fn summaries_by_recency(&self, owner_id: &str) -> SnipResult<Vec<SnippetSummary>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM snippets WHERE owner_id = ?1 ORDER BY updated_at DESC, id ASC",
            SUMMARY_COLUMNS
        ))?;
        let rows = stmt
            .query_map(params![owner_id], read_summary)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

#[async_trait]
impl SnippetStore for SqliteSnippetStore {
    async fn insert(&self, snippet: &Snippet) -> SnipResult<()> {
        let conn = self.lock()?;
        let state = snippet.review.clone().unwrap_or_default();
        let embedding = snippet.embedding.as_ref().map(serde_json::to_string).transpose()?;

        conn.execute(
            &format!(
                "INSERT INTO snippets ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                SNIPPET_COLUMNS
            ),
            params![
                snippet.id,
                snippet.owner_id,
                snippet.title,
                snippet.language,
                snippet.code,
                serde_json::to_string(&snippet.notes)?,
                ts(snippet.created_at),
                ts(snippet.updated_at),
                snippet.review.is_some(),
                state.interval_days,
                state.repetitions,
                state.easiness_factor,
                state.next_review_at.map(ts),
                state.last_reviewed_at.map(ts),
                embedding,
            ],
        )?;

        Ok(())
    }

    async fn get(&self, owner_id: &str, id: &str) -> SnipResult<Option<Snippet>> {
        let conn = self.lock()?;
        let snippet = conn
            .query_row(
                &format!("SELECT {} FROM snippets WHERE owner_id = ?1 AND id = ?2", SNIPPET_COLUMNS),
                params![owner_id, id],
                read_snippet,
            )
            .optional()?;
        Ok(snippet)
    }

    async fn update_content(
        &self,
        owner_id: &str,
        id: &str,
        title: &str,
        code: &str,
        language: Option<&str>,
        updated_at: DateTime<Utc>,
    ) -> SnipResult<bool> {
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE snippets
             SET title = ?1, code = ?2, language = ?3, updated_at = ?4, embedding = NULL
             WHERE owner_id = ?5 AND id = ?6",
            params![title, code, language, ts(updated_at), owner_id, id],
        )?;
        Ok(updated > 0)
    }

    async fn delete(&self, owner_id: &str, id: &str) -> SnipResult<bool> {
        let conn = self.lock()?;
        let deleted = conn.execute(
            "DELETE FROM snippets WHERE owner_id = ?1 AND id = ?2",
            params![owner_id, id],
        )?;
        Ok(deleted > 0)
    }

    async fn set_embedding(&self, owner_id: &str, id: &str, embedding: &[f32]) -> SnipResult<bool> {
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE snippets SET embedding = ?1 WHERE owner_id = ?2 AND id = ?3",
            params![serde_json::to_string(embedding)?, owner_id, id],
        )?;
        Ok(updated > 0)
    }

    async fn enable_review(&self, owner_id: &str, id: &str, state: &MemoryState) -> SnipResult<bool> {
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE snippets
             SET reviewable = 1, interval_days = ?1, repetitions = ?2, easiness_factor = ?3,
                 next_review_at = ?4, last_reviewed_at = ?5
             WHERE owner_id = ?6 AND id = ?7 AND reviewable = 0",
            params![
                state.interval_days,
                state.repetitions,
                state.easiness_factor,
                state.next_review_at.map(ts),
                state.last_reviewed_at.map(ts),
                owner_id,
                id,
            ],
        )?;
        Ok(updated > 0)
    }

    async fn disable_review(&self, owner_id: &str, id: &str) -> SnipResult<bool> {
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE snippets
             SET reviewable = 0, interval_days = 0, repetitions = 0, easiness_factor = ?1,
                 next_review_at = NULL, last_reviewed_at = NULL
             WHERE owner_id = ?2 AND id = ?3 AND reviewable = 1",
            params![DEFAULT_EASINESS, owner_id, id],
        )?;
        Ok(updated > 0)
    }

    async fn review_items(&self, owner_id: &str) -> SnipResult<Vec<ReviewItem>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, interval_days, repetitions, easiness_factor, next_review_at, last_reviewed_at
             FROM snippets
             WHERE owner_id = ?1 AND reviewable = 1
             ORDER BY id ASC",
        )?;

        let items = stmt
            .query_map(params![owner_id], |row| {
                Ok(ReviewItem {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    state: MemoryState {
                        interval_days: row.get(2)?,
                        repetitions: row.get(3)?,
                        easiness_factor: row.get(4)?,
                        next_review_at: parse_optional_ts(row, 5)?,
                        last_reviewed_at: parse_optional_ts(row, 6)?,
                    },
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    async fn save_review_state(&self, owner_id: &str, id: &str, state: &MemoryState) -> SnipResult<bool> {
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE snippets
             SET interval_days = ?1, repetitions = ?2, easiness_factor = ?3,
                 next_review_at = ?4, last_reviewed_at = ?5
             WHERE owner_id = ?6 AND id = ?7 AND reviewable = 1",
            params![
                state.interval_days,
                state.repetitions,
                state.easiness_factor,
                state.next_review_at.map(ts),
                state.last_reviewed_at.map(ts),
                owner_id,
                id,
            ],
        )?;
        Ok(updated > 0)
    }

    async fn nearest(&self, owner_id: &str, query_vector: &[f32], limit: usize) -> SnipResult<Vec<DistanceHit>> {
        let rows: Vec<(SnippetSummary, String)> = {
            let conn = self.lock()?;
            let mut stmt = conn.prepare(&format!(
                "SELECT {}, embedding FROM snippets WHERE owner_id = ?1 AND embedding IS NOT NULL",
                SUMMARY_COLUMNS
            ))?;
            let rows = stmt
                .query_map(params![owner_id], |row| Ok((read_summary(row)?, row.get::<_, String>(4)?)))?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };

        let mut hits = Vec::with_capacity(rows.len());
        for (snippet, embedding_json) in rows {
            let embedding: Vec<f32> = serde_json::from_str(&embedding_json).map_err(|e| SnipError::Storage {
                message: format!("Corrupt embedding for snippet '{}': {}", snippet.id, e),
                code: ErrorCode::DbCorruptRow,
                source: Some(Box::new(e)),
            })?;

            if embedding.len() != query_vector.len() {
                tracing::warn!(
                    snippet_id = %snippet.id,
                    stored = embedding.len(),
                    query = query_vector.len(),
                    "skipping embedding with mismatched dimension"
                );
                continue;
            }

            hits.push(DistanceHit {
                distance: cosine_distance(query_vector, &embedding),
                snippet,
            });
        }

        hits.sort_by(|a, b| {
            OrderedFloat(a.distance)
                .cmp(&OrderedFloat(b.distance))
                .then_with(|| b.snippet.updated_at.cmp(&a.snippet.updated_at))
                .then_with(|| a.snippet.id.cmp(&b.snippet.id))
        });
        hits.truncate(limit);
        Ok(hits)
    }

    async fn title_matches(&self, owner_id: &str, query: &str, limit: usize) -> SnipResult<Vec<SnippetSummary>> {
        Ok(self
            .summaries_by_recency(owner_id)?
            .into_iter()
            .filter(|s| title_contains(&s.title, query))
            .take(limit)
            .collect())
    }

    async fn recent(&self, owner_id: &str, limit: usize) -> SnipResult<Vec<SnippetSummary>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM snippets WHERE owner_id = ?1 ORDER BY updated_at DESC, id ASC LIMIT ?2",
            SUMMARY_COLUMNS
        ))?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map(params![owner_id, limit], read_summary)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

/// Cosine distance `1 - cos(a, b)`, in [0, 2], accumulated in `f64`.
///
/// A zero vector is treated as orthogonal to everything (distance 1).
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    let (mut dot, mut norm_a, mut norm_b) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    (1.0 - dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 2.0)
}

/// Fixed-width UTC timestamps so text ordering matches time ordering.
///
/// Instants past [`latest_review_at`] are clamped so every stored value
/// parses back.
fn ts(dt: DateTime<Utc>) -> String {
    dt.min(latest_review_at()).to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_ts(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_optional_ts(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

fn read_summary(row: &Row<'_>) -> rusqlite::Result<SnippetSummary> {
    Ok(SnippetSummary {
        id: row.get(0)?,
        title: row.get(1)?,
        language: row.get(2)?,
        updated_at: parse_ts(row, 3)?,
    })
}

fn read_snippet(row: &Row<'_>) -> rusqlite::Result<Snippet> {
    let notes_json: String = row.get(5)?;
    let notes = serde_json::from_str(&notes_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    let reviewable: bool = row.get(8)?;
    let review = if reviewable {
        Some(MemoryState {
            interval_days: row.get(9)?,
            repetitions: row.get(10)?,
            easiness_factor: row.get(11)?,
            next_review_at: parse_optional_ts(row, 12)?,
            last_reviewed_at: parse_optional_ts(row, 13)?,
        })
    } else {
        None
    };

    let embedding_json: Option<String> = row.get(14)?;
    let embedding = embedding_json
        .map(|s| serde_json::from_str::<Vec<f32>>(&s))
        .transpose()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(14, Type::Text, Box::new(e)))?;

    Ok(Snippet {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        language: row.get(3)?,
        code: row.get(4)?,
        notes,
        created_at: parse_ts(row, 6)?,
        updated_at: parse_ts(row, 7)?,
        review,
        embedding,
    })
}
