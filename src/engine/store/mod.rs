// Yomikata Engine — Lexicon Store
// Durable dictionary data in SQLite via rusqlite, with an FTS5 index over
// word, reading, definitions, and tags.
//
// Module layout:
//   schema        — idempotent migrations + default tag-group seeding
//   dictionaries  — dictionary import/list/enable/delete + full-text search
//   frequency     — frequency lists, raw file parsing, max-wins updates
//   tags          — tag groups and per-word tag set arithmetic
//   proficiency   — manual and frequency-derived JLPT assignments
//   examples      — example sentences, positional word links, cached metrics
//
// Concurrency: one connection behind a Mutex. Multi-statement writes run in
// rusqlite transactions — all-or-nothing, rollback on drop — so readers
// never observe a half-committed import or cascade.

use crate::atoms::error::EngineResult;
use log::info;
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::Path;

mod dictionaries;
mod examples;
mod frequency;
mod proficiency;
mod schema;
mod tags;

pub use dictionaries::ProgressFn;
pub use frequency::parse_frequency_file;

/// Thread-safe lexicon database wrapper.
pub struct LexiconStore {
    /// The SQLite connection, protected by a Mutex.
    pub(crate) conn: Mutex<Connection>,
}

impl LexiconStore {
    /// Open (or create) the lexicon database and initialize the schema.
    /// Construction is the initialization point: every handle is ready by
    /// value, so no operation can observe a half-built schema.
    pub fn open(path: impl AsRef<Path>) -> EngineResult<Self> {
        info!("[store] Opening lexicon store at {:?}", path.as_ref());
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// In-memory store, used by tests and throwaway sessions.
    pub fn open_in_memory() -> EngineResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> EngineResult<Self> {
        conn.execute_batch("PRAGMA journal_mode=WAL;").ok();
        schema::run_migrations(&conn)?;
        Ok(LexiconStore {
            conn: Mutex::new(conn),
        })
    }
}

// ── Tag column serialization ───────────────────────────────────────────────
// `words.tags` is a comma-joined set; the FTS copy is space-joined so each
// tag is a match token. JSON columns elsewhere go through serde.

pub(crate) fn join_tags(tags: &[String]) -> Option<String> {
    if tags.is_empty() {
        None
    } else {
        Some(tags.join(","))
    }
}

pub(crate) fn split_tags(column: Option<String>) -> Vec<String> {
    column
        .map(|s| {
            s.split(',')
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn fts_tags(tags: &[String]) -> String {
    tags.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_column_round_trip() {
        let tags = vec!["common".to_string(), "jlpt-n5".to_string()];
        assert_eq!(join_tags(&tags).as_deref(), Some("common,jlpt-n5"));
        assert_eq!(split_tags(join_tags(&tags)), tags);
        assert_eq!(join_tags(&[]), None);
        assert!(split_tags(None).is_empty());
    }

    #[test]
    fn test_open_in_memory_initializes_schema() {
        let store = LexiconStore::open_in_memory().unwrap();
        let conn = store.conn.lock();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM tag_groups", [], |r| r.get(0))
            .unwrap();
        assert!(count > 0, "default tag groups must be seeded");
    }
}
