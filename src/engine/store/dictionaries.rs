// ── Lexicon Store: Dictionaries ────────────────────────────────────────────
// Dictionary import, listing, enable/disable, cascade deletion, and
// full-text search.
//
// Import contract: payloads are validated before any transaction opens, the
// whole import runs in one transaction, and any failure rolls back fully —
// no partial words, definitions, or FTS rows survive.

use super::{fts_tags, join_tags, split_tags, LexiconStore};
use crate::atoms::error::{EngineError, EngineResult};
use crate::atoms::types::{
    DictionaryMeta, DictionaryStatus, EntryKind, ExampleRef, ImportProgress, ImportedDictionary,
    ImportedEntry, KanjiEntry, SearchResult,
};
use crate::atoms::constants::SEARCH_RESULT_LIMIT;
use log::info;
use rusqlite::{params, Connection, OptionalExtension};

/// Callback invoked after each processed entry of a long import.
pub type ProgressFn<'a> = &'a mut dyn FnMut(ImportProgress);

impl LexiconStore {
    /// Import a dictionary: upsert its metadata, then every entry, in one
    /// transaction. Term entries get a word row, definition rows, and an FTS
    /// row; kanji entries are stored for retrieval only.
    pub fn import_dictionary(
        &self,
        meta: &DictionaryMeta,
        entries: &[ImportedEntry],
        mut on_progress: Option<ProgressFn<'_>>,
    ) -> EngineResult<()> {
        // Validation happens before the transaction opens: a malformed
        // payload must leave the store untouched.
        for entry in entries {
            if entry.expression.is_empty() {
                return Err(EngineError::validation(
                    "dictionary entry is missing its expression",
                ));
            }
        }

        info!(
            "[store] Importing dictionary '{}' ({} entries)",
            meta.title,
            entries.len()
        );

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT OR REPLACE INTO dictionaries (title, format, revision, sequenced)
             VALUES (?1, ?2, ?3, ?4)",
            params![meta.title, meta.format, meta.revision, meta.sequenced],
        )?;

        let total = entries.len();
        for (index, entry) in entries.iter().enumerate() {
            match entry.kind {
                EntryKind::Term => insert_term_entry(&tx, meta, entry)?,
                EntryKind::Kanji => insert_kanji_entry(&tx, meta, entry)?,
            }

            if let Some(progress) = on_progress.as_deref_mut() {
                progress(ImportProgress::at(index + 1, total));
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// Parse and validate a JSON dictionary payload, then import it.
    /// Missing readings default to the expression.
    pub fn import_from_json(
        &self,
        content: &str,
        on_progress: Option<ProgressFn<'_>>,
    ) -> EngineResult<()> {
        let parsed: ImportedDictionary = serde_json::from_str(content)
            .map_err(|e| EngineError::validation(format!("invalid dictionary file: {e}")))?;

        if parsed.format == 0 || parsed.title.is_empty() {
            return Err(EngineError::validation(
                "dictionary payload requires a non-zero format and a title",
            ));
        }

        let entries: Vec<ImportedEntry> = parsed
            .entries
            .into_iter()
            .map(|mut entry| {
                if entry.reading.is_none() {
                    entry.reading = Some(entry.expression.clone());
                }
                entry
            })
            .collect();

        let meta = DictionaryMeta {
            title: parsed.title,
            format: parsed.format,
            revision: parsed.revision,
            sequenced: parsed.sequenced.unwrap_or(false),
        };
        self.import_dictionary(&meta, &entries, on_progress)
    }

    /// Every dictionary with its computed entry count.
    pub fn list_dictionaries(&self) -> EngineResult<Vec<DictionaryStatus>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT d.title, d.format, d.revision, d.enabled, COUNT(w.id)
             FROM dictionaries d
             LEFT JOIN words w ON w.dictionary = d.title
             GROUP BY d.title",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(DictionaryStatus {
                title: row.get(0)?,
                format: row.get(1)?,
                revision: row.get(2)?,
                enabled: row.get::<_, i64>(3)? != 0,
                entry_count: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// Toggle a dictionary's visibility. Disabled dictionaries are excluded
    /// from search but keep their rows.
    pub fn set_dictionary_enabled(&self, title: &str, enabled: bool) -> EngineResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE dictionaries SET enabled = ?1 WHERE title = ?2",
            params![enabled, title],
        )?;
        Ok(())
    }

    /// Delete a dictionary and everything it owns, then rebuild the FTS
    /// index from the remaining words. The wholesale rebuild is O(remaining
    /// entries) and guarantees no stale index rows survive the cascade.
    pub fn delete_dictionary(&self, title: &str) -> EngineResult<()> {
        info!("[store] Deleting dictionary '{}'", title);
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM word_examples WHERE example_id IN (
                 SELECT id FROM examples WHERE word_id IN (
                     SELECT id FROM words WHERE dictionary = ?1))",
            [title],
        )?;
        tx.execute(
            "DELETE FROM examples WHERE word_id IN (
                 SELECT id FROM words WHERE dictionary = ?1)",
            [title],
        )?;
        tx.execute(
            "DELETE FROM definitions WHERE word_id IN (
                 SELECT id FROM words WHERE dictionary = ?1)",
            [title],
        )?;
        tx.execute("DELETE FROM words WHERE dictionary = ?1", [title])?;
        tx.execute("DELETE FROM kanji_entries WHERE dictionary = ?1", [title])?;
        tx.execute("DELETE FROM dictionaries WHERE title = ?1", [title])?;

        tx.execute("DELETE FROM word_fts", [])?;
        tx.execute(
            "INSERT INTO word_fts (word, reading, definition, tags)
             SELECT w.word, w.reading, GROUP_CONCAT(d.definition, ' '),
                    REPLACE(COALESCE(w.tags, ''), ',', ' ')
             FROM words w
             LEFT JOIN definitions d ON w.id = d.word_id
             GROUP BY w.id",
            [],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// Full-text search over enabled dictionaries, ranked by frequency
    /// (unknown frequencies last), capped at 50 results.
    pub fn search(&self, query: &str) -> EngineResult<Vec<SearchResult>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT w.id, w.word, w.reading, w.pos, w.frequency, w.dictionary, w.tags
             FROM word_fts fts
             JOIN words w ON w.word = fts.word
             JOIN dictionaries dict ON w.dictionary = dict.title
             WHERE word_fts MATCH ?1 AND dict.enabled = 1
             GROUP BY w.id
             ORDER BY w.frequency DESC NULLS LAST
             LIMIT ?2",
        )?;
        let base: Vec<SearchResult> = stmt
            .query_map(params![query, SEARCH_RESULT_LIMIT], map_word_row)?
            .collect::<Result<_, _>>()?;

        base.into_iter()
            .map(|mut result| {
                result.definitions = word_definitions(&conn, &result.id)?;
                result.examples = word_example_refs(&conn, &result.id)?;
                Ok(result)
            })
            .collect()
    }

    /// Persist a single word (e.g. one picked from remote search results)
    /// with its definitions and example pairs.
    pub fn add_word(&self, word: &SearchResult) -> EngineResult<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT OR REPLACE INTO words (id, word, reading, pos, frequency, dictionary, tags)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                word.id,
                word.word,
                word.reading,
                word.pos,
                word.frequency,
                word.dictionary,
                join_tags(&word.tags)
            ],
        )?;

        for definition in &word.definitions {
            tx.execute(
                "INSERT INTO definitions (word_id, definition) VALUES (?1, ?2)",
                params![word.id, definition],
            )?;
        }

        for example in &word.examples {
            tx.execute(
                "INSERT INTO examples (word_id, japanese, english) VALUES (?1, ?2, ?3)",
                params![word.id, example.japanese, example.english],
            )?;
        }

        tx.execute(
            "INSERT INTO word_fts (word, reading, definition, tags) VALUES (?1, ?2, ?3, ?4)",
            params![
                word.word,
                word.reading,
                word.definitions.join(" "),
                fts_tags(&word.tags)
            ],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// Kanji-typed entries of one dictionary.
    pub fn get_kanji_entries(&self, dictionary: &str) -> EngineResult<Vec<KanjiEntry>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT dictionary, expression, definitions, tags
             FROM kanji_entries WHERE dictionary = ?1 ORDER BY expression",
        )?;
        let rows = stmt.query_map([dictionary], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (dictionary, expression, definitions, tags) = row?;
            entries.push(KanjiEntry {
                dictionary,
                expression,
                definitions: serde_json::from_str(&definitions)?,
                tags: tags
                    .map(|t| serde_json::from_str(&t))
                    .transpose()?
                    .unwrap_or_default(),
            });
        }
        Ok(entries)
    }
}

fn insert_term_entry(
    conn: &Connection,
    meta: &DictionaryMeta,
    entry: &ImportedEntry,
) -> EngineResult<()> {
    let word_id = format!(
        "{}:{}:{}",
        meta.title,
        entry.expression,
        entry.reading.as_deref().unwrap_or("")
    );

    conn.execute(
        "INSERT OR REPLACE INTO words (id, word, reading, dictionary, tags)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            word_id,
            entry.expression,
            entry.reading,
            meta.title,
            join_tags(&entry.tags)
        ],
    )?;

    for definition in &entry.definitions {
        conn.execute(
            "INSERT INTO definitions (word_id, definition) VALUES (?1, ?2)",
            params![word_id, definition],
        )?;
    }

    conn.execute(
        "INSERT INTO word_fts (word, reading, definition, tags) VALUES (?1, ?2, ?3, ?4)",
        params![
            entry.expression,
            entry.reading,
            entry.definitions.join(" "),
            fts_tags(&entry.tags)
        ],
    )?;
    Ok(())
}

fn insert_kanji_entry(
    conn: &Connection,
    meta: &DictionaryMeta,
    entry: &ImportedEntry,
) -> EngineResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO kanji_entries (dictionary, expression, definitions, tags)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            meta.title,
            entry.expression,
            serde_json::to_string(&entry.definitions)?,
            serde_json::to_string(&entry.tags)?
        ],
    )?;
    Ok(())
}

// ── Row mapping helpers (shared with tag search) ───────────────────────────

pub(crate) fn map_word_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SearchResult> {
    Ok(SearchResult {
        id: row.get(0)?,
        word: row.get(1)?,
        reading: row.get(2)?,
        pos: row.get(3)?,
        frequency: row.get(4)?,
        dictionary: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        tags: split_tags(row.get(6)?),
        definitions: Vec::new(),
        examples: Vec::new(),
    })
}

pub(crate) fn word_definitions(conn: &Connection, word_id: &str) -> EngineResult<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT DISTINCT definition FROM definitions WHERE word_id = ?1")?;
    let rows = stmt.query_map([word_id], |row| row.get(0))?;
    Ok(rows.collect::<Result<_, _>>()?)
}

pub(crate) fn word_example_refs(conn: &Connection, word_id: &str) -> EngineResult<Vec<ExampleRef>> {
    let mut stmt = conn.prepare("SELECT japanese, english FROM examples WHERE word_id = ?1")?;
    let rows = stmt.query_map([word_id], |row| {
        Ok(ExampleRef {
            japanese: row.get(0)?,
            english: row.get(1)?,
        })
    })?;
    Ok(rows.collect::<Result<_, _>>()?)
}

/// Whether any FTS row still references the given word surface.
/// Test hook for cascade-deletion verification.
#[allow(dead_code)]
pub(crate) fn fts_contains(conn: &Connection, word: &str) -> EngineResult<bool> {
    let hit: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM word_fts WHERE word_fts MATCH ?1 LIMIT 1",
            [word],
            |row| row.get(0),
        )
        .optional()?;
    Ok(hit.is_some())
}
