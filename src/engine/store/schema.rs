// ── Lexicon Store: Database Schema ─────────────────────────────────────────
//
// Tables:
//   - dictionaries: one row per imported dictionary, with enable/priority
//   - words / definitions: term entries, keyed dictionary:expression:reading
//   - kanji_entries: kanji-typed entries, stored for retrieval only
//   - examples / word_examples: sentences + positional word links
//   - frequency_lists / word_frequencies: corpus frequency data per list
//   - tag_groups / tag_group_entries: tag taxonomy
//   - proficiency_assignments: one JLPT tier per word
//   - word_fts: FTS5 index over word, reading, definition, tags
//
// All statements are idempotent (CREATE IF NOT EXISTS / INSERT OR IGNORE),
// so migrations and the default tag seeding can run on every open.

use crate::atoms::constants::DEFAULT_TAG_GROUPS;
use crate::atoms::error::EngineResult;
use log::info;
use rusqlite::Connection;

/// Run schema migrations and seed the default tag taxonomy.
pub fn run_migrations(conn: &Connection) -> EngineResult<()> {
    info!("[store] Running schema migrations");

    conn.execute_batch(LEXICON_SCHEMA)?;
    seed_default_tag_groups(conn)?;

    info!("[store] Schema migrations complete");
    Ok(())
}

/// Insert the default tag groups and their tags, skipping rows that already
/// exist. Running this twice yields the same tag set.
fn seed_default_tag_groups(conn: &Connection) -> EngineResult<()> {
    let mut group_stmt =
        conn.prepare("INSERT OR IGNORE INTO tag_groups (name, description) VALUES (?1, ?2)")?;
    let mut tag_stmt = conn
        .prepare("INSERT OR IGNORE INTO tag_group_entries (group_name, tag) VALUES (?1, ?2)")?;

    for (name, description, tags) in DEFAULT_TAG_GROUPS {
        group_stmt.execute([name, description])?;
        for &tag in tags {
            tag_stmt.execute([name, tag])?;
        }
    }
    Ok(())
}

const LEXICON_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS dictionaries (
        title TEXT PRIMARY KEY,
        format INTEGER NOT NULL,
        revision TEXT NOT NULL,
        sequenced INTEGER NOT NULL DEFAULT 0,
        enabled INTEGER NOT NULL DEFAULT 1,
        priority INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS words (
        id TEXT PRIMARY KEY,
        word TEXT NOT NULL,
        reading TEXT,
        pos TEXT,
        frequency REAL,
        frequency_source TEXT,
        dictionary TEXT,
        tags TEXT,
        FOREIGN KEY (dictionary) REFERENCES dictionaries(title)
    );

    CREATE TABLE IF NOT EXISTS definitions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        word_id TEXT,
        definition TEXT NOT NULL,
        tags TEXT,
        FOREIGN KEY (word_id) REFERENCES words(id)
    );

    CREATE TABLE IF NOT EXISTS kanji_entries (
        dictionary TEXT NOT NULL,
        expression TEXT NOT NULL,
        definitions TEXT NOT NULL,
        tags TEXT,
        PRIMARY KEY (dictionary, expression),
        FOREIGN KEY (dictionary) REFERENCES dictionaries(title)
    );

    CREATE TABLE IF NOT EXISTS examples (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        word_id TEXT,
        japanese TEXT NOT NULL,
        english TEXT NOT NULL,
        source TEXT,
        tags TEXT,
        words TEXT,
        complexity_metrics TEXT,
        jlpt_level TEXT,
        grammar_points TEXT,
        FOREIGN KEY (word_id) REFERENCES words(id)
    );

    CREATE TABLE IF NOT EXISTS word_examples (
        word TEXT NOT NULL,
        example_id INTEGER NOT NULL,
        position INTEGER,
        reading TEXT,
        pos TEXT,
        basic_form TEXT,
        PRIMARY KEY (word, example_id),
        FOREIGN KEY (example_id) REFERENCES examples(id)
    );

    CREATE TABLE IF NOT EXISTS frequency_lists (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        priority INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS word_frequencies (
        word TEXT NOT NULL,
        frequency_list_id TEXT NOT NULL,
        rank INTEGER,
        frequency REAL,
        PRIMARY KEY (word, frequency_list_id),
        FOREIGN KEY (frequency_list_id) REFERENCES frequency_lists(id)
    );

    CREATE TABLE IF NOT EXISTS tag_groups (
        name TEXT PRIMARY KEY,
        description TEXT,
        priority INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS tag_group_entries (
        group_name TEXT NOT NULL,
        tag TEXT NOT NULL,
        PRIMARY KEY (group_name, tag),
        FOREIGN KEY (group_name) REFERENCES tag_groups(name)
    );

    CREATE TABLE IF NOT EXISTS proficiency_assignments (
        word TEXT PRIMARY KEY,
        level TEXT NOT NULL,
        confidence REAL NOT NULL DEFAULT 1.0,
        source TEXT
    );

    CREATE VIRTUAL TABLE IF NOT EXISTS word_fts USING fts5(
        word,
        reading,
        definition,
        tags
    );

    CREATE INDEX IF NOT EXISTS idx_words_word ON words(word);
    CREATE INDEX IF NOT EXISTS idx_words_reading ON words(reading);
    CREATE INDEX IF NOT EXISTS idx_words_dictionary ON words(dictionary);
    CREATE INDEX IF NOT EXISTS idx_word_frequencies_word ON word_frequencies(word);
    CREATE INDEX IF NOT EXISTS idx_proficiency_level ON proficiency_assignments(level);
    CREATE INDEX IF NOT EXISTS idx_tag_group_entries_tag ON tag_group_entries(tag);
    CREATE INDEX IF NOT EXISTS idx_word_examples_word ON word_examples(word);
";
