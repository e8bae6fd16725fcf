// ── Lexicon Store: Proficiency Assignments ─────────────────────────────────
// One JLPT tier per word, replace semantics. Manual assignment overwrites;
// auto-assignment only touches words with no existing assignment, deriving
// the tier from frequency bands.

use super::tags::add_tags_on;
use super::LexiconStore;
use crate::atoms::constants::{AUTO_ASSIGN_BANDS, AUTO_ASSIGN_CONFIDENCE, AUTO_ASSIGN_SOURCE};
use crate::atoms::error::EngineResult;
use crate::atoms::types::{JlptLevel, ProficiencyAssignment};
use log::info;
use rusqlite::{params, Connection, OptionalExtension};

impl LexiconStore {
    /// Assign a proficiency tier to a word, replacing any existing
    /// assignment, and tag the word with the matching proficiency tag.
    pub fn assign_level(
        &self,
        word: &str,
        level: JlptLevel,
        confidence: f64,
        source: &str,
    ) -> EngineResult<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        assign_level_on(&tx, word, level, confidence, source)?;
        tx.commit()?;
        Ok(())
    }

    /// The assignment for a word, if any.
    pub fn get_level(&self, word: &str) -> EngineResult<Option<ProficiencyAssignment>> {
        let conn = self.conn.lock();
        let row = conn
            .query_row(
                "SELECT word, level, confidence, source
                 FROM proficiency_assignments WHERE word = ?1",
                [word],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, f64>(2)?,
                        row.get::<_, Option<String>>(3)?,
                    ))
                },
            )
            .optional()?;

        Ok(row.and_then(|(word, level, confidence, source)| {
            Some(ProficiencyAssignment {
                word,
                level: JlptLevel::parse(&level)?,
                confidence,
                source: source.unwrap_or_default(),
            })
        }))
    }

    /// Assign tiers to every word that has none, from its stored frequency.
    /// Returns the number of words assigned.
    pub fn auto_assign_levels(&self) -> EngineResult<usize> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        let unassigned: Vec<(String, Option<f64>)> = {
            let mut stmt = tx.prepare(
                "SELECT DISTINCT w.word, w.frequency
                 FROM words w
                 LEFT JOIN proficiency_assignments pa ON w.word = pa.word
                 WHERE pa.word IS NULL",
            )?;
            let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
            rows.collect::<Result<_, _>>()?
        };

        for (word, frequency) in &unassigned {
            let level = level_for_frequency(frequency.unwrap_or(0.0));
            assign_level_on(&tx, word, level, AUTO_ASSIGN_CONFIDENCE, AUTO_ASSIGN_SOURCE)?;
        }

        tx.commit()?;
        info!("[store] Auto-assigned levels to {} words", unassigned.len());
        Ok(unassigned.len())
    }
}

fn assign_level_on(
    conn: &Connection,
    word: &str,
    level: JlptLevel,
    confidence: f64,
    source: &str,
) -> EngineResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO proficiency_assignments (word, level, confidence, source)
         VALUES (?1, ?2, ?3, ?4)",
        params![word, level.as_str(), confidence, source],
    )?;

    // Tag the word row so the tier shows up in tag search and FTS.
    let word_id: Option<String> = conn
        .query_row(
            "SELECT id FROM words WHERE word = ?1 LIMIT 1",
            [word],
            |row| row.get(0),
        )
        .optional()?;
    if let Some(id) = word_id {
        add_tags_on(conn, &id, &[level.tag().to_string()])?;
    }
    Ok(())
}

/// Map a stored frequency to a tier: common words are easy tiers.
fn level_for_frequency(frequency: f64) -> JlptLevel {
    if frequency >= AUTO_ASSIGN_BANDS[0] {
        JlptLevel::N5
    } else if frequency >= AUTO_ASSIGN_BANDS[1] {
        JlptLevel::N4
    } else if frequency >= AUTO_ASSIGN_BANDS[2] {
        JlptLevel::N3
    } else if frequency >= AUTO_ASSIGN_BANDS[3] {
        JlptLevel::N2
    } else {
        JlptLevel::N1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::types::{DictionaryMeta, EntryKind, ImportedEntry};

    fn seed_word(store: &LexiconStore, expression: &str, frequency: Option<f64>) {
        let meta = DictionaryMeta {
            title: "test".to_string(),
            format: 3,
            revision: "1".to_string(),
            sequenced: false,
        };
        let entry = ImportedEntry {
            kind: EntryKind::Term,
            expression: expression.to_string(),
            reading: Some(expression.to_string()),
            definitions: vec!["def".to_string()],
            tags: vec![],
            rules: vec![],
            score: None,
            sequence: None,
        };
        store.import_dictionary(&meta, &[entry], None).unwrap();
        if let Some(f) = frequency {
            store
                .update_frequency_data(&[(expression.to_string(), f)])
                .unwrap();
        }
    }

    #[test]
    fn test_frequency_bands() {
        assert_eq!(level_for_frequency(0.9), JlptLevel::N5);
        assert_eq!(level_for_frequency(0.8), JlptLevel::N5);
        assert_eq!(level_for_frequency(0.7), JlptLevel::N4);
        assert_eq!(level_for_frequency(0.5), JlptLevel::N3);
        assert_eq!(level_for_frequency(0.3), JlptLevel::N2);
        assert_eq!(level_for_frequency(0.1), JlptLevel::N1);
        assert_eq!(level_for_frequency(0.0), JlptLevel::N1);
    }

    #[test]
    fn test_assign_replaces_existing() {
        let store = LexiconStore::open_in_memory().unwrap();
        seed_word(&store, "犬", None);

        store.assign_level("犬", JlptLevel::N4, 1.0, "manual").unwrap();
        store.assign_level("犬", JlptLevel::N2, 0.9, "manual").unwrap();

        let assignment = store.get_level("犬").unwrap().unwrap();
        assert_eq!(assignment.level, JlptLevel::N2);
        assert!((assignment.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_assign_tags_the_word() {
        let store = LexiconStore::open_in_memory().unwrap();
        seed_word(&store, "犬", None);

        store.assign_level("犬", JlptLevel::N5, 1.0, "manual").unwrap();

        let results = store.search("犬").unwrap();
        assert!(results[0].tags.contains(&"jlpt-n5".to_string()));
    }

    #[test]
    fn test_auto_assign_skips_assigned_words() {
        let store = LexiconStore::open_in_memory().unwrap();
        seed_word(&store, "犬", Some(0.9));
        seed_word(&store, "猫", Some(0.1));

        store.assign_level("犬", JlptLevel::N1, 1.0, "manual").unwrap();

        let assigned = store.auto_assign_levels().unwrap();
        assert_eq!(assigned, 1);

        // Manual assignment untouched; the other word got a frequency band.
        assert_eq!(store.get_level("犬").unwrap().unwrap().level, JlptLevel::N1);
        let auto = store.get_level("猫").unwrap().unwrap();
        assert_eq!(auto.level, JlptLevel::N1);
        assert_eq!(auto.source, AUTO_ASSIGN_SOURCE);
        assert!((auto.confidence - AUTO_ASSIGN_CONFIDENCE).abs() < 1e-9);
    }
}
