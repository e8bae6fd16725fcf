// ── Lexicon Store: Frequency Lists ─────────────────────────────────────────
// Corpus frequency data, imported per list and folded into the words table.
//
// Update rule: a word's stored frequency only ever rises (max-wins), and
// `frequency_source` records the list that supplied the winning value.
// Deleting a list clears frequency data only for words it sourced.

use super::dictionaries::ProgressFn;
use super::LexiconStore;
use crate::atoms::error::EngineResult;
use crate::atoms::types::{FrequencyFileFormat, FrequencyListInfo, FrequencyRecord, ImportProgress};
use log::info;
use rusqlite::params;

impl LexiconStore {
    /// Import (or replace) a frequency list. The list's own entries are
    /// replaced wholesale; word frequencies follow the max-wins rule.
    pub fn import_frequency_list(
        &self,
        id: &str,
        name: &str,
        description: &str,
        entries: &[FrequencyRecord],
        mut on_progress: Option<ProgressFn<'_>>,
    ) -> EngineResult<()> {
        info!(
            "[store] Importing frequency list '{}' ({} entries)",
            id,
            entries.len()
        );

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT OR REPLACE INTO frequency_lists (id, name, description) VALUES (?1, ?2, ?3)",
            params![id, name, description],
        )?;
        tx.execute(
            "DELETE FROM word_frequencies WHERE frequency_list_id = ?1",
            [id],
        )?;

        let total = entries.len();
        for (index, record) in entries.iter().enumerate() {
            tx.execute(
                "INSERT INTO word_frequencies (word, frequency_list_id, rank, frequency)
                 VALUES (?1, ?2, ?3, ?4)",
                params![record.word, id, record.rank, record.frequency],
            )?;

            // Max-wins: only a strictly higher value replaces the stored
            // frequency, and only then does the source move to this list.
            if let Some(frequency) = record.frequency {
                tx.execute(
                    "UPDATE words SET frequency = ?1, frequency_source = ?2
                     WHERE word = ?3 AND (frequency IS NULL OR frequency < ?1)",
                    params![frequency, id, record.word],
                )?;
            }

            if let Some(progress) = on_progress.as_deref_mut() {
                progress(ImportProgress::at(index + 1, total));
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// Every frequency list with its computed entry count.
    pub fn list_frequency_lists(&self) -> EngineResult<Vec<FrequencyListInfo>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT f.id, f.name, f.description, COUNT(wf.word)
             FROM frequency_lists f
             LEFT JOIN word_frequencies wf ON wf.frequency_list_id = f.id
             GROUP BY f.id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(FrequencyListInfo {
                id: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
                entry_count: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// Delete a frequency list. Words whose frequency came from this list
    /// lose both their frequency and their source.
    pub fn delete_frequency_list(&self, id: &str) -> EngineResult<()> {
        info!("[store] Deleting frequency list '{}'", id);
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        tx.execute(
            "UPDATE words SET frequency = NULL, frequency_source = NULL
             WHERE frequency_source = ?1",
            [id],
        )?;
        tx.execute(
            "DELETE FROM word_frequencies WHERE frequency_list_id = ?1",
            [id],
        )?;
        tx.execute("DELETE FROM frequency_lists WHERE id = ?1", [id])?;

        tx.commit()?;
        Ok(())
    }

    /// Directly set frequencies for a batch of words, bypassing lists.
    pub fn update_frequency_data(&self, entries: &[(String, f64)]) -> EngineResult<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        for (word, frequency) in entries {
            tx.execute(
                "UPDATE words SET frequency = ?1 WHERE word = ?2",
                params![frequency, word],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Parse a raw newline-delimited frequency file and import it.
    pub fn import_frequency_file(
        &self,
        id: &str,
        name: &str,
        description: &str,
        format: FrequencyFileFormat,
        content: &str,
        on_progress: Option<ProgressFn<'_>>,
    ) -> EngineResult<()> {
        let entries = parse_frequency_file(content, format);
        self.import_frequency_list(id, name, description, &entries, on_progress)
    }
}

/// Parse one of the two supported raw frequency shapes. Lines that do not
/// fit the shape are skipped.
pub fn parse_frequency_file(content: &str, format: FrequencyFileFormat) -> Vec<FrequencyRecord> {
    let mut entries = Vec::new();
    for line in content.lines() {
        let mut fields = line.split('\t');
        match format {
            FrequencyFileFormat::Ranked => {
                let (Some(rank), Some(word), Some(frequency)) =
                    (fields.next(), fields.next(), fields.next())
                else {
                    continue;
                };
                let Ok(frequency) = frequency.trim().parse::<f64>() else {
                    continue;
                };
                if word.is_empty() {
                    continue;
                }
                entries.push(FrequencyRecord {
                    word: word.to_string(),
                    rank: rank.trim().parse().ok(),
                    frequency: Some(frequency / 100.0),
                });
            }
            FrequencyFileFormat::Counted => {
                let (Some(word), Some(count)) = (fields.next(), fields.next()) else {
                    continue;
                };
                let Ok(count) = count.trim().parse::<f64>() else {
                    continue;
                };
                if word.is_empty() || count <= 0.0 {
                    continue;
                }
                entries.push(FrequencyRecord {
                    word: word.to_string(),
                    rank: None,
                    frequency: Some(count.ln() / 10.0),
                });
            }
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ranked_shape() {
        let content = "1\t犬\t85.5\n2\t猫\t72.0\nmalformed line\n";
        let entries = parse_frequency_file(content, FrequencyFileFormat::Ranked);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].word, "犬");
        assert_eq!(entries[0].rank, Some(1));
        assert!((entries[0].frequency.unwrap() - 0.855).abs() < 1e-9);
    }

    #[test]
    fn test_parse_counted_shape_log_scales() {
        let content = "犬\t1000\n猫\t0\n";
        let entries = parse_frequency_file(content, FrequencyFileFormat::Counted);
        assert_eq!(entries.len(), 1);
        let expected = 1000f64.ln() / 10.0;
        assert!((entries[0].frequency.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_list_and_delete_frequency_lists() {
        let store = LexiconStore::open_in_memory().unwrap();
        let records = vec![FrequencyRecord {
            word: "犬".to_string(),
            rank: Some(1),
            frequency: Some(0.9),
        }];
        store
            .import_frequency_list("core", "Core", "test list", &records, None)
            .unwrap();

        let lists = store.list_frequency_lists().unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].entry_count, 1);

        store.delete_frequency_list("core").unwrap();
        assert!(store.list_frequency_lists().unwrap().is_empty());
    }

    #[test]
    fn test_reimport_replaces_list_entries() {
        let store = LexiconStore::open_in_memory().unwrap();
        let first = vec![
            FrequencyRecord {
                word: "犬".to_string(),
                rank: Some(1),
                frequency: Some(0.9),
            },
            FrequencyRecord {
                word: "猫".to_string(),
                rank: Some(2),
                frequency: Some(0.8),
            },
        ];
        store
            .import_frequency_list("core", "Core", "", &first, None)
            .unwrap();

        let second = vec![FrequencyRecord {
            word: "鳥".to_string(),
            rank: Some(1),
            frequency: Some(0.7),
        }];
        store
            .import_frequency_list("core", "Core", "", &second, None)
            .unwrap();

        let lists = store.list_frequency_lists().unwrap();
        assert_eq!(lists[0].entry_count, 1);
    }
}
