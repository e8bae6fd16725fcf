// ── Lexicon Store: Example Sentences ───────────────────────────────────────
// Bilingual example sentences with cached complexity metrics, linked to
// words through positional join rows.
//
// Each stored example carries a JSON snapshot of its analysis (metrics
// subset, JLPT tier, grammar points). `analyze_example_complexity` recomputes
// and overwrites that snapshot, refreshing caches left stale by analyzer
// changes. Links are insert-if-absent per (word, example) so a word repeated
// in one sentence yields a single row at its first position.

use super::dictionaries::ProgressFn;
use super::LexiconStore;
use crate::atoms::constants::EXAMPLE_QUERY_DEFAULT_LIMIT;
use crate::atoms::error::{EngineError, EngineResult};
use crate::atoms::types::{
    ComplexityAnalysis, ExampleComplexity, ExampleQuery, ExampleSentence, ImportProgress,
    JlptLevel,
};
use crate::engine::analysis::Analyzer;
use log::info;
use rusqlite::{params, OptionalExtension, Row};

impl LexiconStore {
    /// Analyze and store one example sentence. Returns its id.
    ///
    /// Tokenizes the Japanese text, caches the complexity snapshot, and
    /// writes one positional link row per content word (character offset of
    /// the word's first occurrence, reading, POS, citation form).
    pub async fn add_example_sentence(
        &self,
        analyzer: &Analyzer,
        japanese: &str,
        english: &str,
        source: &str,
        tags: &[String],
    ) -> EngineResult<i64> {
        let tokens = analyzer.find_words(japanese).await?;
        let analysis = analyzer.analyze_complexity(japanese).await?;

        let words: Vec<&str> = tokens.iter().map(|t| t.basic.as_str()).collect();
        let metrics = ExampleComplexity::from(&analysis);

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO examples (
                 japanese, english, source, tags, words,
                 complexity_metrics, jlpt_level, grammar_points
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                japanese,
                english,
                source,
                serde_json::to_string(tags)?,
                serde_json::to_string(&words)?,
                serde_json::to_string(&metrics)?,
                analysis.jlpt_level.as_str(),
                serde_json::to_string(&analysis.grammar_points)?,
            ],
        )?;
        let example_id = tx.last_insert_rowid();

        for token in &tokens {
            let position = japanese
                .find(&token.surface)
                .map(|byte| japanese[..byte].chars().count() as i64)
                .unwrap_or(-1);
            tx.execute(
                "INSERT OR IGNORE INTO word_examples (
                     word, example_id, position, reading, pos, basic_form
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    token.surface,
                    example_id,
                    position,
                    token.reading,
                    token.pos,
                    token.basic
                ],
            )?;
        }

        tx.commit()?;
        Ok(example_id)
    }

    /// Examples linked to a word (by surface or citation form), filtered and
    /// ordered by stored position. The word's citation form is resolved
    /// through tokenization so conjugated lookups still hit.
    pub async fn find_examples_for_word(
        &self,
        analyzer: &Analyzer,
        word: &str,
        query: &ExampleQuery,
    ) -> EngineResult<Vec<ExampleSentence>> {
        let tokens = analyzer.tokenize(word).await?;
        let dictionary_form = tokens
            .first()
            .map(|t| t.basic.clone())
            .unwrap_or_else(|| word.to_string());

        let mut sql = String::from(
            "SELECT DISTINCT e.id, e.japanese, e.english, e.source, e.tags, e.words,
                    e.complexity_metrics, e.jlpt_level, e.grammar_points, we.position
             FROM examples e
             JOIN word_examples we ON e.id = we.example_id
             WHERE (we.word = ?1 OR we.basic_form = ?2)",
        );
        let mut bound: Vec<Box<dyn rusqlite::types::ToSql>> = vec![
            Box::new(word.to_string()),
            Box::new(dictionary_form),
        ];

        // Stored tiers compare lexicographically: "N1" < … < "N5", so <=
        // keeps tiers at or above the requested difficulty.
        if let Some(min) = query.min_jlpt_level {
            sql.push_str(&format!(" AND e.jlpt_level <= ?{}", bound.len() + 1));
            bound.push(Box::new(min.as_str()));
        }
        if let Some(max) = query.max_jlpt_level {
            sql.push_str(&format!(" AND e.jlpt_level >= ?{}", bound.len() + 1));
            bound.push(Box::new(max.as_str()));
        }

        if !query.grammar_points.is_empty() {
            let placeholders: Vec<String> = (0..query.grammar_points.len())
                .map(|i| format!("?{}", bound.len() + 1 + i))
                .collect();
            sql.push_str(&format!(
                " AND EXISTS (
                     SELECT 1 FROM json_each(e.grammar_points) gp
                     WHERE json_extract(gp.value, '$.name') IN ({}))",
                placeholders.join(",")
            ));
            for name in &query.grammar_points {
                bound.push(Box::new(name.clone()));
            }
        }

        if let Some(level) = query.vocabulary_level {
            sql.push_str(&format!(
                " AND json_extract(e.complexity_metrics, '$.vocabularyLevel') = ?{}",
                bound.len() + 1
            ));
            bound.push(Box::new(level.as_str()));
        }

        sql.push_str(&format!(
            " ORDER BY we.position ASC LIMIT ?{}",
            bound.len() + 1
        ));
        bound.push(Box::new(query.limit.unwrap_or(EXAMPLE_QUERY_DEFAULT_LIMIT)));

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql)?;
        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            bound.iter().map(|b| b.as_ref()).collect();
        let rows = stmt.query_map(params_ref.as_slice(), map_example_row)?;

        let mut examples = Vec::new();
        for row in rows {
            examples.push(row?.into_example()?);
        }
        Ok(examples)
    }

    /// Recompute and overwrite one example's cached analysis.
    pub async fn analyze_example_complexity(
        &self,
        analyzer: &Analyzer,
        example_id: i64,
    ) -> EngineResult<ComplexityAnalysis> {
        let japanese: String = {
            let conn = self.conn.lock();
            conn.query_row(
                "SELECT japanese FROM examples WHERE id = ?1",
                [example_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| EngineError::not_found(format!("example {example_id}")))?
        };

        let analysis = analyzer.analyze_complexity(&japanese).await?;
        let metrics = ExampleComplexity::from(&analysis);

        let conn = self.conn.lock();
        conn.execute(
            "UPDATE examples SET complexity_metrics = ?1, jlpt_level = ?2, grammar_points = ?3
             WHERE id = ?4",
            params![
                serde_json::to_string(&metrics)?,
                analysis.jlpt_level.as_str(),
                serde_json::to_string(&analysis.grammar_points)?,
                example_id
            ],
        )?;
        Ok(analysis)
    }

    /// Bulk-import tab-separated `japanese \t english` sentence pairs.
    /// Returns the number of sentences stored. Lines missing either side
    /// are skipped but still advance the progress counter's total.
    pub async fn import_example_file(
        &self,
        analyzer: &Analyzer,
        content: &str,
        source: &str,
        mut on_progress: Option<ProgressFn<'_>>,
    ) -> EngineResult<usize> {
        let lines: Vec<&str> = content.lines().collect();
        let total = lines.len();
        let mut imported = 0;

        for (index, line) in lines.iter().enumerate() {
            let mut fields = line.split('\t');
            if let (Some(japanese), Some(english)) = (fields.next(), fields.next()) {
                if !japanese.is_empty() && !english.is_empty() {
                    self.add_example_sentence(analyzer, japanese, english, source, &[])
                        .await?;
                    imported += 1;
                }
            }
            if let Some(progress) = on_progress.as_deref_mut() {
                progress(ImportProgress::at(index + 1, total));
            }
        }

        info!("[store] Imported {} example sentences", imported);
        Ok(imported)
    }
}

// ── Row mapping ────────────────────────────────────────────────────────────
// JSON columns are deserialized here and nowhere else. A raw row is split
// from `ExampleSentence` so serde failures surface as engine errors instead
// of panicking inside the rusqlite iterator.

struct ExampleRow {
    id: i64,
    japanese: String,
    english: String,
    source: Option<String>,
    tags: Option<String>,
    words: Option<String>,
    complexity_metrics: Option<String>,
    jlpt_level: Option<String>,
    grammar_points: Option<String>,
}

fn map_example_row(row: &Row<'_>) -> rusqlite::Result<ExampleRow> {
    Ok(ExampleRow {
        id: row.get(0)?,
        japanese: row.get(1)?,
        english: row.get(2)?,
        source: row.get(3)?,
        tags: row.get(4)?,
        words: row.get(5)?,
        complexity_metrics: row.get(6)?,
        jlpt_level: row.get(7)?,
        grammar_points: row.get(8)?,
    })
}

impl ExampleRow {
    fn into_example(self) -> EngineResult<ExampleSentence> {
        Ok(ExampleSentence {
            id: self.id,
            japanese: self.japanese,
            english: self.english,
            source: self.source,
            tags: parse_json_or_default(self.tags)?,
            words: parse_json_or_default(self.words)?,
            complexity_metrics: self
                .complexity_metrics
                .map(|json| serde_json::from_str(&json))
                .transpose()?,
            jlpt_level: self.jlpt_level.as_deref().and_then(JlptLevel::parse),
            grammar_points: parse_json_or_default(self.grammar_points)?,
        })
    }
}

fn parse_json_or_default<T: Default + serde::de::DeserializeOwned>(
    column: Option<String>,
) -> EngineResult<T> {
    match column {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(T::default()),
    }
}
