// ── Yomikata Atoms: Pure Data Types ────────────────────────────────────────
// All plain struct/enum definitions with no logic beyond conversions.
// Atoms layer rule: no I/O, no side effects, no imports from engine/.
//
// JSON-serialized columns (`tags`, `words`, `complexity_metrics`,
// `grammar_points`) round-trip through these types; the store never touches
// raw JSON strings outside its row-mapping edge.

use serde::{Deserialize, Serialize};

// ── Tokens ─────────────────────────────────────────────────────────────────

/// One morphologically tagged unit, as produced by the segmenter adapter or
/// the custom dictionary. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Morpheme {
    /// The word as it appears in text.
    pub surface: String,
    /// Phonetic form, when the segmenter knows it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading: Option<String>,
    /// Dictionary (citation) form.
    pub basic: String,
    /// Coarse part of speech.
    pub pos: String,
    /// Ordered sub-tags refining `pos`.
    #[serde(default)]
    pub pos_detail: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conjugation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conjugation_type: Option<String>,
}

/// A user-maintained override entry, consulted before segmentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomDictionaryEntry {
    /// Exact surface string this entry overrides.
    pub word: String,
    pub reading: Option<String>,
    pub basic: String,
    pub pos: String,
    #[serde(default)]
    pub pos_detail: Vec<String>,
    #[serde(default)]
    pub definitions: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
}

impl From<CustomDictionaryEntry> for Morpheme {
    fn from(entry: CustomDictionaryEntry) -> Self {
        Morpheme {
            surface: entry.word,
            reading: entry.reading,
            basic: entry.basic,
            pos: entry.pos,
            pos_detail: entry.pos_detail,
            conjugation: None,
            conjugation_type: None,
        }
    }
}

// ── Proficiency tiers ──────────────────────────────────────────────────────

/// JLPT proficiency tier, N5 (easiest) through N1 (hardest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum JlptLevel {
    N5,
    N4,
    N3,
    N2,
    N1,
}

impl JlptLevel {
    /// Difficulty weight, 1 (N5) through 5 (N1).
    pub fn tier_weight(self) -> u32 {
        match self {
            JlptLevel::N5 => 1,
            JlptLevel::N4 => 2,
            JlptLevel::N3 => 3,
            JlptLevel::N2 => 4,
            JlptLevel::N1 => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JlptLevel::N5 => "N5",
            JlptLevel::N4 => "N4",
            JlptLevel::N3 => "N3",
            JlptLevel::N2 => "N2",
            JlptLevel::N1 => "N1",
        }
    }

    /// Tag form used in the default tag taxonomy, e.g. "jlpt-n3".
    pub fn tag(self) -> &'static str {
        match self {
            JlptLevel::N5 => "jlpt-n5",
            JlptLevel::N4 => "jlpt-n4",
            JlptLevel::N3 => "jlpt-n3",
            JlptLevel::N2 => "jlpt-n2",
            JlptLevel::N1 => "jlpt-n1",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "N5" => Some(JlptLevel::N5),
            "N4" => Some(JlptLevel::N4),
            "N3" => Some(JlptLevel::N3),
            "N2" => Some(JlptLevel::N2),
            "N1" => Some(JlptLevel::N1),
            _ => None,
        }
    }
}

impl std::fmt::Display for JlptLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vocabulary difficulty label derived from the weighted vocabulary score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VocabularyLevel {
    Beginner,
    #[serde(rename = "Upper Beginner")]
    UpperBeginner,
    Intermediate,
    #[serde(rename = "Upper Intermediate")]
    UpperIntermediate,
    Advanced,
}

impl VocabularyLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            VocabularyLevel::Beginner => "Beginner",
            VocabularyLevel::UpperBeginner => "Upper Beginner",
            VocabularyLevel::Intermediate => "Intermediate",
            VocabularyLevel::UpperIntermediate => "Upper Intermediate",
            VocabularyLevel::Advanced => "Advanced",
        }
    }
}

/// Honorific register of a text, from counted respectful/humble sub-tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HonorificRegister {
    Casual,
    Polite,
    Formal,
}

// ── Analysis results ───────────────────────────────────────────────────────

/// One matched grammar pattern, detached from its matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarPoint {
    pub name: String,
    pub level: JlptLevel,
    pub description: String,
}

/// Full difficulty profile of a text. Computed fresh per call; never mutated
/// after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityAnalysis {
    pub unique_words: usize,
    pub avg_word_length: f64,
    pub reading_complexity: f64,
    pub grammar_complexity: f64,
    pub vocabulary_level: VocabularyLevel,
    pub grammar_points: Vec<GrammarPoint>,
    pub jlpt_level: JlptLevel,
    pub kanji_density: f64,
    pub unique_kanji: usize,
    pub conjugation_types: Vec<String>,
    pub honorific_level: HonorificRegister,
    pub sentence_length: usize,
    pub particle_density: f64,
    pub reading_variety: f64,
}

/// The subset of `ComplexityAnalysis` cached on each stored example.
/// Field names stay camelCase on disk so `json_extract` paths are stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleComplexity {
    pub unique_words: usize,
    pub avg_word_length: f64,
    pub reading_complexity: f64,
    pub grammar_complexity: f64,
    pub vocabulary_level: VocabularyLevel,
}

impl From<&ComplexityAnalysis> for ExampleComplexity {
    fn from(a: &ComplexityAnalysis) -> Self {
        ExampleComplexity {
            unique_words: a.unique_words,
            avg_word_length: a.avg_word_length,
            reading_complexity: a.reading_complexity,
            grammar_complexity: a.grammar_complexity,
            vocabulary_level: a.vocabulary_level,
        }
    }
}

// ── Import payloads ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Term,
    Kanji,
}

/// One entry of a dictionary import payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportedEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub expression: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading: Option<String>,
    pub definitions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<i64>,
}

/// Top-level dictionary import payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportedDictionary {
    pub format: i64,
    pub revision: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequenced: Option<bool>,
    pub title: String,
    pub entries: Vec<ImportedEntry>,
}

/// Dictionary identity and format metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryMeta {
    pub title: String,
    pub format: i64,
    pub revision: String,
    pub sequenced: bool,
}

/// One dictionary as listed to callers, with its computed entry count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryStatus {
    pub title: String,
    pub format: i64,
    pub revision: String,
    pub enabled: bool,
    pub entry_count: i64,
}

/// Progress report emitted after each processed entry of a long import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportProgress {
    pub processed: usize,
    pub total: usize,
    /// Percent complete, rounded to the nearest integer.
    pub percent: u32,
}

impl ImportProgress {
    pub fn at(processed: usize, total: usize) -> Self {
        let percent = if total == 0 {
            100
        } else {
            ((processed as f64 / total as f64) * 100.0).round() as u32
        };
        ImportProgress {
            processed,
            total,
            percent,
        }
    }
}

// ── Frequency lists ────────────────────────────────────────────────────────

/// One record of a frequency list import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyRecord {
    pub word: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
}

/// Raw newline-delimited frequency file shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyFileFormat {
    /// Tab-separated `rank, word, frequency`; frequency stored as value/100.
    Ranked,
    /// Tab-separated `word, count`; count stored as ln(count)/10.
    Counted,
}

/// One frequency list as listed to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyListInfo {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub entry_count: i64,
}

// ── Store results ──────────────────────────────────────────────────────────

/// A bilingual example pair attached to a search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleRef {
    pub japanese: String,
    pub english: String,
}

/// One ranked word returned from full-text or tag search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub word: String,
    pub reading: Option<String>,
    pub pos: Option<String>,
    pub frequency: Option<f64>,
    pub dictionary: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub definitions: Vec<String>,
    #[serde(default)]
    pub examples: Vec<ExampleRef>,
}

/// A stored example sentence with its cached analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExampleSentence {
    pub id: i64,
    pub japanese: String,
    pub english: String,
    pub source: Option<String>,
    pub tags: Vec<String>,
    /// Citation forms of the content words in the sentence.
    pub words: Vec<String>,
    pub complexity_metrics: Option<ExampleComplexity>,
    pub jlpt_level: Option<JlptLevel>,
    pub grammar_points: Vec<GrammarPoint>,
}

/// Filters for example retrieval. Default: no filters, limit 10.
#[derive(Debug, Clone, Default)]
pub struct ExampleQuery {
    pub limit: Option<i64>,
    /// Minimum difficulty: keeps examples at or above this tier (N3 keeps
    /// N3, N2, N1).
    pub min_jlpt_level: Option<JlptLevel>,
    /// Maximum difficulty: keeps examples at or below this tier.
    pub max_jlpt_level: Option<JlptLevel>,
    /// Grammar point names the example must contain at least one of.
    pub grammar_points: Vec<String>,
    pub vocabulary_level: Option<VocabularyLevel>,
}

/// A named group of related tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagGroup {
    pub name: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

/// A proficiency tier attached to one word.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProficiencyAssignment {
    pub word: String,
    pub level: JlptLevel,
    pub confidence: f64,
    pub source: String,
}

/// One kanji-typed dictionary entry, stored for retrieval only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KanjiEntry {
    pub dictionary: String,
    pub expression: String,
    pub definitions: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jlpt_tier_weights_ascend() {
        let levels = [
            JlptLevel::N5,
            JlptLevel::N4,
            JlptLevel::N3,
            JlptLevel::N2,
            JlptLevel::N1,
        ];
        for pair in levels.windows(2) {
            assert!(pair[0].tier_weight() < pair[1].tier_weight());
        }
    }

    #[test]
    fn test_jlpt_string_round_trip() {
        for level in [
            JlptLevel::N5,
            JlptLevel::N4,
            JlptLevel::N3,
            JlptLevel::N2,
            JlptLevel::N1,
        ] {
            assert_eq!(JlptLevel::parse(level.as_str()), Some(level));
        }
        assert_eq!(JlptLevel::parse("N6"), None);
    }

    #[test]
    fn test_progress_percent_rounds() {
        assert_eq!(ImportProgress::at(1, 3).percent, 33);
        assert_eq!(ImportProgress::at(2, 3).percent, 67);
        assert_eq!(ImportProgress::at(3, 3).percent, 100);
        assert_eq!(ImportProgress::at(0, 0).percent, 100);
    }

    #[test]
    fn test_example_complexity_camel_case_on_disk() {
        let metrics = ExampleComplexity {
            unique_words: 4,
            avg_word_length: 2.0,
            reading_complexity: 10.0,
            grammar_complexity: 20.0,
            vocabulary_level: VocabularyLevel::UpperIntermediate,
        };
        let json = serde_json::to_string(&metrics).unwrap();
        assert!(json.contains("\"vocabularyLevel\":\"Upper Intermediate\""));
        assert!(json.contains("\"uniqueWords\":4"));
    }

    #[test]
    fn test_import_payload_accepts_minimal_entry() {
        let payload = r#"{
            "format": 3,
            "revision": "1",
            "title": "test",
            "entries": [
                {"type": "term", "expression": "犬", "definitions": ["dog"]}
            ]
        }"#;
        let parsed: ImportedDictionary = serde_json::from_str(payload).unwrap();
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].kind, EntryKind::Term);
        assert!(parsed.entries[0].reading.is_none());
    }
}
