// ── Yomikata Engine ────────────────────────────────────────────────────────
// Linguistic-analysis and persistence core for the Yomikata dictionary app.
//
// Layers:
//   atoms/   — pure constants, error types, plain data (no I/O)
//   engine/  — analysis (tokenization, grammar, complexity) and the lexicon
//              store (SQLite + FTS5)
//
// The morphological segmenter itself is external: callers hand the analyzer
// a `SegmenterBuilder` and the engine takes care of one-time initialization,
// lexical overrides, merging, and everything downstream.

pub mod atoms;
pub mod engine;

pub use atoms::error::{EngineError, EngineResult};
pub use atoms::types::{
    ComplexityAnalysis, CustomDictionaryEntry, DictionaryMeta, DictionaryStatus, EntryKind,
    ExampleComplexity, ExampleQuery, ExampleRef, ExampleSentence, FrequencyFileFormat,
    FrequencyListInfo, FrequencyRecord, GrammarPoint, HonorificRegister, ImportProgress,
    ImportedDictionary, ImportedEntry, JlptLevel, KanjiEntry, Morpheme, ProficiencyAssignment,
    SearchResult, TagGroup, VocabularyLevel,
};
pub use engine::analysis::{
    AbortFlag, Analyzer, MorphemeSegmenter, SegmenterBuilder, TokenPredicate, UserPattern,
};
pub use engine::store::{parse_frequency_file, LexiconStore, ProgressFn};
