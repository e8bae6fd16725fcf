// ── Yomikata Atoms: Constants ──────────────────────────────────────────────
// All named constants for the crate live here, so POS tag strings and
// scoring knobs have exactly one definition.

// ── Part-of-speech tags (IPADIC coarse categories) ─────────────────────────
// These are the tag strings the morpheme adapter emits. Changing any value
// would desynchronize the engine from every adapter in the wild — treat as
// stable identifiers.
pub const POS_VERB: &str = "動詞";
pub const POS_ADJECTIVE: &str = "形容詞";
pub const POS_ADJECTIVAL_NOUN: &str = "形容動詞";
pub const POS_PARTICLE: &str = "助詞";
pub const POS_AUX_VERB: &str = "助動詞";
pub const POS_SYMBOL: &str = "記号";

// ── Honorific sub-tags (pos_detail entries) ────────────────────────────────
pub const POS_DETAIL_RESPECTFUL: &str = "尊敬語";
pub const POS_DETAIL_HUMBLE: &str = "謙譲語";

// ── Honorific surface markers ──────────────────────────────────────────────
// Weights: the formal copula counts 3, plain polite sentence-enders and the
// honorific prefixes count 1 each.
pub const HONORIFIC_COPULA: &str = "ございます";
pub const POLITE_ENDERS: [&str; 2] = ["です", "ます"];
pub const HONORIFIC_PREFIXES: [&str; 2] = ["お", "ご"];

// ── CJK ideograph range ────────────────────────────────────────────────────
// The range the original scoring model was calibrated against. Extension
// blocks are deliberately excluded; widening this range would shift every
// kanji-density and reading-complexity score.
pub const KANJI_RANGE: std::ops::RangeInclusive<char> = '\u{4E00}'..='\u{9FAF}';

// ── Scoring thresholds ─────────────────────────────────────────────────────
// Heuristic constants. These are part of the scoring contract: stored
// examples cache their computed tiers, so changing a value here silently
// skews every comparison against cached data. Recalibrate deliberately.

/// Vocabulary-level score cutoffs, highest tier first:
/// Advanced / Upper Intermediate / Intermediate / Upper Beginner.
pub const VOCABULARY_THRESHOLDS: [f64; 4] = [80.0, 60.0, 40.0, 20.0];

/// JLPT estimation score cutoffs, N1 first.
pub const JLPT_THRESHOLDS: [f64; 4] = [85.0, 70.0, 55.0, 40.0];

/// Frequency bands for automatic proficiency assignment, N5 first.
/// A word at or above 0.8 is assumed N5-common; below 0.2 it falls to N1.
pub const AUTO_ASSIGN_BANDS: [f64; 4] = [0.8, 0.6, 0.4, 0.2];

/// Confidence recorded for frequency-derived assignments.
pub const AUTO_ASSIGN_CONFIDENCE: f64 = 0.7;

/// Source label recorded for frequency-derived assignments.
pub const AUTO_ASSIGN_SOURCE: &str = "frequency-based";

// ── Query limits ───────────────────────────────────────────────────────────
pub const SEARCH_RESULT_LIMIT: i64 = 50;
pub const EXAMPLE_QUERY_DEFAULT_LIMIT: i64 = 10;

// ── Default tag taxonomy ───────────────────────────────────────────────────
// Seeded once at first store initialization; re-seeding is insert-if-absent.
pub const DEFAULT_TAG_GROUPS: [(&str, &str, &[&str]); 4] = [
    (
        "JLPT",
        "Japanese Language Proficiency Test levels",
        &["jlpt-n5", "jlpt-n4", "jlpt-n3", "jlpt-n2", "jlpt-n1"],
    ),
    (
        "Parts of Speech",
        "Grammatical categories",
        &["noun", "verb", "adjective", "adverb", "particle", "expression"],
    ),
    (
        "Usage",
        "Word usage categories",
        &["formal", "informal", "written", "spoken", "literary", "slang"],
    ),
    (
        "Difficulty",
        "Word difficulty levels",
        &["beginner", "intermediate", "advanced", "common", "rare"],
    ),
];
