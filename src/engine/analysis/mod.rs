// ── Yomikata Engine — Analysis ─────────────────────────────────────────────
// Tokenization orchestrator and the caller-facing analysis API.
//
// Module layout:
//   adapter     — segmenter trait seam + one-time init guard
//   overrides   — custom dictionary (lexical override layer)
//   patterns    — grammar pattern engine (built-in + user patterns)
//   complexity  — difficulty scoring formulas
//
// Data flow: text → overrides → segmenter (masked remainder) → merged token
// sequence sorted by first occurrence in the original text → pattern engine
// → complexity analyzer.

use crate::atoms::constants::{POS_AUX_VERB, POS_PARTICLE, POS_SYMBOL};
use crate::atoms::error::{EngineError, EngineResult};
use crate::atoms::types::{ComplexityAnalysis, CustomDictionaryEntry, GrammarPoint, Morpheme};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

mod adapter;
mod complexity;
mod overrides;
mod patterns;

pub use adapter::{MorphemeSegmenter, SegmenterBuilder};
pub use complexity::is_kanji;
pub use patterns::{GrammarPattern, PatternMatcher, TokenPredicate, UserPattern};

use adapter::SegmenterHandle;
use overrides::CustomDictionary;
use patterns::PatternRegistry;

/// Cooperative cancellation for analysis calls.
/// Checked once after tokenization, before any metric construction.
#[derive(Clone, Default)]
pub struct AbortFlag(Arc<AtomicBool>);

impl AbortFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the analysis using this flag.
    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// The linguistic-analysis facade: tokenization, grammar points, complexity.
///
/// Holds the only long-lived analysis state: the custom dictionary, the
/// pattern registry, and the lazily-built segmenter handle. Every analysis
/// result is a pure function of the input text plus that state.
pub struct Analyzer {
    custom: CustomDictionary,
    patterns: PatternRegistry,
    segmenter: SegmenterHandle,
}

impl Analyzer {
    /// Create an analyzer over a caller-supplied segmenter builder.
    /// The segmenter is built on first use, shared across concurrent callers.
    pub fn new(builder: Box<dyn SegmenterBuilder>) -> Self {
        Analyzer {
            custom: CustomDictionary::new(),
            patterns: PatternRegistry::new(),
            segmenter: SegmenterHandle::new(builder),
        }
    }

    // ── Custom dictionary ──────────────────────────────────────────────

    pub fn add_custom_entry(&self, entry: CustomDictionaryEntry) {
        self.custom.insert(entry);
    }

    pub fn add_custom_entries(&self, entries: Vec<CustomDictionaryEntry>) {
        self.custom.insert_many(entries);
    }

    pub fn clear_custom_dictionary(&self) {
        self.custom.clear();
    }

    // ── User patterns ──────────────────────────────────────────────────

    pub fn add_user_pattern(&self, pattern: UserPattern) {
        self.patterns.add_user_pattern(pattern);
    }

    pub fn remove_user_pattern(&self, name: &str) {
        self.patterns.remove_user_pattern(name);
    }

    // ── Tokenization ───────────────────────────────────────────────────

    /// Tokenize text into reading order: custom-dictionary overrides first,
    /// the segmenter over the masked remainder, merged and sorted by each
    /// token's first occurrence in the original text.
    pub async fn tokenize(&self, text: &str) -> EngineResult<Vec<Morpheme>> {
        let (mut merged, remaining) = self.custom.apply(text);
        let segmenter = self.segmenter.get().await?;
        merged.extend(segmenter.segment(&remaining).await?);

        // Stable sort keeps segmenter order for tokens sharing an offset
        // (repeated surfaces resolve to their first occurrence, as does the
        // masked span of an override).
        merged.sort_by_key(|token| text.find(&token.surface).unwrap_or(usize::MAX));
        Ok(merged)
    }

    /// Content words only: particles, auxiliary verbs, punctuation, and
    /// blank surfaces removed.
    pub async fn find_words(&self, text: &str) -> EngineResult<Vec<Morpheme>> {
        let tokens = self.tokenize(text).await?;
        Ok(filter_content_words(tokens))
    }

    /// Reading of each token, falling back to the surface form.
    pub async fn get_readings(&self, text: &str) -> EngineResult<Vec<String>> {
        let tokens = self.tokenize(text).await?;
        Ok(tokens
            .into_iter()
            .map(|t| t.reading.unwrap_or(t.surface))
            .collect())
    }

    /// Citation form of each token, falling back to the surface form.
    pub async fn get_dictionary_forms(&self, text: &str) -> EngineResult<Vec<String>> {
        let tokens = self.tokenize(text).await?;
        Ok(tokens
            .into_iter()
            .map(|t| {
                if t.basic.is_empty() {
                    t.surface
                } else {
                    t.basic
                }
            })
            .collect())
    }

    // ── Grammar and complexity ─────────────────────────────────────────

    /// Match built-in and user patterns against an already-tokenized
    /// sequence. Deduplicated by pattern name.
    pub fn identify_grammar_points(&self, tokens: &[Morpheme]) -> Vec<GrammarPoint> {
        self.patterns.identify(tokens)
    }

    /// Full difficulty profile of a text.
    pub async fn analyze_complexity(&self, text: &str) -> EngineResult<ComplexityAnalysis> {
        self.analyze_complexity_inner(text, None).await
    }

    /// Like `analyze_complexity`, but honors a cooperative abort flag.
    pub async fn analyze_complexity_with_abort(
        &self,
        text: &str,
        abort: &AbortFlag,
    ) -> EngineResult<ComplexityAnalysis> {
        self.analyze_complexity_inner(text, Some(abort)).await
    }

    async fn analyze_complexity_inner(
        &self,
        text: &str,
        abort: Option<&AbortFlag>,
    ) -> EngineResult<ComplexityAnalysis> {
        let all_tokens = self.tokenize(text).await?;
        let tokens = filter_content_words(all_tokens.clone());
        if tokens.is_empty() {
            return Err(EngineError::NoTokens);
        }

        // Checked once, here, so an aborted caller pays for tokenization
        // but not for metric construction.
        if let Some(flag) = abort {
            if flag.is_aborted() {
                return Err(EngineError::Aborted);
            }
        }

        let grammar_points = self.patterns.identify(&tokens);
        Ok(complexity::build_analysis(
            &tokens,
            &all_tokens,
            text,
            grammar_points,
        ))
    }
}

fn filter_content_words(tokens: Vec<Morpheme>) -> Vec<Morpheme> {
    tokens
        .into_iter()
        .filter(|t| {
            t.pos != POS_PARTICLE
                && t.pos != POS_AUX_VERB
                && t.pos != POS_SYMBOL
                && !t.surface.trim().is_empty()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Character-class stub segmenter: splits on kana/kanji boundaries is
    /// overkill here — instead it emits one token per non-space run, tagging
    /// a handful of known particles. Deterministic and offset-faithful.
    struct StubSegmenter;

    const PARTICLES: [&str; 5] = ["が", "を", "は", "と", "の"];

    #[async_trait]
    impl MorphemeSegmenter for StubSegmenter {
        async fn segment(&self, text: &str) -> EngineResult<Vec<Morpheme>> {
            let mut tokens = Vec::new();
            for ch in text.chars().filter(|c| !c.is_whitespace()) {
                let surface = ch.to_string();
                let pos = if PARTICLES.contains(&surface.as_str()) {
                    POS_PARTICLE
                } else {
                    "名詞"
                };
                tokens.push(Morpheme {
                    surface: surface.clone(),
                    reading: Some(surface.clone()),
                    basic: surface,
                    pos: pos.to_string(),
                    pos_detail: vec![],
                    conjugation: None,
                    conjugation_type: None,
                });
            }
            Ok(tokens)
        }
    }

    struct StubBuilder;

    #[async_trait]
    impl SegmenterBuilder for StubBuilder {
        async fn build(&self) -> EngineResult<Arc<dyn MorphemeSegmenter>> {
            Ok(Arc::new(StubSegmenter))
        }
    }

    fn analyzer() -> Analyzer {
        Analyzer::new(Box::new(StubBuilder))
    }

    #[tokio::test]
    async fn test_tokenize_preserves_reading_order() {
        let a = analyzer();
        let tokens = a.tokenize("犬が猫").await.unwrap();
        let surfaces: Vec<&str> = tokens.iter().map(|t| t.surface.as_str()).collect();
        assert_eq!(surfaces, vec!["犬", "が", "猫"]);
    }

    #[tokio::test]
    async fn test_custom_entry_takes_precedence_in_order() {
        let a = analyzer();
        a.add_custom_entry(CustomDictionaryEntry {
            word: "猫".to_string(),
            reading: Some("ねこ".to_string()),
            basic: "猫".to_string(),
            pos: "custom".to_string(),
            pos_detail: vec![],
            definitions: vec!["cat".to_string()],
            tags: vec![],
            frequency: None,
        });

        let tokens = a.tokenize("犬と猫").await.unwrap();
        let surfaces: Vec<&str> = tokens.iter().map(|t| t.surface.as_str()).collect();
        assert_eq!(surfaces, vec!["犬", "と", "猫"]);
        assert_eq!(tokens[2].pos, "custom");
    }

    #[tokio::test]
    async fn test_find_words_drops_particles() {
        let a = analyzer();
        let words = a.find_words("犬が猫を").await.unwrap();
        let surfaces: Vec<&str> = words.iter().map(|t| t.surface.as_str()).collect();
        assert_eq!(surfaces, vec!["犬", "猫"]);
    }

    #[tokio::test]
    async fn test_readings_fall_back_to_surface() {
        let a = analyzer();
        let readings = a.get_readings("犬が").await.unwrap();
        assert_eq!(readings, vec!["犬", "が"]);
    }

    #[tokio::test]
    async fn test_analyze_empty_input_is_no_tokens() {
        let a = analyzer();
        match a.analyze_complexity("").await {
            Err(EngineError::NoTokens) => {}
            other => panic!("expected NoTokens, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_analyze_aborted_before_metrics() {
        let a = analyzer();
        let flag = AbortFlag::new();
        flag.abort();
        match a.analyze_complexity_with_abort("犬が走る", &flag).await {
            Err(EngineError::Aborted) => {}
            other => panic!("expected Aborted, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_analyze_is_deterministic() {
        let a = analyzer();
        let first = a.analyze_complexity("犬が猫を見る").await.unwrap();
        let second = a.analyze_complexity("犬が猫を見る").await.unwrap();
        assert_eq!(first, second);
    }
}
