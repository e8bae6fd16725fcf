// ── Analysis: Complexity Scoring ───────────────────────────────────────────
// Pure functions from token sequences to difficulty metrics. Every score is
// deterministic and re-derivable; there is no hidden state.
//
// Weights and thresholds live in atoms/constants.rs and are part of the
// scoring contract.

use crate::atoms::constants::{
    HONORIFIC_COPULA, HONORIFIC_PREFIXES, JLPT_THRESHOLDS, KANJI_RANGE, POLITE_ENDERS,
    POS_ADJECTIVE, POS_DETAIL_HUMBLE, POS_DETAIL_RESPECTFUL, POS_PARTICLE, POS_VERB,
    VOCABULARY_THRESHOLDS,
};
use crate::atoms::types::{
    ComplexityAnalysis, GrammarPoint, HonorificRegister, JlptLevel, Morpheme, VocabularyLevel,
};
use std::collections::HashSet;

/// Whether a character is a CJK ideograph in the scored range.
pub fn is_kanji(c: char) -> bool {
    KANJI_RANGE.contains(&c)
}

fn kanji_count(s: &str) -> usize {
    s.chars().filter(|c| is_kanji(*c)).count()
}

/// Reading difficulty: 2 points per kanji plus 1 point per reading
/// character beyond the third, capped at 100.
pub(crate) fn reading_complexity(tokens: &[Morpheme]) -> f64 {
    let mut complexity = 0.0;
    for token in tokens {
        complexity += (kanji_count(&token.surface) * 2) as f64;
        if let Some(reading) = &token.reading {
            let len = reading.chars().count();
            if len > 3 {
                complexity += (len - 3) as f64;
            }
        }
    }
    complexity.min(100.0)
}

/// Grammar difficulty: 10 points per matched pattern, weighted by tier,
/// capped at 100.
pub(crate) fn grammar_complexity(points: &[GrammarPoint]) -> f64 {
    let sum: f64 = points
        .iter()
        .map(|p| (p.level.tier_weight() * 10) as f64)
        .sum();
    sum.min(100.0)
}

/// Density and variety metrics over the full token sequence and raw text.
pub(crate) struct DetailedMetrics {
    pub kanji_density: f64,
    pub unique_kanji: usize,
    pub conjugation_types: Vec<String>,
    pub honorific_score: f64,
    pub sentence_length: usize,
    pub particle_density: f64,
    pub reading_variety: f64,
}

pub(crate) fn detailed_metrics(all_tokens: &[Morpheme], text: &str) -> DetailedMetrics {
    let total_chars = text.chars().count();
    let all_kanji = kanji_count(text);
    let unique_kanji = text
        .chars()
        .filter(|c| is_kanji(*c))
        .collect::<HashSet<char>>()
        .len();
    let kanji_density = if total_chars == 0 {
        0.0
    } else {
        all_kanji as f64 / total_chars as f64 * 100.0
    };

    // Distinct conjugation tags, first-seen order.
    let mut conjugation_types: Vec<String> = Vec::new();
    for token in all_tokens {
        if let Some(conj) = &token.conjugation {
            if !conjugation_types.iter().any(|c| c == conj) {
                conjugation_types.push(conj.clone());
            }
        }
    }

    let honorific_score: f64 = all_tokens
        .iter()
        .map(|t| {
            if t.surface.contains(HONORIFIC_COPULA) {
                3.0
            } else if POLITE_ENDERS.iter().any(|e| t.surface.ends_with(e)) {
                1.0
            } else if HONORIFIC_PREFIXES.iter().any(|p| t.surface.contains(p)) {
                1.0
            } else {
                0.0
            }
        })
        .sum();

    let particles = all_tokens.iter().filter(|t| t.pos == POS_PARTICLE).count();
    let particle_density = if all_tokens.is_empty() {
        0.0
    } else {
        particles as f64 / all_tokens.len() as f64 * 100.0
    };

    let readings: Vec<&String> = all_tokens.iter().filter_map(|t| t.reading.as_ref()).collect();
    let unique_readings = readings.iter().collect::<HashSet<_>>().len();
    let reading_variety = if readings.is_empty() {
        0.0
    } else {
        unique_readings as f64 / readings.len() as f64 * 100.0
    };

    DetailedMetrics {
        kanji_density,
        unique_kanji,
        conjugation_types,
        honorific_score,
        sentence_length: all_tokens.len(),
        particle_density,
        reading_variety,
    }
}

/// Weighted vocabulary score over content tokens: word complexity share,
/// kanji usage, conjugation variety, formality.
pub(crate) fn vocabulary_level(tokens: &[Morpheme], metrics: &DetailedMetrics) -> VocabularyLevel {
    let complex = tokens
        .iter()
        .filter(|t| t.pos == POS_VERB || t.pos == POS_ADJECTIVE || kanji_count(&t.surface) > 2)
        .count();

    let mut score = 0.0;
    score += complex as f64 / tokens.len() as f64 * 40.0;
    score += metrics.kanji_density / 2.0 * 0.3;
    score += metrics.conjugation_types.len() as f64 * 5.0;
    score += metrics.honorific_score * 2.0;

    if score > VOCABULARY_THRESHOLDS[0] {
        VocabularyLevel::Advanced
    } else if score > VOCABULARY_THRESHOLDS[1] {
        VocabularyLevel::UpperIntermediate
    } else if score > VOCABULARY_THRESHOLDS[2] {
        VocabularyLevel::Intermediate
    } else if score > VOCABULARY_THRESHOLDS[3] {
        VocabularyLevel::UpperBeginner
    } else {
        VocabularyLevel::Beginner
    }
}

/// Final tier estimate: equal parts grammar, reading, vocabulary, and
/// sentence structure.
pub(crate) fn estimate_jlpt_level(
    grammar_complexity: f64,
    reading_complexity: f64,
    metrics: &DetailedMetrics,
) -> JlptLevel {
    let vocab_score = (metrics.unique_kanji as f64 * 2.0
        + metrics.conjugation_types.len() as f64 * 5.0
        + metrics.honorific_score * 3.0)
        .min(100.0);

    let structure_score = (metrics.particle_density * 0.5
        + metrics.sentence_length as f64 * 2.0
        + metrics.reading_variety * 0.5)
        .min(100.0);

    let score = grammar_complexity * 0.25
        + reading_complexity * 0.25
        + vocab_score * 0.25
        + structure_score * 0.25;

    if score > JLPT_THRESHOLDS[0] {
        JlptLevel::N1
    } else if score > JLPT_THRESHOLDS[1] {
        JlptLevel::N2
    } else if score > JLPT_THRESHOLDS[2] {
        JlptLevel::N3
    } else if score > JLPT_THRESHOLDS[3] {
        JlptLevel::N4
    } else {
        JlptLevel::N5
    }
}

/// Register classification from respectful/humble sub-tags on content words.
pub(crate) fn honorific_register(tokens: &[Morpheme]) -> HonorificRegister {
    let honorific_words = tokens
        .iter()
        .filter(|t| {
            t.pos_detail
                .iter()
                .any(|d| d == POS_DETAIL_RESPECTFUL || d == POS_DETAIL_HUMBLE)
        })
        .count();

    if honorific_words > 2 {
        HonorificRegister::Formal
    } else if honorific_words > 0 {
        HonorificRegister::Polite
    } else {
        HonorificRegister::Casual
    }
}

/// Assemble the full analysis from content tokens, the unfiltered sequence,
/// the raw text, and the matched grammar points. `tokens` must be non-empty.
pub(crate) fn build_analysis(
    tokens: &[Morpheme],
    all_tokens: &[Morpheme],
    text: &str,
    grammar_points: Vec<GrammarPoint>,
) -> ComplexityAnalysis {
    let unique_words = tokens
        .iter()
        .map(|t| t.basic.as_str())
        .collect::<HashSet<_>>()
        .len();
    let avg_word_length = tokens
        .iter()
        .map(|t| t.surface.chars().count() as f64)
        .sum::<f64>()
        / tokens.len() as f64;

    let reading = reading_complexity(tokens);
    let grammar = grammar_complexity(&grammar_points);
    let metrics = detailed_metrics(all_tokens, text);

    ComplexityAnalysis {
        unique_words,
        avg_word_length,
        reading_complexity: reading,
        grammar_complexity: grammar,
        vocabulary_level: vocabulary_level(tokens, &metrics),
        jlpt_level: estimate_jlpt_level(grammar, reading, &metrics),
        kanji_density: metrics.kanji_density,
        unique_kanji: metrics.unique_kanji,
        honorific_level: honorific_register(tokens),
        sentence_length: metrics.sentence_length,
        particle_density: metrics.particle_density,
        reading_variety: metrics.reading_variety,
        conjugation_types: metrics.conjugation_types,
        grammar_points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(surface: &str, reading: Option<&str>, pos: &str) -> Morpheme {
        Morpheme {
            surface: surface.to_string(),
            reading: reading.map(|r| r.to_string()),
            basic: surface.to_string(),
            pos: pos.to_string(),
            pos_detail: vec![],
            conjugation: None,
            conjugation_type: None,
        }
    }

    #[test]
    fn test_kanji_range_bounds() {
        assert!(is_kanji('犬'));
        assert!(is_kanji('一'));
        assert!(!is_kanji('ぬ'));
        assert!(!is_kanji('ア'));
        assert!(!is_kanji('a'));
    }

    #[test]
    fn test_reading_complexity_counts_kanji_and_long_readings() {
        // 勉強: two kanji → 4, reading べんきょう is 5 chars → +2.
        let tokens = vec![token("勉強", Some("べんきょう"), "名詞")];
        assert_eq!(reading_complexity(&tokens), 6.0);
    }

    #[test]
    fn test_reading_complexity_caps_at_100() {
        let tokens: Vec<Morpheme> = (0..60)
            .map(|_| token("漢字", Some("かんじ"), "名詞"))
            .collect();
        assert_eq!(reading_complexity(&tokens), 100.0);
    }

    #[test]
    fn test_grammar_complexity_weights_by_tier() {
        let points = vec![
            GrammarPoint {
                name: "passive".into(),
                level: JlptLevel::N4,
                description: String::new(),
            },
            GrammarPoint {
                name: "humble".into(),
                level: JlptLevel::N2,
                description: String::new(),
            },
        ];
        // N4 → 2×10, N2 → 4×10.
        assert_eq!(grammar_complexity(&points), 60.0);
    }

    #[test]
    fn test_kanji_density_over_chars() {
        let tokens = vec![token("犬", Some("いぬ"), "名詞")];
        let metrics = detailed_metrics(&tokens, "犬が好き");
        // 2 kanji (犬, 好) in 4 chars.
        assert_eq!(metrics.kanji_density, 50.0);
        assert_eq!(metrics.unique_kanji, 2);
    }

    #[test]
    fn test_honorific_score_accumulates() {
        let tokens = vec![
            token("ございます", Some("ございます"), "助動詞"),
            token("です", Some("です"), "助動詞"),
            token("お茶", Some("おちゃ"), "名詞"),
            token("走る", Some("はしる"), "動詞"),
        ];
        let metrics = detailed_metrics(&tokens, "ございますですお茶走る");
        assert_eq!(metrics.honorific_score, 5.0);
    }

    #[test]
    fn test_particle_density() {
        let tokens = vec![
            token("犬", Some("いぬ"), "名詞"),
            token("が", Some("が"), "助詞"),
            token("走る", Some("はしる"), "動詞"),
            token("よ", Some("よ"), "助詞"),
        ];
        let metrics = detailed_metrics(&tokens, "犬が走るよ");
        assert_eq!(metrics.particle_density, 50.0);
    }

    #[test]
    fn test_reading_variety_ignores_missing_readings() {
        let tokens = vec![
            token("犬", Some("いぬ"), "名詞"),
            token("犬", Some("いぬ"), "名詞"),
            token("?", None, "記号"),
        ];
        let metrics = detailed_metrics(&tokens, "犬犬?");
        assert_eq!(metrics.reading_variety, 50.0);
    }

    #[test]
    fn test_honorific_register_tiers() {
        let respectful = |n: usize| -> Vec<Morpheme> {
            (0..n)
                .map(|_| {
                    let mut t = token("召し上がる", Some("めしあがる"), "動詞");
                    t.pos_detail = vec!["尊敬語".to_string()];
                    t
                })
                .collect()
        };
        assert_eq!(honorific_register(&respectful(0)), HonorificRegister::Casual);
        assert_eq!(honorific_register(&respectful(2)), HonorificRegister::Polite);
        assert_eq!(honorific_register(&respectful(3)), HonorificRegister::Formal);
    }

    #[test]
    fn test_build_analysis_is_deterministic() {
        let tokens = vec![
            token("勉強", Some("べんきょう"), "名詞"),
            token("する", Some("する"), "動詞"),
        ];
        let all = tokens.clone();
        let a = build_analysis(&tokens, &all, "勉強する", Vec::new());
        let b = build_analysis(&tokens, &all, "勉強する", Vec::new());
        assert_eq!(a, b);
    }

    #[test]
    fn test_simple_text_estimates_low_tier() {
        let tokens = vec![token("犬", Some("いぬ"), "名詞")];
        let metrics = detailed_metrics(&tokens, "犬");
        assert_eq!(estimate_jlpt_level(0.0, 2.0, &metrics), JlptLevel::N5);
    }
}
