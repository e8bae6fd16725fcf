// ── Analysis: Lexical Override Layer ───────────────────────────────────────
// User-maintained custom dictionary, consulted before segmentation.
// Lookups are by exact surface key; insertion order is irrelevant.
//
// `apply` blanks each matched span with placeholder spaces of equal
// character length so character offsets into the remainder stay aligned
// with the original text.

use crate::atoms::types::{CustomDictionaryEntry, Morpheme};
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
pub struct CustomDictionary {
    entries: RwLock<HashMap<String, Morpheme>>,
}

impl CustomDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the override for `entry.word`.
    pub fn insert(&self, entry: CustomDictionaryEntry) {
        let key = entry.word.clone();
        self.entries.write().insert(key, entry.into());
    }

    pub fn insert_many(&self, entries: impl IntoIterator<Item = CustomDictionaryEntry>) {
        let mut map = self.entries.write();
        for entry in entries {
            let key = entry.word.clone();
            map.insert(key, entry.into());
        }
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Substitute overrides into `text`.
    ///
    /// Returns the matched morphemes plus the text with each matched span
    /// replaced by spaces. Only the first occurrence of each key is claimed;
    /// further occurrences are left for the segmenter. Keys absent from the
    /// text are skipped. Pure over the current dictionary state.
    pub fn apply(&self, text: &str) -> (Vec<Morpheme>, String) {
        let map = self.entries.read();
        let mut matched = Vec::new();
        let mut remaining = text.to_string();

        for (key, morpheme) in map.iter() {
            if remaining.contains(key.as_str()) {
                matched.push(morpheme.clone());
                let placeholder = " ".repeat(key.chars().count());
                remaining = remaining.replacen(key.as_str(), &placeholder, 1);
            }
        }

        (matched, remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(word: &str, pos: &str) -> CustomDictionaryEntry {
        CustomDictionaryEntry {
            word: word.to_string(),
            reading: Some("よみ".to_string()),
            basic: word.to_string(),
            pos: pos.to_string(),
            pos_detail: vec![],
            definitions: vec!["test".to_string()],
            tags: vec![],
            frequency: None,
        }
    }

    #[test]
    fn test_apply_masks_matched_span() {
        let dict = CustomDictionary::new();
        dict.insert(entry("猫", "custom"));

        let (tokens, remaining) = dict.apply("猫が好き");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].surface, "猫");
        assert_eq!(tokens[0].pos, "custom");
        assert_eq!(remaining, " が好き");
        // Character count is preserved.
        assert_eq!(remaining.chars().count(), "猫が好き".chars().count());
    }

    #[test]
    fn test_apply_skips_absent_keys() {
        let dict = CustomDictionary::new();
        dict.insert(entry("犬", "custom"));

        let (tokens, remaining) = dict.apply("猫が好き");
        assert!(tokens.is_empty());
        assert_eq!(remaining, "猫が好き");
    }

    #[test]
    fn test_apply_claims_first_occurrence_only() {
        let dict = CustomDictionary::new();
        dict.insert(entry("猫", "custom"));

        let (tokens, remaining) = dict.apply("猫と猫");
        assert_eq!(tokens.len(), 1);
        assert_eq!(remaining, " と猫");
    }

    #[test]
    fn test_insert_replaces_existing_key() {
        let dict = CustomDictionary::new();
        dict.insert(entry("猫", "noun"));
        dict.insert(entry("猫", "custom"));
        assert_eq!(dict.len(), 1);

        let (tokens, _) = dict.apply("猫");
        assert_eq!(tokens[0].pos, "custom");
    }

    #[test]
    fn test_clear_empties_dictionary() {
        let dict = CustomDictionary::new();
        dict.insert(entry("猫", "custom"));
        dict.clear();
        assert!(dict.is_empty());
    }
}
