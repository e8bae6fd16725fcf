// ── Analysis: Grammar Pattern Engine ───────────────────────────────────────
// Built-in and user-registered grammar patterns over a token sequence.
//
// A pattern matcher is either a literal regex over the surface form or a
// structural predicate over `(tokens, index)` — a named strategy object,
// not an arbitrary injected closure. Patterns are declarative and
// independent: evaluation order affects iteration cost only, never which
// patterns match. A panicking user predicate propagates — one bad pattern
// is a programming error in the extension, not a recoverable condition.

use crate::atoms::types::{GrammarPoint, JlptLevel, Morpheme};
use parking_lot::RwLock;
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;

/// Structural match rule over a token sequence position.
pub trait TokenPredicate: Send + Sync {
    fn matches(&self, tokens: &[Morpheme], index: usize) -> bool;
}

impl<F> TokenPredicate for F
where
    F: Fn(&[Morpheme], usize) -> bool + Send + Sync,
{
    fn matches(&self, tokens: &[Morpheme], index: usize) -> bool {
        self(tokens, index)
    }
}

/// How a pattern decides whether it matches at a position.
pub enum PatternMatcher {
    /// Regex over the surface form of the token at the position.
    Literal(Regex),
    /// Predicate over the whole sequence and the position.
    Structural(Arc<dyn TokenPredicate>),
}

impl PatternMatcher {
    fn matches(&self, tokens: &[Morpheme], index: usize) -> bool {
        match self {
            PatternMatcher::Literal(re) => re.is_match(&tokens[index].surface),
            PatternMatcher::Structural(pred) => pred.matches(tokens, index),
        }
    }
}

/// A grammar pattern with its proficiency tier.
pub struct GrammarPattern {
    pub name: &'static str,
    pub level: JlptLevel,
    pub description: &'static str,
    pub matcher: PatternMatcher,
}

/// A caller-registered pattern. Higher priority evaluates first; ties keep
/// insertion order. Level defaults to N3 when unspecified.
pub struct UserPattern {
    pub name: String,
    pub level: Option<JlptLevel>,
    pub description: String,
    pub priority: i32,
    pub predicate: Arc<dyn TokenPredicate>,
}

pub struct PatternRegistry {
    builtins: Vec<GrammarPattern>,
    user: RwLock<Vec<UserPattern>>,
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternRegistry {
    pub fn new() -> Self {
        PatternRegistry {
            builtins: builtin_patterns(),
            user: RwLock::new(Vec::new()),
        }
    }

    /// Register a user pattern, keeping the list sorted by descending
    /// priority (stable, so equal priorities stay in insertion order).
    pub fn add_user_pattern(&self, pattern: UserPattern) {
        let mut user = self.user.write();
        user.push(pattern);
        user.sort_by_key(|p| std::cmp::Reverse(p.priority));
    }

    /// Remove every user pattern with the given name.
    pub fn remove_user_pattern(&self, name: &str) {
        self.user.write().retain(|p| p.name != name);
    }

    /// Match every pattern against every position and return the
    /// deduplicated grammar points (dedup by pattern name, first match
    /// order preserved).
    pub fn identify(&self, tokens: &[Morpheme]) -> Vec<GrammarPoint> {
        let user = self.user.read();
        let mut found: Vec<GrammarPoint> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for index in 0..tokens.len() {
            for pattern in &self.builtins {
                if pattern.matcher.matches(tokens, index) && seen.insert(pattern.name.to_string()) {
                    found.push(GrammarPoint {
                        name: pattern.name.to_string(),
                        level: pattern.level,
                        description: pattern.description.to_string(),
                    });
                }
            }

            for pattern in user.iter() {
                if pattern.predicate.matches(tokens, index) && seen.insert(pattern.name.clone()) {
                    found.push(GrammarPoint {
                        name: pattern.name.clone(),
                        level: pattern.level.unwrap_or(JlptLevel::N3),
                        description: pattern.description.clone(),
                    });
                }
            }
        }

        found
    }
}

fn ends_with_any(surface: &str, suffixes: &[&str]) -> bool {
    suffixes.iter().any(|s| surface.ends_with(s))
}

fn next_basic_is(tokens: &[Morpheme], index: usize, basics: &'static [&'static str]) -> bool {
    if index + 1 >= tokens.len() {
        return false;
    }
    tokens[index].surface.ends_with('て') && basics.contains(&tokens[index + 1].basic.as_str())
}

/// The built-in pattern set. Constructed once per registry.
fn builtin_patterns() -> Vec<GrammarPattern> {
    fn literal(re: &str) -> PatternMatcher {
        // Built-in expressions are fixed strings; a parse failure is a
        // programming error caught by the unit tests below.
        PatternMatcher::Literal(Regex::new(re).expect("built-in pattern regex"))
    }

    fn structural(pred: impl Fn(&[Morpheme], usize) -> bool + Send + Sync + 'static) -> PatternMatcher {
        PatternMatcher::Structural(Arc::new(pred))
    }

    vec![
        GrammarPattern {
            name: "causative",
            level: JlptLevel::N3,
            description: "Making someone do something",
            matcher: structural(|tokens, i| {
                let t = &tokens[i];
                t.conjugation.as_deref() == Some("causative")
                    || ends_with_any(&t.surface, &["させる", "させられる"])
            }),
        },
        GrammarPattern {
            name: "passive",
            level: JlptLevel::N4,
            description: "Passive voice construction",
            matcher: structural(|tokens, i| {
                let t = &tokens[i];
                t.conjugation.as_deref() == Some("passive")
                    || ends_with_any(&t.surface, &["れる", "られる"])
            }),
        },
        GrammarPattern {
            name: "potential",
            level: JlptLevel::N4,
            description: "Ability to do something",
            matcher: structural(|tokens, i| {
                let t = &tokens[i];
                t.conjugation.as_deref() == Some("potential")
                    || ends_with_any(&t.surface, &["える", "られる"])
            }),
        },
        GrammarPattern {
            name: "volitional",
            level: JlptLevel::N3,
            description: "Expressing intention or invitation",
            matcher: structural(|tokens, i| {
                let t = &tokens[i];
                t.conjugation.as_deref() == Some("volitional")
                    || ends_with_any(&t.surface, &["よう", "ましょう"])
            }),
        },
        GrammarPattern {
            name: "conditional-ba",
            level: JlptLevel::N4,
            description: "If/when conditional using ば",
            matcher: literal("ば$"),
        },
        GrammarPattern {
            name: "conditional-tara",
            level: JlptLevel::N4,
            description: "If/when conditional using たら",
            matcher: literal("(たら|だら)$"),
        },
        GrammarPattern {
            name: "te-form-progressive",
            level: JlptLevel::N4,
            description: "Ongoing action using て-form + いる",
            matcher: structural(|tokens, i| next_basic_is(tokens, i, &["いる", "います"])),
        },
        GrammarPattern {
            name: "honorific",
            level: JlptLevel::N2,
            description: "Honorific or polite expressions",
            matcher: literal("お|ご|ます$|です$"),
        },
        GrammarPattern {
            name: "humble",
            level: JlptLevel::N2,
            description: "Humble expressions",
            matcher: literal("させていただく$|申し上げ"),
        },
        GrammarPattern {
            name: "causative-passive",
            level: JlptLevel::N2,
            description: "Being made to do something",
            matcher: literal("させられる$"),
        },
        GrammarPattern {
            name: "imperative",
            level: JlptLevel::N3,
            description: "Commands or requests",
            matcher: structural(|tokens, i| {
                let t = &tokens[i];
                t.conjugation.as_deref() == Some("imperative")
                    || ends_with_any(&t.surface, &["なさい", "ください"])
            }),
        },
        GrammarPattern {
            name: "benefactive",
            level: JlptLevel::N3,
            description: "Giving/receiving actions",
            matcher: structural(|tokens, i| {
                next_basic_is(tokens, i, &["あげる", "くれる", "もらう"])
            }),
        },
    ]
}
