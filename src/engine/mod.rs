// ── Yomikata Engine Layer ──────────────────────────────────────────────────
// Domain logic: linguistic analysis and the lexicon store.
// May depend on atoms/ and external crates; never on presentation code.

pub mod analysis;
pub mod store;
