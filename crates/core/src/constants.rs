//! Constants used throughout the triage core crate.
//!
//! Fixed limits of the history suggester and the defaults applied when no configuration
//! override is supplied.

/// Number of most-recent emergencies read from the history store.
pub const DEFAULT_HISTORY_LIMIT: usize = 120;

/// Default deadline for the history read, in milliseconds.
pub const DEFAULT_HISTORY_TIMEOUT_MS: u64 = 750;

/// Minimum token length (in characters) kept by the motive tokenizer.
pub const MIN_TOKEN_CHARS: usize = 4;

/// Distinct token hits needed for a historical description to count as similar.
pub const HITS_PER_MATCH: usize = 2;

/// Similar emergencies needed before the history suggester offers a code.
pub const MIN_SIMILAR_EMERGENCIES: usize = 3;

/// Reason returned when similar emergencies exist but none carries a usable code.
pub const NO_RECORDED_CODE_REASON: &str = "Emergenze simili senza codice registrato";

/// Separator between rule reasons in the combined justification.
pub const RULE_REASON_SEPARATOR: &str = "; ";

/// Separator between the rule-based and history-based justifications.
pub const SOURCE_REASON_SEPARATOR: &str = " | ";
