//! History-based priority suggestion.
//!
//! Looks for recently recorded emergencies whose description shares at least two significant
//! words with the current motive. With enough similar cases, the codes they were assigned
//! corroborate the rule engine.

pub mod store;

pub use store::{
    EmergencyHistory, EmptyHistory, HistoricalEmergency, InMemoryHistory, JsonFileHistory,
    StoredEmergency,
};

use crate::constants::{
    DEFAULT_HISTORY_LIMIT, HITS_PER_MATCH, MIN_SIMILAR_EMERGENCIES, MIN_TOKEN_CHARS,
    NO_RECORDED_CODE_REASON,
};
use crate::error::CoreResult;
use crate::priority::{pick_more_urgent, PriorityCode};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Outcome of the history suggester.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HistorySuggestion {
    pub code: Option<PriorityCode>,
    pub reason: Option<String>,
    /// Number of similar emergencies found.
    pub match_count: usize,
}

impl HistorySuggestion {
    /// No suggestion and no matches; also the fallback when the store cannot be read.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Splits a motive into significant, de-duplicated lowercase words.
///
/// Punctuation and symbols are removed, words shorter than four characters are dropped and the
/// first occurrence of each word wins.
pub fn tokenize(motive: &str) -> Vec<String> {
    let cleaned: String = motive
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    let mut seen = HashSet::new();
    cleaned
        .split_whitespace()
        .filter(|word| word.chars().count() >= MIN_TOKEN_CHARS)
        .map(str::to_lowercase)
        .filter(|word| seen.insert(word.clone()))
        .collect()
}

/// Mines recent emergencies for a corroborating code.
#[derive(Debug, Clone, Copy)]
pub struct HistorySuggester {
    limit: usize,
}

impl Default for HistorySuggester {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl HistorySuggester {
    /// Suggester that reads at most `limit` recent emergencies.
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// Reads recent emergencies from `store` and derives a suggestion for `motive`.
    ///
    /// A motive with no significant words returns an empty suggestion without touching the store.
    ///
    /// # Errors
    ///
    /// Propagates any error from the store; callers decide how to degrade.
    pub fn suggest(
        &self,
        motive: &str,
        store: &dyn EmergencyHistory,
    ) -> CoreResult<HistorySuggestion> {
        let tokens = tokenize(motive);
        if tokens.is_empty() {
            return Ok(HistorySuggestion::empty());
        }
        let records = store.list_recent_with_alert_code(self.limit)?;
        Ok(suggest_from_records(&tokens, &records))
    }
}

/// Pure part of the suggester: match `tokens` against `records` and tally their codes.
pub fn suggest_from_records(
    tokens: &[String],
    records: &[HistoricalEmergency],
) -> HistorySuggestion {
    let matches: Vec<&HistoricalEmergency> = records
        .iter()
        .filter(|record| is_similar(tokens, &record.description))
        .collect();
    let match_count = matches.len();

    if match_count < MIN_SIMILAR_EMERGENCIES {
        return HistorySuggestion {
            code: None,
            reason: None,
            match_count,
        };
    }

    let mut tally: HashMap<PriorityCode, usize> = HashMap::new();
    for record in &matches {
        if let Ok(code) = record.alert_code.parse::<PriorityCode>() {
            *tally.entry(code).or_default() += 1;
        }
    }

    // Walking codes from most to least urgent makes ties resolve to the more urgent code.
    let mut most_frequent: Option<(PriorityCode, usize)> = None;
    for code in PriorityCode::ALL {
        if let Some(&count) = tally.get(&code) {
            if most_frequent.map_or(true, |(_, best)| count > best) {
                most_frequent = Some((code, count));
            }
        }
    }
    let most_urgent = PriorityCode::ALL
        .into_iter()
        .find(|code| tally.contains_key(code));

    let Some(code) = pick_more_urgent(most_frequent.map(|(code, _)| code), most_urgent) else {
        return HistorySuggestion {
            code: None,
            reason: Some(NO_RECORDED_CODE_REASON.to_string()),
            match_count,
        };
    };

    tracing::debug!(%code, match_count, distinct_codes = tally.len(), "history suggestion");

    HistorySuggestion {
        code: Some(code),
        reason: Some(format!(
            "{match_count} emergenze simili recenti: suggerito codice {code}"
        )),
        match_count,
    }
}

/// A description is similar when it contains at least two distinct tokens.
fn is_similar(tokens: &[String], description: &str) -> bool {
    let description = description.to_lowercase();
    let mut hits = 0;
    for token in tokens {
        if description.contains(token.as_str()) {
            hits += 1;
            if hits >= HITS_PER_MATCH {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TriageError;

    fn record(code: &str, description: &str) -> HistoricalEmergency {
        HistoricalEmergency {
            alert_code: code.into(),
            description: description.into(),
        }
    }

    fn tokens(motive: &str) -> Vec<String> {
        tokenize(motive)
    }

    #[test]
    fn tokenizer_drops_short_words() {
        assert_eq!(tokenize("mal di gola"), vec!["gola"]);
    }

    #[test]
    fn tokenizer_strips_punctuation_lowercases_and_dedupes() {
        assert_eq!(
            tokenize("Dolore, dolore TORACICO!! (forte)"),
            vec!["dolore", "toracico", "forte"]
        );
    }

    #[test]
    fn tokenizer_keeps_accented_letters() {
        assert_eq!(tokenize("difficoltà respiratoria"), vec!["difficoltà", "respiratoria"]);
    }

    #[test]
    fn fewer_than_three_matches_gives_no_code() {
        let records = vec![
            record("rosso", "dolore toracico forte"),
            record("rosso", "dolore toracico al risveglio"),
            record("verde", "dolore al ginocchio"),
        ];
        let out = suggest_from_records(&tokens("dolore toracico"), &records);
        assert_eq!(
            out,
            HistorySuggestion {
                code: None,
                reason: None,
                match_count: 2,
            }
        );
    }

    #[test]
    fn one_token_hit_is_not_a_match() {
        let records = vec![record("giallo", "dolore"); 5];
        let out = suggest_from_records(&tokens("dolore toracico"), &records);
        assert_eq!(out.match_count, 0);
    }

    #[test]
    fn most_frequent_and_most_urgent_prefers_urgent() {
        let records = vec![
            record("giallo", "dolore addominale acuto"),
            record("giallo", "dolore addominale dopo pasto"),
            record("giallo", "forte dolore addominale"),
            record("arancio", "dolore addominale e vomito"),
        ];
        let out = suggest_from_records(&tokens("dolore addominale"), &records);
        assert_eq!(out.code, Some(PriorityCode::Arancio));
        assert_eq!(out.match_count, 4);
        let reason = out.reason.expect("reason present");
        assert!(reason.contains("arancio"));
        assert!(reason.starts_with("4 "));
    }

    #[test]
    fn unknown_and_empty_codes_are_ignored() {
        let records = vec![
            record("", "caduta dalle scale"),
            record("viola", "caduta dalle scale"),
            record("", "caduta dalle scale con dolore"),
        ];
        let out = suggest_from_records(&tokens("caduta dalle scale"), &records);
        assert_eq!(out.code, None);
        assert_eq!(out.reason.as_deref(), Some(NO_RECORDED_CODE_REASON));
        assert_eq!(out.match_count, 3);
    }

    #[test]
    fn synonym_codes_are_tallied_together() {
        let records = vec![
            record("Arancione", "crisi asmatica notturna"),
            record("arancio", "crisi asmatica"),
            record("VERDE", "crisi asmatica lieve"),
        ];
        let out = suggest_from_records(&tokens("crisi asmatica"), &records);
        assert_eq!(out.code, Some(PriorityCode::Arancio));
    }

    struct FailingHistory;

    impl EmergencyHistory for FailingHistory {
        fn list_recent_with_alert_code(
            &self,
            _limit: usize,
        ) -> CoreResult<Vec<HistoricalEmergency>> {
            Err(TriageError::HistoryUnavailable("database offline".into()))
        }
    }

    #[test]
    fn empty_token_list_skips_the_store() {
        let out = HistorySuggester::default()
            .suggest("mal di re", &FailingHistory)
            .expect("store must not be read");
        assert_eq!(out, HistorySuggestion::empty());
    }

    #[test]
    fn store_errors_are_propagated() {
        let err = HistorySuggester::default()
            .suggest("dolore toracico", &FailingHistory)
            .expect_err("store failure");
        assert!(matches!(err, TriageError::HistoryUnavailable(_)));
    }

    struct CountingLimit(std::sync::Mutex<Option<usize>>);

    impl EmergencyHistory for CountingLimit {
        fn list_recent_with_alert_code(
            &self,
            limit: usize,
        ) -> CoreResult<Vec<HistoricalEmergency>> {
            *self.0.lock().unwrap() = Some(limit);
            Ok(Vec::new())
        }
    }

    #[test]
    fn reads_configured_limit() {
        let store = CountingLimit(std::sync::Mutex::new(None));
        HistorySuggester::default()
            .suggest("dolore toracico", &store)
            .unwrap();
        assert_eq!(*store.0.lock().unwrap(), Some(DEFAULT_HISTORY_LIMIT));
    }
}
