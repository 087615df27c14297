//! Merges the rule-based and history-based suggestions into the final triage result.

use crate::constants::SOURCE_REASON_SEPARATOR;
use crate::history::HistorySuggestion;
use crate::priority::{pick_more_urgent, PriorityCode};
use crate::rules::RuleSuggestion;
use serde::{Deserialize, Serialize};

/// Final triage suggestion, keeping both sources for explainability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageResult {
    pub code: Option<PriorityCode>,
    pub rule_based: RuleSuggestion,
    pub history_based: HistorySuggestion,
    /// Rule reasons and history reason, joined with `" | "`.
    pub reason: String,
}

/// Combines both suggestions; the more urgent code wins, the rule engine on ties.
pub fn combine(rule_based: RuleSuggestion, history_based: HistorySuggestion) -> TriageResult {
    let code = pick_more_urgent(Some(rule_based.code), history_based.code);

    let rule_reason = rule_based.reason();
    let reason = [Some(rule_reason.as_str()), history_based.reason.as_deref()]
        .into_iter()
        .flatten()
        .filter(|r| !r.is_empty())
        .collect::<Vec<_>>()
        .join(SOURCE_REASON_SEPARATOR);

    TriageResult {
        code,
        rule_based,
        history_based,
        reason,
    }
}
