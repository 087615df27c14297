//! Triage service tying the rule engine, the history suggester and the combiner together.

use crate::combiner::{combine, TriageResult};
use crate::config::TriageConfig;
use crate::error::CoreResult;
use crate::history::{EmergencyHistory, HistorySuggester, HistorySuggestion};
use crate::input::TriageInput;
use crate::rules::{RuleEngine, RuleSuggestion};
use chrono::NaiveDate;
use std::sync::Arc;

/// Today's date in the local time zone, the reference day for age computation.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Pure triage operations - no API concerns
#[derive(Clone)]
pub struct TriageService {
    engine: RuleEngine,
    suggester: HistorySuggester,
    history: Arc<dyn EmergencyHistory>,
}

impl std::fmt::Debug for TriageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriageService")
            .field("engine", &self.engine)
            .field("suggester", &self.suggester)
            .finish_non_exhaustive()
    }
}

impl TriageService {
    /// Service over the built-in rule table and the given history store.
    pub fn new(cfg: &TriageConfig, history: Arc<dyn EmergencyHistory>) -> Self {
        Self::with_engine(RuleEngine::builtin(), cfg, history)
    }

    /// Service over a custom rule engine.
    pub fn with_engine(
        engine: RuleEngine,
        cfg: &TriageConfig,
        history: Arc<dyn EmergencyHistory>,
    ) -> Self {
        Self {
            engine,
            suggester: HistorySuggester::new(cfg.history_limit()),
            history,
        }
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    /// Rule-based branch only. Never touches the history store.
    pub fn evaluate_rules(&self, input: &TriageInput, today: NaiveDate) -> RuleSuggestion {
        self.engine.evaluate(input, today)
    }

    /// History-based branch only.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the history cannot be read.
    pub fn suggest_from_history(&self, motive: &str) -> CoreResult<HistorySuggestion> {
        self.suggester.suggest(motive, self.history.as_ref())
    }

    /// Full suggestion measured at `today`.
    ///
    /// A failing history store degrades the result to rule-based only.
    pub fn suggest_at(&self, input: &TriageInput, today: NaiveDate) -> TriageResult {
        let rule_based = self.evaluate_rules(input, today);
        let history_based = self
            .suggest_from_history(input.motive())
            .unwrap_or_else(|e| {
                tracing::warn!("history suggestion unavailable, using rules only: {}", e);
                HistorySuggestion::empty()
            });
        combine(rule_based, history_based)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TriageError;
    use crate::history::{HistoricalEmergency, InMemoryHistory, StoredEmergency};
    use crate::priority::PriorityCode;
    use chrono::{TimeZone, Utc};
    use triage_types::MotiveText;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn stored(code: &str, description: &str, minute: u32) -> StoredEmergency {
        StoredEmergency {
            alert_code: Some(code.into()),
            description: Some(description.into()),
            created_at: Utc.with_ymd_and_hms(2026, 10, 17, 9, minute, 0).unwrap(),
        }
    }

    struct OfflineHistory;

    impl EmergencyHistory for OfflineHistory {
        fn list_recent_with_alert_code(
            &self,
            _limit: usize,
        ) -> CoreResult<Vec<HistoricalEmergency>> {
            Err(TriageError::HistoryUnavailable("connection refused".into()))
        }
    }

    #[test]
    fn history_can_raise_the_final_code() {
        let history = InMemoryHistory::new(vec![
            stored("rosso", "dolore addominale con ipotensione", 1),
            stored("rosso", "dolore addominale e sudorazione", 2),
            stored("giallo", "dolore addominale", 3),
        ]);
        let service = TriageService::new(&TriageConfig::default(), Arc::new(history));
        let input = TriageInput::from_motive(MotiveText::new("dolore addominale").unwrap());

        let out = service.suggest_at(&input, day());
        assert_eq!(out.rule_based.code, PriorityCode::Giallo);
        assert_eq!(out.history_based.code, Some(PriorityCode::Rosso));
        assert_eq!(out.code, Some(PriorityCode::Rosso));
        assert!(out.reason.contains(" | 3 emergenze simili recenti"));
    }

    #[test]
    fn offline_history_degrades_to_rules_only() {
        let service = TriageService::new(&TriageConfig::default(), Arc::new(OfflineHistory));
        let input = TriageInput::from_motive(MotiveText::new("dolore toracico").unwrap());

        let out = service.suggest_at(&input, day());
        assert_eq!(out.code, Some(PriorityCode::Rosso));
        assert_eq!(out.history_based, HistorySuggestion::empty());
        assert_eq!(out.reason, out.rule_based.reason());
    }
}
