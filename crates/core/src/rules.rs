//! Keyword and threshold rule engine.
//!
//! Evaluation starts from a verde baseline and only ever elevates:
//!
//! 1. **Motive text**, first match wins: red terms (or a complete red compound group), else
//!    amber terms, else mild terms.
//! 2. **Vital signs**, each rule independent and stacking: systolic pressure, heart rate,
//!    saturation, temperature.
//! 3. **Age**: a patient of 75 or older is softened towards arancio when the code is still less
//!    urgent than that.
//!
//! Every rule that fires contributes one reason, in evaluation order. When nothing fires the
//! default reason is emitted and the code stays verde.

use crate::constants::RULE_REASON_SEPARATOR;
use crate::fiscal_code;
use crate::input::TriageInput;
use crate::priority::{elevate, PriorityCode};
use crate::rule_table::RuleTable;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Outcome of the rule engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSuggestion {
    pub code: PriorityCode,
    /// Never empty.
    pub reasons: Vec<String>,
}

impl RuleSuggestion {
    /// Reasons joined into a single justification.
    pub fn reason(&self) -> String {
        self.reasons.join(RULE_REASON_SEPARATOR)
    }
}

/// Evaluates a [`RuleTable`] against triage input.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    table: Arc<RuleTable>,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RuleEngine {
    /// Engine over the built-in table.
    pub fn builtin() -> Self {
        Self {
            table: RuleTable::builtin_shared(),
        }
    }

    /// Engine over a custom table, typically one loaded with [`RuleTable::from_json`].
    pub fn new(table: RuleTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Evaluates all rules, measuring the patient's age at `today`.
    pub fn evaluate(&self, input: &TriageInput, today: NaiveDate) -> RuleSuggestion {
        let table = &*self.table;
        let mut acc = Accumulator::new();

        let text = input.motive().to_lowercase();
        if self.matches_red(&text) {
            acc.fire(PriorityCode::Rosso, &table.reasons.red_keywords);
        } else if contains_any(&text, &table.amber_keywords) {
            acc.fire(PriorityCode::Giallo, &table.reasons.amber_keywords);
        } else if contains_any(&text, &table.mild_keywords) {
            acc.fire(PriorityCode::Verde, &table.reasons.mild_keywords);
        }

        let vitals = input.vitals();
        let limits = &table.thresholds;

        if let Some(systolic) = vitals.systolic {
            if systolic < limits.systolic_critical_below {
                acc.fire(PriorityCode::Rosso, &table.reasons.systolic_critical);
            } else if systolic < limits.systolic_low_below {
                acc.fire(PriorityCode::Arancio, &table.reasons.systolic_low);
            }
        }

        if let Some(rate) = vitals.heart_rate_bpm {
            if rate > limits.heart_rate_critical_above {
                acc.fire(PriorityCode::Arancio, &table.reasons.heart_rate_critical);
            } else if rate > limits.heart_rate_high_above {
                acc.fire(PriorityCode::Giallo, &table.reasons.heart_rate_high);
            }
        }

        if let Some(saturation) = vitals.oxygen_saturation_pct {
            if saturation < limits.saturation_critical_below {
                acc.fire(PriorityCode::Rosso, &table.reasons.saturation_critical);
            } else if saturation < limits.saturation_low_below {
                acc.fire(PriorityCode::Arancio, &table.reasons.saturation_low);
            }
        }

        if let Some(temperature) = vitals.temperature_c {
            if temperature >= limits.fever_at_or_above {
                acc.fire(PriorityCode::Giallo, &table.reasons.fever);
            }
        }

        let identity = input
            .fiscal_code()
            .and_then(|cf| fiscal_code::decode(cf, today));
        if let Some(identity) = identity {
            if identity.age >= limits.elderly_age
                && PriorityCode::Arancio.is_more_urgent_than(acc.code)
            {
                acc.code = PriorityCode::Arancio;
                acc.reasons.push(table.reasons.elderly.clone());
            }
        }

        if acc.reasons.is_empty() {
            acc.reasons.push(table.reasons.default.clone());
        }

        tracing::debug!(
            code = %acc.code,
            reasons = acc.reasons.len(),
            "rule evaluation complete"
        );

        RuleSuggestion {
            code: acc.code,
            reasons: acc.reasons,
        }
    }

    fn matches_red(&self, text: &str) -> bool {
        contains_any(text, &self.table.red_keywords)
            || self
                .table
                .red_compound
                .iter()
                .any(|group| group.iter().all(|term| text.contains(term.as_str())))
    }
}

struct Accumulator {
    code: PriorityCode,
    reasons: Vec<String>,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            code: PriorityCode::Verde,
            reasons: Vec::new(),
        }
    }

    fn fire(&mut self, target: PriorityCode, reason: &str) {
        self.code = elevate(self.code, target);
        self.reasons.push(reason.to_string());
    }
}

fn contains_any(text: &str, terms: &[String]) -> bool {
    terms.iter().any(|term| text.contains(term.as_str()))
}
