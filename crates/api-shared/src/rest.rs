//! JSON request and response bodies for the REST API.
//!
//! Intake clients send vital signs as whatever the form produced: strings, numbers, or nothing.
//! Strings and numbers are kept as text for the core's lenient parser; every other JSON type is
//! treated as absent instead of failing the request.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use triage_core::{
    HistorySuggestion, MotiveText, RawVitalSigns, RuleSuggestion, TextError, TriageInput,
    TriageResult,
};
use utoipa::ToSchema;

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Vital signs as sent by intake clients.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct VitalSignsReq {
    /// Free text such as "120/80".
    #[serde(default, deserialize_with = "lenient_text")]
    #[schema(value_type = Option<String>, example = "120/80")]
    pub blood_pressure: Option<String>,
    /// Celsius, string or number; a comma decimal separator is accepted.
    #[serde(default, deserialize_with = "lenient_text")]
    #[schema(value_type = Option<String>, example = "37,8")]
    pub body_temperature: Option<String>,
    /// Beats per minute, string or number.
    #[serde(default, deserialize_with = "lenient_text")]
    #[schema(value_type = Option<String>, example = "92")]
    pub heart_rate: Option<String>,
    /// Percent, string or number.
    #[serde(default, deserialize_with = "lenient_text")]
    #[schema(value_type = Option<String>, example = "97")]
    pub oxygen_saturation: Option<String>,
}

impl From<VitalSignsReq> for RawVitalSigns {
    fn from(req: VitalSignsReq) -> Self {
        RawVitalSigns {
            blood_pressure: req.blood_pressure,
            body_temperature: req.body_temperature,
            heart_rate: req.heart_rate,
            oxygen_saturation: req.oxygen_saturation,
        }
    }
}

/// Body of `POST /triage/suggest` and `POST /triage/estimate`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SuggestPriorityReq {
    /// Access motive; at least 3 characters after trimming.
    #[schema(example = "dolore toracico improvviso")]
    pub motivo_accesso: String,
    #[serde(default)]
    #[schema(example = "RSSMRA46M15H501X")]
    pub codice_fiscale: Option<String>,
    #[serde(default)]
    pub vital_signs: Option<VitalSignsReq>,
}

impl SuggestPriorityReq {
    /// Validates the motive and parses the request into engine input.
    ///
    /// # Errors
    ///
    /// Returns a `TextError` if `motivo_accesso` is too short after trimming.
    pub fn into_input(self) -> Result<TriageInput, TextError> {
        let motive = MotiveText::new(&self.motivo_accesso)?;
        let vitals: RawVitalSigns = self.vital_signs.unwrap_or_default().into();
        Ok(TriageInput::new(motive, self.codice_fiscale, &vitals))
    }
}

/// Rule-based branch of a suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RuleBasedRes {
    #[schema(example = "rosso")]
    pub code: String,
    pub reason: String,
}

impl From<&RuleSuggestion> for RuleBasedRes {
    fn from(rules: &RuleSuggestion) -> Self {
        Self {
            code: rules.code.to_string(),
            reason: rules.reason(),
        }
    }
}

/// History-based branch of a suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HistoryBasedRes {
    pub code: Option<String>,
    pub reason: Option<String>,
    /// Number of similar recent emergencies.
    pub matches: usize,
}

impl From<&HistorySuggestion> for HistoryBasedRes {
    fn from(history: &HistorySuggestion) -> Self {
        Self {
            code: history.code.map(|c| c.to_string()),
            reason: history.reason.clone(),
            matches: history.match_count,
        }
    }
}

/// Response of `POST /triage/suggest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SuggestPriorityRes {
    pub code: Option<String>,
    pub rule_based: RuleBasedRes,
    pub history_based: HistoryBasedRes,
    pub reason: String,
}

impl From<&TriageResult> for SuggestPriorityRes {
    fn from(result: &TriageResult) -> Self {
        Self {
            code: result.code.map(|c| c.to_string()),
            rule_based: (&result.rule_based).into(),
            history_based: (&result.history_based).into(),
            reason: result.reason.clone(),
        }
    }
}

/// Error body for rejected requests.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}
