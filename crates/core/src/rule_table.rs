//! Declarative rule table behind the keyword rule engine.
//!
//! Keyword lists, vital-sign thresholds and reason strings live in one serialisable table. The
//! server evaluates the built-in table; a local estimator can evaluate the same table exported as
//! JSON, so both produce identical codes and reasons for identical input.

use crate::error::{CoreResult, TriageError};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Numeric cut-offs used by the vital-sign and demographic rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalThresholds {
    /// Systolic pressure strictly below this is rosso (mmHg).
    pub systolic_critical_below: i32,
    /// Systolic pressure strictly below this is arancio (mmHg).
    pub systolic_low_below: i32,
    /// Heart rate strictly above this is arancio (bpm).
    pub heart_rate_critical_above: i32,
    /// Heart rate strictly above this is giallo (bpm).
    pub heart_rate_high_above: i32,
    /// Saturation strictly below this is rosso (%).
    pub saturation_critical_below: i32,
    /// Saturation strictly below this is arancio (%).
    pub saturation_low_below: i32,
    /// Temperature at or above this is giallo (°C).
    pub fever_at_or_above: f64,
    /// Age at or above which a case is softened towards arancio (years).
    pub elderly_age: u32,
}

/// Human-readable justification attached when each rule fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleReasons {
    pub red_keywords: String,
    pub amber_keywords: String,
    pub mild_keywords: String,
    pub systolic_critical: String,
    pub systolic_low: String,
    pub heart_rate_critical: String,
    pub heart_rate_high: String,
    pub saturation_critical: String,
    pub saturation_low: String,
    pub fever: String,
    pub elderly: String,
    /// Used when no rule fired.
    pub default: String,
}

/// Complete rule set evaluated by [`crate::rules::RuleEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTable {
    /// Any one of these terms makes the motive rosso.
    pub red_keywords: Vec<String>,
    /// Groups of terms that make the motive rosso when all terms of a group appear.
    pub red_compound: Vec<Vec<String>>,
    /// Checked only when no red term matched; elevates to giallo.
    pub amber_keywords: Vec<String>,
    /// Checked only when no red or amber term matched; keeps verde with a reason.
    pub mild_keywords: Vec<String>,
    pub thresholds: VitalThresholds,
    pub reasons: RuleReasons,
}

fn terms(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}

static BUILTIN: Lazy<Arc<RuleTable>> = Lazy::new(|| {
    Arc::new(RuleTable {
        red_keywords: terms(&[
            "dolore toracico",
            "arresto cardiaco",
            "arresto respiratorio",
            "infarto",
            "ictus",
            "emorragia",
            "perdita di coscienza",
            "incosciente",
            "non risponde",
            "dispnea grave",
            "anafilassi",
            "shock",
            "convulsioni",
            "trauma cranico",
            "politrauma",
            "overdose",
            "avvelenamento",
            "soffocamento",
        ]),
        red_compound: vec![terms(&["incidente", "grave"])],
        amber_keywords: terms(&[
            "dolore addominale",
            "febbre alta",
            "frattura",
            "dispnea",
            "difficoltà respiratoria",
            "vomito persistente",
            "sanguinamento",
            "ferita profonda",
            "dolore intenso",
            "disidratazione",
            "crisi asmatica",
            "reazione allergica",
            "svenimento",
            "sincope",
            "cefalea intensa",
            "palpitazioni",
            "trauma",
        ]),
        mild_keywords: terms(&[
            "tosse",
            "raffreddore",
            "mal di gola",
            "mal di testa",
            "distorsione",
            "contusione",
            "escoriazione",
            "puntura",
            "eruzione cutanea",
            "nausea",
            "febbre",
        ]),
        thresholds: VitalThresholds {
            systolic_critical_below: 90,
            systolic_low_below: 100,
            heart_rate_critical_above: 130,
            heart_rate_high_above: 110,
            saturation_critical_below: 90,
            saturation_low_below: 94,
            fever_at_or_above: 39.5,
            elderly_age: 75,
        },
        reasons: RuleReasons {
            red_keywords: "Sintomi ad alto rischio rilevati nel motivo di accesso".into(),
            amber_keywords: "Sintomi che richiedono una valutazione rapida".into(),
            mild_keywords: "Sintomi minori nel motivo di accesso".into(),
            systolic_critical: "Pressione sistolica inferiore a 90 mmHg".into(),
            systolic_low: "Pressione sistolica inferiore a 100 mmHg".into(),
            heart_rate_critical: "Frequenza cardiaca superiore a 130 bpm".into(),
            heart_rate_high: "Frequenza cardiaca superiore a 110 bpm".into(),
            saturation_critical: "Saturazione di ossigeno inferiore al 90%".into(),
            saturation_low: "Saturazione di ossigeno inferiore al 94%".into(),
            fever: "Temperatura corporea pari o superiore a 39,5 °C".into(),
            elderly: "Paziente di età pari o superiore a 75 anni".into(),
            default: "Nessun criterio di urgenza rilevato: codice verde di base".into(),
        },
    })
});

impl RuleTable {
    /// The built-in Italian rule table.
    pub fn builtin() -> &'static RuleTable {
        &BUILTIN
    }

    /// Shared handle to the built-in table.
    pub(crate) fn builtin_shared() -> Arc<RuleTable> {
        Arc::clone(&BUILTIN)
    }

    /// Loads a table from JSON, normalising every term to trimmed lowercase.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::Deserialization` for malformed JSON and `TriageError::InvalidInput`
    /// if a compound group is empty once blank terms are removed (it would match every motive).
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let table: RuleTable = serde_json::from_str(json).map_err(TriageError::Deserialization)?;
        table.normalised()
    }

    /// Renders the table as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> CoreResult<String> {
        serde_json::to_string_pretty(self).map_err(TriageError::Serialization)
    }

    fn normalised(mut self) -> CoreResult<Self> {
        fn clean(list: &mut Vec<String>) {
            *list = list
                .iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect();
        }

        clean(&mut self.red_keywords);
        clean(&mut self.amber_keywords);
        clean(&mut self.mild_keywords);
        for group in &mut self.red_compound {
            clean(group);
            if group.is_empty() {
                return Err(TriageError::InvalidInput(
                    "red_compound groups must contain at least one term".into(),
                ));
            }
        }
        Ok(self)
    }
}
