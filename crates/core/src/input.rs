//! The per-request input to the triage engine.

use crate::vitals::{RawVitalSigns, VitalSigns};
use triage_types::MotiveText;

/// One intake request, validated and parsed at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct TriageInput {
    motive: MotiveText,
    fiscal_code: Option<String>,
    vitals: VitalSigns,
}

impl TriageInput {
    /// Builds an input from a validated motive, an optional fiscal code and raw vitals.
    ///
    /// Blank fiscal codes are treated as absent and vitals are parsed leniently.
    pub fn new(motive: MotiveText, fiscal_code: Option<String>, raw_vitals: &RawVitalSigns) -> Self {
        Self {
            motive,
            fiscal_code: fiscal_code.filter(|cf| !cf.trim().is_empty()),
            vitals: VitalSigns::parse(raw_vitals),
        }
    }

    /// Builds an input carrying only the motive text.
    pub fn from_motive(motive: MotiveText) -> Self {
        Self::new(motive, None, &RawVitalSigns::default())
    }

    pub fn motive(&self) -> &str {
        self.motive.as_str()
    }

    pub fn fiscal_code(&self) -> Option<&str> {
        self.fiscal_code.as_deref()
    }

    pub fn vitals(&self) -> &VitalSigns {
        &self.vitals
    }
}
