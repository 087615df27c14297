//! # Triage Core
//!
//! Core business logic for emergency-room triage priority suggestion.
//!
//! This crate contains the pure classification engine and its single I/O port:
//! - Priority codes and the urgency ordering (`priority`)
//! - Lenient vital-sign parsing (`vitals`) and fiscal-code age/gender decoding (`fiscal_code`)
//! - The keyword/threshold rule engine over a declarative rule table (`rules`, `rule_table`)
//! - The history-based suggester and the emergency history read port (`history`)
//! - Combination of both suggestions (`combiner`) behind `TriageService`
//!
//! **No API concerns**: Authentication, HTTP/gRPC servers, or deadlines belong in `api-grpc`,
//! `api-rest`, or `api-shared`.

#[macro_use]
mod macros;

pub mod combiner;
pub mod config;
pub mod constants;
pub mod error;
pub mod fiscal_code;
pub mod history;
pub mod input;
pub mod priority;
pub mod rule_table;
pub mod rules;
pub mod service;
pub mod vitals;

pub use combiner::{combine, TriageResult};
pub use config::TriageConfig;
pub use error::{CoreResult, TriageError};
pub use fiscal_code::{DecodedIdentity, Gender};
pub use history::{
    EmergencyHistory, EmptyHistory, HistoricalEmergency, HistorySuggester, HistorySuggestion,
    InMemoryHistory, JsonFileHistory, StoredEmergency,
};
pub use input::TriageInput;
pub use priority::{elevate, pick_more_urgent, PriorityCode};
pub use rule_table::RuleTable;
pub use rules::{RuleEngine, RuleSuggestion};
pub use service::TriageService;
pub use vitals::{RawVitalSigns, VitalSigns};

// Re-export validated text types so API crates need only depend on the core.
pub use triage_types::{MotiveText, TextError};
