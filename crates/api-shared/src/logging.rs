//! Default log filter shared by every triage binary.

use tracing_subscriber::filter::{Directive, ParseError};
use tracing_subscriber::EnvFilter;

/// Directives added on top of `RUST_LOG` by every binary.
///
/// `api_shared` is listed so degraded history reads are visible without `RUST_LOG`.
pub const DEFAULT_DIRECTIVES: &[&str] = &["triage=info", "api_shared=info"];

/// `RUST_LOG` plus [`DEFAULT_DIRECTIVES`] plus the binary's own `extra` directives.
///
/// # Errors
///
/// Returns a `ParseError` if one of `extra` is not a valid directive.
pub fn env_filter(extra: &[&str]) -> Result<EnvFilter, ParseError> {
    with_defaults(EnvFilter::from_default_env(), extra)
}

/// Adds [`DEFAULT_DIRECTIVES`] and `extra` to an existing filter.
///
/// # Errors
///
/// Returns a `ParseError` if one of `extra` is not a valid directive.
pub fn with_defaults(mut filter: EnvFilter, extra: &[&str]) -> Result<EnvFilter, ParseError> {
    for directive in DEFAULT_DIRECTIVES.iter().chain(extra) {
        filter = filter.add_directive(directive.parse::<Directive>()?);
    }
    Ok(filter)
}
