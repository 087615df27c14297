//! API key authentication.
//!
//! The expected key is resolved once at startup; request handling only compares against it.

/// Expected API key for authenticated calls.
#[derive(Clone)]
pub struct ApiKey(String);

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(**redacted**)")
    }
}

impl ApiKey {
    /// Wraps an expected key. Blank keys are rejected.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    /// Reads the expected key from the `API_KEY` environment variable.
    pub fn from_env() -> Option<Self> {
        std::env::var("API_KEY").ok().and_then(Self::new)
    }

    /// Validates the provided API key against the expected one.
    ///
    /// Returns `Ok(())` if the key matches, or `Unauthenticated` otherwise.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self, provided_key: &str) -> Result<(), tonic::Status> {
        if provided_key == self.0 {
            Ok(())
        } else {
            Err(tonic::Status::unauthenticated("Invalid API key"))
        }
    }
}
