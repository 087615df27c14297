/// Minimum number of characters in a trimmed access motive.
pub const MIN_MOTIVE_CHARS: usize = 3;

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The trimmed input is shorter than the required minimum
    #[error("Text must be at least {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// Free-text access motive ("motivo di accesso") entered at intake.
///
/// The input is trimmed of leading and trailing whitespace during construction and must then
/// contain at least [`MIN_MOTIVE_CHARS`] characters. Length is counted in characters, not bytes,
/// so accented Italian text is measured the way a clinician would read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotiveText(String);

impl MotiveText {
    /// Creates a new `MotiveText` from the given input.
    ///
    /// # Arguments
    ///
    /// * `input` - Any type that can be converted to a string reference
    ///
    /// # Returns
    ///
    /// Returns `Ok(MotiveText)` if the trimmed input has at least [`MIN_MOTIVE_CHARS`] characters.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` for empty or whitespace-only input, and
    /// `TextError::TooShort` when the trimmed input is shorter than the minimum.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        let actual = trimmed.chars().count();
        if actual < MIN_MOTIVE_CHARS {
            return Err(TextError::TooShort {
                min: MIN_MOTIVE_CHARS,
                actual,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MotiveText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for MotiveText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for MotiveText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for MotiveText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        MotiveText::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let motive = MotiveText::new("  dolore toracico \n").unwrap();
        assert_eq!(motive.as_str(), "dolore toracico");
    }

    #[test]
    fn rejects_whitespace_only() {
        assert_eq!(MotiveText::new("   ").unwrap_err(), TextError::Empty);
    }

    #[test]
    fn rejects_short_motive_after_trimming() {
        let err = MotiveText::new("  ab  ").expect_err("two chars is too short");
        assert_eq!(err, TextError::TooShort { min: 3, actual: 2 });
    }

    #[test]
    fn counts_characters_not_bytes() {
        // "età" is 3 characters but 4 bytes.
        assert!(MotiveText::new("età").is_ok());
        assert!(MotiveText::new("èà").is_err());
    }

    #[test]
    fn deserialise_validates() {
        let ok: MotiveText = serde_json::from_str("\"febbre alta\"").unwrap();
        assert_eq!(ok.to_string(), "febbre alta");

        let err = serde_json::from_str::<MotiveText>("\"no\"").expect_err("too short");
        assert!(err.to_string().contains("at least 3"));
    }
}
