use thiserror::Error;

pub const MAX_GUESS_CHARS: usize = 200;

/// Validated guess text (trimmed, non-empty, bounded length).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Guess(String);

impl Guess {
    /// Create a validated guess.
    ///
    /// # Errors
    ///
    /// Returns `GuessError::Empty` if the text is empty after trimming and
    /// `GuessError::TooLong` if it exceeds `MAX_GUESS_CHARS` characters.
    pub fn new(value: impl Into<String>) -> Result<Self, GuessError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(GuessError::Empty);
        }
        let len = trimmed.chars().count();
        if len > MAX_GUESS_CHARS {
            return Err(GuessError::TooLong {
                len,
                max: MAX_GUESS_CHARS,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Guess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GuessError {
    #[error("guess cannot be empty")]
    Empty,

    #[error("guess is too long ({len} characters, max {max})")]
    TooLong { len: usize, max: usize },
}
