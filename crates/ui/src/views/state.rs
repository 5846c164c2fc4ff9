#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    EmptyGuess,
    GuessTooLong,
    Scoring,
    GameOver,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::EmptyGuess => "Type a guess first.",
            ViewError::GuessTooLong => "That guess is too long.",
            ViewError::Scoring => "Couldn't score that guess. Please try again.",
            ViewError::GameOver => "The game is over. Start a new one to keep playing.",
            ViewError::Unknown => "Something went wrong. Please try again.",
        }
    }

    /// Whether the same request can simply be sent again.
    #[must_use]
    pub fn is_retryable(self) -> bool {
        matches!(self, ViewError::Scoring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_scoring_errors_offer_retry() {
        assert!(ViewError::Scoring.is_retryable());
        assert!(!ViewError::EmptyGuess.is_retryable());
        assert!(ViewError::Scoring.message().contains("try again"));
    }
}
