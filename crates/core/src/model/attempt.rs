use chrono::{DateTime, Utc};

use crate::model::{Guess, Similarity};

/// One scored guess within the current level.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    guess: Guess,
    similarity: Similarity,
    submitted_at: DateTime<Utc>,
}

impl Attempt {
    #[must_use]
    pub fn new(guess: Guess, similarity: Similarity, submitted_at: DateTime<Utc>) -> Self {
        Self {
            guess,
            similarity,
            submitted_at,
        }
    }

    #[must_use]
    pub fn guess(&self) -> &Guess {
        &self.guess
    }

    #[must_use]
    pub fn similarity(&self) -> Similarity {
        self.similarity
    }

    #[must_use]
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}

/// Attempts ordered by similarity, best first.
///
/// The sort is stable: equal scores keep submission order.
#[must_use]
pub fn rank_attempts(attempts: &[Attempt]) -> Vec<&Attempt> {
    let mut ranked = attempts.iter().collect::<Vec<_>>();
    ranked.sort_by(|left, right| left.similarity().cmp_desc(right.similarity()));
    ranked
}
