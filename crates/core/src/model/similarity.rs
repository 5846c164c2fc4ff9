use std::fmt;

use thiserror::Error;

/// Inclusive lower bound for clearing a level.
pub const WIN_THRESHOLD: f64 = 0.95;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum SimilarityError {
    #[error("similarity is not a finite number")]
    NotFinite,

    #[error("similarity {0} is outside [0, 1]")]
    OutOfRange(f64),
}

/// Semantic closeness between a guess and a reference sentence, in `[0, 1]`.
#[derive(Clone, Copy, PartialEq, PartialOrd)]
pub struct Similarity(f64);

impl Similarity {
    /// # Errors
    ///
    /// Returns `SimilarityError::NotFinite` for NaN/infinite input and
    /// `SimilarityError::OutOfRange` for values outside `[0, 1]`.
    pub fn new(value: f64) -> Result<Self, SimilarityError> {
        if !value.is_finite() {
            return Err(SimilarityError::NotFinite);
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(SimilarityError::OutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Clamp a finite score into `[0, 1]`.
    ///
    /// Cosine scores from embedding models can land a hair outside the range.
    ///
    /// # Errors
    ///
    /// Returns `SimilarityError::NotFinite` for NaN/infinite input.
    pub fn clamped(value: f64) -> Result<Self, SimilarityError> {
        if !value.is_finite() {
            return Err(SimilarityError::NotFinite);
        }
        Ok(Self(value.clamp(0.0, 1.0)))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn percent(self) -> f64 {
        self.0 * 100.0
    }

    /// Points awarded when this score clears a level: `floor(value * 100)`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn points(self) -> u32 {
        // value is within [0, 1], so the product fits in 0..=100.
        self.percent().floor() as u32
    }

    #[must_use]
    pub fn is_win(self) -> bool {
        self.0 >= WIN_THRESHOLD
    }

    /// Descending order, usable with stable sorts.
    #[must_use]
    pub fn cmp_desc(self, other: Self) -> std::cmp::Ordering {
        other.0.total_cmp(&self.0)
    }
}

impl fmt::Debug for Similarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Similarity({})", self.0)
    }
}

impl fmt::Display for Similarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.percent())
    }
}
