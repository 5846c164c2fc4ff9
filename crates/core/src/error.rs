use thiserror::Error;

use crate::model::{GuessError, LevelTableError, SessionError, SimilarityError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Guess(#[from] GuessError),
    #[error(transparent)]
    Similarity(#[from] SimilarityError),
    #[error(transparent)]
    LevelTable(#[from] LevelTableError),
    #[error(transparent)]
    Session(#[from] SessionError),
}
