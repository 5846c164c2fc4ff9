mod attempt;
mod guess;
mod ids;
mod level;
mod session;
mod similarity;

pub use attempt::{Attempt, rank_attempts};
pub use guess::{Guess, GuessError, MAX_GUESS_CHARS};
pub use ids::{LevelId, ParseIdError};
pub use level::{Level, LevelTable, LevelTableError};
pub use session::{
    AdvanceOutcome, DEFAULT_TIMER_SECS, GamePhase, GameSession, LevelRecord, PhaseEvent,
    SessionError,
};
pub use similarity::{Similarity, SimilarityError, WIN_THRESHOLD};
