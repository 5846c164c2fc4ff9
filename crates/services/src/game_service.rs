use std::sync::Arc;

use game_core::Clock;
use game_core::model::{
    AdvanceOutcome, Attempt, GameSession, Guess, LevelId, LevelTable, SessionError,
};
use log::{debug, info, warn};

use crate::error::GameError;
use crate::similarity_oracle::SimilarityOracle;

/// Result of scoring a single guess.
#[derive(Debug, Clone, PartialEq)]
pub struct GuessOutcome {
    pub attempt: Attempt,
    pub advance: AdvanceOutcome,
}

/// Game controller: validates guesses, asks the oracle for a score and
/// applies the level rule to an explicit session.
#[derive(Clone)]
pub struct GameService {
    clock: Clock,
    levels: LevelTable,
    oracle: Arc<dyn SimilarityOracle>,
    start_level: LevelId,
}

impl GameService {
    #[must_use]
    pub fn new(clock: Clock, levels: LevelTable, oracle: Arc<dyn SimilarityOracle>) -> Self {
        Self {
            clock,
            levels,
            oracle,
            start_level: LevelId::FIRST,
        }
    }

    #[must_use]
    pub fn with_start_level(mut self, start_level: LevelId) -> Self {
        self.start_level = start_level;
        self
    }

    #[must_use]
    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    /// Start a new session at the configured level.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Session` if the start level is not in the table.
    pub fn new_session(&self) -> Result<GameSession, GameError> {
        let session =
            GameSession::starting_at(self.levels.clone(), self.start_level, self.clock.now())?;
        info!(
            "new game at level {} of {}",
            session.level(),
            self.levels.max_level()
        );
        Ok(session)
    }

    /// Validate `text`, store it as the pending guess and score it.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidGuess` for blank or oversized input,
    /// `GameError::Session` once the game is complete, and `GameError::Oracle`
    /// when scoring fails. Level, score and attempts are unchanged on error.
    pub async fn submit_guess(
        &self,
        session: &mut GameSession,
        text: &str,
    ) -> Result<GuessOutcome, GameError> {
        let guess = Guess::new(text)?;
        session.submit_guess(guess)?;
        self.score_guess(session).await
    }

    /// Score the pending guess against the current reference sentence.
    ///
    /// After an oracle failure the guess stays pending, so calling this again
    /// retries it.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NothingPending` without a pending guess and
    /// `GameError::Oracle` when the oracle call fails.
    pub async fn score_guess(&self, session: &mut GameSession) -> Result<GuessOutcome, GameError> {
        let guess = session
            .pending_guess()
            .cloned()
            .ok_or(GameError::NothingPending)?;
        let reference = session
            .reference()
            .ok_or(SessionError::Completed)?
            .to_string();

        let similarity = match self.oracle.similarity(&reference, guess.as_str()).await {
            Ok(similarity) => similarity,
            Err(err) => {
                warn!("scoring failed at level {}: {err}", session.level());
                return Err(err.into());
            }
        };

        let now = self.clock.now();
        let attempt = session.record_score(similarity, now)?.clone();
        debug!(
            "level {} guess {:?} scored {similarity}",
            session.level(),
            guess.as_str()
        );

        let advance = session.advance_if_won(now)?;
        match advance {
            AdvanceOutcome::Missed => {}
            AdvanceOutcome::Advanced { points, level } => {
                info!("level cleared for {points} points; now on level {level}");
            }
            AdvanceOutcome::Completed {
                points,
                final_score,
            } => {
                info!("final level cleared for {points} points; final score {final_score}");
            }
        }

        Ok(GuessOutcome { attempt, advance })
    }

    /// Re-score the guess left pending by a failed call.
    ///
    /// # Errors
    ///
    /// See `score_guess`.
    pub async fn retry(&self, session: &mut GameSession) -> Result<GuessOutcome, GameError> {
        debug!("retrying pending guess at level {}", session.level());
        self.score_guess(session).await
    }
}
