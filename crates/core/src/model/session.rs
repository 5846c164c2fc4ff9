use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{Attempt, Guess, Level, LevelId, LevelTable, Similarity, rank_attempts};

/// Seconds shown on the level timer. Declared for display; no rule enforces it.
pub const DEFAULT_TIMER_SECS: u32 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GamePhase {
    AwaitingGuess,
    Scored,
    /// Waiting for a guess on the next level, right after clearing one.
    LevelAdvanced,
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseEvent {
    GuessSubmitted,
    Scored,
    Missed,
    Won { final_level: bool },
}

impl GamePhase {
    #[must_use]
    pub fn accepts_guess(self) -> bool {
        matches!(self, Self::AwaitingGuess | Self::LevelAdvanced)
    }

    /// Apply an event to the phase.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` once the game is over and
    /// `SessionError::InvalidTransition` for events the phase does not accept.
    pub fn transition(self, event: PhaseEvent) -> Result<Self, SessionError> {
        match (self, event) {
            (Self::Complete, _) => Err(SessionError::Completed),
            (Self::AwaitingGuess | Self::LevelAdvanced, PhaseEvent::GuessSubmitted) => {
                Ok(Self::AwaitingGuess)
            }
            (Self::AwaitingGuess | Self::LevelAdvanced, PhaseEvent::Scored) => Ok(Self::Scored),
            (Self::Scored, PhaseEvent::Missed) => Ok(Self::AwaitingGuess),
            (Self::Scored, PhaseEvent::Won { final_level: false }) => Ok(Self::LevelAdvanced),
            (Self::Scored, PhaseEvent::Won { final_level: true }) => Ok(Self::Complete),
            (from, event) => Err(SessionError::InvalidTransition { from, event }),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("game already completed")]
    Completed,

    #[error("no guess is waiting to be scored")]
    NoPendingGuess,

    #[error("cannot apply {event:?} while {from:?}")]
    InvalidTransition { from: GamePhase, event: PhaseEvent },

    #[error("level {level} is not in the level table")]
    UnknownLevel { level: LevelId },
}

/// Result of evaluating the latest attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Missed,
    Advanced { points: u32, level: LevelId },
    Completed { points: u32, final_score: u32 },
}

/// A cleared level, kept for the end-of-game summary.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelRecord {
    pub level: LevelId,
    pub winning_guess: Guess,
    pub similarity: Similarity,
    pub points: u32,
    pub attempts_used: usize,
    pub completed_at: DateTime<Utc>,
}

/// State of one player's game.
#[derive(Debug, Clone)]
pub struct GameSession {
    levels: LevelTable,
    level: LevelId,
    score: u32,
    score_up: u32,
    timer_secs: u32,
    attempts: Vec<Attempt>,
    pending_guess: Option<Guess>,
    phase: GamePhase,
    cleared: Vec<LevelRecord>,
    started_at: DateTime<Utc>,
}

impl GameSession {
    #[must_use]
    pub fn new(levels: LevelTable, started_at: DateTime<Utc>) -> Self {
        Self {
            levels,
            level: LevelId::FIRST,
            score: 0,
            score_up: 0,
            timer_secs: DEFAULT_TIMER_SECS,
            attempts: Vec::new(),
            pending_guess: None,
            phase: GamePhase::AwaitingGuess,
            cleared: Vec::new(),
            started_at,
        }
    }

    /// Start a session at a later level.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownLevel` if the table has no such level.
    pub fn starting_at(
        levels: LevelTable,
        level: LevelId,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if levels.get(level).is_none() {
            return Err(SessionError::UnknownLevel { level });
        }
        let mut session = Self::new(levels, started_at);
        session.level = level;
        Ok(session)
    }

    #[must_use]
    pub fn level(&self) -> LevelId {
        self.level
    }

    #[must_use]
    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Points awarded for the most recent cleared level.
    #[must_use]
    pub fn score_up(&self) -> u32 {
        self.score_up
    }

    #[must_use]
    pub fn timer_secs(&self) -> u32 {
        self.timer_secs
    }

    #[must_use]
    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    #[must_use]
    pub fn pending_guess(&self) -> Option<&Guess> {
        self.pending_guess.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == GamePhase::Complete
    }

    #[must_use]
    pub fn cleared(&self) -> &[LevelRecord] {
        &self.cleared
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn current_level(&self) -> Option<&Level> {
        if self.is_complete() {
            return None;
        }
        self.levels.get(self.level)
    }

    /// Reference sentence for the level being played.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        self.current_level().map(Level::sentence)
    }

    #[must_use]
    pub fn last_attempt(&self) -> Option<&Attempt> {
        self.attempts.last()
    }

    #[must_use]
    pub fn rank_attempts(&self) -> Vec<&Attempt> {
        rank_attempts(&self.attempts)
    }

    /// Store a guess as pending, ready to be scored.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after the last level and
    /// `SessionError::InvalidTransition` while an attempt is being evaluated.
    pub fn submit_guess(&mut self, guess: Guess) -> Result<(), SessionError> {
        self.phase = self.phase.transition(PhaseEvent::GuessSubmitted)?;
        self.pending_guess = Some(guess);
        Ok(())
    }

    /// Record the oracle's score for the pending guess.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoPendingGuess` if nothing was submitted, or a
    /// transition error if the phase does not accept a score.
    pub fn record_score(
        &mut self,
        similarity: Similarity,
        at: DateTime<Utc>,
    ) -> Result<&Attempt, SessionError> {
        if self.pending_guess.is_none() {
            return Err(SessionError::NoPendingGuess);
        }
        let next = self.phase.transition(PhaseEvent::Scored)?;
        let Some(guess) = self.pending_guess.take() else {
            return Err(SessionError::NoPendingGuess);
        };
        self.phase = next;
        self.attempts.push(Attempt::new(guess, similarity, at));
        self.last_attempt().ok_or(SessionError::NoPendingGuess)
    }

    /// Clear the level if the latest attempt reached the win threshold.
    ///
    /// # Errors
    ///
    /// Returns a transition error unless an attempt was just scored.
    pub fn advance_if_won(&mut self, at: DateTime<Utc>) -> Result<AdvanceOutcome, SessionError> {
        let Some(last) = self.attempts.last() else {
            return Err(SessionError::InvalidTransition {
                from: self.phase,
                event: PhaseEvent::Missed,
            });
        };
        let similarity = last.similarity();

        if !similarity.is_win() {
            self.phase = self.phase.transition(PhaseEvent::Missed)?;
            return Ok(AdvanceOutcome::Missed);
        }

        let final_level = self.level >= self.levels.max_level();
        let next = self.phase.transition(PhaseEvent::Won { final_level })?;

        let points = similarity.points();
        self.cleared.push(LevelRecord {
            level: self.level,
            winning_guess: last.guess().clone(),
            similarity,
            points,
            attempts_used: self.attempts.len(),
            completed_at: at,
        });
        self.score_up = points;
        self.score = self.score.saturating_add(points);
        self.level = self.level.next();
        self.attempts.clear();
        self.pending_guess = None;
        self.phase = next;

        if final_level {
            Ok(AdvanceOutcome::Completed {
                points,
                final_score: self.score,
            })
        } else {
            Ok(AdvanceOutcome::Advanced {
                points,
                level: self.level,
            })
        }
    }
}
