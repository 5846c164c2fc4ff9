use game_core::model::{AdvanceOutcome, GameSession, GuessError, LevelId, SessionError};
use services::{GameError, GameService, GuessOutcome};

use crate::views::ViewError;
use crate::vm::attempt_vm::{AttemptVm, render_attempt, render_attempts};
use crate::vm::time_fmt::format_time_of_day;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameIntent {
    Submit(String),
    Retry,
    PlayAgain,
}

/// Shown after a level is cleared, until the next guess.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Celebration {
    pub cleared_level: LevelId,
    pub points: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClearedLevelVm {
    pub level_label: String,
    pub guess_label: String,
    pub points_label: String,
    pub attempts_label: String,
    pub completed_at_str: String,
}

#[derive(Clone, Debug)]
pub struct GameVm {
    session: GameSession,
    celebration: Option<Celebration>,
}

impl GameVm {
    #[must_use]
    pub fn new(session: GameSession) -> Self {
        Self {
            session,
            celebration: None,
        }
    }

    #[must_use]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    #[must_use]
    pub fn level_label(&self) -> String {
        format!("Level {}", self.session.level())
    }

    #[must_use]
    pub fn progress_label(&self) -> String {
        let max = self.session.levels().max_level();
        let level = self.session.level().min(max);
        format!("{level} / {max}")
    }

    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        self.session.reference()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.session.score()
    }

    /// `+N` for the most recent level clear, if any.
    #[must_use]
    pub fn score_delta_label(&self) -> Option<String> {
        let delta = self.session.score_up();
        (delta > 0).then(|| format!("+{delta}"))
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.session.is_complete()
    }

    #[must_use]
    pub fn celebration(&self) -> Option<Celebration> {
        self.celebration
    }

    #[must_use]
    pub fn pending_guess(&self) -> Option<&str> {
        self.session.pending_guess().map(|guess| guess.as_str())
    }

    #[must_use]
    pub fn latest_attempt(&self) -> Option<AttemptVm> {
        self.session.last_attempt().map(render_attempt)
    }

    #[must_use]
    pub fn ranked_attempts(&self) -> Vec<AttemptVm> {
        render_attempts(self.session.rank_attempts())
    }

    #[must_use]
    pub fn cleared_levels(&self) -> Vec<ClearedLevelVm> {
        self.session
            .cleared()
            .iter()
            .map(|record| ClearedLevelVm {
                level_label: format!("Level {}", record.level),
                guess_label: record.winning_guess.to_string(),
                points_label: format!("+{}", record.points),
                attempts_label: match record.attempts_used {
                    1 => "1 try".to_string(),
                    n => format!("{n} tries"),
                },
                completed_at_str: format_time_of_day(record.completed_at),
            })
            .collect()
    }

    /// # Errors
    ///
    /// Returns a `ViewError` describing why the guess could not be scored.
    pub async fn submit(&mut self, game: &GameService, text: &str) -> Result<(), ViewError> {
        self.celebration = None;
        let outcome = game
            .submit_guess(&mut self.session, text)
            .await
            .map_err(|err| view_error(&err))?;
        self.apply(&outcome);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns a `ViewError` describing why the guess could not be scored.
    pub async fn retry(&mut self, game: &GameService) -> Result<(), ViewError> {
        let outcome = game
            .retry(&mut self.session)
            .await
            .map_err(|err| view_error(&err))?;
        self.apply(&outcome);
        Ok(())
    }

    fn apply(&mut self, outcome: &GuessOutcome) {
        self.celebration = match outcome.advance {
            AdvanceOutcome::Advanced { points, level } => Some(Celebration {
                cleared_level: LevelId::new(level.value().saturating_sub(1)),
                points,
            }),
            // The completion banner replaces the per-level celebration.
            AdvanceOutcome::Missed | AdvanceOutcome::Completed { .. } => None,
        };
    }
}

/// # Errors
///
/// Returns `ViewError::Unknown` if the game cannot be started.
pub fn start_game(game: &GameService) -> Result<GameVm, ViewError> {
    let session = game.new_session().map_err(|err| view_error(&err))?;
    Ok(GameVm::new(session))
}

fn view_error(err: &GameError) -> ViewError {
    match err {
        GameError::InvalidGuess(GuessError::Empty) => ViewError::EmptyGuess,
        GameError::InvalidGuess(_) => ViewError::GuessTooLong,
        GameError::Oracle(_) => ViewError::Scoring,
        GameError::Session(SessionError::Completed) => ViewError::GameOver,
        _ => ViewError::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use game_core::model::{LevelTable, Similarity};
    use game_core::time::fixed_clock;
    use services::{OracleError, SimilarityOracle};

    use super::*;

    struct QueueOracle(Mutex<Vec<Option<f64>>>);

    #[async_trait]
    impl SimilarityOracle for QueueOracle {
        async fn similarity(
            &self,
            _reference: &str,
            _candidate: &str,
        ) -> Result<Similarity, OracleError> {
            match self.0.lock().unwrap().remove(0) {
                Some(value) => Ok(Similarity::new(value).unwrap()),
                None => Err(OracleError::Malformed("{}".into())),
            }
        }
    }

    fn game(replies: Vec<Option<f64>>, levels: LevelTable) -> GameService {
        GameService::new(fixed_clock(), levels, Arc::new(QueueOracle(Mutex::new(replies))))
    }

    #[tokio::test]
    async fn win_sets_celebration_until_next_guess() {
        let game = game(vec![Some(0.97), Some(0.3)], LevelTable::standard());
        let mut vm = start_game(&game).unwrap();

        vm.submit(&game, "joyful").await.unwrap();
        assert_eq!(
            vm.celebration(),
            Some(Celebration {
                cleared_level: LevelId::FIRST,
                points: 97
            })
        );
        assert_eq!(vm.level_label(), "Level 2");
        assert_eq!(vm.score_delta_label().as_deref(), Some("+97"));
        assert!(vm.latest_attempt().is_none());

        vm.submit(&game, "sunny").await.unwrap();
        assert!(vm.celebration().is_none());
        assert_eq!(vm.latest_attempt().unwrap().guess_label, "Sunny");
    }

    #[tokio::test]
    async fn errors_map_to_view_errors() {
        let game = game(vec![None], LevelTable::standard());
        let mut vm = start_game(&game).unwrap();

        assert_eq!(vm.submit(&game, "  ").await, Err(ViewError::EmptyGuess));
        assert_eq!(vm.submit(&game, "car").await, Err(ViewError::Scoring));
        assert_eq!(vm.pending_guess(), Some("car"));
        assert!(vm.ranked_attempts().is_empty());
    }

    #[tokio::test]
    async fn completion_skips_celebration() {
        let levels = LevelTable::from_sentences(["Happy"]).unwrap();
        let game = game(vec![Some(0.99)], levels);
        let mut vm = start_game(&game).unwrap();

        vm.submit(&game, "glad").await.unwrap();

        assert!(vm.is_complete());
        assert!(vm.celebration().is_none());
        assert!(vm.reference().is_none());
        assert_eq!(vm.progress_label(), "1 / 1");
        let cleared = vm.cleared_levels();
        assert_eq!(cleared.len(), 1);
        assert_eq!(cleared[0].points_label, "+99");
        assert_eq!(cleared[0].attempts_label, "1 try");
        assert_eq!(vm.submit(&game, "again").await, Err(ViewError::GameOver));
    }

    #[tokio::test]
    async fn ranked_attempts_are_best_first() {
        let game = game(vec![Some(0.4), Some(0.8)], LevelTable::standard());
        let mut vm = start_game(&game).unwrap();
        vm.submit(&game, "sad").await.unwrap();
        vm.submit(&game, "glad").await.unwrap();

        let labels = vm
            .ranked_attempts()
            .into_iter()
            .map(|attempt| attempt.guess_label)
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["Glad", "Sad"]);
        assert_eq!(vm.latest_attempt().unwrap().percent_label, "80.00%");
    }
}
