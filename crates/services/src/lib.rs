#![forbid(unsafe_code)]

pub mod error;
pub mod game_service;
pub mod similarity_oracle;

pub use game_core::Clock;

pub use error::{ConfigError, GameError, OracleError};
pub use game_service::{GameService, GuessOutcome};
pub use similarity_oracle::{HttpSimilarityOracle, OracleConfig, SimilarityOracle};
