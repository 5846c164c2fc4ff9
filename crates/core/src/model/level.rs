use std::sync::Arc;

use thiserror::Error;

use crate::model::LevelId;

const STANDARD_SENTENCES: [&str; 50] = [
    "Happy",
    "Bright sun",
    "Dark night",
    "Rainy day",
    "Playful dog",
    "Green grass",
    "Blue ocean",
    "Cold winter",
    "Lazy cat",
    "Warm fire",
    "Giant tree",
    "Golden beach",
    "Mountain peak",
    "Sweet smile",
    "Fast car",
    "Brave knight",
    "Snowy mountain",
    "Beautiful sky",
    "Loud thunder",
    "Flying bird",
    "Silent night",
    "Huge wave",
    "Lonely road",
    "Misty forest",
    "Pink flowers",
    "Warm hug",
    "Shooting star",
    "Bright moon",
    "Blue sky",
    "Rolling hills",
    "Old castle",
    "Little bird",
    "Jungle path",
    "Glowing firefly",
    "Starry night",
    "Calm lake",
    "Ancient ruins",
    "Distant thunder",
    "Crystal lake",
    "Shimmering stars",
    "Frozen lake",
    "Magic forest",
    "Pirate ship",
    "Golden treasure",
    "Mysterious cave",
    "Secret garden",
    "Deep ocean",
    "Wild adventure",
    "Stormy clouds",
    "Whispering winds",
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LevelTableError {
    #[error("level table must contain at least one level")]
    Empty,

    #[error("level {level} has an empty reference sentence")]
    BlankSentence { level: u32 },

    #[error("level table is too large: {len} levels")]
    TooLarge { len: usize },
}

/// One round of the game: a fixed reference sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    id: LevelId,
    sentence: String,
}

impl Level {
    #[must_use]
    pub fn id(&self) -> LevelId {
        self.id
    }

    #[must_use]
    pub fn sentence(&self) -> &str {
        &self.sentence
    }
}

/// Read-only, non-empty table of levels numbered `1..=len`.
///
/// Cloning is cheap; all clones share the same storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTable {
    levels: Arc<[Level]>,
}

impl LevelTable {
    /// The built-in 50-level table.
    #[must_use]
    pub fn standard() -> Self {
        let levels = STANDARD_SENTENCES
            .iter()
            .zip(1_u32..)
            .map(|(sentence, id)| Level {
                id: LevelId::new(id),
                sentence: (*sentence).to_string(),
            })
            .collect::<Vec<_>>();
        Self {
            levels: levels.into(),
        }
    }

    /// Build a table from sentences, numbering them from 1.
    ///
    /// # Errors
    ///
    /// Returns `LevelTableError::Empty` for an empty list and
    /// `LevelTableError::BlankSentence` when a sentence is blank after trimming.
    pub fn from_sentences<I, S>(sentences: I) -> Result<Self, LevelTableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut levels = Vec::new();
        for (index, sentence) in sentences.into_iter().enumerate() {
            let id = u32::try_from(index + 1)
                .map_err(|_| LevelTableError::TooLarge { len: index + 1 })?;
            let sentence = sentence.into();
            let trimmed = sentence.trim();
            if trimmed.is_empty() {
                return Err(LevelTableError::BlankSentence { level: id });
            }
            levels.push(Level {
                id: LevelId::new(id),
                sentence: trimmed.to_string(),
            });
        }
        if levels.is_empty() {
            return Err(LevelTableError::Empty);
        }
        Ok(Self {
            levels: levels.into(),
        })
    }

    #[must_use]
    pub fn get(&self, id: LevelId) -> Option<&Level> {
        let index = usize::try_from(id.value()).ok()?.checked_sub(1)?;
        self.levels.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Highest playable level.
    #[must_use]
    pub fn max_level(&self) -> LevelId {
        self.levels
            .last()
            .map_or(LevelId::FIRST, Level::id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::standard()
    }
}
