//! Ordered list of levels
//!
//! Running past the last entry is not an error: `load` returns `Ok(None)`
//! and the caller treats that as the whole world being complete.

use std::path::PathBuf;

use super::level::{load_level, LevelError};
use super::tilemap::Level;

#[derive(Debug, Clone)]
pub enum LevelSource {
    File(PathBuf),
    /// Already in memory (tests, embedded levels)
    Inline(Level),
}

#[derive(Debug, Clone, Default)]
pub struct LevelCatalog {
    sources: Vec<LevelSource>,
}

impl LevelCatalog {
    pub fn new(sources: Vec<LevelSource>) -> Self {
        Self { sources }
    }

    pub fn from_paths<I: IntoIterator<Item = PathBuf>>(paths: I) -> Self {
        Self::new(paths.into_iter().map(LevelSource::File).collect())
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Load the level at `index`, or `None` past the end
    pub fn load(&self, index: usize) -> Result<Option<Level>, LevelError> {
        match self.sources.get(index) {
            None => Ok(None),
            Some(LevelSource::Inline(level)) => Ok(Some(level.clone())),
            Some(LevelSource::File(path)) => load_level(path).map(Some),
        }
    }
}
