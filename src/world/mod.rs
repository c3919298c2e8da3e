//! World module - tile levels
//!
//! Level data (a character grid expanded into named layers), file loading,
//! and the ordered catalog the game plays through.

mod catalog;
mod level;
mod tilemap;

pub use catalog::{LevelCatalog, LevelSource};
pub use level::*;
pub use tilemap::{LayerName, Level};
