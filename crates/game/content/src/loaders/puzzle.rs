//! Puzzle layout loader.

use std::path::Path;

use tactics_core::puzzle::Puzzle;

use crate::loaders::{LoadResult, from_ron, read_file};

/// Loader for puzzle definitions from RON files.
///
/// Puzzles deserialize as the core [`Puzzle`] type directly; there is no
/// separate file format.
pub struct PuzzleLoader;

impl PuzzleLoader {
    /// Load a puzzle from a RON file.
    pub fn load(path: &Path) -> LoadResult<Puzzle> {
        let content = read_file(path)?;
        let puzzle: Puzzle = from_ron(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse puzzle RON: {}", e))?;

        Ok(puzzle)
    }
}
