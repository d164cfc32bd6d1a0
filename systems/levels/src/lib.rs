#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level catalog system that owns the playable levels and the current-level cursor.

use std::{fs, io, path::Path};

use log::info;
use signal_control_core::{CellKind, CellPlacement, LevelDescriptor, Orientation};
use thiserror::Error;

/// Action budget reported when the catalog has no current level.
pub const FALLBACK_ACTION_LIMIT: u32 = 10;

/// Errors that can occur while loading or saving a level catalog.
#[derive(Debug, Error)]
pub enum LevelCatalogError {
    /// The catalog file could not be read or written.
    #[error("could not access level catalog: {0}")]
    Io(#[from] io::Error),
    /// The catalog contents were not valid level JSON.
    #[error("could not parse level catalog: {0}")]
    Parse(#[from] serde_json::Error),
    /// The catalog did not contain any level.
    #[error("level catalog contains no levels")]
    Empty,
}

/// Ordered collection of levels together with the level currently in play.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelCatalog {
    levels: Vec<LevelDescriptor>,
    current: usize,
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LevelCatalog {
    /// Creates a catalog from the provided levels, starting at the first one.
    pub fn new(levels: Vec<LevelDescriptor>) -> Result<Self, LevelCatalogError> {
        if levels.is_empty() {
            return Err(LevelCatalogError::Empty);
        }
        Ok(Self { levels, current: 0 })
    }

    /// Catalog containing the levels shipped with the game.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            levels: builtin_levels(),
            current: 0,
        }
    }

    /// Parses a catalog from a JSON array of levels.
    pub fn from_json_str(json: &str) -> Result<Self, LevelCatalogError> {
        let levels: Vec<LevelDescriptor> = serde_json::from_str(json)?;
        Self::new(levels)
    }

    /// Serialises every level as a pretty-printed JSON array.
    pub fn to_json_string(&self) -> Result<String, LevelCatalogError> {
        Ok(serde_json::to_string_pretty(&self.levels)?)
    }

    /// Loads a catalog from a JSON file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, LevelCatalogError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&contents)?;
        info!("loaded {} levels from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Writes every level to a JSON file.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<(), LevelCatalogError> {
        let path = path.as_ref();
        fs::write(path, self.to_json_string()?)?;
        info!("saved {} levels to {}", self.len(), path.display());
        Ok(())
    }

    /// Number of levels in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Reports whether the catalog holds no levels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Iterator over every level in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &LevelDescriptor> {
        self.levels.iter()
    }

    /// Level at the provided zero-based index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LevelDescriptor> {
        self.levels.get(index)
    }

    /// Zero-based index of the level currently in play.
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current
    }

    /// Level currently in play.
    #[must_use]
    pub fn current(&self) -> Option<&LevelDescriptor> {
        self.levels.get(self.current)
    }

    /// Action budget of the current level.
    #[must_use]
    pub fn current_action_limit(&self) -> u32 {
        self.current()
            .map_or(FALLBACK_ACTION_LIMIT, |level| level.action_limit)
    }

    /// Selects the level at `index`. Out-of-range indices are ignored.
    pub fn set_current(&mut self, index: usize) -> bool {
        if index >= self.levels.len() {
            return false;
        }
        self.current = index;
        true
    }

    /// Moves to the next level, returning `false` when already on the last one.
    pub fn advance(&mut self) -> bool {
        if self.current + 1 >= self.levels.len() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Returns to the first level.
    pub fn rewind(&mut self) {
        self.current = 0;
    }
}

fn builtin_levels() -> Vec<LevelDescriptor> {
    use CellKind::{Blocking, Checkpoint, Finish, Normal, Start};
    use Orientation::{Down, Left, Right, Up};

    vec![
        LevelDescriptor {
            columns: 4,
            rows: 4,
            action_limit: 5,
            cells: vec![
                CellPlacement::new(0, 0, Start, Right),
                CellPlacement::new(3, 3, Finish, Left),
                CellPlacement::new(1, 1, Normal, Right),
            ],
            tutorial: Some("Rotate a cell to steer the signal toward the finish.".to_owned()),
            hint: "Turn the cells of the right-hand column so they point down.".to_owned(),
        },
        LevelDescriptor {
            columns: 5,
            rows: 5,
            action_limit: 10,
            cells: vec![
                CellPlacement::new(0, 0, Start, Right),
                CellPlacement::new(4, 4, Finish, Left),
                CellPlacement::new(2, 2, Checkpoint, Up),
                CellPlacement::new(1, 3, Blocking, Up),
                CellPlacement::new(3, 1, Blocking, Down),
            ],
            tutorial: None,
            hint: "Route the signal through the checkpoint in the centre first, then on to the finish."
                .to_owned(),
        },
        LevelDescriptor {
            columns: 6,
            rows: 6,
            action_limit: 8,
            cells: vec![
                CellPlacement::new(0, 0, Start, Right),
                CellPlacement::new(5, 5, Finish, Left),
                CellPlacement::new(2, 2, Checkpoint, Right),
                CellPlacement::new(4, 4, Checkpoint, Up),
                CellPlacement::new(1, 3, Blocking, Up),
                CellPlacement::new(3, 1, Blocking, Down),
                CellPlacement::new(4, 2, Blocking, Left),
            ],
            tutorial: None,
            hint: "Activate both checkpoints. Start from the upper right part of the grid."
                .to_owned(),
        },
    ]
}
