//! Minigame registry
//!
//! Minigames are registered once at startup under an internal name. The
//! select level picks one with [`MinigameRegistry::load_next`]; requesting
//! the minigame level then builds a fresh instance of it.

use rand::Rng;
use smallvec::SmallVec;

use partybox_shared::{MAX_MINIGAMES, MinigameInfo, is_valid_internal_name};

use crate::level::Level;

/// A playable minigame.
///
/// A new instance is built every time the minigame starts, so per-round
/// state belongs in the struct and is set up in `init`.
pub trait Minigame: Level + Default + 'static {
    /// Registry key (ASCII letters, digits, `_` and `-`).
    const INTERNAL_NAME: &'static str;

    /// Metadata shown in the picker.
    fn info() -> MinigameInfo;
}

type Factory = Box<dyn Fn() -> Box<dyn Level>>;

struct MinigameEntry {
    internal_name: String,
    info: MinigameInfo,
    factory: Factory,
}

/// Every minigame on the cartridge, plus which one is selected and loaded.
#[derive(Default)]
pub struct MinigameRegistry {
    entries: Vec<MinigameEntry>,
    selected: Option<usize>,
    loaded: bool,
}

impl MinigameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a minigame type.
    pub fn register<M: Minigame>(&mut self) {
        self.register_with(M::INTERNAL_NAME, M::info(), || {
            Box::new(M::default()) as Box<dyn Level>
        });
    }

    /// Register a minigame from a factory closure.
    ///
    /// # Panics
    ///
    /// Panics on an invalid or duplicate internal name, or when the registry
    /// is full (the save record has one blacklist bit per minigame).
    pub fn register_with<F>(&mut self, internal_name: &str, info: MinigameInfo, factory: F)
    where
        F: Fn() -> Box<dyn Level> + 'static,
    {
        assert!(
            is_valid_internal_name(internal_name),
            "invalid minigame name {:?}",
            internal_name
        );
        assert!(
            self.index_of(internal_name).is_none(),
            "minigame {:?} registered twice",
            internal_name
        );
        assert!(
            self.entries.len() < MAX_MINIGAMES,
            "at most {} minigames can be registered",
            MAX_MINIGAMES
        );
        tracing::debug!("Registered minigame {} ({})", internal_name, info.name);
        self.entries.push(MinigameEntry {
            internal_name: internal_name.to_string(),
            info,
            factory: Box::new(factory),
        });
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn info(&self, index: usize) -> Option<&MinigameInfo> {
        self.entries.get(index).map(|e| &e.info)
    }

    pub fn internal_name(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.internal_name.as_str())
    }

    pub fn index_of(&self, internal_name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.internal_name == internal_name)
    }

    /// Registry indices ordered by display name, ignoring case.
    pub fn sorted_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.entries.len()).collect();
        indices.sort_by_cached_key(|&i| self.entries[i].info.name.to_lowercase());
        indices
    }

    /// Registry indices not excluded by `blacklist`, ordered by display name.
    pub fn allowed_indices(&self, blacklist: u32) -> Vec<usize> {
        self.sorted_indices()
            .into_iter()
            .filter(|&i| blacklist & (1 << i) == 0)
            .collect()
    }

    /// Select the minigame to play next.
    ///
    /// # Panics
    ///
    /// Panics if no minigame is registered under `internal_name`.
    pub fn load_next(&mut self, internal_name: &str) {
        let Some(index) = self.index_of(internal_name) else {
            panic!("no minigame named {:?}", internal_name);
        };
        self.select(index);
    }

    /// Select the minigame at a registry index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn select(&mut self, index: usize) {
        assert!(
            index < self.entries.len(),
            "minigame index {} out of range",
            index
        );
        tracing::info!("Next minigame: {}", self.entries[index].info.name);
        self.selected = Some(index);
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_info(&self) -> Option<&MinigameInfo> {
        self.selected.and_then(|i| self.info(i))
    }

    /// Whether a minigame instance is alive.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Build a fresh instance of the selected minigame.
    ///
    /// # Panics
    ///
    /// Panics if nothing was selected.
    pub fn instantiate_selected(&mut self) -> Box<dyn Level> {
        let Some(index) = self.selected else {
            panic!("minigame level requested with no minigame selected");
        };
        self.loaded = true;
        (self.entries[index].factory)()
    }

    /// Unload hook, run after the minigame level's own cleanup.
    pub fn cleanup(&mut self) {
        if self.loaded {
            tracing::debug!(
                "Unloaded minigame {}",
                self.selected
                    .and_then(|i| self.internal_name(i))
                    .unwrap_or("?")
            );
        }
        self.loaded = false;
    }

    /// Pick a random minigame that is not blacklisted.
    ///
    /// Falls back to the whole registry when everything is blacklisted.
    pub fn random_allowed<R: Rng + ?Sized>(&self, blacklist: u32, rng: &mut R) -> Option<usize> {
        let allowed: SmallVec<[usize; MAX_MINIGAMES]> = (0..self.entries.len())
            .filter(|&i| blacklist & (1 << i) == 0)
            .collect();
        if allowed.is_empty() {
            if self.entries.is_empty() {
                return None;
            }
            return Some(rng.random_range(0..self.entries.len()));
        }
        Some(allowed[rng.random_range(0..allowed.len())])
    }
}

impl std::fmt::Debug for MinigameRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinigameRegistry")
            .field(
                "entries",
                &self
                    .entries
                    .iter()
                    .map(|e| e.internal_name.as_str())
                    .collect::<Vec<_>>(),
            )
            .field("selected", &self.selected)
            .field("loaded", &self.loaded)
            .finish()
    }
}
