//! The personal watchlist, kept as one JSON array in a key-value store.

use mitai_api::Media;

use crate::error::MitaiError;
use crate::models::WatchlistEntry;
use crate::storage::KeyValueStore;

/// Store key holding the serialized watchlist.
pub const WATCHLIST_KEY: &str = "watchlist";

/// Result of [`Watchlist::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

impl AddOutcome {
    /// Acknowledgement shown to the user.
    pub fn message(self) -> &'static str {
        match self {
            Self::Added => "Added to watchlist!",
            Self::AlreadyPresent => "Already in watchlist.",
        }
    }
}

/// Ordered, id-unique list of saved anime.
pub struct Watchlist<S> {
    store: S,
}

impl<S: KeyValueStore> Watchlist<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All entries in insertion order.
    ///
    /// A missing, unreadable, or corrupt value yields an empty list.
    pub fn list(&self) -> Vec<WatchlistEntry> {
        let raw = match self.store.get(WATCHLIST_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "watchlist read failed, treating as empty");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(error = %e, "stored watchlist is corrupt, treating as empty");
                Vec::new()
            }
        }
    }

    /// Overwrite the stored list.
    pub fn save(&mut self, list: &[WatchlistEntry]) -> Result<(), MitaiError> {
        let json = serde_json::to_string(list)?;
        self.store.set(WATCHLIST_KEY, &json)
    }

    /// Append `media` unless an entry with its id already exists.
    pub fn add(&mut self, media: &Media) -> Result<AddOutcome, MitaiError> {
        let mut list = self.list();
        if list.iter().any(|e| e.id == media.id) {
            return Ok(AddOutcome::AlreadyPresent);
        }
        list.push(WatchlistEntry::from(media));
        self.save(&list)?;
        tracing::info!(id = media.id, title = media.display_title(), "added to watchlist");
        Ok(AddOutcome::Added)
    }

    /// Drop every entry with the given id.
    pub fn remove(&mut self, id: u64) -> Result<(), MitaiError> {
        let list: Vec<WatchlistEntry> = self.list().into_iter().filter(|e| e.id != id).collect();
        self.save(&list)?;
        tracing::info!(id, remaining = list.len(), "removed from watchlist");
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
