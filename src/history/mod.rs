//! Durable list of finished artworks, most recent first.

pub(crate) mod artwork;
pub(crate) mod store;

use crate::foundation::error::{PixelflowError, PixelflowResult};
use artwork::Artwork;
use store::KeyValueStore;

/// Well-known key the whole collection is stored under.
pub const HISTORY_KEY: &str = "pixelflow_history";

/// In-memory history mirrored to a [`KeyValueStore`].
///
/// Every mutation rewrites the full collection in one `set`. When that write fails the
/// in-memory list still reflects the change and the error is returned for the caller to report.
#[derive(Debug)]
pub struct HistoryStore<S: KeyValueStore> {
    store: S,
    items: Vec<Artwork>,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// Read the collection. Missing, unreadable or corrupt data yields an empty history.
    #[tracing::instrument(skip(store))]
    pub fn load(store: S) -> Self {
        let items = match store.get(HISTORY_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Artwork>>(&raw) {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to parse history, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read history, starting empty");
                Vec::new()
            }
        };
        tracing::debug!(count = items.len(), "history loaded");
        Self { store, items }
    }

    /// Records, most recent first.
    pub fn items(&self) -> &[Artwork] {
        &self.items
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` when there are no records.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a record by id.
    pub fn get(&self, id: &str) -> Option<&Artwork> {
        self.items.iter().find(|a| a.id == id)
    }

    /// Prepend a record and persist.
    pub fn add(&mut self, artwork: Artwork) -> PixelflowResult<()> {
        self.items.insert(0, artwork);
        self.persist()
    }

    /// Remove the record with `id`. Returns `Ok(false)` without writing when it is absent.
    pub fn delete(&mut self, id: &str) -> PixelflowResult<bool> {
        let before = self.items.len();
        self.items.retain(|a| a.id != id);
        if self.items.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&mut self) -> PixelflowResult<()> {
        let raw = serde_json::to_string(&self.items)
            .map_err(|e| PixelflowError::serde(format!("encode history: {e}")))?;
        self.store.set(HISTORY_KEY, &raw).map_err(|e| match e {
            PixelflowError::Persistence(_) => e,
            other => PixelflowError::persistence(other.to_string()),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/history/history.rs"]
mod tests;
