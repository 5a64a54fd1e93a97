//! Owner of the persisted collections.
//!
//! `DataManager` holds the durable calculation history (bounded) and the
//! saved-calculation library, and mirrors every mutation to its storage
//! provider as a full-replace write. The provider never holds independent
//! truth.

use crate::provider::StorageProvider;
use crate::types::{CalculationResult, SavedCalculation};
use crate::StoreResult;

pub const HISTORY_KEY: &str = "calculator-history";
pub const SAVED_KEY: &str = "saved-calculations";

/// Persisted history bound. Oldest entries are evicted first. Distinct from
/// the 10-entry recent-activity cache the session layer keeps.
pub const HISTORY_LIMIT: usize = 100;

pub struct DataManager {
    /// Oldest first, newest last.
    history: Vec<CalculationResult>,
    saved: Vec<SavedCalculation>,
    storage: Box<dyn StorageProvider>,
}

impl DataManager {
    /// Rehydrate both collections from storage. Missing keys mean empty
    /// collections; a corrupt value is logged and dropped rather than
    /// taking the whole app down.
    pub fn load(storage: Box<dyn StorageProvider>) -> StoreResult<Self> {
        let history = read_collection(storage.as_ref(), HISTORY_KEY)?;
        let saved = read_collection(storage.as_ref(), SAVED_KEY)?;
        Ok(Self {
            history,
            saved,
            storage,
        })
    }

    pub fn history(&self) -> &[CalculationResult] {
        &self.history
    }

    pub fn saved(&self) -> &[SavedCalculation] {
        &self.saved
    }

    pub fn find_saved(&self, id: &str) -> Option<&SavedCalculation> {
        self.saved.iter().find(|s| s.id == id)
    }

    pub fn find_result(&self, id: &str) -> Option<&CalculationResult> {
        self.history.iter().find(|r| r.id == id)
    }

    /// Append a completed calculation, evicting the oldest entries beyond
    /// the bound, and mirror to storage.
    pub fn record(&mut self, result: CalculationResult) -> StoreResult<()> {
        self.history.push(result);
        let len = self.history.len();
        if len > HISTORY_LIMIT {
            self.history.drain(..len - HISTORY_LIMIT);
        }
        self.persist_history()
    }

    pub fn save_calculation(&mut self, saved: SavedCalculation) -> StoreResult<()> {
        self.saved.push(saved);
        self.persist_saved()
    }

    /// Delete one history entry by id. Returns false when no entry matched.
    pub fn delete_result(&mut self, id: &str) -> StoreResult<bool> {
        let before = self.history.len();
        self.history.retain(|r| r.id != id);
        if self.history.len() == before {
            return Ok(false);
        }
        self.persist_history()?;
        Ok(true)
    }

    pub fn delete_saved(&mut self, id: &str) -> StoreResult<bool> {
        let before = self.saved.len();
        self.saved.retain(|s| s.id != id);
        if self.saved.len() == before {
            return Ok(false);
        }
        self.persist_saved()?;
        Ok(true)
    }

    /// Empty both collections and remove both storage keys.
    pub fn clear_all(&mut self) -> StoreResult<()> {
        self.history.clear();
        self.saved.clear();
        self.storage.remove(HISTORY_KEY)?;
        self.storage.remove(SAVED_KEY)?;
        Ok(())
    }

    pub(crate) fn replace_history(&mut self, history: Vec<CalculationResult>) -> StoreResult<()> {
        self.history = history;
        let len = self.history.len();
        if len > HISTORY_LIMIT {
            self.history.drain(..len - HISTORY_LIMIT);
        }
        self.persist_history()
    }

    pub(crate) fn replace_saved(&mut self, saved: Vec<SavedCalculation>) -> StoreResult<()> {
        self.saved = saved;
        self.persist_saved()
    }

    fn persist_history(&mut self) -> StoreResult<()> {
        let json = serde_json::to_string(&self.history)?;
        self.storage.set(HISTORY_KEY, &json)
    }

    fn persist_saved(&mut self) -> StoreResult<()> {
        let json = serde_json::to_string(&self.saved)?;
        self.storage.set(SAVED_KEY, &json)
    }
}

fn read_collection<T: serde::de::DeserializeOwned>(
    storage: &dyn StorageProvider,
    key: &str,
) -> StoreResult<Vec<T>> {
    match storage.get(key)? {
        None => Ok(Vec::new()),
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(items) => Ok(items),
            Err(err) => {
                tracing::warn!(key, %err, "dropping corrupt stored collection");
                Ok(Vec::new())
            }
        },
    }
}
