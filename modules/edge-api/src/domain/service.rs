use std::sync::Arc;

use tracing::{debug, instrument};

use super::error::DomainError;
use super::models::StateTransition;
use super::store::{STATE_KEY, StateStore};

/// Reads and replaces the single current value held by a [`StateStore`].
///
/// Writes are a read followed by a separate write. Two writers racing
/// between those calls both succeed and the first write is lost; callers
/// get last-write-wins on the key and nothing stronger.
pub struct StateService {
    store: Arc<dyn StateStore>,
}

impl StateService {
    #[must_use]
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    /// Name of the injected store backend.
    #[must_use]
    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Replaces the current value and reports the one it replaced.
    ///
    /// # Errors
    /// Returns [`DomainError::Store`] if either the read or the write fails.
    /// A failed write after a successful read leaves the old value in place.
    #[instrument(skip(self, value), fields(backend = self.store.backend()))]
    pub async fn write(&self, value: String) -> Result<StateTransition, DomainError> {
        let previous = self.store.get(STATE_KEY).await?;
        self.store.set(STATE_KEY, &value).await?;

        debug!(had_previous = previous.is_some(), "state value replaced");
        Ok(StateTransition {
            previous,
            current: value,
        })
    }

    /// Returns the current value, `None` if nothing was written yet.
    ///
    /// # Errors
    /// Returns [`DomainError::Store`] if the store cannot be read.
    #[instrument(skip(self), fields(backend = self.store.backend()))]
    pub async fn read(&self) -> Result<Option<String>, DomainError> {
        let value = self.store.get(STATE_KEY).await?;
        debug!(present = value.is_some(), "state value read");
        Ok(value)
    }
}
