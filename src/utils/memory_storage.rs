//! In-memory storage implementation for testing

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::ledger::WalletState;
use crate::traits::*;
use crate::types::*;

/// In-memory storage implementation for testing and development
///
/// Clones share the same underlying data, so a clone kept outside a wallet
/// observes every commit.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    state: Arc<RwLock<Option<WalletState>>>,
    events: Arc<RwLock<Vec<WalletEvent>>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(None)),
            events: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        *self.state.write() = None;
        self.events.write().clear();
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WalletStorage for MemoryStorage {
    async fn load_state(&self) -> WalletResult<Option<WalletState>> {
        Ok(self.state.read().clone())
    }

    async fn commit(&mut self, state: &WalletState, events: &[WalletEvent]) -> WalletResult<()> {
        let mut stored_state = self.state.write();
        let mut stored_events = self.events.write();
        *stored_state = Some(state.clone());
        stored_events.extend_from_slice(events);
        Ok(())
    }

    async fn events(&self) -> WalletResult<Vec<WalletEvent>> {
        Ok(self.events.read().clone())
    }
}
