//! Traits for storage abstraction and extensibility

use async_trait::async_trait;

use crate::ledger::WalletState;
use crate::types::*;

/// Storage abstraction for the wallet
///
/// Persistence is owned by the host environment. The wallet hands over the
/// complete post-operation snapshot together with the events the operation
/// produced; an implementation must store both or neither.
#[async_trait]
pub trait WalletStorage: Send + Sync {
    /// Load the last committed snapshot, if any
    async fn load_state(&self) -> WalletResult<Option<WalletState>>;

    /// Persist a snapshot and append its events to the journal
    async fn commit(&mut self, state: &WalletState, events: &[WalletEvent]) -> WalletResult<()>;

    /// List all journaled events in commit order
    async fn events(&self) -> WalletResult<Vec<WalletEvent>>;
}

/// Trait for implementing host-specific rules on transfer proposals
///
/// Runs after the ledger's membership check and before its amount check.
pub trait TransferValidator: Send + Sync {
    /// Validate a proposal before it is recorded
    fn validate_transfer(&self, amount: Amount, recipient: &Address) -> WalletResult<()>;
}

/// Default transfer validator with basic rules
pub struct DefaultTransferValidator;

impl TransferValidator for DefaultTransferValidator {
    fn validate_transfer(&self, _amount: Amount, recipient: &Address) -> WalletResult<()> {
        if recipient.as_str().trim().is_empty() {
            return Err(WalletError::Validation(
                "Recipient cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
