//! Transfer request collection

use serde::{Deserialize, Serialize};

use crate::types::*;

/// Ordered collection of transfer requests, keyed by their sequential id
///
/// Transfers are never removed, so the id of a transfer is also its index
/// and the next id is the current length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTransferBook")]
pub struct TransferBook {
    transfers: Vec<Transfer>,
}

/// Unchecked form used when restoring a persisted snapshot
#[derive(Deserialize)]
struct RawTransferBook {
    transfers: Vec<Transfer>,
}

impl TryFrom<RawTransferBook> for TransferBook {
    type Error = WalletError;

    fn try_from(raw: RawTransferBook) -> WalletResult<Self> {
        for (index, transfer) in raw.transfers.iter().enumerate() {
            if transfer.id != index as TransferId {
                return Err(WalletError::Storage(format!(
                    "Transfer at position {} carries id #{}",
                    index, transfer.id
                )));
            }
            if transfer.amount == 0 {
                return Err(WalletError::Storage(format!(
                    "Transfer #{} has a zero amount",
                    transfer.id
                )));
            }
            if transfer.approvals as usize != transfer.approved_by.len() {
                return Err(WalletError::Storage(format!(
                    "Transfer #{} counts {} approvals but lists {} approvers",
                    transfer.id,
                    transfer.approvals,
                    transfer.approved_by.len()
                )));
            }
        }

        Ok(Self {
            transfers: raw.transfers,
        })
    }
}

impl TransferBook {
    /// Create an empty transfer book
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next proposed transfer will receive
    pub fn next_id(&self) -> TransferId {
        self.transfers.len() as TransferId
    }

    /// Append a new unapproved transfer and return its id
    pub fn propose(&mut self, amount: Amount, recipient: Address, created_by: Address) -> TransferId {
        let id = self.next_id();
        self.transfers
            .push(Transfer::new(id, amount, recipient, created_by));
        id
    }

    /// Get a transfer by id
    pub fn get(&self, id: TransferId) -> Option<&Transfer> {
        usize::try_from(id)
            .ok()
            .and_then(|index| self.transfers.get(index))
    }

    /// Get a transfer by id, returning an error if not found
    pub fn get_required(&self, id: TransferId) -> WalletResult<&Transfer> {
        self.get(id).ok_or(WalletError::NotFound(id))
    }

    pub(crate) fn get_mut(&mut self, id: TransferId) -> WalletResult<&mut Transfer> {
        usize::try_from(id)
            .ok()
            .and_then(|index| self.transfers.get_mut(index))
            .ok_or(WalletError::NotFound(id))
    }

    /// All transfers in creation order
    pub fn all(&self) -> &[Transfer] {
        &self.transfers
    }

    /// Transfers that have not reached quorum yet
    pub fn pending(&self) -> impl Iterator<Item = &Transfer> {
        self.transfers.iter().filter(|transfer| !transfer.sent)
    }

    pub fn len(&self) -> usize {
        self.transfers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }
}
