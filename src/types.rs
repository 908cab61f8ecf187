//! Core types and data structures for the wallet

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Funds in the smallest indivisible currency unit
pub type Amount = u128;

/// Sequential identifier of a transfer request
pub type TransferId = u64;

/// Number of distinct approvals required to release a transfer
pub type Quorum = u32;

/// Identity of an approver, depositor or recipient
///
/// The host environment authenticates identities before they reach the
/// wallet, so an `Address` is treated as an opaque, already-verified label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Create a new address
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A requested outgoing payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Position in creation order, starting at 0
    pub id: TransferId,
    /// Amount to send once quorum is reached
    pub amount: Amount,
    /// Destination of the funds
    pub recipient: Address,
    /// Number of distinct approvers that approved so far
    pub approvals: Quorum,
    /// Approvers that approved this transfer
    pub approved_by: BTreeSet<Address>,
    /// Whether the funds have been released
    pub sent: bool,
    /// Approver that proposed the transfer
    pub created_by: Address,
    /// When the transfer was proposed
    pub created_at: NaiveDateTime,
    /// When the transfer reached quorum and was paid out
    pub sent_at: Option<NaiveDateTime>,
}

impl Transfer {
    /// Create a new, unapproved transfer
    pub fn new(id: TransferId, amount: Amount, recipient: Address, created_by: Address) -> Self {
        Self {
            id,
            amount,
            recipient,
            approvals: 0,
            approved_by: BTreeSet::new(),
            sent: false,
            created_by,
            created_at: chrono::Utc::now().naive_utc(),
            sent_at: None,
        }
    }

    /// Check whether an approver already approved this transfer
    pub fn has_approved(&self, approver: &Address) -> bool {
        self.approved_by.contains(approver)
    }

    /// Approvals still missing before the transfer is sent
    pub fn approvals_remaining(&self, quorum: Quorum) -> Quorum {
        if self.sent {
            0
        } else {
            quorum.saturating_sub(self.approvals)
        }
    }
}

/// Result of a successful approval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalOutcome {
    /// The approval was recorded; the transfer still waits for quorum
    Recorded {
        id: TransferId,
        approvals: Quorum,
    },
    /// The approval crossed quorum and the funds were released
    Sent {
        id: TransferId,
        recipient: Address,
        amount: Amount,
    },
}

impl ApprovalOutcome {
    /// Whether this approval released the funds
    pub fn is_sent(&self) -> bool {
        matches!(self, ApprovalOutcome::Sent { .. })
    }
}

/// Audit record of a committed wallet operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WalletEvent {
    Created {
        wallet_id: Uuid,
        approvers: Vec<Address>,
        quorum: Quorum,
        initial_balance: Amount,
        at: NaiveDateTime,
    },
    Deposited {
        from: Address,
        amount: Amount,
        balance: Amount,
        at: NaiveDateTime,
    },
    TransferCreated {
        id: TransferId,
        created_by: Address,
        amount: Amount,
        recipient: Address,
        at: NaiveDateTime,
    },
    TransferApproved {
        id: TransferId,
        approver: Address,
        approvals: Quorum,
        at: NaiveDateTime,
    },
    TransferSent {
        id: TransferId,
        recipient: Address,
        amount: Amount,
        balance: Amount,
        at: NaiveDateTime,
    },
}

/// Errors that can occur in the wallet
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Only authorized approvers are allowed to perform this action: {0}")]
    Unauthorized(Address),
    #[error("Transfer #{0} does not exist")]
    NotFound(TransferId),
    #[error("Transfer #{0} has already been sent")]
    AlreadySent(TransferId),
    #[error("{approver} has already approved transfer #{id}")]
    DuplicateApproval { id: TransferId, approver: Address },
    #[error("Insufficient funds for transfer #{id}: required {required}, available {available}")]
    InsufficientFunds {
        id: TransferId,
        required: Amount,
        available: Amount,
    },
    #[error("Amount must be positive")]
    InvalidAmount,
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Arithmetic overflow: {0}")]
    Overflow(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for wallet operations
pub type WalletResult<T> = Result<T, WalletError>;
