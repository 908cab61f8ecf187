//! Wallet state aggregate and its transition rules

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::ledger::{ApproverSet, TransferBook};
use crate::types::*;

/// Everything a single wallet owns
///
/// Every mutating method either applies all of its changes or returns an
/// error without touching `self`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWalletState")]
pub struct WalletState {
    /// Unique identifier of this wallet instance
    pub wallet_id: Uuid,
    approvers: ApproverSet,
    balance: Amount,
    total_deposited: Amount,
    transfers: TransferBook,
    payouts: BTreeMap<Address, Amount>,
    /// When the wallet was created
    pub created_at: NaiveDateTime,
    /// When the wallet last changed
    pub updated_at: NaiveDateTime,
}

/// Unchecked form used when restoring a persisted snapshot
#[derive(Deserialize)]
struct RawWalletState {
    wallet_id: Uuid,
    approvers: ApproverSet,
    balance: Amount,
    total_deposited: Amount,
    transfers: TransferBook,
    payouts: BTreeMap<Address, Amount>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl TryFrom<RawWalletState> for WalletState {
    type Error = WalletError;

    fn try_from(raw: RawWalletState) -> WalletResult<Self> {
        let quorum = raw.approvers.quorum();

        for transfer in raw.transfers.all() {
            if let Some(stranger) = transfer
                .approved_by
                .iter()
                .find(|approver| !raw.approvers.contains(approver))
            {
                return Err(WalletError::Storage(format!(
                    "Transfer #{} lists non-approver {}",
                    transfer.id, stranger
                )));
            }
            if transfer.sent != (transfer.approvals >= quorum) {
                return Err(WalletError::Storage(format!(
                    "Transfer #{} has {} approvals but sent is {}",
                    transfer.id, transfer.approvals, transfer.sent
                )));
            }
        }

        Ok(Self {
            wallet_id: raw.wallet_id,
            approvers: raw.approvers,
            balance: raw.balance,
            total_deposited: raw.total_deposited,
            transfers: raw.transfers,
            payouts: raw.payouts,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        })
    }
}

impl WalletState {
    /// Create a new wallet state with an empty transfer collection
    pub fn new(
        approvers: Vec<Address>,
        quorum: Quorum,
        initial_balance: Amount,
    ) -> WalletResult<Self> {
        let approvers = ApproverSet::new(approvers, quorum)?;
        let now = chrono::Utc::now().naive_utc();

        Ok(Self {
            wallet_id: Uuid::new_v4(),
            approvers,
            balance: initial_balance,
            total_deposited: initial_balance,
            transfers: TransferBook::new(),
            payouts: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn approvers(&self) -> &ApproverSet {
        &self.approvers
    }

    pub fn quorum(&self) -> Quorum {
        self.approvers.quorum()
    }

    /// Funds currently held by the wallet
    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// Initial balance plus every deposit, saturating at `Amount::MAX`
    pub fn total_deposited(&self) -> Amount {
        self.total_deposited
    }

    pub fn transfers(&self) -> &TransferBook {
        &self.transfers
    }

    /// Total received by `recipient` from sent transfers
    pub fn balance_of(&self, recipient: &Address) -> Amount {
        self.payouts.get(recipient).copied().unwrap_or(0)
    }

    /// Total paid out across all recipients
    pub fn total_paid_out(&self) -> Amount {
        self.payouts.values().sum()
    }

    /// Credit funds to the wallet and return the new balance
    pub fn deposit(&mut self, amount: Amount) -> WalletResult<Amount> {
        if amount == 0 {
            return Err(WalletError::InvalidAmount);
        }

        let balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| WalletError::Overflow("wallet balance".to_string()))?;

        self.balance = balance;
        self.total_deposited = self.total_deposited.saturating_add(amount);
        self.touch();
        Ok(balance)
    }

    /// Record a new transfer proposal from an approver
    ///
    /// Funds are not checked here; they only have to be present when the
    /// transfer reaches quorum.
    pub fn create_transfer(
        &mut self,
        caller: &Address,
        amount: Amount,
        recipient: Address,
    ) -> WalletResult<TransferId> {
        self.approvers.ensure_member(caller)?;
        if amount == 0 {
            return Err(WalletError::InvalidAmount);
        }

        let id = self.transfers.propose(amount, recipient, caller.clone());
        self.touch();
        Ok(id)
    }

    /// Record an approval and release the funds when it crosses quorum
    pub fn approve_transfer(
        &mut self,
        caller: &Address,
        id: TransferId,
    ) -> WalletResult<ApprovalOutcome> {
        self.approvers.ensure_member(caller)?;

        let quorum = self.approvers.quorum();
        let transfer = self.transfers.get_required(id)?;
        if transfer.sent {
            return Err(WalletError::AlreadySent(id));
        }
        if transfer.has_approved(caller) {
            return Err(WalletError::DuplicateApproval {
                id,
                approver: caller.clone(),
            });
        }

        let approvals = transfer.approvals + 1;
        let crosses_quorum = approvals >= quorum;

        // Everything that can fail is resolved before the first write.
        let settlement = if crosses_quorum {
            if self.balance < transfer.amount {
                return Err(WalletError::InsufficientFunds {
                    id,
                    required: transfer.amount,
                    available: self.balance,
                });
            }
            let received = self
                .balance_of(&transfer.recipient)
                .checked_add(transfer.amount)
                .ok_or_else(|| WalletError::Overflow("recipient balance".to_string()))?;
            Some((self.balance - transfer.amount, received))
        } else {
            None
        };

        let now = chrono::Utc::now().naive_utc();
        let transfer = self.transfers.get_mut(id)?;
        transfer.approved_by.insert(caller.clone());
        transfer.approvals = approvals;

        let outcome = match settlement {
            Some((balance, received)) => {
                transfer.sent = true;
                transfer.sent_at = Some(now);
                let recipient = transfer.recipient.clone();
                let amount = transfer.amount;

                self.balance = balance;
                self.payouts.insert(recipient.clone(), received);
                ApprovalOutcome::Sent {
                    id,
                    recipient,
                    amount,
                }
            }
            None => ApprovalOutcome::Recorded { id, approvals },
        };

        self.updated_at = now;
        Ok(outcome)
    }

    fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().naive_utc();
    }
}
