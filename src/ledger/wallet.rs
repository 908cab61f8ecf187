//! Main wallet orchestrator that serializes operations and persists them

use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::WalletConfig;
use crate::ledger::WalletState;
use crate::traits::*;
use crate::types::*;

struct WalletInner<S> {
    state: WalletState,
    storage: S,
}

/// Multi-approver wallet backed by a storage implementation
///
/// Mutations hold the write lock for their whole duration and work on a
/// draft copy of the state. The draft replaces the live state only after the
/// storage commit succeeds, so a failed operation is never observable.
pub struct Wallet<S: WalletStorage> {
    inner: RwLock<WalletInner<S>>,
    validator: Box<dyn TransferValidator>,
}

impl<S: WalletStorage> Wallet<S> {
    /// Create and persist a new wallet
    pub async fn create(
        approvers: Vec<Address>,
        quorum: Quorum,
        initial_balance: Amount,
        mut storage: S,
    ) -> WalletResult<Self> {
        if storage.load_state().await?.is_some() {
            return Err(WalletError::Storage(
                "Storage already holds a wallet".to_string(),
            ));
        }

        let state = WalletState::new(approvers, quorum, initial_balance)?;
        let event = WalletEvent::Created {
            wallet_id: state.wallet_id,
            approvers: state.approvers().members().to_vec(),
            quorum,
            initial_balance,
            at: state.created_at,
        };
        storage.commit(&state, &[event]).await?;

        info!(
            wallet_id = %state.wallet_id,
            approvers = state.approvers().len(),
            quorum,
            initial_balance,
            "Wallet created"
        );

        Ok(Self::from_parts(state, storage))
    }

    /// Create a wallet from a provisioning configuration
    pub async fn provision(config: &WalletConfig, storage: S) -> WalletResult<Self> {
        config.validate()?;
        Self::create(
            config.approvers.clone(),
            config.quorum,
            config.initial_balance,
            storage,
        )
        .await
    }

    /// Restore a wallet from its last committed snapshot
    pub async fn open(storage: S) -> WalletResult<Self> {
        let state = storage
            .load_state()
            .await?
            .ok_or_else(|| WalletError::Storage("No wallet has been created".to_string()))?;

        debug!(
            wallet_id = %state.wallet_id,
            transfers = state.transfers().len(),
            "Wallet restored"
        );

        Ok(Self::from_parts(state, storage))
    }

    /// Replace the transfer validator
    pub fn with_validator(mut self, validator: Box<dyn TransferValidator>) -> Self {
        self.validator = validator;
        self
    }

    fn from_parts(state: WalletState, storage: S) -> Self {
        Self {
            inner: RwLock::new(WalletInner { state, storage }),
            validator: Box::new(DefaultTransferValidator),
        }
    }

    // Queries
    pub async fn wallet_id(&self) -> Uuid {
        self.inner.read().await.state.wallet_id
    }

    /// Approvers in creation order
    pub async fn approvers(&self) -> Vec<Address> {
        self.inner.read().await.state.approvers().members().to_vec()
    }

    pub async fn quorum(&self) -> Quorum {
        self.inner.read().await.state.quorum()
    }

    /// Funds currently held by the wallet
    pub async fn balance(&self) -> Amount {
        self.inner.read().await.state.balance()
    }

    /// Total received by `recipient` from sent transfers
    pub async fn balance_of(&self, recipient: &Address) -> Amount {
        self.inner.read().await.state.balance_of(recipient)
    }

    /// All transfers in creation order
    pub async fn transfers(&self) -> Vec<Transfer> {
        self.inner.read().await.state.transfers().all().to_vec()
    }

    /// Get a transfer by id
    pub async fn transfer(&self, id: TransferId) -> Option<Transfer> {
        self.inner.read().await.state.transfers().get(id).cloned()
    }

    /// Transfers still waiting for quorum
    pub async fn pending_transfers(&self) -> Vec<Transfer> {
        self.inner
            .read()
            .await
            .state
            .transfers()
            .pending()
            .cloned()
            .collect()
    }

    /// Consistent copy of the full wallet state
    pub async fn snapshot(&self) -> WalletState {
        self.inner.read().await.state.clone()
    }

    /// Journaled events in commit order
    pub async fn events(&self) -> WalletResult<Vec<WalletEvent>> {
        self.inner.read().await.storage.events().await
    }

    // Mutations
    /// Credit funds to the wallet and return the new balance
    pub async fn deposit(&self, from: &Address, amount: Amount) -> WalletResult<Amount> {
        let balance = self
            .transact(|state| {
                let balance = state.deposit(amount)?;
                let event = WalletEvent::Deposited {
                    from: from.clone(),
                    amount,
                    balance,
                    at: state.updated_at,
                };
                Ok((balance, vec![event]))
            })
            .await?;

        info!(from = %from, amount, balance, "Deposit received");
        Ok(balance)
    }

    /// Propose a transfer on behalf of an approver
    pub async fn create_transfer(
        &self,
        caller: &Address,
        amount: Amount,
        recipient: Address,
    ) -> WalletResult<TransferId> {
        let id = self
            .transact(|state| {
                state.approvers().ensure_member(caller)?;
                self.validator.validate_transfer(amount, &recipient)?;

                let id = state.create_transfer(caller, amount, recipient.clone())?;
                let event = WalletEvent::TransferCreated {
                    id,
                    created_by: caller.clone(),
                    amount,
                    recipient: recipient.clone(),
                    at: state.updated_at,
                };
                Ok((id, vec![event]))
            })
            .await
            .inspect_err(|err| debug!(caller = %caller, error = %err, "Transfer proposal rejected"))?;

        info!(id, caller = %caller, amount, recipient = %recipient, "Transfer proposed");
        Ok(id)
    }

    /// Approve a transfer on behalf of an approver
    ///
    /// The approval that reaches quorum releases the funds in the same
    /// operation. If the wallet cannot cover the amount at that moment the
    /// approval is not retained.
    pub async fn approve_transfer(
        &self,
        caller: &Address,
        id: TransferId,
    ) -> WalletResult<ApprovalOutcome> {
        let result = self
            .transact(|state| {
                let outcome = state.approve_transfer(caller, id)?;
                let at = state.updated_at;
                let approvals = state.transfers().get_required(id)?.approvals;

                let mut events = vec![WalletEvent::TransferApproved {
                    id,
                    approver: caller.clone(),
                    approvals,
                    at,
                }];
                if let ApprovalOutcome::Sent {
                    recipient, amount, ..
                } = &outcome
                {
                    events.push(WalletEvent::TransferSent {
                        id,
                        recipient: recipient.clone(),
                        amount: *amount,
                        balance: state.balance(),
                        at,
                    });
                }
                Ok((outcome, events))
            })
            .await;

        match &result {
            Ok(ApprovalOutcome::Sent {
                recipient, amount, ..
            }) => {
                info!(id, approver = %caller, recipient = %recipient, amount, "Transfer sent");
            }
            Ok(ApprovalOutcome::Recorded { approvals, .. }) => {
                debug!(id, approver = %caller, approvals, "Approval recorded");
            }
            Err(err @ WalletError::InsufficientFunds { .. }) => {
                warn!(id, approver = %caller, error = %err, "Quorum reached without funds");
            }
            Err(err) => {
                debug!(id, approver = %caller, error = %err, "Approval rejected");
            }
        }

        result
    }

    /// Run a mutation against a draft of the state and commit it
    async fn transact<T, F>(&self, op: F) -> WalletResult<T>
    where
        F: FnOnce(&mut WalletState) -> WalletResult<(T, Vec<WalletEvent>)>,
    {
        let mut inner = self.inner.write().await;

        let mut draft = inner.state.clone();
        let (output, events) = op(&mut draft)?;
        inner.storage.commit(&draft, &events).await?;
        inner.state = draft;

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::memory_storage::MemoryStorage;
    use async_trait::async_trait;

    fn approvers() -> Vec<Address> {
        vec!["0xalice".into(), "0xbob".into(), "0xcarol".into()]
    }

    #[tokio::test]
    async fn test_wallet_basic_operations() {
        let storage = MemoryStorage::new();
        let wallet = Wallet::create(approvers(), 2, 1000, storage).await.unwrap();

        assert_eq!(wallet.approvers().await, approvers());
        assert_eq!(wallet.quorum().await, 2);

        let id = wallet
            .create_transfer(&"0xalice".into(), 100, "0xdave".into())
            .await
            .unwrap();
        assert_eq!(id, 0);

        wallet.approve_transfer(&"0xalice".into(), id).await.unwrap();
        let outcome = wallet.approve_transfer(&"0xbob".into(), id).await.unwrap();
        assert!(outcome.is_sent());

        assert_eq!(wallet.balance().await, 900);
        assert_eq!(wallet.balance_of(&"0xdave".into()).await, 100);
        assert!(wallet.pending_transfers().await.is_empty());
    }

    #[tokio::test]
    async fn test_events_are_journaled() {
        let storage = MemoryStorage::new();
        let wallet = Wallet::create(approvers(), 2, 0, storage).await.unwrap();

        wallet.deposit(&"0xfunder".into(), 500).await.unwrap();
        let id = wallet
            .create_transfer(&"0xbob".into(), 200, "0xdave".into())
            .await
            .unwrap();
        wallet.approve_transfer(&"0xbob".into(), id).await.unwrap();
        wallet.approve_transfer(&"0xcarol".into(), id).await.unwrap();

        // Rejected operations leave no trace.
        assert_eq!(
            wallet.approve_transfer(&"0xalice".into(), id).await,
            Err(WalletError::AlreadySent(0))
        );

        let events = wallet.events().await.unwrap();
        assert_eq!(events.len(), 6);
        assert!(matches!(events[0], WalletEvent::Created { quorum: 2, .. }));
        assert!(matches!(events[1], WalletEvent::Deposited { balance: 500, .. }));
        assert!(matches!(events[2], WalletEvent::TransferCreated { id: 0, .. }));
        assert!(matches!(
            events[3],
            WalletEvent::TransferApproved { approvals: 1, .. }
        ));
        assert!(matches!(
            events[4],
            WalletEvent::TransferApproved { approvals: 2, .. }
        ));
        assert!(matches!(
            events[5],
            WalletEvent::TransferSent {
                amount: 200,
                balance: 300,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_open_restores_committed_state() {
        let storage = MemoryStorage::new();
        let wallet = Wallet::create(approvers(), 2, 1000, storage.clone())
            .await
            .unwrap();
        let id = wallet
            .create_transfer(&"0xalice".into(), 100, "0xdave".into())
            .await
            .unwrap();
        wallet.approve_transfer(&"0xalice".into(), id).await.unwrap();

        let reopened = Wallet::open(storage).await.unwrap();
        assert_eq!(reopened.wallet_id().await, wallet.wallet_id().await);
        assert_eq!(reopened.snapshot().await, wallet.snapshot().await);

        // The restored wallet keeps enforcing duplicate approvals.
        assert_eq!(
            reopened.approve_transfer(&"0xalice".into(), id).await,
            Err(WalletError::DuplicateApproval {
                id,
                approver: "0xalice".into(),
            })
        );
    }

    #[tokio::test]
    async fn test_create_and_open_require_matching_storage() {
        assert!(matches!(
            Wallet::open(MemoryStorage::new()).await,
            Err(WalletError::Storage(_))
        ));

        let storage = MemoryStorage::new();
        Wallet::create(approvers(), 2, 0, storage.clone())
            .await
            .unwrap();
        assert!(matches!(
            Wallet::create(approvers(), 2, 0, storage).await,
            Err(WalletError::Storage(_))
        ));
    }

    /// Storage that accepts the initial commit and fails every later one
    struct FlakyStorage {
        inner: MemoryStorage,
    }

    #[async_trait]
    impl WalletStorage for FlakyStorage {
        async fn load_state(&self) -> WalletResult<Option<WalletState>> {
            self.inner.load_state().await
        }

        async fn commit(
            &mut self,
            state: &WalletState,
            events: &[WalletEvent],
        ) -> WalletResult<()> {
            if self.inner.load_state().await?.is_some() {
                return Err(WalletError::Storage("disk full".to_string()));
            }
            self.inner.commit(state, events).await
        }

        async fn events(&self) -> WalletResult<Vec<WalletEvent>> {
            self.inner.events().await
        }
    }

    #[tokio::test]
    async fn test_failed_commit_discards_changes() {
        let storage = FlakyStorage {
            inner: MemoryStorage::new(),
        };
        let wallet = Wallet::create(approvers(), 1, 1000, storage).await.unwrap();
        let before = wallet.snapshot().await;

        let result = wallet
            .create_transfer(&"0xalice".into(), 100, "0xdave".into())
            .await;

        assert_eq!(result, Err(WalletError::Storage("disk full".to_string())));
        assert_eq!(wallet.snapshot().await, before);
        assert!(wallet.transfers().await.is_empty());
    }
}
