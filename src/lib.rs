//! # Multisig Wallet
//!
//! Core of a multi-approver custodial wallet: a fixed set of approvers
//! jointly controls a pool of funds, and every outgoing transfer needs a
//! quorum of distinct approvals before the funds move.
//!
//! ## Features
//!
//! - **Quorum-gated transfers**: proposals, approvals and exactly-once payout
//! - **Transactional operations**: failed operations never leave partial state
//! - **Audit journal**: every committed operation is recorded as an event
//! - **Storage abstraction**: host-agnostic persistence through a trait
//!
//! ## Quick Start
//!
//! ```rust
//! use multisig_wallet::{utils::MemoryStorage, Address, Wallet};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), multisig_wallet::WalletError> {
//! let approvers: Vec<Address> = vec!["0xalice".into(), "0xbob".into(), "0xcarol".into()];
//! let wallet = Wallet::create(approvers, 2, 1000, MemoryStorage::new()).await?;
//!
//! let id = wallet.create_transfer(&"0xalice".into(), 100, "0xdave".into()).await?;
//! wallet.approve_transfer(&"0xalice".into(), id).await?;
//! wallet.approve_transfer(&"0xbob".into(), id).await?;
//!
//! assert_eq!(wallet.balance().await, 900);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod ledger;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use ledger::*;
pub use traits::*;
pub use types::*;
