//! Ledger module containing the approver set, transfer book and wallet state

pub mod approvers;
pub mod state;
pub mod transfer;
pub mod wallet;

pub use approvers::*;
pub use state::*;
pub use transfer::*;
pub use wallet::*;
