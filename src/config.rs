//! Provisioning configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ledger::ApproverSet;
use crate::types::*;

/// Parameters supplied once, when a wallet is provisioned
///
/// ```json
/// {
///   "approvers": ["0x5B38...", "0xAb84...", "0x4B20..."],
///   "quorum": 2,
///   "initial_balance": 10000
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Approvers in the order they should be reported
    pub approvers: Vec<Address>,
    /// Distinct approvals needed to release a transfer
    pub quorum: Quorum,
    /// Funds credited at creation
    #[serde(default)]
    pub initial_balance: Amount,
}

impl WalletConfig {
    pub fn new(approvers: Vec<Address>, quorum: Quorum) -> Self {
        Self {
            approvers,
            quorum,
            initial_balance: 0,
        }
    }

    /// Set the funds credited at creation
    pub fn with_initial_balance(mut self, initial_balance: Amount) -> Self {
        self.initial_balance = initial_balance;
        self
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> WalletResult<Self> {
        let config: WalletConfig = serde_json::from_str(json).map_err(|e| {
            WalletError::InvalidConfiguration(format!("Failed to parse configuration: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> WalletResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            WalletError::InvalidConfiguration(format!(
                "Failed to read configuration from {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&json)
    }

    /// Apply the same rules wallet creation enforces
    pub fn validate(&self) -> WalletResult<()> {
        ApproverSet::new(self.approvers.clone(), self.quorum).map(|_| ())
    }
}
