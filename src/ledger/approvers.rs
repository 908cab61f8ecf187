//! Approver set and quorum management

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::types::*;

/// Immutable set of approvers together with the quorum they must reach
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawApproverSet")]
pub struct ApproverSet {
    members: Vec<Address>,
    quorum: Quorum,
}

/// Unchecked form used when restoring a persisted snapshot
#[derive(Deserialize)]
struct RawApproverSet {
    members: Vec<Address>,
    quorum: Quorum,
}

impl TryFrom<RawApproverSet> for ApproverSet {
    type Error = WalletError;

    fn try_from(raw: RawApproverSet) -> WalletResult<Self> {
        Self::new(raw.members, raw.quorum)
    }
}

impl ApproverSet {
    /// Build an approver set, rejecting empty or duplicate lists and
    /// out-of-range quorums
    pub fn new(members: Vec<Address>, quorum: Quorum) -> WalletResult<Self> {
        if members.is_empty() {
            return Err(WalletError::InvalidConfiguration(
                "Approver list cannot be empty".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(members.len());
        for member in &members {
            if member.as_str().trim().is_empty() {
                return Err(WalletError::InvalidConfiguration(
                    "Approver identity cannot be empty".to_string(),
                ));
            }
            if !seen.insert(member) {
                return Err(WalletError::InvalidConfiguration(format!(
                    "Approver '{}' appears more than once",
                    member
                )));
            }
        }

        if quorum == 0 || quorum as usize > members.len() {
            return Err(WalletError::InvalidConfiguration(format!(
                "Quorum must be between 1 and {}, got {}",
                members.len(),
                quorum
            )));
        }

        Ok(Self { members, quorum })
    }

    /// Approvers in creation order
    pub fn members(&self) -> &[Address] {
        &self.members
    }

    pub fn quorum(&self) -> Quorum {
        self.quorum
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, identity: &Address) -> bool {
        self.members.iter().any(|member| member == identity)
    }

    /// Fail with `Unauthorized` unless the caller is an approver
    pub fn ensure_member(&self, caller: &Address) -> WalletResult<()> {
        if self.contains(caller) {
            Ok(())
        } else {
            Err(WalletError::Unauthorized(caller.clone()))
        }
    }
}
