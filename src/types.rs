//! Common value types shared across the orchestration pipeline
//!
//! Everything here is an immutable value object: created once, passed by
//! value or shared reference, never mutated after construction. That is what
//! makes them safe to hand across task boundaries without locks.

use serde::{Deserialize, Serialize};
use solana_sdk::{pubkey::Pubkey, signature::Signature};

/// Ledger network the context talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    /// Production ledger
    Mainnet,
    /// Public development ledger
    #[default]
    Devnet,
    /// Public staging ledger
    Testnet,
    /// Local test validator
    Localnet,
}

impl Network {
    /// Default public RPC endpoint for this network
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Self::Mainnet => "https://api.mainnet-beta.solana.com",
            Self::Devnet => "https://api.devnet.solana.com",
            Self::Testnet => "https://api.testnet.solana.com",
            Self::Localnet => "http://127.0.0.1:8899",
        }
    }
}

/// Terminal-state lifecycle of a single submission attempt
///
/// An attempt is `Pending` from the instant a handle exists and moves to
/// exactly one of the three terminal values. Terminal states are absorbing;
/// nothing in this crate transitions out of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Broadcast accepted, outcome not yet observed
    Pending,
    /// Observed on chain without an error marker
    Success,
    /// Observed on chain carrying an error marker
    Failed,
    /// The monitoring window elapsed before the transaction was observed
    ///
    /// Unknown, not proven failure: the transaction may still land later.
    Timeout,
}

impl TransactionStatus {
    /// Whether this status is absorbing
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Handle returned once signed bytes were accepted into the network queue
///
/// Receipt only — holding a handle implies nothing about the outcome. The
/// reference pubkey is the caller-supplied idempotency key embedded in the
/// transaction, kept here so a monitor can fall back to an address lookup
/// if the handle is lost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionHandle {
    /// Signature identifying the broadcast transaction
    pub signature: Signature,
    /// Reference key attached to the transaction, when the flow used one
    pub reference: Option<Pubkey>,
}

impl SubmissionHandle {
    /// Create a handle for a plain submission without a reference key
    pub fn new(signature: Signature) -> Self {
        Self {
            signature,
            reference: None,
        }
    }

    /// Create a handle carrying the reference key used by the transaction
    pub fn with_reference(signature: Signature, reference: Pubkey) -> Self {
        Self {
            signature,
            reference: Some(reference),
        }
    }
}

/// Outcome record for a transaction observed on the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    /// Slot the transaction landed in
    pub slot: u64,
    /// On-chain error marker, if the program rejected the transaction
    pub err: Option<String>,
}

impl TransactionRecord {
    /// Whether the transaction executed without an error marker
    pub fn succeeded(&self) -> bool {
        self.err.is_none()
    }
}

/// One entry from a signatures-for-address lookup, newest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureRecord {
    /// Signature of the referencing transaction
    pub signature: Signature,
    /// Slot the transaction landed in
    pub slot: u64,
    /// On-chain error marker, if any
    pub err: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_terminality() {
        assert!(!TransactionStatus::Pending.is_terminal());
        assert!(TransactionStatus::Success.is_terminal());
        assert!(TransactionStatus::Failed.is_terminal());
        assert!(TransactionStatus::Timeout.is_terminal());
    }

    #[test]
    fn test_status_serde_round_trip() {
        let json = serde_json::to_string(&TransactionStatus::Timeout).unwrap();
        assert_eq!(json, "\"timeout\"");
        let back: TransactionStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TransactionStatus::Timeout);
    }

    #[test]
    fn test_network_default_urls() {
        assert!(Network::Mainnet.default_rpc_url().contains("mainnet"));
        assert!(Network::Localnet.default_rpc_url().starts_with("http://127.0.0.1"));
    }

    #[test]
    fn test_handle_reference() {
        let sig = Signature::default();
        let reference = Pubkey::new_unique();
        let handle = SubmissionHandle::with_reference(sig, reference);
        assert_eq!(handle.reference, Some(reference));
        assert_eq!(SubmissionHandle::new(sig).reference, None);
    }
}
