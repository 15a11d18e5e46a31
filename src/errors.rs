//! Error types for the purchase orchestration layer
//!
//! Every failure in the build → sign → submit → monitor pipeline surfaces as
//! an [`OrchestratorError`]. The taxonomy is closed so the classifier in
//! [`crate::classify`] can map each variant to a user-facing kind without
//! string-sniffing first.
//!
//! Raw collaborator messages (signer, RPC) are preserved verbatim inside the
//! variants; nothing at this layer rewrites or swallows them.

use thiserror::Error;

/// Error type covering the whole orchestration lifecycle
///
/// Variants split into four groups:
/// - local validation (`InvalidInput`, `AddressSpaceExhausted`)
/// - wallet/session state (`WalletNotConnected`, `WalletNotReady`,
///   `WalletConnection`, `WalletDisconnected`, `SignerRejected`)
/// - collaborator failures (`SubmissionRejected`, `CollaboratorUnavailable`,
///   `Blockhash`, `Rpc`, `Timeout`)
/// - outcomes and escapes (`Program`, `Internal`, `External`)
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// A payload failed validation before any I/O happened
    ///
    /// Never sent over the wire; the request was rejected locally.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The bump search for a derived address found no valid candidate
    ///
    /// Must not occur with well-formed seeds; seeing this indicates a
    /// corrupted seed or a component that is not really 32 bytes.
    #[error("Address space exhausted for seed tag '{tag}'")]
    AddressSpaceExhausted {
        /// The seed tag whose derivation failed
        tag: &'static str,
    },

    /// The wallet adapter has no active session
    #[error("Wallet is not connected")]
    WalletNotConnected,

    /// The wallet adapter exists but cannot serve requests yet
    #[error("Wallet is not ready")]
    WalletNotReady,

    /// Establishing the wallet session failed
    #[error("Wallet connection failed: {0}")]
    WalletConnection(String),

    /// The wallet session dropped mid-flight
    #[error("Wallet disconnected")]
    WalletDisconnected,

    /// The external signer declined or errored on a sign request
    ///
    /// Carries the signer's raw message so the classifier can tell a user
    /// cancel apart from a signer fault.
    #[error("Signer rejected the request: {0}")]
    SignerRejected(String),

    /// The RPC node refused the signed bytes
    ///
    /// Covers preflight simulation failures (insufficient balance, expired
    /// blockhash, program errors) as reported by the node.
    #[error("Submission rejected: {0}")]
    SubmissionRejected(String),

    /// A required collaborator (RPC or signer) is missing from the context
    #[error("Collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    /// Fetching or using a recent blockhash failed
    #[error("Blockhash error: {0}")]
    Blockhash(String),

    /// Transport or node-level RPC failure
    #[error("RPC error: {0}")]
    Rpc(String),

    /// A bounded wait elapsed before an outcome was observed
    ///
    /// Not a proven failure: the transaction may still land.
    #[error("Timed out after {elapsed_ms}ms")]
    Timeout {
        /// How long the caller waited before giving up
        elapsed_ms: u64,
    },

    /// The transaction landed on chain carrying an error marker
    #[error("Program error: {message}")]
    Program {
        /// Numeric program error code, when the node reported one
        code: Option<u32>,
        /// The on-chain error text
        message: String,
    },

    /// Internal invariant violation; indicates a bug in this crate
    #[error("Internal error: {0}")]
    Internal(String),

    /// Wrapped error from external crates that fits no other variant
    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl OrchestratorError {
    /// Check whether retrying the failed operation might succeed
    ///
    /// Only read-only or rebuild-from-scratch operations are safe to retry;
    /// a rejected submission needs a freshly built transaction, not a replay.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Blockhash(_) => true,
            Self::Rpc(_) => true,
            Self::Timeout { .. } => true,
            Self::CollaboratorUnavailable(_) => true,
            Self::WalletNotReady => true,
            Self::SubmissionRejected(msg) => {
                !msg.contains("insufficient") && !msg.contains("balance")
            }

            Self::InvalidInput(_) => false,
            Self::AddressSpaceExhausted { .. } => false,
            Self::WalletNotConnected => false,
            Self::WalletConnection(_) => false,
            Self::WalletDisconnected => false,
            Self::SignerRejected(_) => false,
            Self::Program { .. } => false,
            Self::Internal(_) => false,
            Self::External(_) => false,
        }
    }

    /// Error category label for metrics and log fields
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "validation",
            Self::AddressSpaceExhausted { .. } => "derivation",
            Self::WalletNotConnected
            | Self::WalletNotReady
            | Self::WalletConnection(_)
            | Self::WalletDisconnected => "wallet",
            Self::SignerRejected(_) => "signing",
            Self::SubmissionRejected(_) => "submission",
            Self::CollaboratorUnavailable(_) => "collaborator",
            Self::Blockhash(_) => "blockhash",
            Self::Rpc(_) => "rpc",
            Self::Timeout { .. } => "timeout",
            Self::Program { .. } => "program",
            Self::Internal(_) => "internal",
            Self::External(_) => "external",
        }
    }
}

// Convenience constructors for the common construction sites
impl OrchestratorError {
    /// Create an input validation error
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }

    /// Create an RPC transport error
    pub fn rpc(reason: impl Into<String>) -> Self {
        Self::Rpc(reason.into())
    }

    /// Create a blockhash error
    pub fn blockhash(reason: impl Into<String>) -> Self {
        Self::Blockhash(reason.into())
    }

    /// Create an internal invariant error
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal(reason.into())
    }
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, OrchestratorError>;
