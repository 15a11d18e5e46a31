//! Error classification for user-facing surfaces
//!
//! Maps any [`OrchestratorError`] to a small closed [`FailureKind`] plus a
//! short human-readable message. Total by construction: typed variant
//! matches come first, message substrings are the last resort, and anything
//! unrecognized lands in `Unknown` with the original message preserved so
//! the UI always has something to show.

use crate::errors::OrchestratorError;

/// Closed set of user-facing failure kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// No wallet session exists
    NotConnected,
    /// The session exists but cannot serve requests yet
    NotReady,
    /// Establishing the session failed
    ConnectionFailed,
    /// The session dropped mid-flight
    Disconnected,
    /// The outcome is unknown within the waiting window
    Timeout,
    /// The user declined the signing request
    UserRejected,
    /// Signing failed for a reason other than user choice
    SignFailed,
    /// The payer cannot cover the amount plus fees
    InsufficientFunds,
    /// The attached blockhash expired before submission landed
    StaleBlockhash,
    /// Transport-level failure talking to the network
    NetworkError,
    /// The on-chain program rejected the transaction
    ProgramError,
    /// Anything unrecognized
    Unknown,
}

/// A classified failure ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    /// Which kind of failure this is
    pub kind: FailureKind,
    /// Short, specific, human-readable message
    pub message: String,
}

/// Classify an error into a kind and displayable message
///
/// Never panics and always returns a kind.
pub fn classify(error: &OrchestratorError) -> ClassifiedError {
    let kind = match error {
        // Typed matches first; these never defer to substrings
        OrchestratorError::WalletNotConnected => FailureKind::NotConnected,
        OrchestratorError::WalletNotReady => FailureKind::NotReady,
        OrchestratorError::WalletConnection(_) => FailureKind::ConnectionFailed,
        OrchestratorError::WalletDisconnected => FailureKind::Disconnected,
        OrchestratorError::Timeout { .. } => FailureKind::Timeout,
        OrchestratorError::Blockhash(_) => FailureKind::StaleBlockhash,
        OrchestratorError::Program { .. } => FailureKind::ProgramError,
        OrchestratorError::CollaboratorUnavailable(_) => FailureKind::NetworkError,

        OrchestratorError::SignerRejected(msg) => {
            if mentions_user_rejection(msg) {
                FailureKind::UserRejected
            } else {
                FailureKind::SignFailed
            }
        }

        OrchestratorError::SubmissionRejected(msg) => classify_rejection(msg),
        OrchestratorError::Rpc(msg) => {
            if mentions_insufficient_funds(msg) {
                FailureKind::InsufficientFunds
            } else {
                FailureKind::NetworkError
            }
        }

        // Local defects and escapes: substring scan as the last resort
        OrchestratorError::InvalidInput(_)
        | OrchestratorError::AddressSpaceExhausted { .. }
        | OrchestratorError::Internal(_) => FailureKind::Unknown,
        OrchestratorError::External(e) => classify_unrecognized(&e.to_string()),
    };

    ClassifiedError {
        kind,
        message: message_for(kind, error),
    }
}

/// Substring classification for an RPC rejection message
fn classify_rejection(msg: &str) -> FailureKind {
    if mentions_insufficient_funds(msg) {
        FailureKind::InsufficientFunds
    } else if mentions_stale_blockhash(msg) {
        FailureKind::StaleBlockhash
    } else if msg.to_lowercase().contains("program") {
        FailureKind::ProgramError
    } else {
        FailureKind::NetworkError
    }
}

/// Substring classification for errors with no typed variant at all
fn classify_unrecognized(msg: &str) -> FailureKind {
    let lower = msg.to_lowercase();
    if mentions_user_rejection(msg) {
        FailureKind::UserRejected
    } else if mentions_insufficient_funds(msg) {
        FailureKind::InsufficientFunds
    } else if mentions_stale_blockhash(msg) {
        FailureKind::StaleBlockhash
    } else if lower.contains("timed out") || lower.contains("timeout") {
        FailureKind::Timeout
    } else if lower.contains("connection") || lower.contains("network") {
        FailureKind::NetworkError
    } else {
        FailureKind::Unknown
    }
}

fn mentions_user_rejection(msg: &str) -> bool {
    let lower = msg.to_lowercase();
    lower.contains("user rejected") || lower.contains("rejected the request")
}

fn mentions_insufficient_funds(msg: &str) -> bool {
    let lower = msg.to_lowercase();
    lower.contains("insufficient") && (lower.contains("fund") || lower.contains("lamport") || lower.contains("balance"))
}

fn mentions_stale_blockhash(msg: &str) -> bool {
    let lower = msg.to_lowercase();
    lower.contains("blockhash not found") || lower.contains("blockhash expired")
}

/// Displayable message per kind; `Unknown` keeps the original text
fn message_for(kind: FailureKind, error: &OrchestratorError) -> String {
    match kind {
        FailureKind::NotConnected => {
            "No wallet is connected. Connect a wallet and try again.".to_string()
        }
        FailureKind::NotReady => {
            "The wallet is not ready yet. Wait a moment and try again.".to_string()
        }
        FailureKind::ConnectionFailed => {
            "Could not connect to the wallet. Check the wallet and try again.".to_string()
        }
        FailureKind::Disconnected => {
            "The wallet disconnected. Reconnect and try again.".to_string()
        }
        FailureKind::Timeout => {
            "The network did not confirm the transaction in time. It may still \
             complete - check your purchase history before retrying."
                .to_string()
        }
        FailureKind::UserRejected => {
            "The request was declined in your wallet. Approve the request to continue.".to_string()
        }
        FailureKind::SignFailed => {
            "The wallet could not sign the transaction. Try again.".to_string()
        }
        FailureKind::InsufficientFunds => {
            "Your balance does not cover this amount plus network fees.".to_string()
        }
        FailureKind::StaleBlockhash => {
            "The transaction expired before it reached the network. Try again.".to_string()
        }
        FailureKind::NetworkError => {
            "A network error occurred. Check your connection and try again.".to_string()
        }
        FailureKind::ProgramError => {
            format!("The store program rejected the transaction: {error}")
        }
        FailureKind::Unknown => error.to_string(),
    }
}
