//! RPC collaborator interface
//!
//! [`LedgerRpc`] is the read/submit surface the orchestration layer needs
//! from an RPC node. Production code uses [`HttpLedgerRpc`] over the
//! nonblocking client; tests implement the trait with in-memory fakes.
//!
//! All calls are read-only except `send_transaction`, which broadcasts
//! already-signed bytes and is never retried at this layer.

use crate::errors::{OrchestratorError, Result};
use crate::types::{SignatureRecord, TransactionRecord};
use async_trait::async_trait;
use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_rpc_client_api::response::RpcConfirmedTransactionStatusWithSignature;
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey, signature::Signature,
    transaction::VersionedTransaction,
};
use solana_transaction_status::TransactionConfirmationStatus;
use std::str::FromStr;
use std::time::Duration;

/// Read/submit surface of the RPC node
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Fetch a recent blockhash to attach to a new transaction
    async fn latest_blockhash(&self) -> Result<Hash>;

    /// Broadcast a signed transaction; receipt, not success
    async fn send_transaction(&self, tx: &VersionedTransaction) -> Result<Signature>;

    /// Look up the outcome record for a signature, `None` while unobserved
    async fn get_transaction(&self, signature: &Signature) -> Result<Option<TransactionRecord>>;

    /// Signatures of transactions referencing an address, newest first
    async fn signatures_for_address(&self, address: &Pubkey) -> Result<Vec<SignatureRecord>>;

    /// Account balance in base units
    async fn get_balance(&self, address: &Pubkey) -> Result<u64>;
}

/// Production [`LedgerRpc`] over the nonblocking HTTP client
pub struct HttpLedgerRpc {
    client: RpcClient,
}

impl HttpLedgerRpc {
    /// Connect to an endpoint with a per-request timeout
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: RpcClient::new_with_timeout_and_commitment(
                endpoint.into(),
                timeout,
                CommitmentConfig::confirmed(),
            ),
        }
    }
}

/// Split node rejections from transport failures
///
/// A response the node produced (simulation failure, malformed transaction)
/// is a rejection of the bytes; anything below that is transport.
fn map_send_error(err: ClientError) -> OrchestratorError {
    match err.kind() {
        ClientErrorKind::RpcError(_) | ClientErrorKind::TransactionError(_) => {
            OrchestratorError::SubmissionRejected(err.to_string())
        }
        _ => OrchestratorError::Rpc(err.to_string()),
    }
}

/// Convert one node-side history entry into a [`SignatureRecord`]
fn map_signature_entry(
    entry: RpcConfirmedTransactionStatusWithSignature,
) -> Result<SignatureRecord> {
    let signature = Signature::from_str(&entry.signature).map_err(|e| {
        OrchestratorError::rpc(format!(
            "node returned unparseable signature '{}': {e}",
            entry.signature
        ))
    })?;
    Ok(SignatureRecord {
        signature,
        slot: entry.slot,
        err: entry.err.map(|e| e.to_string()),
    })
}

#[async_trait]
impl LedgerRpc for HttpLedgerRpc {
    async fn latest_blockhash(&self) -> Result<Hash> {
        self.client.get_latest_blockhash().await.map_err(|e| {
            // An endpoint we cannot reach at all is a missing collaborator,
            // not a blockhash problem
            match e.kind() {
                ClientErrorKind::Io(_) | ClientErrorKind::Reqwest(_) => {
                    OrchestratorError::CollaboratorUnavailable(e.to_string())
                }
                _ => OrchestratorError::blockhash(e.to_string()),
            }
        })
    }

    async fn send_transaction(&self, tx: &VersionedTransaction) -> Result<Signature> {
        self.client
            .send_transaction(tx)
            .await
            .map_err(map_send_error)
    }

    async fn get_transaction(&self, signature: &Signature) -> Result<Option<TransactionRecord>> {
        // Status lookup instead of full transaction fetch: an unobserved
        // signature is a clean None rather than a node error, and the
        // status carries everything the monitor needs.
        let response = self
            .client
            .get_signature_statuses(&[*signature])
            .await
            .map_err(|e| OrchestratorError::rpc(e.to_string()))?;

        let status = match response.value.into_iter().next().flatten() {
            Some(status) => status,
            None => return Ok(None),
        };

        // Only report the transaction once it reached confirmed depth;
        // processed-only sightings can still be dropped by the cluster.
        match status.confirmation_status {
            Some(
                TransactionConfirmationStatus::Confirmed
                | TransactionConfirmationStatus::Finalized,
            ) => {}
            _ => return Ok(None),
        }

        Ok(Some(TransactionRecord {
            slot: status.slot,
            err: status.err.map(|e| e.to_string()),
        }))
    }

    async fn signatures_for_address(&self, address: &Pubkey) -> Result<Vec<SignatureRecord>> {
        let entries = self
            .client
            .get_signatures_for_address(address)
            .await
            .map_err(|e| OrchestratorError::rpc(e.to_string()))?;

        entries.into_iter().map(map_signature_entry).collect()
    }

    async fn get_balance(&self, address: &Pubkey) -> Result<u64> {
        self.client
            .get_balance(address)
            .await
            .map_err(|e| OrchestratorError::rpc(e.to_string()))
    }
}
