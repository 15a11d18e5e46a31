//! Transaction submission
//!
//! One sign request, one broadcast, per invocation. Retry policy lives with
//! the caller: replaying a state-changing submission is only safe with a
//! freshly built transaction, and this layer does not build.

use crate::context::ChainContext;
use crate::errors::{OrchestratorError, Result};
use crate::tx::UnsignedTransaction;
use crate::types::SubmissionHandle;
use metrics::counter;
use tracing::{info, warn};

/// Sign and broadcast an unsigned transaction
///
/// The signer sees exactly one sign request and the RPC collaborator exactly
/// one broadcast. Collaborator errors pass through with their raw messages
/// intact for the classifier.
///
/// # Errors
///
/// - `WalletNotConnected` when no wallet session is active
/// - `SignerRejected` when the signer declines or errors
/// - `SubmissionRejected` when the node refuses the signed bytes
/// - `Rpc` on transport failure below the node
pub async fn submit(ctx: &ChainContext, unsigned: &UnsignedTransaction) -> Result<SubmissionHandle> {
    if !ctx.signer().is_connected() {
        counter!("shopchain_submissions_total", "outcome" => "not_connected").increment(1);
        return Err(OrchestratorError::WalletNotConnected);
    }

    let signed = match ctx.signer().sign_transaction(unsigned).await {
        Ok(signed) => signed,
        Err(e) => {
            counter!("shopchain_submissions_total", "outcome" => "sign_failed").increment(1);
            warn!(category = e.category(), "signing failed: {e}");
            return Err(e);
        }
    };

    match ctx.rpc().send_transaction(&signed).await {
        Ok(signature) => {
            counter!("shopchain_submissions_total", "outcome" => "accepted").increment(1);
            info!(signature = %signature, fee_payer = %unsigned.fee_payer, "transaction broadcast");
            Ok(match unsigned.reference {
                Some(reference) => SubmissionHandle::with_reference(signature, reference),
                None => SubmissionHandle::new(signature),
            })
        }
        Err(e) => {
            counter!("shopchain_submissions_total", "outcome" => "rejected").increment(1);
            warn!(category = e.category(), "broadcast failed: {e}");
            Err(e)
        }
    }
}
