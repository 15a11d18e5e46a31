//! Unsigned transaction assembly
//!
//! validate payload → derive addresses → construct instructions → attach a
//! recent blockhash and fee payer. Builders fail fast with `InvalidInput`
//! before any I/O; the single RPC read happens only after a payload passed
//! validation. No partial transaction is ever returned.

use crate::context::ChainContext;
use crate::errors::{OrchestratorError, Result};
use crate::pda;
use crate::tx::instructions::{
    purchase_instruction, sanity_check_reference_meta, transfer_instruction,
    watch_purchase_instruction, PurchaseAccounts, WatchPurchaseAccounts,
};
use crate::units;
use solana_sdk::{
    hash::Hash,
    message::{Message, VersionedMessage},
    pubkey::{Pubkey, MAX_SEED_LEN},
};
use tracing::debug;

/// A built, not-yet-signed transaction
///
/// Single-use: the blockhash inside expires within the freshness window, so
/// a retry rebuilds from the request instead of resubmitting this value.
#[derive(Debug, Clone)]
pub struct UnsignedTransaction {
    /// The compiled message to sign
    pub message: VersionedMessage,
    /// Account paying the fee; the initiating party
    pub fee_payer: Pubkey,
    /// Recent blockhash the message was compiled against
    pub blockhash: Hash,
    /// Reference key embedded in the transaction, when the flow used one
    pub reference: Option<Pubkey>,
}

/// Payload of a purchase attempt
#[derive(Debug, Clone)]
pub struct PurchaseRequest {
    /// Buying wallet; signs and pays
    pub buyer: Pubkey,
    /// Owner of the store being bought from
    pub store_owner: Pubkey,
    /// Product identifier, as listed under the store
    pub product_id: String,
    /// Price in display units
    pub amount: f64,
    /// Caller-supplied unique key for this attempt
    ///
    /// This is the idempotency key: each attempt gets a fresh one, and the
    /// fallback monitor path finds the transaction by it.
    pub reference: Pubkey,
}

/// Payload of a direct wallet-to-wallet transfer
#[derive(Debug, Clone)]
pub struct TransferRequest {
    /// Sending wallet; signs and pays
    pub from: Pubkey,
    /// Receiving wallet
    pub to: Pubkey,
    /// Amount in display units
    pub amount: f64,
}

/// Builds unsigned transactions against one storefront deployment
pub struct TxBuilder {
    ctx: ChainContext,
}

impl TxBuilder {
    /// Create a builder over a context
    pub fn new(ctx: ChainContext) -> Self {
        Self { ctx }
    }

    /// Build a standard purchase transaction
    pub async fn build_purchase(&self, req: &PurchaseRequest) -> Result<UnsignedTransaction> {
        let amount_base = validate_purchase(req)?;
        let program_id = self.ctx.program_id();

        // Derivation order mirrors the program's own account resolution
        let (store, _) = pda::derive_store_address(&req.store_owner, program_id)?;
        let (escrow, _) = pda::derive_escrow_address(&store, program_id)?;
        let (receipt, _) = pda::derive_purchase_receipt(&store, &req.buyer, program_id)?;
        let (product, _) =
            pda::derive_product_address(&store, req.product_id.as_bytes(), program_id)?;

        let accounts = PurchaseAccounts {
            buyer: req.buyer,
            store,
            escrow,
            receipt,
            product,
            reference: req.reference,
        };
        let ix = purchase_instruction(program_id, &accounts, amount_base, req.product_id.as_bytes());
        sanity_check_reference_meta(&ix, &req.reference)?;

        debug!(
            buyer = %req.buyer,
            store = %store,
            amount_base,
            "built purchase instruction"
        );
        self.assemble(vec![ix], req.buyer, Some(req.reference)).await
    }

    /// Build a watch purchase transaction including warranty registration
    pub async fn build_watch_purchase(&self, req: &PurchaseRequest) -> Result<UnsignedTransaction> {
        let amount_base = validate_purchase(req)?;
        let program_id = self.ctx.program_id();

        let (store, _) = pda::derive_store_address(&req.store_owner, program_id)?;
        let (escrow, _) = pda::derive_escrow_address(&store, program_id)?;
        let (watch_purchase, _) = pda::derive_watch_purchase(
            &store,
            &req.buyer,
            req.product_id.as_bytes(),
            program_id,
        )?;
        let (product, _) =
            pda::derive_product_address(&store, req.product_id.as_bytes(), program_id)?;
        let (warranty, _) = pda::derive_watch_warranty(&product, program_id)?;
        let (loyalty_mint, _) = pda::derive_loyalty_mint(&store, program_id)?;

        let accounts = WatchPurchaseAccounts {
            buyer: req.buyer,
            store,
            escrow,
            watch_purchase,
            warranty,
            loyalty_mint,
            reference: req.reference,
        };
        let ix =
            watch_purchase_instruction(program_id, &accounts, amount_base, req.product_id.as_bytes());
        sanity_check_reference_meta(&ix, &req.reference)?;

        debug!(
            buyer = %req.buyer,
            store = %store,
            warranty = %warranty,
            amount_base,
            "built watch purchase instruction"
        );
        self.assemble(vec![ix], req.buyer, Some(req.reference)).await
    }

    /// Build a direct transfer transaction
    pub async fn build_transfer(&self, req: &TransferRequest) -> Result<UnsignedTransaction> {
        if req.from == Pubkey::default() || req.to == Pubkey::default() {
            return Err(OrchestratorError::invalid_input(
                "transfer requires both sender and recipient addresses",
            ));
        }
        if req.from == req.to {
            return Err(OrchestratorError::invalid_input(
                "transfer sender and recipient must differ",
            ));
        }
        let amount_base = positive_base_units(req.amount)?;

        let ix = transfer_instruction(&req.from, &req.to, amount_base);
        self.assemble(vec![ix], req.from, None).await
    }

    /// Attach blockhash + fee payer and compile the message
    async fn assemble(
        &self,
        instructions: Vec<solana_sdk::instruction::Instruction>,
        fee_payer: Pubkey,
        reference: Option<Pubkey>,
    ) -> Result<UnsignedTransaction> {
        let blockhash = self.ctx.rpc().latest_blockhash().await?;
        let message = Message::new_with_blockhash(&instructions, Some(&fee_payer), &blockhash);
        Ok(UnsignedTransaction {
            message: VersionedMessage::Legacy(message),
            fee_payer,
            blockhash,
            reference,
        })
    }
}

/// Payload checks shared by the purchase kinds; returns the base amount
fn validate_purchase(req: &PurchaseRequest) -> Result<u64> {
    if req.buyer == Pubkey::default() {
        return Err(OrchestratorError::invalid_input(
            "purchase requires a buyer address",
        ));
    }
    if req.store_owner == Pubkey::default() {
        return Err(OrchestratorError::invalid_input(
            "purchase requires a store owner address",
        ));
    }
    if req.reference == Pubkey::default() {
        return Err(OrchestratorError::invalid_input(
            "purchase requires a reference key",
        ));
    }
    if req.product_id.is_empty() {
        return Err(OrchestratorError::invalid_input(
            "purchase requires a product id",
        ));
    }
    if req.product_id.len() > MAX_SEED_LEN {
        return Err(OrchestratorError::invalid_input(format!(
            "product id exceeds {MAX_SEED_LEN} bytes"
        )));
    }
    positive_base_units(req.amount)
}

/// Convert and require at least one base unit
fn positive_base_units(amount: f64) -> Result<u64> {
    let base = units::to_base_units(amount)?;
    if base == 0 {
        return Err(OrchestratorError::invalid_input(format!(
            "amount {amount} is below one base unit"
        )));
    }
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ChainContext;
    use crate::rpc::LedgerRpc;
    use crate::types::{Network, SignatureRecord, TransactionRecord};
    use crate::wallet::{KeypairSigner, WalletSigner};
    use async_trait::async_trait;
    use solana_sdk::{
        signature::{Keypair, Signature},
        transaction::VersionedTransaction,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Fake RPC serving one fixed blockhash
    struct FixedHashRpc {
        blockhash: Hash,
        calls: AtomicUsize,
        fail: bool,
    }

    impl FixedHashRpc {
        fn new() -> Self {
            Self {
                blockhash: Hash::new_unique(),
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl LedgerRpc for FixedHashRpc {
        async fn latest_blockhash(&self) -> crate::errors::Result<Hash> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(OrchestratorError::blockhash("node unavailable"));
            }
            Ok(self.blockhash)
        }

        async fn send_transaction(
            &self,
            _tx: &VersionedTransaction,
        ) -> crate::errors::Result<Signature> {
            unreachable!("builder never broadcasts")
        }

        async fn get_transaction(
            &self,
            _signature: &Signature,
        ) -> crate::errors::Result<Option<TransactionRecord>> {
            unreachable!("builder never polls")
        }

        async fn signatures_for_address(
            &self,
            _address: &Pubkey,
        ) -> crate::errors::Result<Vec<SignatureRecord>> {
            unreachable!("builder never polls")
        }

        async fn get_balance(&self, _address: &Pubkey) -> crate::errors::Result<u64> {
            unreachable!("builder never reads balances")
        }
    }

    fn test_context(rpc: Arc<FixedHashRpc>) -> ChainContext {
        let signer: Arc<dyn WalletSigner> =
            Arc::new(KeypairSigner::from_keypair(Keypair::new()));
        ChainContext::new(rpc, signer, Pubkey::new_unique(), Network::Localnet)
    }

    fn purchase_request() -> PurchaseRequest {
        PurchaseRequest {
            buyer: Pubkey::new_unique(),
            store_owner: Pubkey::new_unique(),
            product_id: "watch-042".to_string(),
            amount: 2.5,
            reference: Pubkey::new_unique(),
        }
    }

    #[tokio::test]
    async fn test_build_purchase_attaches_blockhash_and_fee_payer() {
        let rpc = Arc::new(FixedHashRpc::new());
        let builder = TxBuilder::new(test_context(rpc.clone()));
        let req = purchase_request();

        let unsigned = builder.build_purchase(&req).await.unwrap();

        assert_eq!(unsigned.blockhash, rpc.blockhash);
        assert_eq!(unsigned.fee_payer, req.buyer);
        assert_eq!(unsigned.reference, Some(req.reference));
        assert_eq!(rpc.calls.load(Ordering::SeqCst), 1);

        // Fee payer is the first account key of the compiled message
        assert_eq!(unsigned.message.static_account_keys()[0], req.buyer);
    }

    #[tokio::test]
    async fn test_build_purchase_is_deterministic_modulo_blockhash() {
        let rpc = Arc::new(FixedHashRpc::new());
        let builder = TxBuilder::new(test_context(rpc));
        let req = purchase_request();

        let first = builder.build_purchase(&req).await.unwrap();
        let second = builder.build_purchase(&req).await.unwrap();

        assert_eq!(
            first.message.static_account_keys(),
            second.message.static_account_keys()
        );
    }

    #[tokio::test]
    async fn test_build_watch_purchase_includes_warranty_accounts() {
        let rpc = Arc::new(FixedHashRpc::new());
        let ctx = test_context(rpc);
        let program_id = *ctx.program_id();
        let builder = TxBuilder::new(ctx);
        let req = purchase_request();

        let unsigned = builder.build_watch_purchase(&req).await.unwrap();
        let keys = unsigned.message.static_account_keys();

        let (store, _) = pda::derive_store_address(&req.store_owner, &program_id).unwrap();
        let (product, _) =
            pda::derive_product_address(&store, req.product_id.as_bytes(), &program_id).unwrap();
        let (warranty, _) = pda::derive_watch_warranty(&product, &program_id).unwrap();
        let (loyalty_mint, _) = pda::derive_loyalty_mint(&store, &program_id).unwrap();

        assert!(keys.contains(&warranty));
        assert!(keys.contains(&loyalty_mint));
    }

    #[tokio::test]
    async fn test_rejects_invalid_payloads_before_io() {
        let rpc = Arc::new(FixedHashRpc::new());
        let builder = TxBuilder::new(test_context(rpc.clone()));

        let mut missing_buyer = purchase_request();
        missing_buyer.buyer = Pubkey::default();
        let mut empty_product = purchase_request();
        empty_product.product_id.clear();
        let mut zero_amount = purchase_request();
        zero_amount.amount = 0.0;
        let mut negative_amount = purchase_request();
        negative_amount.amount = -1.0;

        for req in [missing_buyer, empty_product, zero_amount, negative_amount] {
            let err = builder.build_purchase(&req).await.unwrap_err();
            assert!(matches!(err, OrchestratorError::InvalidInput(_)));
        }

        // Validation failed before the freshness-token read
        assert_eq!(rpc.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_blockhash_failure_propagates() {
        let rpc = Arc::new(FixedHashRpc::failing());
        let builder = TxBuilder::new(test_context(rpc));

        let err = builder.build_purchase(&purchase_request()).await.unwrap_err();
        assert!(matches!(err, OrchestratorError::Blockhash(_)));
    }

    #[tokio::test]
    async fn test_transfer_validation() {
        let rpc = Arc::new(FixedHashRpc::new());
        let builder = TxBuilder::new(test_context(rpc));
        let wallet = Pubkey::new_unique();

        let self_transfer = TransferRequest {
            from: wallet,
            to: wallet,
            amount: 1.0,
        };
        assert!(builder.build_transfer(&self_transfer).await.is_err());

        let ok = TransferRequest {
            from: wallet,
            to: Pubkey::new_unique(),
            amount: 0.25,
        };
        let unsigned = builder.build_transfer(&ok).await.unwrap();
        assert_eq!(unsigned.fee_payer, wallet);
        assert_eq!(unsigned.reference, None);
    }
}
