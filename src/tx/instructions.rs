//! Instruction construction for the storefront program
//!
//! Account order in each instruction matches the on-chain program's expected
//! layout exactly; the program re-derives every program-owned address and
//! rejects the transaction on any mismatch. The caller-supplied reference key
//! rides along as the final read-only meta so the transaction can be found
//! again by address lookup.

use crate::errors::Result;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_instruction, system_program,
};

/// Instruction discriminators, fixed by the program
const IX_PURCHASE: u8 = 0;
const IX_WATCH_PURCHASE: u8 = 1;

/// Accounts of a standard purchase, in program order
#[derive(Debug, Clone)]
pub struct PurchaseAccounts {
    /// Buyer; signs and pays
    pub buyer: Pubkey,
    /// Store account
    pub store: Pubkey,
    /// Store escrow vault receiving the payment
    pub escrow: Pubkey,
    /// Per-buyer purchase receipt
    pub receipt: Pubkey,
    /// Product listing being bought
    pub product: Pubkey,
    /// Caller-supplied reference key for the fallback lookup
    pub reference: Pubkey,
}

/// Accounts of a watch purchase with warranty registration, in program order
#[derive(Debug, Clone)]
pub struct WatchPurchaseAccounts {
    /// Buyer; signs and pays
    pub buyer: Pubkey,
    /// Store account
    pub store: Pubkey,
    /// Store escrow vault receiving the payment
    pub escrow: Pubkey,
    /// Watch purchase record
    pub watch_purchase: Pubkey,
    /// Warranty record for the product
    pub warranty: Pubkey,
    /// Loyalty point mint credited on purchase
    pub loyalty_mint: Pubkey,
    /// Caller-supplied reference key for the fallback lookup
    pub reference: Pubkey,
}

/// Discriminator + amount + length-prefixed product id
fn encode_purchase_data(discriminator: u8, amount_base: u64, product_id: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(1 + 8 + 4 + product_id.len());
    data.push(discriminator);
    data.extend_from_slice(&amount_base.to_le_bytes());
    data.extend_from_slice(&(product_id.len() as u32).to_le_bytes());
    data.extend_from_slice(product_id);
    data
}

/// Build the standard purchase instruction
pub fn purchase_instruction(
    program_id: &Pubkey,
    accounts: &PurchaseAccounts,
    amount_base: u64,
    product_id: &[u8],
) -> Instruction {
    Instruction::new_with_bytes(
        *program_id,
        &encode_purchase_data(IX_PURCHASE, amount_base, product_id),
        vec![
            AccountMeta::new(accounts.buyer, true),
            AccountMeta::new(accounts.store, false),
            AccountMeta::new(accounts.escrow, false),
            AccountMeta::new(accounts.receipt, false),
            AccountMeta::new_readonly(accounts.product, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(accounts.reference, false),
        ],
    )
}

/// Build the watch purchase instruction with warranty registration
pub fn watch_purchase_instruction(
    program_id: &Pubkey,
    accounts: &WatchPurchaseAccounts,
    amount_base: u64,
    product_id: &[u8],
) -> Instruction {
    Instruction::new_with_bytes(
        *program_id,
        &encode_purchase_data(IX_WATCH_PURCHASE, amount_base, product_id),
        vec![
            AccountMeta::new(accounts.buyer, true),
            AccountMeta::new(accounts.store, false),
            AccountMeta::new(accounts.escrow, false),
            AccountMeta::new(accounts.watch_purchase, false),
            AccountMeta::new(accounts.warranty, false),
            AccountMeta::new(accounts.loyalty_mint, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(accounts.reference, false),
        ],
    )
}

/// Build a direct base-unit transfer between two wallets
pub fn transfer_instruction(from: &Pubkey, to: &Pubkey, amount_base: u64) -> Instruction {
    system_instruction::transfer(from, to, amount_base)
}

/// Validate reference placement in a built instruction (debug/test only)
///
/// The reference must be the final meta, read-only, non-signer; the fallback
/// monitor path depends on it being present.
#[cfg(debug_assertions)]
pub fn sanity_check_reference_meta(ix: &Instruction, reference: &Pubkey) -> Result<()> {
    use crate::errors::OrchestratorError;

    let last = ix
        .accounts
        .last()
        .ok_or_else(|| OrchestratorError::internal("instruction has no account metas"))?;
    if last.pubkey != *reference {
        return Err(OrchestratorError::internal(format!(
            "reference meta missing: expected {} in final position, got {}",
            reference, last.pubkey
        )));
    }
    if last.is_writable || last.is_signer {
        return Err(OrchestratorError::internal(
            "reference meta must be read-only and non-signer",
        ));
    }
    Ok(())
}

/// No-op in release builds
#[cfg(not(debug_assertions))]
#[inline]
pub fn sanity_check_reference_meta(_ix: &Instruction, _reference: &Pubkey) -> Result<()> {
    Ok(())
}
