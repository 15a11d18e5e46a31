//! Deterministic program-owned address derivation
//!
//! Every account kind the storefront program owns lives behind a fixed seed
//! tag. Derivation is [`derive`] plus one thin wrapper per account kind; the
//! wrappers only pin the tag and the component order. Component order is part
//! of the on-chain program's contract — reordering produces a different
//! address that the program rejects at submission time.
//!
//! Pure functions, no I/O, safe to call concurrently.

use crate::errors::{OrchestratorError, Result};
use solana_sdk::pubkey::{Pubkey, MAX_SEEDS, MAX_SEED_LEN};

/// Closed set of seed namespace tags, byte values fixed by the program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeedTag {
    Store,
    Escrow,
    Purchase,
    LoyaltyMint,
    WatchPurchase,
    WatchWarranty,
    UserWallet,
    Product,
}

impl SeedTag {
    /// Exact ASCII bytes fed to the derivation, matching the on-chain program
    pub const fn as_bytes(&self) -> &'static [u8] {
        match self {
            Self::Store => b"store",
            Self::Escrow => b"escrow",
            Self::Purchase => b"purchase",
            Self::LoyaltyMint => b"loyalty_mint",
            Self::WatchPurchase => b"watch_purchase",
            Self::WatchWarranty => b"watch_warranty",
            Self::UserWallet => b"user_wallet",
            Self::Product => b"product",
        }
    }

    /// Tag name for error reporting and log fields
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Store => "store",
            Self::Escrow => "escrow",
            Self::Purchase => "purchase",
            Self::LoyaltyMint => "loyalty_mint",
            Self::WatchPurchase => "watch_purchase",
            Self::WatchWarranty => "watch_warranty",
            Self::UserWallet => "user_wallet",
            Self::Product => "product",
        }
    }
}

/// Derive the program-owned address for `tag` + `components`
///
/// Components are hashed in the exact order given, after the tag. Returns
/// the address together with the bump that made it valid.
///
/// # Errors
///
/// - `InvalidInput` if a component is empty, a component exceeds
///   [`MAX_SEED_LEN`] bytes, or tag + components exceed [`MAX_SEEDS`] seeds
/// - `AddressSpaceExhausted` if the bump search finds no valid address;
///   this does not happen with well-formed seeds and indicates a defect
pub fn derive(tag: SeedTag, components: &[&[u8]], program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    if components.len() + 1 > MAX_SEEDS {
        return Err(OrchestratorError::invalid_input(format!(
            "too many seed components for tag '{}': {} (max {})",
            tag.name(),
            components.len(),
            MAX_SEEDS - 1
        )));
    }
    for (idx, component) in components.iter().enumerate() {
        if component.is_empty() {
            return Err(OrchestratorError::invalid_input(format!(
                "seed component {idx} for tag '{}' is empty",
                tag.name()
            )));
        }
        if component.len() > MAX_SEED_LEN {
            return Err(OrchestratorError::invalid_input(format!(
                "seed component {idx} for tag '{}' is {} bytes (max {MAX_SEED_LEN})",
                tag.name(),
                component.len()
            )));
        }
    }

    let mut seeds: Vec<&[u8]> = Vec::with_capacity(components.len() + 1);
    seeds.push(tag.as_bytes());
    seeds.extend_from_slice(components);

    Pubkey::try_find_program_address(&seeds, program_id)
        .ok_or(OrchestratorError::AddressSpaceExhausted { tag: tag.name() })
}

/// Store account for an owner
pub fn derive_store_address(owner: &Pubkey, program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    derive(SeedTag::Store, &[owner.as_ref()], program_id)
}

/// Escrow vault for a store
pub fn derive_escrow_address(store: &Pubkey, program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    derive(SeedTag::Escrow, &[store.as_ref()], program_id)
}

/// Per-buyer purchase receipt under a store
pub fn derive_purchase_receipt(
    store: &Pubkey,
    buyer: &Pubkey,
    program_id: &Pubkey,
) -> Result<(Pubkey, u8)> {
    derive(
        SeedTag::Purchase,
        &[store.as_ref(), buyer.as_ref()],
        program_id,
    )
}

/// Loyalty point mint for a store
pub fn derive_loyalty_mint(store: &Pubkey, program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    derive(SeedTag::LoyaltyMint, &[store.as_ref()], program_id)
}

/// Watch purchase record for a buyer and product
pub fn derive_watch_purchase(
    store: &Pubkey,
    buyer: &Pubkey,
    product_id: &[u8],
    program_id: &Pubkey,
) -> Result<(Pubkey, u8)> {
    derive(
        SeedTag::WatchPurchase,
        &[store.as_ref(), buyer.as_ref(), product_id],
        program_id,
    )
}

/// Warranty record tied to one product account
pub fn derive_watch_warranty(product: &Pubkey, program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    derive(SeedTag::WatchWarranty, &[product.as_ref()], program_id)
}

/// Program-side wallet record for a user
pub fn derive_user_wallet(owner: &Pubkey, program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    derive(SeedTag::UserWallet, &[owner.as_ref()], program_id)
}

/// Product listing under a store
pub fn derive_product_address(
    store: &Pubkey,
    product_id: &[u8],
    program_id: &Pubkey,
) -> Result<(Pubkey, u8)> {
    derive(SeedTag::Product, &[store.as_ref(), product_id], program_id)
}
