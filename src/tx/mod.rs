//! Transaction building
//!
//! Turns a validated storefront request into an unsigned transaction:
//!
//! - **instructions**: instruction construction and account-order checks
//! - **builder**: validation, address derivation, blockhash attachment
//!
//! A built transaction is single-use. Its blockhash expires quickly, so a
//! retry always goes back through the builder rather than reusing the
//! artifact.

mod builder;
mod instructions;

pub use builder::{PurchaseRequest, TransferRequest, TxBuilder, UnsignedTransaction};
pub use instructions::{
    purchase_instruction, transfer_instruction, watch_purchase_instruction, PurchaseAccounts,
    WatchPurchaseAccounts,
};
