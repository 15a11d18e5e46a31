//! On-chain purchase orchestration for a Solana-backed storefront
//!
//! This library is the transaction side of the storefront: deterministic
//! derivation of the program-owned addresses (store, escrow, receipts,
//! warranties), construction of unsigned purchase and transfer transactions,
//! submission through a wallet signer, and bounded confirmation monitoring
//! with a closed failure taxonomy for the UI.
//!
//! ## Architecture
//!
//! - **pda**: deterministic address derivation over fixed seed tags
//! - **units**: display-unit / base-unit conversion with floor semantics
//! - **tx**: payload validation and unsigned transaction assembly
//! - **submitter**: one sign request, one broadcast, no hidden retries
//! - **monitor**: bounded polling to exactly one terminal status
//! - **classify**: total mapping from errors to user-facing kinds
//! - **wallet** / **rpc**: capability traits for the signer and the node
//! - **context** / **config**: explicit collaborator wiring, no globals
//!
//! ## Flow
//!
//! Within one attempt the steps run strictly build → sign → submit →
//! monitor. Attempts are independent: no component keeps cross-attempt
//! state, and conflicting effects are arbitrated by the ledger itself.
//!
//! ```no_run
//! use shopchain::{
//!     classify::classify,
//!     config::OrchestratorConfig,
//!     context::ChainContext,
//!     monitor::{monitor, MonitorOptions, MonitorTarget},
//!     submitter::submit,
//!     tx::{PurchaseRequest, TxBuilder},
//!     wallet::{KeypairSigner, WalletSigner},
//! };
//! use solana_sdk::pubkey::Pubkey;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = OrchestratorConfig::from_file("shopchain.toml")?;
//! let signer = Arc::new(KeypairSigner::from_file("buyer.json")?);
//! signer.connect().await?;
//! let ctx = ChainContext::from_config(&config, signer)?;
//!
//! let request = PurchaseRequest {
//!     buyer: ctx.signer().pubkey()?,
//!     store_owner: "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin".parse()?,
//!     product_id: "watch-042".to_string(),
//!     amount: 2.5,
//!     reference: Pubkey::new_unique(),
//! };
//!
//! let unsigned = TxBuilder::new(ctx.clone()).build_purchase(&request).await?;
//! match submit(&ctx, &unsigned).await {
//!     Ok(handle) => {
//!         let status = monitor(
//!             ctx.rpc(),
//!             MonitorTarget::Handle(handle.signature),
//!             MonitorOptions::default(),
//!         )
//!         .await;
//!         println!("purchase resolved: {status:?}");
//!     }
//!     Err(e) => println!("{}", classify(&e).message),
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unused_imports)]
#![deny(unused_mut)]
#![warn(dead_code)]
#![warn(unused_must_use)]

pub mod classify;
pub mod config;
pub mod context;
pub mod errors;
pub mod monitor;
pub mod pda;
pub mod rpc;
pub mod submitter;
pub mod tx;
pub mod types;
pub mod units;
pub mod wallet;

// Re-export the types callers touch on every flow
pub use classify::{classify, ClassifiedError, FailureKind};
pub use context::ChainContext;
pub use errors::{OrchestratorError, Result};
pub use monitor::{monitor, MonitorOptions, MonitorTarget};
pub use submitter::submit;
pub use tx::{PurchaseRequest, TransferRequest, TxBuilder, UnsignedTransaction};
pub use types::{Network, SubmissionHandle, TransactionStatus};

// Re-export commonly used ledger types
pub use solana_sdk::{pubkey::Pubkey, signature::Signature};
