//! Explicit per-call context
//!
//! Every orchestration call receives a [`ChainContext`] naming its
//! collaborators instead of reading them from ambient globals. The context is
//! cheap to clone (shared references only) and holds no per-attempt state, so
//! any number of concurrent attempts may share one.

use crate::config::OrchestratorConfig;
use crate::errors::Result;
use crate::rpc::{HttpLedgerRpc, LedgerRpc};
use crate::types::Network;
use crate::wallet::WalletSigner;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;

/// Collaborator bundle for one storefront deployment
#[derive(Clone)]
pub struct ChainContext {
    rpc: Arc<dyn LedgerRpc>,
    signer: Arc<dyn WalletSigner>,
    program_id: Pubkey,
    network: Network,
}

impl ChainContext {
    /// Assemble a context from explicit collaborators
    pub fn new(
        rpc: Arc<dyn LedgerRpc>,
        signer: Arc<dyn WalletSigner>,
        program_id: Pubkey,
        network: Network,
    ) -> Self {
        Self {
            rpc,
            signer,
            program_id,
            network,
        }
    }

    /// Build a context from validated configuration plus a signer adapter
    pub fn from_config(config: &OrchestratorConfig, signer: Arc<dyn WalletSigner>) -> Result<Self> {
        config.validate()?;
        let rpc = Arc::new(HttpLedgerRpc::new(config.rpc_endpoint(), config.rpc_timeout()));
        Ok(Self::new(
            rpc,
            signer,
            config.parsed_program_id()?,
            config.network,
        ))
    }

    /// The RPC collaborator
    pub fn rpc(&self) -> &dyn LedgerRpc {
        &*self.rpc
    }

    /// The wallet signer collaborator
    pub fn signer(&self) -> &dyn WalletSigner {
        &*self.signer
    }

    /// The storefront program namespace all derived addresses live under
    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    /// Which ledger network this context targets
    pub fn network(&self) -> Network {
        self.network
    }

    /// Balance of an account in base units
    pub async fn balance(&self, address: &Pubkey) -> Result<u64> {
        self.rpc.get_balance(address).await
    }
}

impl std::fmt::Debug for ChainContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainContext")
            .field("program_id", &self.program_id)
            .field("network", &self.network)
            .field("signer_connected", &self.signer.is_connected())
            .finish()
    }
}
