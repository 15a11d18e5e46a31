//! Wallet signer capability interface
//!
//! The orchestration layer never touches private key material. It talks to a
//! [`WalletSigner`]: any adapter (browser-extension bridge, hardware wallet,
//! local keypair) implements the trait and is selected explicitly by the
//! caller through the context, never sniffed from ambient globals.
//!
//! [`KeypairSigner`] is the local, file-backed adapter used by headless
//! callers and tests.

use crate::errors::{OrchestratorError, Result};
use crate::tx::UnsignedTransaction;
use async_trait::async_trait;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::VersionedTransaction,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Capability interface every wallet adapter implements
///
/// Signing may require human interaction in the wallet UI and can suspend
/// until the user responds; callers must treat `sign_transaction` as an
/// arbitrarily long await point.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Establish the wallet session
    async fn connect(&self) -> Result<()>;

    /// Tear down the wallet session
    async fn disconnect(&self) -> Result<()>;

    /// Whether a session is currently active
    fn is_connected(&self) -> bool;

    /// Public key of the active account
    ///
    /// Fails with `WalletNotConnected` when no session is active.
    fn pubkey(&self) -> Result<Pubkey>;

    /// Request one signature over the unsigned transaction
    ///
    /// A decline or adapter fault surfaces as `SignerRejected` carrying the
    /// adapter's raw message.
    async fn sign_transaction(&self, unsigned: &UnsignedTransaction)
        -> Result<VersionedTransaction>;
}

/// Local keypair-backed signer
///
/// Loads the two on-disk formats in circulation: raw 64-byte files and the
/// JSON byte-array format. All-zero keys are rejected outright.
#[derive(Debug)]
pub struct KeypairSigner {
    keypair: Arc<Keypair>,
    connected: AtomicBool,
}

impl KeypairSigner {
    /// Load a signer from a keypair file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        use anyhow::Context;

        let keypair_bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read keypair file: {}", path))?;

        let keypair = if keypair_bytes.len() == 64 {
            // Raw bytes format - validate before conversion
            if keypair_bytes.iter().all(|&b| b == 0) {
                anyhow::bail!("Invalid keypair: all-zero key rejected");
            }
            Keypair::try_from(keypair_bytes.as_slice()).context("Invalid keypair bytes")?
        } else {
            // JSON format
            let json: Vec<u8> = serde_json::from_slice(&keypair_bytes)
                .context("Failed to parse keypair JSON")?;
            if json.len() != 64 {
                anyhow::bail!(
                    "Invalid keypair length: expected 64 bytes, got {}",
                    json.len()
                );
            }
            if json.iter().all(|&b| b == 0) {
                anyhow::bail!("Invalid keypair: all-zero key rejected");
            }
            Keypair::try_from(json.as_slice()).context("Invalid keypair from JSON")?
        };

        Ok(Self::from_keypair(keypair))
    }

    /// Wrap an in-memory keypair
    pub fn from_keypair(keypair: Keypair) -> Self {
        Self {
            keypair: Arc::new(keypair),
            connected: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl WalletSigner for KeypairSigner {
    async fn connect(&self) -> Result<()> {
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn pubkey(&self) -> Result<Pubkey> {
        if !self.is_connected() {
            return Err(OrchestratorError::WalletNotConnected);
        }
        Ok(self.keypair.pubkey())
    }

    async fn sign_transaction(
        &self,
        unsigned: &UnsignedTransaction,
    ) -> Result<VersionedTransaction> {
        if !self.is_connected() {
            return Err(OrchestratorError::WalletNotConnected);
        }
        VersionedTransaction::try_new(unsigned.message.clone(), &[&*self.keypair])
            .map_err(|e| OrchestratorError::SignerRejected(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[tokio::test]
    async fn test_connect_lifecycle() {
        let signer = KeypairSigner::from_keypair(Keypair::new());
        assert!(!signer.is_connected());
        assert!(matches!(
            signer.pubkey(),
            Err(OrchestratorError::WalletNotConnected)
        ));

        signer.connect().await.unwrap();
        assert!(signer.is_connected());
        signer.pubkey().unwrap();

        signer.disconnect().await.unwrap();
        assert!(!signer.is_connected());
    }

    #[test]
    fn test_from_file_json_format() {
        let keypair = Keypair::new();
        let json = serde_json::to_vec(&keypair.to_bytes().to_vec()).unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&json).unwrap();

        let signer = KeypairSigner::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(signer.keypair.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_from_file_raw_format() {
        let keypair = Keypair::new();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&keypair.to_bytes()).unwrap();

        let signer = KeypairSigner::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(signer.keypair.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_rejects_all_zero_key() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0u8; 64]).unwrap();

        let err = KeypairSigner::from_file(file.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("all-zero"));
    }
}
