//! Wallet management and transaction signing.
//!
//! # Security
//! - The mnemonic is loaded ONLY from an environment variable
//! - Keys are never logged or serialized
//! - The seed is held by `ed25519-dalek`, which zeroizes it on drop

use ed25519_dalek::{Signer, SigningKey};
use thiserror::Error;

use crate::blockchain::address::Address;
use crate::blockchain::mnemonic;
use crate::blockchain::transaction::{SignedTransaction, Transaction, TransactionError};

/// Environment variable name for the account mnemonic.
pub const MNEMONIC_ENV_VAR: &str = "ASA_MINT_MNEMONIC";

/// Errors that can occur while loading keys or signing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WalletError {
    #[error("Mnemonic must have 25 words, got {0}")]
    MnemonicLength(usize),

    #[error("Mnemonic word {position} is not in the word list")]
    UnknownWord { position: usize },

    #[error("Mnemonic padding bits are not zero")]
    MnemonicPadding,

    #[error("Mnemonic checksum word does not match")]
    MnemonicChecksum,

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Environment variable {0} not set")]
    MissingEnv(&'static str),

    #[error("Signing failed: {0}")]
    Signing(#[from] TransactionError),
}

/// Result type for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;

/// Anything that can turn an unsigned transaction into a signed one.
pub trait TransactionSigner {
    /// Address of the signing key.
    fn address(&self) -> Address;

    /// Sign `txn`, consuming it.
    fn sign_transaction(&self, txn: Transaction) -> WalletResult<SignedTransaction>;
}

/// An Ed25519 account key.
pub struct Wallet {
    signing_key: SigningKey,
    address: Address,
}

impl Wallet {
    /// Recover a wallet from a 25-word mnemonic.
    ///
    /// # Security
    /// The phrase is parsed and dropped. It is never logged.
    pub fn from_mnemonic(phrase: &str) -> WalletResult<Self> {
        let seed = mnemonic::to_key(phrase)?;
        let wallet = Self::from_seed(&seed);

        tracing::info!(address = %wallet.address, "Wallet recovered from mnemonic");
        Ok(wallet)
    }

    /// Load wallet from environment variable.
    ///
    /// Reads `ASA_MINT_MNEMONIC` from environment.
    pub fn from_env() -> WalletResult<Self> {
        let phrase =
            std::env::var(MNEMONIC_ENV_VAR).map_err(|_| WalletError::MissingEnv(MNEMONIC_ENV_VAR))?;
        Self::from_mnemonic(&phrase)
    }

    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        let address = Address::from_public_key(signing_key.verifying_key().to_bytes());
        Self {
            signing_key,
            address,
        }
    }

    /// The wallet's mnemonic, for backup display only.
    pub fn mnemonic(&self) -> String {
        mnemonic::from_key(&self.signing_key.to_bytes())
    }

    /// Sign raw bytes with the account key.
    pub fn sign_bytes(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl TransactionSigner for Wallet {
    fn address(&self) -> Address {
        self.address
    }

    fn sign_transaction(&self, txn: Transaction) -> WalletResult<SignedTransaction> {
        let tx_id = txn.id()?;
        let signature = self.sign_bytes(&txn.bytes_to_sign()?);

        // Rekeyed accounts sign for a sender other than their own address.
        let auth_address = (txn.sender() != self.address).then_some(self.address);
        let bytes = txn.encode_signed(&signature, auth_address)?;

        tracing::debug!(
            tx_id = %tx_id,
            sender = %txn.sender(),
            rekeyed = auth_address.is_some(),
            size = bytes.len(),
            "Transaction signed"
        );

        Ok(SignedTransaction { tx_id, bytes })
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
