//! Asset-creation transaction building and canonical encoding.
//!
//! # Responsibilities
//! - Validate asset parameters against protocol limits
//! - Build the transaction against suggested network parameters
//! - Compute the fee from the estimated signed size
//! - Produce the canonical MessagePack encoding and transaction id
//!
//! # Encoding
//! Maps are written with keys in lexicographic order and zero values
//! omitted. Struct fields below are declared in that order; do not reorder.

use data_encoding::BASE32_NOPAD;
use serde::Serialize;
use sha2::{Digest, Sha512_256};
use thiserror::Error;

use crate::blockchain::address::Address;
use crate::blockchain::types::SuggestedParams;

/// Transaction type tag for asset configuration.
pub const ASSET_CONFIG_TYPE: &str = "acfg";

/// Domain separation prefix for transaction signing and ids.
const TX_PREFIX: &[u8] = b"TX";

/// Bytes a 64-byte signature adds around the encoded transaction.
const SIGNATURE_ENVELOPE_LEN: u64 = 75;

/// Extra envelope bytes for the `sgnr` entry of a rekeyed sender.
const AUTH_ADDRESS_ENTRY_LEN: u64 = 39;

pub const MAX_UNIT_NAME_LEN: usize = 8;
pub const MAX_ASSET_NAME_LEN: usize = 32;
pub const MAX_URL_LEN: usize = 96;
pub const MAX_DECIMALS: u32 = 19;
pub const METADATA_HASH_LEN: usize = 32;

/// Errors raised while building or encoding a transaction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransactionError {
    #[error("Asset total supply must be greater than zero")]
    ZeroTotal,

    #[error("Asset decimals {0} exceeds maximum {max}", max = MAX_DECIMALS)]
    TooManyDecimals(u32),

    #[error("Asset {field} is {len} bytes, maximum is {max}")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("Encoding failed: {0}")]
    Encode(String),
}

/// Result type for transaction operations.
pub type TransactionResult<T> = Result<T, TransactionError>;

/// Parameters of the asset being created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetParams {
    pub total: u64,
    pub decimals: u32,
    pub default_frozen: bool,
    pub manager: Address,
    pub reserve: Address,
    pub freeze: Address,
    pub clawback: Address,
    pub unit_name: String,
    pub asset_name: String,
    pub url: String,
    pub metadata_hash: Option<[u8; METADATA_HASH_LEN]>,
}

impl AssetParams {
    /// Check the parameters against protocol limits.
    pub fn validate(&self) -> TransactionResult<()> {
        if self.total == 0 {
            return Err(TransactionError::ZeroTotal);
        }
        if self.decimals > MAX_DECIMALS {
            return Err(TransactionError::TooManyDecimals(self.decimals));
        }
        check_len("unit name", &self.unit_name, MAX_UNIT_NAME_LEN)?;
        check_len("asset name", &self.asset_name, MAX_ASSET_NAME_LEN)?;
        check_len("url", &self.url, MAX_URL_LEN)?;
        Ok(())
    }
}

fn check_len(field: &'static str, value: &str, max: usize) -> TransactionResult<()> {
    if value.len() > max {
        return Err(TransactionError::FieldTooLong {
            field,
            len: value.len(),
            max,
        });
    }
    Ok(())
}

/// An unsigned asset-creation transaction.
///
/// Built once by [`make_asset_create_txn`] and consumed by a signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    sender: Address,
    fee: u64,
    first_valid: u64,
    last_valid: u64,
    genesis_id: String,
    genesis_hash: [u8; 32],
    note: Option<Vec<u8>>,
    asset_params: AssetParams,
}

impl Transaction {
    pub fn sender(&self) -> Address {
        self.sender
    }

    pub fn fee(&self) -> u64 {
        self.fee
    }

    pub fn first_valid(&self) -> u64 {
        self.first_valid
    }

    pub fn last_valid(&self) -> u64 {
        self.last_valid
    }

    pub fn genesis_id(&self) -> &str {
        &self.genesis_id
    }

    pub fn note(&self) -> Option<&[u8]> {
        self.note.as_deref()
    }

    pub fn asset_params(&self) -> &AssetParams {
        &self.asset_params
    }

    fn wire(&self) -> TransactionWire<'_> {
        let p = &self.asset_params;
        TransactionWire {
            apar: AssetParamsWire {
                am: p.metadata_hash.as_ref().map(|h| &h[..]),
                an: &p.asset_name,
                au: &p.url,
                c: p.clawback,
                dc: p.decimals,
                df: p.default_frozen,
                f: p.freeze,
                m: p.manager,
                r: p.reserve,
                t: p.total,
                un: &p.unit_name,
            },
            fee: self.fee,
            fv: self.first_valid,
            gen: &self.genesis_id,
            gh: &self.genesis_hash[..],
            lv: self.last_valid,
            note: self.note.as_deref().filter(|n| !n.is_empty()),
            snd: self.sender,
            tx_type: ASSET_CONFIG_TYPE,
        }
    }

    /// Canonical MessagePack encoding of the transaction.
    pub fn encode(&self) -> TransactionResult<Vec<u8>> {
        rmp_serde::to_vec_named(&self.wire()).map_err(|e| TransactionError::Encode(e.to_string()))
    }

    /// The bytes an account signs: `"TX" || encode()`.
    pub fn bytes_to_sign(&self) -> TransactionResult<Vec<u8>> {
        let encoded = self.encode()?;
        let mut buf = Vec::with_capacity(TX_PREFIX.len() + encoded.len());
        buf.extend_from_slice(TX_PREFIX);
        buf.extend_from_slice(&encoded);
        Ok(buf)
    }

    /// Transaction id: base32 of SHA-512/256 over the signing bytes.
    pub fn id(&self) -> TransactionResult<String> {
        let digest = Sha512_256::digest(self.bytes_to_sign()?);
        Ok(BASE32_NOPAD.encode(&digest))
    }

    /// Encode the signed envelope around this transaction.
    ///
    /// `auth_address` is set when the signing key is not the sender's.
    pub fn encode_signed(
        &self,
        signature: &[u8; 64],
        auth_address: Option<Address>,
    ) -> TransactionResult<Vec<u8>> {
        let envelope = SignedTransactionWire {
            sgnr: auth_address,
            sig: &signature[..],
            txn: self.wire(),
        };
        rmp_serde::to_vec_named(&envelope).map_err(|e| TransactionError::Encode(e.to_string()))
    }
}

/// A signed transaction ready for broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// Id of the transaction that was signed.
    pub tx_id: String,
    /// Encoded signed envelope, submitted as-is.
    pub bytes: Vec<u8>,
}

/// Build an asset-creation transaction signed by the sender's own key.
///
/// The fee is the larger of the node's minimum fee and the per-byte fee
/// times the estimated signed size.
pub fn make_asset_create_txn(
    sender: Address,
    note: Option<Vec<u8>>,
    params: &SuggestedParams,
    asset_params: AssetParams,
) -> TransactionResult<Transaction> {
    make_asset_create_txn_with_signer(sender, sender, note, params, asset_params)
}

/// Build an asset-creation transaction that `signer` will sign.
///
/// When `signer` differs from `sender` the size estimate includes the
/// auth-address entry of the signed envelope.
pub fn make_asset_create_txn_with_signer(
    sender: Address,
    signer: Address,
    note: Option<Vec<u8>>,
    params: &SuggestedParams,
    asset_params: AssetParams,
) -> TransactionResult<Transaction> {
    asset_params.validate()?;

    let mut txn = Transaction {
        sender,
        fee: params.fee_per_byte,
        first_valid: params.first_valid,
        last_valid: params.last_valid,
        genesis_id: params.genesis_id.clone(),
        genesis_hash: params.genesis_hash,
        note: note.filter(|n| !n.is_empty()),
        asset_params,
    };

    let mut estimated_size = txn.encode()?.len() as u64 + SIGNATURE_ENVELOPE_LEN;
    if signer != sender {
        estimated_size += AUTH_ADDRESS_ENTRY_LEN;
    }
    txn.fee = params
        .fee_per_byte
        .saturating_mul(estimated_size)
        .max(params.min_fee);

    tracing::debug!(
        sender = %txn.sender,
        fee = txn.fee,
        first_valid = txn.first_valid,
        last_valid = txn.last_valid,
        estimated_size,
        "Built asset-creation transaction"
    );

    Ok(txn)
}

fn is_zero_u64(v: &u64) -> bool {
    *v == 0
}

fn is_zero_u32(v: &u32) -> bool {
    *v == 0
}

fn is_false(v: &bool) -> bool {
    !*v
}

fn is_empty_str(v: &&str) -> bool {
    v.is_empty()
}

#[derive(Serialize)]
struct AssetParamsWire<'a> {
    #[serde(with = "serde_bytes", skip_serializing_if = "Option::is_none")]
    am: Option<&'a [u8]>,
    #[serde(skip_serializing_if = "is_empty_str")]
    an: &'a str,
    #[serde(skip_serializing_if = "is_empty_str")]
    au: &'a str,
    #[serde(skip_serializing_if = "Address::is_zero")]
    c: Address,
    #[serde(skip_serializing_if = "is_zero_u32")]
    dc: u32,
    #[serde(skip_serializing_if = "is_false")]
    df: bool,
    #[serde(skip_serializing_if = "Address::is_zero")]
    f: Address,
    #[serde(skip_serializing_if = "Address::is_zero")]
    m: Address,
    #[serde(skip_serializing_if = "Address::is_zero")]
    r: Address,
    #[serde(skip_serializing_if = "is_zero_u64")]
    t: u64,
    #[serde(skip_serializing_if = "is_empty_str")]
    un: &'a str,
}

#[derive(Serialize)]
struct TransactionWire<'a> {
    apar: AssetParamsWire<'a>,
    #[serde(skip_serializing_if = "is_zero_u64")]
    fee: u64,
    #[serde(skip_serializing_if = "is_zero_u64")]
    fv: u64,
    #[serde(skip_serializing_if = "is_empty_str")]
    gen: &'a str,
    #[serde(with = "serde_bytes")]
    gh: &'a [u8],
    #[serde(skip_serializing_if = "is_zero_u64")]
    lv: u64,
    #[serde(with = "serde_bytes", skip_serializing_if = "Option::is_none")]
    note: Option<&'a [u8]>,
    snd: Address,
    #[serde(rename = "type")]
    tx_type: &'a str,
}

#[derive(Serialize)]
struct SignedTransactionWire<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    sgnr: Option<Address>,
    #[serde(with = "serde_bytes")]
    sig: &'a [u8],
    txn: TransactionWire<'a>,
}
