//! The mint flow: params → build → sign → submit → wait.

use crate::blockchain::address::Address;
use crate::blockchain::confirmation::wait_for_confirmation_with;
use crate::blockchain::node::NodeApi;
use crate::blockchain::transaction::{make_asset_create_txn_with_signer, AssetParams};
use crate::blockchain::wallet::TransactionSigner;
use crate::config::schema::{AssetConfig, MintConfig, RoleAddress};
use crate::config::validation::{parse_metadata_hash, ValidationError};
use crate::config::ConfigError;
use crate::mint::types::{MintError, MintEvent, MintOutcome, MintResult};

/// Drives a single asset creation against a node.
pub struct Minter<'a, N: ?Sized, S> {
    node: &'a N,
    signer: &'a S,
    config: &'a MintConfig,
}

impl<'a, N, S> Minter<'a, N, S>
where
    N: NodeApi + ?Sized,
    S: TransactionSigner,
{
    pub fn new(node: &'a N, signer: &'a S, config: &'a MintConfig) -> Self {
        Self {
            node,
            signer,
            config,
        }
    }

    /// Sender address: configured, or the signer's own.
    pub fn sender(&self) -> MintResult<Address> {
        match &self.config.account.sender {
            Some(sender) => Ok(Address::decode(sender)?),
            None => Ok(self.signer.address()),
        }
    }

    /// Create the asset.
    ///
    /// Calls run strictly in sequence and any failure ends the run. With
    /// `dry_run` the flow stops after signing.
    pub async fn mint<F>(&self, dry_run: bool, mut on_event: F) -> MintResult<MintOutcome>
    where
        F: FnMut(MintEvent),
    {
        let sender = self.sender()?;
        let asset_params = resolve_asset_params(&self.config.asset, sender)?;
        let note = Some(self.config.asset.note.as_bytes().to_vec());

        let params = self.node.suggested_params().await?;
        on_event(MintEvent::ParamsFetched {
            first_valid: params.first_valid,
            last_valid: params.last_valid,
        });

        let txn = make_asset_create_txn_with_signer(
            sender,
            self.signer.address(),
            note,
            &params,
            asset_params,
        )?;
        let fee = txn.fee();
        let signed = self.signer.sign_transaction(txn)?;
        on_event(MintEvent::Signed {
            tx_id: signed.tx_id.clone(),
            fee,
        });

        if dry_run {
            tracing::info!(tx_id = %signed.tx_id, "Dry run, not submitting");
            return Ok(MintOutcome {
                tx_id: signed.tx_id,
                confirmation: None,
            });
        }

        let returned = self.node.send_raw_transaction(&signed.bytes).await?;
        if returned != signed.tx_id {
            return Err(MintError::TxIdMismatch {
                signed: signed.tx_id,
                returned,
            });
        }
        tracing::info!(tx_id = %returned, sender = %sender, "Transaction submitted");
        on_event(MintEvent::Submitted {
            tx_id: returned.clone(),
        });

        let confirmation = wait_for_confirmation_with(
            self.node,
            &returned,
            &self.config.confirmation,
            |round| {
                on_event(MintEvent::WaitingForConfirmation {
                    tx_id: returned.clone(),
                    round,
                })
            },
        )
        .await?;

        Ok(MintOutcome {
            tx_id: returned,
            confirmation: Some(confirmation),
        })
    }
}

/// Turn configured asset settings into transaction parameters.
pub fn resolve_asset_params(asset: &AssetConfig, sender: Address) -> MintResult<AssetParams> {
    let resolve = |role: &RoleAddress| -> MintResult<Address> {
        match role {
            RoleAddress::Sender => Ok(sender),
            RoleAddress::Unset => Ok(Address::ZERO),
            RoleAddress::Account(address) => Ok(Address::decode(address)?),
        }
    };

    let metadata_hash = if asset.metadata_hash.is_empty() {
        None
    } else {
        let hash = parse_metadata_hash(&asset.metadata_hash).ok_or_else(|| {
            ConfigError::Validation(vec![ValidationError::MetadataHash])
        })?;
        Some(hash)
    };

    Ok(AssetParams {
        total: asset.total,
        decimals: asset.decimals,
        default_frozen: asset.default_frozen,
        manager: resolve(&asset.manager)?,
        reserve: resolve(&asset.reserve)?,
        freeze: resolve(&asset.freeze)?,
        clawback: resolve(&asset.clawback)?,
        unit_name: asset.unit_name.clone(),
        asset_name: asset.asset_name.clone(),
        url: asset.url.clone(),
        metadata_hash,
    })
}
