use alloy::{
    primitives::{Address, U256},
    sol_types::SolCall,
};

use crate::{
    constants::BASE_CHAIN_ID,
    contract::{Distributor, ZoraClaim::claimCall},
    credential::Credential,
    record::{Allocation, WalletRecord, WalletStatus},
    signer::{ClaimSigner, SignerSource},
};

/// Stateless: every call reads the chain afresh.
pub struct ClaimEngine<D, S> {
    distributor: D,
    signers: S,
}

impl<D, S> ClaimEngine<D, S>
where
    D: Distributor,
    S: SignerSource,
{
    pub fn new(distributor: D, signers: S) -> Self {
        Self {
            distributor,
            signers,
        }
    }

    /// Current status of the wallet behind `credential`. Never fails: errors
    /// end up in the returned record.
    pub async fn check(&self, credential: &Credential) -> WalletRecord {
        let signer = match self.signers.signer(credential).await {
            Ok(signer) => signer,
            Err(e) => {
                tracing::error!("Failed to derive wallet {}: {e:#}", credential.placeholder());
                return WalletRecord::failed(credential.placeholder(), &e);
            }
        };

        let address = signer.address();
        match self.status_of(address).await {
            Ok(status) => {
                tracing::info!("{address}: {}", status.label());
                WalletRecord::new(address, status)
            }
            Err(e) => {
                tracing::error!("Check failed for {address}: {e:#}");
                WalletRecord::failed(address.to_string(), &e)
            }
        }
    }

    /// Claims the allocation to the wallet's own address. Claimed and empty
    /// wallets are re-verified and returned without sending anything.
    pub async fn claim(&self, credential: &Credential) -> WalletRecord {
        let signer = match self.signers.signer(credential).await {
            Ok(signer) => signer,
            Err(e) => {
                tracing::error!("Failed to derive wallet {}: {e:#}", credential.placeholder());
                return WalletRecord::failed(credential.placeholder(), &e);
            }
        };

        let address = signer.address();
        match self.claim_with(&signer).await {
            Ok(status) => WalletRecord::new(address, status),
            Err(e) => {
                tracing::error!("Claim failed for {address}: {e:#}");
                WalletRecord::failed(address.to_string(), &e)
            }
        }
    }

    async fn status_of(&self, address: Address) -> eyre::Result<WalletStatus> {
        if self.distributor.has_claimed(address).await? {
            return Ok(WalletStatus::Claimed { tx_hash: None });
        }

        let amount = self.distributor.allocation(address).await?;
        if amount == U256::ZERO {
            return Ok(WalletStatus::NoAllocation);
        }

        Ok(WalletStatus::Eligible {
            allocation: Allocation(amount),
        })
    }

    async fn claim_with(&self, signer: &S::Signer) -> eyre::Result<WalletStatus> {
        let address = signer.address();

        // Chain state may have moved since the last check.
        let allocation = match self.status_of(address).await? {
            WalletStatus::Eligible { allocation } => allocation,
            status => {
                tracing::info!("{address}: {}, nothing to claim", status.label());
                return Ok(status);
            }
        };

        let chain_id = signer.chain_id().await?;
        if chain_id != BASE_CHAIN_ID {
            eyre::bail!("Wallet is on chain {chain_id}, expected {BASE_CHAIN_ID}");
        }

        tracing::info!("Claiming {allocation} for {address}");

        let input = claimCall { _claimTo: address }.abi_encode();
        let tx_hash = signer
            .send_transaction(self.distributor.contract_address(), input.into())
            .await?;

        Ok(WalletStatus::Claimed {
            tx_hash: Some(tx_hash),
        })
    }
}
