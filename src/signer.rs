use std::str::FromStr;

use alloy::{
    network::{Ethereum, EthereumWallet, NetworkWallet, TransactionBuilder},
    primitives::{Address, Bytes, TxHash, U256},
    providers::Provider,
    rpc::types::{TransactionReceipt, TransactionRequest},
    signers::local::PrivateKeySigner,
    transports::Transport,
};
use eyre::WrapErr;
use url::Url;

use crate::{
    constants::{BASE_CHAIN_ID, BASE_EXPLORER_URL},
    contract::{HttpProvider, ProviderFactory},
    credential::Credential,
};

/// Capability to submit a transaction on behalf of one account.
pub trait ClaimSigner {
    fn address(&self) -> Address;

    /// Chain the signer will sign transactions for.
    async fn chain_id(&self) -> eyre::Result<u64>;

    /// Submits a call and waits for it to be mined. A reverted receipt is an error.
    async fn send_transaction(&self, to: Address, input: Bytes) -> eyre::Result<TxHash>;
}

/// Turns a credential into a signer.
pub trait SignerSource {
    type Signer: ClaimSigner;

    async fn signer(&self, credential: &Credential) -> eyre::Result<Self::Signer>;
}

pub async fn send_transaction<P, T, W>(
    provider: &P,
    wallet: &W,
    to: Address,
    input: Bytes,
) -> eyre::Result<TxHash>
where
    P: Provider<T, Ethereum>,
    T: Transport + Clone,
    W: NetworkWallet<Ethereum>,
{
    let eip1559_fees = provider.estimate_eip1559_fees(None).await?;
    let from = wallet.default_signer_address();

    let nonce = provider.get_transaction_count(from).await?;

    let mut tx_request = TransactionRequest::default()
        .with_max_fee_per_gas(eip1559_fees.max_fee_per_gas)
        .with_max_priority_fee_per_gas(eip1559_fees.max_priority_fee_per_gas)
        .with_to(to)
        .with_value(U256::ZERO)
        .with_nonce(nonce)
        .with_chain_id(BASE_CHAIN_ID)
        .with_from(from)
        .with_input(input);

    let gas_limit = provider
        .estimate_gas(&tx_request)
        .await
        .wrap_err("Gas estimation failed")?;
    tx_request.set_gas_limit(gas_limit);

    let signed_transaction = tx_request.build(wallet).await?;
    let pending_tx = provider.send_tx_envelope(signed_transaction).await?;
    let receipt = pending_tx.get_receipt().await?;

    confirmed(receipt)
}

fn confirmed(receipt: TransactionReceipt) -> eyre::Result<TxHash> {
    let url = format!("{BASE_EXPLORER_URL}/tx/{}", receipt.transaction_hash);

    if !receipt.status() {
        tracing::error!("Transaction failed: {}", url);
        eyre::bail!("Transaction reverted: {url}");
    }

    tracing::info!("Transaction successful: {}", url);
    Ok(receipt.transaction_hash)
}

/// Holds a raw key for as long as the signer lives.
pub struct LocalSigner {
    wallet: EthereumWallet,
    address: Address,
    providers: ProviderFactory,
}

impl LocalSigner {
    pub fn from_private_key(key: &str, providers: ProviderFactory) -> eyre::Result<Self> {
        let signer = PrivateKeySigner::from_str(key).wrap_err("Invalid private key")?;
        let address = signer.address();

        Ok(Self {
            wallet: EthereumWallet::new(signer),
            address,
            providers,
        })
    }
}

impl ClaimSigner for LocalSigner {
    fn address(&self) -> Address {
        self.address
    }

    // the chain id is part of what gets signed
    async fn chain_id(&self) -> eyre::Result<u64> {
        Ok(BASE_CHAIN_ID)
    }

    async fn send_transaction(&self, to: Address, input: Bytes) -> eyre::Result<TxHash> {
        let provider = self.providers.provider()?;
        send_transaction(&provider, &self.wallet, to, input).await
    }
}

/// Delegates signing to an external wallet reached over JSON-RPC
/// (`eth_accounts` / `eth_sendTransaction`).
pub struct RemoteSigner {
    provider: HttpProvider,
    address: Address,
}

impl RemoteSigner {
    pub async fn connect(session: Url) -> eyre::Result<Self> {
        let provider = ProviderFactory::connect(session);

        let address = provider
            .get_accounts()
            .await
            .wrap_err("Failed to read session accounts")?
            .into_iter()
            .next()
            .ok_or_else(|| eyre::eyre!("Session exposes no account"))?;

        Ok(Self { provider, address })
    }
}

impl ClaimSigner for RemoteSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn chain_id(&self) -> eyre::Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .wrap_err("Failed to query session chain id")
    }

    async fn send_transaction(&self, to: Address, input: Bytes) -> eyre::Result<TxHash> {
        let tx_request = TransactionRequest::default()
            .with_from(self.address)
            .with_to(to)
            .with_chain_id(BASE_CHAIN_ID)
            .with_input(input);

        let pending_tx = self
            .provider
            .send_transaction(tx_request)
            .await
            .wrap_err("Session did not sign the transaction")?;
        let receipt = pending_tx.get_receipt().await?;

        confirmed(receipt)
    }
}

pub enum WalletSigner {
    Local(LocalSigner),
    Remote(RemoteSigner),
}

impl ClaimSigner for WalletSigner {
    fn address(&self) -> Address {
        match self {
            WalletSigner::Local(signer) => signer.address(),
            WalletSigner::Remote(signer) => signer.address(),
        }
    }

    async fn chain_id(&self) -> eyre::Result<u64> {
        match self {
            WalletSigner::Local(signer) => signer.chain_id().await,
            WalletSigner::Remote(signer) => signer.chain_id().await,
        }
    }

    async fn send_transaction(&self, to: Address, input: Bytes) -> eyre::Result<TxHash> {
        match self {
            WalletSigner::Local(signer) => signer.send_transaction(to, input).await,
            WalletSigner::Remote(signer) => signer.send_transaction(to, input).await,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RpcSigners {
    providers: ProviderFactory,
}

impl RpcSigners {
    pub fn new(providers: ProviderFactory) -> Self {
        Self { providers }
    }
}

impl SignerSource for RpcSigners {
    type Signer = WalletSigner;

    async fn signer(&self, credential: &Credential) -> eyre::Result<WalletSigner> {
        match credential {
            Credential::PrivateKey(key) => Ok(WalletSigner::Local(LocalSigner::from_private_key(
                key,
                self.providers.clone(),
            )?)),
            Credential::Session(url) => Ok(WalletSigner::Remote(
                RemoteSigner::connect(url.clone()).await?,
            )),
        }
    }
}
