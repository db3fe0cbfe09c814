use alloy::{
    network::Ethereum,
    primitives::{Address, U256},
    providers::{ProviderBuilder, RootProvider},
    rpc::client::ClientBuilder,
    sol,
    transports::http::{Client, Http},
};
use alloy_chains::NamedChain;
use eyre::WrapErr;
use url::Url;

use crate::{config::Config, constants::CLAIM_CONTRACT_ADDRESS};

sol! {
    #[sol(rpc)]
    contract ZoraClaim {
        mapping(address account => uint256 amount) public allocations;
        mapping(address account => bool claimed) public hasClaimed;

        function claim(address _claimTo) external;
    }
}

pub type HttpProvider = RootProvider<Http<Client>, Ethereum>;

/// Builds a fresh provider for every call, nothing is shared between wallets.
#[derive(Clone, Debug)]
pub struct ProviderFactory {
    config: Config,
}

impl ProviderFactory {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn provider(&self) -> eyre::Result<HttpProvider> {
        Ok(Self::connect(self.config.rpc_url()?))
    }

    pub fn connect(url: Url) -> HttpProvider {
        let client = ClientBuilder::default().transport(Http::new(url), false);

        ProviderBuilder::new()
            .with_chain(NamedChain::Base)
            .on_provider(RootProvider::new(client))
    }
}

/// Read-only view of the claim contract.
pub trait Distributor {
    fn contract_address(&self) -> Address;

    async fn has_claimed(&self, account: Address) -> eyre::Result<bool>;

    async fn allocation(&self, account: Address) -> eyre::Result<U256>;
}

#[derive(Clone, Debug)]
pub struct RpcDistributor {
    providers: ProviderFactory,
}

impl RpcDistributor {
    pub fn new(providers: ProviderFactory) -> Self {
        Self { providers }
    }
}

impl Distributor for RpcDistributor {
    fn contract_address(&self) -> Address {
        CLAIM_CONTRACT_ADDRESS
    }

    async fn has_claimed(&self, account: Address) -> eyre::Result<bool> {
        let contract = ZoraClaim::new(CLAIM_CONTRACT_ADDRESS, self.providers.provider()?);
        let claimed = contract
            .hasClaimed(account)
            .call()
            .await
            .wrap_err("Failed to query hasClaimed")?
            .claimed;

        tracing::debug!("hasClaimed({account}) = {claimed}");
        Ok(claimed)
    }

    async fn allocation(&self, account: Address) -> eyre::Result<U256> {
        let contract = ZoraClaim::new(CLAIM_CONTRACT_ADDRESS, self.providers.provider()?);
        let amount = contract
            .allocations(account)
            .call()
            .await
            .wrap_err("Failed to query allocations")?
            .amount;

        tracing::debug!("allocations({account}) = {amount}");
        Ok(amount)
    }
}
