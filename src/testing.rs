//! In-memory chain used by the engine and batch tests.

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    rc::Rc,
    str::FromStr,
};

use alloy::{
    primitives::{Address, Bytes, TxHash, U256},
    signers::local::PrivateKeySigner,
    sol_types::SolCall,
};
use eyre::WrapErr;
use url::Url;

use crate::{
    claimer::ClaimEngine,
    constants::{BASE_CHAIN_ID, CLAIM_CONTRACT_ADDRESS},
    contract::{Distributor, ZoraClaim::claimCall},
    credential::Credential,
    signer::{ClaimSigner, SignerSource},
};

pub const ONE_TOKEN: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

// well-known development keys
const KEYS: [&str; 4] = [
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
    "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
    "0x5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a",
    "0x7c852118294e51e653712a81e05800f419141751be58f605c371e15141b007a6",
];

pub fn key(index: usize) -> Credential {
    Credential::PrivateKey(KEYS[index].to_owned())
}

pub fn malformed_key() -> Credential {
    Credential::PrivateKey("0xdefinitely-not-a-key".to_owned())
}

fn address_of(index: usize) -> Address {
    PrivateKeySigner::from_str(KEYS[index]).unwrap().address()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentTransaction {
    pub hash: TxHash,
    pub from: Address,
    pub to: Address,
    pub recipient: Address,
}

#[derive(Default)]
struct ChainState {
    allocations: HashMap<Address, U256>,
    claimed: HashSet<Address>,
    unreachable: HashSet<Address>,
    reverting: HashSet<Address>,
    sessions: HashMap<Url, Address>,
    signer_chains: HashMap<Address, u64>,
    yielding: bool,
    sent: Vec<SentTransaction>,
    queries: Vec<Address>,
    on_query: Option<Rc<dyn Fn(Address)>>,
}

#[derive(Clone, Default)]
pub struct MockChain {
    state: Rc<RefCell<ChainState>>,
}

impl MockChain {
    pub fn engine(&self) -> ClaimEngine<MockChain, MockChain> {
        ClaimEngine::new(self.clone(), self.clone())
    }

    pub fn wallet(&self, index: usize) -> MockWallet {
        MockWallet {
            chain: self.clone(),
            credential: key(index),
            address: address_of(index),
        }
    }

    pub fn session(&self, index: usize) -> MockWallet {
        let url: Url = format!("http://wallet-{index}.session").parse().unwrap();
        let address = address_of(index);
        self.state
            .borrow_mut()
            .sessions
            .insert(url.clone(), address);

        MockWallet {
            chain: self.clone(),
            credential: Credential::Session(url),
            address,
        }
    }

    /// Called with the account each time `hasClaimed` is queried.
    pub fn on_query(&self, hook: impl Fn(Address) + 'static) {
        self.state.borrow_mut().on_query = Some(Rc::new(hook));
    }

    /// Every `hasClaimed` query yields to the scheduler once, so that other
    /// futures get to run in between.
    pub fn yielding(&self) {
        self.state.borrow_mut().yielding = true;
    }

    pub fn sent(&self) -> Vec<SentTransaction> {
        self.state.borrow().sent.clone()
    }

    pub fn sent_transactions(&self) -> usize {
        self.state.borrow().sent.len()
    }

    pub fn queries(&self) -> Vec<Address> {
        self.state.borrow().queries.clone()
    }

    fn reachable(&self, account: Address) -> eyre::Result<()> {
        if self.state.borrow().unreachable.contains(&account) {
            eyre::bail!("node unreachable");
        }
        Ok(())
    }
}

impl Distributor for MockChain {
    fn contract_address(&self) -> Address {
        CLAIM_CONTRACT_ADDRESS
    }

    async fn has_claimed(&self, account: Address) -> eyre::Result<bool> {
        let yielding = self.state.borrow().yielding;
        if yielding {
            tokio::task::yield_now().await;
        }

        let hook = self.state.borrow().on_query.clone();
        if let Some(hook) = hook {
            hook(account);
        }

        self.state.borrow_mut().queries.push(account);
        self.reachable(account)?;

        Ok(self.state.borrow().claimed.contains(&account))
    }

    async fn allocation(&self, account: Address) -> eyre::Result<U256> {
        self.reachable(account)?;

        Ok(self
            .state
            .borrow()
            .allocations
            .get(&account)
            .copied()
            .unwrap_or(U256::ZERO))
    }
}

impl SignerSource for MockChain {
    type Signer = MockSigner;

    async fn signer(&self, credential: &Credential) -> eyre::Result<MockSigner> {
        let address = match credential {
            Credential::PrivateKey(key) => PrivateKeySigner::from_str(key)
                .wrap_err("Invalid private key")?
                .address(),
            Credential::Session(url) => *self
                .state
                .borrow()
                .sessions
                .get(url)
                .ok_or_else(|| eyre::eyre!("Session exposes no account"))?,
        };

        Ok(MockSigner {
            chain: self.clone(),
            address,
        })
    }
}

pub struct MockSigner {
    chain: MockChain,
    address: Address,
}

impl ClaimSigner for MockSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn chain_id(&self) -> eyre::Result<u64> {
        Ok(self
            .chain
            .state
            .borrow()
            .signer_chains
            .get(&self.address)
            .copied()
            .unwrap_or(BASE_CHAIN_ID))
    }

    async fn send_transaction(&self, to: Address, input: Bytes) -> eyre::Result<TxHash> {
        let call = claimCall::abi_decode(&input, true)?;
        let mut state = self.chain.state.borrow_mut();

        if state.reverting.contains(&self.address) {
            eyre::bail!("Transaction reverted: execution reverted");
        }

        state.claimed.insert(call._claimTo);
        let hash = TxHash::with_last_byte(state.sent.len() as u8 + 1);
        state.sent.push(SentTransaction {
            hash,
            from: self.address,
            to,
            recipient: call._claimTo,
        });

        Ok(hash)
    }
}

pub struct MockWallet {
    chain: MockChain,
    credential: Credential,
    address: Address,
}

impl MockWallet {
    pub fn with_allocation(self, amount: U256) -> Self {
        self.chain
            .state
            .borrow_mut()
            .allocations
            .insert(self.address, amount);
        self
    }

    pub fn claimed(self) -> Self {
        self.chain.state.borrow_mut().claimed.insert(self.address);
        self
    }

    pub fn unreachable(self) -> Self {
        self.chain
            .state
            .borrow_mut()
            .unreachable
            .insert(self.address);
        self
    }

    pub fn reverting(self) -> Self {
        self.chain.state.borrow_mut().reverting.insert(self.address);
        self
    }

    /// The wallet's signer reports `chain_id` instead of Base.
    pub fn on_chain(self, chain_id: u64) -> Self {
        self.chain
            .state
            .borrow_mut()
            .signer_chains
            .insert(self.address, chain_id);
        self
    }

    pub fn credential(&self) -> Credential {
        self.credential.clone()
    }

    pub fn address(&self) -> Address {
        self.address
    }
}
