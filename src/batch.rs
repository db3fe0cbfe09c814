use std::cell::Cell;

use crate::{
    board::WalletBoard,
    claimer::ClaimEngine,
    config::Config,
    contract::{Distributor, ProviderFactory, RpcDistributor},
    credential::Credential,
    record::WalletRecord,
    report::{log_updates, summary_json},
    signer::{RpcSigners, SignerSource},
};

/// Runs the engine over a list of wallets, strictly one at a time, and keeps
/// the board in sync with every result.
pub struct BatchOrchestrator<D, S> {
    engine: ClaimEngine<D, S>,
    board: WalletBoard,
    busy: Cell<bool>,
}

impl<D, S> BatchOrchestrator<D, S>
where
    D: Distributor,
    S: SignerSource,
{
    pub fn new(engine: ClaimEngine<D, S>) -> Self {
        Self {
            engine,
            board: WalletBoard::default(),
            busy: Cell::new(false),
        }
    }

    pub fn board(&self) -> &WalletBoard {
        &self.board
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    /// Checks every credential in order. A failing wallet never stops the
    /// batch. Returns the final records.
    pub async fn submit_batch(&self, credentials: &[Credential]) -> Vec<WalletRecord> {
        if credentials.is_empty() {
            return self.board.snapshot();
        }

        if self.busy.replace(true) {
            tracing::warn!("A batch is already running, ignoring new submission");
            return self.board.snapshot();
        }

        tracing::info!("Checking {} wallets", credentials.len());
        self.board.reset(
            credentials
                .iter()
                .map(|credential| WalletRecord::checking(credential.placeholder()))
                .collect(),
        );

        for (index, credential) in credentials.iter().enumerate() {
            let record = self.engine.check(credential).await;
            self.board.replace(index, record);
        }

        self.busy.set(false);
        self.board.snapshot()
    }

    /// Claims for the wallet at `index`. Returns `None` if there is no such
    /// record or a batch is still being checked.
    ///
    /// If a new batch replaces the board while the claim is in flight, the
    /// result is returned but not written back.
    pub async fn claim_one(&self, credential: &Credential, index: usize) -> Option<WalletRecord> {
        if self.is_busy() {
            tracing::warn!("A batch is being checked, ignoring claim for wallet #{}", index + 1);
            return None;
        }

        let current = self.board.get(index)?;
        if !current.status.is_eligible() {
            tracing::debug!(
                "Claim requested for {} while {}",
                current.address,
                current.status.label()
            );
        }

        let generation = self.board.generation();
        self.board
            .replace(index, WalletRecord::checking(current.address));

        let record = self.engine.claim(credential).await;

        if self.board.generation() == generation {
            self.board.replace(index, record.clone());
        } else {
            tracing::warn!("Board was replaced while claiming for {}", record.address);
        }

        Some(record)
    }
}

/// Checks every wallet, then claims the eligible ones if configured to.
pub async fn claim_for_all(config: Config, credentials: Vec<Credential>) -> eyre::Result<()> {
    let providers = ProviderFactory::new(config.clone());
    let engine = ClaimEngine::new(
        RpcDistributor::new(providers.clone()),
        RpcSigners::new(providers),
    );
    let orchestrator = BatchOrchestrator::new(engine);
    let reporter = tokio::spawn(log_updates(orchestrator.board().events()));

    let records = orchestrator.submit_batch(&credentials).await;

    if config.claim_eligible {
        for (index, record) in records.iter().enumerate() {
            if record.status.is_eligible() {
                orchestrator.claim_one(&credentials[index], index).await;
            }
        }
    }

    let records = orchestrator.board().snapshot();
    drop(orchestrator);
    reporter.await?;

    println!("{}", summary_json(&records)?);

    Ok(())
}
