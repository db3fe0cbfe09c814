use zora_claimer::{
    batch::claim_for_all, config::Config, credential::Credential, logger::init_default_logger,
    utils::read_private_keys,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<()> {
    let _guard = init_default_logger();

    let config = Config::read_default().await?;

    let mut credentials = read_private_keys().await?;
    if let Some(session) = config.session_url.clone() {
        credentials.push(Credential::Session(session));
    }

    if credentials.is_empty() {
        tracing::warn!("No wallets to check");
        return Ok(());
    }

    claim_for_all(config, credentials).await
}
