use tokio::sync::broadcast::{self, error::RecvError};

use crate::{
    board::BoardEvent,
    constants::{BASE_EXPLORER_URL, TOKEN_SYMBOL},
    record::{WalletRecord, WalletStatus},
};

const ERROR_PREVIEW_LEN: usize = 30;

/// One human readable line per record.
pub fn render_record(index: usize, record: &WalletRecord) -> String {
    let detail = match &record.status {
        WalletStatus::Checking | WalletStatus::NoAllocation => "-".to_owned(),
        WalletStatus::Eligible { allocation } => format!("{allocation} {TOKEN_SYMBOL}"),
        WalletStatus::Claimed { tx_hash: Some(hash) } => format!("{BASE_EXPLORER_URL}/tx/{hash}"),
        WalletStatus::Claimed { tx_hash: None } => "-".to_owned(),
        WalletStatus::Error { message } => format!("Error: {}", preview(message)),
    };

    format!(
        "#{:<3} {:<42} {:<13} {}",
        index + 1,
        record.address,
        record.status.label(),
        detail
    )
}

fn preview(message: &str) -> String {
    let head: String = message.chars().take(ERROR_PREVIEW_LEN).collect();
    format!("{head}...")
}

/// Logs every board event until the board goes away.
pub async fn log_updates(mut events: broadcast::Receiver<BoardEvent>) {
    loop {
        match events.recv().await {
            Ok(BoardEvent::Reset { len }) => tracing::info!("Tracking {len} wallets"),
            Ok(BoardEvent::Updated { index, record }) => {
                tracing::info!("{}", render_record(index, &record))
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!("Skipped {skipped} board updates")
            }
            Err(RecvError::Closed) => break,
        }
    }
}

pub fn summary_json(records: &[WalletRecord]) -> eyre::Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}
