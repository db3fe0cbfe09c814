use std::path::Path;

use eyre::WrapErr;
use tokio::io::AsyncBufReadExt;

use crate::{
    constants::PRIVATE_KEYS_FILE_PATH,
    credential::{parse_private_keys, Credential},
};

pub async fn read_file_lines(path: impl AsRef<Path>) -> eyre::Result<Vec<String>> {
    let file = tokio::fs::read(path).await?;
    let mut lines = file.lines();

    let mut contents = vec![];
    while let Some(line) = lines.next_line().await? {
        contents.push(line);
    }

    Ok(contents)
}

pub async fn read_private_keys_from(path: impl AsRef<Path>) -> eyre::Result<Vec<Credential>> {
    let path = path.as_ref();
    let lines = read_file_lines(path)
        .await
        .wrap_err_with(|| format!("Failed to read private keys from {}", path.display()))?;

    Ok(parse_private_keys(lines))
}

pub async fn read_private_keys() -> eyre::Result<Vec<Credential>> {
    read_private_keys_from(PRIVATE_KEYS_FILE_PATH).await
}
