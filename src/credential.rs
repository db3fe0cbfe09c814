use std::fmt;

use url::Url;

const LABEL_PREFIX_LEN: usize = 10;

/// Something that can prove control over a wallet.
///
/// Raw keys are kept in memory only for the lifetime of the run and never
/// show up in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Hex private key, signing happens locally.
    PrivateKey(String),
    /// Endpoint of an already-authenticated wallet, signing is delegated to it.
    Session(Url),
}

impl Credential {
    /// Non-authoritative label shown until the real address is known.
    pub fn placeholder(&self) -> String {
        match self {
            Credential::PrivateKey(key) => truncate_label(key),
            Credential::Session(url) => format!("session@{}", truncate_label(url.as_str())),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::PrivateKey(_) => write!(f, "PrivateKey({})", self.placeholder()),
            Credential::Session(url) => write!(f, "Session({url})"),
        }
    }
}

fn truncate_label(value: &str) -> String {
    let prefix: String = value.chars().take(LABEL_PREFIX_LEN).collect();
    format!("{prefix}...")
}

/// One private key per line; surrounding whitespace is trimmed and blank
/// lines are dropped.
pub fn parse_private_keys<I, S>(lines: I) -> Vec<Credential>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| {
            let key = line.as_ref().trim();
            (!key.is_empty()).then(|| Credential::PrivateKey(key.to_owned()))
        })
        .collect()
}
