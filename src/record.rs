use std::fmt;

use alloy::primitives::{utils::format_units, Address, TxHash, U256};
use serde::{Serialize, Serializer};

use crate::constants::TOKEN_DECIMALS;

/// Token amount in base units (`TOKEN_DECIMALS` decimals).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation(pub U256);

impl Allocation {
    const DISPLAY_DECIMALS: usize = 4;

    pub fn to_decimal_string(&self) -> String {
        format_units(self.0, TOKEN_DECIMALS).unwrap_or_else(|_| self.0.to_string())
    }
}

/// Rounded half-up to four decimals.
impl fmt::Display for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let step = U256::from(10u64).pow(U256::from(
            usize::from(TOKEN_DECIMALS) - Self::DISPLAY_DECIMALS,
        ));
        let rounded = (self.0 + step / U256::from(2u64)) / step;
        let scale = U256::from(10u64).pow(U256::from(Self::DISPLAY_DECIMALS));

        let whole = rounded / scale;
        let fraction = (rounded % scale).to::<u64>();

        write!(f, "{whole}.{fraction:0width$}", width = Self::DISPLAY_DECIMALS)
    }
}

impl Serialize for Allocation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_decimal_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum WalletStatus {
    Checking,
    Eligible {
        allocation: Allocation,
    },
    NoAllocation,
    Claimed {
        #[serde(rename = "txHash", skip_serializing_if = "Option::is_none")]
        tx_hash: Option<TxHash>,
    },
    Error {
        #[serde(rename = "error")]
        message: String,
    },
}

impl WalletStatus {
    pub fn label(&self) -> &'static str {
        match self {
            WalletStatus::Checking => "Checking",
            WalletStatus::Eligible { .. } => "Eligible",
            WalletStatus::NoAllocation => "No Allocation",
            WalletStatus::Claimed { .. } => "Claimed",
            WalletStatus::Error { .. } => "Error",
        }
    }

    pub fn is_checking(&self) -> bool {
        matches!(self, WalletStatus::Checking)
    }

    pub fn is_eligible(&self) -> bool {
        matches!(self, WalletStatus::Eligible { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletRecord {
    /// Checksummed address, or a placeholder label until one is derived.
    pub address: String,
    #[serde(flatten)]
    pub status: WalletStatus,
}

impl WalletRecord {
    pub fn new(address: Address, status: WalletStatus) -> Self {
        Self {
            address: address.to_string(),
            status,
        }
    }

    pub fn checking(label: impl Into<String>) -> Self {
        Self {
            address: label.into(),
            status: WalletStatus::Checking,
        }
    }

    pub fn failed(label: impl Into<String>, error: &eyre::Report) -> Self {
        Self {
            address: label.into(),
            status: WalletStatus::Error {
                message: format!("{error:#}"),
            },
        }
    }
}
