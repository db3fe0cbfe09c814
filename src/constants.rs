use alloy::primitives::{address, Address};

pub const CLAIM_CONTRACT_ADDRESS: Address = address!("0000000002ba96c69b95e32caab8fc38bab8b3f8");

pub const BASE_CHAIN_ID: u64 = 8453;
pub const BASE_EXPLORER_URL: &str = "https://basescan.org";

pub const TOKEN_SYMBOL: &str = "ZORA";
pub const TOKEN_DECIMALS: u8 = 18;

// FILES
pub const CONFIG_FILE_PATH: &str = "data/config.toml";
pub const PRIVATE_KEYS_FILE_PATH: &str = "data/private_keys.txt";
pub const LOGS_DIR: &str = "logs";
