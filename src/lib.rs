pub mod batch;
pub mod board;
pub mod claimer;
pub mod config;
pub mod constants;
pub mod contract;
pub mod credential;
pub mod logger;
pub mod record;
pub mod report;
pub mod signer;
#[cfg(test)]
mod testing;
pub mod utils;
