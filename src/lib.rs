//! Algorand Standard Asset minting library

pub mod blockchain;
pub mod config;
pub mod mint;
pub mod observability;

pub use config::schema::MintConfig;
pub use mint::{MintError, Minter};
