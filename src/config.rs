//! Settlement configuration and ring description files.
//!
//! A ring file is TOML:
//!
//! ```toml
//! owner = "0x0909090909090909090909090909090909090909"
//! fee_recipient = "0x0808080808080808080808080808080808080808"
//! wallet_split_percentage = 20
//!
//! [[orders]]
//! owner = "0x0101010101010101010101010101010101010101"
//! token_s = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"
//! token_b = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"
//! amount_s = 100
//! amount_b = 50
//! lrc_fee = 1
//! wallet = "0x0707070707070707070707070707070707070707"  # optional
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::engine::MAX_WALLET_SPLIT_PERCENTAGE;
use crate::ring::Ring;
use crate::types::{Address, Order};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid address '{0}'")]
    InvalidAddress(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Parameters shared by every ring a facilitator settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct SettlementConfig {
    /// Share of fees and splits, in percent, paid to an order's wallet
    #[serde(default)]
    pub wallet_split_percentage: u8,
}

impl SettlementConfig {
    pub fn new(wallet_split_percentage: u8) -> Result<Self, ConfigError> {
        let config = Self { wallet_split_percentage };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wallet_split_percentage > MAX_WALLET_SPLIT_PERCENTAGE {
            return Err(ConfigError::Validation(format!(
                "wallet_split_percentage must be at most {}, got {}",
                MAX_WALLET_SPLIT_PERCENTAGE, self.wallet_split_percentage
            )));
        }
        Ok(())
    }
}

/// One order entry of a ring file
#[derive(Debug, Clone, Deserialize)]
pub struct OrderEntry {
    pub owner: String,
    pub token_s: String,
    pub token_b: String,
    pub amount_s: u64,
    pub amount_b: u64,
    #[serde(default)]
    pub lrc_fee: u64,
    pub wallet: Option<String>,
    /// Externally computed order hash; content hash when absent
    pub hash: Option<String>,
}

/// A ring described in TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RingFile {
    pub owner: String,
    pub fee_recipient: String,
    #[serde(flatten)]
    pub settlement: SettlementConfig,
    pub orders: Vec<OrderEntry>,
}

impl RingFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: RingFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        file.settlement.validate()?;
        Ok(file)
    }

    /// Decode addresses and build the ring.
    pub fn into_ring(self) -> Result<Ring, ConfigError> {
        let orders = self
            .orders
            .iter()
            .map(OrderEntry::to_order)
            .collect::<Result<Vec<_>, _>>()?;

        Ring::new(orders, parse_address(&self.owner)?, parse_address(&self.fee_recipient)?)
            .map_err(|e| ConfigError::Validation(e.to_string()))
    }
}

impl OrderEntry {
    pub fn to_order(&self) -> Result<Order, ConfigError> {
        let mut order = Order::new(
            parse_address(&self.owner)?,
            parse_address(&self.token_s)?,
            parse_address(&self.token_b)?,
            self.amount_s,
            self.amount_b,
            self.lrc_fee,
        );
        if let Some(wallet) = &self.wallet {
            order = order.with_wallet(parse_address(wallet)?);
        }
        if let Some(hash) = &self.hash {
            order = order.with_hash(parse_hex_array(hash)?);
        }
        Ok(order)
    }
}

/// Parse a 20-byte address, with or without `0x` prefix
pub fn parse_address(s: &str) -> Result<Address, ConfigError> {
    parse_hex_array(s)
}

fn parse_hex_array<const N: usize>(s: &str) -> Result<[u8; N], ConfigError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    let mut out = [0u8; N];
    hex::decode_to_slice(digits, &mut out).map_err(|_| ConfigError::InvalidAddress(s.to_string()))?;
    Ok(out)
}
