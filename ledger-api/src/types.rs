use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

pub use primitive_types::{H160 as Address, U256};

/// Parses a `0x`-prefixed, 40 hex digit account id.
pub fn parse_address(raw: &str) -> Result<Address, LedgerError> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .ok_or_else(|| LedgerError::Decode(format!("address '{}' lacks 0x prefix", raw)))?;
    if digits.len() != 40 {
        return Err(LedgerError::Decode(format!(
            "address '{}' must have 40 hex digits, found {}",
            raw,
            digits.len()
        )));
    }
    let bytes = hex::decode(digits)
        .map_err(|e| LedgerError::Decode(format!("address '{}': {}", raw, e)))?;
    Ok(Address::from_slice(&bytes))
}

/// Full lowercase hex form; `Display` on `H160` abbreviates.
pub fn format_address(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_bytes()))
}

/// Hex quantity as used on the JSON-RPC wire (`0x0`, `0x1a`, ...).
pub fn quantity_hex(value: U256) -> String {
    format!("0x{:x}", value)
}

pub fn parse_quantity(raw: &str) -> Result<U256, LedgerError> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    if digits.is_empty() {
        return Ok(U256::zero());
    }
    U256::from_str_radix(digits, 16)
        .map_err(|e| LedgerError::Decode(format!("quantity '{}': {:?}", raw, e)))
}

pub fn parse_quantity_u64(raw: &str) -> Result<u64, LedgerError> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    if digits.is_empty() {
        return Ok(0);
    }
    u64::from_str_radix(digits, 16)
        .map_err(|e| LedgerError::Decode(format!("quantity '{}': {}", raw, e)))
}

/// One entry of the contract's `events` mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub organizer: Address,
    pub name: String,
    pub date: U256,
    pub price: U256,
    pub ticket_count: U256,
    pub ticket_remain: U256,
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' by {} at {} price={} tickets={}/{}",
            self.name,
            format_address(&self.organizer),
            self.date,
            self.price,
            self.ticket_remain,
            self.ticket_count
        )
    }
}

/// Submission parameters that travel alongside the calldata.
///
/// `value` is decimal text in the ledger's smallest unit; the submission
/// boundary never sees a lossy numeric type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TxOptions {
    pub from: Address,
    pub value: Option<String>,
    pub gas: Option<u64>,
}

impl TxOptions {
    pub fn new(from: Address) -> Self {
        TxOptions {
            from,
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_gas(mut self, gas: u64) -> Self {
        self.gas = Some(gas);
        self
    }

    /// Parses the attached decimal value, if any.
    pub fn value_wei(&self) -> Result<Option<U256>, LedgerError> {
        match &self.value {
            None => Ok(None),
            Some(text) => U256::from_dec_str(text)
                .map(Some)
                .map_err(|_| LedgerError::InvalidValue(text.clone())),
        }
    }
}

/// What the remote reports once a submitted transaction has been mined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub transaction_hash: String,
    pub succeeded: bool,
    pub gas_used: Option<u64>,
    pub block_number: Option<u64>,
}
