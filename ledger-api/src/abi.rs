//! Minimal contract ABI codec: the subset of types `EventContract` uses
//! (`uint256`, `address`, `string`).

use sha3::{Digest, Keccak256};

use crate::error::LedgerError;
use crate::types::{Address, U256};

pub const WORD: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Uint(U256),
    Address(Address),
    String(String),
}

/// First four bytes of keccak-256 over the canonical function signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

pub fn encode_call(signature: &str, tokens: &[Token]) -> Vec<u8> {
    let mut data = selector(signature).to_vec();
    data.extend(encode(tokens));
    data
}

/// Head/tail encoding of a flat argument list.
pub fn encode(tokens: &[Token]) -> Vec<u8> {
    let head_len = tokens.len() * WORD;
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();
    for token in tokens {
        match token {
            Token::Uint(value) => head.extend_from_slice(&uint_word(*value)),
            Token::Address(address) => head.extend_from_slice(&address_word(address)),
            Token::String(text) => {
                let offset = (head_len + tail.len()) as u64;
                head.extend_from_slice(&uint_word(U256::from(offset)));
                tail.extend_from_slice(&uint_word(U256::from(text.len() as u64)));
                tail.extend_from_slice(text.as_bytes());
                let padding = (WORD - text.len() % WORD) % WORD;
                tail.extend(std::iter::repeat_n(0u8, padding));
            }
        }
    }
    head.extend(tail);
    head
}

fn uint_word(value: U256) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    value.to_big_endian(&mut word);
    word
}

fn address_word(address: &Address) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

fn slice_at(data: &[u8], start: usize, len: usize) -> Result<&[u8], LedgerError> {
    let end = start
        .checked_add(len)
        .ok_or_else(|| LedgerError::Decode("offset overflow".to_string()))?;
    data.get(start..end).ok_or_else(|| {
        LedgerError::Decode(format!(
            "return data too short: need {} bytes, have {}",
            end,
            data.len()
        ))
    })
}

fn to_usize(value: U256) -> Result<usize, LedgerError> {
    if value > U256::from(u32::MAX) {
        return Err(LedgerError::Decode(format!("offset {} out of range", value)));
    }
    Ok(value.as_usize())
}

pub fn decode_uint(data: &[u8], index: usize) -> Result<U256, LedgerError> {
    let word = slice_at(data, index * WORD, WORD)?;
    Ok(U256::from_big_endian(word))
}

pub fn decode_address(data: &[u8], index: usize) -> Result<Address, LedgerError> {
    let word = slice_at(data, index * WORD, WORD)?;
    if word[..12].iter().any(|b| *b != 0) {
        return Err(LedgerError::Decode(format!(
            "word {} is not a left-padded address",
            index
        )));
    }
    Ok(Address::from_slice(&word[12..]))
}

/// Follows the head offset at `index` to a length-prefixed UTF-8 string.
pub fn decode_string(data: &[u8], index: usize) -> Result<String, LedgerError> {
    let offset = to_usize(decode_uint(data, index)?)?;
    let len = to_usize(U256::from_big_endian(slice_at(data, offset, WORD)?))?;
    let bytes = slice_at(data, offset + WORD, len)?;
    String::from_utf8(bytes.to_vec())
        .map_err(|e| LedgerError::Decode(format!("string is not utf-8: {}", e)))
}
