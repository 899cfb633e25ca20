use thiserror::Error;

/// JSON-RPC / EIP-1193 code a wallet returns when the user declines a request.
pub const USER_REJECTED_CODE: i64 = 4001;

/// Errors reported by a `TicketLedger` backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The request never produced a protocol-level answer (connection, HTTP status, body).
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote answered with an error object.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The remote answered, but the payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// An attached value was not valid decimal text.
    #[error("invalid attached value '{0}'")]
    InvalidValue(String),

    /// The transaction was accepted but no receipt appeared in time.
    #[error("no receipt for transaction {tx_hash} after {attempts} attempts")]
    ReceiptTimeout { tx_hash: String, attempts: u32 },
}

impl LedgerError {
    /// Structured error code, when the remote supplied one.
    pub fn code(&self) -> Option<i64> {
        match self {
            LedgerError::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_user_rejection(&self) -> bool {
        self.code() == Some(USER_REJECTED_CODE)
    }
}
