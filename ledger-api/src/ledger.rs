use async_trait::async_trait;

use crate::call::ContractCall;
use crate::error::LedgerError;
use crate::types::{Address, EventRecord, TxOptions, TxReceipt, U256};

/// The remote, authoritative ticket ledger.
///
/// Reads are side-effect free. `estimate_gas` dry-runs a call and fails when
/// the call would revert. `send` submits a fee-bearing transaction and
/// resolves once the remote reports a receipt for it.
#[async_trait]
pub trait TicketLedger: Send + Sync {
    /// Accounts the connected wallet/provider can act for.
    async fn accounts(&self) -> Result<Vec<Address>, LedgerError>;

    async fn event(&self, event_id: U256) -> Result<EventRecord, LedgerError>;

    /// Ticket balance of `account` for `event_id`.
    async fn tickets(&self, account: Address, event_id: U256) -> Result<U256, LedgerError>;

    async fn next_id(&self) -> Result<U256, LedgerError>;

    async fn estimate_gas(
        &self,
        call: &ContractCall,
        options: &TxOptions,
    ) -> Result<u64, LedgerError>;

    async fn send(&self, call: &ContractCall, options: &TxOptions)
    -> Result<TxReceipt, LedgerError>;
}
