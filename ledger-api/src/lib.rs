//! Client-side view of the `EventContract` ledger: value types, the contract
//! call model, the ABI codec and the `TicketLedger` trait that every remote
//! backend implements.

pub mod abi;
pub mod call;
pub mod error;
pub mod ledger;
pub mod types;

pub use call::{ContractCall, ReadCall};
pub use error::LedgerError;
pub use ledger::TicketLedger;
pub use types::{Address, EventRecord, TxOptions, TxReceipt, U256};
