pub mod config;
pub mod eth_ledger;
pub mod rpc;
