use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use ledger_api::call::decode_event_record;
use ledger_api::types::{format_address, parse_address, parse_quantity_u64, quantity_hex};
use ledger_api::{
    Address, ContractCall, EventRecord, LedgerError, ReadCall, TicketLedger, TxOptions, TxReceipt,
    U256, abi,
};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use crate::config::LedgerConfig;
use crate::rpc::JsonRpcClient;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReceiptJson {
    transaction_hash: String,
    status: Option<String>,
    gas_used: Option<String>,
    block_number: Option<String>,
}

impl TryFrom<ReceiptJson> for TxReceipt {
    type Error = LedgerError;

    fn try_from(receipt: ReceiptJson) -> Result<Self, Self::Error> {
        let status = receipt.status.as_deref().ok_or_else(|| {
            LedgerError::Decode(format!(
                "receipt for {} carries no status",
                receipt.transaction_hash
            ))
        })?;
        // Only the status decides the outcome; the rest is informational.
        Ok(TxReceipt {
            succeeded: parse_quantity_u64(status)? == 1,
            gas_used: receipt
                .gas_used
                .as_deref()
                .and_then(|q| parse_quantity_u64(q).ok()),
            block_number: receipt
                .block_number
                .as_deref()
                .and_then(|q| parse_quantity_u64(q).ok()),
            transaction_hash: receipt.transaction_hash,
        })
    }
}

/// `TicketLedger` backed by an Ethereum-style JSON-RPC provider that holds
/// the signing keys (`eth_sendTransaction`).
#[derive(Debug, Clone)]
pub struct EthTicketLedger {
    rpc: JsonRpcClient,
    contract: Address,
    poll_interval: Duration,
    max_attempts: u32,
}

impl EthTicketLedger {
    pub fn new(rpc: JsonRpcClient, contract: Address) -> Self {
        EthTicketLedger {
            rpc,
            contract,
            poll_interval: Duration::from_millis(1000),
            max_attempts: 120,
        }
    }

    pub fn with_receipt_polling(mut self, poll_interval: Duration, max_attempts: u32) -> Self {
        self.poll_interval = poll_interval;
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn from_config(config: &LedgerConfig) -> Result<Self> {
        let contract = parse_address(&config.contract_address)
            .with_context(|| format!("invalid contract_address '{}'", config.contract_address))?;
        let rpc = JsonRpcClient::new(config.url.clone(), config.access_token.clone());
        Ok(EthTicketLedger::new(rpc, contract).with_receipt_polling(
            Duration::from_millis(config.receipt_poll_interval_ms),
            config.receipt_max_attempts,
        ))
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    async fn call(&self, read: ReadCall) -> Result<Vec<u8>, LedgerError> {
        let params = json!([
            {
                "to": format_address(&self.contract),
                "data": format!("0x{}", hex::encode(read.encode())),
            },
            "latest"
        ]);
        let raw: String = self.rpc.request("eth_call", params).await?;
        let digits = raw.strip_prefix("0x").unwrap_or(&raw);
        hex::decode(digits).map_err(|e| LedgerError::Decode(format!("eth_call result: {}", e)))
    }

    fn transaction_object(
        &self,
        call: &ContractCall,
        options: &TxOptions,
    ) -> Result<Value, LedgerError> {
        let mut tx = Map::new();
        tx.insert("from".to_string(), json!(format_address(&options.from)));
        tx.insert("to".to_string(), json!(format_address(&self.contract)));
        tx.insert(
            "data".to_string(),
            json!(format!("0x{}", hex::encode(call.encode()))),
        );
        if let Some(value) = options.value_wei()? {
            tx.insert("value".to_string(), json!(quantity_hex(value)));
        }
        if let Some(gas) = options.gas {
            tx.insert("gas".to_string(), json!(format!("0x{:x}", gas)));
        }
        Ok(Value::Object(tx))
    }

    async fn wait_for_receipt(&self, tx_hash: &str) -> Result<TxReceipt, LedgerError> {
        for attempt in 1..=self.max_attempts {
            let receipt: Option<ReceiptJson> = self
                .rpc
                .request("eth_getTransactionReceipt", json!([tx_hash]))
                .await?;
            if let Some(receipt) = receipt {
                return receipt.try_into();
            }
            debug!(
                "Receipt for {} not available yet (attempt {}/{})",
                tx_hash, attempt, self.max_attempts
            );
            if attempt < self.max_attempts {
                tokio::time::sleep(self.poll_interval).await;
            }
        }
        warn!("Gave up waiting for receipt of {}", tx_hash);
        Err(LedgerError::ReceiptTimeout {
            tx_hash: tx_hash.to_string(),
            attempts: self.max_attempts,
        })
    }
}

#[async_trait]
impl TicketLedger for EthTicketLedger {
    async fn accounts(&self) -> Result<Vec<Address>, LedgerError> {
        let raw: Vec<String> = self.rpc.request("eth_accounts", json!([])).await?;
        raw.iter().map(|a| parse_address(a)).collect()
    }

    async fn event(&self, event_id: U256) -> Result<EventRecord, LedgerError> {
        let data = self.call(ReadCall::Events(event_id)).await?;
        decode_event_record(&data)
    }

    async fn tickets(&self, account: Address, event_id: U256) -> Result<U256, LedgerError> {
        let data = self.call(ReadCall::Tickets { account, event_id }).await?;
        abi::decode_uint(&data, 0)
    }

    async fn next_id(&self) -> Result<U256, LedgerError> {
        let data = self.call(ReadCall::NextId).await?;
        abi::decode_uint(&data, 0)
    }

    async fn estimate_gas(
        &self,
        call: &ContractCall,
        options: &TxOptions,
    ) -> Result<u64, LedgerError> {
        let tx = self.transaction_object(call, options)?;
        let raw: String = self.rpc.request("eth_estimateGas", json!([tx])).await?;
        parse_quantity_u64(&raw)
    }

    async fn send(
        &self,
        call: &ContractCall,
        options: &TxOptions,
    ) -> Result<TxReceipt, LedgerError> {
        let tx = self.transaction_object(call, options)?;
        let tx_hash: String = self.rpc.request("eth_sendTransaction", json!([tx])).await?;
        info!(
            "Submitted {} from {} as {}",
            call.method(),
            format_address(&options.from),
            tx_hash
        );
        self.wait_for_receipt(&tx_hash).await
    }
}
