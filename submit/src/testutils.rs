//! In-memory `TicketLedger` for exercising the pipelines without a node.
//!
//! It records every remote call, so tests can assert that validation
//! failures never reach the ledger, and it applies the contract's effects
//! on successful sends so follow-up reads see the new state.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use ledger_api::{
    Address, ContractCall, EventRecord, LedgerError, TicketLedger, TxOptions, TxReceipt, U256,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    Accounts,
    Event(U256),
    Tickets { account: Address, event_id: U256 },
    NextId,
    EstimateGas { call: ContractCall, options: TxOptions },
    Send { call: ContractCall, options: TxOptions },
}

#[derive(Debug, Default)]
struct MockState {
    accounts: Vec<Address>,
    events: HashMap<U256, EventRecord>,
    balances: HashMap<(Address, U256), U256>,
    next_id: U256,
    gas_estimate: u64,
    foreign_creations: u64,
    estimate_error: Option<LedgerError>,
    send_error: Option<LedgerError>,
    read_error: Option<LedgerError>,
    revert_sends: bool,
    sent: u64,
    calls: Vec<RemoteCall>,
}

#[derive(Debug)]
pub struct MockLedger {
    state: Mutex<MockState>,
}

impl Default for MockLedger {
    fn default() -> Self {
        MockLedger::new()
    }
}

impl MockLedger {
    pub fn new() -> Self {
        MockLedger {
            state: Mutex::new(MockState {
                gas_estimate: 21_000,
                ..Default::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().expect("mock ledger state poisoned")
    }

    pub fn with_accounts(self, accounts: Vec<Address>) -> Self {
        self.state().accounts = accounts;
        self
    }

    pub fn with_event(self, event_id: U256, record: EventRecord) -> Self {
        self.state().events.insert(event_id, record);
        self
    }

    /// Registers an event with only a price, organised by the zero address.
    pub fn with_priced_event(self, event_id: U256, price: U256) -> Self {
        self.with_event(
            event_id,
            EventRecord {
                organizer: Address::zero(),
                name: format!("event-{}", event_id),
                date: U256::from(1_900_000_000u64),
                price,
                ticket_count: U256::from(1000u64),
                ticket_remain: U256::from(1000u64),
            },
        )
    }

    pub fn with_balance(self, account: Address, event_id: U256, tickets: U256) -> Self {
        self.state().balances.insert((account, event_id), tickets);
        self
    }

    pub fn with_next_id(self, next_id: U256) -> Self {
        self.state().next_id = next_id;
        self
    }

    pub fn with_gas_estimate(self, gas: u64) -> Self {
        self.state().gas_estimate = gas;
        self
    }

    /// Another creator lands `count` events right after each of ours.
    pub fn with_foreign_creations(self, count: u64) -> Self {
        self.state().foreign_creations = count;
        self
    }

    pub fn failing_estimate(self, err: LedgerError) -> Self {
        self.state().estimate_error = Some(err);
        self
    }

    pub fn failing_send(self, err: LedgerError) -> Self {
        self.state().send_error = Some(err);
        self
    }

    pub fn failing_reads(self, err: LedgerError) -> Self {
        self.state().read_error = Some(err);
        self
    }

    /// Sends are mined with failed status.
    pub fn reverting_sends(self) -> Self {
        self.state().revert_sends = true;
        self
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.state().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }

    pub fn sends(&self) -> Vec<(ContractCall, TxOptions)> {
        self.state()
            .calls
            .iter()
            .filter_map(|c| match c {
                RemoteCall::Send { call, options } => Some((call.clone(), options.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn balance(&self, account: Address, event_id: U256) -> U256 {
        self.state()
            .balances
            .get(&(account, event_id))
            .copied()
            .unwrap_or_default()
    }

    pub fn event_record(&self, event_id: U256) -> Option<EventRecord> {
        self.state().events.get(&event_id).cloned()
    }

    fn read<T>(&self, call: RemoteCall, f: impl FnOnce(&MockState) -> T) -> Result<T, LedgerError> {
        let mut state = self.state();
        state.calls.push(call);
        if let Some(err) = &state.read_error {
            return Err(err.clone());
        }
        Ok(f(&*state))
    }
}

impl MockState {
    fn apply(&mut self, call: &ContractCall, from: Address) {
        match call {
            ContractCall::CreateEvent {
                name,
                date,
                price,
                ticket_count,
            } => {
                let record = EventRecord {
                    organizer: from,
                    name: name.clone(),
                    date: *date,
                    price: *price,
                    ticket_count: *ticket_count,
                    ticket_remain: *ticket_count,
                };
                self.events.insert(self.next_id, record);
                self.next_id += U256::one() + U256::from(self.foreign_creations);
            }
            ContractCall::BuyTicket { event_id, quantity } => {
                if let Some(event) = self.events.get_mut(event_id) {
                    event.ticket_remain = event.ticket_remain.saturating_sub(*quantity);
                }
                *self.balances.entry((from, *event_id)).or_default() += *quantity;
            }
            ContractCall::TransferTicket {
                event_id,
                quantity,
                to,
            } => {
                let held = self.balances.entry((from, *event_id)).or_default();
                *held = held.saturating_sub(*quantity);
                *self.balances.entry((*to, *event_id)).or_default() += *quantity;
            }
        }
    }
}

#[async_trait]
impl TicketLedger for MockLedger {
    async fn accounts(&self) -> Result<Vec<Address>, LedgerError> {
        self.read(RemoteCall::Accounts, |s| s.accounts.clone())
    }

    async fn event(&self, event_id: U256) -> Result<EventRecord, LedgerError> {
        // Unknown ids read back as the zeroed struct, like a Solidity mapping.
        self.read(RemoteCall::Event(event_id), |s| {
            s.events.get(&event_id).cloned().unwrap_or(EventRecord {
                organizer: Address::zero(),
                name: String::new(),
                date: U256::zero(),
                price: U256::zero(),
                ticket_count: U256::zero(),
                ticket_remain: U256::zero(),
            })
        })
    }

    async fn tickets(&self, account: Address, event_id: U256) -> Result<U256, LedgerError> {
        self.read(RemoteCall::Tickets { account, event_id }, |s| {
            s.balances
                .get(&(account, event_id))
                .copied()
                .unwrap_or_default()
        })
    }

    async fn next_id(&self) -> Result<U256, LedgerError> {
        self.read(RemoteCall::NextId, |s| s.next_id)
    }

    async fn estimate_gas(
        &self,
        call: &ContractCall,
        options: &TxOptions,
    ) -> Result<u64, LedgerError> {
        let mut state = self.state();
        state.calls.push(RemoteCall::EstimateGas {
            call: call.clone(),
            options: options.clone(),
        });
        match &state.estimate_error {
            Some(err) => Err(err.clone()),
            None => Ok(state.gas_estimate),
        }
    }

    async fn send(
        &self,
        call: &ContractCall,
        options: &TxOptions,
    ) -> Result<TxReceipt, LedgerError> {
        let mut state = self.state();
        state.calls.push(RemoteCall::Send {
            call: call.clone(),
            options: options.clone(),
        });
        if let Some(err) = &state.send_error {
            return Err(err.clone());
        }
        state.sent += 1;
        let transaction_hash = format!("0x{:064x}", state.sent);
        let succeeded = !state.revert_sends;
        if succeeded {
            state.apply(call, options.from);
        }
        Ok(TxReceipt {
            transaction_hash,
            succeeded,
            gas_used: options.gas,
            block_number: Some(state.sent),
        })
    }
}
