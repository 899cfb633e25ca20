use crate::abi::{self, Token};
use crate::error::LedgerError;
use crate::types::{Address, EventRecord, U256};

/// A state-changing `EventContract` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    CreateEvent {
        name: String,
        date: U256,
        price: U256,
        ticket_count: U256,
    },
    BuyTicket {
        event_id: U256,
        quantity: U256,
    },
    TransferTicket {
        event_id: U256,
        quantity: U256,
        to: Address,
    },
}

impl ContractCall {
    pub fn signature(&self) -> &'static str {
        match self {
            ContractCall::CreateEvent { .. } => "createEvent(string,uint256,uint256,uint256)",
            ContractCall::BuyTicket { .. } => "buyTicket(uint256,uint256)",
            ContractCall::TransferTicket { .. } => "transferTicket(uint256,uint256,address)",
        }
    }

    pub fn method(&self) -> &'static str {
        match self {
            ContractCall::CreateEvent { .. } => "createEvent",
            ContractCall::BuyTicket { .. } => "buyTicket",
            ContractCall::TransferTicket { .. } => "transferTicket",
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let tokens = match self {
            ContractCall::CreateEvent {
                name,
                date,
                price,
                ticket_count,
            } => vec![
                Token::String(name.clone()),
                Token::Uint(*date),
                Token::Uint(*price),
                Token::Uint(*ticket_count),
            ],
            ContractCall::BuyTicket { event_id, quantity } => {
                vec![Token::Uint(*event_id), Token::Uint(*quantity)]
            }
            ContractCall::TransferTicket {
                event_id,
                quantity,
                to,
            } => vec![
                Token::Uint(*event_id),
                Token::Uint(*quantity),
                Token::Address(*to),
            ],
        };
        abi::encode_call(self.signature(), &tokens)
    }
}

/// A read-only `EventContract` getter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadCall {
    Events(U256),
    Tickets { account: Address, event_id: U256 },
    NextId,
}

impl ReadCall {
    pub fn encode(&self) -> Vec<u8> {
        match self {
            ReadCall::Events(event_id) => {
                abi::encode_call("events(uint256)", &[Token::Uint(*event_id)])
            }
            ReadCall::Tickets { account, event_id } => abi::encode_call(
                "tickets(address,uint256)",
                &[Token::Address(*account), Token::Uint(*event_id)],
            ),
            ReadCall::NextId => abi::encode_call("nextId()", &[]),
        }
    }
}

/// Decodes the public `events` getter:
/// `(address organizer, string name, uint256 date, uint256 price, uint256 ticketCount, uint256 ticketRemain)`.
pub fn decode_event_record(data: &[u8]) -> Result<EventRecord, LedgerError> {
    Ok(EventRecord {
        organizer: abi::decode_address(data, 0)?,
        name: abi::decode_string(data, 1)?,
        date: abi::decode_uint(data, 2)?,
        price: abi::decode_uint(data, 3)?,
        ticket_count: abi::decode_uint(data, 4)?,
        ticket_remain: abi::decode_uint(data, 5)?,
    })
}
