//! Immutable request objects, built once per submission from raw field text.

use chrono::TimeZone;
use ledger_api::{Address, ContractCall, U256};

use crate::error::ValidationError;
use crate::normalize::{
    parse_amount, parse_event_id, parse_name, parse_recipient, parse_start_time,
    parse_start_time_in, total_cost,
};

/// Raw values of the create-event form.
#[derive(Debug, Clone, Default)]
pub struct EventFields {
    pub name: String,
    pub start_time: String,
    pub price: String,
    pub ticket_supply: String,
}

/// Raw values of the buy-ticket form.
#[derive(Debug, Clone, Default)]
pub struct PurchaseFields {
    pub event_id: String,
    pub quantity: String,
}

/// Raw values of the transfer-ticket form.
#[derive(Debug, Clone, Default)]
pub struct TransferFields {
    pub event_id: String,
    pub quantity: String,
    pub recipient: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub name: String,
    pub start_time: U256,
    pub unit_price: U256,
    pub ticket_supply: U256,
}

impl EventDraft {
    /// Reads a zone-less start time in the local time zone.
    pub fn from_fields(fields: &EventFields) -> Result<Self, ValidationError> {
        Ok(EventDraft {
            name: parse_name(&fields.name)?,
            start_time: parse_start_time(&fields.start_time)?,
            unit_price: parse_amount("price", &fields.price)?,
            ticket_supply: parse_amount("ticket supply", &fields.ticket_supply)?,
        })
    }

    pub fn from_fields_in<Tz: TimeZone>(
        fields: &EventFields,
        tz: &Tz,
    ) -> Result<Self, ValidationError> {
        Ok(EventDraft {
            name: parse_name(&fields.name)?,
            start_time: parse_start_time_in(&fields.start_time, tz)?,
            unit_price: parse_amount("price", &fields.price)?,
            ticket_supply: parse_amount("ticket supply", &fields.ticket_supply)?,
        })
    }

    pub fn into_call(self) -> ContractCall {
        ContractCall::CreateEvent {
            name: self.name,
            date: self.start_time,
            price: self.unit_price,
            ticket_count: self.ticket_supply,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketOrder {
    pub event_id: U256,
    pub quantity: U256,
}

impl TicketOrder {
    pub fn from_fields(fields: &PurchaseFields) -> Result<Self, ValidationError> {
        Ok(TicketOrder {
            event_id: parse_event_id(&fields.event_id)?,
            quantity: parse_amount("quantity", &fields.quantity)?,
        })
    }

    /// Attaches the ledger's unit price and computes the exact total.
    pub fn priced(self, unit_price: U256) -> Result<PricedOrder, ValidationError> {
        Ok(PricedOrder {
            order: self,
            unit_price,
            total_cost: total_cost(unit_price, self.quantity)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedOrder {
    pub order: TicketOrder,
    pub unit_price: U256,
    pub total_cost: U256,
}

impl PricedOrder {
    /// Attached value as decimal text, the only form the submission boundary takes.
    pub fn value_text(&self) -> String {
        self.total_cost.to_string()
    }

    pub fn call(&self) -> ContractCall {
        ContractCall::BuyTicket {
            event_id: self.order.event_id,
            quantity: self.order.quantity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRequest {
    pub event_id: U256,
    pub quantity: U256,
    pub recipient: Address,
}

impl TransferRequest {
    pub fn from_fields(fields: &TransferFields) -> Result<Self, ValidationError> {
        Ok(TransferRequest {
            event_id: parse_event_id(&fields.event_id)?,
            quantity: parse_amount("quantity", &fields.quantity)?,
            recipient: parse_recipient(&fields.recipient)?,
        })
    }

    pub fn call(&self) -> ContractCall {
        ContractCall::TransferTicket {
            event_id: self.event_id,
            quantity: self.quantity,
            to: self.recipient,
        }
    }
}
