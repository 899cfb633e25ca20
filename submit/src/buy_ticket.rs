use ledger_api::{TxOptions, U256};
use tracing::{debug, info};

use crate::estimate::estimate_budget;
use crate::outcome::{Failure, FailureCategory, OperationOutcome};
use crate::request::{PurchaseFields, TicketOrder};
use crate::session::RemoteSession;
use crate::submitter::submit_transaction;

pub async fn submit_purchase(session: &RemoteSession, fields: &PurchaseFields) -> OperationOutcome {
    info!("Purchase requested: {:?}", fields);
    match TicketOrder::from_fields(fields) {
        Ok(order) => purchase(session, order).await,
        Err(e) => OperationOutcome::Failure(Failure::from(e)).logged("buyTicket"),
    }
}

/// Prices the order from the ledger and pays exactly `price * quantity`.
pub async fn purchase(session: &RemoteSession, order: TicketOrder) -> OperationOutcome {
    OperationOutcome::from(run(session, order).await).logged("buyTicket")
}

async fn run(session: &RemoteSession, order: TicketOrder) -> Result<(String, Option<U256>), Failure> {
    let account = session.require_acting_account()?;
    let ledger = session.ledger();

    let event = ledger
        .event(order.event_id)
        .await
        .map_err(|e| Failure::from_remote(&e))?;
    // Every created event has a positive supply; unknown ids read back zeroed.
    if event.ticket_count.is_zero() {
        return Err(Failure::new(
            FailureCategory::EventNotFound,
            format!("no event with id {}", order.event_id),
        ));
    }
    let priced = order.priced(event.price)?;
    debug!(
        "Order for event {}: {} x {} = {}",
        order.event_id, order.quantity, priced.unit_price, priced.total_cost
    );

    let call = priced.call();
    let options = TxOptions::new(account).with_value(priced.value_text());
    let gas = estimate_budget(ledger, &call, &options).await?;
    let receipt = submit_transaction(ledger, &call, &options.with_gas(gas)).await?;
    Ok((receipt.transaction_hash, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::RemoteCall;
    use crate::testutils::MockLedger;
    use ledger_api::Address;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_purchase_attaches_exact_total() {
        let alice = Address::repeat_byte(0xa1);
        let price = U256::from_dec_str("9007199254740993").unwrap();
        let ledger = Arc::new(MockLedger::new().with_priced_event(U256::from(7u64), price));
        let session = RemoteSession::new(ledger.clone(), vec![alice]);
        let order = TicketOrder {
            event_id: U256::from(7u64),
            quantity: U256::from(1_000_000_000_000_000_007u64),
        };

        let outcome = purchase(&session, order).await;

        assert!(outcome.is_success(), "{:?}", outcome);
        assert_eq!(outcome.assigned_id(), None);
        let sends = ledger.sends();
        assert_eq!(
            sends[0].1.value.as_deref(),
            Some("9007199254740993063050394783186951")
        );
        assert_eq!(ledger.balance(alice, U256::from(7u64)), order.quantity);
    }

    #[tokio::test]
    async fn test_total_overflow_is_local() {
        let ledger = Arc::new(MockLedger::new().with_priced_event(U256::zero(), U256::MAX));
        let session = RemoteSession::new(ledger.clone(), vec![Address::repeat_byte(1)]);
        let order = TicketOrder {
            event_id: U256::zero(),
            quantity: U256::from(2u64),
        };
        let outcome = purchase(&session, order).await;
        assert_eq!(
            outcome.failure().map(|f| f.category),
            Some(FailureCategory::InvalidAmount)
        );
        assert!(ledger.sends().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_event_is_rejected_before_estimation() {
        let ledger = Arc::new(MockLedger::new().with_priced_event(U256::one(), U256::from(10u64)));
        let session = RemoteSession::new(ledger.clone(), vec![Address::repeat_byte(1)]);
        let order = TicketOrder {
            event_id: U256::from(42u64),
            quantity: U256::one(),
        };

        let outcome = purchase(&session, order).await;

        assert_eq!(
            outcome.failure().map(|f| f.category),
            Some(FailureCategory::EventNotFound)
        );
        assert_eq!(ledger.calls(), vec![RemoteCall::Event(U256::from(42u64))]);
    }
}
