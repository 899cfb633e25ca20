use ledger_api::{TxOptions, U256};
use tracing::info;

use crate::estimate::estimate_budget;
use crate::outcome::{Failure, OperationOutcome};
use crate::refresh::created_event_id;
use crate::request::{EventDraft, EventFields};
use crate::session::RemoteSession;
use crate::submitter::submit_transaction;

/// Validates the create-event form and runs [`create_event`].
pub async fn submit_create_event(session: &RemoteSession, fields: &EventFields) -> OperationOutcome {
    info!("Create event requested: {:?}", fields);
    match EventDraft::from_fields(fields) {
        Ok(draft) => create_event(session, draft).await,
        Err(e) => OperationOutcome::Failure(Failure::from(e)).logged("createEvent"),
    }
}

/// Estimate, submit, then read back the assigned id.
pub async fn create_event(session: &RemoteSession, draft: EventDraft) -> OperationOutcome {
    OperationOutcome::from(run(session, draft).await).logged("createEvent")
}

async fn run(session: &RemoteSession, draft: EventDraft) -> Result<(String, Option<U256>), Failure> {
    let account = session.require_acting_account()?;
    let ledger = session.ledger();
    let call = draft.into_call();
    let options = TxOptions::new(account);

    let gas = estimate_budget(ledger, &call, &options).await?;
    let receipt = submit_transaction(ledger, &call, &options.with_gas(gas)).await?;
    let event_id = created_event_id(ledger).await;
    Ok((receipt.transaction_hash, event_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::FailureCategory;
    use crate::testutils::{MockLedger, RemoteCall};
    use chrono::Utc;
    use ledger_api::{Address, ContractCall};
    use std::sync::Arc;

    fn draft() -> EventDraft {
        EventDraft::from_fields_in(
            &EventFields {
                name: "Meetup".to_string(),
                start_time: "2031-03-04T18:00".to_string(),
                price: "5".to_string(),
                ticket_supply: "40".to_string(),
            },
            &Utc,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_reports_counter_minus_one() {
        let alice = Address::repeat_byte(0xa1);
        let ledger = Arc::new(MockLedger::new().with_next_id(U256::from(3u64)).with_gas_estimate(100));
        let session = RemoteSession::new(ledger.clone(), vec![alice]);

        let outcome = create_event(&session, draft()).await;

        assert!(outcome.is_success(), "{:?}", outcome);
        assert_eq!(outcome.assigned_id(), Some(U256::from(3u64)));
        let sends = ledger.sends();
        assert_eq!(sends.len(), 1);
        assert_eq!(sends[0].1.gas, Some(120));
        assert_eq!(sends[0].1.value, None);
        assert!(matches!(sends[0].0, ContractCall::CreateEvent { .. }));
        assert_eq!(ledger.event_record(U256::from(3u64)).unwrap().organizer, alice);
    }

    #[tokio::test]
    async fn test_create_without_account_touches_nothing() {
        let ledger = Arc::new(MockLedger::new());
        let session = RemoteSession::new(ledger.clone(), vec![]);
        let outcome = create_event(&session, draft()).await;
        assert_eq!(
            outcome.failure().map(|f| f.category),
            Some(FailureCategory::NotConnected)
        );
        assert_eq!(ledger.call_count(), 0);
    }

    #[tokio::test]
    async fn test_estimation_failure_skips_submission() {
        let ledger = Arc::new(MockLedger::new().failing_estimate(ledger_api::LedgerError::Rpc {
            code: 3,
            message: "execution reverted: date in the past".to_string(),
        }));
        let session = RemoteSession::new(ledger.clone(), vec![Address::repeat_byte(1)]);
        let outcome = create_event(&session, draft()).await;
        assert_eq!(
            outcome.failure().map(|f| f.category),
            Some(FailureCategory::EstimationFailed)
        );
        assert!(ledger.sends().is_empty());
        assert!(!ledger.calls().contains(&RemoteCall::NextId));
    }
}
