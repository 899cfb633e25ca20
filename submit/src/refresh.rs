use ledger_api::{TicketLedger, U256};
use tracing::warn;

/// Id of the event just created, read back as `nextId() - 1`.
///
/// Assumes no other creation landed between the submission and this read;
/// with concurrent creators the reported id can belong to someone else's
/// event. A failed read yields `None` rather than failing the creation.
pub async fn created_event_id(ledger: &dyn TicketLedger) -> Option<U256> {
    match ledger.next_id().await {
        Ok(next_id) => {
            let id = next_id.checked_sub(U256::one());
            if id.is_none() {
                warn!("nextId is still 0 after a successful creation");
            }
            id
        }
        Err(e) => {
            warn!("Could not read nextId after creation: {}", e);
            None
        }
    }
}
