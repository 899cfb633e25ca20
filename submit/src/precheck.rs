use ledger_api::types::format_address;
use ledger_api::{Address, TicketLedger, U256};
use tracing::{debug, warn};

use crate::outcome::{Failure, FailureCategory};

/// Rejects a transfer locally when the acting account holds fewer tickets
/// than requested.
///
/// Advisory only: the balance can change between this read and the
/// submission, so the ledger still has the final word.
pub async fn check_ownership(
    ledger: &dyn TicketLedger,
    account: Address,
    event_id: U256,
    quantity: U256,
) -> Result<U256, Failure> {
    let owned = ledger
        .tickets(account, event_id)
        .await
        .map_err(|e| Failure::from_remote(&e))?;
    debug!(
        "{} owns {} ticket(s) for event {}",
        format_address(&account),
        owned,
        event_id
    );
    if quantity > owned {
        warn!(
            "Transfer of {} ticket(s) for event {} exceeds balance {}",
            quantity, event_id, owned
        );
        return Err(Failure::new(
            FailureCategory::InsufficientBalance,
            format!(
                "requested {} ticket(s) for event {}, but only {} owned",
                quantity, event_id, owned
            ),
        ));
    }
    Ok(owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::{MockLedger, RemoteCall};

    #[tokio::test]
    async fn test_exact_balance_passes() {
        let alice = Address::repeat_byte(0xa1);
        let ledger = MockLedger::new().with_balance(alice, U256::one(), U256::from(5u64));
        let owned = check_ownership(&ledger, alice, U256::one(), U256::from(5u64))
            .await
            .unwrap();
        assert_eq!(owned, U256::from(5u64));
        assert_eq!(
            ledger.calls(),
            vec![RemoteCall::Tickets {
                account: alice,
                event_id: U256::one()
            }]
        );
    }

    #[tokio::test]
    async fn test_excess_quantity_is_rejected() {
        let alice = Address::repeat_byte(0xa1);
        let ledger = MockLedger::new().with_balance(alice, U256::one(), U256::from(3u64));
        let failure = check_ownership(&ledger, alice, U256::one(), U256::from(5u64))
            .await
            .unwrap_err();
        assert_eq!(failure.category, FailureCategory::InsufficientBalance);
    }

    #[tokio::test]
    async fn test_unknown_holder_owns_nothing() {
        let ledger = MockLedger::new();
        let failure = check_ownership(&ledger, Address::zero(), U256::zero(), U256::one())
            .await
            .unwrap_err();
        assert_eq!(failure.category, FailureCategory::InsufficientBalance);
    }
}
