use ledger_api::{ContractCall, TicketLedger, TxOptions};
use tracing::{debug, warn};

use crate::outcome::Failure;

/// Safety margin on top of the remote estimate, in percent.
pub const GAS_BUFFER_PERCENT: u64 = 120;

/// `floor(estimate * 1.2)`, saturating at `u64::MAX`.
pub fn apply_buffer(estimate: u64) -> u64 {
    let buffered = u128::from(estimate) * u128::from(GAS_BUFFER_PERCENT) / 100;
    u64::try_from(buffered).unwrap_or(u64::MAX)
}

/// Asks the ledger to dry-run `call` and returns the buffered gas budget.
pub async fn estimate_budget(
    ledger: &dyn TicketLedger,
    call: &ContractCall,
    options: &TxOptions,
) -> Result<u64, Failure> {
    let estimate = ledger.estimate_gas(call, options).await.map_err(|e| {
        warn!("Estimation of {} failed: {}", call.method(), e);
        Failure::from_estimation(&e)
    })?;
    let budget = apply_buffer(estimate);
    debug!(
        "Estimated {} gas for {}, budget {}",
        estimate,
        call.method(),
        budget
    );
    Ok(budget)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::FailureCategory;
    use crate::testutils::MockLedger;
    use ledger_api::{Address, LedgerError, U256};

    #[test]
    fn test_apply_buffer() {
        assert_eq!(apply_buffer(100), 120);
        assert_eq!(apply_buffer(21_000), 25_200);
        assert_eq!(apply_buffer(7), 8); // 8.4 floors
        assert_eq!(apply_buffer(0), 0);
        assert_eq!(apply_buffer(u64::MAX), u64::MAX);
    }

    #[tokio::test]
    async fn test_budget_from_remote_estimate() {
        let ledger = MockLedger::new().with_gas_estimate(100);
        let call = ContractCall::BuyTicket {
            event_id: U256::zero(),
            quantity: U256::one(),
        };
        let budget = estimate_budget(&ledger, &call, &TxOptions::new(Address::zero()))
            .await
            .unwrap();
        assert_eq!(budget, 120);
    }

    #[tokio::test]
    async fn test_reverting_estimate_fails() {
        let ledger = MockLedger::new().failing_estimate(LedgerError::Rpc {
            code: 3,
            message: "execution reverted: Event has ended".to_string(),
        });
        let call = ContractCall::BuyTicket {
            event_id: U256::zero(),
            quantity: U256::one(),
        };
        let failure = estimate_budget(&ledger, &call, &TxOptions::new(Address::zero()))
            .await
            .unwrap_err();
        assert_eq!(failure.category, FailureCategory::EstimationFailed);
        assert!(failure.detail.contains("Event has ended"));
    }
}
