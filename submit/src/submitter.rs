use ledger_api::types::format_address;
use ledger_api::{ContractCall, TicketLedger, TxOptions, TxReceipt};
use tracing::{error, info};

use crate::outcome::{Failure, FailureCategory};

/// Submits `call` under `options.from` and waits for the receipt.
///
/// A receipt with failed status is a failure, never a silent success.
pub async fn submit_transaction(
    ledger: &dyn TicketLedger,
    call: &ContractCall,
    options: &TxOptions,
) -> Result<TxReceipt, Failure> {
    info!(
        "Submitting {} from {} value={:?} gas={:?}",
        call.method(),
        format_address(&options.from),
        options.value,
        options.gas
    );
    let receipt = ledger.send(call, options).await.map_err(|e| {
        error!("Error at {}:{} - {:?}", file!(), line!(), e);
        Failure::from_remote(&e)
    })?;
    if !receipt.succeeded {
        error!(
            "{} in {} was mined with failed status",
            call.method(),
            receipt.transaction_hash
        );
        return Err(Failure::new(
            FailureCategory::RemoteExecutionFailure,
            format!(
                "{} transaction {} executed but reported failure",
                call.method(),
                receipt.transaction_hash
            ),
        ));
    }
    info!("{} succeeded in {}", call.method(), receipt.transaction_hash);
    Ok(receipt)
}
