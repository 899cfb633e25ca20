use ledger_api::{TxOptions, U256};
use tracing::info;

use crate::estimate::estimate_budget;
use crate::outcome::{Failure, OperationOutcome};
use crate::precheck::check_ownership;
use crate::request::{TransferFields, TransferRequest};
use crate::session::RemoteSession;
use crate::submitter::submit_transaction;

pub async fn submit_transfer(session: &RemoteSession, fields: &TransferFields) -> OperationOutcome {
    info!("Transfer requested: {:?}", fields);
    match TransferRequest::from_fields(fields) {
        Ok(request) => transfer(session, request).await,
        Err(e) => OperationOutcome::Failure(Failure::from(e)).logged("transferTicket"),
    }
}

/// Balance precheck, estimate, submit.
pub async fn transfer(session: &RemoteSession, request: TransferRequest) -> OperationOutcome {
    OperationOutcome::from(run(session, request).await).logged("transferTicket")
}

async fn run(
    session: &RemoteSession,
    request: TransferRequest,
) -> Result<(String, Option<U256>), Failure> {
    let account = session.require_acting_account()?;
    let ledger = session.ledger();

    check_ownership(ledger, account, request.event_id, request.quantity).await?;

    let call = request.call();
    let options = TxOptions::new(account);
    let gas = estimate_budget(ledger, &call, &options).await?;
    let receipt = submit_transaction(ledger, &call, &options.with_gas(gas)).await?;
    Ok((receipt.transaction_hash, None))
}
