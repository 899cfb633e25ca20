//! Client-side pipelines for the event ticketing ledger.
//!
//! Each operation (create, purchase, transfer) runs as one chain:
//! normalize the raw fields, precheck where it applies, estimate gas with a
//! safety margin, submit under the acting account, classify the outcome.
//! Every failure comes back as an [`OperationOutcome`], never as an error.

pub mod buy_ticket;
pub mod create_event;
pub mod error;
pub mod estimate;
pub mod normalize;
pub mod outcome;
pub mod precheck;
pub mod refresh;
pub mod request;
pub mod session;
pub mod submitter;
pub mod testutils;
pub mod transfer_ticket;

pub use buy_ticket::{purchase, submit_purchase};
pub use create_event::{create_event, submit_create_event};
pub use outcome::{Failure, FailureCategory, OperationOutcome};
pub use request::{EventDraft, EventFields, PurchaseFields, TicketOrder, TransferFields, TransferRequest};
pub use session::RemoteSession;
pub use transfer_ticket::{submit_transfer, transfer};
