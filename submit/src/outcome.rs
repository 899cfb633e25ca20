use std::fmt;
use std::sync::LazyLock;

use ledger_api::{LedgerError, U256};
use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::ValidationError;

static USER_REJECTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)rejected|denied").expect("static pattern"));
static GAS_RELATED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)gas").expect("static pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FailureCategory {
    InvalidAmount,
    InvalidDate,
    InvalidName,
    InvalidAddress,
    /// No acting account in the session.
    NotConnected,
    InsufficientBalance,
    /// The event id reads back as the zeroed record.
    EventNotFound,
    EstimationFailed,
    GasOrEstimationFailure,
    UserRejected,
    /// Mined, but the receipt reports failure.
    RemoteExecutionFailure,
    Unknown,
}

impl FailureCategory {
    /// Detected before any remote submission; never costs a fee.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            FailureCategory::InvalidAmount
                | FailureCategory::InvalidDate
                | FailureCategory::InvalidName
                | FailureCategory::InvalidAddress
                | FailureCategory::NotConnected
                | FailureCategory::InsufficientBalance
                | FailureCategory::EventNotFound
        )
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub category: FailureCategory,
    pub detail: String,
}

impl Failure {
    pub fn new(category: FailureCategory, detail: impl Into<String>) -> Self {
        Failure {
            category,
            detail: detail.into(),
        }
    }

    /// A remote error raised by a submission (or by a read feeding one).
    pub fn from_remote(err: &LedgerError) -> Self {
        Failure::new(classify(err), err.to_string())
    }

    /// A remote error raised while estimating; the submission never happened.
    pub fn from_estimation(err: &LedgerError) -> Self {
        let category = match classify(err) {
            FailureCategory::UserRejected => FailureCategory::UserRejected,
            _ => FailureCategory::EstimationFailed,
        };
        Failure::new(category, err.to_string())
    }
}

impl From<ValidationError> for Failure {
    fn from(err: ValidationError) -> Self {
        Failure::new(err.category(), err.to_string())
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category, self.detail)
    }
}

impl std::error::Error for Failure {}

/// Terminal result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome")]
pub enum OperationOutcome {
    Success {
        transaction_hash: String,
        /// Only set by event creation.
        assigned_id: Option<U256>,
    },
    Failure(Failure),
}

impl OperationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, OperationOutcome::Success { .. })
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            OperationOutcome::Failure(failure) => Some(failure),
            OperationOutcome::Success { .. } => None,
        }
    }

    pub(crate) fn logged(self, operation: &str) -> Self {
        match &self {
            OperationOutcome::Success { .. } => info!("{}: {}", operation, self),
            OperationOutcome::Failure(_) => warn!("{}: {}", operation, self),
        }
        self
    }

    pub fn assigned_id(&self) -> Option<U256> {
        match self {
            OperationOutcome::Success { assigned_id, .. } => *assigned_id,
            OperationOutcome::Failure(_) => None,
        }
    }
}

impl From<Result<(String, Option<U256>), Failure>> for OperationOutcome {
    fn from(result: Result<(String, Option<U256>), Failure>) -> Self {
        match result {
            Ok((transaction_hash, assigned_id)) => OperationOutcome::Success {
                transaction_hash,
                assigned_id,
            },
            Err(failure) => OperationOutcome::Failure(failure),
        }
    }
}

impl fmt::Display for OperationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationOutcome::Success {
                transaction_hash,
                assigned_id: Some(id),
            } => write!(f, "success in {} (event id {})", transaction_hash, id),
            OperationOutcome::Success {
                transaction_hash, ..
            } => write!(f, "success in {}", transaction_hash),
            OperationOutcome::Failure(failure) => write!(f, "failed with {}", failure),
        }
    }
}

/// Maps a remote error to a user-facing category.
///
/// A structured wallet code wins; otherwise the message text decides.
pub fn classify(err: &LedgerError) -> FailureCategory {
    if err.is_user_rejection() {
        return FailureCategory::UserRejected;
    }
    if let LedgerError::ReceiptTimeout { .. } = err {
        return FailureCategory::Unknown;
    }
    let text = err.to_string();
    if USER_REJECTED.is_match(&text) {
        FailureCategory::UserRejected
    } else if GAS_RELATED.is_match(&text) {
        FailureCategory::GasOrEstimationFailure
    } else {
        FailureCategory::Unknown
    }
}
