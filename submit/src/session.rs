use std::sync::Arc;

use ledger_api::types::format_address;
use ledger_api::{Address, LedgerError, TicketLedger};
use tracing::{info, warn};

use crate::outcome::{Failure, FailureCategory};

/// Connected ledger plus the accounts the wallet exposes.
///
/// Read-only to the pipelines; a reconnect builds a new session.
#[derive(Clone)]
pub struct RemoteSession {
    ledger: Arc<dyn TicketLedger>,
    accounts: Vec<Address>,
}

impl RemoteSession {
    pub fn new(ledger: Arc<dyn TicketLedger>, accounts: Vec<Address>) -> Self {
        RemoteSession { ledger, accounts }
    }

    /// Builds a session from the provider's own account list.
    pub async fn connect(ledger: Arc<dyn TicketLedger>) -> Result<Self, LedgerError> {
        let accounts = ledger.accounts().await?;
        info!(
            "Connected session with {} account(s): {:?}",
            accounts.len(),
            accounts.iter().map(format_address).collect::<Vec<_>>()
        );
        Ok(RemoteSession::new(ledger, accounts))
    }

    /// Puts `account` first so it becomes the acting account.
    ///
    /// The provider only signs for accounts it exposes, so any other
    /// account is refused here rather than at send time.
    pub fn with_acting_account(mut self, account: Address) -> Result<Self, Failure> {
        let Some(pos) = self.accounts.iter().position(|a| *a == account) else {
            warn!(
                "Account {} is not exposed by the wallet",
                format_address(&account)
            );
            return Err(Failure::new(
                FailureCategory::NotConnected,
                format!(
                    "the wallet does not expose account {}",
                    format_address(&account)
                ),
            ));
        };
        let account = self.accounts.remove(pos);
        self.accounts.insert(0, account);
        Ok(self)
    }

    pub fn ledger(&self) -> &dyn TicketLedger {
        self.ledger.as_ref()
    }

    pub fn accounts(&self) -> &[Address] {
        &self.accounts
    }

    /// The first account signs every submission.
    pub fn acting_account(&self) -> Option<Address> {
        self.accounts.first().copied()
    }

    pub(crate) fn require_acting_account(&self) -> Result<Address, Failure> {
        self.acting_account().ok_or_else(|| {
            warn!("No acting account in session");
            Failure::new(
                FailureCategory::NotConnected,
                "the wallet exposes no account to act for",
            )
        })
    }
}

impl std::fmt::Debug for RemoteSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSession")
            .field("accounts", &self.accounts)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::MockLedger;

    #[tokio::test]
    async fn test_connect_reads_accounts() {
        let alice = Address::repeat_byte(0xa1);
        let bob = Address::repeat_byte(0xb0);
        let ledger = Arc::new(MockLedger::new().with_accounts(vec![alice, bob]));
        let session = RemoteSession::connect(ledger.clone()).await.unwrap();
        assert_eq!(session.acting_account(), Some(alice));
        assert_eq!(ledger.call_count(), 1);
    }

    #[test]
    fn test_acting_account_override() {
        let alice = Address::repeat_byte(0xa1);
        let bob = Address::repeat_byte(0xb0);
        let session = RemoteSession::new(Arc::new(MockLedger::new()), vec![alice, bob])
            .with_acting_account(bob)
            .unwrap();
        assert_eq!(session.accounts(), &[bob, alice]);
        assert_eq!(session.acting_account(), Some(bob));
    }

    #[test]
    fn test_acting_account_must_be_exposed() {
        let alice = Address::repeat_byte(0xa1);
        let stranger = Address::repeat_byte(0x5e);
        let failure = RemoteSession::new(Arc::new(MockLedger::new()), vec![alice])
            .with_acting_account(stranger)
            .unwrap_err();
        assert_eq!(failure.category, FailureCategory::NotConnected);
        assert!(failure.detail.contains("0x5e5e"));
    }

    #[test]
    fn test_empty_session_has_no_acting_account() {
        let session = RemoteSession::new(Arc::new(MockLedger::new()), vec![]);
        assert_eq!(session.acting_account(), None);
    }
}
