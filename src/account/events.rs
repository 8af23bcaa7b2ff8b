//! Account change notifications.
//!
//! A `tokio::sync::broadcast` channel stands in for a global notification
//! center. Each [`AccountSubscription`] owns its receiver, so an observer is
//! unregistered as soon as its owner drops it.
//!
//! Delivery: every live subscriber sees notifications in publish order. A
//! subscriber that falls more than [`CHANNEL_CAPACITY`] notifications behind
//! receives one synthetic [`AccountNotification::AccountStateDidChange`] in
//! place of the dropped ones. Consumers refresh on any notification, so a
//! change is never silently lost.

use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};

/// Notifications buffered per subscriber before lagging kicks in.
pub const CHANNEL_CAPACITY: usize = 64;

/// Something about the account set changed. Only the occurrence matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountNotification {
    /// An account was activated or deactivated.
    AccountStateDidChange,
    UserDidAddAccount,
    UserDidDeleteAccount,
    DisplayNameDidChange,
}

/// Publisher side of the account event bus.
#[derive(Debug, Clone)]
pub struct AccountEvents {
    tx: broadcast::Sender<AccountNotification>,
}

impl AccountEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publish a notification to every live subscriber.
    ///
    /// Having no subscribers is not an error.
    pub fn publish(&self, notification: AccountNotification) {
        match self.tx.send(notification) {
            Ok(receivers) => {
                tracing::trace!(?notification, receivers, "Published account notification");
            }
            Err(_) => {
                tracing::trace!(?notification, "No subscribers for account notification");
            }
        }
    }

    /// Register a new observer. Notifications published before this call are
    /// not replayed.
    pub fn subscribe(&self) -> AccountSubscription {
        AccountSubscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for AccountEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiver side of the account event bus, scoped to its owner's lifetime.
#[derive(Debug)]
pub struct AccountSubscription {
    rx: broadcast::Receiver<AccountNotification>,
}

impl AccountSubscription {
    /// Take the next pending notification without waiting.
    pub fn try_next(&mut self) -> Option<AccountNotification> {
        match self.rx.try_recv() {
            Ok(notification) => Some(notification),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Account subscriber lagged, coalescing notifications");
                Some(AccountNotification::AccountStateDidChange)
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => None,
        }
    }

    /// Wait for the next notification.
    ///
    /// Returns `None` once every publisher has been dropped.
    pub async fn next(&mut self) -> Option<AccountNotification> {
        match self.rx.recv().await {
            Ok(notification) => Some(notification),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Account subscriber lagged, coalescing notifications");
                Some(AccountNotification::AccountStateDidChange)
            }
            Err(RecvError::Closed) => None,
        }
    }
}
