//! Account management: the repository contract, its SQLite-backed
//! implementation, and the change notifications it publishes.
//!
//! # Module Structure
//!
//! - `events` - Broadcast event bus carrying [`AccountNotification`]s
//! - `repository` - The [`AccountRepository`] trait consumed by the view model
//! - `manager` - [`AccountManager`], the production repository

mod events;
mod manager;
mod repository;

pub use events::{AccountEvents, AccountNotification, AccountSubscription};
pub use manager::AccountManager;
pub use repository::AccountRepository;

use crate::storage::{AccountId, DatabaseError};
use thiserror::Error;

/// Errors returned by account repository operations.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Account {0} not found")]
    NotFound(AccountId),

    #[error("The default account cannot be removed")]
    DefaultAccountProtected,

    #[error(transparent)]
    Database(DatabaseError),
}

impl From<DatabaseError> for AccountError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::DefaultAccountProtected => AccountError::DefaultAccountProtected,
            other => AccountError::Database(other),
        }
    }
}
