mod accounts;
mod preferences;
mod schema;
mod types;

pub use schema::Database;
pub use types::{
    Account, AccountId, AccountType, DatabaseError, UnknownAccountType,
    DEFAULT_LOCAL_ACCOUNT_NAME,
};
