use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Name shown for the built-in local account.
pub const DEFAULT_LOCAL_ACCOUNT_NAME: &str = "On My Device";

// ============================================================================
// Error Types
// ============================================================================

/// Database-specific errors with user-friendly messages
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Another instance of the application has locked the database
    #[error("Another instance of feedkeeper appears to be running. Please close it and try again.")]
    InstanceLocked,

    /// Migration failed
    #[error("Database migration failed: {0}")]
    Migration(String),

    /// The default local account cannot be removed
    #[error("The default account cannot be removed")]
    DefaultAccountProtected,

    /// A stored row carried an account type code this build does not know
    #[error("Corrupt account row: {0}")]
    Corrupt(#[from] UnknownAccountType),

    /// Generic database error
    #[error("Database error: {0}")]
    Other(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Check if a sqlx error indicates database locking
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        if is_lock_message(&err.to_string()) {
            return DatabaseError::InstanceLocked;
        }
        DatabaseError::Other(err)
    }
}

/// SQLITE_BUSY (5), SQLITE_LOCKED (6) and SQLITE_CANTOPEN (14) all surface
/// as one of these messages.
pub(crate) fn is_lock_message(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("database is locked")
        || message.contains("database table is locked")
        || message.contains("sqlite_busy")
        || message.contains("sqlite_locked")
        || message.contains("unable to open database file")
}

/// Returned when parsing an account type code fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown account type: {0}")]
pub struct UnknownAccountType(pub String);

// ============================================================================
// Account Types
// ============================================================================

/// Stable identifier of an account (SQLite rowid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub i64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The service backing an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    OnMyDevice,
    CloudKit,
    Feedly,
    Feedbin,
    NewsBlur,
    FreshRss,
    Inoreader,
    BazQux,
    TheOldReader,
    Reddit,
}

impl AccountType {
    /// Every account type, in the order the add-account sheet lists them.
    pub const ALL: [AccountType; 10] = [
        AccountType::OnMyDevice,
        AccountType::CloudKit,
        AccountType::Feedly,
        AccountType::Feedbin,
        AccountType::NewsBlur,
        AccountType::FreshRss,
        AccountType::Inoreader,
        AccountType::BazQux,
        AccountType::TheOldReader,
        AccountType::Reddit,
    ];

    /// Code stored in the `accounts.account_type` column and accepted by the CLI.
    pub fn code(self) -> &'static str {
        match self {
            AccountType::OnMyDevice => "onmydevice",
            AccountType::CloudKit => "cloudkit",
            AccountType::Feedly => "feedly",
            AccountType::Feedbin => "feedbin",
            AccountType::NewsBlur => "newsblur",
            AccountType::FreshRss => "freshrss",
            AccountType::Inoreader => "inoreader",
            AccountType::BazQux => "bazqux",
            AccountType::TheOldReader => "theoldreader",
            AccountType::Reddit => "reddit",
        }
    }

    /// Name shown when the user never set one.
    pub fn default_name(self) -> &'static str {
        match self {
            AccountType::OnMyDevice => DEFAULT_LOCAL_ACCOUNT_NAME,
            AccountType::CloudKit => "iCloud",
            AccountType::Feedly => "Feedly",
            AccountType::Feedbin => "Feedbin",
            AccountType::NewsBlur => "NewsBlur",
            AccountType::FreshRss => "FreshRSS",
            AccountType::Inoreader => "Inoreader",
            AccountType::BazQux => "BazQux Reader",
            AccountType::TheOldReader => "The Old Reader",
            AccountType::Reddit => "Reddit",
        }
    }

    /// Single-column glyph used as the row icon.
    pub fn icon(self) -> &'static str {
        match self {
            AccountType::OnMyDevice => "⌂",
            AccountType::CloudKit => "☁",
            AccountType::Feedly => "ƒ",
            AccountType::Feedbin => "▣",
            AccountType::NewsBlur => "◉",
            AccountType::FreshRss => "✦",
            AccountType::Inoreader => "◆",
            AccountType::BazQux => "◈",
            AccountType::TheOldReader => "◇",
            AccountType::Reddit => "ʀ",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_name())
    }
}

impl FromStr for AccountType {
    type Err = UnknownAccountType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        AccountType::ALL
            .into_iter()
            .find(|t| t.code() == needle)
            .ok_or_else(|| UnknownAccountType(s.to_string()))
    }
}

/// A configured feed source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: AccountId,
    pub account_type: AccountType,
    /// User-set display name; `None` falls back to the type name.
    pub name: Option<String>,
    pub is_active: bool,
    /// Unix seconds.
    pub created_at: i64,
}

impl Account {
    pub fn name_for_display(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.account_type.default_name(),
        }
    }
}

// ============================================================================
// Helper Types
// ============================================================================

/// Internal row type for account queries (used by sqlx FromRow)
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct AccountDbRow {
    pub id: i64,
    pub account_type: String,
    pub name: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
}

impl AccountDbRow {
    pub(crate) fn into_account(self) -> Result<Account, DatabaseError> {
        Ok(Account {
            id: AccountId(self.id),
            account_type: self.account_type.parse()?,
            name: self.name,
            is_active: self.is_active,
            created_at: self.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(account_type: AccountType, name: Option<&str>) -> Account {
        Account {
            id: AccountId(1),
            account_type,
            name: name.map(str::to_string),
            is_active: true,
            created_at: 0,
        }
    }

    #[test]
    fn test_type_codes_parse_back() {
        for t in AccountType::ALL {
            assert_eq!(t.code().parse::<AccountType>(), Ok(t));
        }
    }

    #[test]
    fn test_type_parse_is_case_insensitive() {
        assert_eq!("Feedly".parse::<AccountType>(), Ok(AccountType::Feedly));
        assert_eq!(" FRESHRSS ".parse::<AccountType>(), Ok(AccountType::FreshRss));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = "gopher".parse::<AccountType>().unwrap_err();
        assert_eq!(err, UnknownAccountType("gopher".to_string()));
        assert!(err.to_string().contains("gopher"));
    }

    #[test]
    fn test_serde_code_matches_column_code() {
        for t in AccountType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.code()));
        }
    }

    #[test]
    fn test_name_for_display_prefers_user_name() {
        assert_eq!(
            account(AccountType::Feedbin, Some("Work")).name_for_display(),
            "Work"
        );
    }

    #[test]
    fn test_name_for_display_falls_back_to_type_name() {
        assert_eq!(
            account(AccountType::OnMyDevice, None).name_for_display(),
            DEFAULT_LOCAL_ACCOUNT_NAME
        );
        assert_eq!(
            account(AccountType::Feedly, Some("   ")).name_for_display(),
            "Feedly"
        );
    }

    #[test]
    fn test_lock_messages_detected() {
        assert!(is_lock_message("error: Database is locked"));
        assert!(is_lock_message("SQLITE_BUSY"));
        assert!(!is_lock_message("no such table: accounts"));
    }
}
