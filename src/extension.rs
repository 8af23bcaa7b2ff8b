//! Extension points: pluggable feed providers the host can enable.
//!
//! Each provider type carries static display metadata through the
//! [`ExtensionPoint`] trait. Instances that are tied to a user account (such as
//! [`RedditFeedProvider`]) can only be built from a validated [`Username`], so
//! an instance identity is always available.

use crate::storage::DEFAULT_LOCAL_ACCOUNT_NAME;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtensionError {
    #[error("Username must not be empty")]
    EmptyUsername,

    #[error("Unknown extension point identifier: {0}")]
    UnknownIdentifier(String),
}

// ============================================================================
// Identity
// ============================================================================

/// A non-empty provider username, stored without the `u/` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Trim `raw`, strip a leading `u/`, and reject what is left if empty.
    pub fn parse(raw: &str) -> Result<Self, ExtensionError> {
        let trimmed = raw.trim();
        let bare = trimmed
            .strip_prefix("u/")
            .or_else(|| trimmed.strip_prefix("/u/"))
            .unwrap_or(trimmed)
            .trim();
        if bare.is_empty() {
            return Err(ExtensionError::EmptyUsername);
        }
        Ok(Self(bare.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of an enabled extension point instance.
///
/// The string form (`reddit:<username>`) is stable and parses back through
/// [`FromStr`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExtensionPointIdentifier {
    Reddit(Username),
}

impl fmt::Display for ExtensionPointIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtensionPointIdentifier::Reddit(username) => write!(f, "reddit:{}", username),
        }
    }
}

impl FromStr for ExtensionPointIdentifier {
    type Err = ExtensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some(("reddit", username)) => Ok(Self::Reddit(Username::parse(username)?)),
            _ => Err(ExtensionError::UnknownIdentifier(s.to_string())),
        }
    }
}

// ============================================================================
// Extension Point Trait
// ============================================================================

/// Metadata a provider type exposes to the host registry.
pub trait ExtensionPoint {
    /// Whether at most one instance may be enabled.
    const IS_SINGLETON: bool;
    /// Whether the type is only offered in developer builds.
    const IS_DEVELOPER_BUILD_RESTRICTED: bool;
    /// Product name; not localized.
    const TITLE: &'static str;
    /// Icon asset name.
    const IMAGE: &'static str;

    fn description() -> String;

    fn extension_point_id(&self) -> ExtensionPointIdentifier;

    /// Per-instance title shown once the extension is enabled.
    fn title(&self) -> String;
}

/// Subscribes to Reddit URLs as if they were feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedditFeedProvider {
    username: Username,
}

impl RedditFeedProvider {
    pub fn new(username: Username) -> Self {
        Self { username }
    }

    pub fn username(&self) -> &Username {
        &self.username
    }
}

impl ExtensionPoint for RedditFeedProvider {
    const IS_SINGLETON: bool = false;
    const IS_DEVELOPER_BUILD_RESTRICTED: bool = true;
    const TITLE: &'static str = "Reddit";
    const IMAGE: &'static str = "reddit";

    fn description() -> String {
        format!(
            "This extension enables you to subscribe to Reddit URLs as if they were RSS feeds. It only works with {} or iCloud accounts.",
            DEFAULT_LOCAL_ACCOUNT_NAME
        )
    }

    fn extension_point_id(&self) -> ExtensionPointIdentifier {
        ExtensionPointIdentifier::Reddit(self.username.clone())
    }

    fn title(&self) -> String {
        format!("u/{}", self.username)
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Type-level metadata, flattened for listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionPointInfo {
    pub title: &'static str,
    pub image: &'static str,
    pub description: String,
    pub is_singleton: bool,
    pub is_developer_build_restricted: bool,
}

impl ExtensionPointInfo {
    pub fn of<E: ExtensionPoint>() -> Self {
        Self {
            title: E::TITLE,
            image: E::IMAGE,
            description: E::description(),
            is_singleton: E::IS_SINGLETON,
            is_developer_build_restricted: E::IS_DEVELOPER_BUILD_RESTRICTED,
        }
    }
}

/// Extension point types this build offers.
///
/// Developer-restricted types are hidden unless `developer_build` is set.
pub fn available_extension_points(developer_build: bool) -> Vec<ExtensionPointInfo> {
    [ExtensionPointInfo::of::<RedditFeedProvider>()]
        .into_iter()
        .filter(|info| developer_build || !info.is_developer_build_restricted)
        .collect()
}
