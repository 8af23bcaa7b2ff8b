//! Feed reader account management.
//!
//! Accounts are persisted in SQLite ([`storage`]), served through the
//! [`account::AccountRepository`] trait, and presented as active/inactive
//! lists by [`viewmodel::AccountListViewModel`]. The [`ui`] module drives the
//! view model from a terminal.

pub mod account;
pub mod app;
pub mod config;
pub mod extension;
pub mod storage;
pub mod ui;
pub mod util;
pub mod viewmodel;
