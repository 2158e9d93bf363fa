//! # Contribution ledger public API
//!
//! [`contribution_api::ContributionApi`] is the transaction service: every write to the ledger passes through it,
//! and it is the single place where the authorization rules for contributions live.
//!
//! # API usage
//!
//! An API instance is created once per process by supplying a database backend and a payment gateway client. Nothing
//! is looked up from ambient state.
//!
//! ```rust,ignore
//! use contribution_engine::{ContributionApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! let api = ContributionApi::new(db, gateway);
//! let pending = api.list_pending_offline(&admin_id).await?;
//! ```
pub mod contribution_api;
pub mod errors;
pub mod ledger_objects;
