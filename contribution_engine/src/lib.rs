//! Farewell Contributions Ledger engine
//!
//! The engine records monetary contributions to a farewell event, whether they are paid online through a payment
//! gateway or reported offline (cash, UPI and so on) and then approved by an admin. It is storage- and
//! provider-agnostic.
//!
//! The library is divided into these sections:
//! 1. The backend contracts ([`mod@traits`]). A database backend implements [`LedgerDatabase`] and [`AuditLog`]; a
//!    payment provider implements [`PaymentGateway`]. SQLite is the supported backend. The data types stored in the
//!    ledger are defined in the `db_types` module and are public.
//! 2. The public API ([`ContributionApi`]). All writes to the ledger pass through it, and it enforces the
//!    authorization rules: who may log a payment as an admin, and who may approve, reject or review offline entries.
//! 3. Helpers, notably the checkout callback signature check in [`helpers`].
pub mod db_types;
pub mod helpers;
mod ledger_api;
pub mod traits;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use ledger_api::{
    contribution_api::{ContributionApi, PENDING_LIST_LIMIT},
    errors::ContributionError,
    ledger_objects,
};
pub use traits::{
    AuditLog,
    ContributionDatabase,
    GatewayError,
    GatewayOrder,
    GatewayPayment,
    LedgerDatabase,
    LedgerError,
    NewGatewayOrder,
    OfflineResolution,
    PaymentGateway,
};
