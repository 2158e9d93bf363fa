//! # Backend and gateway contracts
//!
//! The contribution engine is storage- and provider-agnostic. This module defines what a backend has to provide.
//!
//! * [`LedgerDatabase`] stores the contribution ledger, group memberships and the shadow copies of gateway records.
//!   It is the only place a ledger row is written, and the [`crate::ContributionApi`] is its only writer.
//! * [`AuditLog`] is the append-only record of administrative actions taken against a transaction.
//! * [`PaymentGateway`] is the third-party payment processor. Orders are created there, and orders and payments are
//!   re-fetched from there before a checkout callback is trusted.
//!
//! [`ContributionDatabase`] is a convenience bound for backends that provide both storage traits.
mod audit_log;
mod ledger_database;
mod payment_gateway;

mod data_objects;

pub use audit_log::AuditLog;
pub use data_objects::{GatewayOrder, GatewayPayment, NewGatewayOrder, OfflineResolution};
pub use ledger_database::{LedgerDatabase, LedgerError};
pub use payment_gateway::{GatewayError, PaymentGateway};

/// A backend that can serve every ledger operation.
pub trait ContributionDatabase: LedgerDatabase + AuditLog {}

impl<T> ContributionDatabase for T where T: LedgerDatabase + AuditLog {}
