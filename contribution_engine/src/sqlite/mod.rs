//! SQLite backend for the contribution ledger.
//!
//! Migrations are embedded in the binary and can be applied with [`SqliteDatabase::migrate`].
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
