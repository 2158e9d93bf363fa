//! # Farewell Contributions Ledger server
//!
//! This crate hosts the HTTP API for the contribution ledger. It is responsible for:
//! * Establishing the caller's identity from a bearer token.
//! * Unpacking requests and handing them to the [`contribution_engine::ContributionApi`].
//! * Wiring the Razorpay client into the engine as its payment gateway.
//! * Mapping engine errors onto HTTP status codes.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/razorpay/create-order` and `/api/razorpay/verify-and-capture`: online checkout.
//! * `/api/contributions/*`: offline contributions, admin review, history and the audit trail.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
