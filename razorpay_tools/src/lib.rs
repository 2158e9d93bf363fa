//! A small typed client for the Razorpay orders and payments REST API.
//!
//! Only the calls needed to take a contribution are covered: creating an order, and re-fetching orders and payments
//! so that a checkout callback can be checked against the gateway's own records.
mod api;
mod config;
mod error;

mod data_objects;
pub mod helpers;

pub use api::RazorpayApi;
pub use config::RazorpayConfig;
pub use data_objects::{NewRazorpayOrder, RazorpayOrder, RazorpayPayment};
pub use error::RazorpayApiError;
