mod payment_signature;

pub use payment_signature::{compute_payment_signature, verify_payment_signature};
