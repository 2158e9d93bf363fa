//! # Checkout callback signatures
//!
//! When a checkout completes, the gateway hands the client an order id, a payment id and a signature. The client
//! forwards all three to us. Since the client is not trusted, the signature has to be checked before anything else
//! happens with the callback.
//!
//! ## Message format
//!
//! The signature is an HMAC-SHA256 keyed with the gateway key secret, over the UTF-8 string
//!
//! ```text
//!    {order_id}|{payment_id}
//! ```
//!
//! encoded as lowercase hex. Verification requires an exact match and compares the digests in constant time.
use hmac::{Hmac, Mac};
use log::*;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_HEX_LEN: usize = 64;

fn mac_for(order_id: &str, payment_id: &str, secret: &str) -> Option<HmacSha256> {
    // HMAC accepts keys of any length, so this is always `Some`.
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    Some(mac)
}

/// The signature the gateway produces for the given order and payment ids, as lowercase hex.
pub fn compute_payment_signature(order_id: &str, payment_id: &str, secret: &str) -> String {
    mac_for(order_id, payment_id, secret).map(|mac| hex::encode(mac.finalize().into_bytes())).unwrap_or_default()
}

/// Returns true iff `signature` is exactly the lowercase hex signature for the given order and payment ids.
pub fn verify_payment_signature(order_id: &str, payment_id: &str, signature: &str, secret: &str) -> bool {
    let is_lower_hex = signature.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
    if signature.len() != SIGNATURE_HEX_LEN || !is_lower_hex {
        debug!("🔐️ Signature for {order_id}|{payment_id} is not a lowercase hex digest");
        return false;
    }
    let (Ok(supplied), Some(mac)) = (hex::decode(signature), mac_for(order_id, payment_id, secret)) else {
        return false;
    };
    let valid = mac.verify_slice(&supplied).is_ok();
    if !valid {
        debug!("🔐️ Signature mismatch for {order_id}|{payment_id}");
    }
    valid
}
