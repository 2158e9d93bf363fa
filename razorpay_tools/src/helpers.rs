use chrono::Utc;

/// The receipt label used when the caller does not supply one: `rcpt_<unix millis>`.
pub fn default_receipt() -> String {
    format!("rcpt_{}", Utc::now().timestamp_millis())
}
