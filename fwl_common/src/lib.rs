mod paisa;

pub mod helpers;
pub mod op;
mod secret;

pub use paisa::{Paisa, PaisaConversionError, DEFAULT_CURRENCY_CODE};
pub use secret::Secret;
