//! Types shared by the Vend Connect crates

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
