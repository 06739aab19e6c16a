//! Transaction signer.
//!
//! [`TransactionSigner`] dispatches every script group of a built transaction to the
//! [`ScriptSigner`] registered for its script. A signer may read the whole transaction but only
//! writes the witnesses of its own group, through [`SigningTransaction`].

mod context;
mod error;
pub mod signer;
mod signing;

#[cfg(test)]
mod tests;

pub use context::SignContext;
pub use error::{SignerError, TransactionSignerError};
pub use signer::{ScriptSigner, TransactionSigner};
pub use signing::SigningTransaction;
