use ckb_assembler_types::InputCellProvider;
use ckb_crypto::secp::Privkey;
use std::{any::Any, fmt, sync::Arc};

/// What the caller hands to the signers of one `sign_transaction` call.
///
/// Every field is optional. Signers which need a missing capability fail, signers which only
/// need the key skip the groups they cannot sign.
#[derive(Clone, Default)]
pub struct SignContext {
    key: Option<Arc<Privkey>>,
    input_cells: Option<Arc<dyn InputCellProvider>>,
    payload: Option<Arc<dyn Any + Send + Sync>>,
}

impl SignContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, key: Privkey) -> Self {
        self.key = Some(Arc::new(key));
        self
    }

    /// Lets signers look up the cells consumed by the transaction.
    pub fn with_input_cells<P: InputCellProvider + 'static>(mut self, input_cells: P) -> Self {
        self.input_cells = Some(Arc::new(input_cells));
        self
    }

    /// Attaches a value for custom signers.
    pub fn with_payload<T: Any + Send + Sync>(mut self, payload: T) -> Self {
        self.payload = Some(Arc::new(payload));
        self
    }

    pub fn key(&self) -> Option<&Privkey> {
        self.key.as_deref()
    }

    pub fn input_cells(&self) -> Option<&dyn InputCellProvider> {
        self.input_cells.as_deref()
    }

    /// The payload if it is a `T`.
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload
            .as_deref()
            .and_then(|payload| payload.downcast_ref::<T>())
    }
}

impl fmt::Debug for SignContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignContext")
            .field("key", &self.key.is_some())
            .field("input_cells", &self.input_cells.is_some())
            .field("payload", &self.payload.is_some())
            .finish()
    }
}
