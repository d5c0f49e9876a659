use std::collections::HashMap;

use oasis_types::{Address, Balance};

/// `Ok` carries the return data; `Err` carries revert data and rolls back
/// every storage write made during the call.
pub type ExecResult = Result<Vec<u8>, Vec<u8>>;

/// Executable contract logic installed against a bytecode blob.
pub trait Program: Send + Sync {
    fn call(&self, ctx: &mut CallContext) -> ExecResult;
}

impl<F> Program for F
where
    F: Fn(&mut CallContext) -> ExecResult + Send + Sync,
{
    fn call(&self, ctx: &mut CallContext) -> ExecResult {
        self(ctx)
    }
}

/// The environment of a single contract call.
pub struct CallContext {
    sender: Address,
    address: Address,
    value: Balance,
    input: Vec<u8>,
    storage: HashMap<Vec<u8>, Vec<u8>>,
    read_only: bool,
}

impl CallContext {
    pub(crate) fn new(
        sender: Address,
        address: Address,
        value: Balance,
        input: Vec<u8>,
        storage: HashMap<Vec<u8>, Vec<u8>>,
        read_only: bool,
    ) -> Self {
        Self {
            sender,
            address,
            value,
            input,
            storage,
            read_only,
        }
    }

    pub fn sender(&self) -> Address {
        self.sender
    }

    /// Returns the address of the executing contract.
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn value(&self) -> Balance {
        self.value
    }

    pub fn input(&self) -> &[u8] {
        &self.input
    }

    /// Whether this call runs outside of a transaction. Writes made by a
    /// read-only call are discarded.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        self.storage.contains_key(key)
    }

    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.storage.get(key).map(Vec::as_slice)
    }

    /// Overwrites any existing data stored under `key`.
    pub fn set(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.storage.insert(key, value);
    }

    pub(crate) fn into_storage(self) -> HashMap<Vec<u8>, Vec<u8>> {
        self.storage
    }
}
