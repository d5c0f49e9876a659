//! Ethereum-like ABI codec driven by runtime type descriptions.

mod function;
mod param_type;
mod sink;
mod stream;
#[cfg(test)]
mod tests;
pub mod util;

use oasis_types::{Address, U256};

pub use self::{
    function::{ContractAbi, FunctionDescriptor},
    param_type::TypeTag,
    sink::Sink,
    stream::Stream,
};

/// A decoded ABI value. Integers are kept as raw 256-bit words;
/// `Int` words are two's complement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbiValue {
    Uint(U256),
    Int(U256),
    Address(Address),
    Bool(bool),
    FixedBytes(Vec<u8>),
    Bytes(Vec<u8>),
    String(String),
    Array(Vec<AbiValue>),
}

impl AbiValue {
    pub fn int(value: i64) -> Self {
        AbiValue::Int(util::i64_to_word(value))
    }

    pub fn uint(value: u64) -> Self {
        AbiValue::Uint(U256::from(value))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AbiValue::Uint(_) => "uint",
            AbiValue::Int(_) => "int",
            AbiValue::Address(_) => "address",
            AbiValue::Bool(_) => "bool",
            AbiValue::FixedBytes(_) => "fixed bytes",
            AbiValue::Bytes(_) => "bytes",
            AbiValue::String(_) => "string",
            AbiValue::Array(_) => "array",
        }
    }
}
