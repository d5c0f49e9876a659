//! Typed proxies for contracts deployed on an Ethereum-like chain.
//!
//! An interface declared with [`contract_interface!`] is bound to a contract's
//! JSON ABI at an address. Each method call is then converted to ABI values,
//! dispatched as a transaction or a read-only call, and its outputs are
//! converted back into the declared return type.

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

pub mod abi;
mod binding;
mod compiler;
pub mod convert;
mod dispatch;
mod errors;
mod facade;
mod interface;
mod macros;
mod registry;
pub mod value;

#[doc(hidden)]
pub mod reexports {
    pub extern crate lazy_static;
}

pub use blockchain_traits::{BlockId, Blockchain};
pub use oasis_types::{Account, Address, Balance, U256};

pub use crate::{
    abi::{AbiValue, ContractAbi, FunctionDescriptor, TypeTag},
    binding::{CallParams, ContractBinding, PendingCall},
    compiler::{CompilationResult, Compiler, ContractMetadata, Solc, SoliditySource},
    dispatch::{ContractProxy, DispatchTable, Dispatched, Dispatcher},
    errors::{AbiError, Error, Result},
    facade::{Facade, FacadeBuilder},
    interface::{Interface, InterfaceDescriptor, MethodDescriptor, ReturnShape},
    registry::{BindingKey, BindingRegistry, ProxyId},
    value::{Bytes, CompositeSchema, EnumSchema, Native, NativeType, Value},
};
