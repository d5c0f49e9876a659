use std::{collections::HashMap, fmt, sync::Arc};

use blockchain_traits::Blockchain;
use oasis_types::{Account, Address};

use crate::{
    abi::FunctionDescriptor,
    binding::{CallParams, ContractBinding, PendingCall},
    convert,
    errors::{Error, Result},
    interface::{InterfaceDescriptor, ReturnShape},
    registry::{BindingKey, BindingRegistry, ProxyId},
    value::{Native, Value},
};

/// The outcome of invoking a proxy method, according to its return shape.
#[derive(Debug)]
pub enum Dispatched {
    /// A transaction was submitted and its outcome will not be reported.
    Sent,
    /// A transaction was submitted; the converted result follows when it is mined.
    Pending(PendingCall<Value>),
    /// A read-only call completed.
    Returned(Value),
}

type Handler =
    Box<dyn Fn(&ContractBinding, Vec<Value>, &CallParams) -> Result<Dispatched> + Send + Sync>;

/// Per-method call plans, resolved once when a proxy is bound.
pub struct DispatchTable {
    interface: String,
    handlers: HashMap<String, Handler>,
}

impl DispatchTable {
    fn build(interface: &InterfaceDescriptor, functions: &[FunctionDescriptor]) -> Self {
        let mut handlers = HashMap::new();
        for method in interface.methods() {
            if let Some(function) = method.resolve(functions) {
                if !function.mutating {
                    if let ReturnShape::Future(_) = method.returns {
                        warn!(
                            "`{}.{}` submits a transaction to read-only function `{}`",
                            interface.name(),
                            method.name,
                            function.name
                        );
                    }
                } else if let ReturnShape::Value(_) = method.returns {
                    warn!(
                        "`{}.{}` makes a read-only call to state-changing function `{}`",
                        interface.name(),
                        method.name,
                        function.name
                    );
                }
                handlers.insert(
                    method.name.clone(),
                    plan(function.clone(), method.returns.clone()),
                );
            }
        }
        Self {
            interface: interface.name().to_string(),
            handlers,
        }
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }
}

impl fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("DispatchTable")
            .field("interface", &self.interface)
            .field("methods", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn plan(function: FunctionDescriptor, returns: ReturnShape) -> Handler {
    match returns {
        ReturnShape::Void => Box::new(
            move |binding: &ContractBinding, args: Vec<Value>, params: &CallParams| {
                let args = convert::convert_arguments(&function, args)?;
                // The transaction is already submitted; its receipt is not awaited.
                drop(binding.call_function(&function.name, &args, params)?);
                Ok(Dispatched::Sent)
            },
        ),
        ReturnShape::Future(target) => Box::new(
            move |binding: &ContractBinding, args: Vec<Value>, params: &CallParams| {
                let args = convert::convert_arguments(&function, args)?;
                let target = target.clone();
                let pending = binding.call_function(&function.name, &args, params)?;
                Ok(Dispatched::Pending(pending.and_then(move |raw| {
                    convert::convert_result(raw, &target)
                })))
            },
        ),
        ReturnShape::Value(target) => Box::new(
            move |binding: &ContractBinding, args: Vec<Value>, params: &CallParams| {
                let args = convert::convert_arguments(&function, args)?;
                let raw = binding.call_const_function(&function.name, &args, params.block)?;
                convert::convert_result(raw, &target).map(Dispatched::Returned)
            },
        ),
    }
}

/// Routes proxy invocations to their bindings.
pub struct Dispatcher {
    registry: BindingRegistry,
    params: CallParams,
}

impl Dispatcher {
    pub fn new(chain: Arc<dyn Blockchain>, params: CallParams) -> Self {
        Self {
            registry: BindingRegistry::new(chain),
            params,
        }
    }

    pub fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    pub fn params(&self) -> &CallParams {
        &self.params
    }

    /// Binds `interface` to the contract at `address` on behalf of `caller`.
    pub fn bind(
        self: &Arc<Self>,
        interface: &InterfaceDescriptor,
        functions: Vec<FunctionDescriptor>,
        address: Address,
        caller: Account,
    ) -> Result<ContractProxy> {
        let table = DispatchTable::build(interface, &functions);
        let key = self
            .registry
            .register(ProxyId::next(), interface, functions, address, caller)?;
        Ok(ContractProxy {
            key,
            table: Arc::new(table),
            dispatcher: Arc::clone(self),
        })
    }

    fn dispatch(
        &self,
        key: &BindingKey,
        table: &DispatchTable,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Dispatched> {
        let handler = table
            .handlers
            .get(method)
            .ok_or_else(|| Error::BindingNotFound {
                interface: table.interface.clone(),
                method: method.to_string(),
            })?;
        let binding = self.registry.lookup(key)?;
        debug!(
            "dispatching `{}.{}` to {}",
            table.interface,
            method,
            binding.address()
        );
        handler(&*binding, args, &self.params)
    }
}

/// A handle through which interface methods reach a bound contract.
#[derive(Clone)]
pub struct ContractProxy {
    key: BindingKey,
    table: Arc<DispatchTable>,
    dispatcher: Arc<Dispatcher>,
}

impl ContractProxy {
    pub fn key(&self) -> &BindingKey {
        &self.key
    }

    pub fn address(&self) -> Address {
        self.key.address
    }

    pub fn caller(&self) -> &Account {
        &self.key.caller
    }

    pub fn interface(&self) -> &str {
        self.table.interface()
    }

    pub fn invoke(&self, method: &str, args: Vec<Value>) -> Result<Dispatched> {
        self.dispatcher
            .dispatch(&self.key, &self.table, method, args)
    }

    /// Invokes a method whose result is available immediately.
    pub fn call<T: Native>(&self, method: &str, args: Vec<Value>) -> Result<T> {
        match self.invoke(method, args)? {
            Dispatched::Returned(value) => T::from_value(value),
            Dispatched::Sent => T::from_value(Value::Void),
            Dispatched::Pending(_) => Err(Error::ConversionError {
                native: format!("pending result of `{}`", method),
                target: T::native_type().to_string(),
            }),
        }
    }

    /// Invokes a method for its side effect only.
    pub fn send(&self, method: &str, args: Vec<Value>) -> Result<()> {
        self.invoke(method, args).map(drop)
    }

    /// Invokes a method whose result arrives later.
    pub fn submit<T: Native + Send + 'static>(
        &self,
        method: &str,
        args: Vec<Value>,
    ) -> Result<PendingCall<T>> {
        Ok(match self.invoke(method, args)? {
            Dispatched::Pending(pending) => pending.and_then(T::from_value),
            Dispatched::Returned(value) => PendingCall::ready(T::from_value(value)),
            Dispatched::Sent => PendingCall::ready(T::from_value(Value::Void)),
        })
    }

    /// Removes the binding. Later invocations fail with `ContractNotFound`.
    pub fn unregister(&self) -> bool {
        self.dispatcher.registry().unregister(&self.key).is_some()
    }
}

impl fmt::Debug for ContractProxy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ContractProxy")
            .field("interface", &self.table.interface)
            .field("address", &self.key.address)
            .field("caller", &self.key.caller)
            .finish()
    }
}
