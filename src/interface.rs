use crate::{abi::FunctionDescriptor, dispatch::ContractProxy, value::NativeType};

/// How a method hands its result back to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReturnShape {
    /// Submitted as a transaction without waiting for the outcome.
    Void,
    /// Submitted as a transaction; the result is delivered once it is mined.
    Future(NativeType),
    /// Executed as a read-only call; the caller blocks for the result.
    Value(NativeType),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: String,
    pub params: Vec<NativeType>,
    pub returns: ReturnShape,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>, params: Vec<NativeType>, returns: ReturnShape) -> Self {
        Self {
            name: name.into(),
            params,
            returns,
        }
    }

    /// The ABI function this method calls: the first one with exactly this
    /// name, else the first whose name differs only in ASCII case.
    pub fn resolve<'f>(
        &self,
        functions: &'f [FunctionDescriptor],
    ) -> Option<&'f FunctionDescriptor> {
        functions
            .iter()
            .find(|f| f.name == self.name)
            .or_else(|| {
                functions
                    .iter()
                    .find(|f| f.name.eq_ignore_ascii_case(&self.name))
            })
    }
}

/// The methods a caller expects a contract to expose.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfaceDescriptor {
    name: String,
    methods: Vec<MethodDescriptor>,
}

impl InterfaceDescriptor {
    pub fn new(name: impl Into<String>, methods: Vec<MethodDescriptor>) -> Self {
        Self {
            name: name.into(),
            methods,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// A typed view of a contract. Usually generated with `contract_interface!`.
pub trait Interface: Sized {
    fn descriptor() -> InterfaceDescriptor;

    fn from_proxy(proxy: ContractProxy) -> Self;

    fn proxy(&self) -> &ContractProxy;
}
