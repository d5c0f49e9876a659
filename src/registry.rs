use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
    },
};

use blockchain_traits::Blockchain;
use oasis_types::{Account, Address};

use crate::{
    abi::FunctionDescriptor,
    binding::ContractBinding,
    errors::{Error, Result},
    interface::InterfaceDescriptor,
};

static NEXT_PROXY_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one proxy instance for the lifetime of the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProxyId(u64);

impl ProxyId {
    pub fn next() -> Self {
        ProxyId(NEXT_PROXY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BindingKey {
    pub proxy: ProxyId,
    pub address: Address,
    pub caller: Account,
}

/// The bindings of all live proxies, shared by concurrent callers.
pub struct BindingRegistry {
    chain: Arc<dyn Blockchain>,
    bindings: RwLock<HashMap<BindingKey, Arc<ContractBinding>>>,
}

impl BindingRegistry {
    pub fn new(chain: Arc<dyn Blockchain>) -> Self {
        Self {
            chain,
            bindings: RwLock::new(HashMap::new()),
        }
    }

    /// Verifies `interface` against `functions` and records the binding.
    /// Registering an existing key replaces its binding.
    pub fn register(
        &self,
        proxy: ProxyId,
        interface: &InterfaceDescriptor,
        functions: Vec<FunctionDescriptor>,
        address: Address,
        caller: Account,
    ) -> Result<BindingKey> {
        verify(interface, &functions)?;
        let key = BindingKey {
            proxy,
            address,
            caller,
        };
        let binding = Arc::new(ContractBinding::new(
            Arc::clone(&self.chain),
            functions,
            address,
            caller,
        ));
        if self.write().insert(key, binding).is_some() {
            debug!("replaced binding of `{}` at {}", interface.name(), address);
        } else {
            info!(
                "bound `{}` to {} for {}",
                interface.name(),
                address,
                caller
            );
        }
        Ok(key)
    }

    pub fn unregister(&self, key: &BindingKey) -> Option<Arc<ContractBinding>> {
        let removed = self.write().remove(key);
        if removed.is_some() {
            debug!("unbound {} for {}", key.address, key.caller);
        }
        removed
    }

    pub fn lookup(&self, key: &BindingKey) -> Result<Arc<ContractBinding>> {
        self.read().get(key).cloned().ok_or_else(|| {
            Error::ContractNotFound(format!("{} at {}", key.caller, key.address))
        })
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<HashMap<BindingKey, Arc<ContractBinding>>> {
        self.bindings.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<HashMap<BindingKey, Arc<ContractBinding>>> {
        self.bindings.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Checks that every interface method names an ABI function and that
/// parameter counts agree.
pub fn verify(interface: &InterfaceDescriptor, functions: &[FunctionDescriptor]) -> Result<()> {
    let paired: Vec<_> = interface
        .methods()
        .iter()
        .map(|m| (m, m.resolve(functions)))
        .collect();
    let superfluous: Vec<String> = paired
        .iter()
        .filter(|(_, function)| function.is_none())
        .map(|(m, _)| m.name.clone())
        .collect();
    if !superfluous.is_empty() {
        return Err(Error::SuperfluousMethod {
            interface: interface.name().to_string(),
            methods: superfluous,
        });
    }

    for (method, function) in paired {
        if let Some(function) = function {
            if method.params.len() != function.inputs.len() {
                return Err(Error::ParameterCountMismatch {
                    function: function.name.clone(),
                    abi: function.inputs.len(),
                    interface: method.params.len(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::{
        abi::TypeTag,
        interface::{MethodDescriptor, ReturnShape},
        value::NativeType,
    };

    fn function(name: &str, inputs: usize) -> FunctionDescriptor {
        FunctionDescriptor::new(name, vec![TypeTag::Int(256); inputs], vec![], true)
    }

    fn interface(methods: &[(&str, usize)]) -> InterfaceDescriptor {
        InterfaceDescriptor::new(
            "Test",
            methods
                .iter()
                .map(|(name, params)| {
                    MethodDescriptor::new(*name, vec![NativeType::Long; *params], ReturnShape::Void)
                })
                .collect(),
        )
    }

    #[test]
    fn names_match_ignoring_case() {
        let functions = vec![function("getValue", 0), function("setValue", 1)];
        assert!(verify(&interface(&[("getvalue", 0), ("setValue", 1)]), &functions).is_ok());
        assert!(verify(&interface(&[]), &functions).is_ok());
    }

    #[test]
    fn exact_names_take_precedence() {
        let functions = vec![function("getValue", 0), function("GetValue", 2)];
        assert!(verify(&interface(&[("GetValue", 2)]), &functions).is_ok());
        assert!(verify(&interface(&[("getValue", 0)]), &functions).is_ok());
        match verify(&interface(&[("getvalue", 2)]), &functions) {
            Err(Error::ParameterCountMismatch { function, .. }) => assert_eq!(function, "getValue"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn missing_functions_are_reported() {
        let functions = vec![function("foo", 0)];
        match verify(&interface(&[("foo", 0), ("bar", 0), ("baz", 1)]), &functions) {
            Err(Error::SuperfluousMethod { interface, methods }) => {
                assert_eq!(interface, "Test");
                assert_eq!(methods, vec!["bar".to_string(), "baz".to_string()]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn parameter_counts_must_agree() {
        let functions = vec![function("foo", 2)];
        match verify(&interface(&[("foo", 1)]), &functions) {
            Err(Error::ParameterCountMismatch {
                function,
                abi,
                interface,
            }) => {
                assert_eq!(function, "foo");
                assert_eq!((abi, interface), (2, 1));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn proxy_ids_are_unique() {
        let ids: HashSet<ProxyId> = (0..16).map(|_| ProxyId::next()).collect();
        assert_eq!(ids.len(), 16);
    }
}
