use std::{
    fmt,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use blockchain_traits::{BlockId, Blockchain, Transaction};
use futures::future::{self, BoxFuture, FutureExt};
use oasis_types::{Account, Address, Balance};

use crate::{
    abi::{AbiValue, FunctionDescriptor},
    errors::{Error, Result},
};

/// Transaction parameters applied to every dispatched call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallParams {
    pub value: Balance,
    pub gas: u64,
    pub gas_price: u64,
    /// The block read-only calls execute against.
    pub block: BlockId,
}

impl Default for CallParams {
    fn default() -> Self {
        Self {
            value: Balance(0),
            gas: 4_000_000,
            gas_price: 0,
            block: BlockId::Latest,
        }
    }
}

/// The eventual result of a submitted transaction.
///
/// The transaction itself is already submitted; dropping a `PendingCall`
/// only discards the result.
#[must_use = "futures do nothing unless polled"]
pub struct PendingCall<T> {
    inner: BoxFuture<'static, Result<T>>,
}

impl<T: 'static> PendingCall<T> {
    pub fn new<F>(fut: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        Self { inner: fut.boxed() }
    }

    pub fn ready(result: Result<T>) -> Self
    where
        T: Send,
    {
        Self::new(future::ready(result))
    }

    /// Applies `f` to the result once it is available.
    pub fn and_then<U, F>(self, f: F) -> PendingCall<U>
    where
        U: 'static,
        F: FnOnce(T) -> Result<U> + Send + 'static,
    {
        PendingCall::new(self.inner.map(|result| result.and_then(f)))
    }
}

impl<T> Future for PendingCall<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context) -> Poll<Self::Output> {
        self.inner.as_mut().poll(cx)
    }
}

impl<T> fmt::Debug for PendingCall<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PendingCall").finish()
    }
}

/// A contract's functions at an address, as seen by one caller.
pub struct ContractBinding {
    address: Address,
    caller: Account,
    functions: Vec<FunctionDescriptor>,
    chain: Arc<dyn Blockchain>,
}

impl ContractBinding {
    pub fn new(
        chain: Arc<dyn Blockchain>,
        functions: Vec<FunctionDescriptor>,
        address: Address,
        caller: Account,
    ) -> Self {
        Self {
            address,
            caller,
            functions,
            chain,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn caller(&self) -> &Account {
        &self.caller
    }

    pub fn functions(&self) -> &[FunctionDescriptor] {
        &self.functions
    }

    pub fn function(&self, name: &str) -> Result<&FunctionDescriptor> {
        self.functions
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| Error::BindingNotFound {
                interface: format!("contract at {}", self.address),
                method: name.to_string(),
            })
    }

    /// Submits a transaction calling `name`. The returned future resolves
    /// to the decoded outputs once the transaction is mined.
    pub fn call_function(
        &self,
        name: &str,
        args: &[AbiValue],
        params: &CallParams,
    ) -> Result<PendingCall<Vec<AbiValue>>> {
        let function = self.function(name)?.clone();
        let input = function.encode_call(args)?;
        debug!("submitting `{}` to {}", function.signature(), self.address);
        let receipt = self.chain.submit_transaction(Transaction {
            sender: self.caller,
            callee: self.address,
            value: params.value,
            input,
            gas: params.gas,
            gas_price: params.gas_price,
        });
        Ok(PendingCall::new(receipt.map(move |receipt| -> Result<_> {
            let receipt = receipt?;
            Ok(function.decode_output(&receipt.output)?)
        })))
    }

    /// Executes `name` without a transaction and decodes its outputs.
    pub fn call_const_function(
        &self,
        name: &str,
        args: &[AbiValue],
        at: BlockId,
    ) -> Result<Vec<AbiValue>> {
        let function = self.function(name)?;
        let input = function.encode_call(args)?;
        trace!("calling `{}` on {} at {:?}", function.signature(), self.address, at);
        let output = self
            .chain
            .execute_read_only(&self.address, &input, &self.caller, at)?;
        Ok(function.decode_output(&output)?)
    }
}

impl fmt::Debug for ContractBinding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ContractBinding")
            .field("address", &self.address)
            .field("caller", &self.caller)
            .field("functions", &self.functions)
            .finish()
    }
}
