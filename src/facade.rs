use std::sync::Arc;

use blockchain_traits::{Blockchain, Receipt, TxError};
use futures::FutureExt;
use oasis_types::{Account, Address, Balance};

use crate::{
    abi::ContractAbi,
    binding::{CallParams, PendingCall},
    compiler::{CompilationResult, Compiler, Solc, SoliditySource},
    dispatch::{ContractProxy, Dispatcher},
    errors::{Error, Result},
    interface::{Interface, InterfaceDescriptor},
};

/// Entry point for deploying contracts and creating typed proxies.
pub struct Facade {
    chain: Arc<dyn Blockchain>,
    compiler: Arc<dyn Compiler>,
    dispatcher: Arc<Dispatcher>,
}

pub struct FacadeBuilder {
    chain: Arc<dyn Blockchain>,
    compiler: Option<Arc<dyn Compiler>>,
    call_params: CallParams,
}

impl FacadeBuilder {
    pub fn new(chain: Arc<dyn Blockchain>) -> Self {
        Self {
            chain,
            compiler: None,
            call_params: CallParams::default(),
        }
    }

    /// Defaults to `solc` on the `PATH`.
    pub fn compiler<C: Compiler + 'static>(mut self, compiler: C) -> Self {
        self.compiler = Some(Arc::new(compiler));
        self
    }

    pub fn call_params(mut self, call_params: CallParams) -> Self {
        self.call_params = call_params;
        self
    }

    pub fn build(self) -> Facade {
        let compiler = self
            .compiler
            .unwrap_or_else(|| Arc::new(Solc::default()) as Arc<dyn Compiler>);
        Facade {
            dispatcher: Arc::new(Dispatcher::new(Arc::clone(&self.chain), self.call_params)),
            chain: self.chain,
            compiler,
        }
    }
}

fn deployed_address(receipt: std::result::Result<Receipt, TxError>) -> Result<Address> {
    receipt?.contract_address.ok_or_else(|| {
        Error::ContractNotFound("deployment receipt without a contract address".to_string())
    })
}

impl Facade {
    pub fn builder(chain: Arc<dyn Blockchain>) -> FacadeBuilder {
        FacadeBuilder::new(chain)
    }

    pub fn chain(&self) -> &Arc<dyn Blockchain> {
        &self.chain
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn compile(&self, source: &SoliditySource) -> Result<CompilationResult> {
        self.compiler.compile(source)
    }

    /// Compiles `source` and deploys the contract called `name`.
    /// Resolves to the new contract's address once the deployment is mined.
    pub fn publish_contract(
        &self,
        source: &SoliditySource,
        name: &str,
        sender: &Account,
    ) -> Result<PendingCall<Address>> {
        let compiled = self.compile(source)?;
        let code = compiled.find(name)?.bytecode()?;
        info!("publishing `{}` from {}", name, sender);
        let receipt = self.chain.publish(sender, code, Balance::default());
        Ok(PendingCall::new(receipt.map(deployed_address)))
    }

    /// Compiles `source` and binds `I` to the contract called `name` at `address`.
    pub fn create_proxy<I: Interface>(
        &self,
        source: &SoliditySource,
        name: &str,
        address: Address,
        caller: &Account,
    ) -> Result<I> {
        let compiled = self.compile(source)?;
        let contract = compiled.find(name)?;
        self.create_proxy_from_abi(&contract.abi, address, caller)
    }

    pub fn create_proxy_from_abi<I: Interface>(
        &self,
        abi: &ContractAbi,
        address: Address,
        caller: &Account,
    ) -> Result<I> {
        self.bind(&I::descriptor(), abi, address, caller)
            .map(I::from_proxy)
    }

    /// Binds an interface described at runtime.
    pub fn bind(
        &self,
        interface: &InterfaceDescriptor,
        abi: &ContractAbi,
        address: Address,
        caller: &Account,
    ) -> Result<ContractProxy> {
        self.dispatcher
            .bind(interface, abi.functions()?, address, *caller)
    }
}
