#![allow(dead_code)]

use std::sync::Arc;

use memchain::{AccountState, CallContext, ExecResult, Memchain, Program, State};
use oasis_proxy::{
    abi::util, AbiValue, Account, Address, CallParams, ContractAbi, Facade, FunctionDescriptor,
    U256,
};

type Handler =
    Box<dyn Fn(&mut CallContext, Vec<AbiValue>) -> Result<Vec<AbiValue>, Vec<u8>> + Send + Sync>;

/// A contract whose functions are Rust closures over decoded ABI values.
pub struct MockContract {
    functions: Vec<(FunctionDescriptor, Handler)>,
}

impl MockContract {
    pub fn new() -> Self {
        Self {
            functions: Vec::new(),
        }
    }

    pub fn on<F>(mut self, abi: &ContractAbi, name: &str, handler: F) -> Self
    where
        F: Fn(&mut CallContext, Vec<AbiValue>) -> Result<Vec<AbiValue>, Vec<u8>>
            + Send
            + Sync
            + 'static,
    {
        let function = abi
            .functions()
            .unwrap()
            .into_iter()
            .find(|f| f.name == name)
            .unwrap_or_else(|| panic!("no function `{}` in ABI", name));
        self.functions.push((function, Box::new(handler)));
        self
    }
}

impl Program for MockContract {
    fn call(&self, ctx: &mut CallContext) -> ExecResult {
        let input = ctx.input().to_vec();
        let (function, handler) = self
            .functions
            .iter()
            .find(|(f, _)| input.len() >= 4 && input[..4] == f.selector())
            .ok_or_else(|| b"unknown selector".to_vec())?;
        let args = function
            .decode_input(&input)
            .map_err(|e| e.to_string().into_bytes())?;
        let outputs = handler(ctx, args)?;
        function
            .encode_output(&outputs)
            .map_err(|e| e.to_string().into_bytes())
    }
}

pub fn store(ctx: &mut CallContext, key: &str, word: U256) {
    ctx.set(key.as_bytes().to_vec(), util::word_to_bytes(word).to_vec());
}

pub fn load(ctx: &CallContext, key: &str) -> U256 {
    ctx.get(key.as_bytes())
        .map(U256::from_big_endian)
        .unwrap_or_default()
}

pub fn caller() -> Account {
    Account::new(Address([0x11; 20]))
}

pub fn other_caller() -> Account {
    Account::new(Address([0x22; 20]))
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub struct Harness {
    pub chain: Arc<Memchain>,
    pub facade: Facade,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_params(CallParams::default())
    }

    pub fn with_params(params: CallParams) -> Self {
        init_logger();
        let mut genesis = State::new();
        genesis.insert(caller().address(), AccountState::with_balance(1_000u128));
        let chain = Arc::new(Memchain::new(genesis));
        let facade = Facade::builder(chain.clone()).call_params(params).build();
        Self { chain, facade }
    }

    /// Installs `program` at `address` under a code blob unique to that address.
    pub fn deploy<P: Program + 'static>(&self, address: Address, program: P) -> Address {
        let mut code = b"mock:".to_vec();
        code.extend_from_slice(address.as_ref());
        self.chain.install(&code, program);
        assert!(self
            .chain
            .create_account(address, AccountState::with_code(code)));
        address
    }
}
