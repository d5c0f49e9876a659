//! An in-memory blockchain with Ethereum-like semantics.
//!
//! Transactions are applied to the tip state as soon as they are submitted.
//! Their receipts are held back until the enclosing block is sealed with
//! [`Memchain::mine`], or sealed right away when auto-mining is enabled.

#[macro_use]
extern crate log;

mod block;
mod program;

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use blockchain_traits::{BlockId, Blockchain, PendingTransaction, Receipt, Transaction, TxError};
use futures::{channel::oneshot, FutureExt as _};
use oasis_types::{Account, Address, Balance, H256};

pub use block::{AccountState, Block, State};
pub use program::{CallContext, ExecResult, Program};

const BASE_GAS: u64 = 21_000;

pub struct Memchain {
    inner: Mutex<Chain>,
}

struct Chain {
    blocks: Vec<Block>, // There is always at least the genesis block.
    state: State,
    pending: Vec<PendingReceipt>,
    programs: HashMap<H256, Arc<dyn Program>>,
    auto_mine: bool,
}

struct PendingReceipt {
    receipt: Receipt,
    outcome: Result<(), TxError>,
    notify: oneshot::Sender<Result<Receipt, TxError>>,
}

impl Memchain {
    /// Creates a chain whose genesis block holds `genesis_state`.
    /// Auto-mining is enabled.
    pub fn new(genesis_state: State) -> Self {
        let genesis = Block::new(0, genesis_state.clone(), Vec::new());
        Self {
            inner: Mutex::new(Chain {
                blocks: vec![genesis],
                state: genesis_state,
                pending: Vec::new(),
                programs: HashMap::new(),
                auto_mine: true,
            }),
        }
    }

    pub fn with_auto_mine(self, auto_mine: bool) -> Self {
        self.set_auto_mine(auto_mine);
        self
    }

    /// When disabled, receipts are only delivered by [`Memchain::mine`].
    pub fn set_auto_mine(&self, auto_mine: bool) {
        self.lock().auto_mine = auto_mine;
    }

    /// Makes `program` the logic behind every account whose code is `code`.
    pub fn install<P: Program + 'static>(&self, code: impl AsRef<[u8]>, program: P) {
        let code_hash = code_hash(code.as_ref());
        debug!("installing program for code hash {:?}", code_hash);
        self.lock().programs.insert(code_hash, Arc::new(program));
    }

    /// Returns `false` if an account already exists at `address`.
    pub fn create_account(&self, address: Address, account: AccountState) -> bool {
        let mut chain = self.lock();
        if chain.state.contains_key(&address) {
            return false;
        }
        chain.state.insert(address, account);
        true
    }

    pub fn account(&self, address: &Address) -> Option<AccountState> {
        self.lock().state.get(address).cloned()
    }

    pub fn balance(&self, address: &Address) -> Balance {
        self.account(address)
            .map(|acct| acct.balance)
            .unwrap_or_default()
    }

    pub fn block(&self, number: u64) -> Option<Block> {
        self.lock().blocks.get(number as usize).cloned()
    }

    /// Returns the number of submitted transactions whose receipts await mining.
    pub fn pending_count(&self) -> usize {
        self.lock().pending.len()
    }

    /// Seals all pending transactions into a new block, resolves their
    /// receipts, and returns the new block number.
    pub fn mine(&self) -> u64 {
        self.lock().seal()
    }

    fn lock(&self) -> MutexGuard<Chain> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn enqueue(
        &self,
        apply: impl FnOnce(&mut Chain) -> (Receipt, Result<(), TxError>),
    ) -> PendingTransaction {
        let (notify, receipt_rx) = oneshot::channel();
        {
            let mut chain = self.lock();
            let (receipt, outcome) = apply(&mut chain);
            chain.pending.push(PendingReceipt {
                receipt,
                outcome,
                notify,
            });
            if chain.auto_mine {
                chain.seal();
            }
        }
        receipt_rx
            .map(|received| received.unwrap_or(Err(TxError::Dropped)))
            .boxed()
    }
}

impl Default for Memchain {
    fn default() -> Self {
        Self::new(State::new())
    }
}

impl Chain {
    fn next_block_number(&self) -> u64 {
        self.blocks.len() as u64
    }

    fn program_for(&self, code: &[u8]) -> Option<Arc<dyn Program>> {
        if code.is_empty() {
            return None;
        }
        self.programs.get(&code_hash(code)).cloned()
    }

    /// Bumps the sender nonce, creating the sender account if needed, and
    /// returns the nonce used by this transaction.
    fn bump_nonce(&mut self, sender: Address) -> u64 {
        let acct = self.state.entry(sender).or_default();
        acct.nonce += 1;
        acct.nonce - 1
    }

    fn debit(&mut self, sender: Address, value: Balance) -> Result<(), TxError> {
        if value.is_zero() {
            return Ok(());
        }
        match self.state.get_mut(&sender) {
            Some(acct) if acct.balance >= value => {
                acct.balance -= value;
                Ok(())
            }
            _ => Err(TxError::InsufficientFunds),
        }
    }

    fn transact(&mut self, tx: Transaction) -> (Receipt, Result<(), TxError>) {
        let sender = tx.sender.address();
        let nonce = self.bump_nonce(sender);
        let mut receipt = Receipt {
            tx_hash: tx_hash(&sender, nonce, &tx.input),
            block_number: self.next_block_number(),
            sender,
            callee: Some(tx.callee),
            contract_address: None,
            gas_used: 0,
            output: Vec::new(),
        };

        if tx.gas < BASE_GAS {
            return (receipt, Err(TxError::OutOfGas));
        }
        receipt.gas_used = BASE_GAS;

        let (code, storage) = match self.state.get(&tx.callee) {
            Some(acct) => (acct.code.clone(), acct.storage.clone()),
            None => return (receipt, Err(TxError::NoCallee(tx.callee))),
        };
        let program = match self.program_for(&code) {
            Some(program) => Some(program),
            None if tx.input.is_empty() => None, // plain value transfer
            None => return (receipt, Err(TxError::NoCode(tx.callee))),
        };

        if let Err(e) = self.debit(sender, tx.value) {
            return (receipt, Err(e));
        }

        let mut ctx = CallContext::new(sender, tx.callee, tx.value, tx.input, storage, false);
        let result = match program {
            Some(program) => program.call(&mut ctx),
            None => Ok(Vec::new()),
        };

        match result {
            Ok(output) => {
                let callee = self.state.entry(tx.callee).or_default();
                callee.balance += tx.value;
                callee.storage = ctx.into_storage();
                receipt.output = output;
                (receipt, Ok(()))
            }
            Err(output) => {
                // Refund; storage writes live only in the dropped context.
                if let Some(acct) = self.state.get_mut(&sender) {
                    acct.balance += tx.value;
                }
                receipt.output = output.clone();
                (receipt, Err(TxError::Reverted { output }))
            }
        }
    }

    fn create(
        &mut self,
        sender: &Account,
        code: Vec<u8>,
        value: Balance,
    ) -> (Receipt, Result<(), TxError>) {
        let sender = sender.address();
        let nonce = self.bump_nonce(sender);
        let address = contract_address(&sender, nonce);
        let mut receipt = Receipt {
            tx_hash: tx_hash(&sender, nonce, &code),
            block_number: self.next_block_number(),
            sender,
            callee: None,
            contract_address: Some(address),
            gas_used: BASE_GAS,
            output: Vec::new(),
        };

        if let Err(e) = self.debit(sender, value) {
            receipt.contract_address = None;
            return (receipt, Err(e));
        }

        self.state.insert(
            address,
            AccountState {
                balance: value,
                code,
                ..Default::default()
            },
        );
        (receipt, Ok(()))
    }

    fn seal(&mut self) -> u64 {
        let number = self.next_block_number();
        let pending = std::mem::replace(&mut self.pending, Vec::new());
        let mut receipts = Vec::with_capacity(pending.len());

        for PendingReceipt {
            mut receipt,
            outcome,
            notify,
        } in pending
        {
            receipt.block_number = number;
            let result = match outcome {
                Ok(()) => Ok(receipt.clone()),
                Err(e) => {
                    warn!("transaction {:?} failed: {}", receipt.tx_hash, e);
                    Err(e)
                }
            };
            receipts.push(receipt);
            // The submitter may have dropped its end.
            let _ = notify.send(result);
        }

        info!("sealed block {} with {} transactions", number, receipts.len());
        self.blocks.push(Block::new(number, self.state.clone(), receipts));
        number
    }
}

impl Blockchain for Memchain {
    fn publish(&self, sender: &Account, code: Vec<u8>, value: Balance) -> PendingTransaction {
        self.enqueue(|chain| chain.create(sender, code, value))
    }

    fn submit_transaction(&self, tx: Transaction) -> PendingTransaction {
        debug!("submitting transaction from {} to {}", tx.sender, tx.callee);
        self.enqueue(|chain| chain.transact(tx))
    }

    fn execute_read_only(
        &self,
        callee: &Address,
        input: &[u8],
        sender: &Account,
        at: BlockId,
    ) -> Result<Vec<u8>, TxError> {
        let chain = self.lock();
        let state = match at {
            BlockId::Latest => &chain.state,
            BlockId::Number(number) => chain
                .blocks
                .get(number as usize)
                .map(Block::state)
                .ok_or(TxError::InvalidBlock(number))?,
        };
        let acct = state.get(callee).ok_or(TxError::NoCallee(*callee))?;
        let program = chain
            .program_for(&acct.code)
            .ok_or(TxError::NoCode(*callee))?;

        let mut ctx = CallContext::new(
            sender.address(),
            *callee,
            Balance::default(),
            input.to_vec(),
            acct.storage.clone(),
            true,
        );
        program
            .call(&mut ctx)
            .map_err(|output| TxError::Reverted { output })
    }

    fn block_number(&self) -> u64 {
        self.lock().next_block_number() - 1
    }
}

fn code_hash(code: &[u8]) -> H256 {
    H256::from(tiny_keccak::keccak256(code))
}

fn tx_hash(sender: &Address, nonce: u64, payload: &[u8]) -> H256 {
    let mut preimage = Vec::with_capacity(Address::size() + 8 + payload.len());
    preimage.extend_from_slice(sender.as_ref());
    preimage.extend_from_slice(&nonce.to_be_bytes());
    preimage.extend_from_slice(payload);
    H256::from(tiny_keccak::keccak256(&preimage))
}

fn contract_address(sender: &Address, nonce: u64) -> Address {
    let mut preimage = [0u8; 28];
    preimage[..20].copy_from_slice(sender.as_ref());
    preimage[20..].copy_from_slice(&nonce.to_be_bytes());
    let hash = tiny_keccak::keccak256(&preimage);
    let mut addr = Address::zero();
    addr.0.copy_from_slice(&hash[12..]);
    addr
}
