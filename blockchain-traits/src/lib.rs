use futures::future::BoxFuture;
use oasis_types::{Account, Address, Balance, H256};

/// A transaction awaiting confirmation. Resolves exactly once, when the
/// transaction is included in a block or definitively fails.
pub type PendingTransaction = BoxFuture<'static, Result<Receipt, TxError>>;

/// Interface for a blockchain that accepts transactions and executes
/// read-only calls on behalf of a calling identity.
///
/// Implementations must be shareable across threads: callers dispatch
/// concurrently and completion may be signaled from any thread.
pub trait Blockchain: Send + Sync {
    /// Deploys `code` as a new contract owned by `sender`.
    /// Upon confirmation, the receipt carries the address of the new contract.
    fn publish(&self, sender: &Account, code: Vec<u8>, value: Balance) -> PendingTransaction;

    /// Submits a state-changing transaction.
    ///
    /// Submission happens eagerly, before this function returns: dropping the
    /// returned future forgoes the receipt, not the transaction.
    fn submit_transaction(&self, tx: Transaction) -> PendingTransaction;

    /// Executes `input` against the contract at `callee` without committing
    /// any state change and returns the raw output.
    fn execute_read_only(
        &self,
        callee: &Address,
        input: &[u8],
        sender: &Account,
        at: BlockId,
    ) -> Result<Vec<u8>, TxError>;

    /// Returns the number of the most recently sealed block.
    fn block_number(&self) -> u64;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockId {
    Latest,
    Number(u64),
}

impl Default for BlockId {
    fn default() -> Self {
        BlockId::Latest
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub sender: Account,
    pub callee: Address,
    pub value: Balance,
    pub input: Vec<u8>,
    pub gas: u64,
    pub gas_price: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: H256,
    pub block_number: u64,
    pub sender: Address,
    /// `None` for contract creations.
    pub callee: Option<Address>,
    /// Set for contract creations.
    pub contract_address: Option<Address>,
    pub gas_used: u64,
    pub output: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TxError {
    #[error("transaction reverted")]
    Reverted { output: Vec<u8> },

    #[error("not enough funds to pay for transaction")]
    InsufficientFunds,

    #[error("execution ran out of gas")]
    OutOfGas,

    #[error("no account exists at {0}")]
    NoCallee(Address),

    #[error("account {0} has no executable code")]
    NoCode(Address),

    #[error("block {0} does not exist")]
    InvalidBlock(u64),

    #[error("transaction was dropped before confirmation")]
    Dropped,
}

impl TxError {
    pub fn reverted(&self) -> bool {
        match self {
            TxError::Reverted { .. } => true,
            _ => false,
        }
    }
}
