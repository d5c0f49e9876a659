use std::collections::HashMap;

use blockchain_traits::Receipt;
use oasis_types::{Address, Balance};

pub type State = HashMap<Address, AccountState>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccountState {
    pub balance: Balance,
    pub nonce: u64,
    pub code: Vec<u8>,
    pub storage: HashMap<Vec<u8>, Vec<u8>>,
}

impl AccountState {
    pub fn with_balance<B: Into<Balance>>(balance: B) -> Self {
        Self {
            balance: balance.into(),
            ..Default::default()
        }
    }

    pub fn with_code(code: Vec<u8>) -> Self {
        Self {
            code,
            ..Default::default()
        }
    }
}

/// A sealed block: the state after all of its transactions were applied,
/// and their receipts.
#[derive(Clone, Debug)]
pub struct Block {
    number: u64,
    state: State,
    receipts: Vec<Receipt>,
}

impl Block {
    pub(crate) fn new(number: u64, state: State, receipts: Vec<Receipt>) -> Self {
        Self {
            number,
            state,
            receipts,
        }
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    pub fn account(&self, address: &Address) -> Option<&AccountState> {
        self.state.get(address)
    }
}
