use std::fmt;

use crate::Address;

/// The identity on whose behalf calls and transactions are issued.
///
/// Key material never lives here; signing is the concern of whichever
/// blockchain backend accepts the account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Account {
    address: Address,
}

impl Account {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }
}

impl From<Address> for Account {
    fn from(address: Address) -> Self {
        Self::new(address)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "account {}", self.address)
    }
}
