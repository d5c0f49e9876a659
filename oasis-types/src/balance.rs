use derive_more::{Add, AddAssign, Display, From, FromStr, Into, Sub, SubAssign};

const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// An amount of wei attached to a transaction or held by an account.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Display,
    FromStr,
    From,
    Into,
    Add,
    Sub,
    AddAssign,
    SubAssign,
)]
pub struct Balance(pub u128);

impl Balance {
    pub const fn wei(amount: u128) -> Self {
        Balance(amount)
    }

    pub const fn ether(amount: u128) -> Self {
        Balance(amount * WEI_PER_ETHER)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}
