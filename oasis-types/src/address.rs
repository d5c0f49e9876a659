use std::{fmt, str::FromStr};

/// A 160-bit contract or account address.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// Number of bytes in an address.
    pub const fn size() -> usize {
        20
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// `None` unless `bytes` holds exactly 20 bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::size() {
            return None;
        }
        let mut addr = Self::zero();
        addr.0.copy_from_slice(bytes);
        Some(addr)
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Address {
    type Err = hex::FromHexError;

    /// Accepts 40 hex digits, with or without a `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = if s.starts_with("0x") { &s[2..] } else { s };
        Self::from_slice(&hex::decode(digits)?).ok_or(hex::FromHexError::InvalidStringLength)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}
