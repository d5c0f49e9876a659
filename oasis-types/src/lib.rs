#[macro_use]
extern crate fixed_hash;
#[macro_use]
extern crate uint;

mod account;
mod address;
mod balance;

pub use account::Account;
pub use address::Address;
pub use balance::Balance;

construct_uint! {
    /// A 256-bits (4 64-bit word) fixed-size bigint type.
    pub struct U256(4);
}

construct_fixed_hash! {
    /// A 256-bits (32 bytes) hash type.
    pub struct H256(32);
}

impl From<U256> for H256 {
    fn from(uint: U256) -> H256 {
        let mut hash = H256::zero();
        uint.to_big_endian(hash.as_bytes_mut());
        hash
    }
}

impl From<H256> for U256 {
    fn from(hash: H256) -> U256 {
        U256::from_big_endian(hash.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uint_hash_conversion() {
        let mut bytes = [0u8; 32];
        bytes[6] = 0xef;
        bytes[31] = 1;
        let value = U256::from_big_endian(&bytes);
        let hash = H256::from(value);
        assert_eq!(hash.as_bytes(), &bytes[..]);
        assert_eq!(U256::from(hash), value);
    }
}
