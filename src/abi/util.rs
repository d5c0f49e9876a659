//! Utility module

use oasis_types::U256;

pub type Hash = [u8; 32];

/// Converts u64 to right aligned array of 32 bytes.
pub fn pad_u64(value: u64) -> Hash {
    let mut padded = [0u8; 32];
    padded[24..].copy_from_slice(&value.to_be_bytes());
    padded
}

/// Sign-extends `value` into a 256-bit two's complement word.
pub fn i64_to_word(value: i64) -> U256 {
    if value >= 0 {
        U256::from(value as u64)
    } else {
        !U256::from(!(value as u64))
    }
}

/// Interprets `word` as two's complement. `None` if it does not fit an `i64`.
pub fn word_to_i64(word: U256) -> Option<i64> {
    if word.bit(255) {
        let magnitude = !word;
        if magnitude.bits() <= 63 {
            Some(!(magnitude.low_u64() as i64))
        } else {
            None
        }
    } else if word.bits() <= 63 {
        Some(word.low_u64() as i64)
    } else {
        None
    }
}

pub fn word_to_u64(word: U256) -> Option<u64> {
    if word.bits() <= 64 {
        Some(word.low_u64())
    } else {
        None
    }
}

/// Whether the bytes above the low `width` bits all repeat the sign bit.
pub fn is_sign_extended(word: &[u8], width: usize) -> bool {
    let pad = (256 - width) / 8;
    if pad == 0 {
        return true;
    }
    let sign = if word[pad] & 0x80 == 0 { 0 } else { 0xff };
    word[..pad].iter().all(|b| *b == sign)
}

pub fn word_to_bytes(word: U256) -> Hash {
    let mut bytes = [0u8; 32];
    word.to_big_endian(&mut bytes);
    bytes
}

/// The first four bytes of the keccak-256 hash of `signature`.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = tiny_keccak::keccak256(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash[..4]);
    selector
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_words() {
        for value in &[0i64, 1, -1, 23, -23, i64::from(i32::MIN), i64::MAX, i64::MIN] {
            assert_eq!(word_to_i64(i64_to_word(*value)), Some(*value));
        }
        assert_eq!(i64_to_word(-1), U256::max_value());
        assert_eq!(word_to_i64(U256::from(u64::max_value())), None);
        assert_eq!(word_to_i64(U256::max_value() - U256::from(u64::max_value())), None);
    }

    #[test]
    fn unsigned_words() {
        assert_eq!(word_to_u64(U256::from(u64::max_value())), Some(u64::max_value()));
        assert_eq!(word_to_u64(U256::from(u64::max_value()) + 1), None);
        assert_eq!(pad_u64(0x0102)[30..], [1, 2]);
    }

    #[test]
    fn known_selectors() {
        assert_eq!(selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(selector("balanceOf(address)"), [0x70, 0xa0, 0x82, 0x31]);
    }
}
