//! Sink module

use super::{util, AbiValue, TypeTag};
use crate::errors::AbiError;
use oasis_types::U256;

/// Head/tail encoder for a sequence of values with known types.
pub struct Sink {
    capacity: usize,
    preamble: Vec<u8>,
    heap: Vec<u8>,
}

impl Sink {
    /// New sink for values of the provided types
    pub fn new(types: &[TypeTag]) -> Self {
        Self::with_capacity(types.iter().map(TypeTag::head_len).sum())
    }

    fn with_capacity(capacity: usize) -> Self {
        Sink {
            capacity,
            preamble: Vec::with_capacity(capacity),
            heap: Vec::new(),
        }
    }

    fn top_ptr(&self) -> usize {
        self.capacity + self.heap.len()
    }

    /// Consume `val` to the Sink
    pub fn push(&mut self, ty: &TypeTag, val: &AbiValue) -> Result<(), AbiError> {
        if ty.is_dynamic() {
            let top_ptr = self.top_ptr() as u64;
            encode_dynamic(ty, val, &mut self.heap)?;
            self.preamble.extend_from_slice(&util::pad_u64(top_ptr));
            Ok(())
        } else {
            encode_fixed(ty, val, &mut self.preamble)
        }
    }

    /// Consume current Sink to produce a vector with content.
    pub fn finalize(self) -> Result<Vec<u8>, AbiError> {
        if self.preamble.len() != self.capacity {
            return Err(AbiError::Underflow {
                pushed: self.preamble.len(),
                expected: self.capacity,
            });
        }
        let mut result = self.preamble;
        result.extend_from_slice(&self.heap);
        Ok(result)
    }
}

fn mismatch(ty: &TypeTag, val: &AbiValue) -> AbiError {
    AbiError::TypeMismatch {
        expected: ty.to_string(),
        found: val.kind(),
    }
}

fn push_word(target: &mut Vec<u8>, word: U256) {
    target.extend_from_slice(&util::word_to_bytes(word));
}

fn push_padded(target: &mut Vec<u8>, bytes: &[u8]) {
    target.extend_from_slice(bytes);
    let rem = bytes.len() % 32;
    if rem > 0 {
        target.resize(target.len() + 32 - rem, 0);
    }
}

fn encode_fixed(ty: &TypeTag, val: &AbiValue, target: &mut Vec<u8>) -> Result<(), AbiError> {
    match (ty, val) {
        (TypeTag::Uint(_), AbiValue::Uint(word)) | (TypeTag::Int(_), AbiValue::Int(word)) => {
            push_word(target, *word)
        }
        (TypeTag::Address, AbiValue::Address(addr)) => {
            target.extend_from_slice(&[0u8; 12]);
            target.extend_from_slice(addr.as_ref());
        }
        (TypeTag::Bool, AbiValue::Bool(b)) => push_word(target, U256::from(*b as u8)),
        (TypeTag::FixedBytes(len), AbiValue::FixedBytes(bytes)) if bytes.len() == *len => {
            push_padded(target, bytes)
        }
        (TypeTag::FixedArray(elem, len), AbiValue::Array(items)) if items.len() == *len => {
            for item in items {
                encode_fixed(elem, item, target)?;
            }
        }
        _ => return Err(mismatch(ty, val)),
    }
    Ok(())
}

fn encode_dynamic(ty: &TypeTag, val: &AbiValue, target: &mut Vec<u8>) -> Result<(), AbiError> {
    match (ty, val) {
        (TypeTag::Bytes, AbiValue::Bytes(bytes)) => {
            push_word(target, U256::from(bytes.len()));
            push_padded(target, bytes);
        }
        (TypeTag::String, AbiValue::String(s)) => {
            push_word(target, U256::from(s.len()));
            push_padded(target, s.as_bytes());
        }
        (TypeTag::Array(elem), AbiValue::Array(items)) => {
            push_word(target, U256::from(items.len()));
            encode_sequence(elem, items, target)?;
        }
        (TypeTag::FixedArray(elem, len), AbiValue::Array(items)) if items.len() == *len => {
            encode_sequence(elem, items, target)?;
        }
        _ => return Err(mismatch(ty, val)),
    }
    Ok(())
}

/// Array elements are laid out as their own head/tail block.
fn encode_sequence(
    elem: &TypeTag,
    items: &[AbiValue],
    target: &mut Vec<u8>,
) -> Result<(), AbiError> {
    let mut nested_sink = Sink::with_capacity(elem.head_len() * items.len());
    for item in items {
        nested_sink.push(elem, item)?;
    }
    target.extend_from_slice(&nested_sink.finalize()?);
    Ok(())
}
