//! Stream module

use std::convert::TryFrom;

use super::{util, AbiValue, TypeTag};
use crate::errors::AbiError;
use oasis_types::{Address, U256};

/// Stream interpretation of incoming payload
pub struct Stream<'a> {
    payload: &'a [u8],
    position: usize,
}

impl<'a> Stream<'a> {
    /// New stream for known payload
    pub fn new(raw: &'a [u8]) -> Self {
        Stream {
            payload: raw,
            position: 0,
        }
    }

    /// Pop next argument of known type
    pub fn pop(&mut self, ty: &TypeTag) -> Result<AbiValue, AbiError> {
        if ty.is_dynamic() {
            let offset = self.length()?;
            if offset > self.payload.len() {
                return Err(AbiError::InvalidOffset);
            }
            let mut nested_stream = Stream::new(&self.payload[offset..]);
            nested_stream.decode_dynamic(ty)
        } else {
            self.decode_fixed(ty)
        }
    }

    /// Current position for the stream
    pub fn position(&self) -> usize {
        self.position
    }

    /// Advance stream position for `amount` bytes
    pub fn advance(&mut self, amount: usize) -> Result<usize, AbiError> {
        match self.position.checked_add(amount) {
            Some(end) if end <= self.payload.len() => {
                let old_position = self.position;
                self.position = end;
                Ok(old_position)
            }
            _ => Err(AbiError::UnexpectedEof),
        }
    }

    /// Stream payload
    pub fn payload(&self) -> &[u8] {
        self.payload
    }

    fn word(&mut self) -> Result<&'a [u8], AbiError> {
        let start = self.advance(32)?;
        Ok(&self.payload[start..start + 32])
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], AbiError> {
        let start = self.advance(len)?;
        Ok(&self.payload[start..start + len])
    }

    /// An offset or length word.
    fn length(&mut self) -> Result<usize, AbiError> {
        let word = self.word()?;
        if word[..24].iter().any(|b| *b != 0) {
            return Err(AbiError::InvalidOffset);
        }
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&word[24..]);
        usize::try_from(u64::from_be_bytes(bytes)).map_err(|_| AbiError::InvalidOffset)
    }

    /// A stream over the remainder, which must hold the heads of `len` values of `elem`.
    fn items(&self, elem: &TypeTag, len: usize) -> Result<Stream<'a>, AbiError> {
        let rest = self.rest();
        match len.checked_mul(elem.head_len()) {
            Some(heads) if heads <= rest.payload.len() => Ok(rest),
            _ => Err(AbiError::InvalidOffset),
        }
    }

    fn rest(&self) -> Stream<'a> {
        Stream::new(&self.payload[self.position..])
    }

    fn decode_fixed(&mut self, ty: &TypeTag) -> Result<AbiValue, AbiError> {
        Ok(match ty {
            TypeTag::Uint(width) => {
                let word = U256::from_big_endian(self.word()?);
                if word.bits() > *width {
                    return Err(AbiError::InvalidPadding);
                }
                AbiValue::Uint(word)
            }
            TypeTag::Int(width) => {
                let word = self.word()?;
                if !util::is_sign_extended(word, *width) {
                    return Err(AbiError::InvalidPadding);
                }
                AbiValue::Int(U256::from_big_endian(word))
            }
            TypeTag::Address => {
                let word = self.word()?;
                if word[..12].iter().any(|b| *b != 0) {
                    return Err(AbiError::InvalidPadding);
                }
                let mut addr = [0u8; 20];
                addr.copy_from_slice(&word[12..]);
                AbiValue::Address(Address(addr))
            }
            TypeTag::Bool => {
                let word = self.word()?;
                if word[..31].iter().any(|b| *b != 0) {
                    return Err(AbiError::InvalidBool);
                }
                match word[31] {
                    0 => AbiValue::Bool(false),
                    1 => AbiValue::Bool(true),
                    _ => return Err(AbiError::InvalidBool),
                }
            }
            TypeTag::FixedBytes(len) => {
                let word = self.word()?;
                if word[*len..].iter().any(|b| *b != 0) {
                    return Err(AbiError::InvalidPadding);
                }
                AbiValue::FixedBytes(word[..*len].to_vec())
            }
            TypeTag::FixedArray(elem, len) => {
                let items = (0..*len)
                    .map(|_| self.decode_fixed(elem))
                    .collect::<Result<_, _>>()?;
                AbiValue::Array(items)
            }
            TypeTag::Bytes | TypeTag::String | TypeTag::Array(_) => {
                return Err(AbiError::TypeMismatch {
                    expected: ty.to_string(),
                    found: "fixed word",
                })
            }
        })
    }

    fn decode_dynamic(&mut self, ty: &TypeTag) -> Result<AbiValue, AbiError> {
        Ok(match ty {
            TypeTag::Bytes => {
                let len = self.length()?;
                AbiValue::Bytes(self.take(len)?.to_vec())
            }
            TypeTag::String => {
                let len = self.length()?;
                let bytes = self.take(len)?.to_vec();
                AbiValue::String(String::from_utf8(bytes).map_err(|_| AbiError::InvalidUtf8)?)
            }
            TypeTag::Array(elem) => {
                let len = self.length()?;
                let mut items_stream = self.items(elem, len)?;
                let items = (0..len)
                    .map(|_| items_stream.pop(elem))
                    .collect::<Result<_, _>>()?;
                AbiValue::Array(items)
            }
            TypeTag::FixedArray(elem, len) => {
                let mut items_stream = self.items(elem, *len)?;
                let items = (0..*len)
                    .map(|_| items_stream.pop(elem))
                    .collect::<Result<_, _>>()?;
                AbiValue::Array(items)
            }
            _ => self.decode_fixed(ty)?,
        })
    }
}
