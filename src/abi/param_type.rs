//! Solidity parameter types

use std::{fmt, str::FromStr};

use crate::errors::AbiError;

/// A Solidity parameter type, as named in a JSON ABI.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Uint(usize),
    Int(usize),
    Address,
    Bool,
    FixedBytes(usize),
    Bytes,
    String,
    Array(Box<TypeTag>),
    FixedArray(Box<TypeTag>, usize),
}

impl TypeTag {
    /// Whether the value is stored in the tail and referenced by an offset in the head.
    pub fn is_dynamic(&self) -> bool {
        match self {
            TypeTag::Bytes | TypeTag::String | TypeTag::Array(_) => true,
            TypeTag::FixedArray(elem, _) => elem.is_dynamic(),
            _ => false,
        }
    }

    /// Number of bytes the type occupies in the head of an encoding.
    pub fn head_len(&self) -> usize {
        match self {
            TypeTag::FixedArray(elem, len) if !elem.is_dynamic() => elem.head_len().saturating_mul(*len),
            _ => 32,
        }
    }
}

fn bit_width(s: &str, ty: &str) -> Result<usize, AbiError> {
    if s.is_empty() {
        return Ok(256);
    }
    match s.parse::<usize>() {
        Ok(width) if width > 0 && width <= 256 && width % 8 == 0 => Ok(width),
        _ => Err(AbiError::UnknownType(ty.to_string())),
    }
}

impl FromStr for TypeTag {
    type Err = AbiError;

    fn from_str(ty: &str) -> Result<Self, Self::Err> {
        let ty = ty.trim();
        if ty.ends_with(']') {
            let open = ty
                .rfind('[')
                .ok_or_else(|| AbiError::UnknownType(ty.to_string()))?;
            let elem = Box::new(ty[..open].parse()?);
            let len = &ty[open + 1..ty.len() - 1];
            if len.is_empty() {
                return Ok(TypeTag::Array(elem));
            }
            return match len.parse() {
                Ok(len) if len > 0 => Ok(TypeTag::FixedArray(elem, len)),
                _ => Err(AbiError::UnknownType(ty.to_string())),
            };
        }
        Ok(match ty {
            "address" => TypeTag::Address,
            "bool" => TypeTag::Bool,
            "string" => TypeTag::String,
            "bytes" => TypeTag::Bytes,
            _ if ty.starts_with("uint") => TypeTag::Uint(bit_width(&ty[4..], ty)?),
            _ if ty.starts_with("int") => TypeTag::Int(bit_width(&ty[3..], ty)?),
            _ if ty.starts_with("bytes") => match ty[5..].parse::<usize>() {
                Ok(len) if len > 0 && len <= 32 => TypeTag::FixedBytes(len),
                _ => return Err(AbiError::UnknownType(ty.to_string())),
            },
            _ => return Err(AbiError::UnknownType(ty.to_string())),
        })
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TypeTag::Uint(width) => write!(f, "uint{}", width),
            TypeTag::Int(width) => write!(f, "int{}", width),
            TypeTag::Address => write!(f, "address"),
            TypeTag::Bool => write!(f, "bool"),
            TypeTag::FixedBytes(len) => write!(f, "bytes{}", len),
            TypeTag::Bytes => write!(f, "bytes"),
            TypeTag::String => write!(f, "string"),
            TypeTag::Array(elem) => write!(f, "{}[]", elem),
            TypeTag::FixedArray(elem, len) => write!(f, "{}[{}]", elem, len),
        }
    }
}
