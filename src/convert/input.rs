use oasis_types::U256;

use crate::{
    abi::{util, AbiValue, FunctionDescriptor, TypeTag},
    errors::{Error, Result},
    value::Value,
};

/// Converts `args` into the inputs of `function`, which must take exactly
/// as many parameters as there are arguments.
pub fn convert_arguments(function: &FunctionDescriptor, args: Vec<Value>) -> Result<Vec<AbiValue>> {
    if args.len() != function.inputs.len() {
        return Err(Error::ParameterCountMismatch {
            function: function.name.clone(),
            abi: function.inputs.len(),
            interface: args.len(),
        });
    }
    args.into_iter()
        .zip(&function.inputs)
        .map(|(arg, param)| convert_argument(arg, param))
        .collect()
}

fn convert_elements(items: Vec<Value>, elem: &TypeTag) -> Result<Vec<AbiValue>> {
    items
        .into_iter()
        .map(|item| convert_argument(item, elem))
        .collect()
}

fn fits_int(v: i64, width: usize) -> bool {
    width >= 64 || (v >= -(1 << (width - 1)) && v < 1 << (width - 1))
}

fn fits_uint(v: i64, width: usize) -> bool {
    v >= 0 && (width >= 64 || (v as u64) < 1 << width)
}

fn word_fits_int(word: U256, width: usize) -> bool {
    util::is_sign_extended(&util::word_to_bytes(word), width)
}

/// Converts one native argument into the ABI value for `param`.
/// Values with no conversion to `param`, or too wide for it, are rejected.
pub fn convert_argument(arg: Value, param: &TypeTag) -> Result<AbiValue> {
    Ok(match (arg, param) {
        (Value::Int(v), TypeTag::Int(w)) if fits_int(v.into(), *w) => AbiValue::int(v.into()),
        (Value::Long(v), TypeTag::Int(w)) if fits_int(v, *w) => AbiValue::int(v),
        (Value::Int(v), TypeTag::Uint(w)) if fits_uint(v.into(), *w) => AbiValue::uint(v as u64),
        (Value::Long(v), TypeTag::Uint(w)) if fits_uint(v, *w) => AbiValue::uint(v as u64),
        (Value::BigInt(v), TypeTag::Uint(w)) if v.bits() <= *w => AbiValue::Uint(v),
        (Value::BigInt(v), TypeTag::Int(w)) if word_fits_int(v, *w) => AbiValue::Int(v),
        (Value::Amount(v), TypeTag::Uint(w)) if U256::from(v.0).bits() <= *w => {
            AbiValue::Uint(U256::from(v.0))
        }
        (Value::Enum { ordinal, .. }, TypeTag::Uint(w)) if fits_uint(ordinal as i64, *w) => {
            AbiValue::uint(ordinal as u64)
        }
        (Value::Enum { ordinal, .. }, TypeTag::Int(w)) if fits_int(ordinal as i64, *w) => {
            AbiValue::int(ordinal as i64)
        }
        (Value::Bool(v), TypeTag::Bool) => AbiValue::Bool(v),
        (Value::Str(v), TypeTag::String) => AbiValue::String(v),
        (Value::Address(v), TypeTag::Address) => AbiValue::Address(v),
        (Value::Account(v), TypeTag::Address) => AbiValue::Address(v.address()),
        (Value::Bytes(v), TypeTag::Bytes) => AbiValue::Bytes(v),
        (Value::Bytes(v), TypeTag::FixedBytes(len)) if v.len() == *len => AbiValue::FixedBytes(v),
        (Value::Array(items), TypeTag::Array(elem)) | (Value::List(items), TypeTag::Array(elem)) => {
            AbiValue::Array(convert_elements(items, elem)?)
        }
        (Value::Array(items), TypeTag::FixedArray(elem, len))
        | (Value::List(items), TypeTag::FixedArray(elem, len))
            if items.len() == *len =>
        {
            AbiValue::Array(convert_elements(items, elem)?)
        }
        (arg, param) => {
            return Err(Error::ConversionError {
                native: arg.type_name(),
                target: param.to_string(),
            })
        }
    })
}
