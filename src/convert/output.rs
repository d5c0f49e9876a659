use std::convert::TryFrom;

use oasis_types::{Balance, U256};

use crate::{
    abi::{util, AbiValue},
    errors::{Error, Result},
    value::{NativeType, Value},
};

/// Scalar result decoders. The first handler that accepts a type wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScalarHandler {
    Integer,
    Long,
    BigInteger,
    Str,
    Boolean,
    Address,
    Bytes,
    Amount,
    Void,
    Enum,
}

const HANDLERS: [ScalarHandler; 10] = [
    ScalarHandler::Integer,
    ScalarHandler::Long,
    ScalarHandler::BigInteger,
    ScalarHandler::Str,
    ScalarHandler::Boolean,
    ScalarHandler::Address,
    ScalarHandler::Bytes,
    ScalarHandler::Amount,
    ScalarHandler::Void,
    ScalarHandler::Enum,
];

fn signed(word: U256) -> Option<i64> {
    util::word_to_i64(word)
}

fn unsigned(word: U256) -> Option<i64> {
    util::word_to_u64(word).and_then(|v| i64::try_from(v).ok())
}

impl ScalarHandler {
    fn for_type(target: &NativeType) -> Option<Self> {
        HANDLERS.iter().copied().find(|h| h.is_of_type(target))
    }

    fn is_of_type(self, target: &NativeType) -> bool {
        match (self, target) {
            (ScalarHandler::Integer, NativeType::Int)
            | (ScalarHandler::Long, NativeType::Long)
            | (ScalarHandler::BigInteger, NativeType::BigInt)
            | (ScalarHandler::Str, NativeType::Str)
            | (ScalarHandler::Boolean, NativeType::Bool)
            | (ScalarHandler::Address, NativeType::Address)
            | (ScalarHandler::Address, NativeType::Account)
            | (ScalarHandler::Bytes, NativeType::Bytes)
            | (ScalarHandler::Amount, NativeType::Amount)
            | (ScalarHandler::Void, NativeType::Void)
            | (ScalarHandler::Enum, NativeType::Enum(_)) => true,
            _ => false,
        }
    }

    fn convert(self, raw: AbiValue, target: &NativeType) -> Result<Value> {
        let kind = raw.kind();
        let converted = match (self, raw) {
            (ScalarHandler::Integer, AbiValue::Int(word)) => signed(word)
                .and_then(|v| i32::try_from(v).ok())
                .map(Value::Int),
            (ScalarHandler::Integer, AbiValue::Uint(word)) => unsigned(word)
                .and_then(|v| i32::try_from(v).ok())
                .map(Value::Int),
            (ScalarHandler::Long, AbiValue::Int(word)) => signed(word).map(Value::Long),
            (ScalarHandler::Long, AbiValue::Uint(word)) => unsigned(word).map(Value::Long),
            (ScalarHandler::BigInteger, AbiValue::Int(word))
            | (ScalarHandler::BigInteger, AbiValue::Uint(word)) => Some(Value::BigInt(word)),
            (ScalarHandler::Str, AbiValue::String(s)) => Some(Value::Str(s)),
            (ScalarHandler::Boolean, AbiValue::Bool(b)) => Some(Value::Bool(b)),
            (ScalarHandler::Address, AbiValue::Address(addr)) => match target {
                NativeType::Account => Some(Value::Account(addr.into())),
                _ => Some(Value::Address(addr)),
            },
            (ScalarHandler::Bytes, AbiValue::Bytes(bytes))
            | (ScalarHandler::Bytes, AbiValue::FixedBytes(bytes)) => Some(Value::Bytes(bytes)),
            (ScalarHandler::Amount, AbiValue::Uint(word)) if word.bits() <= 128 => {
                Some(Value::Amount(Balance(word.low_u128())))
            }
            (ScalarHandler::Void, _) => Some(Value::Void),
            (ScalarHandler::Enum, AbiValue::Uint(word)) => match target {
                NativeType::Enum(schema) => util::word_to_u64(word).and_then(|ordinal| {
                    let ordinal = ordinal as usize;
                    schema
                        .variant(ordinal)
                        .map(|variant| Value::Enum { ordinal, variant })
                }),
                _ => None,
            },
            _ => None,
        };
        converted.ok_or_else(|| Error::ConversionError {
            native: kind.to_string(),
            target: target.to_string(),
        })
    }
}

/// Converts the decoded outputs of a call into a value of type `target`.
pub fn convert_result(raw: Vec<AbiValue>, target: &NativeType) -> Result<Value> {
    if let NativeType::Void = target {
        return Ok(Value::Void);
    }
    let mut raw = raw;
    if raw.len() == 1 {
        if let Some(value) = raw.pop() {
            return convert_value(value, target);
        }
    }
    convert_composite(raw, target)
}

fn convert_value(raw: AbiValue, target: &NativeType) -> Result<Value> {
    match target {
        NativeType::Array(elem) => convert_elements(raw, elem, target).map(Value::Array),
        NativeType::List(elem) => convert_elements(raw, elem, target).map(Value::List),
        NativeType::Composite(_) => convert_composite(vec![raw], target),
        _ => ScalarHandler::for_type(target)
            .ok_or_else(|| Error::NoConverterFound(target.to_string()))?
            .convert(raw, target),
    }
}

fn convert_elements(raw: AbiValue, elem: &NativeType, target: &NativeType) -> Result<Vec<Value>> {
    let handler =
        ScalarHandler::for_type(elem).ok_or_else(|| Error::NoConverterFound(elem.to_string()))?;
    match raw {
        AbiValue::Array(items) => items
            .into_iter()
            .map(|item| handler.convert(item, elem))
            .collect(),
        other => Err(Error::ConversionError {
            native: other.kind().to_string(),
            target: target.to_string(),
        }),
    }
}

/// Populates a composite from all values in declaration order.
fn convert_composite(raw: Vec<AbiValue>, target: &NativeType) -> Result<Value> {
    let schema = match target {
        NativeType::Composite(schema) if schema.arity() > 0 && schema.arity() == raw.len() => {
            schema
        }
        _ => {
            return Err(Error::NoSuitableConstructor {
                type_name: target.to_string(),
                arity: raw.len(),
            })
        }
    };
    let fields = raw
        .into_iter()
        .zip(schema.fields())
        .map(|(value, (_, ty))| convert_value(value, ty))
        .collect::<Result<Vec<_>>>()?;
    schema.instantiate(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        abi::FunctionDescriptor,
        convert::convert_argument,
        value::{CompositeSchema, EnumSchema},
    };
    use oasis_types::{Account, Address};
    use std::sync::Arc;

    fn pair() -> NativeType {
        NativeType::Composite(Arc::new(CompositeSchema::new(
            "Pair",
            vec![("count", NativeType::Long), ("label", NativeType::Str)],
        )))
    }

    #[test]
    fn handler_order() {
        assert_eq!(
            ScalarHandler::for_type(&NativeType::Int),
            Some(ScalarHandler::Integer)
        );
        assert_eq!(
            ScalarHandler::for_type(&NativeType::Account),
            Some(ScalarHandler::Address)
        );
        assert_eq!(ScalarHandler::for_type(&pair()), None);
        assert_eq!(
            ScalarHandler::for_type(&NativeType::List(Box::new(NativeType::Int))),
            None
        );
    }

    #[test]
    fn scalars() {
        assert_eq!(
            convert_result(vec![AbiValue::int(23)], &NativeType::Int).unwrap(),
            Value::Int(23)
        );
        assert_eq!(
            convert_result(vec![AbiValue::int(-23)], &NativeType::Long).unwrap(),
            Value::Long(-23)
        );
        assert_eq!(
            convert_result(vec![AbiValue::uint(5)], &NativeType::Amount).unwrap(),
            Value::Amount(Balance(5))
        );
        let addr = Address([9u8; 20]);
        assert_eq!(
            convert_result(vec![AbiValue::Address(addr)], &NativeType::Account).unwrap(),
            Value::Account(Account::new(addr))
        );
    }

    #[test]
    fn out_of_range_integers() {
        let big = AbiValue::Uint(U256::from(u64::max_value()));
        assert!(convert_result(vec![big.clone()], &NativeType::Int).is_err());
        assert!(convert_result(vec![big.clone()], &NativeType::Long).is_err());
        assert_eq!(
            convert_result(vec![big], &NativeType::BigInt).unwrap(),
            Value::BigInt(U256::from(u64::max_value()))
        );
    }

    #[test]
    fn enums() {
        let target = NativeType::Enum(EnumSchema {
            name: "Color",
            variants: &["Red", "Green"],
        });
        assert_eq!(
            convert_result(vec![AbiValue::uint(1)], &target).unwrap(),
            Value::Enum {
                ordinal: 1,
                variant: "Green"
            }
        );
        assert!(convert_result(vec![AbiValue::uint(2)], &target).is_err());
    }

    #[test]
    fn void_ignores_outputs() {
        assert_eq!(
            convert_result(vec![AbiValue::Bool(true)], &NativeType::Void).unwrap(),
            Value::Void
        );
        assert_eq!(convert_result(vec![], &NativeType::Void).unwrap(), Value::Void);
    }

    #[test]
    fn arrays() {
        let raw = vec![AbiValue::Array(vec![AbiValue::int(1), AbiValue::int(2)])];
        assert_eq!(
            convert_result(raw.clone(), &NativeType::List(Box::new(NativeType::Long))).unwrap(),
            Value::List(vec![Value::Long(1), Value::Long(2)])
        );
        assert_eq!(
            convert_result(raw, &NativeType::Array(Box::new(NativeType::Int))).unwrap(),
            Value::Array(vec![Value::Int(1), Value::Int(2)])
        );
        match convert_result(
            vec![AbiValue::Array(vec![])],
            &NativeType::List(Box::new(pair())),
        ) {
            Err(Error::NoConverterFound(ty)) => assert_eq!(ty, "Pair"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn composites() {
        let raw = vec![AbiValue::int(4), AbiValue::String("four".to_string())];
        assert_eq!(
            convert_result(raw.clone(), &pair()).unwrap(),
            Value::Composite {
                name: "Pair".to_string(),
                fields: vec![Value::Long(4), Value::Str("four".to_string())],
            }
        );
        match convert_result(raw, &NativeType::Int) {
            Err(Error::NoSuitableConstructor { arity: 2, .. }) => (),
            other => panic!("unexpected {:?}", other),
        }
        match convert_result(vec![AbiValue::int(1)], &pair()) {
            Err(Error::NoSuitableConstructor { arity: 1, .. }) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn nested_composites() {
        let wrapper = NativeType::Composite(Arc::new(CompositeSchema::new(
            "Wrapper",
            vec![
                ("flag", NativeType::Bool),
                (
                    "inner",
                    NativeType::Composite(Arc::new(CompositeSchema::new(
                        "Inner",
                        vec![("value", NativeType::Int)],
                    ))),
                ),
            ],
        )));
        let value = convert_result(vec![AbiValue::Bool(true), AbiValue::int(3)], &wrapper).unwrap();
        assert_eq!(
            value,
            Value::Composite {
                name: "Wrapper".to_string(),
                fields: vec![
                    Value::Bool(true),
                    Value::Composite {
                        name: "Inner".to_string(),
                        fields: vec![Value::Int(3)],
                    },
                ],
            }
        );
    }

    #[test]
    fn values_survive_encoding_round_trip() {
        let cases = vec![
            ("int32", NativeType::Int, Value::Int(i32::MIN)),
            ("int32", NativeType::Int, Value::Int(i32::MAX)),
            ("int256", NativeType::Long, Value::Long(i64::MIN)),
            ("int256", NativeType::Long, Value::Long(i64::MAX)),
            ("string", NativeType::Str, Value::Str(String::new())),
            ("string", NativeType::Str, Value::Str("a".repeat(40))),
            ("address", NativeType::Address, Value::Address(Address::zero())),
        ];
        for (ty, native, value) in cases {
            let tag = ty.parse().unwrap();
            let f = FunctionDescriptor::new("get", vec![], vec![tag], false);
            let raw = convert_argument(value.clone(), &f.outputs[0]).unwrap();
            let encoded = f.encode_output(&[raw]).unwrap();

            let decoded = convert_result(f.decode_output(&encoded).unwrap(), &native).unwrap();
            assert_eq!(decoded, value, "{} through {}", ty, native);

            let reencoded = f
                .encode_output(&[convert_argument(decoded, &f.outputs[0]).unwrap()])
                .unwrap();
            assert_eq!(reencoded, encoded, "{} through {}", ty, native);
        }
    }
}
