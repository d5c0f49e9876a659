//! Native values that cross the proxy boundary.

use std::{fmt, sync::Arc};

use oasis_types::{Account, Address, Balance, U256};

use crate::errors::{Error, Result};

/// The declared type of a method parameter, return value, or composite field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NativeType {
    Void,
    Int,
    Long,
    BigInt,
    Bool,
    Str,
    Address,
    Bytes,
    Amount,
    Account,
    Enum(EnumSchema),
    Array(Box<NativeType>),
    List(Box<NativeType>),
    Composite(Arc<CompositeSchema>),
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NativeType::Void => write!(f, "()"),
            NativeType::Int => write!(f, "i32"),
            NativeType::Long => write!(f, "i64"),
            NativeType::BigInt => write!(f, "U256"),
            NativeType::Bool => write!(f, "bool"),
            NativeType::Str => write!(f, "String"),
            NativeType::Address => write!(f, "Address"),
            NativeType::Bytes => write!(f, "Bytes"),
            NativeType::Amount => write!(f, "Balance"),
            NativeType::Account => write!(f, "Account"),
            NativeType::Enum(schema) => write!(f, "{}", schema.name),
            NativeType::Array(elem) => write!(f, "[{}]", elem),
            NativeType::List(elem) => write!(f, "Vec<{}>", elem),
            NativeType::Composite(schema) => write!(f, "{}", schema.name()),
        }
    }
}

/// A fieldless enum, passed on the wire as its ordinal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumSchema {
    pub name: &'static str,
    pub variants: &'static [&'static str],
}

impl EnumSchema {
    pub fn variant(&self, ordinal: usize) -> Option<&'static str> {
        self.variants.get(ordinal).copied()
    }
}

/// The ordered fields of a user-defined record type.
#[derive(Debug, PartialEq, Eq)]
pub struct CompositeSchema {
    name: String,
    fields: Vec<(String, NativeType)>,
}

impl CompositeSchema {
    pub fn new<S: Into<String>>(name: S, fields: Vec<(&str, NativeType)>) -> Self {
        Self {
            name: name.into(),
            fields: fields
                .into_iter()
                .map(|(field, ty)| (field.to_string(), ty))
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[(String, NativeType)] {
        &self.fields
    }

    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    /// Builds a value of this type from one value per field, in field order.
    pub fn instantiate(&self, fields: Vec<Value>) -> Result<Value> {
        if fields.len() != self.arity() {
            return Err(Error::ArityMismatch {
                type_name: self.name.clone(),
                expected: self.arity(),
                found: fields.len(),
            });
        }
        Ok(Value::Composite {
            name: self.name.clone(),
            fields,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Void,
    Int(i32),
    Long(i64),
    BigInt(U256),
    Bool(bool),
    Str(String),
    Address(Address),
    Bytes(Vec<u8>),
    Amount(Balance),
    Account(Account),
    Enum {
        ordinal: usize,
        variant: &'static str,
    },
    Array(Vec<Value>),
    List(Vec<Value>),
    Composite {
        name: String,
        fields: Vec<Value>,
    },
}

impl Value {
    pub fn type_name(&self) -> String {
        match self {
            Value::Void => "()".to_string(),
            Value::Int(_) => "i32".to_string(),
            Value::Long(_) => "i64".to_string(),
            Value::BigInt(_) => "U256".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Str(_) => "String".to_string(),
            Value::Address(_) => "Address".to_string(),
            Value::Bytes(_) => "Bytes".to_string(),
            Value::Amount(_) => "Balance".to_string(),
            Value::Account(_) => "Account".to_string(),
            Value::Enum { variant, .. } => format!("enum variant {}", variant),
            Value::Array(_) => "array".to_string(),
            Value::List(_) => "list".to_string(),
            Value::Composite { name, .. } => name.clone(),
        }
    }
}

/// A Rust type usable as a proxy method parameter or return type.
pub trait Native: Sized {
    fn native_type() -> NativeType;

    fn from_value(value: Value) -> Result<Self>;

    fn into_value(self) -> Value;
}

/// The error for a value that does not have the shape `T` expects.
pub fn mismatch<T: Native>(value: &Value) -> Error {
    Error::ConversionError {
        native: value.type_name(),
        target: T::native_type().to_string(),
    }
}

macro_rules! impl_native {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl Native for $ty {
                fn native_type() -> NativeType {
                    NativeType::$variant
                }

                fn from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(mismatch::<Self>(&other)),
                    }
                }

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }
            }
        )+
    };
}

impl_native! {
    i32 => Int,
    i64 => Long,
    U256 => BigInt,
    bool => Bool,
    String => Str,
    Address => Address,
    Balance => Amount,
    Account => Account,
}

impl Native for () {
    fn native_type() -> NativeType {
        NativeType::Void
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Void => Ok(()),
            other => Err(mismatch::<Self>(&other)),
        }
    }

    fn into_value(self) -> Value {
        Value::Void
    }
}

/// An opaque byte string, as opposed to a `Vec` of individual values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bytes(pub Vec<u8>);

impl From<Vec<u8>> for Bytes {
    fn from(bytes: Vec<u8>) -> Self {
        Bytes(bytes)
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Native for Bytes {
    fn native_type() -> NativeType {
        NativeType::Bytes
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bytes(bytes) => Ok(Bytes(bytes)),
            other => Err(mismatch::<Self>(&other)),
        }
    }

    fn into_value(self) -> Value {
        Value::Bytes(self.0)
    }
}

fn from_values<T: Native>(items: Vec<Value>) -> Result<Vec<T>> {
    items.into_iter().map(T::from_value).collect()
}

impl<T: Native> Native for Vec<T> {
    fn native_type() -> NativeType {
        NativeType::List(Box::new(T::native_type()))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::List(items) | Value::Array(items) => from_values(items),
            other => Err(mismatch::<Self>(&other)),
        }
    }

    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(T::into_value).collect())
    }
}

impl<T: Native> Native for Box<[T]> {
    fn native_type() -> NativeType {
        NativeType::Array(Box::new(T::native_type()))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) | Value::List(items) => {
                from_values(items).map(Vec::into_boxed_slice)
            }
            other => Err(mismatch::<Self>(&other)),
        }
    }

    fn into_value(self) -> Value {
        Value::Array(self.into_vec().into_iter().map(T::into_value).collect())
    }
}
