/// Declares a typed contract interface.
///
/// Each method's form selects how it is dispatched:
///
/// * `fn m(..);` submits a transaction and returns once it is sent.
/// * `fn m(..) -> T;` makes a read-only call and returns its result.
/// * `async fn m(..) -> T;` submits a transaction and returns a
///   `PendingCall<T>` that resolves once the transaction is mined.
///
/// ## Example
///
/// ```
/// oasis_proxy::contract_interface! {
///     pub struct Counter {
///         fn set(value: i64);
///         fn get() -> i64;
///         async fn increment(by: i64) -> i64;
///     }
/// }
/// ```
#[macro_export]
macro_rules! contract_interface {
    (@describe $methods:ident;) => {};
    (@describe $methods:ident;
        $(#[$attr:meta])*
        async fn $method:ident($($arg:ident : $ty:ty),* $(,)?) -> $ret:ty;
        $($rest:tt)*
    ) => {
        $methods.push($crate::MethodDescriptor::new(
            stringify!($method),
            vec![$(<$ty as $crate::Native>::native_type()),*],
            $crate::ReturnShape::Future(<$ret as $crate::Native>::native_type()),
        ));
        $crate::contract_interface!(@describe $methods; $($rest)*);
    };
    (@describe $methods:ident;
        $(#[$attr:meta])*
        fn $method:ident($($arg:ident : $ty:ty),* $(,)?) -> $ret:ty;
        $($rest:tt)*
    ) => {
        $methods.push($crate::MethodDescriptor::new(
            stringify!($method),
            vec![$(<$ty as $crate::Native>::native_type()),*],
            $crate::ReturnShape::Value(<$ret as $crate::Native>::native_type()),
        ));
        $crate::contract_interface!(@describe $methods; $($rest)*);
    };
    (@describe $methods:ident;
        $(#[$attr:meta])*
        fn $method:ident($($arg:ident : $ty:ty),* $(,)?);
        $($rest:tt)*
    ) => {
        $methods.push($crate::MethodDescriptor::new(
            stringify!($method),
            vec![$(<$ty as $crate::Native>::native_type()),*],
            $crate::ReturnShape::Void,
        ));
        $crate::contract_interface!(@describe $methods; $($rest)*);
    };

    (@methods) => {};
    (@methods
        $(#[$attr:meta])*
        async fn $method:ident($($arg:ident : $ty:ty),* $(,)?) -> $ret:ty;
        $($rest:tt)*
    ) => {
        $(#[$attr])*
        pub fn $method(&self, $($arg: $ty),*) -> $crate::Result<$crate::PendingCall<$ret>> {
            self.proxy
                .submit(stringify!($method), vec![$($crate::Native::into_value($arg)),*])
        }
        $crate::contract_interface!(@methods $($rest)*);
    };
    (@methods
        $(#[$attr:meta])*
        fn $method:ident($($arg:ident : $ty:ty),* $(,)?) -> $ret:ty;
        $($rest:tt)*
    ) => {
        $(#[$attr])*
        pub fn $method(&self, $($arg: $ty),*) -> $crate::Result<$ret> {
            self.proxy
                .call(stringify!($method), vec![$($crate::Native::into_value($arg)),*])
        }
        $crate::contract_interface!(@methods $($rest)*);
    };
    (@methods
        $(#[$attr:meta])*
        fn $method:ident($($arg:ident : $ty:ty),* $(,)?);
        $($rest:tt)*
    ) => {
        $(#[$attr])*
        pub fn $method(&self, $($arg: $ty),*) -> $crate::Result<()> {
            self.proxy
                .send(stringify!($method), vec![$($crate::Native::into_value($arg)),*])
        }
        $crate::contract_interface!(@methods $($rest)*);
    };

    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident {
            $($methods:tt)*
        }
    ) => {
        $(#[$attr])*
        #[derive(Clone, Debug)]
        $vis struct $name {
            proxy: $crate::ContractProxy,
        }

        impl $crate::Interface for $name {
            fn descriptor() -> $crate::InterfaceDescriptor {
                let mut methods = ::std::vec::Vec::new();
                $crate::contract_interface!(@describe methods; $($methods)*);
                $crate::InterfaceDescriptor::new(stringify!($name), methods)
            }

            fn from_proxy(proxy: $crate::ContractProxy) -> Self {
                Self { proxy }
            }

            fn proxy(&self) -> &$crate::ContractProxy {
                &self.proxy
            }
        }

        impl $name {
            $crate::contract_interface!(@methods $($methods)*);
        }
    };
}

/// Declares a record type that can be returned from contract methods.
/// Multi-value results fill the fields in declaration order.
#[macro_export]
macro_rules! contract_struct {
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident {
            $($(#[$field_attr:meta])* $field_vis:vis $field:ident : $ty:ty),+ $(,)?
        }
    ) => {
        $(#[$attr])*
        $vis struct $name {
            $($(#[$field_attr])* $field_vis $field: $ty),+
        }

        impl $crate::Native for $name {
            fn native_type() -> $crate::NativeType {
                $crate::reexports::lazy_static::lazy_static! {
                    static ref SCHEMA: ::std::sync::Arc<$crate::CompositeSchema> =
                        ::std::sync::Arc::new($crate::CompositeSchema::new(
                            stringify!($name),
                            vec![$((stringify!($field), <$ty as $crate::Native>::native_type())),+],
                        ));
                }
                $crate::NativeType::Composite(::std::sync::Arc::clone(&SCHEMA))
            }

            fn from_value(value: $crate::Value) -> $crate::Result<Self> {
                let fields = match value {
                    $crate::Value::Composite { fields, .. } => fields,
                    other => return Err($crate::value::mismatch::<Self>(&other)),
                };
                let expected = [$(stringify!($field)),+].len();
                if fields.len() != expected {
                    return Err($crate::Error::ArityMismatch {
                        type_name: stringify!($name).to_string(),
                        expected,
                        found: fields.len(),
                    });
                }
                let mut fields = fields.into_iter();
                Ok(Self {
                    $($field: <$ty as $crate::Native>::from_value(
                        fields.next().unwrap_or($crate::Value::Void),
                    )?),+
                })
            }

            fn into_value(self) -> $crate::Value {
                $crate::Value::Composite {
                    name: stringify!($name).to_string(),
                    fields: vec![$($crate::Native::into_value(self.$field)),+],
                }
            }
        }
    };
}

/// Declares a fieldless enum passed to and from contracts as its ordinal.
#[macro_export]
macro_rules! contract_enum {
    (
        $(#[$attr:meta])*
        $vis:vis enum $name:ident {
            $($(#[$variant_attr:meta])* $variant:ident),+ $(,)?
        }
    ) => {
        $(#[$attr])*
        $vis enum $name {
            $($(#[$variant_attr])* $variant),+
        }

        impl $crate::Native for $name {
            fn native_type() -> $crate::NativeType {
                $crate::NativeType::Enum($crate::EnumSchema {
                    name: stringify!($name),
                    variants: &[$(stringify!($variant)),+],
                })
            }

            fn from_value(value: $crate::Value) -> $crate::Result<Self> {
                match value {
                    $crate::Value::Enum { ordinal, .. } => {
                        ::std::iter::IntoIterator::into_iter([$($name::$variant),+])
                            .nth(ordinal)
                            .ok_or_else(|| $crate::Error::ConversionError {
                                native: format!("ordinal {}", ordinal),
                                target: stringify!($name).to_string(),
                            })
                    }
                    other => Err($crate::value::mismatch::<Self>(&other)),
                }
            }

            fn into_value(self) -> $crate::Value {
                let variants: &[&'static str] = &[$(stringify!($variant)),+];
                let ordinal = self as usize;
                $crate::Value::Enum {
                    ordinal,
                    variant: variants[ordinal],
                }
            }
        }
    };
}
