use blockchain_traits::TxError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("`{interface}` has no method `{method}`")]
    BindingNotFound { interface: String, method: String },

    #[error("no contract found for {0}")]
    ContractNotFound(String),

    #[error("superfluous function definition in interface `{interface}`: {methods:?}")]
    SuperfluousMethod {
        interface: String,
        methods: Vec<String>,
    },

    #[error("parameter count mismatch for `{function}`: ABI has {abi}, interface has {interface}")]
    ParameterCountMismatch {
        function: String,
        abi: usize,
        interface: usize,
    },

    #[error("cannot convert {native} into {target}")]
    ConversionError { native: String, target: String },

    #[error("no converter found for {0}")]
    NoConverterFound(String),

    #[error("`{type_name}` has {expected} fields but {found} values were provided")]
    ArityMismatch {
        type_name: String,
        expected: usize,
        found: usize,
    },

    #[error("no initializer of `{type_name}` takes {arity} values")]
    NoSuitableConstructor { type_name: String, arity: usize },

    #[error("compilation failed: {0}")]
    CompilationError(String),

    #[error("more than one contract matches `{0}`")]
    AmbiguousContract(String),

    #[error(transparent)]
    Abi(#[from] AbiError),

    #[error(transparent)]
    Transaction(#[from] TxError),
}

#[derive(Debug, thiserror::Error)]
pub enum AbiError {
    #[error("unexpected end of stream")]
    UnexpectedEof,

    #[error("invalid bool for provided input")]
    InvalidBool,

    #[error("invalid padding for fixed type")]
    InvalidPadding,

    #[error("invalid offset or length")]
    InvalidOffset,

    #[error("invalid utf-8 in string")]
    InvalidUtf8,

    #[error("unknown ABI type `{0}`")]
    UnknownType(String),

    #[error("expected a value of type `{expected}`, found {found}")]
    TypeMismatch {
        expected: String,
        found: &'static str,
    },

    #[error("expected {expected} values, found {found}")]
    ArgumentCount { expected: usize, found: usize },

    #[error("underflow of pushed parameters {pushed}/{expected}")]
    Underflow { pushed: usize, expected: usize },

    #[error("call data does not start with the selector of `{0}`")]
    SelectorMismatch(String),

    #[error("malformed JSON ABI: {0}")]
    Json(#[from] serde_json::Error),
}
