use super::{util, AbiValue, Sink, Stream, TypeTag};
use crate::errors::AbiError;

/// A callable contract function as described by its ABI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionDescriptor {
    pub name: String,
    pub inputs: Vec<TypeTag>,
    pub outputs: Vec<TypeTag>,
    /// `false` for `view`, `pure`, and `constant` functions.
    pub mutating: bool,
}

impl FunctionDescriptor {
    pub fn new(
        name: impl Into<String>,
        inputs: Vec<TypeTag>,
        outputs: Vec<TypeTag>,
        mutating: bool,
    ) -> Self {
        Self {
            name: name.into(),
            inputs,
            outputs,
            mutating,
        }
    }

    /// The canonical signature, e.g. `transfer(address,uint256)`.
    pub fn signature(&self) -> String {
        let inputs: Vec<String> = self.inputs.iter().map(ToString::to_string).collect();
        format!("{}({})", self.name, inputs.join(","))
    }

    pub fn selector(&self) -> [u8; 4] {
        util::selector(&self.signature())
    }

    pub fn encode_call(&self, args: &[AbiValue]) -> Result<Vec<u8>, AbiError> {
        let mut data = self.selector().to_vec();
        data.append(&mut encode_values(&self.inputs, args)?);
        Ok(data)
    }

    pub fn decode_input(&self, data: &[u8]) -> Result<Vec<AbiValue>, AbiError> {
        if data.len() < 4 || data[..4] != self.selector() {
            return Err(AbiError::SelectorMismatch(self.signature()));
        }
        decode_values(&self.inputs, &data[4..])
    }

    pub fn encode_output(&self, values: &[AbiValue]) -> Result<Vec<u8>, AbiError> {
        encode_values(&self.outputs, values)
    }

    pub fn decode_output(&self, data: &[u8]) -> Result<Vec<AbiValue>, AbiError> {
        decode_values(&self.outputs, data)
    }
}

fn encode_values(types: &[TypeTag], values: &[AbiValue]) -> Result<Vec<u8>, AbiError> {
    if types.len() != values.len() {
        return Err(AbiError::ArgumentCount {
            expected: types.len(),
            found: values.len(),
        });
    }
    let mut sink = Sink::new(types);
    for (ty, val) in types.iter().zip(values) {
        sink.push(ty, val)?;
    }
    sink.finalize()
}

fn decode_values(types: &[TypeTag], data: &[u8]) -> Result<Vec<AbiValue>, AbiError> {
    let mut stream = Stream::new(data);
    types.iter().map(|ty| stream.pop(ty)).collect()
}

/// A contract's JSON ABI text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractAbi(String);

#[derive(Deserialize)]
struct AbiEntry {
    #[serde(rename = "type", default = "function_entry")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    inputs: Vec<AbiParam>,
    #[serde(default)]
    outputs: Vec<AbiParam>,
    #[serde(default)]
    constant: bool,
    #[serde(rename = "stateMutability", default)]
    state_mutability: Option<String>,
}

#[derive(Deserialize)]
struct AbiParam {
    #[serde(rename = "type")]
    ty: String,
}

fn function_entry() -> String {
    "function".to_string()
}

impl AbiEntry {
    fn is_mutating(&self) -> bool {
        match self.state_mutability.as_ref().map(String::as_str) {
            Some("view") | Some("pure") => false,
            Some(_) => true,
            None => !self.constant,
        }
    }
}

fn parse_params(params: &[AbiParam]) -> Result<Vec<TypeTag>, AbiError> {
    params.iter().map(|param| param.ty.parse()).collect()
}

impl ContractAbi {
    pub fn new(json: impl Into<String>) -> Self {
        ContractAbi(json.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The function entries, in declaration order. Constructors, events,
    /// and fallbacks are skipped.
    pub fn functions(&self) -> Result<Vec<FunctionDescriptor>, AbiError> {
        let entries: Vec<AbiEntry> = serde_json::from_str(&self.0)?;
        entries
            .into_iter()
            .filter(|entry| entry.kind == "function")
            .map(|entry| {
                Ok(FunctionDescriptor {
                    inputs: parse_params(&entry.inputs)?,
                    outputs: parse_params(&entry.outputs)?,
                    mutating: entry.is_mutating(),
                    name: entry.name,
                })
            })
            .collect()
    }
}

impl From<&str> for ContractAbi {
    fn from(json: &str) -> Self {
        ContractAbi::new(json)
    }
}

impl From<String> for ContractAbi {
    fn from(json: String) -> Self {
        ContractAbi::new(json)
    }
}
