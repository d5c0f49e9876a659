use std::{
    io::Write,
    path::PathBuf,
    process::{Command, Stdio},
};

use crate::{
    abi::ContractAbi,
    errors::{Error, Result},
};

/// Solidity source text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SoliditySource(String);

impl SoliditySource {
    pub fn new(source: impl Into<String>) -> Self {
        SoliditySource(source.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SoliditySource {
    fn from(source: &str) -> Self {
        SoliditySource::new(source)
    }
}

impl From<String> for SoliditySource {
    fn from(source: String) -> Self {
        SoliditySource::new(source)
    }
}

pub trait Compiler: Send + Sync {
    fn compile(&self, source: &SoliditySource) -> Result<CompilationResult>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractMetadata {
    pub name: String,
    pub abi: ContractAbi,
    /// Hex-encoded deployment bytecode.
    pub bin: String,
}

impl ContractMetadata {
    pub fn bytecode(&self) -> Result<Vec<u8>> {
        let bin = self.bin.trim();
        let bin = if bin.starts_with("0x") { &bin[2..] } else { bin };
        hex::decode(bin).map_err(|err| {
            Error::CompilationError(format!("invalid bytecode for `{}`: {}", self.name, err))
        })
    }
}

/// The contracts produced by one compilation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompilationResult {
    contracts: Vec<ContractMetadata>,
}

#[derive(Deserialize)]
struct CombinedJson {
    contracts: std::collections::BTreeMap<String, CombinedContract>,
}

#[derive(Deserialize)]
struct CombinedContract {
    abi: serde_json::Value,
    #[serde(default)]
    bin: String,
}

impl CompilationResult {
    pub fn new(contracts: Vec<ContractMetadata>) -> Self {
        Self { contracts }
    }

    /// Parses the output of `solc --combined-json abi,bin`.
    /// Contracts are keyed `file:Name`; only `Name` is kept.
    pub fn parse(combined_json: &str) -> Result<Self> {
        let combined: CombinedJson = serde_json::from_str(combined_json)
            .map_err(|err| Error::CompilationError(format!("malformed compiler output: {}", err)))?;
        let contracts = combined
            .contracts
            .into_iter()
            .map(|(key, contract)| {
                let name = match key.rfind(':') {
                    Some(idx) => key[idx + 1..].to_string(),
                    None => key,
                };
                // Older compilers emit the ABI as a JSON string.
                let abi = match contract.abi {
                    serde_json::Value::String(abi) => abi,
                    abi => abi.to_string(),
                };
                ContractMetadata {
                    name,
                    abi: ContractAbi::new(abi),
                    bin: contract.bin,
                }
            })
            .collect();
        Ok(Self { contracts })
    }

    pub fn contracts(&self) -> &[ContractMetadata] {
        &self.contracts
    }

    /// The unique contract named `name`, ignoring ASCII case.
    pub fn find(&self, name: &str) -> Result<&ContractMetadata> {
        let mut matches = self
            .contracts
            .iter()
            .filter(|c| c.name.eq_ignore_ascii_case(name));
        match (matches.next(), matches.next()) {
            (Some(contract), None) => Ok(contract),
            (Some(_), Some(_)) => Err(Error::AmbiguousContract(name.to_string())),
            (None, _) => Err(Error::ContractNotFound(format!("contract named `{}`", name))),
        }
    }
}

/// Compiles by invoking a `solc` executable.
#[derive(Clone, Debug)]
pub struct Solc {
    path: PathBuf,
}

impl Solc {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for Solc {
    fn default() -> Self {
        Solc::new("solc")
    }
}

impl Compiler for Solc {
    fn compile(&self, source: &SoliditySource) -> Result<CompilationResult> {
        let io_error = |err: std::io::Error| {
            Error::CompilationError(format!("could not run `{}`: {}", self.path.display(), err))
        };
        debug!("compiling with `{}`", self.path.display());
        let mut child = Command::new(&self.path)
            .args(&["--combined-json", "abi,bin", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(io_error)?;
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(err) = stdin.write_all(source.as_str().as_bytes()) {
                drop(stdin);
                // Reap the child before reporting; it may already have exited.
                let _ = child.kill();
                let _ = child.wait();
                return Err(io_error(err));
            }
        }
        let output = child.wait_with_output().map_err(io_error)?;
        if !output.status.success() {
            return Err(Error::CompilationError(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }
        CompilationResult::parse(&String::from_utf8_lossy(&output.stdout))
    }
}
