use super::*;
use crate::errors::AbiError;

fn word(value: u64) -> Vec<u8> {
    util::pad_u64(value).to_vec()
}

fn text(s: &str) -> Vec<u8> {
    let mut padded = s.as_bytes().to_vec();
    padded.resize((s.len() + 31) / 32 * 32, 0);
    padded
}

fn concat(parts: &[Vec<u8>]) -> Vec<u8> {
    parts.iter().flatten().copied().collect()
}

fn function(name: &str, inputs: &[&str]) -> FunctionDescriptor {
    FunctionDescriptor::new(
        name,
        inputs.iter().map(|ty| ty.parse().unwrap()).collect(),
        inputs.iter().map(|ty| ty.parse().unwrap()).collect(),
        true,
    )
}

#[test]
fn static_arguments() {
    let f = function("baz", &["uint32", "bool"]);
    assert_eq!(f.selector(), [0xcd, 0xcd, 0x77, 0xc0]);
    let args = vec![AbiValue::uint(69), AbiValue::Bool(true)];
    let data = f.encode_call(&args).unwrap();
    assert_eq!(data[4..], concat(&[word(69), word(1)])[..]);
    assert_eq!(f.decode_input(&data).unwrap(), args);
}

#[test]
fn dynamic_arguments() {
    let f = function("sam", &["bytes", "bool", "uint256[]"]);
    assert_eq!(f.selector(), [0xa5, 0x64, 0x3b, 0xf2]);
    let args = vec![
        AbiValue::Bytes(b"dave".to_vec()),
        AbiValue::Bool(true),
        AbiValue::Array(vec![AbiValue::uint(1), AbiValue::uint(2), AbiValue::uint(3)]),
    ];
    let expected = concat(&[
        word(0x60),
        word(1),
        word(0xa0),
        word(4),
        text("dave"),
        word(3),
        word(1),
        word(2),
        word(3),
    ]);
    let data = f.encode_call(&args).unwrap();
    assert_eq!(data[4..], expected[..]);
    assert_eq!(f.decode_input(&data).unwrap(), args);
}

#[test]
fn mixed_arguments() {
    let f = function("f", &["uint256", "uint32[]", "bytes10", "bytes"]);
    assert_eq!(f.selector(), [0x8b, 0xe6, 0x52, 0x46]);
    let args = vec![
        AbiValue::uint(0x123),
        AbiValue::Array(vec![AbiValue::uint(0x456), AbiValue::uint(0x789)]),
        AbiValue::FixedBytes(b"1234567890".to_vec()),
        AbiValue::Bytes(b"Hello, world!".to_vec()),
    ];
    let expected = concat(&[
        word(0x123),
        word(0x80),
        text("1234567890"),
        word(0xe0),
        word(2),
        word(0x456),
        word(0x789),
        word(13),
        text("Hello, world!"),
    ]);
    assert_eq!(f.encode_output(&args).unwrap(), expected);
    assert_eq!(f.decode_output(&expected).unwrap(), args);
}

#[test]
fn nested_dynamic_arrays() {
    let f = function("g", &["uint256[][]", "string[]"]);
    let args = vec![
        AbiValue::Array(vec![
            AbiValue::Array(vec![AbiValue::uint(1), AbiValue::uint(2)]),
            AbiValue::Array(vec![AbiValue::uint(3)]),
        ]),
        AbiValue::Array(vec![
            AbiValue::String("one".to_string()),
            AbiValue::String("two".to_string()),
            AbiValue::String("three".to_string()),
        ]),
    ];
    let expected = concat(&[
        word(0x40),
        word(0x140),
        word(2),
        word(0x40),
        word(0xa0),
        word(2),
        word(1),
        word(2),
        word(1),
        word(3),
        word(3),
        word(0x60),
        word(0xa0),
        word(0xe0),
        word(3),
        text("one"),
        word(3),
        text("two"),
        word(5),
        text("three"),
    ]);
    assert_eq!(f.encode_output(&args).unwrap(), expected);
    assert_eq!(f.decode_output(&expected).unwrap(), args);
}

#[test]
fn negative_integers() {
    let f = function("neg", &["int8", "int256"]);
    let args = vec![AbiValue::int(-1), AbiValue::int(-23)];
    let data = f.encode_output(&args).unwrap();
    assert!(data[..32].iter().all(|b| *b == 0xff));
    assert_eq!(f.decode_output(&data).unwrap(), args);

    let mut out_of_range = word(0x80);
    out_of_range.extend(word(0));
    match f.decode_output(&out_of_range) {
        Err(AbiError::InvalidPadding) => (),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn malformed_payloads() {
    let f = function("m", &["bool", "string"]);
    match f.decode_output(&word(1)) {
        Err(AbiError::UnexpectedEof) => (),
        other => panic!("unexpected {:?}", other),
    }
    match f.decode_output(&concat(&[word(2), word(0x40), word(0)])) {
        Err(AbiError::InvalidBool) => (),
        other => panic!("unexpected {:?}", other),
    }
    match f.decode_output(&concat(&[word(1), word(0x1000)])) {
        Err(AbiError::InvalidOffset) => (),
        other => panic!("unexpected {:?}", other),
    }
    match f.decode_output(&concat(&[word(1), word(0x40), word(1), vec![0xff; 32]])) {
        Err(AbiError::InvalidUtf8) => (),
        other => panic!("unexpected {:?}", other),
    }
    match f.decode_output(&concat(&[word(1), word(0x40), word(u64::max_value())])) {
        Err(AbiError::UnexpectedEof) => (),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn array_lengths_are_bounded_by_payload() {
    let f = function("m", &["uint256[]"]);
    match f.decode_output(&concat(&[word(0x20), word(1 << 24)])) {
        Err(AbiError::InvalidOffset) => (),
        other => panic!("unexpected {:?}", other),
    }
    match f.decode_output(&concat(&[word(0x20), word(3), word(1), word(2)])) {
        Err(AbiError::InvalidOffset) => (),
        other => panic!("unexpected {:?}", other),
    }
    let f = function("m", &["string[]"]);
    match f.decode_output(&concat(&[word(0x20), word(u64::max_value())])) {
        Err(AbiError::InvalidOffset) => (),
        other => panic!("unexpected {:?}", other),
    }
    let f = function("m", &["uint256[]"]);
    assert_eq!(
        f.decode_output(&concat(&[word(0x20), word(0)])).unwrap(),
        vec![AbiValue::Array(vec![])]
    );
}

#[test]
fn rejects_mismatched_values() {
    let f = function("m", &["address", "bytes4"]);
    match f.encode_call(&[AbiValue::uint(1)]) {
        Err(AbiError::ArgumentCount {
            expected: 2,
            found: 1,
        }) => (),
        other => panic!("unexpected {:?}", other),
    }
    match f.encode_call(&[AbiValue::Bool(true), AbiValue::FixedBytes(vec![1; 4])]) {
        Err(AbiError::TypeMismatch { found: "bool", .. }) => (),
        other => panic!("unexpected {:?}", other),
    }
    let zero = AbiValue::Address(Default::default());
    match f.encode_call(&[zero, AbiValue::FixedBytes(vec![1; 3])]) {
        Err(AbiError::TypeMismatch { .. }) => (),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn selector_is_checked() {
    let f = function("baz", &["uint32", "bool"]);
    let data = function("bar", &["uint32", "bool"])
        .encode_call(&[AbiValue::uint(1), AbiValue::Bool(false)])
        .unwrap();
    match f.decode_input(&data) {
        Err(AbiError::SelectorMismatch(sig)) => assert_eq!(sig, "baz(uint32,bool)"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn parse_json_abi() {
    let abi = ContractAbi::new(
        r#"[
            {"type": "constructor", "inputs": [{"name": "a", "type": "uint256"}]},
            {"type": "event", "name": "Moved", "inputs": [], "anonymous": false},
            {"type": "function", "name": "set", "inputs": [{"name": "v", "type": "int256"}],
             "outputs": [], "stateMutability": "nonpayable"},
            {"name": "get", "inputs": [], "outputs": [{"name": "", "type": "int256"}],
             "constant": true},
            {"type": "function", "name": "names", "inputs": [],
             "outputs": [{"name": "", "type": "string[]"}], "stateMutability": "view"},
            {"type": "fallback", "stateMutability": "payable"}
        ]"#,
    );
    let functions = abi.functions().unwrap();
    let names: Vec<&str> = functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["set", "get", "names"]);
    assert!(functions[0].mutating);
    assert!(!functions[1].mutating);
    assert!(!functions[2].mutating);
    assert_eq!(functions[0].signature(), "set(int256)");
    assert_eq!(
        functions[2].outputs,
        vec![TypeTag::Array(Box::new(TypeTag::String))]
    );
}

#[test]
fn reject_bad_json_abi() {
    match ContractAbi::new("{").functions() {
        Err(AbiError::Json(_)) => (),
        other => panic!("unexpected {:?}", other),
    }
    let abi = ContractAbi::new(r#"[{"type": "function", "name": "f", "inputs": [{"type": "tuple"}]}]"#);
    match abi.functions() {
        Err(AbiError::UnknownType(ty)) => assert_eq!(ty, "tuple"),
        other => panic!("unexpected {:?}", other),
    }
}
