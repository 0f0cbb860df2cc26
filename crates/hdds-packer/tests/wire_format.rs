// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Wire format golden vectors: exact bytes a peer must produce and accept.
//
// Each vector packs a known value, compares against hand-assembled bytes,
// then unpacks those bytes back to the value.

#![allow(clippy::unreadable_literal)]

use hdds_packer::varint::encode_varint;
use hdds_packer::{Error, Packer, TypeDefinition, Value};

fn check(packer: &Packer, type_name: &str, value: &Value, expected: &[u8]) {
    let bytes = packer.pack(type_name, value).unwrap();
    assert_eq!(bytes, expected, "{type_name}: encoded bytes differ");
    assert_eq!(
        &packer.unpack_as(type_name, expected).unwrap(),
        value,
        "{type_name}: decoded value differs"
    );
}

fn numbered_enum(name: &str, count: usize) -> TypeDefinition {
    TypeDefinition::enumeration(name, (0..count).map(|i| format!("item{i}")))
}

#[test]
fn golden_builtin_scalars() {
    let packer = Packer::new();

    check(&packer, "int", &Value::Int(0), &[0x00, 0x01, 0x00]);
    check(&packer, "int", &Value::Int(127), &[0x00, 0x01, 0x7F]);
    check(&packer, "int", &Value::Int(128), &[0x00, 0x02, 0x80, 0x01]);
    check(&packer, "string", &Value::from("abc"), &[0x02, 0x03, b'a', b'b', b'c']);
    check(
        &packer,
        "float",
        &Value::Float(1.0),
        &[0x03, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF0, 0x3F],
    );
}

#[test]
fn golden_sign_separation() {
    let packer = Packer::new();
    let bytes = packer.pack("int", &Value::Int(-5)).unwrap();

    let mut expected = vec![0x01];
    expected.extend(encode_varint(1));
    expected.extend(encode_varint(5));
    assert_eq!(bytes, expected);
    assert_eq!(packer.unpack(&bytes).unwrap(), Value::Int(-5));
}

#[test]
fn golden_negative_field_inside_struct() {
    let mut packer = Packer::new();
    packer
        .define_type(&TypeDefinition::structure("Offset").field("dx", "int"))
        .unwrap();

    let value = Value::structure([("dx", Value::Int(-300))]);
    check(&packer, "Offset", &value, &[0x07, 0x04, 0x01, 0x02, 0xAC, 0x02]);
}

#[test]
fn golden_alias_uses_own_code() {
    let mut packer = Packer::new();
    let age = packer.define_type(&TypeDefinition::alias("Age", "int")).unwrap();
    assert_eq!(age, 7);

    check(&packer, "Age", &Value::Int(42), &[0x07, 0x01, 42]);
    // Negative values leave the alias code for neg-int.
    assert_eq!(packer.pack("Age", &Value::Int(-1)).unwrap(), vec![0x01, 0x01, 0x01]);
}

#[test]
fn golden_enum_ordinal_127() {
    let mut packer = Packer::new();
    packer.define_type(&numbered_enum("Wide", 128)).unwrap();

    check(&packer, "Wide", &Value::label("item127"), &[0x07, 0x01, 0x7F]);
}

#[test]
fn golden_enum_ordinal_above_127_uses_full_varint() {
    let mut packer = Packer::new();
    packer.define_type(&numbered_enum("Wider", 300)).unwrap();

    check(&packer, "Wider", &Value::label("item128"), &[0x07, 0x02, 0x80, 0x01]);
    check(&packer, "Wider", &Value::label("item299"), &[0x07, 0x02, 0xAB, 0x02]);
}

#[test]
fn golden_optional_field_marker() {
    let mut packer = Packer::new();
    packer
        .define_type(
            &TypeDefinition::structure("Pair")
                .field("one", "int")
                .field("two", "string"),
        )
        .unwrap();

    let value = Value::structure([("one", Value::Int(1))]);
    // `two` is written as its type code with an empty payload.
    check(&packer, "Pair", &value, &[0x07, 0x05, 0x00, 0x01, 0x01, 0x02, 0x00]);

    let decoded = packer.unpack(&[0x07, 0x05, 0x00, 0x01, 0x01, 0x02, 0x00]).unwrap();
    assert!(decoded.get_field("two").is_none());
}

#[test]
fn golden_array_of_strings() {
    let mut packer = Packer::new();
    packer
        .define_type(&TypeDefinition::array("Words", "string"))
        .unwrap();

    check(
        &packer,
        "Words",
        &Value::from(vec!["hi", "yo"]),
        &[0x07, 0x08, 0x02, 0x02, b'h', b'i', 0x02, 0x02, b'y', b'o'],
    );
}

#[test]
fn golden_explicit_codes() {
    let mut packer = Packer::new();
    let first = packer.reserve_type_codes(100).unwrap();
    assert_eq!(first, 7);

    packer
        .define_type(&TypeDefinition::alias("Label", "string").with_code(50))
        .unwrap();
    let next = packer.define_type(&TypeDefinition::alias("Next", "int")).unwrap();
    assert_eq!(next, 107);

    check(&packer, "Label", &Value::from("x"), &[50, 0x01, b'x']);
    check(&packer, "Next", &Value::Int(1), &[107, 0x01, 0x01]);
}

#[test]
fn golden_unknown_enum_value_produces_nothing() {
    let mut packer = Packer::new();
    packer.define_type(&numbered_enum("Small", 2)).unwrap();

    assert_eq!(
        packer.pack("Small", &Value::label("item9")),
        Err(Error::UnknownEnumValue {
            enum_name: "Small".into(),
            label: "item9".into(),
        })
    );
}
