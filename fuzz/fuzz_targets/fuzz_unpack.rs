// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use hdds_packer::Packer;
use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

const SCHEMA: &str = r#"[
    { "name": "Kind", "type": "enum", "items": ["a", "b", "c"] },
    { "name": "Node", "type": "struct", "fields": [
        { "name": "id", "type": "int" },
        { "name": "label", "type": "string" },
        { "name": "kind", "type": "Kind" },
        { "name": "weight", "type": "float" },
        { "name": "children", "type": "array", "entryType": "Node" }
    ] }
]"#;

fn packer() -> &'static Packer {
    static PACKER: OnceLock<Packer> = OnceLock::new();
    PACKER.get_or_init(|| {
        let mut packer = Packer::new();
        packer.define_types_json(SCHEMA).expect("fuzz schema");
        packer
    })
}

fuzz_target!(|data: &[u8]| {
    let packer = packer();

    // Self-typed decode
    let _ = packer.unpack(data);

    // Decode as a known recursive type; once re-encoded, the bytes must be
    // a fixed point of unpack/pack.
    if let Ok(value) = packer.unpack_as("Node", data) {
        let bytes = packer.pack("Node", &value).expect("re-encode decoded value");
        let again = packer.unpack_as("Node", &bytes).expect("decode re-encoded bytes");
        assert_eq!(packer.pack("Node", &again).ok(), Some(bytes));
    }
});
