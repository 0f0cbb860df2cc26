// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use hdds_packer::Packer;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };

    // A failed definition must leave the registry untouched.
    let mut packer = Packer::new();
    let before = packer.registry().len();
    if packer.define_type_json(json).is_err() {
        assert_eq!(packer.registry().len(), before);
    }
});
