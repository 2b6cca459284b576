// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for `--list` output parsing

#![no_main]

use libfuzzer_sys::fuzz_target;

use testbridge_report::parse_discovery_output;

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);
    let tree = parse_discovery_output(&input);
    assert_eq!(tree.len(), input.lines().count());
});
