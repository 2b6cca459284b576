// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for results artifact parsing
//!
//! This fuzzes `parse_results_document` followed by `synthesize`, checking
//! that no emitted suite is ever empty.

#![no_main]

use libfuzzer_sys::fuzz_target;

use testbridge_report::{parse_results_document, synthesize};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(document) = parse_results_document(input) {
            let tree = synthesize(&document);
            assert!(tree.iter().all(|suite| !suite.cases.is_empty()));
        }
    }
});
