// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use codegen::Codegen;

use crate::Failure;

const TOO_LARGE: &str = "The method was expected to be smaller";

/// Check that the emitted code of `codegen` is at most `max_bytes` long.
pub fn check_max_size(codegen: &Codegen, max_bytes: usize) -> Result<(), Failure> {
    let actual = codegen.byte_len();
    if actual <= max_bytes {
        return Ok(());
    }
    Err(Failure::expected_actual(max_bytes, actual, TOO_LARGE, codegen))
}
