// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Instruction categories
//!
//! A category is a label plus a pure predicate over a single instruction.
//! The built-in categories are closed sets of canonical mnemonics covering
//! both x86-64 and AArch64; the two mnemonic spaces do not overlap.

use std::{collections::HashSet, fmt};

use codegen::BasicInstruction;
use lazy_static::lazy_static;

/// Comparison and test instructions
const COMPARISON_MNEMONICS: &[&str] = &[
    // x86-64: integer compare and test
    "cmp",
    "test",
    // x86-64: string compare, every operand size and `rep` form decodes as `cmps`
    "cmps",
    // x86-64: SSE scalar double compare (same name as the legacy string form)
    "cmpsd",
    // x86-64: compare-exchange
    "cmpxchg",
    "cmpxchg8b",
    "cmpxchg16b",
    // x86-64: SSE packed/scalar compare
    "cmpps",
    "cmppd",
    "cmpss",
    // AArch64
    "cmp",
    "cmn",
    "tst",
    "ccmp",
    "ccmn",
];

/// Call instructions
const CALL_MNEMONICS: &[&str] = &[
    // x86-64
    "call",
    "callf",
    // AArch64, including pointer-authenticated forms
    "bl",
    "blr",
    "blraa",
    "blraaz",
    "blrab",
    "blrabz",
];

lazy_static! {
    static ref COMPARISONS: HashSet<&'static str> =
        COMPARISON_MNEMONICS.iter().copied().collect();
    static ref CALLS: HashSet<&'static str> = CALL_MNEMONICS.iter().copied().collect();
}

/// Check if this is a comparison-class instruction (compare or test).
pub fn is_comparison(instruction: &dyn BasicInstruction) -> bool {
    COMPARISONS.contains(instruction.mnemonic())
}

/// Check if this is a call-class instruction.
pub fn is_call(instruction: &dyn BasicInstruction) -> bool {
    CALLS.contains(instruction.mnemonic())
}

/// A named instruction predicate
///
/// New categories are plain values; the range checker works with any of them.
#[derive(Clone, Copy)]
pub struct Category {
    label: &'static str,
    predicate: fn(&dyn BasicInstruction) -> bool,
}

impl Category {
    pub const COMPARISONS: Category = Category::new("comparisons", is_comparison);
    pub const CALLS: Category = Category::new("calls", is_call);

    pub const fn new(label: &'static str, predicate: fn(&dyn BasicInstruction) -> bool) -> Self {
        Self { label, predicate }
    }

    /// Plural noun used in failure messages, e.g. `calls`
    pub fn label(&self) -> &'static str {
        self.label
    }

    #[inline]
    pub fn matches(&self, instruction: &dyn BasicInstruction) -> bool {
        (self.predicate)(instruction)
    }
}

impl fmt::Debug for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Category")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
