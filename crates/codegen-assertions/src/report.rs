// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Assertion failure reports
//!
//! A failure renders to a single block of text:
//!
//! ```text
//! Expected: 32
//! Actual: 40
//! Message: The method was expected to be smaller
//!
//! Codegen:
//!
//! ; crc::update(state, byte) at O2 (x86_64, 40 bytes)
//!     0000: 48 39 f7        cmp rdi, rsi
//!     0003: e8 00 00 00 00  call 0x8
//!     ...
//! ```
//!
//! Range failures skip the expected/actual lines and flag the counted
//! instructions instead:
//!
//! ```text
//! It was supposed to contain no more than 0 calls, got 1 instead
//!
//! Codegen:
//!
//! ; crc::update(state, byte) at O2 (x86_64, 40 bytes)
//!     0000: 48 39 f7        cmp rdi, rsi
//! >>> 0003: e8 00 00 00 00  call 0x8
//!     ...
//! ```

use std::fmt;

use codegen::Codegen;

/// A violated codegen assertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// A measured value did not match the expectation
    ExpectedActual {
        expected: usize,
        actual: usize,
        comment: String,
        listing: String,
    },
    /// A count fell outside its required range
    Range {
        message: String,
        /// Instruction indices flagged in the listing
        flagged: Vec<usize>,
        listing: String,
    },
}

impl Failure {
    pub fn expected_actual(
        expected: usize,
        actual: usize,
        comment: impl Into<String>,
        codegen: &Codegen,
    ) -> Self {
        Failure::ExpectedActual {
            expected,
            actual,
            comment: comment.into(),
            listing: codegen.to_string(),
        }
    }

    pub fn range(message: impl Into<String>, flagged: Vec<usize>, codegen: &Codegen) -> Self {
        let listing = codegen.listing(&flagged);
        Failure::Range {
            message: message.into(),
            flagged,
            listing,
        }
    }

    /// The rendered codegen listing attached to this failure
    pub fn listing(&self) -> &str {
        match self {
            Failure::ExpectedActual { listing, .. } | Failure::Range { listing, .. } => listing,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::ExpectedActual {
                expected,
                actual,
                comment,
                listing,
            } => {
                writeln!(f, "Expected: {expected}")?;
                writeln!(f, "Actual: {actual}")?;
                write!(f, "Message: {comment}\n\nCodegen:\n\n{listing}")
            }
            Failure::Range { message, listing, .. } => {
                write!(f, "{message}\n\nCodegen:\n\n{listing}")
            }
        }
    }
}

impl std::error::Error for Failure {}
