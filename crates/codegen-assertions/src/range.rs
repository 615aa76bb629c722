// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Count-range checks over an instruction stream

use std::fmt;

use codegen::{BasicInstruction, Codegen};
use tracing::trace;

use crate::{Category, Failure};

/// Optional lower and upper bounds on a count (both inclusive)
///
/// An absent bound places no constraint on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub lower: Option<usize>,
    pub upper: Option<usize>,
}

impl Bounds {
    /// No constraint at all
    pub const NONE: Bounds = Bounds {
        lower: None,
        upper: None,
    };

    pub const fn at_least(lower: usize) -> Self {
        Self {
            lower: Some(lower),
            upper: None,
        }
    }

    pub const fn no_more_than(upper: usize) -> Self {
        Self {
            lower: None,
            upper: Some(upper),
        }
    }

    pub const fn between(lower: usize, upper: usize) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    /// Check if `count` satisfies every present bound
    pub fn contains(&self, count: usize) -> bool {
        self.lower.is_none_or(|lower| count >= lower)
            && self.upper.is_none_or(|upper| count <= upper)
    }
}

/// Renders the required range, e.g. `at least 1 no more than 3`
impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.lower, self.upper) {
            (Some(lower), Some(upper)) => write!(f, "at least {lower} no more than {upper}"),
            (Some(lower), None) => write!(f, "at least {lower}"),
            (None, Some(upper)) => write!(f, "no more than {upper}"),
            (None, None) => write!(f, "any number of"),
        }
    }
}

/// Indices of the instructions matching a category, in stream order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchedPositions(Vec<usize>);

impl MatchedPositions {
    /// Scan `instructions` once, recording every index where `category` holds
    pub fn scan<I: BasicInstruction>(instructions: &[I], category: Category) -> Self {
        Self(
            instructions
                .iter()
                .enumerate()
                .filter(|(_, instruction)| category.matches(*instruction))
                .map(|(index, _)| index)
                .collect(),
        )
    }

    pub fn count(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.0
    }
}

/// Check that the number of `category` instructions in `codegen` is within `bounds`.
///
/// On failure the listing is annotated at every matched instruction, so the
/// report shows exactly what was counted.
pub fn check_range(codegen: &Codegen, bounds: Bounds, category: Category) -> Result<(), Failure> {
    let matched = MatchedPositions::scan(codegen.instructions(), category);
    let count = matched.count();

    trace!(
        category = category.label(),
        count,
        positions = ?matched.as_slice(),
        "scanned instruction stream"
    );

    if bounds.contains(count) {
        return Ok(());
    }

    let message = format!(
        "It was supposed to contain {bounds} {}, got {count} instead",
        category.label()
    );
    Err(Failure::range(message, matched.into_vec(), codegen))
}
