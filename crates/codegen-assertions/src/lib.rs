// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Test-time assertions on the shape of compiled machine code
//!
//! Resolves a function to its machine code at an optimization tier, decodes
//! it, and checks quantitative properties of the instruction stream. A failed
//! check reports the expected and actual values, or the violated range,
//! together with the instruction listing with the counted lines marked.
//!
//! # Assertions
//!
//! | Assertion | Check |
//! |-----------|-------|
//! | `max_size(n)` | emitted code is at most `n` bytes |
//! | `no_calls` / `has_calls` | call count is 0 / at least 1 |
//! | `no_comparisons` / `has_comparisons` | compare/test count is 0 / at least 1 |
//! | `has_calls_at_least(n)` / `has_calls_no_more_than(n)` | one-sided call bound |
//! | `has_comparisons_at_least(n)` / `has_comparisons_no_more_than(n)` | one-sided comparison bound |
//! | `in_range(bounds, category)` | any [`Category`] within any [`Bounds`] |
//!
//! # Errors
//!
//! A wrong shape is [`CodegenError::AssertionFailed`]. Being unable to look at
//! the code at all is a different variant: [`CodegenError::TierNotFound`] when
//! the resolver has no such tier, [`CodegenError::TargetNotCompiled`] when the
//! function was never compiled at it. Callers tell them apart by variant.
//!
//! # Example
//!
//! ```no_run
//! use codegen_assertions::{AssertCodegen, ObjectResolver, Tier};
//!
//! let resolver = ObjectResolver::new()
//!     .from_path(Tier::Unoptimized, "target/o0/kernels.o")?
//!     .from_path(Tier::Aggressive, "target/o3/kernels.o")?;
//! let assert = AssertCodegen::new(resolver);
//!
//! assert.has_calls(Tier::Unoptimized, "kernels::dot(a, b)")?;
//! assert.no_calls(Tier::Aggressive, "kernels::dot(a, b)")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod assert;
mod category;
mod error;
mod range;
mod report;
mod size;

pub use assert::AssertCodegen;
pub use category::{Category, is_call, is_comparison};
#[cfg(feature = "llvm")]
pub use codegen::LlvmResolver;
pub use codegen::{
    Architecture, BasicInstruction, CallSite, Codegen, CodegenResolver, DecodedInstruction,
    FunctionRef, IntoCallSite, MemoryResolver, ObjectResolver, ReferenceError, ResolveError, Tier,
    call, resolve_reference,
};
pub use error::{CodegenError, CodegenResult};
pub use range::{Bounds, MatchedPositions, check_range};
pub use report::Failure;
pub use size::check_max_size;
