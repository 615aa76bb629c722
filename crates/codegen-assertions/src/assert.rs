// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Named codegen assertions
//!
//! Provides [`AssertCodegen`], which resolves a target to its machine code at
//! a tier and runs one check against it.

use codegen::{Codegen, CodegenResolver, IntoCallSite, Tier};
use tracing::debug;

use crate::{
    Bounds, Category, CodegenError, CodegenResult, Failure, check_max_size, check_range,
};

/// Codegen assertions against the functions known to a resolver
///
/// Every assertion is a single shot: resolve, decode, check. Nothing is
/// cached between calls, so one instance can be shared across test threads.
///
/// ```no_run
/// use codegen_assertions::{Architecture, AssertCodegen, MemoryResolver, Tier};
///
/// let resolver = MemoryResolver::new(Architecture::X86_64)
///     .with_function(Tier::Default, "add_one", [0x48, 0x8d, 0x47, 0x01, 0xc3]);
/// let assert = AssertCodegen::new(resolver);
///
/// assert.no_calls(Tier::Default, "math::add_one(41)").unwrap();
/// assert.max_size(8, Tier::Default, "math::add_one(41)").unwrap();
/// ```
pub struct AssertCodegen<R> {
    resolver: R,
}

impl<R: CodegenResolver> AssertCodegen<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// The emitted code is at most `max_bytes` long.
    pub fn max_size(
        &self,
        max_bytes: usize,
        tier: Tier,
        target: impl IntoCallSite,
    ) -> CodegenResult {
        let codegen = self.codegen(tier, target)?;
        check_max_size(&codegen, max_bytes).map_err(|failure| failed("size", failure))
    }

    /// The emitted code contains no call instructions.
    pub fn no_calls(&self, tier: Tier, target: impl IntoCallSite) -> CodegenResult {
        self.in_range(tier, Bounds::no_more_than(0), Category::CALLS, target)
    }

    /// The emitted code contains no comparison instructions.
    pub fn no_comparisons(&self, tier: Tier, target: impl IntoCallSite) -> CodegenResult {
        self.in_range(tier, Bounds::no_more_than(0), Category::COMPARISONS, target)
    }

    /// The emitted code contains at least one call instruction.
    pub fn has_calls(&self, tier: Tier, target: impl IntoCallSite) -> CodegenResult {
        self.in_range(tier, Bounds::at_least(1), Category::CALLS, target)
    }

    /// The emitted code contains at least one comparison instruction.
    pub fn has_comparisons(&self, tier: Tier, target: impl IntoCallSite) -> CodegenResult {
        self.in_range(tier, Bounds::at_least(1), Category::COMPARISONS, target)
    }

    pub fn has_calls_at_least(
        &self,
        at_least: usize,
        tier: Tier,
        target: impl IntoCallSite,
    ) -> CodegenResult {
        self.in_range(tier, Bounds::at_least(at_least), Category::CALLS, target)
    }

    pub fn has_calls_no_more_than(
        &self,
        upper_limit: usize,
        tier: Tier,
        target: impl IntoCallSite,
    ) -> CodegenResult {
        self.in_range(tier, Bounds::no_more_than(upper_limit), Category::CALLS, target)
    }

    pub fn has_comparisons_at_least(
        &self,
        at_least: usize,
        tier: Tier,
        target: impl IntoCallSite,
    ) -> CodegenResult {
        self.in_range(
            tier,
            Bounds::at_least(at_least),
            Category::COMPARISONS,
            target,
        )
    }

    pub fn has_comparisons_no_more_than(
        &self,
        upper_limit: usize,
        tier: Tier,
        target: impl IntoCallSite,
    ) -> CodegenResult {
        self.in_range(
            tier,
            Bounds::no_more_than(upper_limit),
            Category::COMPARISONS,
            target,
        )
    }

    /// The number of `category` instructions in the emitted code is within `bounds`.
    pub fn in_range(
        &self,
        tier: Tier,
        bounds: Bounds,
        category: Category,
        target: impl IntoCallSite,
    ) -> CodegenResult {
        let codegen = self.codegen(tier, target)?;
        check_range(&codegen, bounds, category)
            .map_err(|failure| failed(category.label(), failure))
    }

    /// Resolve `target` and obtain its machine code at `tier`.
    pub fn codegen(&self, tier: Tier, target: impl IntoCallSite) -> CodegenResult<Codegen> {
        let call = target.into_call_site()?;
        let codegen = self.resolver.codegen(tier, &call)?;

        debug!(
            call = %call,
            %tier,
            bytes = codegen.byte_len(),
            instructions = codegen.instructions().len(),
            "resolved codegen"
        );

        Ok(codegen)
    }
}

fn failed(check: &str, failure: Failure) -> CodegenError {
    debug!(check, "codegen assertion failed");
    CodegenError::AssertionFailed(failure)
}

#[cfg(test)]
mod tests {
    use codegen::{Architecture, MemoryResolver};

    use super::*;

    /// x86-64: `cmp rdi, rsi; call $+5; ret`
    const CHECKED_CALL: [u8; 9] = [0x48, 0x39, 0xf7, 0xe8, 0x00, 0x00, 0x00, 0x00, 0xc3];

    fn assert_codegen() -> AssertCodegen<MemoryResolver> {
        AssertCodegen::new(
            MemoryResolver::new(Architecture::X86_64)
                .with_function(Tier::Default, "checked_call", CHECKED_CALL)
                .with_function(Tier::Default, "leaf", [0xc3]),
        )
    }

    #[test]
    fn test_named_bounds() {
        let assert = assert_codegen();

        assert.has_calls(Tier::Default, "checked_call(x)").unwrap();
        assert.has_comparisons(Tier::Default, "checked_call(x)").unwrap();
        assert.has_calls_at_least(1, Tier::Default, "checked_call(x)").unwrap();
        assert.has_calls_no_more_than(1, Tier::Default, "checked_call(x)").unwrap();
        assert.has_comparisons_at_least(1, Tier::Default, "checked_call(x)").unwrap();
        assert.has_comparisons_no_more_than(1, Tier::Default, "checked_call(x)").unwrap();

        assert.no_calls(Tier::Default, "leaf()").unwrap();
        assert.no_comparisons(Tier::Default, "leaf()").unwrap();
    }

    #[test]
    fn test_single_bound_violations() {
        let assert = assert_codegen();

        let error = assert
            .has_calls_at_least(2, Tier::Default, "checked_call(x)")
            .unwrap_err();
        assert!(error.to_string().starts_with(
            "It was supposed to contain at least 2 calls, got 1 instead"
        ));

        let error = assert
            .has_comparisons_no_more_than(0, Tier::Default, "checked_call(x)")
            .unwrap_err();
        assert!(error.to_string().starts_with(
            "It was supposed to contain no more than 0 comparisons, got 1 instead"
        ));
    }

    #[test]
    fn test_invalid_reference() {
        let assert = assert_codegen();

        assert!(matches!(
            assert.no_calls(Tier::Default, "leaf"),
            Err(CodegenError::InvalidReference(_))
        ));
    }
}
