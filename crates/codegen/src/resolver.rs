// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Codegen resolver abstraction
//!
//! Provides a trait for obtaining the machine code of a function at a tier
//! from various sources:
//! - In-memory (testing, captured bytes)
//! - Object files (one per tier, see [`ObjectResolver`](crate::ObjectResolver))
//! - LLVM IR compiled on demand (feature `llvm`)

use std::collections::HashMap;

use disasm::Architecture;

use crate::{CallSite, Codegen, ResolveError, ResolveResult, Tier};

/// Source of compiled machine code
///
/// Implementations must be safe to call from several test threads at once and
/// must produce a fresh [`Codegen`] per request.
pub trait CodegenResolver: Send + Sync {
    /// Obtain the decoded machine code of `call` compiled at `tier`.
    ///
    /// Fails with [`ResolveError::TierNotFound`] when `tier` is not available
    /// and with [`ResolveError::TargetNotCompiled`] when the function has no
    /// code at that tier.
    fn codegen(&self, tier: Tier, call: &CallSite) -> ResolveResult<Codegen>;
}

impl<R: CodegenResolver + ?Sized> CodegenResolver for &R {
    fn codegen(&self, tier: Tier, call: &CallSite) -> ResolveResult<Codegen> {
        (**self).codegen(tier, call)
    }
}

/// In-memory codegen resolver
///
/// Stores raw function bytes per tier, keyed by symbol name. Useful for
/// testing and for code captured by other means.
#[derive(Debug, Clone)]
pub struct MemoryResolver {
    architecture: Architecture,
    tiers: HashMap<Tier, HashMap<String, Vec<u8>>>,
}

impl MemoryResolver {
    /// Create an empty resolver for code of the given architecture
    pub fn new(architecture: Architecture) -> Self {
        Self {
            architecture,
            tiers: HashMap::new(),
        }
    }

    /// Make `tier` available without registering any function in it
    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tiers.entry(tier).or_default();
        self
    }

    /// Register the bytes of `symbol` compiled at `tier`
    pub fn with_function(mut self, tier: Tier, symbol: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(tier, symbol, bytes);
        self
    }

    pub fn insert(&mut self, tier: Tier, symbol: &str, bytes: impl Into<Vec<u8>>) {
        self.tiers
            .entry(tier)
            .or_default()
            .insert(symbol.to_string(), bytes.into());
    }
}

impl CodegenResolver for MemoryResolver {
    fn codegen(&self, tier: Tier, call: &CallSite) -> ResolveResult<Codegen> {
        let functions = self
            .tiers
            .get(&tier)
            .ok_or(ResolveError::TierNotFound { tier })?;

        let bytes = functions.get(call.function.symbol()).ok_or_else(|| {
            ResolveError::TargetNotCompiled {
                function: call.function.to_string(),
                tier,
            }
        })?;

        Codegen::decode(call.clone(), tier, self.architecture, bytes.clone())
    }
}
