// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! LLVM-backed codegen resolver
//!
//! Compiles a textual LLVM IR module for the host target at the requested
//! tier, emits an object file in memory and extracts the function from it.
//! A fresh `Context` is created per request so the resolver can be shared
//! across test threads.

use inkwell::OptimizationLevel;
use inkwell::context::Context;
use inkwell::memory_buffer::MemoryBuffer;
use inkwell::passes::PassBuilderOptions;
use inkwell::targets::{
    CodeModel, FileType, InitializationConfig, RelocMode, Target, TargetMachine,
};
use tracing::debug;

use crate::object_file::codegen_from_object;
use crate::{CallSite, Codegen, CodegenResolver, ResolveError, ResolveResult, Tier};

const CPU: &str = "generic";
const FEATURES: &str = "";

impl From<Tier> for OptimizationLevel {
    fn from(tier: Tier) -> Self {
        match tier {
            Tier::Unoptimized => OptimizationLevel::None,
            Tier::Less => OptimizationLevel::Less,
            Tier::Default => OptimizationLevel::Default,
            Tier::Aggressive => OptimizationLevel::Aggressive,
        }
    }
}

/// New pass manager pipeline for a tier
fn pass_pipeline(tier: Tier) -> String {
    format!("default<O{}>", tier.level())
}

/// Codegen resolver compiling LLVM IR on request
pub struct LlvmResolver {
    ir: String,
    tiers: Vec<Tier>,
}

impl LlvmResolver {
    /// Resolver over the IR module `ir`, with every tier enabled
    pub fn new(ir: impl Into<String>) -> Self {
        Self {
            ir: ir.into(),
            tiers: Tier::ALL.to_vec(),
        }
    }

    /// Restrict the tiers this resolver can compile at
    pub fn with_tiers(mut self, tiers: &[Tier]) -> Self {
        self.tiers = tiers.to_vec();
        self
    }

    /// Compile the module at `tier` and return the object file image.
    pub fn compile(&self, tier: Tier) -> ResolveResult<Vec<u8>> {
        Target::initialize_native(&InitializationConfig::default()).map_err(ResolveError::Llvm)?;

        let context = Context::create();
        let buffer = MemoryBuffer::create_from_memory_range_copy(self.ir.as_bytes(), "codegen");
        let module = context
            .create_module_from_ir(buffer)
            .map_err(|e| ResolveError::Llvm(e.to_string()))?;

        let triple = TargetMachine::get_default_triple();
        let target = Target::from_triple(&triple).map_err(|e| ResolveError::Llvm(e.to_string()))?;
        let machine = target
            .create_target_machine(
                &triple,
                CPU,
                FEATURES,
                tier.into(),
                RelocMode::PIC,
                CodeModel::Default,
            )
            .ok_or_else(|| ResolveError::Llvm("failed to create target machine".into()))?;

        module.set_triple(&triple);
        module.set_data_layout(&machine.get_target_data().get_data_layout());
        module
            .run_passes(&pass_pipeline(tier), &machine, PassBuilderOptions::create())
            .map_err(|e| ResolveError::Llvm(e.to_string()))?;

        let object = machine
            .write_to_memory_buffer(&module, FileType::Object)
            .map_err(|e| ResolveError::Llvm(e.to_string()))?;

        debug!(%tier, size = object.get_size(), "compiled LLVM module");
        Ok(object.as_slice().to_vec())
    }
}

impl CodegenResolver for LlvmResolver {
    fn codegen(&self, tier: Tier, call: &CallSite) -> ResolveResult<Codegen> {
        if !self.tiers.contains(&tier) {
            return Err(ResolveError::TierNotFound { tier });
        }
        let object = self.compile(tier)?;
        codegen_from_object(&object, tier, call)
    }
}
