// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Obtaining the machine code of compiled functions
//!
//! This crate provides:
//! - **Function references** parsed from call-shaped expressions
//!   (`math::add(1, 2)`), see [`resolve_reference`]
//! - **Codegen snapshots** ([`Codegen`]): the decoded machine code of one
//!   function at one optimization [`Tier`], with a printable listing
//! - **Resolvers** implementing [`CodegenResolver`]:
//!
//! | Resolver | Source of machine code |
//! |----------|------------------------|
//! | [`MemoryResolver`] | raw bytes registered per tier |
//! | [`ObjectResolver`] | one object file per tier, function found by symbol |
//! | `LlvmResolver` (feature `llvm`) | LLVM IR compiled at the tier's `-O` level |
//!
//! Symbols are looked up by the unmangled item name, i.e. the last segment of
//! the function path. Arguments are carried along for reporting; they do not
//! select among specializations.

mod error;
#[cfg(feature = "llvm")]
mod llvm;
mod object_file;
mod reference;
mod resolver;
mod snapshot;
mod tier;

pub use disasm::{Architecture, BasicInstruction, DecodeError, DecodedInstruction};
pub use error::{ResolveError, ResolveResult};
#[cfg(feature = "llvm")]
pub use llvm::LlvmResolver;
pub use object_file::{ObjectResolver, extract_function};
pub use reference::{CallSite, FunctionRef, IntoCallSite, ReferenceError, resolve_reference};
pub use resolver::{CodegenResolver, MemoryResolver};
pub use snapshot::Codegen;
pub use tier::{ParseTierError, Tier};
