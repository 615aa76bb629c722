// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for codegen resolution

use std::path::PathBuf;

use disasm::DecodeError;
use thiserror::Error;

use crate::Tier;

/// Errors produced while obtaining a function's machine code
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("tier {tier} not found")]
    TierNotFound { tier: Tier },

    #[error(
        "function {function} wasn't compiled at tier {tier}. Make sure it is compiled before asserting on its codegen"
    )]
    TargetNotCompiled { function: String, tier: Tier },

    #[error("failed to read object file at {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("failed to parse object file: {reason}")]
    Object { reason: String },

    #[error("LLVM error: {0}")]
    Llvm(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Result type alias for codegen resolution
pub type ResolveResult<T> = Result<T, ResolveError>;
