// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for codegen assertions

use codegen::{DecodeError, ReferenceError, ResolveError, Tier};
use thiserror::Error;

use crate::Failure;

/// Everything a codegen assertion can fail with
///
/// Only [`CodegenError::AssertionFailed`] means the code had the wrong shape;
/// every other variant means the code could not be inspected at all.
#[derive(Debug, Clone, Error)]
pub enum CodegenError {
    #[error("tier {tier} not found")]
    TierNotFound { tier: Tier },

    #[error(
        "function {function} wasn't compiled at tier {tier}. Make sure it is compiled before asserting on its codegen"
    )]
    TargetNotCompiled { function: String, tier: Tier },

    #[error(transparent)]
    InvalidReference(#[from] ReferenceError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("failed to load object code: {reason}")]
    Object { reason: String },

    #[error("failed to compile: {reason}")]
    Compile { reason: String },

    #[error("{0}")]
    AssertionFailed(Failure),
}

impl CodegenError {
    /// The failure report, if this is an assertion failure
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            CodegenError::AssertionFailed(failure) => Some(failure),
            _ => None,
        }
    }
}

impl From<Failure> for CodegenError {
    fn from(failure: Failure) -> Self {
        CodegenError::AssertionFailed(failure)
    }
}

impl From<ResolveError> for CodegenError {
    fn from(error: ResolveError) -> Self {
        match error {
            ResolveError::TierNotFound { tier } => CodegenError::TierNotFound { tier },
            ResolveError::TargetNotCompiled { function, tier } => {
                CodegenError::TargetNotCompiled { function, tier }
            }
            ResolveError::Decode(error) => CodegenError::Decode(error),
            ResolveError::Llvm(reason) => CodegenError::Compile { reason },
            error @ (ResolveError::Io { .. } | ResolveError::Object { .. }) => {
                CodegenError::Object {
                    reason: error.to_string(),
                }
            }
        }
    }
}

/// Result type alias for codegen assertions
pub type CodegenResult<T = ()> = Result<T, CodegenError>;
