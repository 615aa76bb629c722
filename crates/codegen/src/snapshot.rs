// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use disasm::{Architecture, DecodedInstruction, decode_instructions};

use crate::{CallSite, ResolveResult, Tier};

/// Marker in front of flagged listing lines
const FLAG: &str = ">>>";
const NO_FLAG: &str = "   ";

/// Captured machine code of one compiled function
///
/// Immutable once built. The listing rendered by `Display` (or by
/// [`Codegen::listing`] with flagged lines) is the context shown in assertion
/// failures.
#[derive(Debug, Clone)]
pub struct Codegen {
    call: CallSite,
    tier: Tier,
    architecture: Architecture,
    bytes: Vec<u8>,
    instructions: Vec<DecodedInstruction>,
}

impl Codegen {
    /// Decode `bytes` and capture them as the codegen of `call` at `tier`.
    pub fn decode(
        call: CallSite,
        tier: Tier,
        architecture: Architecture,
        bytes: Vec<u8>,
    ) -> ResolveResult<Self> {
        let instructions = decode_instructions(architecture, &bytes)?;
        Ok(Self::from_parts(call, tier, architecture, bytes, instructions))
    }

    /// Capture an already-decoded instruction stream.
    pub fn from_parts(
        call: CallSite,
        tier: Tier,
        architecture: Architecture,
        bytes: Vec<u8>,
        instructions: Vec<DecodedInstruction>,
    ) -> Self {
        Self {
            call,
            tier,
            architecture,
            bytes,
            instructions,
        }
    }

    pub fn call(&self) -> &CallSite {
        &self.call
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn architecture(&self) -> Architecture {
        self.architecture
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size of the emitted code in bytes
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    pub fn instructions(&self) -> &[DecodedInstruction] {
        &self.instructions
    }

    /// Render the listing, marking the instructions at `flagged` indices.
    ///
    /// Indices outside the instruction stream are ignored.
    pub fn listing(&self, flagged: &[usize]) -> String {
        let mut output = format!(
            "; {} at {} ({}, {} bytes)\n",
            self.call,
            self.tier,
            self.architecture,
            self.byte_len()
        );

        let hex_width = self
            .instructions
            .iter()
            .map(|instruction| (instruction.len() * 3).saturating_sub(1))
            .max()
            .unwrap_or(0);

        for (index, instruction) in self.instructions.iter().enumerate() {
            let marker = if flagged.contains(&index) {
                FLAG
            } else {
                NO_FLAG
            };
            let line = format!(
                "{marker} {:04x}: {:<hex_width$}  {}",
                instruction.offset,
                instruction.hex(),
                instruction.text()
            );
            output.push_str(line.trim_end());
            output.push('\n');
        }

        output
    }
}

impl fmt::Display for Codegen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.listing(&[]))
    }
}
