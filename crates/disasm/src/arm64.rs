//! AArch64 instruction decoding using the `yaxpeax-arm` crate.

use yaxpeax_arch::{Decoder, U8Reader};
use yaxpeax_arm::armv8::a64::InstDecoder;

use crate::{DecodeError, DecodedInstruction};

const INSTRUCTION_WIDTH: usize = 4;

/// Decode all instructions from a byte slice
///
/// The input must be 4-byte aligned (Arm64 fixed-width instructions).
pub(crate) fn decode(code: &[u8]) -> Result<Vec<DecodedInstruction>, DecodeError> {
    if code.len() % INSTRUCTION_WIDTH != 0 {
        return Err(DecodeError::UnalignedCode {
            size: code.len(),
            alignment: INSTRUCTION_WIDTH,
        });
    }

    let decoder = InstDecoder::default();
    let mut instructions = Vec::with_capacity(code.len() / INSTRUCTION_WIDTH);

    for (i, chunk) in code.chunks_exact(INSTRUCTION_WIDTH).enumerate() {
        let offset = i * INSTRUCTION_WIDTH;

        let mut reader = U8Reader::new(chunk);
        let instruction =
            decoder
                .decode(&mut reader)
                .map_err(|e| DecodeError::InvalidInstruction {
                    offset,
                    message: format!("{:?}", e),
                })?;

        // The rendered text carries the preferred alias (`cmp`, `tst`, `mov`)
        // while the opcode only names the underlying encoding.
        let text = instruction.to_string();
        let opcode = instruction.opcode.to_string();
        let mnemonic = text.split_whitespace().next().unwrap_or(&opcode);

        instructions.push(DecodedInstruction::new(offset, chunk, mnemonic, text.clone()));
    }

    Ok(instructions)
}
