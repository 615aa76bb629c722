//! x86-64 instruction decoding using the `yaxpeax-x86` crate.

use yaxpeax_arch::{Decoder, LengthedInstruction, U8Reader};
use yaxpeax_x86::long_mode::InstDecoder;

use crate::{DecodeError, DecodedInstruction};

pub(crate) fn decode(code: &[u8]) -> Result<Vec<DecodedInstruction>, DecodeError> {
    let decoder = InstDecoder::default();
    let mut instructions = Vec::new();
    let mut offset = 0;

    while offset < code.len() {
        let mut reader = U8Reader::new(&code[offset..]);
        let instruction =
            decoder
                .decode(&mut reader)
                .map_err(|e| DecodeError::InvalidInstruction {
                    offset,
                    message: format!("{:?}", e),
                })?;

        let length = instruction.len().to_const() as usize;
        if length == 0 || offset + length > code.len() {
            return Err(DecodeError::InvalidInstruction {
                offset,
                message: format!("bad instruction length {length}"),
            });
        }

        instructions.push(DecodedInstruction::new(
            offset,
            &code[offset..offset + length],
            &instruction.opcode().to_string(),
            instruction.to_string(),
        ));
        offset += length;
    }

    Ok(instructions)
}
