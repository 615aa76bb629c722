use std::{fmt, str::FromStr};

use crate::{BasicInstruction, arm64, x86};

/// Errors that can occur during decoding
#[derive(Debug, Clone, thiserror::Error)]
pub enum DecodeError {
    #[error("failed to decode instruction at offset {offset:#x}: {message}")]
    InvalidInstruction { offset: usize, message: String },

    #[error("code size {size} is not aligned to {alignment} bytes (truncated function?)")]
    UnalignedCode { size: usize, alignment: usize },

    #[error("unsupported architecture: {name}")]
    UnsupportedArchitecture { name: String },
}

/// Instruction set of a code buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture {
    X86_64,
    Aarch64,
}

impl Architecture {
    /// Architecture of the machine running this code, if it can be decoded.
    pub fn host() -> Option<Self> {
        if cfg!(target_arch = "x86_64") {
            Some(Self::X86_64)
        } else if cfg!(target_arch = "aarch64") {
            Some(Self::Aarch64)
        } else {
            None
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Architecture::X86_64 => write!(f, "x86_64"),
            Architecture::Aarch64 => write!(f, "aarch64"),
        }
    }
}

impl FromStr for Architecture {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x86_64" | "x86-64" | "amd64" | "x64" => Ok(Self::X86_64),
            "aarch64" | "arm64" => Ok(Self::Aarch64),
            _ => Err(DecodeError::UnsupportedArchitecture {
                name: s.to_string(),
            }),
        }
    }
}

/// A decoded instruction with its location information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedInstruction {
    /// Offset from the start of the function (in bytes)
    pub offset: usize,
    /// The raw encoding of this instruction
    pub raw: Vec<u8>,
    /// Canonical lower-case mnemonic
    mnemonic: String,
    /// Rendered assembly text
    text: String,
}

impl DecodedInstruction {
    /// Build an instruction from already-decoded parts.
    ///
    /// The mnemonic is lower-cased so classification stays case-insensitive.
    pub fn new(
        offset: usize,
        raw: impl Into<Vec<u8>>,
        mnemonic: &str,
        text: impl Into<String>,
    ) -> Self {
        Self {
            offset,
            raw: raw.into(),
            mnemonic: mnemonic.to_ascii_lowercase(),
            text: text.into(),
        }
    }

    /// Length of the encoding in bytes
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Rendered assembly text, e.g. `cmp rdi, rsi`
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Raw bytes as space separated lower-case hex
    pub fn hex(&self) -> String {
        self.raw
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl BasicInstruction for DecodedInstruction {
    fn mnemonic(&self) -> &str {
        &self.mnemonic
    }
}

impl fmt::Display for DecodedInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Decode all instructions of a function body
///
/// Decoding stops at the first invalid encoding; a function whose bytes cannot
/// be decoded entirely is reported as an error rather than partially.
pub fn decode_instructions(
    architecture: Architecture,
    code: &[u8],
) -> Result<Vec<DecodedInstruction>, DecodeError> {
    match architecture {
        Architecture::X86_64 => x86::decode(code),
        Architecture::Aarch64 => arm64::decode(code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_empty_code() {
        for architecture in [Architecture::X86_64, Architecture::Aarch64] {
            let instructions = decode_instructions(architecture, &[]).unwrap();
            assert!(instructions.is_empty());
        }
    }

    #[test]
    fn test_new_lowercases_mnemonic() {
        let instruction = DecodedInstruction::new(4, [0x85, 0xc0], "TEST", "test eax, eax");

        assert_eq!(instruction.mnemonic(), "test");
        assert_eq!(instruction.len(), 2);
        assert_eq!(instruction.hex(), "85 c0");
        assert_eq!(instruction.to_string(), "test eax, eax");
    }

    #[test]
    fn test_architecture_from_str() {
        assert_eq!("x86_64".parse::<Architecture>().unwrap(), Architecture::X86_64);
        assert_eq!("ARM64".parse::<Architecture>().unwrap(), Architecture::Aarch64);
        assert!(matches!(
            "riscv64".parse::<Architecture>(),
            Err(DecodeError::UnsupportedArchitecture { .. })
        ));
    }
}
