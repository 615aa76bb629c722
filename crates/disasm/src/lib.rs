//! Machine code decoding for codegen assertions
//!
//! Decodes the raw bytes of a compiled function into an ordered stream of
//! [`DecodedInstruction`]s using the `yaxpeax` decoders. Every decoded
//! instruction exposes its byte offset, its raw encoding, the rendered
//! assembly text and a canonical lower-case mnemonic.
//!
//! # Supported architectures
//!
//! | Architecture | Decoder | Width |
//! |--------------|---------|-------|
//! | x86-64 | `yaxpeax-x86` (long mode) | variable, 1-15 bytes |
//! | AArch64 | `yaxpeax-arm` (armv8 a64) | fixed, 4 bytes |
//!
//! # Mnemonics
//!
//! The mnemonic is what downstream classification keys on, so it is
//! normalized per architecture:
//!
//! - x86-64: the opcode name (`cmp`, `call`, `cmpxchg`), without prefixes
//!   such as `lock` or `rep`.
//! - AArch64: the first token of the rendered text, so preferred aliases
//!   (`cmp` for `subs xzr, ...`, `tst` for `ands xzr, ...`) are kept.

mod arm64;
mod decode;
mod traits;
mod x86;

pub use decode::{Architecture, DecodeError, DecodedInstruction, decode_instructions};
pub use traits::BasicInstruction;
