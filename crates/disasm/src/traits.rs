//! Trait abstraction over decoded instructions
//!
//! Classification only ever needs the mnemonic, so anything that can name its
//! mnemonic can be counted: decoded machine code, hand-built fixtures, or
//! instructions coming from another decoder.

/// Minimal interface for mnemonic-based classification.
pub trait BasicInstruction {
    /// Returns the canonical lower-case mnemonic of this instruction.
    fn mnemonic(&self) -> &str;
}

impl<T: BasicInstruction + ?Sized> BasicInstruction for &T {
    #[inline]
    fn mnemonic(&self) -> &str {
        (**self).mnemonic()
    }
}
