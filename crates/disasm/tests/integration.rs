//! Integration tests for disasm
//!
//! Decodes whole function bodies and checks the properties downstream
//! classification depends on: contiguous offsets, exact byte coverage and
//! lower-case mnemonics.

use disasm::{Architecture, BasicInstruction, DecodeError, DecodedInstruction, decode_instructions};

/// x86-64 unoptimized `max(a, b)`
const X86_MAX_O0: &[u8] = &[
    0x55, // push rbp
    0x48, 0x89, 0xe5, // mov rbp, rsp
    0x48, 0x39, 0xf7, // cmp rdi, rsi
    0x7c, 0x05, // jl +5
    0x48, 0x89, 0xf8, // mov rax, rdi
    0x5d, // pop rbp
    0xc3, // ret
    0x48, 0x89, 0xf0, // mov rax, rsi
    0x5d, // pop rbp
    0xc3, // ret
];

/// AArch64 `bl #0; bl #0; ret`
const ARM64_CALLER: &[u8] = &[
    0x00, 0x00, 0x00, 0x94, 0x00, 0x00, 0x00, 0x94, 0xc0, 0x03, 0x5f, 0xd6,
];

/// AArch64 `max(a, b)`
const ARM64_MAX: &[u8] = &[
    0x1f, 0x00, 0x01, 0xeb, // cmp x0, x1
    0x00, 0xb0, 0x81, 0x9a, // csel x0, x0, x1, lt
    0xc0, 0x03, 0x5f, 0xd6, // ret
];

fn assert_covers(code: &[u8], instructions: &[DecodedInstruction]) {
    let mut expected_offset = 0;
    for instruction in instructions {
        assert_eq!(instruction.offset, expected_offset);
        assert!(!instruction.is_empty());
        expected_offset += instruction.len();
    }
    assert_eq!(expected_offset, code.len());

    let concatenated: Vec<u8> = instructions
        .iter()
        .flat_map(|instruction| instruction.raw.iter().copied())
        .collect();
    assert_eq!(concatenated, code);
}

#[test]
fn test_x86_function_body() {
    let instructions = decode_instructions(Architecture::X86_64, X86_MAX_O0).unwrap();

    assert_eq!(instructions.len(), 10);
    assert_covers(X86_MAX_O0, &instructions);

    assert_eq!(instructions[0].mnemonic(), "push");
    assert_eq!(instructions[2].mnemonic(), "cmp");
    assert_eq!(instructions[6].mnemonic(), "ret");
    assert_eq!(instructions[9].mnemonic(), "ret");
    assert_eq!(instructions[2].hex(), "48 39 f7");
}

#[test]
fn test_arm64_function_body() {
    let instructions = decode_instructions(Architecture::Aarch64, ARM64_CALLER).unwrap();

    assert_eq!(instructions.len(), 3);
    assert_covers(ARM64_CALLER, &instructions);

    let mnemonics: Vec<_> = instructions.iter().map(|i| i.mnemonic()).collect();
    assert_eq!(mnemonics, ["bl", "bl", "ret"]);
}

#[test]
fn test_arm64_compare_keeps_alias() {
    let instructions = decode_instructions(Architecture::Aarch64, ARM64_MAX).unwrap();

    assert_eq!(instructions.len(), 3);
    assert_covers(ARM64_MAX, &instructions);
    assert_eq!(instructions[0].mnemonic(), "cmp");
    assert!(instructions[0].text().starts_with("cmp "), "{}", instructions[0]);
    assert_eq!(instructions[2].mnemonic(), "ret");
}

#[test]
fn test_mnemonics_are_lowercase() {
    for (architecture, code) in [
        (Architecture::X86_64, X86_MAX_O0),
        (Architecture::Aarch64, ARM64_CALLER),
    ] {
        for instruction in decode_instructions(architecture, code).unwrap() {
            let mnemonic = instruction.mnemonic();
            assert_eq!(mnemonic, mnemonic.to_ascii_lowercase());
            assert!(!mnemonic.is_empty());
        }
    }
}

#[test]
fn test_truncated_tail_reports_its_offset() {
    // ret; then the first two bytes of a five-byte call
    let error = decode_instructions(Architecture::X86_64, &[0xc3, 0xe8, 0x00]).unwrap_err();

    assert!(matches!(
        error,
        DecodeError::InvalidInstruction { offset: 1, .. }
    ));
}

#[test]
fn test_arm64_rejects_partial_words() {
    let error = decode_instructions(Architecture::Aarch64, &ARM64_CALLER[..6]).unwrap_err();

    assert!(matches!(
        error,
        DecodeError::UnalignedCode {
            size: 6,
            alignment: 4
        }
    ));
}

#[test]
fn test_host_architecture_round_trips() {
    if let Some(host) = Architecture::host() {
        assert_eq!(host.to_string().parse::<Architecture>().unwrap(), host);
    }
}
