// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the codegen crate
//!
//! Builds relocatable object files with `object::write`, writes them to disk
//! and resolves functions out of them the way a test would against a real
//! compiler's output.

use codegen::{
    Architecture, BasicInstruction, CodegenResolver, ObjectResolver, ResolveError, Tier,
    extract_function, resolve_reference,
};
use object::write::{Object as WriteObject, StandardSection, Symbol, SymbolSection};
use object::{BinaryFormat, Endianness, SymbolFlags, SymbolKind, SymbolScope};
use tempfile::TempDir;

/// x86-64: `lea rax, [rdi + 1]; ret`
const ADD_ONE: &[u8] = &[0x48, 0x8d, 0x47, 0x01, 0xc3];
/// x86-64: `cmp rdi, rsi; mov rax, rdi; cmovl rax, rsi; ret`
const MAX: &[u8] = &[
    0x48, 0x39, 0xf7, 0x48, 0x89, 0xf8, 0x48, 0x0f, 0x4c, 0xc6, 0xc3,
];
/// AArch64: `bl #0; ret`
const CALLER: &[u8] = &[0x00, 0x00, 0x00, 0x94, 0xc0, 0x03, 0x5f, 0xd6];
/// AArch64: `ret`
const LEAF: &[u8] = &[0xc0, 0x03, 0x5f, 0xd6];

/// Builds an object file defining `functions` in its text section.
fn build_object(
    format: BinaryFormat,
    architecture: object::Architecture,
    functions: &[(&str, &[u8])],
) -> Vec<u8> {
    let mut obj = WriteObject::new(format, architecture, Endianness::Little);
    let text = obj.section_id(StandardSection::Text);

    for (name, code) in functions {
        let offset = obj.append_section_data(text, code, 4);
        obj.add_symbol(Symbol {
            name: name.as_bytes().to_vec(),
            value: offset,
            size: code.len() as u64,
            kind: SymbolKind::Text,
            scope: SymbolScope::Linkage,
            weak: false,
            section: SymbolSection::Section(text),
            flags: SymbolFlags::None,
        });
    }

    obj.write().expect("failed to write object file")
}

fn elf_x86_64() -> Vec<u8> {
    build_object(
        BinaryFormat::Elf,
        object::Architecture::X86_64,
        &[("add_one", ADD_ONE), ("max", MAX)],
    )
}

#[test]
fn test_extract_elf_function() {
    let (architecture, bytes) = extract_function(&elf_x86_64(), "max")
        .expect("parse failed")
        .expect("max not found");

    assert_eq!(architecture, Architecture::X86_64);
    assert_eq!(bytes, MAX);
}

#[test]
fn test_extract_missing_function() {
    let found = extract_function(&elf_x86_64(), "min").expect("parse failed");

    assert!(found.is_none());
}

#[test]
fn test_extract_macho_function_without_size() {
    // Mach-O symbols carry no size and are written with a `_` prefix.
    let data = build_object(
        BinaryFormat::MachO,
        object::Architecture::Aarch64,
        &[("caller", CALLER), ("leaf", LEAF)],
    );

    let (architecture, caller) = extract_function(&data, "caller").unwrap().unwrap();
    assert_eq!(architecture, Architecture::Aarch64);
    assert_eq!(caller, CALLER);

    let (_, leaf) = extract_function(&data, "leaf").unwrap().unwrap();
    assert_eq!(leaf, LEAF);
}

#[test]
fn test_resolve_from_path() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let obj_path = temp_dir.path().join("o2.o");
    std::fs::write(&obj_path, elf_x86_64()).expect("failed to write object file");

    let resolver = ObjectResolver::new()
        .from_path(Tier::Default, &obj_path)
        .expect("failed to read object file");
    let call = resolve_reference("numeric::max(a, b)").unwrap();

    let codegen = resolver.codegen(Tier::Default, &call).unwrap();

    assert_eq!(codegen.byte_len(), MAX.len());
    let mnemonics: Vec<_> = codegen
        .instructions()
        .iter()
        .map(|i| i.mnemonic())
        .collect();
    assert_eq!(mnemonics, ["cmp", "mov", "cmovl", "ret"]);
    assert!(codegen.to_string().starts_with("; numeric::max(a, b) at O2 (x86_64, 11 bytes)\n"));
}

#[test]
fn test_resolve_errors() {
    let resolver = ObjectResolver::new().with_object(Tier::Default, elf_x86_64());

    let call = resolve_reference("add_one(1)").unwrap();
    assert!(matches!(
        resolver.codegen(Tier::Aggressive, &call),
        Err(ResolveError::TierNotFound {
            tier: Tier::Aggressive
        })
    ));

    let call = resolve_reference("sub_one(1)").unwrap();
    assert!(matches!(
        resolver.codegen(Tier::Default, &call),
        Err(ResolveError::TargetNotCompiled { .. })
    ));
}

#[test]
fn test_missing_object_file() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let result = ObjectResolver::new().from_path(Tier::Less, temp_dir.path().join("missing.o"));

    assert!(matches!(result, Err(ResolveError::Io { .. })));
}

#[test]
fn test_garbage_object_file() {
    let resolver = ObjectResolver::new().with_object(Tier::Default, b"not an object".to_vec());
    let call = resolve_reference("add_one(1)").unwrap();

    assert!(matches!(
        resolver.codegen(Tier::Default, &call),
        Err(ResolveError::Object { .. })
    ));
}
