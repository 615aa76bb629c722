// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Object file codegen resolver
//!
//! Each tier is backed by one object file (ELF, Mach-O or COFF) built at that
//! optimization level. A function is located by its symbol and its bytes are
//! sliced out of the containing section.

use std::{collections::HashMap, fs, path::Path};

use disasm::Architecture;
use object::{Object, ObjectSection, ObjectSymbol, SymbolKind};
use tracing::debug;

use crate::{CallSite, Codegen, CodegenResolver, ResolveError, ResolveResult, Tier};

/// Codegen resolver over per-tier object files
#[derive(Debug, Clone, Default)]
pub struct ObjectResolver {
    objects: HashMap<Tier, Vec<u8>>,
}

impl ObjectResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the object file contents `data` for `tier`
    pub fn with_object(mut self, tier: Tier, data: impl Into<Vec<u8>>) -> Self {
        self.objects.insert(tier, data.into());
        self
    }

    /// Read the object file at `path` and use it for `tier`
    pub fn from_path(self, tier: Tier, path: impl AsRef<Path>) -> ResolveResult<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|e| ResolveError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(self.with_object(tier, data))
    }
}

impl CodegenResolver for ObjectResolver {
    fn codegen(&self, tier: Tier, call: &CallSite) -> ResolveResult<Codegen> {
        let data = self
            .objects
            .get(&tier)
            .ok_or(ResolveError::TierNotFound { tier })?;
        codegen_from_object(data, tier, call)
    }
}

/// Extract and decode the code of `call` from an object file image.
pub(crate) fn codegen_from_object(
    data: &[u8],
    tier: Tier,
    call: &CallSite,
) -> ResolveResult<Codegen> {
    let (architecture, bytes) =
        extract_function(data, call.function.symbol())?.ok_or_else(|| {
            ResolveError::TargetNotCompiled {
                function: call.function.to_string(),
                tier,
            }
        })?;
    Codegen::decode(call.clone(), tier, architecture, bytes)
}

/// Locate the defined text symbol `name` and return its bytes.
///
/// Mach-O prefixes C symbols with `_`, so both spellings are accepted. When
/// the symbol carries no size (Mach-O again), the function extends up to the
/// next symbol in the same section or to the end of the section.
///
/// Returns `Ok(None)` when the object has no definition for `name`.
pub fn extract_function(
    data: &[u8],
    name: &str,
) -> ResolveResult<Option<(Architecture, Vec<u8>)>> {
    let file = object::File::parse(data).map_err(|e| ResolveError::Object {
        reason: e.to_string(),
    })?;
    let architecture = architecture_of(file.architecture())?;

    let prefixed = format!("_{name}");
    let symbol = file.symbols().find(|symbol| {
        symbol.is_definition()
            && symbol.kind() == SymbolKind::Text
            && symbol
                .name()
                .is_ok_and(|symbol_name| symbol_name == name || symbol_name == prefixed)
    });
    let Some(symbol) = symbol else {
        return Ok(None);
    };
    let Some(section_index) = symbol.section_index() else {
        return Ok(None);
    };

    let section = file
        .section_by_index(section_index)
        .map_err(|e| ResolveError::Object {
            reason: e.to_string(),
        })?;
    let section_data = section.data().map_err(|e| ResolveError::Object {
        reason: e.to_string(),
    })?;

    let start = section_offset(symbol.address(), section.address(), name)?;
    let end = if symbol.size() > 0 {
        start
            .checked_add(symbol.size())
            .ok_or_else(|| past_section(name))?
    } else {
        file.symbols()
            .filter(|other| {
                other.section_index() == Some(section_index) && other.address() > symbol.address()
            })
            .filter_map(|other| other.address().checked_sub(section.address()))
            .min()
            .unwrap_or(section.size())
    };

    let bytes = usize::try_from(start)
        .ok()
        .zip(usize::try_from(end).ok())
        .and_then(|(start, end)| section_data.get(start..end))
        .ok_or_else(|| past_section(name))?;

    debug!(
        symbol = name,
        section = section.name().unwrap_or("?"),
        start,
        len = bytes.len(),
        "extracted function from object file"
    );

    Ok(Some((architecture, bytes.to_vec())))
}

/// Offset of `address` within the section starting at `section_address`.
fn section_offset(address: u64, section_address: u64, name: &str) -> ResolveResult<u64> {
    address
        .checked_sub(section_address)
        .ok_or_else(|| ResolveError::Object {
            reason: format!("symbol {name} starts before its section"),
        })
}

fn past_section(name: &str) -> ResolveError {
    ResolveError::Object {
        reason: format!("symbol {name} extends past its section"),
    }
}

fn architecture_of(architecture: object::Architecture) -> ResolveResult<Architecture> {
    match architecture {
        object::Architecture::X86_64 => Ok(Architecture::X86_64),
        object::Architecture::Aarch64 => Ok(Architecture::Aarch64),
        other => Err(ResolveError::Decode(
            disasm::DecodeError::UnsupportedArchitecture {
                name: format!("{other:?}"),
            },
        )),
    }
}
