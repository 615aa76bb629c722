// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Function references and call-shaped expressions
//!
//! An assertion names its target the way a test would call it:
//! `math::add(1, 2)`. [`resolve_reference`] splits such an expression into the
//! function path and the argument list. A closure wrapper (`|| f(x)` or
//! `move || f(x)`) is accepted and stripped.

use std::fmt;

use thiserror::Error;

/// Errors produced while resolving a call-shaped expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("expression is not a function call: `{expr}`")]
    NotCallShaped { expr: String },

    #[error("unbalanced delimiters in `{expr}`")]
    UnbalancedDelimiters { expr: String },

    #[error("`{path}` is not a function path")]
    InvalidPath { path: String },
}

/// Path of the function under test, e.g. `math::add`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionRef(String);

impl FunctionRef {
    /// Create a reference from a `::`-separated path.
    pub fn new(path: &str) -> Result<Self, ReferenceError> {
        let path: String = path.chars().filter(|c| !c.is_whitespace()).collect();
        let valid = !path.is_empty() && path.split("::").all(is_identifier);
        if !valid {
            return Err(ReferenceError::InvalidPath { path });
        }
        Ok(Self(path))
    }

    pub fn path(&self) -> &str {
        &self.0
    }

    /// Unmangled symbol name of the function: the last path segment.
    pub fn symbol(&self) -> &str {
        self.0.rsplit("::").next().unwrap_or(&self.0)
    }
}

impl fmt::Display for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A function together with the arguments it is exercised with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub function: FunctionRef,
    pub args: Vec<String>,
}

impl CallSite {
    pub fn new(function: FunctionRef, args: Vec<String>) -> Self {
        Self { function, args }
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.function, self.args.join(", "))
    }
}

/// Anything an assertion can be pointed at.
pub trait IntoCallSite {
    fn into_call_site(self) -> Result<CallSite, ReferenceError>;
}

impl IntoCallSite for CallSite {
    fn into_call_site(self) -> Result<CallSite, ReferenceError> {
        Ok(self)
    }
}

impl IntoCallSite for &CallSite {
    fn into_call_site(self) -> Result<CallSite, ReferenceError> {
        Ok(self.clone())
    }
}

impl IntoCallSite for FunctionRef {
    fn into_call_site(self) -> Result<CallSite, ReferenceError> {
        Ok(CallSite::new(self, Vec::new()))
    }
}

impl IntoCallSite for (FunctionRef, Vec<String>) {
    fn into_call_site(self) -> Result<CallSite, ReferenceError> {
        Ok(CallSite::new(self.0, self.1))
    }
}

impl IntoCallSite for &str {
    fn into_call_site(self) -> Result<CallSite, ReferenceError> {
        resolve_reference(self)
    }
}

impl IntoCallSite for &String {
    fn into_call_site(self) -> Result<CallSite, ReferenceError> {
        resolve_reference(self)
    }
}

/// Turn a call expression written as Rust tokens into its source text.
///
/// ```
/// let call = codegen::call!(math::add(1, 2));
/// let site = codegen::resolve_reference(call).unwrap();
/// assert_eq!(site.function.path(), "math::add");
/// ```
#[macro_export]
macro_rules! call {
    ($($expr:tt)+) => {
        stringify!($($expr)+)
    };
}

/// Resolve a call-shaped expression into the function and its arguments.
///
/// Arguments are split at top-level commas. Delimiters inside string, raw
/// string and char literals are ignored.
pub fn resolve_reference(expr: &str) -> Result<CallSite, ReferenceError> {
    let body = strip_closure(expr.trim());

    let Some(open) = body.find('(') else {
        return Err(ReferenceError::NotCallShaped {
            expr: expr.to_string(),
        });
    };

    let close =
        matching_paren(body, open).ok_or_else(|| ReferenceError::UnbalancedDelimiters {
            expr: expr.to_string(),
        })?;
    if close != body.len() - 1 {
        // `f(1) + 2`, `f(1)(2)`, ...
        return Err(ReferenceError::NotCallShaped {
            expr: expr.to_string(),
        });
    }

    let function = FunctionRef::new(&body[..open])?;
    let args = split_arguments(&body[open + 1..close]).ok_or_else(|| {
        ReferenceError::NotCallShaped {
            expr: expr.to_string(),
        }
    })?;

    Ok(CallSite::new(function, args))
}

fn strip_closure(expr: &str) -> &str {
    let expr = expr
        .strip_prefix("move")
        .filter(|rest| rest.trim_start().starts_with("||"))
        .unwrap_or(expr)
        .trim_start();
    expr.strip_prefix("||").map(str::trim).unwrap_or(expr)
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Byte index of the `)` closing the `(` at `open`.
///
/// Returns `None` on mismatched or unclosed delimiters.
fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut stack = Vec::new();
    let mut chars = text[open..].char_indices().map(|(i, c)| (open + i, c));

    while let Some((i, c)) = chars.next() {
        match c {
            '(' | '[' | '{' => stack.push(c),
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                if stack.pop() != Some(expected) {
                    return None;
                }
                if stack.is_empty() {
                    return Some(i);
                }
            }
            '"' => {
                if !skip_string(&mut chars) {
                    return None;
                }
            }
            '\'' => skip_char_literal(text, i, &mut chars),
            'r' => match raw_string_len(text, i) {
                Some(Some(len)) => skip_bytes(text, i, len, &mut chars),
                Some(None) => return None,
                None => {}
            },
            _ => {}
        }
    }
    None
}

/// Consume a string literal up to its closing quote.
///
/// Returns `false` if the literal is never closed.
fn skip_string(chars: &mut impl Iterator<Item = (usize, char)>) -> bool {
    while let Some((_, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '"' => return true,
            _ => {}
        }
    }
    false
}

/// Consume a char literal (`'a'`, `'\n'`) whose opening quote is at `quote`.
///
/// A quote that does not start a char literal is left alone.
fn skip_char_literal(
    text: &str,
    quote: usize,
    chars: &mut impl Iterator<Item = (usize, char)>,
) {
    let mut rest = text[quote + 1..].chars();
    let len = match rest.next() {
        Some('\\') => rest.position(|c| c == '\'').map(|n| n + 2),
        Some(_) => (rest.next() == Some('\'')).then_some(2),
        None => None,
    };
    for _ in 0..len.unwrap_or(0) {
        chars.next();
    }
}

/// Byte length of the raw string literal (`r"..."`, `r#"..."#`) at `start`.
///
/// Returns `None` if no raw string starts there (e.g. the `r` ends an
/// identifier), and `Some(None)` if the literal is never closed.
fn raw_string_len(text: &str, start: usize) -> Option<Option<usize>> {
    let in_identifier = text[..start]
        .chars()
        .next_back()
        .is_some_and(|c| c.is_alphanumeric() || c == '_');
    if in_identifier {
        return None;
    }

    let rest = text[start..].strip_prefix('r')?;
    let hashes = rest.len() - rest.trim_start_matches('#').len();
    let body = rest[hashes..].strip_prefix('"')?;
    let terminator = format!("\"{}", "#".repeat(hashes));

    Some(
        body.find(&terminator)
            .map(|end| 1 + hashes + 1 + end + terminator.len()),
    )
}

/// Advance `chars` past the `len` bytes starting at `start`, whose first char
/// has already been consumed.
fn skip_bytes(
    text: &str,
    start: usize,
    len: usize,
    chars: &mut impl Iterator<Item = (usize, char)>,
) {
    for _ in text[start..start + len].chars().skip(1) {
        chars.next();
    }
}

/// Split an argument list at its top-level commas.
///
/// A single trailing comma is allowed; an empty argument anywhere else is not.
fn split_arguments(inner: &str) -> Option<Vec<String>> {
    if inner.trim().is_empty() {
        return Some(Vec::new());
    }

    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut chars = inner.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                skip_string(&mut chars);
            }
            '\'' => skip_char_literal(inner, i, &mut chars),
            'r' => {
                if let Some(Some(len)) = raw_string_len(inner, i) {
                    skip_bytes(inner, i, len, &mut chars);
                }
            }
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                args.push(inner[start..i].trim().to_string());
                start = i + 1;
            }
            _ => {}
        }
    }

    let last = inner[start..].trim();
    if !last.is_empty() {
        args.push(last.to_string());
    }

    if args.iter().any(String::is_empty) {
        return None;
    }
    Some(args)
}
