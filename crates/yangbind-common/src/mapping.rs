//! Mapping of YANG identifiers to binding identifiers.
//!
//! YANG identifiers admit `-` and `.`, are case sensitive and may collide with
//! reserved words of the emitted language. This module provides the two
//! families of mappings used by the naming strategies:
//!
//! - **Readable** mappings (`class_name`, `getter_name`, `package_segment`)
//!   which fold separators away. They are lossy: `foo-bar` and `foo_bar` both
//!   map to `FooBar`.
//! - **Bijective** mapping (`bijective_class_name`) which escapes every
//!   character outside `[A-Za-z0-9_]` and marks case changes, so that two
//!   distinct YANG identifiers never map to the same binding identifier.

use crate::qname::QNameModule;

/// Root of every generated package.
pub const PACKAGE_PREFIX: &str = "yangbind.gen.v1";

/// Words that cannot be used verbatim as package segments or member names.
const RESERVED_WORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "null", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw",
    "throws", "transient", "true", "try", "void", "volatile", "while",
];

pub fn is_reserved_word(word: &str) -> bool {
    RESERVED_WORDS.contains(&word)
}

fn upper_first(part: &str, out: &mut String) {
    let mut chars = part.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.push_str(chars.as_str());
    }
}

/// `foo-bar.baz` -> `FooBarBaz`.
pub fn class_name(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len());
    for part in identifier.split(|c: char| !c.is_ascii_alphanumeric()) {
        upper_first(part, &mut out);
    }
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '$');
    }
    out
}

/// Accessor method name for a schema node.
pub fn getter_name(identifier: &str) -> String {
    format!("get{}", class_name(identifier))
}

/// `Foo-Bar` -> `foobar`; a single package path segment.
pub fn package_segment(identifier: &str) -> String {
    let mut out: String = identifier
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .flat_map(char::to_lowercase)
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) || is_reserved_word(&out)
    {
        out.insert(0, '_');
    }
    out
}

/// Root package of a module, derived from its namespace and revision.
///
/// `urn:example:foo` at revision `2024-01-15` maps to
/// `yangbind.gen.v1.urn.example.foo.rev240115`.
pub fn root_package(module: &QNameModule) -> String {
    let mut out = String::from(PACKAGE_PREFIX);
    for part in module
        .namespace
        .split(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .filter(|part| !part.is_empty())
    {
        out.push('.');
        out.push_str(&package_segment(part));
    }
    if let Some(revision) = &module.revision {
        let digits: String = revision.chars().filter(char::is_ascii_digit).collect();
        // Drop the century, matching the customary rev yymmdd form.
        let short = digits.get(2..).unwrap_or(&digits);
        out.push_str(".rev");
        out.push_str(short);
    }
    out
}

/// Injective mapping of a YANG identifier to a class name.
///
/// Characters outside `[A-Za-z0-9_]` are escaped as `$XX` (upper-case hex).
/// The first character is upper-cased; an identifier that already starts
/// with an upper-case letter is prefixed with `$` so the two cases stay
/// distinguishable.
pub fn bijective_class_name(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len() + 4);
    let mut chars = identifier.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => out.push(first.to_ascii_uppercase()),
        Some(first) if first.is_ascii_uppercase() => {
            out.push('$');
            out.push(first);
        }
        Some(first) => escape_char(first, &mut out),
        None => return String::from("$"),
    }
    for c in chars {
        escape_char(c, &mut out);
    }
    out
}

fn escape_char(c: char, out: &mut String) {
    if c.is_ascii_alphanumeric() || c == '_' {
        out.push(c);
    } else {
        let mut buf = [0u8; 4];
        for byte in c.encode_utf8(&mut buf).bytes() {
            out.push_str(&format!("${byte:02X}"));
        }
    }
}

#[cfg(test)]
#[path = "tests/mapping_tests.rs"]
mod mapping_tests;
