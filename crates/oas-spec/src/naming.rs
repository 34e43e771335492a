//! Naming conventions shared by declarations and the serialized tree.
//!
//! Attributes are declared with snake_case names; a trailing `?` marks the
//! attribute optional. The key written to the document is the camelCase form of
//! the name, and a leading `$` (as in `$ref`) is kept as-is.

use convert_case::{Case, Casing};

/// Suffix marking a declared name as optional
pub const OPTIONAL_MARKER: char = '?';

/// Prefix kept verbatim on output keys
pub const KEY_MARKER: char = '$';

/// Split a declared name into its canonical name and its required flag.
pub fn parse_declared(declared: &str) -> (&str, bool) {
    match declared.strip_suffix(OPTIONAL_MARKER) {
        Some(name) => (name, false),
        None => (declared, true),
    }
}

/// Derive the externally visible key for an attribute name.
pub fn output_key(name: &str) -> String {
    let (name, _) = parse_declared(name);
    match name.strip_prefix(KEY_MARKER) {
        Some(rest) => format!("{}{}", KEY_MARKER, camel_case(rest)),
        None => camel_case(name),
    }
}

fn camel_case(name: &str) -> String {
    if !name.contains('_') {
        return name.to_string();
    }
    name.from_case(Case::Snake).to_case(Case::Camel)
}
