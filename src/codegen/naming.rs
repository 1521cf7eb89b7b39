//! Schema names → Rust identifiers.

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do", "dyn",
    "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in", "let", "loop",
    "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return", "static",
    "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized", "use", "virtual",
    "where", "while", "yield",
];

// cannot be raw identifiers
const RESERVED: &[&str] = &["_", "crate", "self", "Self", "super"];

// Prelude names the generated code refers to unqualified, plus `Self`.
const SHADOWED_TYPES: &[&str] = &[
    "Self", "Box", "Option", "Some", "None", "Result", "Ok", "Err", "String", "Vec", "Default",
    "Clone", "Copy", "Debug", "PartialEq", "Eq", "Send", "Sync", "Sized", "Drop", "Fn", "FnMut",
    "FnOnce", "From", "Into", "Iterator", "IntoIterator", "ToOwned", "ToString", "AsRef", "AsMut",
];

/// `struct point` → `StructPoint`, `point_t` → `PointT`, `String` → `String_`.
pub fn type_ident(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for part in name.split([' ', '_']).filter(|p| !p.is_empty()) {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, 'T');
    }
    if SHADOWED_TYPES.contains(&out.as_str()) {
        out.push('_');
    }
    out
}

/// Suffix of the generated function names: `struct point` → `struct_point`,
/// `MyPoint` → `my_point`.
pub fn fn_suffix(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    for c in name.chars() {
        if c == ' ' {
            out.push('_');
        } else if c.is_ascii_uppercase() {
            if prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit()) {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
        prev = Some(c);
    }
    out
}

pub fn field_ident(name: &str) -> String {
    if RESERVED.contains(&name) {
        format!("{name}_")
    } else if KEYWORDS.contains(&name) {
        format!("r#{name}")
    } else {
        name.to_owned()
    }
}
