//! Common utilities for TypeScript code generation.
//!
//! Identifier checks, string escaping and case conversion shared by
//! synthesis, emission and the file generator.

use std::collections::HashSet;
use std::sync::LazyLock;

use super::types::TsLiteral;
use crate::spec::EnumValue;

/// TypeScript reserved words that cannot be used as identifiers.
pub static TS_RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "break",
        "case",
        "catch",
        "class",
        "const",
        "continue",
        "debugger",
        "default",
        "delete",
        "do",
        "else",
        "enum",
        "export",
        "extends",
        "false",
        "finally",
        "for",
        "function",
        "if",
        "import",
        "in",
        "instanceof",
        "new",
        "null",
        "return",
        "super",
        "switch",
        "this",
        "throw",
        "true",
        "try",
        "typeof",
        "var",
        "void",
        "while",
        "with",
        "yield",
        "let",
        "static",
        "implements",
        "interface",
        "package",
        "private",
        "protected",
        "public",
        "await",
        "async",
    ]
    .into_iter()
    .collect()
});

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Check if a property key must be quoted.
///
/// Returns true unless the name matches `^[A-Za-z_$][A-Za-z0-9_$]*$`.
pub fn needs_bracket_notation(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_ident_start(first) => !chars.all(is_ident_char),
        _ => true,
    }
}

/// Escape a string for use in JavaScript/TypeScript string literals.
/// Escapes backslashes and double quotes.
pub fn escape_js_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Quote a property key if it is not a bare identifier.
pub fn quote_if_needed(name: &str) -> String {
    if needs_bracket_notation(name) {
        format!("\"{}\"", escape_js_string(name))
    } else {
        name.to_string()
    }
}

/// Sanitize an identifier to be a valid TypeScript identifier.
/// - Splits on any character that cannot appear in an identifier and joins in camelCase
/// - Prepends `_` if starts with digit
/// - Escapes reserved words with `_` prefix
pub fn sanitize_ts_identifier(name: &str) -> String {
    let mut result = String::new();
    for (i, part) in name.split(|c: char| !is_ident_char(c)).enumerate() {
        if part.is_empty() {
            continue;
        }
        if i == 0 || result.is_empty() {
            result.push_str(part);
        } else {
            result.push_str(&capitalize_first(part));
        }
    }

    if result.is_empty() {
        return "_empty".to_string();
    }

    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }

    if TS_RESERVED_WORDS.contains(result.as_str()) {
        result.insert(0, '_');
    }

    result
}

/// Capitalize the first letter of a string.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Drop `-`/`_` separators, upper-casing the character after each one.
fn join_separated(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if matches!(c, '-' | '_') {
            if let Some(next) = chars.next() {
                result.extend(next.to_uppercase());
                continue;
            }
        }
        result.push(c);
    }
    result
}

/// `get_user_by_id` / `getUserById` -> `GetUserById`
pub fn to_pascal_case(s: &str) -> String {
    capitalize_first(&join_separated(s))
}

/// Placeholder names in a path template: `/pet/{petId}` -> `["petId"]`.
pub fn extract_path_params(path: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut rest = path;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            break;
        };
        let name = &after[..end];
        if !name.is_empty() {
            params.push(name.to_string());
        }
        rest = &after[end + 1..];
    }
    params
}

/// UPPER_SNAKE_CASE check for spec names in the project config.
pub fn is_valid_spec_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Convert an OpenAPI enum value to a TypeScript literal. Objects and
/// arrays have no literal form.
pub fn enum_value_to_literal(v: &EnumValue) -> Option<TsLiteral> {
    Some(match v {
        EnumValue::String(s) => TsLiteral::String(s.clone()),
        EnumValue::Integer(n) => TsLiteral::Int(*n),
        EnumValue::Float(f) => TsLiteral::Number(*f),
        EnumValue::Bool(b) => TsLiteral::Bool(*b),
        EnumValue::Null => TsLiteral::Null,
        EnumValue::Other(_) => return None,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_bracket_notation() {
        // Valid identifiers
        assert!(!needs_bracket_notation("foo"));
        assert!(!needs_bracket_notation("_foo"));
        assert!(!needs_bracket_notation("$foo"));
        assert!(!needs_bracket_notation("foo123"));
        assert!(!needs_bracket_notation("camelCase"));

        // Need bracket notation
        assert!(needs_bracket_notation(""));
        assert!(needs_bracket_notation("123foo"));
        assert!(needs_bracket_notation("foo-bar"));
        assert!(needs_bracket_notation("foo.bar"));
        assert!(needs_bracket_notation("foo bar"));
        assert!(needs_bracket_notation("foo:bar"));
    }

    #[test]
    fn test_escape_js_string() {
        assert_eq!(escape_js_string("hello"), "hello");
        assert_eq!(escape_js_string("hel\"lo"), "hel\\\"lo");
        assert_eq!(escape_js_string("hel\\lo"), "hel\\\\lo");
        assert_eq!(escape_js_string("a\\\"b"), "a\\\\\\\"b");
    }

    #[test]
    fn test_quote_if_needed() {
        assert_eq!(quote_if_needed("foo"), "foo");
        assert_eq!(quote_if_needed("foo-bar"), "\"foo-bar\"");
        assert_eq!(quote_if_needed("123"), "\"123\"");
    }

    #[test]
    fn test_sanitize_ts_identifier() {
        assert_eq!(sanitize_ts_identifier("foo"), "foo");
        assert_eq!(sanitize_ts_identifier("foo-bar"), "fooBar");
        assert_eq!(sanitize_ts_identifier("foo.bar"), "fooBar");
        assert_eq!(sanitize_ts_identifier("get_pet_{petId}"), "get_pet_PetId");
        assert_eq!(sanitize_ts_identifier("123foo"), "_123foo");
        assert_eq!(sanitize_ts_identifier("delete"), "_delete");
        assert_eq!(sanitize_ts_identifier("{}"), "_empty");
    }

    #[test]
    fn test_case_conversion() {
        assert_eq!(to_pascal_case("get_user_by_id"), "GetUserById");
        assert_eq!(to_pascal_case("getUserById"), "GetUserById");
        assert_eq!(to_pascal_case("list-pets"), "ListPets");
        assert_eq!(to_pascal_case(""), "");
        assert_eq!(capitalize_first("a"), "A");
    }

    #[test]
    fn test_extract_path_params() {
        assert_eq!(
            extract_path_params("/pet/{petId}/photos/{photoId}"),
            vec!["petId", "photoId"]
        );
        assert!(extract_path_params("/pets").is_empty());
        assert!(extract_path_params("/broken/{oops").is_empty());
    }

    #[test]
    fn test_is_valid_spec_name() {
        assert!(is_valid_spec_name("PETSTORE"));
        assert!(is_valid_spec_name("PET_STORE_V2"));
        assert!(!is_valid_spec_name("petstore"));
        assert!(!is_valid_spec_name("_PET"));
        assert!(!is_valid_spec_name("PET-STORE"));
        assert!(!is_valid_spec_name(""));
    }

    #[test]
    fn test_enum_value_to_literal() {
        assert_eq!(
            enum_value_to_literal(&EnumValue::String("a".into())),
            Some(TsLiteral::String("a".into()))
        );
        assert_eq!(enum_value_to_literal(&EnumValue::Integer(3)), Some(TsLiteral::Int(3)));
        assert_eq!(enum_value_to_literal(&EnumValue::Null), Some(TsLiteral::Null));
        assert_eq!(
            enum_value_to_literal(&EnumValue::Other(serde_json::json!({ "x": 1 }))),
            None
        );
    }
}
