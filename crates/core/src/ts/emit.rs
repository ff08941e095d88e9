//! TypeScript code emission via the Emit trait.
//!
//! Each AST type implements `Emit`; output is deterministic for a given
//! value, which is what makes synthesis reproducible end to end.

use super::types::{TsLiteral, TsModule, TsPrimitive, TsProp, TsType, TsTypeDef, TypeDefKind};
use super::utils::{escape_js_string, quote_if_needed, sanitize_ts_identifier};

/// Trait for emitting TypeScript code from AST nodes.
pub trait Emit {
    /// Convert the AST node to its TypeScript string representation.
    fn emit(&self) -> String;
}

// =============================================================================
// Primitive Types
// =============================================================================

impl Emit for TsPrimitive {
    fn emit(&self) -> String {
        match self {
            TsPrimitive::String => "string".to_string(),
            TsPrimitive::Number => "number".to_string(),
            TsPrimitive::Boolean => "boolean".to_string(),
            TsPrimitive::Null => "null".to_string(),
            TsPrimitive::Void => "void".to_string(),
            TsPrimitive::Unknown => "unknown".to_string(),
            TsPrimitive::Object => "object".to_string(),
            TsPrimitive::Blob => "Blob".to_string(),
        }
    }
}

impl Emit for TsLiteral {
    fn emit(&self) -> String {
        match self {
            TsLiteral::String(s) => format!("\"{}\"", escape_js_string(s)),
            TsLiteral::Number(n) => n.to_string(),
            TsLiteral::Int(i) => i.to_string(),
            TsLiteral::Bool(b) => b.to_string(),
            TsLiteral::Null => "null".to_string(),
        }
    }
}

// =============================================================================
// Types
// =============================================================================

impl Emit for TsType {
    fn emit(&self) -> String {
        match self {
            TsType::Primitive(p) => p.emit(),
            TsType::Array(inner) => {
                let inner_str = inner.emit();
                // Wrap complex types in parentheses
                if matches!(**inner, TsType::Union(_) | TsType::Intersection(_)) {
                    format!("({inner_str})[]")
                } else {
                    format!("{inner_str}[]")
                }
            }
            TsType::Union(types) => types.iter().map(|t| t.emit()).collect::<Vec<_>>().join(" | "),
            TsType::Intersection(types) => types
                .iter()
                .map(|t| {
                    let s = t.emit();
                    if matches!(t, TsType::Union(_)) {
                        format!("({s})")
                    } else {
                        s
                    }
                })
                .collect::<Vec<_>>()
                .join(" & "),
            TsType::Object(props) => {
                if props.is_empty() {
                    "{}".to_string()
                } else {
                    let parts: Vec<_> = props.iter().map(|p| p.emit()).collect();
                    format!("{{ {} }}", parts.join("; "))
                }
            }
            TsType::Record { key, value } => {
                format!("Record<{}, {}>", key.emit(), value.emit())
            }
            TsType::Literal(lit) => lit.emit(),
            // Names come from the document verbatim and may not be identifiers.
            TsType::Ref(name) => sanitize_ts_identifier(name),
        }
    }
}

/// Field clause without a trailing separator: `key?: T | null`.
impl Emit for TsProp {
    fn emit(&self) -> String {
        let key = quote_if_needed(&self.name);
        let opt = if self.optional { "?" } else { "" };
        let null = if self.nullable && !self.ty.is_nullable() {
            " | null"
        } else {
            ""
        };
        format!("{key}{opt}: {}{null}", self.ty.emit())
    }
}

// =============================================================================
// Type Definitions
// =============================================================================

impl Emit for TsTypeDef {
    fn emit(&self) -> String {
        match &self.kind {
            TypeDefKind::Interface { properties } => {
                let mut output =
                    format!("export interface {} {{\n", sanitize_ts_identifier(&self.name));
                for prop in properties {
                    output.push_str("  ");
                    output.push_str(&prop.emit());
                    output.push_str(";\n");
                }
                output.push_str("}\n");
                output
            }
            TypeDefKind::TypeAlias { ty } => {
                format!(
                    "export type {} = {};\n",
                    sanitize_ts_identifier(&self.name),
                    ty.emit()
                )
            }
        }
    }
}

// =============================================================================
// Module
// =============================================================================

impl Emit for TsModule {
    fn emit(&self) -> String {
        let mut output = String::new();

        for line in &self.banner {
            output.push_str("// ");
            output.push_str(line);
            output.push('\n');
        }

        if !self.banner.is_empty() {
            output.push('\n');
        }

        let defs: Vec<_> = self.types.iter().map(|t| t.emit()).collect();
        output.push_str(&defs.join("\n"));

        output
    }
}

// =============================================================================
// Tests
// =============================================================================
