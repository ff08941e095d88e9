//! Schema node to TypeScript type expression synthesis.
//!
//! References are expanded inline. A name that is already being expanded on
//! the current call chain is emitted as a bare type reference instead, which
//! is what makes self-referential and mutually recursive schemas terminate.
//! Object nesting beyond [`MAX_OBJECT_DEPTH`] collapses to `object`.

use std::collections::HashSet;

use tracing::trace;

use crate::registry::SchemaRegistry;
use crate::schema::{
    CompositeOp, ObjectShape, OpenValue, Primitive, PrimitiveKind, SchemaKind, SchemaNode,
};
use crate::ts::utils::enum_value_to_literal;
use crate::ts::{TsPrimitive, TsProp, TsType};

/// Object nesting levels expanded below the top-level call.
pub const MAX_OBJECT_DEPTH: usize = 3;

/// Reference names currently being expanded on one call chain.
pub type ActivePath = HashSet<String>;

/// Pure synthesis over an immutable registry.
///
/// Holds no state between calls, so one instance can serve many threads.
#[derive(Debug, Clone, Copy)]
pub struct Synthesizer<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> Synthesizer<'a> {
    #[allow(missing_docs)]
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// The registry references resolve against.
    pub fn registry(&self) -> &'a SchemaRegistry {
        self.registry
    }

    /// Synthesize `node` at depth 0 with an empty active path.
    pub fn synthesize(&self, node: &SchemaNode) -> TsType {
        self.synthesize_at(node, 0, &mut ActivePath::new())
    }

    /// Synthesize `node` at `depth`, treating names in `active` as cycles.
    ///
    /// `active` is restored to its original contents before returning.
    pub fn synthesize_at(&self, node: &SchemaNode, depth: usize, active: &mut ActivePath) -> TsType {
        match &node.kind {
            SchemaKind::Reference(name) => self.reference(name, depth, active),
            SchemaKind::Composite { op, members } => {
                let types = members
                    .iter()
                    .map(|member| self.synthesize_at(member, depth, active))
                    .collect();
                match op {
                    CompositeOp::And => TsType::intersection(types),
                    CompositeOp::Or => TsType::union(types),
                }
            }
            SchemaKind::Primitive(primitive) => synthesize_primitive(primitive),
            SchemaKind::Array(items) => {
                TsType::Array(Box::new(self.synthesize_at(items, depth, active)))
            }
            SchemaKind::Object(shape) => self.object(shape, depth, active),
            SchemaKind::Unknown => {
                if node.nullable {
                    TsType::Union(vec![TsType::unknown(), TsType::Primitive(TsPrimitive::Null)])
                } else {
                    TsType::unknown()
                }
            }
        }
    }

    fn reference(&self, name: &str, depth: usize, active: &mut ActivePath) -> TsType {
        if active.contains(name) {
            trace!(name, "Reference cycle, emitting bare name.");
            return TsType::Ref(name.to_string());
        }

        let Some(target) = self.registry.resolve(name) else {
            trace!(name, "Unresolved reference, emitting bare name.");
            return TsType::Ref(name.to_string());
        };

        active.insert(name.to_string());
        let ty = self.synthesize_at(target, depth, active);
        active.remove(name);
        ty
    }

    fn object(&self, shape: &ObjectShape, depth: usize, active: &mut ActivePath) -> TsType {
        if shape.properties.is_empty() {
            return match &shape.open_value {
                Some(OpenValue::Schema(value)) => {
                    TsType::string_record(self.synthesize_at(value, depth + 1, active))
                }
                Some(OpenValue::Any) | None => TsType::unknown_record(),
            };
        }

        if depth > MAX_OBJECT_DEPTH {
            trace!(depth, "Object nesting ceiling reached.");
            return TsType::Primitive(TsPrimitive::Object);
        }

        let props = shape
            .properties
            .iter()
            .map(|(name, prop)| TsProp {
                name: name.clone(),
                ty: self.synthesize_at(&prop.schema, depth + 1, active),
                optional: !prop.required,
                nullable: prop.schema.nullable,
            })
            .collect();

        TsType::Object(props)
    }
}

fn synthesize_primitive(primitive: &Primitive) -> TsType {
    match primitive.kind {
        PrimitiveKind::String => match &primitive.enum_values {
            // one value without a literal form makes the whole enum `unknown`
            Some(values) if !values.is_empty() => values
                .iter()
                .map(enum_value_to_literal)
                .collect::<Option<Vec<_>>>()
                .map_or_else(TsType::unknown, |literals| {
                    TsType::union(literals.into_iter().map(TsType::Literal).collect())
                }),
            _ if primitive.format.as_deref() == Some("binary") => {
                TsType::Primitive(TsPrimitive::Blob)
            }
            // date and date-time stay plain strings
            _ => TsType::Primitive(TsPrimitive::String),
        },
        PrimitiveKind::Integer | PrimitiveKind::Number => TsType::Primitive(TsPrimitive::Number),
        PrimitiveKind::Boolean => TsType::Primitive(TsPrimitive::Boolean),
        PrimitiveKind::Null => TsType::Primitive(TsPrimitive::Null),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::spec::{OpenApiDocument, Schema};
    use crate::ts::Emit;

    fn registry(schemas_json: &str) -> SchemaRegistry {
        let doc = OpenApiDocument::parse(&format!(
            r#"{{ "openapi": "3.0.3", "paths": {{}}, "components": {{ "schemas": {schemas_json} }} }}"#
        ))
        .unwrap();
        SchemaRegistry::from_document(&doc)
    }

    fn node(json: &str) -> SchemaNode {
        let schema: Schema = serde_json::from_str(json).unwrap();
        SchemaNode::from_schema(&schema)
    }

    fn render(registry: &SchemaRegistry, json: &str) -> String {
        Synthesizer::new(registry).synthesize(&node(json)).emit()
    }

    #[test]
    fn test_primitives() {
        let reg = SchemaRegistry::default();
        assert_eq!(render(&reg, r#"{ "type": "string" }"#), "string");
        assert_eq!(render(&reg, r#"{ "type": "string", "format": "date-time" }"#), "string");
        assert_eq!(render(&reg, r#"{ "type": "string", "format": "binary" }"#), "Blob");
        assert_eq!(render(&reg, r#"{ "type": "integer" }"#), "number");
        assert_eq!(render(&reg, r#"{ "type": "number", "format": "double" }"#), "number");
        assert_eq!(render(&reg, r#"{ "type": "boolean" }"#), "boolean");
        assert_eq!(render(&reg, r#"{ "type": "null" }"#), "null");
    }

    #[test]
    fn test_string_enum_escaped_in_order() {
        let reg = SchemaRegistry::default();
        assert_eq!(
            render(&reg, r#"{ "type": "string", "enum": ["b", "a", "say \"hi\""] }"#),
            r#""b" | "a" | "say \"hi\"""#
        );
        assert_eq!(
            render(&reg, r#"{ "type": "string", "enum": ["only"] }"#),
            r#""only""#
        );
        assert_eq!(render(&reg, r#"{ "type": "string", "enum": [] }"#), "string");
    }

    #[test]
    fn test_enum_property_is_required_literal_union() {
        let reg = SchemaRegistry::default();
        let out = render(
            &reg,
            r#"{ "type": "object", "required": ["status"],
                 "properties": { "status": { "type": "string", "enum": ["a", "b"] } } }"#,
        );
        assert_eq!(out, r#"{ status: "a" | "b" }"#);
    }

    #[test]
    fn test_nullable_optional_array_property() {
        let reg = SchemaRegistry::default();
        let out = render(
            &reg,
            r#"{ "type": "object",
                 "properties": { "tags": { "type": "array", "items": { "type": "string" }, "nullable": true } } }"#,
        );
        assert_eq!(out, "{ tags?: string[] | null }");
    }

    #[test]
    fn test_open_maps() {
        let reg = SchemaRegistry::default();
        assert_eq!(
            render(&reg, r#"{ "type": "object", "additionalProperties": { "type": "integer" } }"#),
            "Record<string, number>"
        );
        assert_eq!(
            render(&reg, r#"{ "type": "object", "additionalProperties": true }"#),
            "Record<string, unknown>"
        );
        assert_eq!(render(&reg, r#"{ "type": "object" }"#), "Record<string, unknown>");
        assert_eq!(
            render(&reg, r#"{ "type": "object", "properties": {} }"#),
            "Record<string, unknown>"
        );
    }

    #[test]
    fn test_declared_properties_ignore_open_value() {
        let reg = SchemaRegistry::default();
        let out = render(
            &reg,
            r#"{ "type": "object", "required": ["id"],
                 "properties": { "id": { "type": "integer" } },
                 "additionalProperties": { "type": "string" } }"#,
        );
        assert_eq!(out, "{ id: number }");
    }

    #[test]
    fn test_property_keys_quoted_when_not_identifiers() {
        let reg = SchemaRegistry::default();
        let out = render(
            &reg,
            r#"{ "type": "object", "required": ["content-type", "ok"],
                 "properties": { "content-type": { "type": "string" }, "ok": { "type": "boolean" }, "2fa": { "type": "boolean" } } }"#,
        );
        assert_eq!(out, r#"{ "content-type": string; ok: boolean; "2fa"?: boolean }"#);
    }

    #[test]
    fn test_unresolved_reference_is_bare_name() {
        let reg = SchemaRegistry::default();
        let out = render(
            &reg,
            r##"{ "type": "object", "properties": { "m": { "$ref": "#/components/schemas/Missing" } } }"##,
        );
        assert_eq!(out, "{ m?: Missing }");
    }

    #[test]
    fn test_reference_expands_inline() {
        let reg = registry(
            r#"{ "Pet": { "type": "object", "required": ["name"], "properties": { "name": { "type": "string" } } } }"#,
        );
        assert_eq!(
            render(&reg, r##"{ "type": "array", "items": { "$ref": "#/components/schemas/Pet" } }"##),
            "{ name: string }[]"
        );
    }

    #[test]
    fn test_self_reference_terminates() {
        let reg = registry(
            r##"{ "Node": { "type": "object", "required": ["value"], "properties": {
                "value": { "type": "integer" },
                "next": { "$ref": "#/components/schemas/Node" },
                "children": { "type": "array", "items": { "$ref": "#/components/schemas/Node" } }
            } } }"##,
        );
        let out = render(&reg, r##"{ "$ref": "#/components/schemas/Node" }"##);
        assert_eq!(out, "{ value: number; next?: Node; children?: Node[] }");
    }

    #[test]
    fn test_mutual_recursion_terminates() {
        let reg = registry(
            r##"{
                "A": { "type": "object", "properties": { "b": { "$ref": "#/components/schemas/B" } } },
                "B": { "type": "object", "properties": { "a": { "$ref": "#/components/schemas/A" } } }
            }"##,
        );
        assert_eq!(
            render(&reg, r##"{ "$ref": "#/components/schemas/A" }"##),
            "{ b?: { a?: A } }"
        );
        assert_eq!(
            render(&reg, r##"{ "$ref": "#/components/schemas/B" }"##),
            "{ a?: { b?: B } }"
        );
    }

    #[test]
    fn test_active_path_restored_between_siblings() {
        // Both siblings reference Leaf; the second must expand too.
        let reg = registry(
            r#"{ "Leaf": { "type": "object", "required": ["x"], "properties": { "x": { "type": "string" } } } }"#,
        );
        let out = render(
            &reg,
            r##"{ "type": "object", "required": ["l", "r"], "properties": {
                "l": { "$ref": "#/components/schemas/Leaf" },
                "r": { "$ref": "#/components/schemas/Leaf" }
            } }"##,
        );
        assert_eq!(out, "{ l: { x: string }; r: { x: string } }");

        let mut active = ActivePath::new();
        let _ = Synthesizer::new(&reg).synthesize_at(&node(r##"{ "$ref": "#/components/schemas/Leaf" }"##), 0, &mut active);
        assert!(active.is_empty());
    }

    #[test]
    fn test_composite_order_and_operator() {
        let reg = registry(
            r#"{ "A": { "type": "string" }, "B": { "type": "integer" }, "C": { "type": "boolean" } }"#,
        );
        assert_eq!(
            render(
                &reg,
                r##"{ "oneOf": [{ "$ref": "#/components/schemas/A" }, { "$ref": "#/components/schemas/B" }, { "$ref": "#/components/schemas/C" }] }"##
            ),
            "string | number | boolean"
        );
        assert_eq!(
            render(
                &reg,
                r##"{ "anyOf": [{ "$ref": "#/components/schemas/C" }, { "$ref": "#/components/schemas/A" }] }"##
            ),
            "boolean | string"
        );
        assert_eq!(
            render(
                &reg,
                r##"{ "allOf": [{ "$ref": "#/components/schemas/A" }, { "$ref": "#/components/schemas/B" }, { "$ref": "#/components/schemas/C" }] }"##
            ),
            "string & number & boolean"
        );
        assert_eq!(render(&reg, r#"{ "allOf": [] }"#), "unknown");
    }

    #[test]
    fn test_depth_ceiling() {
        let reg = SchemaRegistry::default();
        let nested = r#"{ "type": "object", "properties": { "a": { "type": "object", "properties": {
            "b": { "type": "object", "properties": { "c": { "type": "object", "properties": {
                "d": { "type": "object", "properties": { "e": { "type": "object", "properties": {
                    "f": { "type": "string" } } } } } } } } } } } } }"#;
        assert_eq!(
            render(&reg, nested),
            "{ a?: { b?: { c?: { d?: object } } } }"
        );

        let mut active = ActivePath::new();
        let deep = Synthesizer::new(&reg).synthesize_at(
            &node(r#"{ "type": "object", "properties": { "x": { "type": "string" } } }"#),
            MAX_OBJECT_DEPTH + 1,
            &mut active,
        );
        assert_eq!(deep.emit(), "object");
    }

    #[test]
    fn test_unknown_fallbacks() {
        let reg = SchemaRegistry::default();
        assert_eq!(render(&reg, "{}"), "unknown");
        assert_eq!(render(&reg, r#"{ "nullable": true }"#), "unknown | null");
        assert_eq!(render(&reg, r#"{ "type": "array" }"#), "unknown[]");
        assert_eq!(render(&reg, r#"{ "type": "wat" }"#), "unknown");
    }

    #[test]
    fn test_array_of_union_is_parenthesized() {
        let reg = SchemaRegistry::default();
        assert_eq!(
            render(&reg, r#"{ "type": "array", "items": { "type": "string", "enum": ["x", "y"] } }"#),
            r#"("x" | "y")[]"#
        );
    }

    #[test]
    fn test_deterministic() {
        let reg = registry(
            r##"{ "Node": { "type": "object", "properties": {
                "next": { "$ref": "#/components/schemas/Node" },
                "meta": { "type": "object", "additionalProperties": { "type": "string" } },
                "kind": { "oneOf": [{ "type": "string" }, { "type": "integer" }] }
            } } }"##,
        );
        let synth = Synthesizer::new(&reg);
        let target = reg.resolve("Node").unwrap();
        let first = synth.synthesize(target).emit();
        let second = synth.synthesize(target).emit();
        assert_eq!(first, second);
    }
}
