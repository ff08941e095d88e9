//! Closed schema node model.
//!
//! Raw [`Schema`] values decide their kind by which optional fields happen to
//! be present. They are lowered once, at load time, into [`SchemaNode`] so
//! that every traversal can dispatch exhaustively on [`SchemaKind`].

use indexmap::IndexMap;

use crate::spec::{AdditionalProperties, EnumValue, Schema, SchemaType};

/// Prefix of local references into the named-schema section.
pub const COMPONENT_SCHEMA_PREFIX: &str = "#/components/schemas/";

/// One unit of type description.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    /// What the node describes.
    pub kind: SchemaKind,
    /// `nullable: true`, or `null` among the declared types.
    pub nullable: bool,
}

/// The shape of a [`SchemaNode`].
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    /// Scalar.
    Primitive(Primitive),
    /// Array of the item schema.
    Array(Box<SchemaNode>),
    /// Object with properties and/or an open-value schema.
    Object(ObjectShape),
    /// `allOf`, `oneOf` or `anyOf`.
    Composite {
        /// How members combine.
        op: CompositeOp,
        /// Lowered members, in document order.
        members: Vec<SchemaNode>,
    },
    /// Pointer to a named schema in the registry.
    Reference(String),
    /// No recognized kind.
    Unknown,
}

/// Scalar schema with optional enumeration and format hint.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    /// Scalar type.
    pub kind: PrimitiveKind,
    /// `enum` values, in document order.
    pub enum_values: Option<Vec<EnumValue>>,
    /// `format`, e.g. `binary`.
    pub format: Option<String>,
}

/// Scalar `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum PrimitiveKind {
    String,
    Integer,
    Number,
    Boolean,
    Null,
}

/// Composition operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeOp {
    /// `allOf`
    And,
    /// `oneOf` / `anyOf`
    Or,
}

/// Object schema: declared properties plus an optional open-value schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectShape {
    /// Declared properties, in document order.
    pub properties: IndexMap<String, Property>,
    /// From `additionalProperties`. `None` when absent or `false`.
    pub open_value: Option<OpenValue>,
}

/// One declared property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Property schema.
    pub schema: SchemaNode,
    /// Listed in the parent's `required`.
    pub required: bool,
}

/// Value schema of an open map (`additionalProperties`).
#[derive(Debug, Clone, PartialEq)]
pub enum OpenValue {
    /// `additionalProperties: true`
    Any,
    /// `additionalProperties: {...}`
    Schema(Box<SchemaNode>),
}

/// Extract the registry name from a `$ref` path.
///
/// References outside `#/components/schemas/` keep their full text and will
/// simply fail to resolve. Renderers fold such names into identifiers.
pub fn reference_name(ref_path: &str) -> &str {
    ref_path
        .strip_prefix(COMPONENT_SCHEMA_PREFIX)
        .unwrap_or(ref_path)
}

impl SchemaNode {
    /// Non-nullable node of `kind`.
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            nullable: false,
        }
    }

    /// [`SchemaKind::Unknown`]
    pub fn unknown() -> Self {
        Self::new(SchemaKind::Unknown)
    }

    /// Plain scalar without enum or format.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::new(SchemaKind::Primitive(Primitive {
            kind,
            enum_values: None,
            format: None,
        }))
    }

    /// Reference to the registry entry `name`.
    pub fn reference(name: impl Into<String>) -> Self {
        Self::new(SchemaKind::Reference(name.into()))
    }

    /// Lower a raw schema into the closed node model.
    ///
    /// Precedence follows the keyword order `$ref`, `allOf`, `oneOf`,
    /// `anyOf`, then `type`.
    pub fn from_schema(schema: &Schema) -> Self {
        let nullable = schema.nullable == Some(true)
            || matches!(&schema.schema_type, Some(SchemaType::Multiple(types)) if types.iter().any(|t| t == "null"));

        let kind = if let Some(ref_path) = &schema.ref_path {
            SchemaKind::Reference(reference_name(ref_path).to_string())
        } else if let Some(all_of) = &schema.all_of {
            lower_composite(CompositeOp::And, all_of)
        } else if let Some(one_of) = &schema.one_of {
            lower_composite(CompositeOp::Or, one_of)
        } else if let Some(any_of) = &schema.any_of {
            lower_composite(CompositeOp::Or, any_of)
        } else {
            match &schema.schema_type {
                Some(SchemaType::Single(ty)) => lower_typed(ty, schema),
                Some(SchemaType::Multiple(types)) => lower_type_array(types, schema),
                None => SchemaKind::Unknown,
            }
        };

        Self { kind, nullable }
    }
}

fn lower_composite(op: CompositeOp, members: &[Schema]) -> SchemaKind {
    SchemaKind::Composite {
        op,
        members: members.iter().map(SchemaNode::from_schema).collect(),
    }
}

/// OpenAPI 3.1 `type: [..]`. `null` is folded into the nullable flag by the caller.
fn lower_type_array(types: &[String], schema: &Schema) -> SchemaKind {
    let non_null: Vec<_> = types.iter().filter(|t| *t != "null").collect();
    match non_null.as_slice() {
        [] if types.is_empty() => SchemaKind::Unknown,
        [] => lower_typed("null", schema),
        [single] => lower_typed(single, schema),
        many => SchemaKind::Composite {
            op: CompositeOp::Or,
            members: many
                .iter()
                .map(|ty| SchemaNode::new(lower_typed(ty, schema)))
                .collect(),
        },
    }
}

fn lower_typed(ty: &str, schema: &Schema) -> SchemaKind {
    let primitive = |kind| {
        SchemaKind::Primitive(Primitive {
            kind,
            enum_values: schema.enum_values.clone(),
            format: schema.format.clone(),
        })
    };

    match ty {
        "string" => primitive(PrimitiveKind::String),
        "integer" => primitive(PrimitiveKind::Integer),
        "number" => primitive(PrimitiveKind::Number),
        "boolean" => primitive(PrimitiveKind::Boolean),
        "null" => primitive(PrimitiveKind::Null),
        "array" => SchemaKind::Array(Box::new(
            schema
                .items
                .as_deref()
                .map_or_else(SchemaNode::unknown, SchemaNode::from_schema),
        )),
        "object" => SchemaKind::Object(lower_object(schema)),
        _ => SchemaKind::Unknown,
    }
}

fn lower_object(schema: &Schema) -> ObjectShape {
    let required = schema.required.as_deref().unwrap_or_default();

    let properties = schema
        .properties
        .iter()
        .flatten()
        .map(|(name, prop)| {
            (
                name.clone(),
                Property {
                    schema: SchemaNode::from_schema(prop),
                    required: required.contains(name),
                },
            )
        })
        .collect();

    let open_value = match &schema.additional_properties {
        None | Some(AdditionalProperties::Bool(false)) => None,
        Some(AdditionalProperties::Bool(true)) => Some(OpenValue::Any),
        Some(AdditionalProperties::Schema(value)) => {
            Some(OpenValue::Schema(Box::new(SchemaNode::from_schema(value))))
        }
    };

    ObjectShape {
        properties,
        open_value,
    }
}
