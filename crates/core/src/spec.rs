//! OpenAPI document structs for serde deserialization.
//!
//! Only the subset needed to synthesize TypeScript declarations is modeled.
//! Maps use `IndexMap` so that declaration order in the source document is
//! preserved all the way to the generated output.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::operation::HttpMethod;

/// Errors raised while turning raw text into an [`OpenApiDocument`].
#[derive(Debug, Error)]
pub enum SpecError {
    /// The text is neither valid JSON nor valid YAML for the document model.
    #[error("Failed to parse OpenAPI document: {0}")]
    Parse(String),

    /// The document declares a version other than 3.x (e.g. Swagger 2.0).
    #[error(
        "Only OpenAPI 3.x is supported (found {0:?}). Please convert your OpenAPI 2.0 (Swagger) spec to OpenAPI 3.x."
    )]
    UnsupportedVersion(String),
}

/// Prefix of local references into `components.parameters`.
pub const COMPONENT_PARAMETER_PREFIX: &str = "#/components/parameters/";
/// Prefix of local references into `components.requestBodies`.
pub const COMPONENT_REQUEST_BODY_PREFIX: &str = "#/components/requestBodies/";
/// Prefix of local references into `components.responses`.
pub const COMPONENT_RESPONSE_PREFIX: &str = "#/components/responses/";

/// Longest chain of component-to-component references that is followed.
const MAX_REF_HOPS: usize = 16;

/// Root OpenAPI document.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenApiDocument {
    /// Version string, e.g. `3.0.3`. Swagger documents carry `swagger` instead.
    #[serde(default)]
    pub openapi: Option<String>,
    /// Title and version.
    pub info: Option<Info>,
    /// Path templates to path items, in document order.
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    /// Reusable schemas, parameters, bodies and responses.
    pub components: Option<Components>,
    /// Tag descriptions.
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// Document metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct Info {
    /// API title.
    pub title: String,
    /// API version (not the OpenAPI version).
    pub version: String,
}

/// Tag declared at the document root.
#[derive(Debug, Clone, Deserialize)]
pub struct Tag {
    /// Tag name as used by operations.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
}

/// Components section containing reusable definitions.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    /// Named schemas. An entry with an unexpected shape lowers to an empty schema.
    #[serde(default, deserialize_with = "lenient_schema_map")]
    pub schemas: Option<IndexMap<String, Schema>>,
    /// Named parameters.
    pub parameters: Option<IndexMap<String, RefOr<Parameter>>>,
    /// Named request bodies.
    pub request_bodies: Option<IndexMap<String, RefOr<RequestBody>>>,
    /// Named responses.
    pub responses: Option<IndexMap<String, RefOr<Response>>>,
}

/// An inline definition or a local `$ref` to a component.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    /// `{ "$ref": "#/components/parameters/Limit" }`
    Ref {
        /// The reference path.
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    /// Inline definition.
    Item(T),
}

impl<T> RefOr<T> {
    /// The reference path, if this is a reference.
    pub fn ref_path(&self) -> Option<&str> {
        match self {
            RefOr::Ref { ref_path } => Some(ref_path),
            RefOr::Item(_) => None,
        }
    }
}

/// Follow `item` through `table` until an inline definition is reached.
///
/// `None` for references outside `prefix`, missing names and chains longer
/// than [`MAX_REF_HOPS`].
fn resolve_component<'a, T>(
    item: &'a RefOr<T>,
    prefix: &str,
    table: Option<&'a IndexMap<String, RefOr<T>>>,
) -> Option<&'a T> {
    let mut current = item;
    for _ in 0..MAX_REF_HOPS {
        match current {
            RefOr::Item(value) => return Some(value),
            RefOr::Ref { ref_path } => {
                let name = ref_path.strip_prefix(prefix)?;
                current = table?.get(name)?;
            }
        }
    }
    None
}

/// A path item containing operations for different HTTP methods.
#[derive(Debug, Clone, Deserialize)]
pub struct PathItem {
    /// `GET`
    pub get: Option<Operation>,
    /// `PUT`
    pub put: Option<Operation>,
    /// `POST`
    pub post: Option<Operation>,
    /// `DELETE`
    pub delete: Option<Operation>,
    /// `OPTIONS`
    pub options: Option<Operation>,
    /// `HEAD`
    pub head: Option<Operation>,
    /// `PATCH`
    pub patch: Option<Operation>,
    /// `TRACE`
    pub trace: Option<Operation>,
    /// Path-level parameters shared by all operations.
    pub parameters: Option<Vec<RefOr<Parameter>>>,
}

impl PathItem {
    /// The operation registered for `method`, if any.
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Options => self.options.as_ref(),
            HttpMethod::Head => self.head.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Trace => self.trace.as_ref(),
        }
    }
}

/// An API operation (endpoint).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Unique operation identifier.
    pub operation_id: Option<String>,
    /// One-line summary.
    pub summary: Option<String>,
    /// Longer description.
    pub description: Option<String>,
    /// Grouping tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Operation-level parameters, inline or referenced.
    pub parameters: Option<Vec<RefOr<Parameter>>>,
    /// Request body, inline or referenced.
    pub request_body: Option<RefOr<RequestBody>>,
    /// Status code (or `default`) to response, inline or referenced.
    #[serde(default)]
    pub responses: IndexMap<String, RefOr<Response>>,
}

/// A parameter (query, path, header or cookie).
#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// `path`, `query`, `header` or `cookie`.
    #[serde(rename = "in")]
    pub location: String,
    /// Whether the parameter must be supplied.
    #[serde(default)]
    pub required: bool,
    /// Free-form description.
    pub description: Option<String>,
    /// Value schema. Dropped when it has an unexpected shape.
    #[serde(default, deserialize_with = "lenient")]
    pub schema: Option<Schema>,
}

/// A request body definition.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestBody {
    /// Whether a body must be sent.
    #[serde(default)]
    pub required: bool,
    /// Media type to content.
    pub content: Option<IndexMap<String, MediaType>>,
}

/// A response definition.
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    /// Free-form description.
    pub description: Option<String>,
    /// Media type to content.
    pub content: Option<IndexMap<String, MediaType>>,
}

/// Media type content (e.g., application/json).
#[derive(Debug, Clone, Deserialize)]
pub struct MediaType {
    /// Payload schema. Dropped when it has an unexpected shape.
    #[serde(default, deserialize_with = "lenient")]
    pub schema: Option<Schema>,
}

/// Content type whose schemas take part in type generation.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Pull the JSON schema out of an optional content map.
pub fn json_schema(content: Option<&IndexMap<String, MediaType>>) -> Option<&Schema> {
    content?.get(JSON_CONTENT_TYPE)?.schema.as_ref()
}

/// JSON Schema definition used in OpenAPI.
///
/// Every field is read leniently: a keyword whose value has an unexpected
/// shape is dropped instead of failing the whole document, so a malformed
/// fragment lowers to an imprecise type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// The type of the schema (string, number, integer, boolean, object, array).
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub schema_type: Option<SchemaType>,

    /// Reference to another schema.
    #[serde(rename = "$ref", default, deserialize_with = "lenient")]
    pub ref_path: Option<String>,

    /// Properties for object types, in declaration order.
    #[serde(default, deserialize_with = "lenient_schema_map")]
    pub properties: Option<IndexMap<String, Schema>>,

    /// Required property names for object types.
    #[serde(default, deserialize_with = "lenient")]
    pub required: Option<Vec<String>>,

    /// Item schema for array types.
    #[serde(default, deserialize_with = "lenient")]
    pub items: Option<Box<Schema>>,

    /// Enum values.
    #[serde(rename = "enum", default, deserialize_with = "lenient")]
    pub enum_values: Option<Vec<EnumValue>>,

    /// Format hint (e.g., date-time, binary).
    #[serde(default, deserialize_with = "lenient")]
    pub format: Option<String>,

    /// Free-form description.
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,

    /// Intersection type (all of these schemas combined).
    #[serde(default, deserialize_with = "lenient_schema_list")]
    pub all_of: Option<Vec<Schema>>,

    /// Union type (exactly one of these schemas).
    #[serde(default, deserialize_with = "lenient_schema_list")]
    pub one_of: Option<Vec<Schema>>,

    /// Union type (any of these schemas).
    #[serde(default, deserialize_with = "lenient_schema_list")]
    pub any_of: Option<Vec<Schema>>,

    /// Additional properties for object types (for Record/dict types).
    #[serde(default, deserialize_with = "lenient")]
    pub additional_properties: Option<AdditionalProperties>,

    /// OpenAPI 3.0 nullable flag (3.1 uses type arrays instead).
    #[serde(default, deserialize_with = "lenient")]
    pub nullable: Option<bool>,
}

impl Schema {
    /// Read a schema from an arbitrary value; non-object values give an
    /// empty schema.
    fn from_value(value: serde_json::Value) -> Self {
        Self::deserialize(value).unwrap_or_default()
    }
}

/// Deserialize `T`, or `None` when the value has another shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

fn lenient_schema_map<'de, D>(deserializer: D) -> Result<Option<IndexMap<String, Schema>>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Option<IndexMap<String, serde_json::Value>> = lenient(deserializer)?;
    Ok(entries.map(|entries| {
        entries
            .into_iter()
            .map(|(name, value)| (name, Schema::from_value(value)))
            .collect()
    }))
}

fn lenient_schema_list<'de, D>(deserializer: D) -> Result<Option<Vec<Schema>>, D::Error>
where
    D: Deserializer<'de>,
{
    let members: Option<Vec<serde_json::Value>> = lenient(deserializer)?;
    Ok(members.map(|members| members.into_iter().map(Schema::from_value).collect()))
}

/// Enum value as written in the document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EnumValue {
    /// String literal.
    String(String),
    /// Integer literal.
    Integer(i64),
    /// Non-integer number.
    Float(f64),
    /// Boolean literal.
    Bool(bool),
    /// `null`
    Null,
    /// Objects and arrays; these have no literal type.
    Other(serde_json::Value),
}

/// Schema type can be a single type or an array of types (for nullable).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    /// `"type": "string"`
    Single(String),
    /// `"type": ["string", "null"]`
    Multiple(Vec<String>),
}

/// Additional properties can be a boolean or a schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// `true` allows any value; `false` closes the object.
    Bool(bool),
    /// Value schema for every extra key.
    Schema(Box<Schema>),
}

impl OpenApiDocument {
    /// Parse an OpenAPI document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        serde_json::from_str(json).map_err(|e| SpecError::Parse(e.to_string()))
    }

    /// Parse an OpenAPI document from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SpecError> {
        serde_yaml::from_str(yaml).map_err(|e| SpecError::Parse(e.to_string()))
    }

    /// Parse JSON, falling back to YAML, and reject non-3.x documents.
    pub fn parse(text: &str) -> Result<Self, SpecError> {
        let document = match Self::from_json(text) {
            Ok(document) => document,
            Err(json_err) => Self::from_yaml(text).map_err(|yaml_err| {
                SpecError::Parse(format!("not JSON ({json_err}); not YAML ({yaml_err})"))
            })?,
        };
        document.ensure_openapi3()?;
        Ok(document)
    }

    /// Fail unless the `openapi` field starts with `3.`.
    pub fn ensure_openapi3(&self) -> Result<(), SpecError> {
        match self.openapi.as_deref() {
            Some(version) if version.starts_with("3.") => Ok(()),
            Some(version) => Err(SpecError::UnsupportedVersion(version.to_string())),
            None => Err(SpecError::UnsupportedVersion("<missing>".to_string())),
        }
    }

    /// Named schemas under `components.schemas`, if any.
    pub fn schemas(&self) -> Option<&IndexMap<String, Schema>> {
        self.components.as_ref()?.schemas.as_ref()
    }

    /// Resolve a parameter through `components.parameters`.
    pub fn resolve_parameter<'a>(&'a self, param: &'a RefOr<Parameter>) -> Option<&'a Parameter> {
        let table = self.components.as_ref().and_then(|c| c.parameters.as_ref());
        resolve_component(param, COMPONENT_PARAMETER_PREFIX, table)
    }

    /// Resolve a request body through `components.requestBodies`.
    pub fn resolve_request_body<'a>(
        &'a self,
        body: &'a RefOr<RequestBody>,
    ) -> Option<&'a RequestBody> {
        let table = self.components.as_ref().and_then(|c| c.request_bodies.as_ref());
        resolve_component(body, COMPONENT_REQUEST_BODY_PREFIX, table)
    }

    /// Resolve a response through `components.responses`.
    pub fn resolve_response<'a>(&'a self, response: &'a RefOr<Response>) -> Option<&'a Response> {
        let table = self.components.as_ref().and_then(|c| c.responses.as_ref());
        resolve_component(response, COMPONENT_RESPONSE_PREFIX, table)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preserves_property_order() {
        let json = r##"{
  "openapi": "3.0.3",
  "info": { "title": "Pets", "version": "1.0.0" },
  "paths": {},
  "components": { "schemas": {
    "Pet": { "type": "object", "properties": {
      "zeta": { "type": "string" }, "alpha": { "type": "integer" }, "mid": { "type": "boolean" }
    } }
  } }
}"##;
        let doc = OpenApiDocument::parse(json).unwrap();
        let pet = &doc.schemas().unwrap()["Pet"];
        let keys: Vec<_> = pet.properties.as_ref().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_parse_yaml_fallback() {
        let yaml = r"
openapi: 3.1.0
info:
  title: Pets
  version: 1.0.0
paths:
  /pets:
    get:
      operationId: listPets
      responses:
        '200':
          description: ok
";
        let doc = OpenApiDocument::parse(yaml).unwrap();
        let item = &doc.paths["/pets"];
        assert_eq!(
            item.operation(HttpMethod::Get).unwrap().operation_id.as_deref(),
            Some("listPets")
        );
    }

    #[test]
    fn test_rejects_swagger_2() {
        let json = r#"{ "swagger": "2.0", "info": { "title": "x", "version": "1" }, "paths": {} }"#;
        let err = OpenApiDocument::parse(json).unwrap_err();
        assert!(matches!(err, SpecError::UnsupportedVersion(_)));

        let json = r#"{ "openapi": "2.0", "paths": {} }"#;
        let err = OpenApiDocument::parse(json).unwrap_err();
        assert!(err.to_string().contains("Only OpenAPI 3.x is supported"));
    }

    #[test]
    fn test_parse_garbage_is_parse_error() {
        let err = OpenApiDocument::parse("{ not: [valid").unwrap_err();
        assert!(matches!(err, SpecError::Parse(_)));
    }

    #[test]
    fn test_additional_properties_variants() {
        let schema: Schema =
            serde_json::from_str(r#"{ "type": "object", "additionalProperties": true }"#).unwrap();
        assert!(matches!(
            schema.additional_properties,
            Some(AdditionalProperties::Bool(true))
        ));

        let schema: Schema = serde_json::from_str(
            r#"{ "type": "object", "additionalProperties": { "type": "integer" } }"#,
        )
        .unwrap();
        assert!(matches!(
            schema.additional_properties,
            Some(AdditionalProperties::Schema(_))
        ));
    }

    #[test]
    fn test_enum_values_mixed() {
        let schema: Schema =
            serde_json::from_str(r#"{ "enum": ["a", 1, 2.5, true, null] }"#).unwrap();
        assert_eq!(
            schema.enum_values.unwrap(),
            vec![
                EnumValue::String("a".into()),
                EnumValue::Integer(1),
                EnumValue::Float(2.5),
                EnumValue::Bool(true),
                EnumValue::Null,
            ]
        );

        let schema: Schema = serde_json::from_str(r#"{ "enum": [{ "x": 1 }, [2]] }"#).unwrap();
        assert_eq!(
            schema.enum_values.unwrap(),
            vec![
                EnumValue::Other(serde_json::json!({ "x": 1 })),
                EnumValue::Other(serde_json::json!([2])),
            ]
        );
    }

    #[test]
    fn test_malformed_fragments_do_not_reject_document() {
        let json = r##"{
  "openapi": "3.0.3",
  "paths": {},
  "components": { "schemas": {
    "A": { "type": "object", "required": ["id"], "properties": { "id": { "type": "string" } } },
    "B": { "enum": [{ "x": 1 }] },
    "C": { "type": "object", "required": true, "properties": { "n": { "type": "integer", "nullable": "yes" }, "odd": true } },
    "D": { "type": "array", "items": true, "allOf": [7, { "type": "string" }] },
    "E": 42
  } }
}"##;
        let doc = OpenApiDocument::parse(json).unwrap();
        let schemas = doc.schemas().unwrap();
        assert_eq!(
            schemas.keys().collect::<Vec<_>>(),
            vec!["A", "B", "C", "D", "E"]
        );
        assert_eq!(schemas["A"].required.as_deref(), Some(&["id".to_string()][..]));

        let c = &schemas["C"];
        assert!(c.required.is_none());
        let props = c.properties.as_ref().unwrap();
        assert!(props["n"].nullable.is_none());
        assert!(props["odd"].schema_type.is_none());

        let d = &schemas["D"];
        assert!(d.items.is_none());
        let members = d.all_of.as_ref().unwrap();
        assert_eq!(members.len(), 2);
        assert!(members[0].schema_type.is_none());

        assert!(schemas["E"].schema_type.is_none());
    }

    const REFS: &str = r##"{
  "openapi": "3.0.3",
  "paths": {
    "/pets": {
      "get": {
        "parameters": [
          { "$ref": "#/components/parameters/Limit" },
          { "$ref": "#/components/parameters/Missing" },
          { "name": "q", "in": "query", "schema": { "type": "string" } }
        ],
        "responses": { "200": { "$ref": "#/components/responses/PetList" } }
      },
      "post": {
        "requestBody": { "$ref": "#/components/requestBodies/NewPet" },
        "responses": { "201": { "$ref": "other.yaml#/components/responses/Created" } }
      }
    }
  },
  "components": {
    "parameters": { "Limit": { "name": "limit", "in": "query", "schema": { "type": "integer" } } },
    "requestBodies": { "NewPet": { "required": true, "content": { "application/json": {
      "schema": { "$ref": "#/components/schemas/Pet" } } } } },
    "responses": {
      "PetList": { "$ref": "#/components/responses/PetListBody" },
      "PetListBody": { "description": "ok", "content": { "application/json": {
        "schema": { "type": "array", "items": { "$ref": "#/components/schemas/Pet" } } } } },
      "Loop": { "$ref": "#/components/responses/Loop" }
    },
    "schemas": { "Pet": { "type": "object" } }
  }
}"##;

    #[test]
    fn test_resolve_component_refs() {
        let doc = OpenApiDocument::parse(REFS).unwrap();
        let get = doc.paths["/pets"].get.as_ref().unwrap();
        let params = get.parameters.as_ref().unwrap();

        assert_eq!(doc.resolve_parameter(&params[0]).unwrap().name, "limit");
        assert!(doc.resolve_parameter(&params[1]).is_none());
        assert_eq!(doc.resolve_parameter(&params[2]).unwrap().name, "q");
        assert_eq!(params[0].ref_path(), Some("#/components/parameters/Limit"));
        assert_eq!(params[2].ref_path(), None);

        let ok = doc.resolve_response(&get.responses["200"]).unwrap();
        assert!(json_schema(ok.content.as_ref()).is_some());

        let post = doc.paths["/pets"].post.as_ref().unwrap();
        let body = doc
            .resolve_request_body(post.request_body.as_ref().unwrap())
            .unwrap();
        assert!(body.required);
        assert!(doc.resolve_response(&post.responses["201"]).is_none());
    }

    #[test]
    fn test_self_referencing_component_is_unresolved() {
        let doc = OpenApiDocument::parse(REFS).unwrap();
        let looped = &doc.components.as_ref().unwrap().responses.as_ref().unwrap()["Loop"];
        assert!(doc.resolve_response(looped).is_none());
    }

    #[test]
    fn test_json_schema_picks_application_json() {
        let body: RequestBody = serde_json::from_str(
            r##"{ "content": {
                "text/plain": { "schema": { "type": "string" } },
                "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } }
            } }"##,
        )
        .unwrap();
        let schema = json_schema(body.content.as_ref()).unwrap();
        assert_eq!(schema.ref_path.as_deref(), Some("#/components/schemas/Pet"));
    }
}
