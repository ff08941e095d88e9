//! Operation descriptors extracted from an OpenAPI document.
//!
//! Each operation is flattened into an [`OperationDescriptor`] whose schemas
//! are already lowered to [`SchemaNode`]. Path-level parameters are merged
//! in, and only `application/json` bodies take part in type generation.

use indexmap::IndexMap;
use tracing::warn;

use crate::schema::SchemaNode;
use crate::spec::{json_schema, OpenApiDocument, Operation, Parameter, RefOr};
use crate::ts::utils::extract_path_params;

/// Tag used for operations that declare none.
pub const UNTAGGED: &str = "untagged";

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    /// Every method, in the order operations are visited within a path.
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
        HttpMethod::Trace,
    ];

    /// Lower-case name as it appears in a path item.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Trace => "trace",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamLocation {
    /// Substituted into the path template.
    Path,
    /// Query string. Unrecognized locations fall back here.
    Query,
    /// Request header.
    Header,
    /// Cookie value.
    Cookie,
}

impl ParamLocation {
    fn parse(location: &str) -> Self {
        match location {
            "path" => ParamLocation::Path,
            "header" => ParamLocation::Header,
            "cookie" => ParamLocation::Cookie,
            _ => ParamLocation::Query,
        }
    }
}

/// A parameter after `$ref` resolution and merging.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    /// Parameter name.
    pub name: String,
    /// Where the value is sent.
    pub location: ParamLocation,
    /// Whether the value must be supplied.
    pub required: bool,
    /// Free-form description.
    pub description: Option<String>,
    /// `None` when the parameter declares no schema.
    pub schema: Option<SchemaNode>,
}

impl From<&Parameter> for ParameterDescriptor {
    fn from(p: &Parameter) -> Self {
        Self {
            name: p.name.clone(),
            location: ParamLocation::parse(&p.location),
            required: p.required,
            description: p.description.clone(),
            schema: p.schema.as_ref().map(SchemaNode::from_schema),
        }
    }
}

/// One operation of the document, flattened for generation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationDescriptor {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path template, e.g. `/pets/{petId}`.
    pub path: String,
    /// Declared `operationId`, or `{method}{path}` with `/` replaced by `_`.
    pub operation_id: String,
    /// One-line summary.
    pub summary: Option<String>,
    /// Longer description.
    pub description: Option<String>,
    /// Declared tags, possibly empty.
    pub tags: Vec<String>,
    /// Path-level and operation-level parameters, merged.
    pub parameters: Vec<ParameterDescriptor>,
    /// JSON request body schema.
    pub request_body: Option<SchemaNode>,
    /// Status label to JSON response schema, in declaration order.
    pub responses: IndexMap<String, Option<SchemaNode>>,
}

impl OperationDescriptor {
    fn new(
        document: &OpenApiDocument,
        path: &str,
        method: HttpMethod,
        op: &Operation,
        path_params: &[RefOr<Parameter>],
    ) -> Self {
        let operation_id = op
            .operation_id
            .clone()
            .unwrap_or_else(|| format!("{}{}", method.as_str(), path.replace('/', "_")));

        let request_body = op.request_body.as_ref().and_then(|body| {
            let resolved = document.resolve_request_body(body);
            if resolved.is_none() {
                warn!(operation = %operation_id, reference = body.ref_path(), "Unresolved request body reference.");
            }
            json_schema(resolved?.content.as_ref()).map(SchemaNode::from_schema)
        });

        let responses = op
            .responses
            .iter()
            .map(|(status, response)| {
                let resolved = document.resolve_response(response);
                if resolved.is_none() {
                    warn!(operation = %operation_id, status = %status, reference = response.ref_path(), "Unresolved response reference.");
                }
                let schema = resolved
                    .and_then(|r| json_schema(r.content.as_ref()))
                    .map(SchemaNode::from_schema);
                (status.clone(), schema)
            })
            .collect();

        let op_params = op.parameters.as_deref().unwrap_or_default();

        Self {
            method,
            path: path.to_string(),
            operation_id,
            summary: op.summary.clone(),
            description: op.description.clone(),
            tags: op.tags.clone(),
            parameters: merge_params(
                path,
                resolve_params(document, path_params),
                resolve_params(document, op_params),
            ),
            request_body,
            responses,
        }
    }

    /// Tags to group under, falling back to [`UNTAGGED`].
    pub fn group_tags(&self) -> Vec<&str> {
        if self.tags.is_empty() {
            vec![UNTAGGED]
        } else {
            self.tags.iter().map(String::as_str).collect()
        }
    }

    /// `GET     /pets/{id} - Find pet by ID`
    pub fn display(&self) -> String {
        let method = self.method.as_str().to_uppercase();
        match &self.summary {
            Some(summary) => format!("{method:<7} {} - {summary}", self.path),
            None => format!("{method:<7} {}", self.path),
        }
    }
}

/// Inline parameters, with component references followed. Unresolvable
/// references are skipped.
fn resolve_params<'d>(
    document: &'d OpenApiDocument,
    params: &'d [RefOr<Parameter>],
) -> Vec<&'d Parameter> {
    params
        .iter()
        .filter_map(|param| {
            let resolved = document.resolve_parameter(param);
            if resolved.is_none() {
                warn!(reference = param.ref_path(), "Unresolved parameter reference, skipping.");
            }
            resolved
        })
        .collect()
}

/// Path-level parameters followed by operation parameters; an operation
/// parameter replaces a path-level one with the same name and location.
/// Template placeholders nobody declared become required untyped path params.
fn merge_params(
    path: &str,
    path_params: Vec<&Parameter>,
    op_params: Vec<&Parameter>,
) -> Vec<ParameterDescriptor> {
    let mut fields: Vec<ParameterDescriptor> = path_params
        .into_iter()
        .map(ParameterDescriptor::from)
        .collect();

    for p in op_params {
        let param = ParameterDescriptor::from(p);
        match fields
            .iter_mut()
            .find(|f| f.name == param.name && f.location == param.location)
        {
            Some(existing) => *existing = param,
            None => fields.push(param),
        }
    }

    for name in extract_path_params(path) {
        let declared = fields
            .iter()
            .any(|f| f.location == ParamLocation::Path && f.name == name);
        if !declared {
            fields.push(ParameterDescriptor {
                name,
                location: ParamLocation::Path,
                required: true,
                description: None,
                schema: None,
            });
        }
    }

    fields
}

/// Extract every operation, paths in document order and methods in
/// [`HttpMethod::ALL`] order.
pub fn extract_operations(document: &OpenApiDocument) -> Vec<OperationDescriptor> {
    let mut operations = Vec::new();
    for (path, item) in &document.paths {
        for method in HttpMethod::ALL {
            if let Some(op) = item.operation(method) {
                operations.push(OperationDescriptor::new(
                    document,
                    path,
                    method,
                    op,
                    item.parameters.as_deref().unwrap_or_default(),
                ));
            }
        }
    }
    operations
}

/// Group operations by tag; an operation with several tags appears in each.
pub fn group_by_tag(operations: &[OperationDescriptor]) -> IndexMap<String, Vec<&OperationDescriptor>> {
    let mut groups: IndexMap<String, Vec<&OperationDescriptor>> = IndexMap::new();
    for op in operations {
        for tag in op.group_tags() {
            groups.entry(tag.to_string()).or_default().push(op);
        }
    }
    groups
}

/// Number of operations carrying one tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCount {
    /// Tag name, or [`UNTAGGED`].
    pub name: String,
    /// Operations listing this tag.
    pub count: usize,
    /// Description from the document's `tags` list.
    pub description: Option<String>,
}

/// Operation count per tag, in first-appearance order, with descriptions
/// from the document's `tags` list.
pub fn count_by_tag(document: &OpenApiDocument) -> Vec<TagCount> {
    let operations = extract_operations(document);
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for op in &operations {
        for tag in op.group_tags() {
            *counts.entry(tag).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .map(|(name, count)| TagCount {
            name: name.to_string(),
            count,
            description: document
                .tags
                .iter()
                .find(|t| t.name == name)
                .and_then(|t| t.description.clone()),
        })
        .collect()
}
