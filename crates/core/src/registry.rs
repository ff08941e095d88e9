//! Read-only index of named schemas.

use indexmap::IndexMap;
use tracing::debug;

use crate::schema::SchemaNode;
use crate::spec::OpenApiDocument;

/// Named schema nodes, built once per generation run and never mutated.
///
/// Names are compared verbatim (case-sensitive, no normalization).
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: IndexMap<String, SchemaNode>,
}

impl SchemaRegistry {
    /// Index every entry under `components.schemas`.
    pub fn from_document(document: &OpenApiDocument) -> Self {
        let registry: Self = document
            .schemas()
            .into_iter()
            .flatten()
            .map(|(name, schema)| (name.clone(), SchemaNode::from_schema(schema)))
            .collect();
        debug!(schemas = registry.len(), "Built schema registry.");
        registry
    }

    /// Node registered under `name`.
    pub fn resolve(&self, name: &str) -> Option<&SchemaNode> {
        self.schemas.get(name)
    }

    #[allow(missing_docs)]
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Number of named schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Schema names in document order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// `(name, node)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.schemas.iter().map(|(name, node)| (name.as_str(), node))
    }
}

impl FromIterator<(String, SchemaNode)> for SchemaRegistry {
    fn from_iter<I: IntoIterator<Item = (String, SchemaNode)>>(iter: I) -> Self {
        Self {
            schemas: iter.into_iter().collect(),
        }
    }
}
