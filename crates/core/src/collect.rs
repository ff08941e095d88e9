//! Transitive schema dependencies of an operation.

use indexmap::IndexSet;
use tracing::trace;

use crate::operation::OperationDescriptor;
use crate::registry::SchemaRegistry;
use crate::schema::{OpenValue, SchemaKind, SchemaNode};

/// Walks the same graph shape as [`Synthesizer`](crate::synth::Synthesizer)
/// but only records which named schemas are reachable.
#[derive(Debug, Clone, Copy)]
pub struct DependencyCollector<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> DependencyCollector<'a> {
    /// Collector over `registry`.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Names reachable from the operation's parameters, JSON request body and
    /// JSON responses, in first-discovery order.
    ///
    /// Names that do not resolve are kept as leaves so callers can report them.
    pub fn collect(&self, operation: &OperationDescriptor) -> IndexSet<String> {
        let params = operation.parameters.iter().filter_map(|p| p.schema.as_ref());
        let body = operation.request_body.iter();
        let responses = operation.responses.values().flatten();
        self.collect_from(params.chain(body).chain(responses))
    }

    /// Names reachable from an arbitrary set of roots.
    pub fn collect_from<'n>(&self, roots: impl IntoIterator<Item = &'n SchemaNode>) -> IndexSet<String> {
        let mut visited = IndexSet::new();
        for root in roots {
            self.walk(root, &mut visited);
        }
        visited
    }

    fn walk(&self, node: &SchemaNode, visited: &mut IndexSet<String>) {
        match &node.kind {
            SchemaKind::Reference(name) => {
                if !visited.insert(name.clone()) {
                    return;
                }
                match self.registry.resolve(name) {
                    Some(target) => self.walk(target, visited),
                    None => trace!(name = %name, "Unresolved dependency."),
                }
            }
            SchemaKind::Array(items) => self.walk(items, visited),
            SchemaKind::Object(shape) => {
                for prop in shape.properties.values() {
                    self.walk(&prop.schema, visited);
                }
                if let Some(OpenValue::Schema(value)) = &shape.open_value {
                    self.walk(value, visited);
                }
            }
            SchemaKind::Composite { members, .. } => {
                for member in members {
                    self.walk(member, visited);
                }
            }
            SchemaKind::Primitive(_) | SchemaKind::Unknown => {}
        }
    }
}
