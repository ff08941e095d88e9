//! Named type declarations.

use crate::registry::SchemaRegistry;
use crate::schema::SchemaNode;
use crate::synth::Synthesizer;
use crate::ts::{TsType, TsTypeDef};

/// Turns a named schema into an `interface` (structural shapes) or a
/// `type` alias (everything else).
#[derive(Debug, Clone, Copy)]
pub struct NamedTypeEmitter<'a> {
    synth: Synthesizer<'a>,
}

impl<'a> NamedTypeEmitter<'a> {
    #[allow(missing_docs)]
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            synth: Synthesizer::new(registry),
        }
    }

    /// Declare `node` as `name`. Object results become interfaces.
    pub fn emit(&self, name: &str, node: &SchemaNode) -> TsTypeDef {
        match self.synth.synthesize(node) {
            TsType::Object(properties) => TsTypeDef::interface(name, properties),
            ty => TsTypeDef::alias(name, ty),
        }
    }

    /// Declarations for every registry entry, in document order.
    pub fn emit_all(&self) -> Vec<TsTypeDef> {
        self.synth
            .registry()
            .iter()
            .map(|(name, node)| self.emit(name, node))
            .collect()
    }

    /// Declarations for `names` in the given order; names missing from the
    /// registry are skipped.
    pub fn emit_names<'n>(&self, names: impl IntoIterator<Item = &'n str>) -> Vec<TsTypeDef> {
        let registry = self.synth.registry();
        names
            .into_iter()
            .filter_map(|name| registry.resolve(name).map(|node| self.emit(name, node)))
            .collect()
    }
}
