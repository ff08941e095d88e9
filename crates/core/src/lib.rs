#![forbid(unsafe_code)]
#![deny(warnings, unused_must_use, dead_code, missing_debug_implementations)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

//! Schema resolution and TypeScript type synthesis for OpenAPI 3.x documents.
//!
//! The pipeline:
//! - `spec`: serde model of the raw document (JSON or YAML)
//! - `schema`: raw schemas lowered into the closed [`SchemaNode`] model
//! - `registry`: immutable index of named schemas
//! - `synth`: node to [`TsType`] expression, cycle-safe and depth-bounded
//! - `emitter`: named declarations (`interface` or `type`)
//! - `collect`: per-operation dependency closure
//! - `operation` / `generate`: operation extraction and per-operation files
//!
//! Everything after loading is read-only over the registry, so the engine can
//! be shared across threads without locking.

pub mod collect;
pub mod emitter;
pub mod generate;
pub mod operation;
pub mod registry;
pub mod schema;
pub mod spec;
pub mod synth;
pub mod ts;

pub use collect::DependencyCollector;
pub use emitter::NamedTypeEmitter;
pub use generate::{generate_operation_file, GenerateOptions, GeneratedFile};
pub use operation::{
    count_by_tag, extract_operations, group_by_tag, HttpMethod, OperationDescriptor, TagCount,
};
pub use registry::SchemaRegistry;
pub use schema::SchemaNode;
pub use spec::{OpenApiDocument, SpecError};
pub use synth::Synthesizer;
pub use ts::{Emit, TsType};
