//! Per-operation TypeScript source files.
//!
//! A file carries a banner, the named declarations the operation depends on
//! (in discovery order), then `{Op}Params`, `{Op}Request` and `{Op}Response`.

use crate::collect::DependencyCollector;
use crate::emitter::NamedTypeEmitter;
use crate::operation::OperationDescriptor;
use crate::registry::SchemaRegistry;
use crate::synth::Synthesizer;
use crate::ts::utils::{sanitize_ts_identifier, to_pascal_case};
use crate::ts::{Emit, TsModule, TsPrimitive, TsProp, TsType, TsTypeDef};

/// Success statuses checked for the response type, in priority order.
pub const SUCCESS_STATUSES: [&str; 8] = ["200", "201", "202", "203", "206", "207", "default", "2XX"];

const NO_CONTENT_STATUS: &str = "204";

/// Generation options passed through from the project configuration.
///
/// Flags are opaque here: they only appear in the file banner.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Enabled flag names.
    pub flags: Vec<String>,
}

/// One generated source file.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    /// TypeScript text.
    pub source: String,
    /// Dependency names with no registry entry. Rendered as bare references.
    pub unresolved: Vec<String>,
}

/// `getPetById` -> `GetPetById`; non-identifier characters are folded first.
pub fn operation_type_prefix(operation_id: &str) -> String {
    to_pascal_case(&sanitize_ts_identifier(operation_id))
}

/// Assemble the source file for `operation`.
pub fn generate_operation_file(
    registry: &SchemaRegistry,
    operation: &OperationDescriptor,
    options: &GenerateOptions,
) -> GeneratedFile {
    let dependencies = DependencyCollector::new(registry).collect(operation);
    let unresolved = dependencies
        .iter()
        .filter(|name| !registry.contains(name))
        .cloned()
        .collect();

    let mut types =
        NamedTypeEmitter::new(registry).emit_names(dependencies.iter().map(String::as_str));
    types.extend(operation_types(registry, operation));

    let module = TsModule {
        banner: banner(operation, options),
        types,
    };

    GeneratedFile {
        source: module.emit(),
        unresolved,
    }
}

fn banner(operation: &OperationDescriptor, options: &GenerateOptions) -> Vec<String> {
    let mut lines = vec![
        "This file is generated by orq. Do not edit manually.".to_string(),
        format!(
            "{} {}",
            operation.method.as_str().to_uppercase(),
            operation.path
        ),
        format!("operationId: {}", operation.operation_id),
    ];
    if let Some(summary) = &operation.summary {
        lines.push(summary.clone());
    }
    if !options.flags.is_empty() {
        lines.push(format!("flags: {}", options.flags.join(", ")));
    }
    lines
}

fn operation_types(registry: &SchemaRegistry, operation: &OperationDescriptor) -> Vec<TsTypeDef> {
    let synth = Synthesizer::new(registry);
    let prefix = operation_type_prefix(&operation.operation_id);
    let mut types = Vec::new();

    if !operation.parameters.is_empty() {
        let properties = operation
            .parameters
            .iter()
            .map(|param| TsProp {
                name: param.name.clone(),
                ty: param
                    .schema
                    .as_ref()
                    .map_or(TsType::Primitive(TsPrimitive::String), |s| {
                        synth.synthesize(s)
                    }),
                optional: !param.required,
                nullable: param.schema.as_ref().is_some_and(|s| s.nullable),
            })
            .collect();
        types.push(TsTypeDef::interface(format!("{prefix}Params"), properties));
    }

    if let Some(body) = &operation.request_body {
        types.push(TsTypeDef::alias(
            format!("{prefix}Request"),
            synth.synthesize(body),
        ));
    }

    types.push(TsTypeDef::alias(
        format!("{prefix}Response"),
        response_type(&synth, operation),
    ));

    types
}

fn response_type(synth: &Synthesizer<'_>, operation: &OperationDescriptor) -> TsType {
    let success = SUCCESS_STATUSES
        .iter()
        .find_map(|status| operation.responses.get(*status).and_then(Option::as_ref));

    match success {
        Some(node) => synth.synthesize(node),
        None if operation.responses.contains_key(NO_CONTENT_STATUS) => {
            TsType::Primitive(TsPrimitive::Void)
        }
        None => TsType::unknown(),
    }
}
