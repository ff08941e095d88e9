//! TypeScript output model.
//!
//! - `types`: type expression AST (TsType, TsProp, TsTypeDef, TsModule)
//! - `emit`: AST to code strings (via the `Emit` trait)
//! - `utils`: identifier, escaping and case helpers

mod emit;
mod types;
pub mod utils;

pub use emit::Emit;
pub use types::{TsLiteral, TsModule, TsPrimitive, TsProp, TsType, TsTypeDef, TypeDefKind};
