//! Intermediate representation for declaration to client code generation.
//!
//! This module defines a three-layer architecture:
//! 1. API-level IR: endpoints, parameter groups and call-site option types
//! 2. TypeScript AST IR: types, expressions, statements and the client class
//! 3. Emission: AST to TypeScript code strings via the `Emit` trait
//!
//! ## Module Structure
//!
//! - `types`: TypeScript AST IR (TsType, TsExpr, TsStmt, TsClass, TsModule)
//! - `api`: API-level IR (Endpoint, ParamGroup, RequestBody, ClientIR)
//! - `extract`: schema -> API IR conversion
//! - `options`: option types and the header default-merge formula
//! - `codegen`: API IR -> TypeScript AST
//! - `emit`: TypeScript AST -> code strings (via Emit trait)
//! - `utils`: Naming and quoting helpers shared across modules

mod api;
mod codegen;
mod emit;
mod extract;
mod options;
pub mod types;
pub mod utils;

// Re-export the main entry points
pub use api::{
    ClientIR, Endpoint, EndpointDocs, HttpMethod, ParamDoc, ParamGroup, ParamLocation,
    RequestBody,
};
pub use codegen::{CLIENT_CLASS, codegen_module};
pub use emit::Emit;
pub use extract::extract_endpoints;
pub use options::{HEADER_TYPE_PARAM, HeaderMerge, HeaderRequirement, OptionsType, synthesize_options};
