//! Typed openapi-fetch client generation from openapi-typescript declarations.
//!
//! The input is the `.d.ts` source openapi-typescript writes for an OpenAPI
//! document. The output is a TypeScript module with a `Client<HT>` class that
//! wraps `createClient` from openapi-fetch, one `async` method per endpoint.
//! Each method's parameter type lets headers present in the client's default
//! headers (`HT`) be omitted at the call site.
//!
//! ```no_run
//! use fetchgen_core::{GenerateOptions, generate};
//!
//! let source = std::fs::read_to_string("schema.d.ts").unwrap_or_default();
//! let module = generate(&source, &GenerateOptions::default());
//! ```

pub mod config;
mod error;
mod generator;
pub mod ir;
pub mod schema;

pub use config::{GenerateOptions, VERSION};
pub use error::GenerateError;
pub use generator::{generate, generate_from_path, generate_with};
