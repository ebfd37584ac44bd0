//! Generation errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::ir::HttpMethod;

/// Terminal failure of a generation run. No output is produced when one occurs.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The paths interface (or another required declaration) is not in the schema.
    #[error("Interface {name} not found")]
    MissingDeclaration { name: String },

    /// A `requestBody` was declared without any `content` entry.
    #[error("No content type found in requestBody of {method} {path}")]
    MissingContentType { path: String, method: HttpMethod },

    #[error("Failed to parse schema: {message}")]
    SchemaParse { message: String },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
