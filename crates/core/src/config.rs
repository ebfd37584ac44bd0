//! Generation options.

/// Version string written into the generated file banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_PATHS_TYPE: &str = "paths";
pub const DEFAULT_COMPONENTS_TYPE: &str = "components";
pub const DEFAULT_OPERATIONS_TYPE: &str = "operations";
pub const DEFAULT_SCHEMA_IMPORT_PREFIX: &str = "./";
pub const DEFAULT_SCHEMA_MODULE: &str = "schema";

/// Immutable input to a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Name of the interface listing the API paths.
    pub paths_type: String,
    pub components_type: String,
    /// Name of the interface that `paths` entries index into for shared operations.
    pub operations_type: String,
    /// Name methods after their operationId when one is available.
    pub use_operation_id: bool,
    pub schema_import_path_prefix: String,
    /// Module name of the schema file, without extension.
    pub schema_module: String,
    /// Base URL baked into the generated constructor.
    pub base_url: Option<String>,
    /// Header names the caller guarantees to pass as client defaults.
    pub default_headers: Vec<String>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            paths_type: DEFAULT_PATHS_TYPE.to_string(),
            components_type: DEFAULT_COMPONENTS_TYPE.to_string(),
            operations_type: DEFAULT_OPERATIONS_TYPE.to_string(),
            use_operation_id: false,
            schema_import_path_prefix: DEFAULT_SCHEMA_IMPORT_PREFIX.to_string(),
            schema_module: DEFAULT_SCHEMA_MODULE.to_string(),
            base_url: None,
            default_headers: Vec::new(),
        }
    }
}

impl GenerateOptions {
    /// Module specifier used to import the schema types.
    pub fn schema_import_specifier(&self) -> String {
        format!("{}{}", self.schema_import_path_prefix, self.schema_module)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_import_specifier() {
        let mut options = GenerateOptions::default();
        assert_eq!(options.schema_import_specifier(), "./schema");

        options.schema_import_path_prefix = "@api/".into();
        options.schema_module = "petstore".into();
        assert_eq!(options.schema_import_specifier(), "@api/petstore");
    }
}
