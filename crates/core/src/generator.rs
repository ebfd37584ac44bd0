//! Generation pipeline.
//!
//! 1. Parse: declaration source -> DeclarationSchema
//! 2. Extract: SchemaAccess -> endpoints (all schema logic resolved)
//! 3. Codegen: ClientIR -> TsModule (TypeScript AST)
//! 4. Emit: TsModule -> String (via Emit trait)

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::config::GenerateOptions;
use crate::error::GenerateError;
use crate::ir::{ClientIR, Emit, Endpoint, HeaderRequirement, codegen_module, extract_endpoints};
use crate::schema::{DeclarationSchema, SchemaAccess};

/// Generate the client module from declaration source text.
pub fn generate(source: &str, options: &GenerateOptions) -> Result<String, GenerateError> {
    let schema = DeclarationSchema::parse(source)?;
    generate_with(&schema, options)
}

/// Generate the client module from any schema backend.
pub fn generate_with<S: SchemaAccess>(
    schema: &S,
    options: &GenerateOptions,
) -> Result<String, GenerateError> {
    let paths = schema.find_interface(&options.paths_type).ok_or_else(|| {
        GenerateError::MissingDeclaration {
            name: options.paths_type.clone(),
        }
    })?;

    let schema_types = [
        &options.components_type,
        &options.paths_type,
        &options.operations_type,
    ]
    .into_iter()
    .filter(|name| **name == options.paths_type || schema.has_declaration(name))
    .fold(Vec::<String>::new(), |mut names, name| {
        if !names.contains(name) {
            names.push(name.clone());
        }
        names
    });

    let endpoints = extract_endpoints(schema, &paths, options)?;
    report_header_requirements(&endpoints, &options.default_headers);

    let client = ClientIR {
        endpoints,
        schema_types,
    };
    let output = codegen_module(&client, options).emit();

    info!(
        endpoints = client.endpoints.len(),
        imports = %client.schema_types.join(", "),
        "Generated client module."
    );
    Ok(output)
}

/// Read a schema file and generate the client module, importing the schema
/// module by the file's stem.
pub fn generate_from_path(path: &Path, options: &GenerateOptions) -> Result<String, GenerateError> {
    let source = fs::read_to_string(path).map_err(|source| GenerateError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut options = options.clone();
    if let Some(stem) = schema_module_name(path) {
        options.schema_module = stem;
    }
    debug!(
        path = %path.display(),
        module = %options.schema_module,
        source_len = source.len(),
        "Read schema file."
    );
    generate(&source, &options)
}

/// File name without the `.d.ts` / `.ts` extension.
fn schema_module_name(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let stem = [".d.ts", ".ts"]
        .iter()
        .find_map(|ext| name.strip_suffix(ext))
        .unwrap_or(name);
    (!stem.is_empty()).then(|| stem.to_string())
}

fn report_header_requirements(endpoints: &[Endpoint], default_headers: &[String]) {
    if default_headers.is_empty() {
        return;
    }
    let defaults: BTreeSet<String> = default_headers.iter().cloned().collect();
    for endpoint in endpoints {
        let Some(header) = endpoint.options.as_ref().and_then(|o| o.header.as_ref()) else {
            continue;
        };
        match header.requirement(&defaults) {
            HeaderRequirement::Optional => debug!(
                method = %endpoint.method,
                path = %endpoint.path,
                "All headers covered by defaults."
            ),
            HeaderRequirement::Required { uncovered, covered } => debug!(
                method = %endpoint.method,
                path = %endpoint.path,
                uncovered = %uncovered.join(", "),
                covered = %covered.join(", "),
                "Headers still required at call site."
            ),
        }
    }
}
