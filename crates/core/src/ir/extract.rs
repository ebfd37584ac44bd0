//! Endpoint extraction from the paths declaration.
//!
//! Walks every path entry and, for each HTTP method in [`HttpMethod::ALL`]
//! order, builds an [`Endpoint`]:
//! - `never` and undeclared method members are skipped
//! - `header`, `query` and `path` parameter groups are rendered to text
//! - the first `requestBody.content` entry becomes the body

use std::collections::HashSet;

use tracing::debug;

use super::api::{
    Endpoint, EndpointDocs, HttpMethod, ParamDoc, ParamGroup, ParamLocation, RequestBody,
};
use super::options::synthesize_options;
use super::utils::{sanitize_for_operation, to_camel_case_path, unique_name};
use crate::config::GenerateOptions;
use crate::error::GenerateError;
use crate::schema::{Property, SchemaAccess};

/// Extract all endpoints of `paths`, in declaration order.
pub fn extract_endpoints<S: SchemaAccess>(
    schema: &S,
    paths: &S::Type,
    options: &GenerateOptions,
) -> Result<Vec<Endpoint>, GenerateError> {
    let mut endpoints = Vec::new();
    let mut names = HashSet::new();

    for entry in schema.properties(paths) {
        for method in HttpMethod::ALL {
            if let Some(endpoint) = extract_endpoint(schema, &entry, method, options, &mut names)? {
                endpoints.push(endpoint);
            }
        }
    }

    Ok(endpoints)
}

fn extract_endpoint<S: SchemaAccess>(
    schema: &S,
    entry: &Property<S::Type>,
    method: HttpMethod,
    options: &GenerateOptions,
    names: &mut HashSet<String>,
) -> Result<Option<Endpoint>, GenerateError> {
    let path = entry.name.as_str();
    let Some(member) = schema.property(&entry.ty, method.key()) else {
        return Ok(None);
    };
    if schema.is_never(&member.ty) {
        return Ok(None);
    }
    if !member.declared {
        debug!(path, method = %method, "Skipping operation without a property declaration.");
        return Ok(None);
    }
    let operation = &member.ty;

    let indirection = schema
        .indexed_access(operation)
        .filter(|access| access.object == options.operations_type);
    let operation_id = indirection
        .as_ref()
        .map(|access| sanitize_for_operation(&access.key));

    let mut docs = EndpointDocs {
        summary: member.docs.clone().or_else(|| {
            let access = indirection.as_ref()?;
            let operations = schema.find_interface(&options.operations_type)?;
            schema.property(&operations, &access.key)?.docs
        }),
        params: Vec::new(),
    };

    let parameters = schema
        .property(operation, "parameters")
        .filter(|parameters| !schema.is_never(&parameters.ty));
    let mut group = |location| {
        let parameters = parameters.as_ref()?;
        param_group(schema, &parameters.ty, location, &mut docs.params)
    };
    let header_params = group(ParamLocation::Header);
    let query_params = group(ParamLocation::Query);
    let path_params = group(ParamLocation::Path);

    let body = request_body(schema, operation, path, method)?;

    let base_name = format!("{}{}", method.key(), to_camel_case_path(path, true));
    let operation_name = unique_name(&base_name, names);

    let options = synthesize_options(
        header_params.as_ref(),
        query_params.as_ref(),
        path_params.as_ref(),
        body.as_ref(),
    );

    debug!(
        path,
        method = %method,
        operation = %operation_name,
        operation_id = ?operation_id,
        "Extracted endpoint."
    );

    Ok(Some(Endpoint {
        path: path.to_string(),
        method,
        operation_name,
        operation_id,
        header_params,
        query_params,
        path_params,
        body,
        options,
        docs,
    }))
}

fn param_group<S: SchemaAccess>(
    schema: &S,
    parameters: &S::Type,
    location: ParamLocation,
    docs: &mut Vec<ParamDoc>,
) -> Option<ParamGroup> {
    let member = schema.property(parameters, location.as_str())?;
    if schema.is_never(&member.ty) {
        return None;
    }

    let props = schema.properties(&member.ty);
    docs.extend(props.iter().filter_map(|prop| {
        prop.docs.as_ref().map(|text| ParamDoc {
            location,
            name: prop.name.clone(),
            text: text.clone(),
        })
    }));

    Some(ParamGroup {
        ty: schema.render(&member.ty),
        optional: member.optional,
        keys: props.into_iter().map(|prop| prop.name).collect(),
    })
}

fn request_body<S: SchemaAccess>(
    schema: &S,
    operation: &S::Type,
    path: &str,
    method: HttpMethod,
) -> Result<Option<RequestBody>, GenerateError> {
    let Some(member) = schema.property(operation, "requestBody") else {
        return Ok(None);
    };
    if schema.is_never(&member.ty) {
        return Ok(None);
    }

    let missing = || GenerateError::MissingContentType {
        path: path.to_string(),
        method,
    };
    let content = schema.property(&member.ty, "content").ok_or_else(missing)?;
    let first = schema
        .properties(&content.ty)
        .into_iter()
        .next()
        .ok_or_else(missing)?;

    Ok(Some(RequestBody {
        ty: schema.render(&first.ty),
        content_type: first.name,
        optional: member.optional,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ir::emit::Emit;
    use crate::schema::DeclarationSchema;

    fn extract(source: &str) -> Result<Vec<Endpoint>, GenerateError> {
        extract_with(source, &GenerateOptions::default())
    }

    fn extract_with(source: &str, options: &GenerateOptions) -> Result<Vec<Endpoint>, GenerateError> {
        let schema = DeclarationSchema::parse(source).unwrap();
        let paths = schema.find_interface(&options.paths_type).unwrap();
        extract_endpoints(&schema, &paths, options)
    }

    const PETSTORE: &str = r#"
export interface paths {
    "/pets": {
        parameters: { query?: never; header?: never; path?: never; cookie?: never };
        /** List all pets */
        get: operations["listPets"];
        put?: never;
        /** Create a pet */
        post: operations["createPets"];
        delete?: never;
    };
    "/pets/{petId}": {
        get: operations["show-pet-by-id"];
    };
}
export interface components {
    schemas: {
        Pet: { id: number; name: string };
        NewPet: { name: string };
    };
}
export interface operations {
    listPets: {
        parameters: {
            query?: {
                /** How many items to return at one time (max 100) */
                limit?: number;
            };
            header?: never;
            path?: never;
        };
        requestBody?: never;
        responses: { 200: { content: { "application/json": components["schemas"]["Pet"][] } } };
    };
    createPets: {
        parameters: { query?: never; header?: never; path?: never };
        requestBody: {
            content: {
                "application/json": components["schemas"]["NewPet"];
                "application/xml": components["schemas"]["NewPet"];
            };
        };
        responses: { 201: { content?: never } };
    };
    "show-pet-by-id": {
        parameters: {
            path: {
                /** The id of the pet to retrieve */
                petId: string;
            };
        };
        responses: never;
    };
}
"#;

    #[test]
    fn test_extract_petstore() {
        let endpoints = extract(PETSTORE).unwrap();
        let names: Vec<_> = endpoints.iter().map(|e| e.operation_name.as_str()).collect();
        assert_eq!(names, vec!["getPets", "postPets", "getPetsPetid"]);

        let list = &endpoints[0];
        assert_eq!(list.operation_id.as_deref(), Some("listPets"));
        assert_eq!(list.docs.summary.as_deref(), Some("List all pets"));
        assert_eq!(list.query_params.as_ref().unwrap().keys, vec!["limit".to_string()]);
        assert!(list.query_params.as_ref().unwrap().optional);
        assert!(list.header_params.is_none());
        assert!(list.body.is_none());
        assert_eq!(
            list.docs.params,
            vec![ParamDoc {
                location: ParamLocation::Query,
                name: "limit".into(),
                text: "How many items to return at one time (max 100)".into(),
            }]
        );
        assert!(list.options.as_ref().unwrap().field("query").is_some());

        let create = &endpoints[1];
        let body = create.body.as_ref().unwrap();
        assert_eq!(body.content_type, "application/json");
        assert_eq!(body.ty, "components[\"schemas\"][\"NewPet\"]");
        assert!(create.options.as_ref().unwrap().field("body").is_some());

        let show = &endpoints[2];
        assert_eq!(show.operation_id.as_deref(), Some("show_pet_by_id"));
        assert_eq!(show.path_params.as_ref().unwrap().ty, "{ petId: string }");
        assert!(show.options.as_ref().unwrap().field("path").is_some());
    }

    #[test]
    fn test_extract_inline_operations_have_no_operation_id() {
        let endpoints = extract(
            r#"
export interface paths {
    "/health": {
        /** Health check */
        get: { parameters: {}; responses: never };
        head: { responses: never };
    };
}
"#,
        )
        .unwrap();
        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[0].operation_id, None);
        assert_eq!(endpoints[0].docs.summary.as_deref(), Some("Health check"));
        assert_eq!(endpoints[0].options, None);
        assert_eq!(endpoints[1].operation_name, "headHealth");
    }

    #[test]
    fn test_extract_missing_content_type_fails() {
        let err = extract(
            r#"
export interface paths {
    "/upload": {
        post: { requestBody: { content: {} }; responses: never };
    };
}
"#,
        )
        .unwrap_err();
        match err {
            GenerateError::MissingContentType { path, method } => {
                assert_eq!(path, "/upload");
                assert_eq!(method, HttpMethod::Post);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_extract_skips_mapped_methods() {
        let endpoints = extract(
            r#"
type Op = { responses: never };
export interface paths {
    "/mapped": Record<"get" | "post", Op>;
    "/declared": { get: Op };
}
"#,
        )
        .unwrap();
        let names: Vec<_> = endpoints.iter().map(|e| e.operation_name.as_str()).collect();
        assert_eq!(names, vec!["getDeclared"]);
    }

    #[test]
    fn test_extract_disambiguates_colliding_names() {
        let endpoints = extract(
            r#"
export interface paths {
    "/a-b": { get: { responses: never } };
    "/a/b": { get: { responses: never } };
    "/a.b": { get: { responses: never } };
}
"#,
        )
        .unwrap();
        let names: Vec<_> = endpoints.iter().map(|e| e.operation_name.as_str()).collect();
        assert_eq!(names, vec!["getAB", "getAB2", "getAB3"]);
    }

    #[test]
    fn test_extract_header_params_and_docs() {
        let endpoints = extract(
            r#"
export interface paths {
    "/api/v1/complex-path/{id}/nested/{nestedId}": {
        get: {
            parameters: {
                header: {
                    /** API version header */
                    "X-API-Version"?: string;
                    "Content-Type": string;
                };
                path: { id: string; nestedId: string };
            };
            responses: never;
        };
    };
}
"#,
        )
        .unwrap();
        let endpoint = &endpoints[0];
        assert_eq!(endpoint.operation_name, "getApiV1ComplexPathIdNestedNestedid");
        let header = endpoint.header_params.as_ref().unwrap();
        assert_eq!(header.ty, "{ \"X-API-Version\"?: string; \"Content-Type\": string }");
        let options = endpoint.options.as_ref().unwrap();
        let merge = options.header.as_ref().unwrap();
        assert_eq!(merge.keys, vec!["X-API-Version".to_string()]);
        assert!(options.to_ts_type().emit().contains("Omit<"));
        assert_eq!(endpoint.docs.params[0].location, ParamLocation::Header);
        assert_eq!(endpoint.docs.params[0].name, "X-API-Version");
    }

    #[test]
    fn test_extract_custom_operations_name() {
        let options = GenerateOptions {
            paths_type: "ApiPaths".into(),
            operations_type: "ApiOperations".into(),
            ..GenerateOptions::default()
        };
        let endpoints = extract_with(
            r#"
export interface ApiPaths {
    "/users": { get: ApiOperations["list.users"]; post: operations["createUser"] };
}
export interface ApiOperations {
    "list.users": { responses: never };
}
export interface operations {
    createUser: { responses: never };
}
"#,
            &options,
        )
        .unwrap();
        assert_eq!(endpoints[0].operation_id.as_deref(), Some("list_users"));
        assert_eq!(endpoints[1].operation_id, None);
    }
}
