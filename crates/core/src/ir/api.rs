//! Endpoint descriptors extracted from the schema.

use std::fmt;

use super::options::OptionsType;

/// HTTP methods in the order endpoints are discovered for each path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Head,
        HttpMethod::Options,
    ];

    /// Property name in a path item and prefix of generated method names.
    pub fn key(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
        }
    }

    /// Verb of the openapi-fetch client method.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a parameter group travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    Header,
    Query,
    Path,
}

impl ParamLocation {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamLocation::Header => "header",
            ParamLocation::Query => "query",
            ParamLocation::Path => "path",
        }
    }
}

/// One of the `header` / `query` / `path` members of `parameters`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamGroup {
    /// Rendered type text.
    pub ty: String,
    pub optional: bool,
    /// Member names of the group, when the type resolves to an object.
    pub keys: Vec<String>,
}

/// First declared request content entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBody {
    pub content_type: String,
    pub ty: String,
    pub optional: bool,
}

/// JSDoc of a single parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDoc {
    pub location: ParamLocation,
    pub name: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointDocs {
    /// JSDoc of the operation declaration.
    pub summary: Option<String>,
    pub params: Vec<ParamDoc>,
}

/// One HTTP operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub path: String,
    pub method: HttpMethod,
    /// `method` + camel-cased path, unique within a run.
    pub operation_name: String,
    /// Sanitized operationId when declared through `operations["..."]`.
    pub operation_id: Option<String>,
    pub header_params: Option<ParamGroup>,
    pub query_params: Option<ParamGroup>,
    pub path_params: Option<ParamGroup>,
    pub body: Option<RequestBody>,
    /// Call-site parameter type; `None` when the method takes no arguments.
    pub options: Option<OptionsType>,
    pub docs: EndpointDocs,
}

/// Everything the class emitter needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientIR {
    pub endpoints: Vec<Endpoint>,
    /// Schema type names to import, in import order.
    pub schema_types: Vec<String>,
}
