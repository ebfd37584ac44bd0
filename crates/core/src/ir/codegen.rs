//! Code generation from endpoints to the TypeScript client AST.
//!
//! This module turns the extracted endpoints into a `TsModule` holding the
//! imports and the generic `Client<HT>` class. The AST is then emitted to
//! text via the `Emit` trait.

use std::collections::HashSet;

use tracing::warn;

use super::api::{ClientIR, Endpoint};
use super::options::{HEADER_TYPE_PARAM, OptionsType};
use super::types::{
    BinOp, ImportItem, ObjectEntry, TsClass, TsDoc, TsExpr, TsField, TsImport, TsMethod,
    TsModule, TsParam, TsPrimitive, TsStmt, TsType, TsTypeParam,
};
use super::utils::{is_valid_identifier, unique_name};
use crate::config::{GenerateOptions, VERSION};

/// Name of the generated class.
pub const CLIENT_CLASS: &str = "Client";

const FETCH_MODULE: &str = "openapi-fetch";
const FETCH_CLIENT_ALIAS: &str = "FetchClient";

/// Generate a complete TypeScript module from the extracted endpoints.
pub fn codegen_module(client: &ClientIR, options: &GenerateOptions) -> TsModule {
    TsModule {
        banner: vec![
            format!("THIS FILE IS AUTO-GENERATED BY openapi-fetch-gen {VERSION}."),
            "DO NOT EDIT THIS FILE MANUALLY.".to_string(),
        ],
        imports: codegen_imports(client, options),
        classes: vec![codegen_class(client, options)],
    }
}

fn codegen_imports(client: &ClientIR, options: &GenerateOptions) -> Vec<TsImport> {
    let type_item = |name: &str, alias: Option<&str>| ImportItem {
        name: name.to_string(),
        alias: alias.map(str::to_string),
        type_only: true,
    };

    vec![
        TsImport {
            default: Some("createClient".to_string()),
            items: vec![
                type_item("Client", Some(FETCH_CLIENT_ALIAS)),
                type_item("ClientOptions", None),
            ],
            from: FETCH_MODULE.to_string(),
            type_only: false,
        },
        TsImport {
            default: None,
            items: client
                .schema_types
                .iter()
                .map(|name| ImportItem {
                    name: name.clone(),
                    alias: None,
                    type_only: false,
                })
                .collect(),
            from: options.schema_import_specifier(),
            type_only: true,
        },
    ]
}

fn this_member(prop: &str) -> TsExpr {
    TsExpr::ident("this").member(prop)
}

fn ht() -> TsType {
    TsType::Ref(HEADER_TYPE_PARAM.to_string())
}

fn codegen_class(client: &ClientIR, options: &GenerateOptions) -> TsClass {
    let guaranteed = !options.default_headers.is_empty();
    let header_keys = if guaranteed {
        TsType::literal_union(options.default_headers.iter().cloned())
    } else {
        TsType::Primitive(TsPrimitive::String)
    };

    let fields = vec![
        TsField {
            name: "client".to_string(),
            ty: TsType::Ref(format!("{FETCH_CLIENT_ALIAS}<{}>", options.paths_type)),
            is_private: true,
            is_readonly: true,
        },
        TsField {
            name: "defaultHeaders".to_string(),
            ty: ht(),
            is_private: true,
            is_readonly: true,
        },
    ];

    // A required parameter cannot follow an optional one.
    let constructor_params = vec![
        TsParam {
            name: "clientOptions".to_string(),
            ty: Some(TsType::Ref("ClientOptions".to_string())),
            optional: !guaranteed,
        },
        TsParam {
            name: "defaultHeaders".to_string(),
            ty: Some(ht()),
            optional: !guaranteed,
        },
    ];

    let client_options = match &options.base_url {
        Some(base_url) => TsExpr::Object(vec![
            ObjectEntry::Prop("baseUrl".to_string(), TsExpr::string(base_url.clone())),
            ObjectEntry::Spread(TsExpr::ident("clientOptions")),
        ]),
        None => TsExpr::ident("clientOptions"),
    };
    let default_headers = if guaranteed {
        TsExpr::ident("defaultHeaders")
    } else {
        TsExpr::BinOp {
            left: Box::new(TsExpr::ident("defaultHeaders")),
            op: BinOp::NullishCoalescing,
            right: Box::new(TsExpr::Paren(Box::new(TsExpr::Cast {
                expr: Box::new(TsExpr::Object(Vec::new())),
                ty: ht(),
            }))),
        }
    };
    let constructor_body = vec![
        TsStmt::Expr(TsExpr::Assign {
            target: Box::new(this_member("client")),
            value: Box::new(TsExpr::Call {
                callee: Box::new(TsExpr::ident("createClient")),
                type_args: vec![TsType::Ref(options.paths_type.clone())],
                args: vec![client_options],
            }),
        }),
        TsStmt::Expr(TsExpr::Assign {
            target: Box::new(this_member("defaultHeaders")),
            value: Box::new(default_headers),
        }),
    ];

    let mut used = HashSet::new();
    let methods = client
        .endpoints
        .iter()
        .map(|endpoint| {
            let name = method_name(endpoint, options.use_operation_id, &mut used);
            codegen_method(endpoint, name)
        })
        .collect();

    TsClass {
        name: CLIENT_CLASS.to_string(),
        type_params: vec![TsTypeParam {
            name: HEADER_TYPE_PARAM.to_string(),
            constraint: Some(TsType::Record {
                key: Box::new(header_keys),
                value: Box::new(TsType::Primitive(TsPrimitive::String)),
            }),
        }],
        fields,
        constructor_params,
        constructor_body,
        methods,
        is_export: true,
    }
}

/// Pick the method name: the operationId when requested and usable, else the
/// path-derived operation name.
fn method_name(endpoint: &Endpoint, use_operation_id: bool, used: &mut HashSet<String>) -> String {
    if use_operation_id {
        match endpoint.operation_id.as_deref() {
            Some(id) if is_valid_identifier(id) && used.insert(id.to_string()) => {
                return id.to_string();
            }
            Some(id) => {
                warn!(
                    operation_id = %id,
                    fallback = %endpoint.operation_name,
                    "operationId unusable as a method name, falling back to path-derived name."
                );
            }
            None => {}
        }
    }
    unique_name(&endpoint.operation_name, used)
}

fn codegen_doc(endpoint: &Endpoint) -> TsDoc {
    let mut lines: Vec<String> = endpoint
        .docs
        .summary
        .iter()
        .flat_map(|summary| summary.lines().map(str::to_string))
        .collect();

    for (index, param) in endpoint.docs.params.iter().enumerate() {
        if index == 0 && !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format!(
            "@param params.{}.{}",
            param.location.as_str(),
            param.name
        ));
        lines.extend(param.text.lines().map(str::to_string));
    }

    TsDoc { lines }
}

fn codegen_method(endpoint: &Endpoint, name: String) -> TsMethod {
    let mut args = vec![TsExpr::string(endpoint.path.clone())];
    let mut params = Vec::new();

    if let Some(options) = &endpoint.options {
        params.push(TsParam {
            name: "params".to_string(),
            ty: Some(options.to_ts_type()),
            optional: options.is_optional(),
        });
        let init = codegen_fetch_init(options);
        if !init.is_empty() {
            args.push(TsExpr::Object(init));
        }
    }

    let call = TsExpr::Call {
        callee: Box::new(this_member("client").member(endpoint.method.as_str())),
        type_args: Vec::new(),
        args,
    };

    TsMethod {
        doc: codegen_doc(endpoint),
        name,
        params,
        body: vec![TsStmt::Return(Some(TsExpr::Await(Box::new(call))))],
        is_async: true,
    }
}

/// `{ params: { header, query, path }, body }` for the openapi-fetch call.
fn codegen_fetch_init(options: &OptionsType) -> Vec<ObjectEntry> {
    let access = |field: &str| {
        let params = TsExpr::ident("params");
        if options.is_optional() {
            params.optional_member(field)
        } else {
            params.member(field)
        }
    };

    let mut param_entries = Vec::new();
    if let Some(header) = &options.header {
        let merged = TsExpr::Object(vec![
            ObjectEntry::Spread(this_member("defaultHeaders")),
            ObjectEntry::Spread(access("header")),
        ]);
        param_entries.push(ObjectEntry::Prop(
            "header".to_string(),
            TsExpr::Cast {
                expr: Box::new(merged),
                ty: TsType::Ref(header.declared.clone()),
            },
        ));
    }
    for field in options.fields.iter().filter(|field| field.name != "body") {
        param_entries.push(ObjectEntry::Prop(field.name.clone(), access(&field.name)));
    }

    let mut entries = Vec::new();
    if !param_entries.is_empty() {
        entries.push(ObjectEntry::Prop(
            "params".to_string(),
            TsExpr::Object(param_entries),
        ));
    }
    if options.field("body").is_some() {
        entries.push(ObjectEntry::Prop("body".to_string(), access("body")));
    }
    entries
}
