//! OpenAPI document for the generated routes, grouped by resource tags.

use crate::routes::resource::{route_specs, Operation, RouteSpec};
use axum::http::Method;
use std::collections::{BTreeMap, BTreeSet};
use utoipa::openapi::{
    path::{HttpMethod, Operation as ApiOperation, OperationBuilder, Parameter, ParameterBuilder, ParameterIn, PathItem},
    request_body::RequestBodyBuilder,
    response::ResponseBuilder,
    schema::{ObjectBuilder, Type},
    tag::TagBuilder,
    InfoBuilder, OpenApi, OpenApiBuilder, PathsBuilder, Required,
};

/// What the document needs to know about one mounted resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceDoc {
    pub prefix: String,
    pub tags: BTreeSet<String>,
}

fn http_method(method: &Method) -> Option<HttpMethod> {
    Some(match *method {
        Method::GET => HttpMethod::Get,
        Method::POST => HttpMethod::Post,
        Method::PUT => HttpMethod::Put,
        Method::PATCH => HttpMethod::Patch,
        Method::DELETE => HttpMethod::Delete,
        _ => return None,
    })
}

fn operation_id(prefix: &str, spec: &RouteSpec) -> String {
    let resource = prefix.trim_start_matches('/').replace('/', "_");
    format!("{}_{}_{}", spec.method.as_str().to_lowercase(), resource, format!("{:?}", spec.operation).to_lowercase())
}

fn integer_parameter(name: &str, location: ParameterIn, required: Required) -> Parameter {
    ParameterBuilder::new()
        .name(name)
        .parameter_in(location)
        .required(required)
        .schema(Some(ObjectBuilder::new().schema_type(Type::Integer)))
        .build()
}

fn build_operation(doc: &ResourceDoc, spec: &RouteSpec) -> ApiOperation {
    let tags: Vec<String> = doc.tags.iter().cloned().collect();
    let mut op = OperationBuilder::new()
        .tags(Some(tags))
        .summary(Some(spec.operation.summary()))
        .operation_id(Some(operation_id(&doc.prefix, spec)))
        .response("200", ResponseBuilder::new().description("Successful Response").build());
    if spec.operation.is_member() {
        op = op
            .parameter(integer_parameter("id", ParameterIn::Path, Required::True))
            .response("404", ResponseBuilder::new().description("Item not found").build());
    }
    if spec.operation == Operation::List {
        for name in ["skip", "limit", "page"] {
            op = op.parameter(integer_parameter(name, ParameterIn::Query, Required::False));
        }
    }
    if spec.operation.has_body() {
        op = op.request_body(Some(
            RequestBodyBuilder::new()
                .description(Some("JSON object"))
                .required(Some(Required::True))
                .build(),
        ));
    }
    if spec.operation != Operation::DeleteAll {
        op = op.response("422", ResponseBuilder::new().description("Validation Error").build());
    }
    op.build()
}

fn set_operation(item: &mut PathItem, method: HttpMethod, op: ApiOperation) {
    match method {
        HttpMethod::Get => item.get = Some(op),
        HttpMethod::Post => item.post = Some(op),
        HttpMethod::Put => item.put = Some(op),
        HttpMethod::Patch => item.patch = Some(op),
        HttpMethod::Delete => item.delete = Some(op),
        _ => {}
    }
}

/// Build the document for every resource in `docs`.
pub fn build_openapi(title: &str, version: &str, docs: &[ResourceDoc]) -> OpenApi {
    let mut items: BTreeMap<String, PathItem> = BTreeMap::new();
    let mut tag_names = BTreeSet::new();
    for doc in docs {
        tag_names.extend(doc.tags.iter().cloned());
        for spec in route_specs(&doc.prefix) {
            let Some(method) = http_method(&spec.method) else { continue };
            let op = build_operation(doc, &spec);
            match items.get_mut(&spec.path) {
                Some(item) => set_operation(item, method, op),
                None => {
                    items.insert(spec.path.clone(), PathItem::new(method, op));
                }
            }
        }
    }
    let paths = items
        .into_iter()
        .fold(PathsBuilder::new(), |paths, (path, item)| paths.path(path, item));
    let tags: Vec<_> = tag_names
        .into_iter()
        .map(|name| TagBuilder::new().name(name).build())
        .collect();
    OpenApiBuilder::new()
        .info(InfoBuilder::new().title(title).version(version).build())
        .paths(paths.build())
        .tags(Some(tags))
        .build()
}
