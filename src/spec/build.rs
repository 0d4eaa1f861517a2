use super::load::{lower_schema, NullMembers, SchemaGraph};
use super::types::{operation_location, Operation, Parameter, ParameterLocation, SchemaNode};
use crate::error::SpecError;
use http::Method;
use oas3::spec::{MediaType, ObjectOrReference, ParameterIn, RequestBody, Response};
use tracing::{debug, info};

/// Status codes accepted as the success response, in order of preference.
pub const SUCCESS_STATUSES: [&str; 2] = ["200", "201"];

/// Rank a media type as JSON: `application/json` first, then
/// `application/json` with parameters, then `+json` suffixes.
fn json_rank(media_type: &str) -> Option<u8> {
    let lowered = media_type.trim().to_ascii_lowercase();
    let (essence, has_params) = match lowered.split_once(';') {
        Some((essence, _)) => (essence.trim(), true),
        None => (lowered.as_str(), false),
    };
    match essence {
        "application/json" if !has_params => Some(0),
        "application/json" => Some(1),
        e if e.starts_with("application/") && e.ends_with("+json") => Some(2),
        _ => None,
    }
}

/// Pick the JSON media type entry out of a content map.
pub fn json_media<'a, I>(content: I) -> Option<&'a MediaType>
where
    I: IntoIterator<Item = (&'a String, &'a MediaType)>,
{
    content
        .into_iter()
        .filter_map(|(mt, media)| json_rank(mt).map(|rank| (rank, media)))
        .min_by_key(|(rank, _)| *rank)
        .map(|(_, media)| media)
}

fn component_name<'r>(ref_path: &'r str, section: &str) -> Option<&'r str> {
    ref_path.strip_prefix(&format!("#/components/{section}/"))
}

fn resolve_request_body<'a>(
    graph: &'a SchemaGraph,
    body: &'a ObjectOrReference<RequestBody>,
) -> Option<&'a RequestBody> {
    match body {
        ObjectOrReference::Object(body) => Some(body),
        ObjectOrReference::Ref { ref_path, .. } => {
            let name = component_name(ref_path, "requestBodies")?;
            match graph.spec.components.as_ref()?.request_bodies.get(name)? {
                ObjectOrReference::Object(body) => Some(body),
                ObjectOrReference::Ref { .. } => None,
            }
        }
    }
}

fn resolve_response<'a>(
    graph: &'a SchemaGraph,
    response: &'a ObjectOrReference<Response>,
) -> Option<&'a Response> {
    match response {
        ObjectOrReference::Object(response) => Some(response),
        ObjectOrReference::Ref { ref_path, .. } => {
            let name = component_name(ref_path, "responses")?;
            match graph.spec.components.as_ref()?.responses.get(name)? {
                ObjectOrReference::Object(response) => Some(response),
                ObjectOrReference::Ref { .. } => None,
            }
        }
    }
}

fn resolve_parameter<'a>(
    graph: &'a SchemaGraph,
    param: &'a ObjectOrReference<oas3::spec::Parameter>,
) -> Option<&'a oas3::spec::Parameter> {
    match param {
        ObjectOrReference::Object(param) => Some(param),
        ObjectOrReference::Ref { ref_path, .. } => {
            let name = component_name(ref_path, "parameters")?;
            match graph.spec.components.as_ref()?.parameters.get(name)? {
                ObjectOrReference::Object(param) => Some(param),
                ObjectOrReference::Ref { .. } => None,
            }
        }
    }
}

/// Lower a body schema and, if it is a component reference, resolve it so the
/// contract lists the component's own properties.
fn body_schema(
    graph: &SchemaGraph,
    media: &MediaType,
    location: &str,
    what: &str,
) -> Result<SchemaNode, SpecError> {
    let schema = media.schema.as_ref().ok_or_else(|| SpecError::MalformedSpec {
        location: location.to_string(),
        detail: format!("{what} media type declares no schema"),
    })?;
    let node = lower_schema(schema);
    graph
        .resolve_root(&node)
        .cloned()
        .ok_or_else(|| SpecError::MalformedSpec {
            location: location.to_string(),
            detail: format!(
                "{what} schema reference `{}` does not resolve",
                node.reference().unwrap_or_default()
            ),
        })
}

fn extract_request_body(
    graph: &SchemaGraph,
    operation: &oas3::spec::Operation,
    nulls: Option<&NullMembers>,
    location: &str,
) -> Result<Option<SchemaNode>, SpecError> {
    if nulls.is_some_and(|nulls| nulls.request_body) {
        return Err(SpecError::MalformedSpec {
            location: location.to_string(),
            detail: "request body is null".to_string(),
        });
    }
    let Some(body_ref) = operation.request_body.as_ref() else {
        return Ok(None);
    };
    let body = resolve_request_body(graph, body_ref).ok_or_else(|| SpecError::MalformedSpec {
        location: location.to_string(),
        detail: "request body reference does not resolve".to_string(),
    })?;
    let media = json_media(&body.content).ok_or_else(|| SpecError::NoRequestBodyJsonMediaType {
        location: location.to_string(),
    })?;
    body_schema(graph, media, location, "request body").map(Some)
}

fn extract_success_response(
    graph: &SchemaGraph,
    operation: &oas3::spec::Operation,
    nulls: Option<&NullMembers>,
    location: &str,
) -> Result<SchemaNode, SpecError> {
    let null_statuses = nulls.map(|nulls| nulls.responses.as_slice()).unwrap_or_default();
    let mut found = None;
    for status in SUCCESS_STATUSES {
        if null_statuses.iter().any(|s| s == status) {
            return Err(SpecError::MalformedSpec {
                location: location.to_string(),
                detail: format!("{status} response is null"),
            });
        }
        if let Some(response) = operation.responses.as_ref().and_then(|r| r.get(status)) {
            found = Some((status, response));
            break;
        }
    }
    let (status, response_ref) = found.ok_or_else(|| SpecError::SuccessResponseMissing {
        location: location.to_string(),
    })?;

    let response = resolve_response(graph, response_ref).ok_or_else(|| SpecError::MalformedSpec {
        location: location.to_string(),
        detail: format!("{status} response reference does not resolve"),
    })?;
    let media =
        json_media(&response.content).ok_or_else(|| SpecError::SuccessResponseNoJsonMediaType {
            location: location.to_string(),
            status: status.to_string(),
        })?;
    body_schema(graph, media, location, &format!("{status} response"))
}

/// Collect path and query parameters.
///
/// Operation-level parameters replace a path-item parameter with the same
/// name and location in place; new ones are appended. Path parameters are
/// always required.
pub fn extract_parameters(
    graph: &SchemaGraph,
    path_level: &[ObjectOrReference<oas3::spec::Parameter>],
    operation_level: &[ObjectOrReference<oas3::spec::Parameter>],
    location: &str,
) -> Result<Vec<Parameter>, SpecError> {
    let mut out: Vec<Parameter> = Vec::new();
    for param_ref in path_level.iter().chain(operation_level) {
        let Some(param) = resolve_parameter(graph, param_ref) else {
            let ref_path = match param_ref {
                ObjectOrReference::Ref { ref_path, .. } => ref_path.as_str(),
                ObjectOrReference::Object(param) => param.name.as_str(),
            };
            return Err(SpecError::MalformedSpec {
                location: location.to_string(),
                detail: format!("parameter reference `{ref_path}` does not resolve"),
            });
        };
        let param_location = match param.location {
            ParameterIn::Path => ParameterLocation::Path,
            ParameterIn::Query => ParameterLocation::Query,
            _ => continue,
        };
        let parameter = Parameter {
            name: param.name.clone(),
            location: param_location,
            required: param_location == ParameterLocation::Path
                || param.required.unwrap_or(false),
            schema: param
                .schema
                .as_ref()
                .map(lower_schema)
                .unwrap_or(SchemaNode::Unsupported(None)),
        };

        match out
            .iter_mut()
            .find(|p| p.name == parameter.name && p.location == parameter.location)
        {
            Some(existing) => *existing = parameter,
            None => out.push(parameter),
        }
    }
    Ok(out)
}

fn extract_operation(
    graph: &SchemaGraph,
    path: &str,
    method: &Method,
    item: &oas3::spec::PathItem,
    operation: &oas3::spec::Operation,
) -> Result<Operation, SpecError> {
    let location = operation_location(method, path);
    let nulls = graph.null_members(path, method);

    let module_name = operation
        .tags
        .first()
        .filter(|tag| !tag.trim().is_empty())
        .cloned()
        .ok_or_else(|| SpecError::MissingTags {
            location: location.clone(),
        })?;
    let operation_id = operation
        .operation_id
        .as_ref()
        .filter(|id| !id.trim().is_empty())
        .cloned()
        .ok_or_else(|| SpecError::MissingOperationId {
            location: location.clone(),
        })?;

    let request_body_schema = extract_request_body(graph, operation, nulls, &location)?;
    let success_response_schema = extract_success_response(graph, operation, nulls, &location)?;
    let parameters = extract_parameters(graph, &item.parameters, &operation.parameters, &location)?;

    debug!(
        location = %location,
        module = %module_name,
        operation_id = %operation_id,
        parameters = parameters.len(),
        has_body = request_body_schema.is_some(),
        "Extracted operation"
    );

    Ok(Operation {
        method: method.clone(),
        path: path.to_string(),
        module_name,
        operation_id,
        request_body_schema,
        success_response_schema,
        parameters,
    })
}

/// Walk every path and method in declaration order and extract an
/// [`Operation`] for each, failing on the first structural defect.
pub fn extract_operations(graph: &SchemaGraph) -> Result<Vec<Operation>, SpecError> {
    let mut operations = Vec::new();
    let Some(paths) = graph.spec.paths.as_ref() else {
        info!("Document declares no paths");
        return Ok(operations);
    };

    for (path, methods) in graph.declared_order() {
        let Some(item) = paths.get(path) else {
            continue;
        };
        let item_methods: Vec<_> = item.methods().into_iter().collect();
        for method in methods {
            let Some((_, operation)) = item_methods.iter().find(|(m, _)| *m == *method) else {
                return Err(SpecError::MalformedSpec {
                    location: operation_location(method, path),
                    detail: "method keys must be lowercase".to_string(),
                });
            };
            operations.push(extract_operation(graph, path, method, item, operation)?);
        }
    }

    info!(operations = operations.len(), "Extracted operations");
    Ok(operations)
}
