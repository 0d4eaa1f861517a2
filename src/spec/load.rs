use super::types::{reference_name, SchemaNode};
use crate::error::GenerateError;
use http::Method;
use oas3::spec::{ObjectOrReference, ObjectSchema};
use oas3::OpenApiV3Spec;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::info;

const METHODS: [&str; 8] = ["get", "post", "put", "delete", "patch", "options", "head", "trace"];

/// Operation members written as an explicit `null` in the source document.
///
/// Typed parsing either drops these silently or rejects the whole document,
/// so they are removed from the raw value and remembered here instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NullMembers {
    pub request_body: bool,
    /// Response status codes whose value is `null`
    pub responses: Vec<String>,
}

/// A parsed OpenAPI document plus what typed parsing loses: the order in
/// which paths and methods were declared, explicit `null` members, and the
/// component schemas lowered to [`SchemaNode`]s.
#[derive(Debug, Clone)]
pub struct SchemaGraph {
    pub spec: OpenApiV3Spec,
    declared: Vec<(String, Vec<Method>)>,
    nulls: HashMap<(String, Method), NullMembers>,
    components: BTreeMap<String, SchemaNode>,
}

impl SchemaGraph {
    /// Build the graph from a raw document value.
    ///
    /// The value must come from a `preserve_order` map so that
    /// [`SchemaGraph::declared_order`] reflects the source document.
    pub fn from_value(mut value: Value) -> Result<SchemaGraph, String> {
        strip_unknown_verbs(&mut value);
        let declared = declared_order(&value);
        let nulls = take_null_members(&mut value);
        let spec: OpenApiV3Spec = serde_json::from_value(value).map_err(|e| e.to_string())?;

        let components = spec
            .components
            .as_ref()
            .map(|components| {
                components
                    .schemas
                    .iter()
                    .map(|(name, schema)| (name.clone(), lower_schema(schema)))
                    .collect()
            })
            .unwrap_or_default();

        Ok(SchemaGraph {
            spec,
            declared,
            nulls,
            components,
        })
    }

    /// Paths with their methods, in document order.
    pub fn declared_order(&self) -> &[(String, Vec<Method>)] {
        &self.declared
    }

    /// Component schemas keyed (and therefore sorted) by name.
    pub fn component_schemas(&self) -> &BTreeMap<String, SchemaNode> {
        &self.components
    }

    /// Members of `method path` that were declared as `null`, if any.
    pub fn null_members(&self, path: &str, method: &Method) -> Option<&NullMembers> {
        self.nulls.get(&(path.to_string(), method.clone()))
    }

    pub fn component(&self, name: &str) -> Option<&SchemaNode> {
        self.components.get(name)
    }

    /// Follow a root-level reference to the component it names.
    ///
    /// Alias chains (`A: {$ref: B}`) are followed, bounded by the number of
    /// components. Returns `None` if a name does not resolve or the chain
    /// loops. Non-reference nodes are returned unchanged.
    pub fn resolve_root<'a>(&'a self, node: &'a SchemaNode) -> Option<&'a SchemaNode> {
        let mut current = node;
        for _ in 0..=self.components.len() {
            match current.reference() {
                Some(name) => current = self.components.get(name)?,
                None => return Some(current),
            }
        }
        None
    }

}

/// Lower a typed schema (or `$ref`) through its JSON form.
pub(crate) fn lower_schema(schema: &ObjectOrReference<ObjectSchema>) -> SchemaNode {
    match schema {
        ObjectOrReference::Ref { ref_path, .. } => {
            SchemaNode::Reference(reference_name(ref_path).to_string())
        }
        ObjectOrReference::Object(_) => serde_json::to_value(schema)
            .map(|value| SchemaNode::from_value(&value))
            .unwrap_or(SchemaNode::Unsupported(None)),
    }
}

/// Drop path-item keys that are neither HTTP methods nor known path-item
/// fields so typed parsing does not trip over them.
fn strip_unknown_verbs(val: &mut Value) {
    let Some(Value::Object(paths)) = val.get_mut("paths") else {
        return;
    };
    for item in paths.values_mut() {
        if let Value::Object(obj) = item {
            obj.retain(|k, _| {
                let lk = k.to_ascii_lowercase();
                match lk.as_str() {
                    "summary" | "description" | "servers" | "parameters" | "$ref" => true,
                    m if METHODS.contains(&m) => true,
                    _ => k.starts_with("x-"),
                }
            });
        }
    }
}

/// Remove `requestBody: null` and `responses.<status>: null` from every
/// operation, returning what was removed keyed by path and method.
fn take_null_members(val: &mut Value) -> HashMap<(String, Method), NullMembers> {
    let mut nulls = HashMap::new();
    let Some(Value::Object(paths)) = val.get_mut("paths") else {
        return nulls;
    };
    for (path, item) in paths.iter_mut() {
        let Value::Object(item) = item else {
            continue;
        };
        for (key, operation) in item.iter_mut() {
            if !METHODS.contains(&key.to_ascii_lowercase().as_str()) {
                continue;
            }
            let Value::Object(operation) = operation else {
                continue;
            };
            let mut members = NullMembers::default();
            if operation.get("requestBody").is_some_and(Value::is_null) {
                operation.remove("requestBody");
                members.request_body = true;
            }
            if let Some(Value::Object(responses)) = operation.get_mut("responses") {
                members.responses = responses
                    .iter()
                    .filter(|(_, response)| response.is_null())
                    .map(|(status, _)| status.clone())
                    .collect();
                responses.retain(|_, response| !response.is_null());
            }
            if members == NullMembers::default() {
                continue;
            }
            if let Ok(method) = Method::from_bytes(key.to_ascii_uppercase().as_bytes()) {
                nulls.insert((path.clone(), method), members);
            }
        }
    }
    nulls
}

fn declared_order(val: &Value) -> Vec<(String, Vec<Method>)> {
    let Some(paths) = val.get("paths").and_then(Value::as_object) else {
        return Vec::new();
    };
    paths
        .iter()
        .map(|(path, item)| {
            let methods = item
                .as_object()
                .map(|obj| {
                    obj.keys()
                        .filter(|k| METHODS.contains(&k.to_ascii_lowercase().as_str()))
                        .filter_map(|k| Method::from_bytes(k.to_ascii_uppercase().as_bytes()).ok())
                        .collect()
                })
                .unwrap_or_default();
            (path.clone(), methods)
        })
        .collect()
}

/// Parse document text. YAML is used unless the file name ends in `.json`.
pub fn parse_spec(content: &str, file_name: &str) -> Result<SchemaGraph, String> {
    let value: Value = if file_name.ends_with(".json") {
        serde_json::from_str(content).map_err(|e| e.to_string())?
    } else {
        serde_yaml::from_str(content).map_err(|e| e.to_string())?
    };
    SchemaGraph::from_value(value)
}

/// Read and parse an OpenAPI document from disk.
pub fn load_spec(path: &Path) -> Result<SchemaGraph, GenerateError> {
    let load_error = |message: String| GenerateError::Load {
        path: path.to_path_buf(),
        message,
    };
    let content = std::fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
    let file_name = path.to_string_lossy();
    let graph = parse_spec(&content, &file_name).map_err(load_error)?;

    info!(
        spec = %path.display(),
        title = %graph.spec.info.title,
        paths = graph.declared.len(),
        components = graph.components.len(),
        "Loaded OpenAPI document"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(paths: Value) -> Value {
        json!({
            "openapi": "3.1.0",
            "info": { "title": "Pet Store", "version": "1.0.0" },
            "paths": paths,
            "components": {
                "schemas": {
                    "Pet": { "type": "object", "properties": { "name": { "type": "string" } } },
                    "PetAlias": { "$ref": "#/components/schemas/Pet" },
                    "Loop": { "$ref": "#/components/schemas/Loop" }
                }
            }
        })
    }

    #[test]
    fn test_strip_unknown_verbs() {
        let mut v = json!({
            "paths": {
                "/x": { "get": {}, "patch": {}, "unknown": {}, "x-internal": true }
            }
        });
        strip_unknown_verbs(&mut v);
        assert!(v["paths"]["/x"].get("unknown").is_none());
        assert!(v["paths"]["/x"].get("x-internal").is_some());
    }

    #[test]
    fn test_declared_order_follows_document() {
        let graph = SchemaGraph::from_value(doc(json!({
            "/zebras": { "post": { "responses": {} }, "get": { "responses": {} } },
            "/apples": { "get": { "responses": {} } }
        })))
        .unwrap();
        let order = graph.declared_order();
        assert_eq!(order[0].0, "/zebras");
        assert_eq!(order[0].1, vec![Method::POST, Method::GET]);
        assert_eq!(order[1].0, "/apples");
    }

    #[test]
    fn test_components_are_lowered_and_sorted() {
        let graph = SchemaGraph::from_value(doc(json!({}))).unwrap();
        let names: Vec<&String> = graph.component_schemas().keys().collect();
        assert_eq!(names, vec!["Loop", "Pet", "PetAlias"]);
        assert!(matches!(graph.component("Pet"), Some(SchemaNode::Object(_))));
    }

    #[test]
    fn test_resolve_root_follows_aliases() {
        let graph = SchemaGraph::from_value(doc(json!({}))).unwrap();
        let alias = SchemaNode::Reference("PetAlias".to_string());
        assert!(matches!(graph.resolve_root(&alias), Some(SchemaNode::Object(_))));

        let looping = SchemaNode::Reference("Loop".to_string());
        assert!(graph.resolve_root(&looping).is_none());

        let missing = SchemaNode::Reference("Nope".to_string());
        assert!(graph.resolve_root(&missing).is_none());
    }

    #[test]
    fn test_null_members_are_recorded_and_removed() {
        let graph = SchemaGraph::from_value(doc(json!({
            "/pets": {
                "post": {
                    "requestBody": null,
                    "responses": { "200": null, "404": { "description": "missing" } }
                },
                "get": { "responses": {} }
            }
        })))
        .unwrap();

        let members = graph.null_members("/pets", &Method::POST).unwrap();
        assert!(members.request_body);
        assert_eq!(members.responses, vec!["200".to_string()]);
        assert!(graph.null_members("/pets", &Method::GET).is_none());
    }
}
