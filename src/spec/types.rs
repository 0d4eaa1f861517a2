use http::Method;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Where a request parameter travels. Only path and query parameters end up
/// in request contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocation {
    Path,
    Query,
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterLocation::Path => write!(f, "path"),
            ParameterLocation::Query => write!(f, "query"),
        }
    }
}

/// A path or query parameter of an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub schema: SchemaNode,
}

/// One HTTP method + path combination with its request/response shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub method: Method,
    /// Path as declared in the schema, e.g. `/books/{bookId}`
    pub path: String,
    /// First declared tag
    pub module_name: String,
    pub operation_id: String,
    pub request_body_schema: Option<SchemaNode>,
    pub success_response_schema: SchemaNode,
    /// Path-item parameters first, then operation parameters, in declaration order
    pub parameters: Vec<Parameter>,
}

/// `METHOD /path`, used to locate errors and log lines.
pub fn operation_location(method: &Method, path: &str) -> String {
    format!("{method} {path}")
}

/// Properties of an object schema.
///
/// The property map carries no ordering guarantee; consumers sort keys
/// before producing anything order-sensitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectShape {
    pub properties: HashMap<String, SchemaNode>,
    pub required: HashSet<String>,
}

/// A schema node lowered out of the parsed document.
///
/// `Reference` is terminal: it only names the component it points to, so
/// walking a `SchemaNode` can never follow a `$ref` cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// `$ref` to a named component (the last segment of the ref path)
    Reference(String),
    String { format: Option<String> },
    Integer,
    Array(Box<SchemaNode>),
    Object(ObjectShape),
    /// Anything outside the supported subset, with its declared type if any
    Unsupported(Option<String>),
}

impl SchemaNode {
    /// Lower a JSON schema value.
    ///
    /// `$ref` wins over every other keyword. `type` may be a string or a list
    /// of strings (OpenAPI 3.1), in which case the first non-`null` entry is
    /// used. A node with `properties` but no `type` is an object.
    pub fn from_value(value: &Value) -> SchemaNode {
        if let Some(ref_path) = value.get("$ref").and_then(Value::as_str) {
            return SchemaNode::Reference(reference_name(ref_path).to_string());
        }

        match declared_type(value) {
            Some("string") => SchemaNode::String {
                format: value
                    .get("format")
                    .and_then(Value::as_str)
                    .map(String::from),
            },
            Some("integer") => SchemaNode::Integer,
            Some("array") => SchemaNode::Array(Box::new(
                value
                    .get("items")
                    .map(SchemaNode::from_value)
                    .unwrap_or(SchemaNode::Unsupported(None)),
            )),
            Some("object") => SchemaNode::Object(ObjectShape::from_value(value)),
            None if value.get("properties").is_some() => {
                SchemaNode::Object(ObjectShape::from_value(value))
            }
            other => SchemaNode::Unsupported(other.map(String::from)),
        }
    }

    /// The component name if this node is a reference.
    pub fn reference(&self) -> Option<&str> {
        match self {
            SchemaNode::Reference(name) => Some(name),
            _ => None,
        }
    }
}

impl ObjectShape {
    fn from_value(value: &Value) -> ObjectShape {
        let properties = value
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .iter()
                    .map(|(key, prop)| (key.clone(), SchemaNode::from_value(prop)))
                    .collect()
            })
            .unwrap_or_default();
        let required = value
            .get("required")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        ObjectShape {
            properties,
            required,
        }
    }
}

fn declared_type(value: &Value) -> Option<&str> {
    match value.get("type") {
        Some(Value::String(ty)) => Some(ty.as_str()),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|ty| *ty != "null"),
        _ => None,
    }
}

/// Component name of a `$ref` path: `#/components/schemas/Pet` → `Pet`.
pub fn reference_name(ref_path: &str) -> &str {
    ref_path.rsplit('/').next().unwrap_or(ref_path)
}
