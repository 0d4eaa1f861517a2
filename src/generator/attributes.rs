use crate::spec::{ObjectShape, SchemaNode};
use serde::ser::{Serialize, Serializer};

/// Scalar types that map straight onto a dry-validation predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    Uuid,
    Integer,
}

impl Primitive {
    pub fn as_str(&self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Uuid => "uuid",
            Primitive::Integer => "integer",
        }
    }
}

/// What an attribute holds.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeKind {
    Primitive(Primitive),
    /// Named component; rendered as a reference, never expanded
    Reference(String),
    /// List of the element kind
    Array(Box<AttributeKind>),
    Object,
    /// Outside the supported subset; rendered without a type
    Untyped,
}

impl AttributeKind {
    /// Short tag used by templates to pick a rendering branch.
    pub fn tag(&self) -> &'static str {
        match self {
            AttributeKind::Primitive(_) => "primitive",
            AttributeKind::Reference(_) => "reference",
            AttributeKind::Array(_) => "array",
            AttributeKind::Object => "object",
            AttributeKind::Untyped => "untyped",
        }
    }

    /// Type name shown in templates: the primitive name, the referenced
    /// component, `hash` for objects, or empty when untyped.
    pub fn type_name(&self) -> String {
        match self {
            AttributeKind::Primitive(p) => p.as_str().to_string(),
            AttributeKind::Reference(name) => name.clone(),
            AttributeKind::Array(element) => element.type_name(),
            AttributeKind::Object => "hash".to_string(),
            AttributeKind::Untyped => String::new(),
        }
    }
}

/// A node of the attribute tree derived from a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Property key; empty for array elements
    pub name: String,
    pub kind: AttributeKind,
    pub required: bool,
    /// Sorted by name
    pub children: Vec<Attribute>,
}

impl Attribute {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

#[derive(serde::Serialize)]
struct AttributeRepr<'a> {
    name: &'a str,
    required: bool,
    kind: &'static str,
    element_kind: Option<&'static str>,
    #[serde(rename = "type")]
    type_name: String,
    has_children: bool,
    children: &'a [Attribute],
}

impl Serialize for Attribute {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let element_kind = match &self.kind {
            AttributeKind::Array(element) => Some(element.tag()),
            _ => None,
        };
        AttributeRepr {
            name: &self.name,
            required: self.required,
            kind: self.kind.tag(),
            element_kind,
            type_name: self.kind.type_name(),
            has_children: self.has_children(),
            children: &self.children,
        }
        .serialize(serializer)
    }
}

/// Attributes for every property of an object node, sorted by key.
///
/// Non-object nodes have no properties and yield an empty list.
pub fn build_attributes(node: &SchemaNode) -> Vec<Attribute> {
    match node {
        SchemaNode::Object(shape) => build_object_attributes(shape),
        _ => Vec::new(),
    }
}

fn build_object_attributes(shape: &ObjectShape) -> Vec<Attribute> {
    let mut keys: Vec<&String> = shape.properties.keys().collect();
    keys.sort();
    keys.into_iter()
        .filter_map(|key| {
            let prop = shape.properties.get(key)?;
            Some(build_attribute(key, prop, shape.required.contains(key)))
        })
        .collect()
}

/// Build one attribute. References stay leaves; arrays take on their
/// element's children and record its kind.
pub fn build_attribute(key: &str, node: &SchemaNode, required: bool) -> Attribute {
    let (kind, children) = match node {
        SchemaNode::Reference(name) => (AttributeKind::Reference(name.clone()), Vec::new()),
        SchemaNode::String { format } if format.as_deref() == Some("uuid") => {
            (AttributeKind::Primitive(Primitive::Uuid), Vec::new())
        }
        SchemaNode::String { .. } => (AttributeKind::Primitive(Primitive::String), Vec::new()),
        SchemaNode::Integer => (AttributeKind::Primitive(Primitive::Integer), Vec::new()),
        SchemaNode::Array(items) => {
            let element = build_attribute("", items, false);
            (AttributeKind::Array(Box::new(element.kind)), element.children)
        }
        SchemaNode::Object(shape) => (AttributeKind::Object, build_object_attributes(shape)),
        SchemaNode::Unsupported(_) => (AttributeKind::Untyped, Vec::new()),
    };
    Attribute {
        name: key.to_string(),
        kind,
        required,
        children,
    }
}
