//! The OpenAPI/Swagger typed object graph the engine mutates in place.
//!
//! A minimal typed tree covering exactly the keyword surface the reference graph engine needs to
//! walk: the Swagger 2.0 / JSON-Schema-draft-04 composition keywords (`allOf`/`definitions`/
//! `patternProperties`/`dependencies`/`additionalItems`/...) plus the OpenAPI 3
//! `content[mediaType].schema` shape. Every node that can carry a `$ref` exposes it as a plain
//! `Option<String>` field directly on the node, rather than through an external
//! `ReferenceOr<T>` wrapper.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

fn is_false(b: &bool) -> bool {
    !*b
}

/// A JSON Schema / Swagger 2.0 schema node.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Schema {
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub ref_: Option<String>,

    #[serde(
        rename = "id",
        alias = "$id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definitions: Option<BTreeMap<String, Schema>>,
    #[serde(rename = "$defs", default, skip_serializing_if = "Option::is_none")]
    pub defs: Option<BTreeMap<String, Schema>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<SchemaOrArray>,
    #[serde(rename = "additionalItems", default, skip_serializing_if = "Option::is_none")]
    pub additional_items: Option<SchemaOrBool>,

    #[serde(rename = "allOf", default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<Schema>,
    #[serde(rename = "anyOf", default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<Schema>,
    #[serde(rename = "oneOf", default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<Schema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<Schema>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Schema>>,
    #[serde(rename = "additionalProperties", default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<SchemaOrBool>,
    #[serde(rename = "patternProperties", default, skip_serializing_if = "Option::is_none")]
    pub pattern_properties: Option<BTreeMap<String, Schema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<BTreeMap<String, DependencyValue>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub read_only: bool,

    /// Any keyword not modeled above (`example`, numeric bounds, `xml`, vendor `x-*`
    /// extensions, ...) round-trips through here untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `items` may be a single schema or a tuple of schemas (positional array items).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrArray {
    Single(Box<Schema>),
    Many(Vec<Schema>),
}

/// `additionalProperties` / `additionalItems` may be a schema or a bare boolean.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrBool {
    Bool(bool),
    Schema(Box<Schema>),
}

/// `dependencies[k]` may be a schema or a list of required-property names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencyValue {
    Schema(Box<Schema>),
    Properties(Vec<String>),
}

/// Swagger 2.0 non-body parameter/header array item descriptor. OpenAPI 3 folds this into
/// `Schema`'s own `items`; Swagger 2.0 keeps it as a distinct, `$ref`-bearing node kind.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Items {
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub ref_: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Items>>,
    #[serde(rename = "collectionFormat", default, skip_serializing_if = "Option::is_none")]
    pub collection_format: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A parameter: Swagger 2.0 body/non-body parameter, or an OpenAPI 3 parameter.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Parameter {
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub ref_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub in_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    /// Swagger 2.0 body parameter schema, or OpenAPI 3 `schema`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    /// OpenAPI 3 `content[mediaType].schema` alternative to `schema`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<BTreeMap<String, MediaType>>,
    /// Swagger 2.0 non-body parameter array item descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A response object (Swagger 2.0 or OpenAPI 3 shape).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Response {
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub ref_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Swagger 2.0 response schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    /// OpenAPI 3 `content` map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<BTreeMap<String, MediaType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, Header>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A header object: either a Swagger 2.0 typed header or an OpenAPI 3 `schema`-bearing one.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Header {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// OpenAPI 3 media type object: `content[mediaType]`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MediaType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// OpenAPI 3 request body object.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RequestBody {
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub ref_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<BTreeMap<String, MediaType>>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single operation (`get`/`post`/.../ under a path item).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Operation {
    #[serde(rename = "operationId", default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(rename = "requestBody", default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    #[serde(default)]
    pub responses: BTreeMap<String, Response>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A path item, possibly itself a `$ref` to a shared path item.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathItem {
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub ref_: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PathItem {
    /// The operations in the stable order the document expander walks them in.
    pub fn operations_mut(&mut self) -> impl Iterator<Item = &mut Operation> {
        [
            &mut self.get,
            &mut self.put,
            &mut self.post,
            &mut self.delete,
            &mut self.options,
            &mut self.head,
            &mut self.patch,
        ]
        .into_iter()
        .flatten()
    }
}

/// `components` (OpenAPI 3). The Swagger 2.0 equivalents (`definitions`, top-level
/// `parameters`/`responses`) live directly on [`Document`].
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Components {
    #[serde(default)]
    pub schemas: BTreeMap<String, Schema>,
    #[serde(default)]
    pub parameters: BTreeMap<String, Parameter>,
    #[serde(default)]
    pub responses: BTreeMap<String, Response>,
    #[serde(rename = "requestBodies", default)]
    pub request_bodies: BTreeMap<String, RequestBody>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The top-level OpenAPI/Swagger document.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swagger: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openapi: Option<String>,
    #[serde(default)]
    pub definitions: BTreeMap<String, Schema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
    #[serde(default)]
    pub parameters: BTreeMap<String, Parameter>,
    #[serde(default)]
    pub responses: BTreeMap<String, Response>,
    #[serde(default)]
    pub paths: BTreeMap<String, PathItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A node kind that can carry a `$ref`. Gives the expanders a single, type-checked way to set
/// the rewritten ref string on whichever node kind they're holding, instead of matching on a
/// `RefTarget` by hand at every call site.
pub trait RefNode {
    fn ref_mut(&mut self) -> Option<&mut Option<String>>;

    /// The `Schema` this node carries, if any. `Some(self)` for `Schema` itself; for nodes that
    /// hold a schema under a named field (`Parameter`/`Response`), that field; `None` for node
    /// kinds with no single schema slot (`PathItem`, `RequestBody`, `Items`).
    fn schema_mut(&mut self) -> Option<&mut Schema> {
        None
    }
}

impl RefNode for Schema {
    fn ref_mut(&mut self) -> Option<&mut Option<String>> {
        Some(&mut self.ref_)
    }

    fn schema_mut(&mut self) -> Option<&mut Schema> {
        Some(self)
    }
}

impl RefNode for Items {
    fn ref_mut(&mut self) -> Option<&mut Option<String>> {
        Some(&mut self.ref_)
    }
}

impl RefNode for Parameter {
    fn ref_mut(&mut self) -> Option<&mut Option<String>> {
        Some(&mut self.ref_)
    }

    fn schema_mut(&mut self) -> Option<&mut Schema> {
        self.schema.as_mut()
    }
}

impl RefNode for Response {
    fn ref_mut(&mut self) -> Option<&mut Option<String>> {
        Some(&mut self.ref_)
    }

    fn schema_mut(&mut self) -> Option<&mut Schema> {
        self.schema.as_mut()
    }
}

impl RefNode for PathItem {
    fn ref_mut(&mut self) -> Option<&mut Option<String>> {
        Some(&mut self.ref_)
    }
}

impl RefNode for RequestBody {
    fn ref_mut(&mut self) -> Option<&mut Option<String>> {
        Some(&mut self.ref_)
    }
}
