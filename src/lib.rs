//! A synchronous OpenAPI/Swagger `$ref` resolver and expander: the reference graph engine that
//! turns a document full of `$ref`s into one where every reachable schema/parameter/response/path
//! item has been inlined (or, in `skip_schemas` mode, merely rebased) in place.
//!
//! The typed OpenAPI/Swagger object graph itself ([`model`]) is this crate's own minimal surface
//! for the keywords the engine actually walks. Callers with a richer object model can round-trip
//! through [`serde_json::Value`] at the boundary.

pub mod cache;
pub mod config;
pub mod context;
pub mod document_expander;
pub mod error;
pub mod loader;
pub mod model;
pub mod resolver;
pub mod schema_expander;
pub mod uri;

pub use cache::ResolutionCache;
pub use config::ExpandOptions;
pub use error::{RefExpanderError, Result};
pub use loader::{default_loader, Loader};

pub use document_expander::{
    expand_parameter, expand_parameter_with_root, expand_response, expand_response_with_root,
    expand_schema, expand_schema_with_base_path, expand_spec,
};
pub use resolver::{
    resolve_items, resolve_parameter, resolve_path_item, resolve_ref, resolve_ref_with_base,
    resolve_response,
};
