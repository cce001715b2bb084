//! Document Expander: drive expansion across Definitions/Components, Parameters, Responses,
//! Request Bodies, Paths, and Operations, plus the crate's public entry points.

use crate::cache::ResolutionCache;
use crate::config::ExpandOptions;
use crate::context::{ParentRefs, ResolverContext};
use crate::error::Result;
use crate::loader::{self, Loader};
use crate::model::{
    Document, Items, Operation, Parameter, PathItem, RefNode, RequestBody, Response, Schema,
};
use crate::resolver::{self, RefStep};
use crate::schema_expander::Expander as SchemaExpander;
use crate::uri;
use serde_json::Value;
use std::sync::Arc;

/// Bundles the schema expander plus the document-level walk that drives it across the
/// non-schema node kinds.
pub struct DocumentExpander<'a> {
    schema: SchemaExpander<'a>,
}

impl<'a> DocumentExpander<'a> {
    #[must_use]
    pub fn new(
        cache: &'a ResolutionCache,
        loader: &'a Loader,
        options: &'a ExpandOptions,
        in_memory_root: Option<&'a Arc<Value>>,
    ) -> Self {
        Self {
            schema: SchemaExpander::new(cache, loader, options, in_memory_root),
        }
    }

    /// `expand_spec(doc, options)`: walk definitions/components, parameters, responses, request
    /// bodies, then paths, in that stable order.
    pub fn expand_spec(&self, doc: &mut Document, ctx: &mut ResolverContext) -> Result<()> {
        let base = ctx.base_path.clone();
        let skip_schemas = self.schema.options.skip_schemas;

        if !skip_schemas {
            for (name, schema) in &mut doc.definitions {
                let path = format!("/definitions/{}", uri::json_pointer_escape(name));
                self.expand_root_schema(schema, ctx, &base, &path)?;
            }
            if let Some(components) = doc.components.as_mut() {
                for (name, schema) in &mut components.schemas {
                    let path = format!("/components/schemas/{}", uri::json_pointer_escape(name));
                    self.expand_root_schema(schema, ctx, &base, &path)?;
                }
            }
        }

        for (name, param) in &mut doc.parameters {
            let path = format!("/parameters/{}", uri::json_pointer_escape(name));
            let mut parent_refs = ParentRefs::new();
            self.expand_parameter(param, ctx, &mut parent_refs, &base, &path)?;
        }
        for (name, resp) in &mut doc.responses {
            let path = format!("/responses/{}", uri::json_pointer_escape(name));
            let mut parent_refs = ParentRefs::new();
            self.expand_response(resp, ctx, &mut parent_refs, &base, &path)?;
        }

        if let Some(components) = doc.components.as_mut() {
            for (name, param) in &mut components.parameters {
                let path = format!("/components/parameters/{}", uri::json_pointer_escape(name));
                let mut parent_refs = ParentRefs::new();
                self.expand_parameter(param, ctx, &mut parent_refs, &base, &path)?;
            }
            for (name, resp) in &mut components.responses {
                let path = format!("/components/responses/{}", uri::json_pointer_escape(name));
                let mut parent_refs = ParentRefs::new();
                self.expand_response(resp, ctx, &mut parent_refs, &base, &path)?;
            }
            for (name, body) in &mut components.request_bodies {
                let path = format!("/components/requestBodies/{}", uri::json_pointer_escape(name));
                let mut parent_refs = ParentRefs::new();
                self.expand_request_body(body, ctx, &mut parent_refs, &base, &path)?;
            }
        }

        for (route, item) in &mut doc.paths {
            let path = format!("/paths/{}", uri::json_pointer_escape(route));
            let mut parent_refs = ParentRefs::new();
            self.expand_path_item(item, ctx, &mut parent_refs, &base, &path)?;
        }

        Ok(())
    }

    fn expand_root_schema(
        &self,
        schema: &mut Schema,
        ctx: &mut ResolverContext,
        base: &str,
        path: &str,
    ) -> Result<()> {
        let mut parent_refs = ParentRefs::new();
        parent_refs.push(uri::normalize_uri(&format!("#{path}"), base));
        self.schema
            .expand_schema(schema, ctx, &mut parent_refs, base, path, 0, false)
    }

    /// `expand_path_item`: dereference a shared path item, then recurse into its parameters and
    /// every HTTP method operation.
    pub fn expand_path_item(
        &self,
        item: &mut PathItem,
        ctx: &mut ResolverContext,
        parent_refs: &mut ParentRefs,
        base: &str,
        path: &str,
    ) -> Result<()> {
        if let Some(reference) = item.ref_.take() {
            match resolver::step_ref::<PathItem>(
                &reference,
                base,
                parent_refs,
                ctx,
                self.schema.cache,
                self.schema.loader,
                self.schema.options,
                path,
                self.schema.in_memory_root,
            )? {
                RefStep::None => {}
                RefStep::Circular { abs } => {
                    *item.ref_mut().expect("PathItem always carries a ref field") =
                        Some(resolver::resolve_cycle_target(&abs, ctx, self.schema.options));
                    return Ok(());
                }
                RefStep::Resolved { target, new_base } => {
                    let abs = uri::normalize_uri(&reference, base);
                    parent_refs.push(abs);
                    *item = target;
                    return self.expand_path_item(item, ctx, parent_refs, &new_base, path);
                }
            }
        }

        for (i, param) in item.parameters.iter_mut().enumerate() {
            let param_path = format!("{path}/parameters/{i}");
            self.expand_parameter(param, ctx, parent_refs, base, &param_path)?;
        }

        for (name, op) in [
            ("get", item.get.as_mut()),
            ("put", item.put.as_mut()),
            ("post", item.post.as_mut()),
            ("delete", item.delete.as_mut()),
            ("options", item.options.as_mut()),
            ("head", item.head.as_mut()),
            ("patch", item.patch.as_mut()),
        ] {
            if let Some(op) = op {
                let op_path = format!("{path}/{name}");
                self.expand_operation(op, ctx, parent_refs, base, &op_path)?;
            }
        }

        Ok(())
    }

    /// `expand_operation`: parameters, request body, responses (default + status-coded).
    pub fn expand_operation(
        &self,
        op: &mut Operation,
        ctx: &mut ResolverContext,
        parent_refs: &mut ParentRefs,
        base: &str,
        path: &str,
    ) -> Result<()> {
        for (i, param) in op.parameters.iter_mut().enumerate() {
            let param_path = format!("{path}/parameters/{i}");
            self.expand_parameter(param, ctx, parent_refs, base, &param_path)?;
        }

        if let Some(body) = op.request_body.as_mut() {
            let body_path = format!("{path}/requestBody");
            self.expand_request_body(body, ctx, parent_refs, base, &body_path)?;
        }

        for (status, resp) in op.responses.iter_mut() {
            let resp_path = format!("{path}/responses/{}", uri::json_pointer_escape(status));
            self.expand_response(resp, ctx, parent_refs, base, &resp_path)?;
        }

        Ok(())
    }

    /// `expand_parameter_or_response` for parameters: dereference the top-level `$ref` (with
    /// cycle guard), then descend into `schema` or `content[...].schema`.
    pub fn expand_parameter(
        &self,
        param: &mut Parameter,
        ctx: &mut ResolverContext,
        parent_refs: &mut ParentRefs,
        base: &str,
        path: &str,
    ) -> Result<()> {
        if let Some(reference) = param.ref_.take() {
            match resolver::step_ref::<Parameter>(
                &reference,
                base,
                parent_refs,
                ctx,
                self.schema.cache,
                self.schema.loader,
                self.schema.options,
                path,
                self.schema.in_memory_root,
            )? {
                RefStep::None => {}
                RefStep::Circular { abs } => {
                    *param.ref_mut().expect("Parameter always carries a ref field") =
                        Some(resolver::resolve_cycle_target(&abs, ctx, self.schema.options));
                    return Ok(());
                }
                RefStep::Resolved { target, new_base } => {
                    let abs = uri::normalize_uri(&reference, base);
                    parent_refs.push(abs);
                    *param = target;
                    return self.expand_parameter(param, ctx, parent_refs, &new_base, path);
                }
            }
        }

        let skip_schemas = self.schema.options.skip_schemas;
        if let Some(schema) = param.schema_mut() {
            let schema_path = format!("{path}/schema");
            self.schema
                .expand_schema(schema, ctx, parent_refs, base, &schema_path, 0, skip_schemas)?;
        }
        if let Some(content) = param.content.as_mut() {
            for (media_type, mt) in content.iter_mut() {
                if let Some(schema) = mt.schema.as_mut() {
                    let schema_path =
                        format!("{path}/content/{}/schema", uri::json_pointer_escape(media_type));
                    // Content schemas are always expanded, regardless of skip_schemas.
                    self.schema
                        .expand_schema(schema, ctx, parent_refs, base, &schema_path, 0, false)?;
                }
            }
        }
        if let Some(items) = param.items.as_mut() {
            let items_path = format!("{path}/items");
            self.expand_items(items, ctx, parent_refs, base, &items_path)?;
        }

        Ok(())
    }

    /// `expand_parameter_or_response` for responses: same shape as [`Self::expand_parameter`].
    pub fn expand_response(
        &self,
        resp: &mut Response,
        ctx: &mut ResolverContext,
        parent_refs: &mut ParentRefs,
        base: &str,
        path: &str,
    ) -> Result<()> {
        if let Some(reference) = resp.ref_.take() {
            match resolver::step_ref::<Response>(
                &reference,
                base,
                parent_refs,
                ctx,
                self.schema.cache,
                self.schema.loader,
                self.schema.options,
                path,
                self.schema.in_memory_root,
            )? {
                RefStep::None => {}
                RefStep::Circular { abs } => {
                    *resp.ref_mut().expect("Response always carries a ref field") =
                        Some(resolver::resolve_cycle_target(&abs, ctx, self.schema.options));
                    return Ok(());
                }
                RefStep::Resolved { target, new_base } => {
                    let abs = uri::normalize_uri(&reference, base);
                    parent_refs.push(abs);
                    *resp = target;
                    return self.expand_response(resp, ctx, parent_refs, &new_base, path);
                }
            }
        }

        let skip_schemas = self.schema.options.skip_schemas;
        if let Some(schema) = resp.schema.as_mut() {
            let schema_path = format!("{path}/schema");
            self.schema
                .expand_schema(schema, ctx, parent_refs, base, &schema_path, 0, skip_schemas)?;
        }
        if let Some(content) = resp.content.as_mut() {
            for (media_type, mt) in content.iter_mut() {
                if let Some(schema) = mt.schema.as_mut() {
                    let schema_path =
                        format!("{path}/content/{}/schema", uri::json_pointer_escape(media_type));
                    self.schema
                        .expand_schema(schema, ctx, parent_refs, base, &schema_path, 0, false)?;
                }
            }
        }
        if let Some(headers) = resp.headers.as_mut() {
            for (name, header) in headers.iter_mut() {
                let header_path = format!("{path}/headers/{}", uri::json_pointer_escape(name));
                if let Some(schema) = header.schema.as_mut() {
                    let schema_path = format!("{header_path}/schema");
                    self.schema
                        .expand_schema(schema, ctx, parent_refs, base, &schema_path, 0, skip_schemas)?;
                }
                if let Some(items) = header.items.as_mut() {
                    let items_path = format!("{header_path}/items");
                    self.expand_items(items, ctx, parent_refs, base, &items_path)?;
                }
            }
        }

        Ok(())
    }

    /// Dereference an `Items` node's own `$ref` (cycle guard included), then recurse into its
    /// nested `items.items` chain (Swagger 2.0 `collectionFormat: multi` arrays of arrays).
    fn expand_items(
        &self,
        items: &mut Items,
        ctx: &mut ResolverContext,
        parent_refs: &mut ParentRefs,
        base: &str,
        path: &str,
    ) -> Result<()> {
        if let Some(reference) = items.ref_.take() {
            match resolver::step_ref::<Items>(
                &reference,
                base,
                parent_refs,
                ctx,
                self.schema.cache,
                self.schema.loader,
                self.schema.options,
                path,
                self.schema.in_memory_root,
            )? {
                RefStep::None => {}
                RefStep::Circular { abs } => {
                    *items.ref_mut().expect("Items always carries a ref field") =
                        Some(resolver::resolve_cycle_target(&abs, ctx, self.schema.options));
                    return Ok(());
                }
                RefStep::Resolved { target, new_base } => {
                    let abs = uri::normalize_uri(&reference, base);
                    parent_refs.push(abs);
                    *items = target;
                    return self.expand_items(items, ctx, parent_refs, &new_base, path);
                }
            }
        }

        if let Some(nested) = items.items.as_deref_mut() {
            let nested_path = format!("{path}/items");
            self.expand_items(nested, ctx, parent_refs, base, &nested_path)?;
        }

        Ok(())
    }

    fn expand_request_body(
        &self,
        body: &mut RequestBody,
        ctx: &mut ResolverContext,
        parent_refs: &mut ParentRefs,
        base: &str,
        path: &str,
    ) -> Result<()> {
        if let Some(reference) = body.ref_.take() {
            match resolver::step_ref::<RequestBody>(
                &reference,
                base,
                parent_refs,
                ctx,
                self.schema.cache,
                self.schema.loader,
                self.schema.options,
                path,
                self.schema.in_memory_root,
            )? {
                RefStep::None => {}
                RefStep::Circular { abs } => {
                    *body.ref_mut().expect("RequestBody always carries a ref field") =
                        Some(resolver::resolve_cycle_target(&abs, ctx, self.schema.options));
                    return Ok(());
                }
                RefStep::Resolved { target, new_base } => {
                    let abs = uri::normalize_uri(&reference, base);
                    parent_refs.push(abs);
                    *body = target;
                    return self.expand_request_body(body, ctx, parent_refs, &new_base, path);
                }
            }
        }

        if let Some(content) = body.content.as_mut() {
            for (media_type, mt) in content.iter_mut() {
                if let Some(schema) = mt.schema.as_mut() {
                    let schema_path =
                        format!("{path}/content/{}/schema", uri::json_pointer_escape(media_type));
                    self.schema
                        .expand_schema(schema, ctx, parent_refs, base, &schema_path, 0, false)?;
                }
            }
        }

        Ok(())
    }
}

// ----------------------------------------------------------------------------------------------
// Public entry points.
// ----------------------------------------------------------------------------------------------

/// `expand_spec(spec, options)`: full document expansion.
pub fn expand_spec(doc: &mut Document, options: &ExpandOptions) -> Result<()> {
    let cache = ResolutionCache::with_defaults();
    let base = effective_base(&options.relative_base);
    let root_value = Arc::new(serde_json::to_value(&*doc)?);
    cache.set(&base, Arc::clone(&root_value));

    let mut ctx = ResolverContext::new(base);
    let expander = DocumentExpander::new(&cache, &options.path_loader, options, Some(&root_value));
    expander.expand_spec(doc, &mut ctx)
}

/// `expand_schema(schema, root?, cache?)`: expand one schema against an in-memory root.
pub fn expand_schema(
    schema: &mut Schema,
    root: Option<&Value>,
    cache: Option<&ResolutionCache>,
) -> Result<()> {
    let options = ExpandOptions::default();
    let owned_cache;
    let cache_ref = match cache {
        Some(c) => c,
        None => {
            owned_cache = ResolutionCache::with_defaults();
            &owned_cache
        }
    };

    let base = loader::pseudo_root_uri();
    let root_arc = root.map(|r| Arc::new(r.clone()));
    if let Some(root_arc) = &root_arc {
        cache_ref.set(&base, Arc::clone(root_arc));
    }

    let mut ctx = ResolverContext::new(base.clone());
    let mut parent_refs = ParentRefs::new();
    let expander = SchemaExpander::new(cache_ref, &options.path_loader, &options, root_arc.as_ref());
    expander.expand_schema(schema, &mut ctx, &mut parent_refs, &base, "", 0, options.skip_schemas)
}

/// `expand_schema_with_base_path(schema, cache?, options)`: as [`expand_schema`], but the root is
/// the document at `options.relative_base`.
pub fn expand_schema_with_base_path(
    schema: &mut Schema,
    cache: Option<&ResolutionCache>,
    options: &ExpandOptions,
) -> Result<()> {
    let owned_cache;
    let cache_ref = match cache {
        Some(c) => c,
        None => {
            owned_cache = ResolutionCache::with_defaults();
            &owned_cache
        }
    };

    let base = effective_base(&options.relative_base);
    let mut ctx = ResolverContext::new(base.clone());
    let mut parent_refs = ParentRefs::new();
    let expander = SchemaExpander::new(cache_ref, &options.path_loader, options, None);
    expander.expand_schema(schema, &mut ctx, &mut parent_refs, &base, "", 0, options.skip_schemas)
}

/// `expand_parameter(param, base)`: expand a standalone parameter against a base path, loading
/// any cross-file `$ref` targets through the default loader.
pub fn expand_parameter(param: &mut Parameter, base: &str) -> Result<()> {
    let cache = ResolutionCache::with_defaults();
    let options = ExpandOptions::new().with_relative_base(base);
    let effective = effective_base(base);
    let mut ctx = ResolverContext::new(effective.clone());
    let mut parent_refs = ParentRefs::new();
    let expander = DocumentExpander::new(&cache, &options.path_loader, &options, None);
    expander.expand_parameter(param, &mut ctx, &mut parent_refs, &effective, "")
}

/// `expand_parameter_with_root(param, root, cache?)`: expand a standalone parameter against an
/// in-memory root document.
pub fn expand_parameter_with_root(
    param: &mut Parameter,
    root: &Value,
    cache: Option<&ResolutionCache>,
) -> Result<()> {
    let options = ExpandOptions::default();
    let owned_cache;
    let cache_ref = match cache {
        Some(c) => c,
        None => {
            owned_cache = ResolutionCache::with_defaults();
            &owned_cache
        }
    };
    let base = loader::pseudo_root_uri();
    let root_arc = Arc::new(root.clone());
    cache_ref.set(&base, Arc::clone(&root_arc));

    let mut ctx = ResolverContext::new(base.clone());
    let mut parent_refs = ParentRefs::new();
    let expander = DocumentExpander::new(&cache_ref, &options.path_loader, &options, Some(&root_arc));
    expander.expand_parameter(param, &mut ctx, &mut parent_refs, &base, "")
}

/// `expand_response(resp, base)`: expand a standalone response against a base path.
pub fn expand_response(resp: &mut Response, base: &str) -> Result<()> {
    let cache = ResolutionCache::with_defaults();
    let options = ExpandOptions::new().with_relative_base(base);
    let effective = effective_base(base);
    let mut ctx = ResolverContext::new(effective.clone());
    let mut parent_refs = ParentRefs::new();
    let expander = DocumentExpander::new(&cache, &options.path_loader, &options, None);
    expander.expand_response(resp, &mut ctx, &mut parent_refs, &effective, "")
}

/// `expand_response_with_root(resp, root, cache?)`: expand a standalone response against an
/// in-memory root document.
pub fn expand_response_with_root(
    resp: &mut Response,
    root: &Value,
    cache: Option<&ResolutionCache>,
) -> Result<()> {
    let options = ExpandOptions::default();
    let owned_cache;
    let cache_ref = match cache {
        Some(c) => c,
        None => {
            owned_cache = ResolutionCache::with_defaults();
            &owned_cache
        }
    };
    let base = loader::pseudo_root_uri();
    let root_arc = Arc::new(root.clone());
    cache_ref.set(&base, Arc::clone(&root_arc));

    let mut ctx = ResolverContext::new(base.clone());
    let mut parent_refs = ParentRefs::new();
    let expander = DocumentExpander::new(&cache_ref, &options.path_loader, &options, Some(&root_arc));
    expander.expand_response(resp, &mut ctx, &mut parent_refs, &base, "")
}

fn effective_base(relative_base: &str) -> String {
    if relative_base.is_empty() {
        loader::pseudo_root_uri()
    } else {
        uri::normalize_base(relative_base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::default_loader;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn expand_spec_inlines_trivial_definitions_ref() {
        let mut doc: Document = serde_json::from_value(json!({
            "swagger": "2.0",
            "definitions": {
                "A": {"type": "string"},
                "B": {"$ref": "#/definitions/A"}
            },
            "paths": {}
        }))
        .expect("decode doc");

        expand_spec(&mut doc, &ExpandOptions::default()).expect("expand");

        let b = &doc.definitions["B"];
        assert_eq!(b.type_.as_ref().and_then(Value::as_str), Some("string"));
        assert!(b.ref_.is_none());
    }

    #[test]
    fn expand_spec_cross_file_ref_inlines() {
        let dir = tempdir().expect("tempdir");
        let other_path = dir.path().join("other.json");
        fs::write(&other_path, r#"{"definitions": {"X": {"type": "integer"}}}"#).expect("write");

        let spec_path = dir.path().join("spec.json");
        let mut doc: Document = serde_json::from_value(json!({
            "swagger": "2.0",
            "definitions": {
                "Y": {"$ref": "other.json#/definitions/X"}
            },
            "paths": {}
        }))
        .expect("decode doc");

        let options = ExpandOptions::new()
            .with_relative_base(spec_path.to_string_lossy().to_string())
            .with_path_loader(default_loader());

        expand_spec(&mut doc, &options).expect("expand");

        let y = &doc.definitions["Y"];
        assert_eq!(y.type_.as_ref().and_then(Value::as_str), Some("integer"));
        assert!(y.ref_.is_none());
    }

    #[test]
    fn expand_spec_walks_paths_parameters_and_responses() {
        let mut doc: Document = serde_json::from_value(json!({
            "swagger": "2.0",
            "definitions": {
                "Pet": {"type": "object", "properties": {"name": {"type": "string"}}}
            },
            "paths": {
                "/pets": {
                    "get": {
                        "parameters": [],
                        "responses": {
                            "200": {
                                "description": "ok",
                                "schema": {"$ref": "#/definitions/Pet"}
                            }
                        }
                    }
                }
            }
        }))
        .expect("decode doc");

        expand_spec(&mut doc, &ExpandOptions::default()).expect("expand");

        let response = &doc.paths["/pets"].get.as_ref().unwrap().responses["200"];
        let schema = response.schema.as_ref().expect("schema present");
        assert!(schema.ref_.is_none());
        assert!(schema.properties.is_some());
    }

    #[test]
    fn skip_schemas_rebases_without_inlining() {
        let mut doc: Document = serde_json::from_value(json!({
            "swagger": "2.0",
            "definitions": {
                "A": {"type": "string"},
                "B": {"$ref": "#/definitions/A"}
            },
            "paths": {
                "/pets": {
                    "get": {
                        "responses": {
                            "200": {
                                "description": "ok",
                                "schema": {"$ref": "#/definitions/A"}
                            }
                        }
                    }
                }
            }
        }))
        .expect("decode doc");

        let options = ExpandOptions::new().with_skip_schemas(true);
        expand_spec(&mut doc, &options).expect("expand");

        // Top-level definitions are untouched in skip_schemas mode.
        assert_eq!(doc.definitions["B"].ref_.as_deref(), Some("#/definitions/A"));

        // But a schema reached through a response is still rebased (here, a no-op rebase since
        // the base never moved), and is NOT inlined.
        let response = &doc.paths["/pets"].get.as_ref().unwrap().responses["200"];
        let schema = response.schema.as_ref().expect("schema present");
        assert_eq!(schema.ref_.as_deref(), Some("#/definitions/A"));
        assert!(schema.type_.is_none(), "skip_schemas must not inline the body");
    }

    #[test]
    fn expand_response_walks_header_schema_and_items() {
        let mut doc: Document = serde_json::from_value(json!({
            "swagger": "2.0",
            "definitions": {
                "RateLimit": {"type": "integer"},
                "Tag": {"type": "string"}
            },
            "paths": {
                "/pets": {
                    "get": {
                        "responses": {
                            "200": {
                                "description": "ok",
                                "headers": {
                                    "X-Rate-Limit": {
                                        "schema": {"$ref": "#/definitions/RateLimit"}
                                    },
                                    "X-Tags": {
                                        "type": "array",
                                        "items": {"$ref": "#/definitions/Tag"}
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }))
        .expect("decode doc");

        expand_spec(&mut doc, &ExpandOptions::default()).expect("expand");

        let headers = doc.paths["/pets"].get.as_ref().unwrap().responses["200"]
            .headers
            .as_ref()
            .expect("headers present");

        let rate_limit_schema = headers["X-Rate-Limit"].schema.as_ref().expect("schema present");
        assert!(rate_limit_schema.ref_.is_none());
        assert_eq!(rate_limit_schema.type_.as_ref().and_then(Value::as_str), Some("integer"));

        let tags_items = headers["X-Tags"].items.as_ref().expect("items present");
        assert!(tags_items.ref_.is_none());
        assert_eq!(tags_items.type_.as_deref(), Some("string"));
    }

    #[test]
    fn expand_parameter_walks_items_ref() {
        let mut doc: Document = serde_json::from_value(json!({
            "swagger": "2.0",
            "definitions": {
                "Tag": {"type": "string"}
            },
            "paths": {
                "/pets": {
                    "get": {
                        "parameters": [
                            {
                                "name": "tags",
                                "in": "query",
                                "type": "array",
                                "items": {"$ref": "#/definitions/Tag"}
                            }
                        ],
                        "responses": {}
                    }
                }
            }
        }))
        .expect("decode doc");

        expand_spec(&mut doc, &ExpandOptions::default()).expect("expand");

        let param = &doc.paths["/pets"].get.as_ref().unwrap().parameters[0];
        let items = param.items.as_ref().expect("items present");
        assert!(items.ref_.is_none());
        assert_eq!(items.type_.as_deref(), Some("string"));
    }
}
