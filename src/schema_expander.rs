//! Schema Expander: recursively walk a Schema's composition keywords, substituting `$ref`
//! results, rebasing as `id`s shift scope, and short-circuiting on cycles.
//!
//! `Expander` bundles the dependencies every recursive call needs (cache, loader, options, an
//! optional in-memory root) so the recursive signature itself only has to carry what actually
//! varies per call: the context, the active parent-refs stack, the current base/path/depth, and
//! whether schema bodies are being skipped.

use crate::cache::ResolutionCache;
use crate::config::ExpandOptions;
use crate::context::{self, ParentRefs, ResolverContext};
use crate::error::Result;
use crate::loader::Loader;
use crate::model::{DependencyValue, RefNode, Schema, SchemaOrArray, SchemaOrBool};
use crate::resolver::{self, RefStep};
use crate::uri;
use serde_json::Value;
use std::sync::Arc;

pub struct Expander<'a> {
    pub cache: &'a ResolutionCache,
    pub loader: &'a Loader,
    pub options: &'a ExpandOptions,
    pub in_memory_root: Option<&'a Arc<Value>>,
}

impl<'a> Expander<'a> {
    #[must_use]
    pub fn new(
        cache: &'a ResolutionCache,
        loader: &'a Loader,
        options: &'a ExpandOptions,
        in_memory_root: Option<&'a Arc<Value>>,
    ) -> Self {
        Self {
            cache,
            loader,
            options,
            in_memory_root,
        }
    }

    /// `expand_schema(schema, parent_refs, base)`. `skip_schemas` is threaded explicitly (rather
    /// than read from `self.options` at every call) so callers can force it `false` for
    /// `content[mediaType].schema` locations regardless of the global option.
    pub fn expand_schema(
        &self,
        schema: &mut Schema,
        ctx: &mut ResolverContext,
        parent_refs: &mut ParentRefs,
        base: &str,
        path: &str,
        depth: usize,
        skip_schemas: bool,
    ) -> Result<()> {
        if let Some(reference) = schema.ref_.clone() {
            return self.expand_ref(
                schema,
                &reference,
                ctx,
                parent_refs,
                base,
                path,
                depth,
                skip_schemas,
            );
        }

        let mut base = base.to_string();
        if let Some(id) = schema.id.take() {
            if !id.is_empty() {
                let snapshot = Arc::new(serde_json::to_value(&*schema).unwrap_or(Value::Null));
                let (new_base, _) =
                    context::set_schema_id(self.cache, ctx, snapshot, &id, &base, path, depth);
                base = new_base;
            }
        }

        self.walk_children(schema, ctx, parent_refs, &base, path, depth, skip_schemas)
    }

    fn expand_ref(
        &self,
        schema: &mut Schema,
        reference: &str,
        ctx: &mut ResolverContext,
        parent_refs: &mut ParentRefs,
        base: &str,
        path: &str,
        depth: usize,
        skip_schemas: bool,
    ) -> Result<()> {
        if skip_schemas {
            let abs = uri::normalize_uri(reference, base);
            ctx.record_referrer(&abs, path);
            *schema.ref_mut().expect("Schema always carries a ref field") =
                Some(resolver::rewrite_circular_ref(&abs, ctx, self.options));
            return Ok(());
        }

        match resolver::step_ref::<Schema>(
            reference,
            base,
            parent_refs,
            ctx,
            self.cache,
            self.loader,
            self.options,
            path,
            self.in_memory_root,
        )? {
            RefStep::None => Ok(()),
            RefStep::Circular { abs } => {
                *schema.ref_mut().expect("Schema always carries a ref field") =
                    Some(resolver::resolve_cycle_target(&abs, ctx, self.options));
                Ok(())
            }
            RefStep::Resolved {
                mut target,
                new_base,
            } => {
                let abs = uri::normalize_uri(reference, base);
                parent_refs.push(abs);
                self.expand_schema(&mut target, ctx, parent_refs, &new_base, path, depth + 1, skip_schemas)?;
                *schema = target;
                Ok(())
            }
        }
    }

    #[allow(clippy::too_many_lines)]
    fn walk_children(
        &self,
        schema: &mut Schema,
        ctx: &mut ResolverContext,
        parent_refs: &mut ParentRefs,
        base: &str,
        path: &str,
        depth: usize,
        skip_schemas: bool,
    ) -> Result<()> {
        if let Some(defs) = schema.definitions.as_mut() {
            for (key, child) in defs.iter_mut() {
                let child_path = format!("{path}/definitions/{}", uri::json_pointer_escape(key));
                self.expand_schema(child, ctx, parent_refs, base, &child_path, depth + 1, skip_schemas)?;
            }
        }
        if let Some(defs) = schema.defs.as_mut() {
            for (key, child) in defs.iter_mut() {
                let child_path = format!("{path}/$defs/{}", uri::json_pointer_escape(key));
                self.expand_schema(child, ctx, parent_refs, base, &child_path, depth + 1, skip_schemas)?;
            }
        }

        if let Some(items) = schema.items.as_mut() {
            match items {
                SchemaOrArray::Single(child) => {
                    let child_path = format!("{path}/items");
                    self.expand_schema(child, ctx, parent_refs, base, &child_path, depth + 1, skip_schemas)?;
                }
                SchemaOrArray::Many(children) => {
                    for (i, child) in children.iter_mut().enumerate() {
                        let child_path = format!("{path}/items/{i}");
                        self.expand_schema(child, ctx, parent_refs, base, &child_path, depth + 1, skip_schemas)?;
                    }
                }
            }
        }

        for (i, child) in schema.all_of.iter_mut().enumerate() {
            let child_path = format!("{path}/allOf/{i}");
            self.expand_schema(child, ctx, parent_refs, base, &child_path, depth + 1, skip_schemas)?;
        }
        for (i, child) in schema.any_of.iter_mut().enumerate() {
            let child_path = format!("{path}/anyOf/{i}");
            self.expand_schema(child, ctx, parent_refs, base, &child_path, depth + 1, skip_schemas)?;
        }
        for (i, child) in schema.one_of.iter_mut().enumerate() {
            let child_path = format!("{path}/oneOf/{i}");
            self.expand_schema(child, ctx, parent_refs, base, &child_path, depth + 1, skip_schemas)?;
        }
        if let Some(not) = schema.not.as_mut() {
            let child_path = format!("{path}/not");
            self.expand_schema(not, ctx, parent_refs, base, &child_path, depth + 1, skip_schemas)?;
        }

        if let Some(props) = schema.properties.as_mut() {
            for (key, child) in props.iter_mut() {
                let child_path = format!("{path}/properties/{}", uri::json_pointer_escape(key));
                self.expand_schema(child, ctx, parent_refs, base, &child_path, depth + 1, skip_schemas)?;
            }
        }

        if let Some(SchemaOrBool::Schema(child)) = schema.additional_properties.as_mut() {
            let child_path = format!("{path}/additionalProperties");
            self.expand_schema(child, ctx, parent_refs, base, &child_path, depth + 1, skip_schemas)?;
        }

        if let Some(pattern_props) = schema.pattern_properties.as_mut() {
            for (key, child) in pattern_props.iter_mut() {
                let child_path = format!("{path}/patternProperties/{}", uri::json_pointer_escape(key));
                self.expand_schema(child, ctx, parent_refs, base, &child_path, depth + 1, skip_schemas)?;
            }
        }

        if let Some(deps) = schema.dependencies.as_mut() {
            for (key, dep) in deps.iter_mut() {
                if let DependencyValue::Schema(child) = dep {
                    let child_path = format!("{path}/dependencies/{}", uri::json_pointer_escape(key));
                    self.expand_schema(child, ctx, parent_refs, base, &child_path, depth + 1, skip_schemas)?;
                }
            }
        }

        if let Some(SchemaOrBool::Schema(child)) = schema.additional_items.as_mut() {
            let child_path = format!("{path}/additionalItems");
            self.expand_schema(child, ctx, parent_refs, base, &child_path, depth + 1, skip_schemas)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::default_loader;
    use serde_json::json;

    fn run_expand(root: &mut Value, skip_schemas: bool) {
        let cache = ResolutionCache::with_defaults();
        let loader = default_loader();
        let options = ExpandOptions::new().with_skip_schemas(skip_schemas);
        let root_arc = Arc::new(root.clone());
        let expander = Expander::new(&cache, &loader, &options, Some(&root_arc));
        let mut ctx = ResolverContext::new(crate::loader::pseudo_root_uri());

        let definitions = root
            .get_mut("definitions")
            .and_then(Value::as_object_mut)
            .expect("definitions object");
        for (name, value) in definitions.iter_mut() {
            let mut schema: Schema = serde_json::from_value(value.clone()).expect("decode schema");
            let path = format!("/definitions/{name}");
            let base = ctx.base_path.clone();
            // Mirrors document_expander's expand_root_schema: seed the parent-refs stack with
            // this definition's own pointer before descending, so a ref straight back to it is
            // caught as circular on first encounter instead of being inlined one level deep.
            let mut parent_refs = ParentRefs::new();
            parent_refs.push(uri::normalize_uri(&format!("#{path}"), &base));
            expander
                .expand_schema(&mut schema, &mut ctx, &mut parent_refs, &base, &path, 0, skip_schemas)
                .expect("expand_schema succeeds");
            *value = serde_json::to_value(&schema).expect("encode schema");
        }
    }

    #[test]
    fn trivial_local_ref_inlines() {
        let mut root = json!({
            "definitions": {
                "A": {"type": "string"},
                "B": {"$ref": "#/definitions/A"}
            }
        });
        run_expand(&mut root, false);
        assert_eq!(root["definitions"]["B"], json!({"type": "string"}));
    }

    #[test]
    fn self_cycle_keeps_one_ref() {
        let mut root = json!({
            "definitions": {
                "Node": {
                    "type": "object",
                    "properties": {
                        "next": {"$ref": "#/definitions/Node"}
                    }
                }
            }
        });
        run_expand(&mut root, false);
        assert_eq!(
            root["definitions"]["Node"]["properties"]["next"]["$ref"],
            json!("#/definitions/Node")
        );
        assert!(
            root["definitions"]["Node"]["properties"]["next"]
                .get("properties")
                .is_none(),
            "self-cycle must not be expanded infinitely"
        );
    }

    #[test]
    fn mutual_cycle_keeps_exactly_one_ref() {
        let mut root = json!({
            "definitions": {
                "A": {
                    "type": "object",
                    "properties": { "b": {"$ref": "#/definitions/B"} }
                },
                "B": {
                    "type": "object",
                    "properties": { "a": {"$ref": "#/definitions/A"} }
                }
            }
        });
        run_expand(&mut root, false);
        let a_has_ref = root["definitions"]["A"]["properties"]["b"].get("$ref").is_some();
        let b_has_ref = root["definitions"]["B"]["properties"]["a"].get("$ref").is_some();
        assert!(a_has_ref != b_has_ref, "exactly one side of the cycle should retain a $ref");
    }

    #[test]
    fn continue_on_error_preserves_missing_ref() {
        let mut root = json!({
            "definitions": {
                "A": {"$ref": "#/definitions/Missing"}
            }
        });
        let cache = ResolutionCache::with_defaults();
        let loader = default_loader();
        let options = ExpandOptions::new().with_continue_on_error(true);
        let root_arc = Arc::new(root.clone());
        let expander = Expander::new(&cache, &loader, &options, Some(&root_arc));
        let mut ctx = ResolverContext::new(crate::loader::pseudo_root_uri());
        let mut parent_refs = ParentRefs::new();

        let mut schema: Schema =
            serde_json::from_value(root["definitions"]["A"].clone()).expect("decode");
        expander
            .expand_schema(&mut schema, &mut ctx, &mut parent_refs, &ctx.base_path.clone(), "/definitions/A", 0, false)
            .expect("continue_on_error swallows the failure");
        assert_eq!(schema.ref_.as_deref(), Some("#/definitions/Missing"));
    }

    #[test]
    fn meta_schema_ref_resolves_without_io() {
        let loader: Loader = Arc::new(|uri: &str| {
            panic!("should not touch the network/filesystem for a preloaded meta-schema, got {uri}")
        });
        let cache = ResolutionCache::with_defaults();
        let options = ExpandOptions::new().with_path_loader(loader.clone());
        let root = json!({});
        let root_arc = Arc::new(root.clone());
        let expander = Expander::new(&cache, &loader, &options, Some(&root_arc));
        let mut ctx = ResolverContext::new(crate::loader::pseudo_root_uri());
        let mut parent_refs = ParentRefs::new();

        let mut schema = Schema {
            ref_: Some("http://json-schema.org/draft-04/schema#".to_string()),
            ..Schema::default()
        };
        expander
            .expand_schema(&mut schema, &mut ctx, &mut parent_refs, &ctx.base_path.clone(), "/x", 0, false)
            .expect("resolves from the preloaded cache");
        assert_eq!(schema.description.as_deref(), Some("Core schema meta-schema"));
    }
}
