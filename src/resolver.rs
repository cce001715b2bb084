//! Reference resolver: locate the node a `$ref` addresses and decode it into a typed target.
//!
//! Loads a document via the cache, navigates a JSON pointer, and `serde_json::from_value`s the
//! result into the caller's requested type. This module does not follow the target's own `$ref`
//! itself; the expanders in `schema_expander`/`document_expander` own that recursion. It does
//! centralize the `continue_on_error` policy via [`step_ref`], and the cycle check plus
//! local-rewrite policy via [`rewrite_circular_ref`] and [`resolve_cycle_target`].

use crate::cache::ResolutionCache;
use crate::config::ExpandOptions;
use crate::context::{ParentRefs, ResolverContext};
use crate::error::{RefExpanderError, Result};
use crate::loader::{load_document, Loader};
use crate::model::{Header, Items, Parameter, PathItem, Response, Schema};
use crate::uri::{self, Ref};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// A node kind that can be the target of a `$ref`. Callers that know their target type at
/// compile time should prefer the typed `resolve_*` wrappers below; this tagged variant exists
/// for callers that only know the node kind at runtime (see [`resolve_dynamic`]).
#[derive(Debug)]
pub enum RefTarget {
    Schema(Box<Schema>),
    Parameter(Box<Parameter>),
    Response(Box<Response>),
    PathItem(Box<PathItem>),
    Items(Box<Items>),
}

fn split_doc_and_pointer(abs: &str) -> (String, Option<String>) {
    match abs.split_once('#') {
        Some((doc, frag)) if frag.is_empty() => (doc.to_string(), None),
        Some((doc, frag)) => (doc.to_string(), Some(frag.to_string())),
        None => (abs.to_string(), None),
    }
}

/// Resolve `reference` against `base` and decode the addressed node as `T`. Returns `Ok(None)`
/// when `reference` carries no URL (empty and not the root `#`), succeeding without touching
/// anything.
pub fn resolve<T: DeserializeOwned>(
    reference: &Ref,
    base: &str,
    cache: &ResolutionCache,
    loader: &Loader,
    ctx: &mut ResolverContext,
    current_path: &str,
    in_memory_root: Option<&Arc<Value>>,
) -> Result<Option<T>> {
    if reference.is_empty() && !reference.is_root {
        return Ok(None);
    }

    let abs = uri::normalize_uri(&reference.raw, base);

    let (doc_uri, pointer) = split_doc_and_pointer(&abs);
    let doc = load_document(&doc_uri, cache, loader, in_memory_root)?;

    let node = match &pointer {
        None => (*doc).clone(),
        Some(ptr) => doc
            .pointer(ptr)
            .cloned()
            .ok_or_else(|| RefExpanderError::RefNotFound {
                reference: reference.raw.clone(),
                uri: doc_uri.clone(),
                pointer: ptr.clone(),
            })?,
    };

    let decoded: T =
        serde_json::from_value(node).map_err(|e| RefExpanderError::Decode {
            reference: reference.raw.clone(),
            uri: doc_uri.clone(),
            source: e,
        })?;

    Ok(Some(decoded))
}

/// Outcome of stepping through one `$ref` during expansion.
pub enum RefStep<T> {
    /// The ref was empty; there is nothing to substitute.
    None,
    /// The ref closes a cycle; the caller's node has NOT been rewritten. Use
    /// [`rewrite_circular_ref`] or [`resolve_cycle_target`] to compute the replacement `$ref`
    /// string.
    Circular { abs: String },
    /// The ref resolved; the caller should merge `target` into its node and recurse with `base`
    /// switched to `new_base`.
    Resolved { target: T, new_base: String },
}

/// Step through one `$ref`, applying the cycle check and the single `continue_on_error` choke
/// point shared by every expander. Every occurrence is recorded in the referrer index before the
/// cycle check runs, so a target referenced from several places keeps every referrer on record
/// even once it's found to close a cycle.
pub fn step_ref<T: DeserializeOwned>(
    node_ref: &str,
    base: &str,
    parent_refs: &ParentRefs,
    ctx: &mut ResolverContext,
    cache: &ResolutionCache,
    loader: &Loader,
    options: &ExpandOptions,
    current_path: &str,
    in_memory_root: Option<&Arc<Value>>,
) -> Result<RefStep<T>> {
    let parsed = Ref::parse(node_ref);
    if parsed.is_empty() && !parsed.is_root {
        return Ok(RefStep::None);
    }

    let abs = uri::normalize_uri(node_ref, base);
    ctx.record_referrer(&abs, current_path);
    if ctx.is_circular(&abs, parent_refs) {
        return Ok(RefStep::Circular { abs });
    }

    match resolve::<T>(&parsed, base, cache, loader, ctx, current_path, in_memory_root) {
        Ok(Some(target)) => {
            let (doc_uri, _) = split_doc_and_pointer(&abs);
            Ok(RefStep::Resolved {
                target,
                new_base: doc_uri,
            })
        }
        Ok(None) => Ok(RefStep::None),
        Err(err) if options.continue_on_error => {
            tracing::warn!(reference = node_ref, error = %err, "continuing after resolve failure");
            Ok(RefStep::None)
        }
        Err(err) => Err(err),
    }
}

/// Compute the rewritten `$ref` for a reference that closes a cycle, by denormalizing `abs`
/// back to its shortest local form (or leaving it absolute, under `absolute_circular_ref`).
#[must_use]
pub fn rewrite_circular_ref(abs: &str, ctx: &ResolverContext, options: &ExpandOptions) -> String {
    if options.absolute_circular_ref {
        abs.to_string()
    } else {
        uri::denormalize_ref(abs, &ctx.base_path, &ctx.root_id)
    }
}

/// Compute the rewritten `$ref` for a reference that closes a cycle, same as
/// [`rewrite_circular_ref`], except that when `abs` has more than one referrer on record, the
/// rewritten ref points at the tie-break-preferred referrer's own location rather than at `abs`
/// itself. This only matters for intersecting cycles, where several independent paths reach the
/// same node and the choice of which one anchors the rewrite would otherwise depend on walk
/// order; with a single referrer (the ordinary self/mutual cycle case) the two functions agree.
#[must_use]
pub fn resolve_cycle_target(abs: &str, ctx: &ResolverContext, options: &ExpandOptions) -> String {
    if options.absolute_circular_ref {
        return abs.to_string();
    }
    let has_multiple_referrers = ctx.referrers.get(abs).is_some_and(|paths| paths.len() > 1);
    if has_multiple_referrers {
        if let Some(preferred) = ctx.preferred_referrer(abs) {
            return format!("#{preferred}");
        }
    }
    uri::denormalize_ref(abs, &ctx.base_path, &ctx.root_id)
}

/// `resolve_ref(root, ref)`: resolve `ref` against an in-memory root with default options.
pub fn resolve_ref<T: DeserializeOwned>(root: &Value, reference: &str) -> Result<T> {
    resolve_ref_with_base(root, reference, &ExpandOptions::default())
}

/// `resolve_ref_with_base(root, ref, options)`: as [`resolve_ref`], but against
/// `options.relative_base` and using `options.path_loader` for any cross-document hop.
pub fn resolve_ref_with_base<T: DeserializeOwned>(
    root: &Value,
    reference: &str,
    options: &ExpandOptions,
) -> Result<T> {
    let cache = ResolutionCache::with_defaults();
    let root_arc = Arc::new(root.clone());

    let base = if options.relative_base.is_empty() {
        let pseudo = crate::loader::pseudo_root_uri();
        cache.set(&pseudo, Arc::clone(&root_arc));
        pseudo
    } else {
        uri::normalize_base(&options.relative_base)
    };

    let mut ctx = ResolverContext::new(base.clone());
    let parsed = Ref::parse(reference);
    let result = resolve::<T>(
        &parsed,
        &base,
        &cache,
        &options.path_loader,
        &mut ctx,
        "",
        Some(&root_arc),
    )?;
    result.ok_or_else(|| RefExpanderError::InvalidTarget {
        reference: reference.to_string(),
    })
}

/// Returns the `Parameter` addressed by `ref`, without mutating `root`.
pub fn resolve_parameter(root: &Value, reference: &str) -> Result<Parameter> {
    resolve_ref::<Parameter>(root, reference)
}

/// Returns the `Response` addressed by `ref`, without mutating `root`.
pub fn resolve_response(root: &Value, reference: &str) -> Result<Response> {
    resolve_ref::<Response>(root, reference)
}

/// Returns the `Items` addressed by `ref`, without mutating `root`.
pub fn resolve_items(root: &Value, reference: &str) -> Result<Items> {
    resolve_ref::<Items>(root, reference)
}

/// Returns the `PathItem` addressed by `ref`, without mutating `root`.
pub fn resolve_path_item(root: &Value, reference: &str) -> Result<PathItem> {
    resolve_ref::<PathItem>(root, reference)
}

/// Dynamic-kind resolve used where the target type is only known at runtime (e.g. a generic
/// tool walking an arbitrary document). Known kinds are `"schema"`, `"parameter"`, `"response"`,
/// `"pathItem"`, `"items"`, `"header"`; anything else is `UnsupportedNode`.
pub fn resolve_dynamic(root: &Value, reference: &str, kind: &str) -> Result<RefTarget> {
    match kind {
        "schema" => Ok(RefTarget::Schema(Box::new(resolve_ref::<Schema>(
            root, reference,
        )?))),
        "parameter" => Ok(RefTarget::Parameter(Box::new(resolve_parameter(
            root, reference,
        )?))),
        "response" => Ok(RefTarget::Response(Box::new(resolve_response(
            root, reference,
        )?))),
        "pathItem" => Ok(RefTarget::PathItem(Box::new(resolve_path_item(
            root, reference,
        )?))),
        "items" => Ok(RefTarget::Items(Box::new(resolve_items(root, reference)?))),
        "header" => {
            let header = resolve_ref::<Header>(root, reference)?;
            // Headers aren't $ref'd as a top-level node kind; decode only to validate the
            // pointer, then reject as unsupported.
            drop(header);
            Err(RefExpanderError::UnsupportedNode {
                kind: "header".to_string(),
            })
        }
        other => Err(RefExpanderError::UnsupportedNode {
            kind: other.to_string(),
        }),
    }
}
