//! Per-expansion resolver state: cycle bookkeeping, the referrer index, and schema-id rebasing.
//!
//! A `ResolverContext` is threaded through the whole walk, alongside a separately-grown
//! `ParentRefs` stack per active resolution path.

use crate::cache::ResolutionCache;
use crate::uri;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// The stack of normalized ref strings currently being traversed, consulted as a set by
/// [`ResolverContext::is_circular`]. Grown on entry to a `$ref` resolution, never popped.
pub type ParentRefs = Vec<String>;

/// Per-expansion mutable state, created at the start of each top-level expansion call and
/// discarded at its end. Never shared between concurrent expansions of different documents.
#[derive(Debug, Clone)]
pub struct ResolverContext {
    /// Absolute base URI of the top document, fixed for the life of the context.
    pub base_path: String,
    /// The `$id`/`id` of the root schema, if one was encountered at depth 0.
    pub root_id: String,
    /// Normalized ref strings known to close a cycle.
    pub circulars: HashSet<String>,
    /// Normalized ref string → ordered list of JSON-pointer paths that referenced it.
    pub referrers: HashMap<String, Vec<String>>,
}

impl ResolverContext {
    #[must_use]
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            root_id: String::new(),
            circulars: HashSet::new(),
            referrers: HashMap::new(),
        }
    }

    /// Record that `abs_ref` was encountered while walking `path` (a JSON pointer into the
    /// document being expanded).
    pub fn record_referrer(&mut self, abs_ref: &str, path: &str) {
        self.referrers
            .entry(abs_ref.to_string())
            .or_default()
            .push(path.to_string());
    }

    /// Has `abs_ref` already been flagged as circular, or does it appear in the currently active
    /// `parents` stack? Either way, it is recorded in `self.circulars`.
    pub fn is_circular(&mut self, abs_ref: &str, parents: &ParentRefs) -> bool {
        if self.circulars.contains(abs_ref) {
            return true;
        }
        if parents.iter().any(|p| p == abs_ref) {
            self.circulars.insert(abs_ref.to_string());
            return true;
        }
        false
    }

    /// Tie-break for the "preferred referrer" of a cycle, used to pick a single canonical
    /// location among several paths that all reference the same target: pointers under
    /// `/definitions` or `/components/schemas` win, then shorter depth, then lexicographic order.
    #[must_use]
    pub fn preferred_referrer(&self, abs_ref: &str) -> Option<&str> {
        self.referrers
            .get(abs_ref)?
            .iter()
            .min_by(|a, b| referrer_rank(a).cmp(&referrer_rank(b)))
            .map(String::as_str)
    }
}

fn referrer_rank(path: &str) -> (u8, usize, &str) {
    let preferred = path.starts_with("/definitions") || path.starts_with("/components/schemas");
    (
        u8::from(!preferred),
        path.matches('/').count(),
        path,
    )
}

/// Rebase the resolution scope when a schema declares an `id`/`$id`.
/// Registers `target` in the cache under the new base so that later absolute refs to `id`
/// resolve to this in-memory node, and records `path` as the referrer for that new base. The
/// first id encountered at `depth == 0` becomes `context.root_id`.
pub fn set_schema_id(
    cache: &ResolutionCache,
    ctx: &mut ResolverContext,
    target: Arc<Value>,
    id: &str,
    base: &str,
    path: &str,
    depth: usize,
) -> (String, String) {
    let new_base = uri::normalize_uri(id, base);
    cache.set(&new_base, target);
    ctx.record_referrer(&new_base, path);
    if depth == 0 && ctx.root_id.is_empty() {
        ctx.root_id = new_base.clone();
    }
    (new_base, path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_circular_detects_self_cycle_via_parents() {
        let mut ctx = ResolverContext::new("file:///root.json");
        let parents: ParentRefs = vec!["file:///root.json#/definitions/Node".to_string()];
        assert!(ctx.is_circular("file:///root.json#/definitions/Node", &parents));
        assert!(ctx.circulars.contains("file:///root.json#/definitions/Node"));
    }

    #[test]
    fn is_circular_false_for_unrelated_ref() {
        let mut ctx = ResolverContext::new("file:///root.json");
        let parents: ParentRefs = vec!["file:///root.json#/definitions/A".to_string()];
        assert!(!ctx.is_circular("file:///root.json#/definitions/B", &parents));
    }

    #[test]
    fn is_circular_sticky_once_recorded() {
        let mut ctx = ResolverContext::new("file:///root.json");
        ctx.circulars.insert("file:///root.json#/X".to_string());
        let parents: ParentRefs = vec![];
        assert!(ctx.is_circular("file:///root.json#/X", &parents));
    }

    #[test]
    fn preferred_referrer_prefers_definitions_then_shorter_then_lexicographic() {
        let mut ctx = ResolverContext::new("file:///root.json");
        ctx.record_referrer("ref", "/paths/~1pets/get/responses/200/schema");
        ctx.record_referrer("ref", "/definitions/Zoo/properties/animal");
        ctx.record_referrer("ref", "/definitions/B");
        ctx.record_referrer("ref", "/definitions/A");
        assert_eq!(ctx.preferred_referrer("ref"), Some("/definitions/A"));
    }

    #[test]
    fn set_schema_id_records_root_id_only_at_depth_zero() {
        let cache = ResolutionCache::empty();
        let mut ctx = ResolverContext::new("file:///root.json");
        let target = Arc::new(serde_json::json!({"type": "object"}));
        let (new_base, _) = set_schema_id(
            &cache,
            &mut ctx,
            Arc::clone(&target),
            "urn:my-id",
            "file:///root.json",
            "/definitions/Nested",
            1,
        );
        assert!(ctx.root_id.is_empty());
        assert!(cache.get(&new_base).is_some());

        let (root_base, _) = set_schema_id(
            &cache,
            &mut ctx,
            target,
            "urn:root-id",
            "file:///root.json",
            "",
            0,
        );
        assert_eq!(ctx.root_id, root_base);
    }
}
