//! Resolution cache: a normalized-absolute-URI → parsed document store.
//!
//! Keyed by the normalized URI string directly (the URI normalizer, not the caller, decides
//! document identity), and pre-seeded with the Swagger 2.0 and JSON-Schema draft-04 meta-schemas
//! so references into either resolve without network I/O.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

pub const SWAGGER2_SCHEMA_URI: &str = "http://swagger.io/v2/schema.json";
pub const DRAFT4_SCHEMA_URI: &str = "http://json-schema.org/draft-04/schema";

static SWAGGER2_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../assets/swagger2-schema.json"))
        .expect("embedded swagger 2.0 meta-schema is valid JSON")
});

static DRAFT4_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../assets/draft4-meta-schema.json"))
        .expect("embedded draft-04 meta-schema is valid JSON")
});

/// Thread-safe store from normalized absolute document URI to parsed `Value`.
#[derive(Debug)]
pub struct ResolutionCache {
    documents: RwLock<HashMap<String, Arc<Value>>>,
}

impl ResolutionCache {
    /// An empty cache with no preloaded documents.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }

    /// A cache pre-seeded with the Swagger 2.0 and JSON-Schema draft-04 meta-schemas.
    #[must_use]
    pub fn with_defaults() -> Self {
        let cache = Self::empty();
        cache.set(SWAGGER2_SCHEMA_URI, Arc::new(SWAGGER2_SCHEMA.clone()));
        cache.set(DRAFT4_SCHEMA_URI, Arc::new(DRAFT4_SCHEMA.clone()));
        // Also register the trailing-`#` and trailing-`#/` variants real-world specs use.
        cache.set(
            &format!("{SWAGGER2_SCHEMA_URI}#"),
            Arc::new(SWAGGER2_SCHEMA.clone()),
        );
        cache.set(
            &format!("{DRAFT4_SCHEMA_URI}#"),
            Arc::new(DRAFT4_SCHEMA.clone()),
        );
        cache
    }

    /// Look up a document by its normalized absolute URI.
    #[must_use]
    pub fn get(&self, uri: &str) -> Option<Arc<Value>> {
        self.documents.read().get(uri).cloned()
    }

    /// Store (or overwrite) a document at its normalized absolute URI.
    pub fn set(&self, uri: &str, value: Arc<Value>) {
        self.documents.write().insert(uri.to_string(), value);
    }

    /// Number of documents currently cached. Test/diagnostic helper.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cache_has_preloaded_meta_schemas() {
        let cache = ResolutionCache::with_defaults();
        let draft4 = cache.get(DRAFT4_SCHEMA_URI).expect("draft-04 present");
        assert_eq!(
            draft4.get("description").and_then(Value::as_str),
            Some("Core schema meta-schema")
        );
        let swagger2 = cache.get(SWAGGER2_SCHEMA_URI).expect("swagger 2.0 present");
        assert_eq!(swagger2.get("swagger"), None);
        assert!(swagger2.get("definitions").is_some());
    }

    #[test]
    fn get_set_round_trip() {
        let cache = ResolutionCache::empty();
        assert!(cache.get("file:///a.json").is_none());
        cache.set("file:///a.json", Arc::new(serde_json::json!({"a": 1})));
        let got = cache.get("file:///a.json").expect("present after set");
        assert_eq!(got.get("a").and_then(Value::as_i64), Some(1));
    }

    #[test]
    fn set_overwrites_prior_value() {
        let cache = ResolutionCache::empty();
        cache.set("file:///a.json", Arc::new(serde_json::json!({"v": 1})));
        cache.set("file:///a.json", Arc::new(serde_json::json!({"v": 2})));
        let got = cache.get("file:///a.json").expect("present");
        assert_eq!(got.get("v").and_then(Value::as_i64), Some(2));
    }
}
