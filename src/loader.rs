//! Document loader: fetch-and-parse a document by URI via an injected loader, through the cache.
//!
//! Checks the cache first, falls back to `std::fs::read` or a `reqwest` GET, and stores the
//! parsed result back in the cache. The loader function itself is injected rather than
//! hard-wired to `reqwest`/`std::fs`, and the synthetic pseudo-root URI is special-cased to avoid
//! I/O entirely when a caller supplies an in-memory root with no backing file.

use crate::cache::ResolutionCache;
use crate::error::{RefExpanderError, Result};
use serde_json::Value;
use std::sync::Arc;

/// Injected "fetch raw bytes for this URI" function. `uri` is always a fragment-stripped,
/// normalized absolute URI.
pub type Loader = Arc<dyn Fn(&str) -> Result<Vec<u8>> + Send + Sync>;

/// The sentinel URI used when a caller supplies an in-memory root with no backing file.
#[must_use]
pub fn pseudo_root_uri() -> String {
    format!("{}/.root", crate::uri::normalize_base(""))
}

/// Process-wide default loader: reads `file://`/plain paths from disk, fetches `http(s)://` via a
/// blocking client. Never touches the network for anything already in the cache.
#[must_use]
pub fn default_loader() -> Loader {
    Arc::new(|uri: &str| -> Result<Vec<u8>> {
        if let Some(rest) = uri.strip_prefix("file://") {
            return std::fs::read(rest).map_err(|e| RefExpanderError::Load {
                uri: uri.to_string(),
                message: e.to_string(),
            });
        }
        if uri.starts_with("http://") || uri.starts_with("https://") {
            let client = reqwest::blocking::Client::new();
            let response = client.get(uri).send().map_err(|e| RefExpanderError::Load {
                uri: uri.to_string(),
                message: e.to_string(),
            })?;
            let bytes = response.bytes().map_err(|e| RefExpanderError::Load {
                uri: uri.to_string(),
                message: e.to_string(),
            })?;
            return Ok(bytes.to_vec());
        }
        std::fs::read(uri).map_err(|e| RefExpanderError::Load {
            uri: uri.to_string(),
            message: e.to_string(),
        })
    })
}

/// Load (or fetch from cache) the document at the normalized absolute URI `uri` (fragment
/// already stripped by the caller). When `in_memory_root` is `Some` and `uri` equals the
/// pseudo-root sentinel, returns it directly without touching the loader.
pub fn load_document(
    uri: &str,
    cache: &ResolutionCache,
    loader: &Loader,
    in_memory_root: Option<&Arc<Value>>,
) -> Result<Arc<Value>> {
    if let Some(root) = in_memory_root {
        if uri == pseudo_root_uri() {
            cache.set(uri, Arc::clone(root));
            return Ok(Arc::clone(root));
        }
    }

    if let Some(cached) = cache.get(uri) {
        return Ok(cached);
    }

    tracing::info!(uri, "loading referenced document");
    let bytes = loader(uri)?;
    let value: Value = serde_json::from_slice(&bytes).map_err(|e| RefExpanderError::Parse {
        uri: uri.to_string(),
        source: e,
    })?;
    let value = Arc::new(value);
    cache.set(uri, Arc::clone(&value));
    Ok(value)
}
