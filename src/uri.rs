//! URI normalization: turning `(ref, base)` pairs into canonical absolute URIs and back.
//!
//! Covers the full set of forms a `$ref` or base path can take: bare fragments, absolute URLs,
//! absolute/relative filesystem paths, and Windows drive-letter/UNC paths.

use std::path::{Path, PathBuf};
use url::Url;

/// A parsed JSON Reference, split into its URI parts plus the flags `$ref` handling keys off of.
///
/// The flags are derived once at construction time and never change afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ref {
    /// The original, unparsed reference string.
    pub raw: String,
    /// `true` for the bare `#` root reference.
    pub is_root: bool,
    /// `true` when the reference starts with `#` (root or fragment-only).
    pub has_fragment_only: bool,
    /// `true` when the reference is an absolute URL with scheme and authority.
    pub has_full_url: bool,
    /// `true` when the reference is an absolute filesystem path (or `file://` URL).
    pub has_full_file_path: bool,
    /// `true` when the reference is a relative path (no scheme, no leading `/`, no leading `#`).
    pub has_url_path_only: bool,
}

impl Ref {
    /// Parse a raw `$ref` string into its flags. Never fails: an unparseable string is simply
    /// classified as a relative path.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let is_root = raw == "#";
        let has_fragment_only = raw.starts_with('#');
        let has_full_url = looks_like_absolute_url(raw);
        let has_full_file_path = !has_full_url && looks_like_absolute_file_path(raw);
        let has_url_path_only = !has_fragment_only && !has_full_url && !has_full_file_path;
        Self {
            raw: raw.to_string(),
            is_root,
            has_fragment_only,
            has_full_url,
            has_full_file_path,
            has_url_path_only,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

fn looks_like_absolute_url(s: &str) -> bool {
    if let Some(idx) = s.find("://") {
        // A single-letter scheme followed by `://` is virtually always a Windows drive letter
        // (`c://...`), not a real authority-bearing scheme.
        let scheme = &s[..idx];
        !scheme.is_empty() && scheme.len() > 1 && scheme.chars().all(|c| c.is_ascii_alphanumeric())
    } else {
        false
    }
}

fn looks_like_absolute_file_path(s: &str) -> bool {
    if s.starts_with("file://") {
        return true;
    }
    if is_windows_drive_path(s) {
        return true;
    }
    Path::new(s).is_absolute()
}

fn is_windows_drive_path(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 2
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes.len() == 2 || bytes[2] == b'/' || bytes[2] == b'\\')
}

fn is_unc_path(s: &str) -> bool {
    s.starts_with("\\\\") || s.starts_with("//")
}

/// Canonicalize a base path/URL into an absolute URI string.
///
/// Accepts an empty string (→ `file://<cwd>`), a relative file path, an absolute file path, a
/// `file://` URL, or an `http(s)://` URL. The result always carries a scheme, has its path
/// lexically cleaned, and never carries a fragment. Idempotent: calling this twice on its own
/// output returns the same string.
#[must_use]
pub fn normalize_base(base: &str) -> String {
    if base.is_empty() {
        return file_url_for(&current_dir());
    }

    if looks_like_absolute_url(base) {
        return strip_fragment(base);
    }

    if base.starts_with("file://") {
        return strip_fragment(base);
    }

    if is_windows_drive_path(base) {
        let lowered = lowercase_drive(base);
        return file_url_for(Path::new(&lowered));
    }

    if is_unc_path(base) {
        return unc_to_file_url(base);
    }

    let path = Path::new(base);
    if path.is_absolute() {
        return file_url_for(path);
    }

    file_url_for(&current_dir().join(path))
}

/// Compute the absolute URI for `ref` resolved against `base`, checking in order: root/empty,
/// fragment-only, absolute URL, absolute file path, or relative path.
#[must_use]
pub fn normalize_uri(reference: &str, base: &str) -> String {
    let normalized_base = normalize_base(base);

    if reference.is_empty() || reference == "#" {
        return normalized_base;
    }

    if let Some(frag) = reference.strip_prefix('#') {
        return format!("{}#{}", strip_fragment(&normalized_base), frag);
    }

    if looks_like_absolute_url(reference) {
        return match Url::parse(reference) {
            Ok(url) => url.into(),
            Err(_) => reference.to_string(),
        };
    }

    if reference.starts_with("file://") {
        return reference.to_string();
    }

    if is_windows_drive_path(reference) {
        let (path_part, frag) = split_fragment(reference);
        let lowered = lowercase_drive(path_part);
        let base_file = file_url_for(Path::new(&lowered));
        return with_fragment(base_file, frag);
    }

    if is_unc_path(reference) {
        let (path_part, frag) = split_fragment(reference);
        let base_file = unc_to_file_url(path_part);
        return with_fragment(base_file, frag);
    }

    let (path_part, frag) = split_fragment(reference);
    if Path::new(path_part).is_absolute() {
        let base_file = file_url_for(Path::new(path_part));
        return with_fragment(base_file, frag);
    }

    // Relative: join with the directory of the base's path, keeping scheme/authority/query.
    join_relative(&normalized_base, path_part, frag)
}

/// Rewrite an absolute ref back to its minimal form for embedding into the expanded document:
/// a bare fragment when it shares the original base or root id, otherwise a relative path.
#[must_use]
pub fn denormalize_ref(abs_ref: &str, original_base: &str, root_id: &str) -> String {
    if abs_ref == original_base {
        return String::new();
    }

    let prefix = format!("{original_base}#");
    if let Some(frag) = abs_ref.strip_prefix(&prefix) {
        return format!("#{frag}");
    }
    if abs_ref == format!("{original_base}#") {
        return "#".to_string();
    }

    if !root_id.is_empty() && abs_ref.starts_with(root_id) {
        let rest = &abs_ref[root_id.len()..];
        if let Some(frag) = rest.strip_prefix('#') {
            return format!("#{frag}");
        }
        if rest.is_empty() {
            return String::new();
        }
    }

    if let (Some(a), Some(b)) = (as_file_path(abs_ref), as_file_path(original_base)) {
        if let Some(rel) = relative_file_path(&a, &b) {
            let (_, frag) = split_fragment(abs_ref);
            return with_fragment(rel, frag);
        }
    }

    abs_ref.to_string()
}

fn as_file_path(uri: &str) -> Option<PathBuf> {
    let (without_frag, _) = split_fragment(uri);
    let url = Url::parse(without_frag).ok()?;
    if url.scheme() != "file" {
        return None;
    }
    url.to_file_path().ok()
}

fn relative_file_path(target: &Path, base: &Path) -> Option<String> {
    let base_dir = base.parent()?;
    let mut target_components: Vec<_> = target.components().collect();
    let mut base_components: Vec<_> = base_dir.components().collect();

    let mut common = 0;
    while common < target_components.len()
        && common < base_components.len()
        && target_components[common] == base_components[common]
    {
        common += 1;
    }

    if common == 0 {
        return None;
    }

    base_components.drain(..common);
    target_components.drain(..common);

    let mut rel = PathBuf::new();
    for _ in &base_components {
        rel.push("..");
    }
    for component in &target_components {
        rel.push(component.as_os_str());
    }

    Some(rel.to_string_lossy().replace('\\', "/"))
}

fn split_fragment(s: &str) -> (&str, &str) {
    match s.split_once('#') {
        Some((path, frag)) => (path, frag),
        None => (s, ""),
    }
}

fn with_fragment(base: String, frag: &str) -> String {
    if frag.is_empty() {
        base
    } else {
        format!("{base}#{frag}")
    }
}

fn strip_fragment(s: &str) -> String {
    split_fragment(s).0.to_string()
}

fn lowercase_drive(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {
            let mut out = String::new();
            out.push(c.to_ascii_lowercase());
            out.push_str(chars.as_str());
            out
        }
        _ => s.to_string(),
    }
}

fn file_url_for(path: &Path) -> String {
    let cleaned = clean_path(path);
    Url::from_file_path(&cleaned)
        .map(Into::into)
        .unwrap_or_else(|()| format!("file://{}", cleaned.display()))
}

fn unc_to_file_url(s: &str) -> String {
    let trimmed = s.trim_start_matches(['\\', '/']);
    let mut parts = trimmed.splitn(2, ['\\', '/']);
    let host = parts.next().unwrap_or_default();
    let rest = parts.next().unwrap_or_default().replace('\\', "/");
    format!("file://{host}/{rest}")
}

fn clean_path(path: &Path) -> PathBuf {
    use std::path::Component;
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"))
}

fn join_relative(base: &str, relative_path: &str, frag: &str) -> String {
    if let Ok(base_url) = Url::parse(base) {
        if base_url.scheme() == "http" || base_url.scheme() == "https" {
            if let Ok(joined) = base_url.join(relative_path) {
                return with_fragment(joined.into(), frag);
            }
        }
        if base_url.scheme() == "file" {
            if let Ok(base_path) = base_url.to_file_path() {
                let dir = base_path.parent().unwrap_or(Path::new("/"));
                let joined = clean_path(&dir.join(relative_path));
                return with_fragment(file_url_for(&joined), frag);
            }
        }
    }
    with_fragment(format!("{base}/{relative_path}"), frag)
}

/// JSON Pointer token escaping: `~` → `~0`, `/` → `~1`. Order matters: `~` must be escaped first.
#[must_use]
pub fn json_pointer_escape(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// JSON Pointer token unescaping: `~1` → `/`, `~0` → `~`. Order matters: `~1` must be unescaped
/// before `~0`, mirroring RFC 6901.
#[must_use]
pub fn json_pointer_unescape(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_base_is_idempotent() {
        let cases = ["", "relative/spec.json", "/abs/spec.json", "https://example.com/spec.json"];
        for case in cases {
            let once = normalize_base(case);
            let twice = normalize_base(&once);
            assert_eq!(once, twice, "not idempotent for {case:?}");
        }
    }

    #[test]
    fn normalize_uri_root_returns_base() {
        let base = normalize_base("/spec/root.json");
        assert_eq!(normalize_uri("", &base), base);
        assert_eq!(normalize_uri("#", &base), base);
    }

    #[test]
    fn normalize_uri_fragment_only_appends_to_base() {
        let base = normalize_base("/spec/root.json");
        assert_eq!(
            normalize_uri("#/definitions/Pet", &base),
            format!("{base}#/definitions/Pet")
        );
    }

    #[test]
    fn normalize_uri_absolute_url_preserved() {
        let base = normalize_base("/spec/root.json");
        assert_eq!(
            normalize_uri("https://example.com/other.json#/X", &base),
            "https://example.com/other.json#/X"
        );
    }

    #[test]
    fn normalize_uri_relative_joins_directory_of_base() {
        let base = normalize_base("/spec/root.json");
        let joined = normalize_uri("other.json#/definitions/X", &base);
        assert!(joined.ends_with("/spec/other.json#/definitions/X"), "{joined}");
    }

    #[test]
    fn denormalize_self_root_is_empty() {
        let base = normalize_base("/spec/root.json");
        assert_eq!(denormalize_ref(&base, &base, ""), "");
    }

    #[test]
    fn denormalize_same_document_fragment() {
        let base = normalize_base("/spec/root.json");
        let abs = format!("{base}#/definitions/Pet");
        assert_eq!(denormalize_ref(&abs, &base, ""), "#/definitions/Pet");
    }

    #[test]
    fn pointer_escaping_round_trips() {
        let token = "a/b~c";
        let escaped = json_pointer_escape(token);
        assert_eq!(escaped, "a~1b~0c");
        assert_eq!(json_pointer_unescape(&escaped), token);
    }
}
