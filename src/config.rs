//! Expansion options, an explicit serde-friendly settings struct rather than scattered booleans
//! threaded ad hoc through call sites.

use crate::loader::{default_loader, Loader};

/// Options controlling a single `expand_spec` / `expand_schema` call.
///
/// This struct, not a process-wide default, is what's threaded through the call graph.
/// [`ExpandOptions::default`] supplies the process-wide default loader for convenience, but
/// nothing here is a hidden global.
#[derive(Clone)]
pub struct ExpandOptions {
    /// Absolute or relative path of the top document. Empty means "current working directory".
    pub relative_base: String,
    /// When true, do not inline schema bodies, but still rebase every `$ref` inside them.
    pub skip_schemas: bool,
    /// When true, individual resolve failures are logged and skipped rather than aborting.
    pub continue_on_error: bool,
    /// Injected "fetch raw bytes for this URI" function.
    pub path_loader: Loader,
    /// When true, residual circular `$ref`s are left as absolute URIs instead of being
    /// denormalized to their shortest local form.
    pub absolute_circular_ref: bool,
}

impl ExpandOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_relative_base(mut self, base: impl Into<String>) -> Self {
        self.relative_base = base.into();
        self
    }

    #[must_use]
    pub fn with_skip_schemas(mut self, skip: bool) -> Self {
        self.skip_schemas = skip;
        self
    }

    #[must_use]
    pub fn with_continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    #[must_use]
    pub fn with_absolute_circular_ref(mut self, absolute: bool) -> Self {
        self.absolute_circular_ref = absolute;
        self
    }

    #[must_use]
    pub fn with_path_loader(mut self, loader: Loader) -> Self {
        self.path_loader = loader;
        self
    }
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            relative_base: String::new(),
            skip_schemas: false,
            continue_on_error: false,
            path_loader: default_loader(),
            absolute_circular_ref: false,
        }
    }
}
