//! Config field paths for diagnostics.

use owo_colors::OwoColorize;
use std::fmt;

/// Dotted path of a config field, e.g. `bundles.roots`.
///
/// Sections declare their paths as associated constants so diagnostics
/// never carry hand-typed strings:
///
/// ```ignore
/// impl BundlesConfig {
///     pub const ROOTS: FieldPath = FieldPath::new("bundles.roots");
/// }
///
/// diag.warn(BundlesConfig::ROOTS, "root does not exist");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).bright_blue())
    }
}
