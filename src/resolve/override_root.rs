//! Alternate roots for themed or variant assets.

use serde::{Deserialize, Serialize};

use crate::reference::AssetReference;

/// Replace one path segment with an alternate root.
///
/// ```toml
/// [[overrides]]
/// segment = "icons"
/// replacement = "modern/icons"
/// scheme = "bundleentry"     # optional: only apply to this scheme
/// ```
///
/// `platform:/plugin/ui/icons/save.png` becomes
/// `platform:/plugin/ui/modern/icons/save.png`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideRoot {
    /// Path segment(s) to replace, without surrounding slashes.
    pub segment: String,
    /// Substitute segment(s), without surrounding slashes.
    pub replacement: String,
    /// Restrict the override to one scheme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
}

impl OverrideRoot {
    pub fn new(segment: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            replacement: replacement.into(),
            scheme: None,
        }
    }

    pub fn for_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    /// Substitute the first whole-segment match in `reference`'s path.
    ///
    /// Returns `None` when the override does not apply (scheme mismatch,
    /// opaque reference, segment absent).
    pub fn apply(&self, reference: &AssetReference) -> Option<AssetReference> {
        if let Some(scheme) = &self.scheme
            && !scheme.eq_ignore_ascii_case(reference.scheme())
        {
            return None;
        }
        if self.segment.is_empty() || !reference.is_hierarchical() {
            return None;
        }

        let path = reference.path();
        let needle = format!("/{}/", self.segment);
        let start = path.find(&needle)?;
        let rest = &path[start + needle.len()..];
        let rewritten = format!("{}/{}/{}", &path[..start], self.replacement, rest);

        if rewritten == path {
            return None;
        }
        reference.with_path(&rewritten)
    }
}
