//! Scheme classification.

use rustc_hash::FxHashSet;

use super::AssetReference;

/// How the translator treats a reference's scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeKind {
    /// `file:`; translates directly to a filesystem path.
    File,
    /// Bundle/package-relative; needs a locator to reach the filesystem.
    Bundle,
    /// Non-hierarchical (`memory:`, `data:`); cannot be rewritten.
    Opaque,
    /// Hierarchical but not translatable (e.g. `http:`).
    Other,
}

impl SchemeKind {
    /// Whether suffix derivation may rewrite the path.
    pub const fn is_rewritable(self) -> bool {
        !matches!(self, Self::Opaque)
    }
}

/// Set of scheme names that denote bundle-relative resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleSchemes(FxHashSet<String>);

impl BundleSchemes {
    pub const DEFAULT: [&'static str; 3] = ["bundle", "bundleentry", "platform"];

    pub fn new<I, S>(schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            schemes
                .into_iter()
                .map(|s| s.as_ref().to_ascii_lowercase())
                .collect(),
        )
    }

    #[inline]
    pub fn contains(&self, scheme: &str) -> bool {
        self.0.contains(scheme)
    }

    /// Classify a reference.
    pub fn classify(&self, reference: &AssetReference) -> SchemeKind {
        if !reference.is_hierarchical() {
            SchemeKind::Opaque
        } else if reference.is_file() {
            SchemeKind::File
        } else if self.contains(reference.scheme()) {
            SchemeKind::Bundle
        } else {
            SchemeKind::Other
        }
    }
}

impl Default for BundleSchemes {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(input: &str) -> SchemeKind {
        BundleSchemes::default().classify(&AssetReference::parse(input).unwrap())
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("file:///tmp/a.png"), SchemeKind::File);
        assert_eq!(classify("bundle://ui/icons/a.png"), SchemeKind::Bundle);
        assert_eq!(classify("platform:/plugin/ui/icons/a.png"), SchemeKind::Bundle);
        assert_eq!(classify("memory:a.png"), SchemeKind::Opaque);
        assert_eq!(classify("https://example.com/a.png"), SchemeKind::Other);
    }

    #[test]
    fn test_custom_schemes_case_insensitive() {
        let schemes = BundleSchemes::new(["Theme"]);
        let reference = AssetReference::parse("theme:/dark/a.png").unwrap();
        assert_eq!(schemes.classify(&reference), SchemeKind::Bundle);
        assert!(!schemes.contains("bundle"));
    }
}
