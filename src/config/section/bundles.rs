//! `[bundles]` section configuration.
//!
//! Bundle schemes and the directories bundle references map to. When no
//! roots are configured the resolver runs standalone (file-scheme only).
//!
//! # Example
//!
//! ```toml
//! [bundles]
//! schemes = ["bundle", "bundleentry", "platform"]
//!
//! [bundles.roots]
//! "org.example.ui" = "~/app/plugins/org.example.ui"
//! "org.example.core" = "plugins/core"      # relative to dpix.toml
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::types::{ConfigDiagnostics, FieldPath};
use crate::reference::BundleSchemes;
use crate::translate::DirectoryLocator;

/// Bundle scheme and root configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundlesConfig {
    /// Schemes that denote bundle-relative resources.
    pub schemes: Vec<String>,

    /// Bundle name to root directory.
    pub roots: std::collections::BTreeMap<String, PathBuf>,
}

impl BundlesConfig {
    pub const SCHEMES: FieldPath = FieldPath::new("bundles.schemes");
    pub const ROOTS: FieldPath = FieldPath::new("bundles.roots");

    /// Whether a locator should be installed.
    pub fn is_hosted(&self) -> bool {
        !self.roots.is_empty()
    }

    pub fn bundle_schemes(&self) -> BundleSchemes {
        BundleSchemes::new(&self.schemes)
    }

    /// Locator over the configured roots.
    pub fn locator(&self) -> DirectoryLocator {
        self.roots
            .iter()
            .fold(
                DirectoryLocator::new().with_schemes(self.bundle_schemes()),
                |locator, (name, root)| locator.with_root(name, root.clone()),
            )
    }

    /// Make roots absolute (tilde expansion, then relative to `root`).
    pub fn normalize_paths(&mut self, root: &Path) {
        for path in self.roots.values_mut() {
            *path = crate::config::normalize_config_path(path, root);
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for scheme in &self.schemes {
            if !is_valid_scheme(scheme) {
                diag.error_with_hint(
                    Self::SCHEMES,
                    format!("`{scheme}` is not a valid URL scheme"),
                    "schemes start with a letter followed by letters, digits, `+`, `-` or `.`",
                );
            } else if scheme.eq_ignore_ascii_case("file") {
                diag.error(Self::SCHEMES, "`file` cannot be a bundle scheme");
            }
        }

        for (name, root) in &self.roots {
            if !root.is_dir() {
                diag.warn(
                    Self::ROOTS,
                    format!("root of bundle `{name}` does not exist: {}", root.display()),
                );
            }
        }
    }
}

impl Default for BundlesConfig {
    fn default() -> Self {
        Self {
            schemes: BundleSchemes::DEFAULT.iter().map(ToString::to_string).collect(),
            roots: Default::default(),
        }
    }
}

/// RFC 3986: `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
