//! Resolver configuration management for `dpix.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── bundles    # [bundles]
//! │   └── policy     # [policy]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # ResolverConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section          | Purpose                                       |
//! |------------------|-----------------------------------------------|
//! | `[policy]`       | Density lookups, gif handling, logging, trace |
//! | `[[overrides]]`  | Alternate (themed) roots                      |
//! | `[bundles]`      | Bundle schemes and root directories           |

pub mod section;
pub mod types;
mod util;

pub use section::{BundlesConfig, Policy};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};
pub use util::{find_config_file, normalize_config_path};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::log;
use crate::logger::LogSink;
use crate::resolve::{OverrideRoot, Resolver};
use crate::translate::Translator;

/// Default config file name.
pub const CONFIG_FILE: &str = "dpix.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing dpix.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory relative paths are anchored at (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Resolution behavior
    #[serde(default)]
    pub policy: Policy,

    /// Alternate roots, tried in order
    #[serde(default)]
    pub overrides: Vec<OverrideRoot>,

    /// Bundle schemes and roots
    #[serde(default)]
    pub bundles: BundlesConfig,
}

impl ResolverConfig {
    pub const OVERRIDES: FieldPath = FieldPath::new("overrides");

    /// Load from an explicit file.
    ///
    /// Unknown keys are reported as warnings; validation errors fail the load.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        config.config_path = path.to_path_buf();
        let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        config.finalize(&root);

        let diag = config.validate();
        diag.print_warnings();
        diag.into_result().map_err(ConfigError::Diagnostics)?;
        Ok(config)
    }

    /// Search upward from `start` for `name` and load it.
    ///
    /// Returns the default configuration when no file is found.
    pub fn discover(name: &Path, start: &Path) -> Result<Self, ConfigError> {
        match find_config_file(name, start) {
            Some(path) => Self::load(&path),
            None => {
                let mut config = Self::default();
                config.finalize(start);
                Ok(config)
            }
        }
    }

    /// Parse configuration from TOML string
    ///
    /// Relative paths stay relative; call [`finalize`](Self::finalize) to anchor them.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Anchor relative paths at `root`.
    pub fn finalize(&mut self, root: &Path) {
        self.root = root.to_path_buf();
        self.bundles.normalize_paths(root);
    }

    /// Collect all validation errors and warnings at once.
    pub fn validate(&self) -> ConfigDiagnostics {
        let mut diag = ConfigDiagnostics::new();

        for (i, entry) in self.overrides.iter().enumerate() {
            let trimmed = |s: &str| s.trim_matches('/').len() == s.len();
            if entry.segment.is_empty() {
                diag.error(Self::OVERRIDES, format!("entry {i}: `segment` must not be empty"));
            } else if !trimmed(&entry.segment) || !trimmed(&entry.replacement) {
                diag.error_with_hint(
                    Self::OVERRIDES,
                    format!("entry {i}: leading or trailing `/` in `{}`", entry.segment),
                    "write `icons` instead of `/icons/`",
                );
            }
        }

        self.bundles.validate(&mut diag);
        diag
    }

    /// Build a resolver reporting diagnostics to `sink`.
    pub fn build_resolver(&self, sink: Arc<dyn LogSink>) -> Resolver {
        let translator = if self.bundles.is_hosted() {
            Translator::hosted(Arc::new(self.bundles.locator()))
        } else {
            Translator::standalone()
        };
        let translator = translator
            .with_sink(sink)
            .with_schemes(self.bundles.bundle_schemes())
            .with_missing_variant_log(self.policy.log_missing_high_density);

        Resolver::new(translator)
            .with_policy(self.policy)
            .with_overrides(self.overrides.clone())
    }
}

// ============================================================================
// tests
// ============================================================================
