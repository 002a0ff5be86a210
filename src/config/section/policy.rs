//! `[policy]` section configuration.
//!
//! Resolution behavior switches.
//!
//! # Example
//!
//! ```toml
//! [policy]
//! high_density = true              # Look up @1.5x/@2x variants
//! prefer_stream = false            # acquire(): skip the path capability
//! gif_as_png = false               # Derive .png variants for .gif bases
//! log_missing_high_density = false # Warn about missing @1.5x/@2x files
//! probe_format = true              # Reject streams that are not images
//! trace = false                    # Accumulate and report lookup time
//! ```

use serde::{Deserialize, Serialize};

use crate::suffix::SuffixRule;

/// Resolution policy switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    /// Look up density variants for non-baseline scales.
    /// When disabled every 150%/200% request misses immediately.
    pub high_density: bool,

    /// Go straight to stream access in `acquire()`.
    pub prefer_stream: bool,

    /// Density variants of `.gif` assets are `.png` files.
    pub gif_as_png: bool,

    /// Report missing density variants as warnings.
    pub log_missing_high_density: bool,

    /// Sniff stream headers and skip unrecognized formats.
    pub probe_format: bool,

    /// Accumulate lookup time and report it in verbose mode.
    pub trace: bool,
}

impl Policy {
    /// Suffix rule implied by this policy.
    pub const fn suffix_rule(&self) -> SuffixRule {
        SuffixRule::new(self.gif_as_png)
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            high_density: true,
            prefer_stream: false,
            gif_as_png: false,
            log_missing_high_density: false,
            probe_format: true,
            trace: false,
        }
    }
}
