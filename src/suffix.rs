//! Density-suffix derivation.
//!
//! Maps a base reference and a non-baseline scale to exactly one candidate
//! with the density suffix inserted before the extension:
//!
//! ```text
//! file:///icons/save.png?v=2   150% -> file:///icons/save@1.5x.png?v=2
//! file:///icons/save.png       200% -> file:///icons/save@2x.png
//! file:///icons/spin.gif       200% -> file:///icons/spin@2x.png   (gif_as_png)
//! ```
//!
//! Derivation is pure and happens once: an already suffixed reference yields
//! no candidate. Only the last path segment is rewritten; scheme, host, port
//! and query are carried over unchanged.

use crate::reference::AssetReference;
use crate::scale::ScaleFactor;

/// Every density suffix a derived name can carry.
const DENSITY_SUFFIXES: [&str; 2] = ["@1.5x", "@2x"];

/// Suffix derivation settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuffixRule {
    /// Derive `.png` variants for `.gif` base assets.
    ///
    /// High-density variants of legacy/animated icons ship pre-rendered as PNG.
    pub gif_as_png: bool,
}

impl SuffixRule {
    pub const fn new(gif_as_png: bool) -> Self {
        Self { gif_as_png }
    }

    /// Derive the density variant of `reference` for `scale`.
    ///
    /// Returns `None` for the baseline scale, for opaque references, for
    /// names without an extension and for names that already carry a
    /// density suffix.
    pub fn derive(&self, reference: &AssetReference, scale: ScaleFactor) -> Option<AssetReference> {
        if !reference.is_hierarchical() || has_density_suffix(reference.path()) {
            return None;
        }
        let path = self.derive_path(reference.path(), scale)?;
        reference.with_path(&path)
    }

    /// String-level derivation on a bare path (no query).
    pub fn derive_path(&self, path: &str, scale: ScaleFactor) -> Option<String> {
        let suffix = scale.suffix()?;

        let name_start = path.rfind('/').map_or(0, |i| i + 1);
        let dot = name_start + path[name_start..].rfind('.')?;
        let (lead, tail) = path.split_at(dot);

        let tail = if self.gif_as_png && tail.eq_ignore_ascii_case(".gif") {
            ".png"
        } else {
            tail
        };

        Some(format!("{lead}{suffix}{tail}"))
    }
}

/// Check whether a path stem ends in a density suffix.
///
/// Accepts both a bare stem (`icon@2x`) and a full file path
/// (`/a/icon@2x.png`).
pub fn has_density_suffix(path: &str) -> bool {
    let name_start = path.rfind('/').map_or(0, |i| i + 1);
    let name = &path[name_start..];
    let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
    DENSITY_SUFFIXES
        .iter()
        .any(|suffix| stem.ends_with(suffix) || name.ends_with(suffix))
}
