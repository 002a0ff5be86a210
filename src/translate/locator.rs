//! Bundle/package locators.
//!
//! A locator maps a bundle-relative reference onto a filesystem-equivalent
//! `file:` reference. Its presence switches the translator into hosted mode.
//! Hosts that keep assets outside the filesystem (archives, memory) serve
//! them through [`BundleLocator::open`] instead.

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;
use rustc_hash::FxHashMap;

use crate::reference::{AssetReference, BundleSchemes, SchemeKind};

/// Reader handed out by [`BundleLocator::open`].
pub type LocatedReader = Box<dyn BufRead + Send>;

/// Host-provided mapping from abstract references to real locations.
pub trait BundleLocator: Send + Sync {
    /// Map a bundle reference to a filesystem-equivalent reference.
    ///
    /// `None` means "no mapping"; the reference is then used as-is.
    fn locate(&self, reference: &AssetReference) -> Option<AssetReference>;

    /// Open a non-`file:` reference directly.
    ///
    /// Consulted by stream access before falling back to [`locate`](Self::locate).
    /// `None` means the host does not serve this reference as bytes.
    fn open(&self, _reference: &AssetReference) -> Option<io::Result<LocatedReader>> {
        None
    }
}

impl<F> BundleLocator for F
where
    F: Fn(&AssetReference) -> Option<AssetReference> + Send + Sync,
{
    fn locate(&self, reference: &AssetReference) -> Option<AssetReference> {
        self(reference)
    }
}

/// Locator backed by a table of bundle roots on disk.
///
/// The bundle name is taken from the host when present, otherwise from the
/// first path segment (a leading `plugin` segment is skipped):
///
/// ```text
/// bundle://org.example.ui/icons/save.png         -> <root>/icons/save.png
/// platform:/plugin/org.example.ui/icons/save.png -> <root>/icons/save.png
/// bundleentry:/org.example.ui/icons/save.png     -> <root>/icons/save.png
/// ```
///
/// Only references whose scheme is one of its [`BundleSchemes`] are mapped.
#[derive(Debug, Clone, Default)]
pub struct DirectoryLocator {
    roots: FxHashMap<String, PathBuf>,
    schemes: BundleSchemes,
}

impl DirectoryLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schemes(mut self, schemes: BundleSchemes) -> Self {
        self.schemes = schemes;
        self
    }

    /// Register (or replace) the root directory of a bundle.
    ///
    /// Bundle names are matched case-insensitively, like reference hosts.
    pub fn with_root(mut self, bundle: impl AsRef<str>, root: impl Into<PathBuf>) -> Self {
        self.roots
            .insert(bundle.as_ref().to_ascii_lowercase(), root.into());
        self
    }

    pub fn root(&self, bundle: &str) -> Option<&Path> {
        self.roots
            .get(&bundle.to_ascii_lowercase())
            .map(PathBuf::as_path)
    }

    /// Filesystem path a bundle reference maps to, if any.
    ///
    /// Rejects `..` segments and encoded separators so a reference can never
    /// escape its root.
    pub fn map_path(&self, reference: &AssetReference) -> Option<PathBuf> {
        if self.schemes.classify(reference) != SchemeKind::Bundle {
            return None;
        }
        let mut segments = reference.url().path_segments()?.filter(|s| !s.is_empty());

        let bundle = match reference.host().filter(|h| !h.is_empty()) {
            Some(host) => host.to_string(),
            None => {
                let first = segments.next()?;
                let name = if first == "plugin" { segments.next()? } else { first };
                decode_segment(name).to_ascii_lowercase()
            }
        };

        let mut path = self.roots.get(&bundle)?.clone();
        for segment in segments {
            let decoded = decode_segment(segment);
            match decoded.as_str() {
                "." => {}
                ".." => return None,
                s if s.contains(['/', '\\']) => return None,
                _ => path.push(decoded),
            }
        }
        Some(path)
    }
}

impl BundleLocator for DirectoryLocator {
    fn locate(&self, reference: &AssetReference) -> Option<AssetReference> {
        let path = self.map_path(reference)?;
        AssetReference::from_path(&path).ok()
    }
}

fn decode_segment(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}
