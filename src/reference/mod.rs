//! Logical image references.
//!
//! An [`AssetReference`] is built exactly once through a normalization
//! function ([`AssetReference::parse`] or [`AssetReference::from_path`]) and
//! never changes afterwards. Equality and hashing use the normalized string
//! only, so it is safe to use as a cache key.
//!
//! Normalization rules:
//! - scheme and host are lowercased
//! - bare filesystem paths become `file:` URLs; relative paths are made
//!   absolute against the current directory
//! - path case is preserved

mod scheme;

pub use scheme::{BundleSchemes, SchemeKind};

use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use url::{Host, Url};

/// Errors raised while constructing a reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    /// Empty or whitespace-only input. This is a caller contract violation.
    #[error("asset reference must not be empty")]
    Empty,

    #[error("malformed asset reference `{input}`")]
    Malformed {
        input: String,
        #[source]
        source: url::ParseError,
    },

    #[error("cannot express `{0}` as a file URL")]
    InvalidPath(PathBuf),
}

/// Immutable, normalized identifier of an image asset.
#[derive(Clone)]
pub struct AssetReference {
    url: Arc<Url>,
}

impl AssetReference {
    /// Normalize a URL or filesystem path into a reference.
    ///
    /// Inputs without a scheme (and single-letter "schemes" such as Windows
    /// drive letters) are treated as filesystem paths.
    pub fn parse(input: &str) -> Result<Self, ReferenceError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ReferenceError::Empty);
        }

        match Url::parse(trimmed) {
            Ok(url) if url.scheme().len() > 1 => Ok(Self::from_url(url)),
            Ok(_) | Err(url::ParseError::RelativeUrlWithoutBase) => {
                Self::from_path(Path::new(trimmed))
            }
            Err(source) => Err(ReferenceError::Malformed {
                input: trimmed.to_string(),
                source,
            }),
        }
    }

    /// Build a `file:` reference from a filesystem path.
    ///
    /// Relative paths are joined onto the current directory. Symlinks are not
    /// resolved, so the reference does not depend on the file existing.
    pub fn from_path(path: &Path) -> Result<Self, ReferenceError> {
        if path.as_os_str().is_empty() {
            return Err(ReferenceError::Empty);
        }
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .map_err(|_| ReferenceError::InvalidPath(path.to_path_buf()))?
        };
        Url::from_file_path(&absolute)
            .map(Self::from_url)
            .map_err(|()| ReferenceError::InvalidPath(absolute))
    }

    /// Wrap an already parsed URL.
    ///
    /// Hosts of non-special schemes (`bundle://Org.Example`) are lowercased
    /// so identity never depends on host case.
    pub fn from_url(mut url: Url) -> Self {
        if let Some(Host::Domain(domain)) = url.host()
            && domain.bytes().any(|b| b.is_ascii_uppercase())
        {
            let lower = domain.to_ascii_lowercase();
            // Lowercasing a valid host cannot make it invalid
            let _ = url.set_host(Some(&lower));
        }
        Self { url: Arc::new(url) }
    }

    /// Normalized string form; the identity of this reference.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    #[inline]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[inline]
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    /// Path component, still percent-encoded.
    #[inline]
    pub fn path(&self) -> &str {
        self.url.path()
    }

    #[inline]
    pub fn query(&self) -> Option<&str> {
        self.url.query()
    }

    #[inline]
    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    /// Whether the reference has a hierarchical path that can be rewritten.
    #[inline]
    pub fn is_hierarchical(&self) -> bool {
        !self.url.cannot_be_a_base()
    }

    #[inline]
    pub fn is_file(&self) -> bool {
        self.url.scheme() == "file"
    }

    /// Filesystem path for `file:` references.
    pub fn to_file_path(&self) -> Option<PathBuf> {
        if self.is_file() {
            self.url.to_file_path().ok()
        } else {
            None
        }
    }

    /// Last path segment (percent-encoded), e.g. `icon@2x.png`.
    pub fn file_name(&self) -> Option<&str> {
        self.url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|name| !name.is_empty())
    }

    /// Copy of this reference with the path replaced.
    ///
    /// Scheme, host, port and query are untouched. Returns `None` for
    /// non-hierarchical references.
    pub fn with_path(&self, path: &str) -> Option<Self> {
        if !self.is_hierarchical() {
            return None;
        }
        let mut url = (*self.url).clone();
        url.set_path(path);
        Some(Self::from_url(url))
    }
}

// ============================================================================
// Identity
// ============================================================================

impl PartialEq for AssetReference {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for AssetReference {}

impl Hash for AssetReference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl PartialOrd for AssetReference {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AssetReference {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl fmt::Debug for AssetReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetReference({})", self.as_str())
    }
}

impl fmt::Display for AssetReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetReference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for AssetReference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AssetReference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Tests
// ============================================================================
