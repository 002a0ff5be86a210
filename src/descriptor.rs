//! Asset descriptors and their capability providers.
//!
//! An [`AssetDescriptor`] pairs an [`AssetReference`] with the [`Resolver`]
//! that knows how to find its variants. It hands out two capabilities:
//!
//! | Provider               | Trait            | Yields           |
//! |------------------------|------------------|------------------|
//! | `ScaledPathProvider`   | [`PathSource`]   | existing path    |
//! | `ScaledStreamProvider` | [`StreamSource`] | open byte stream |
//!
//! Providers are created fresh on every request and never compare equal.
//! [`AssetDescriptor::acquire`] combines both capabilities with an optional
//! placeholder fallback.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::ResolveError;
use crate::placeholder::PlaceholderProvider;
use crate::reference::AssetReference;
use crate::resolve::{ResolvedAsset, Resolver};
use crate::scale::ScaleFactor;
use crate::translate::AssetStream;

// ============================================================================
// Capabilities
// ============================================================================

/// Capability: locate the asset as a file on disk.
pub trait PathSource {
    fn image_path(&self, scale: ScaleFactor) -> Result<PathBuf, ResolveError>;
}

/// Capability: open the asset as a byte stream.
pub trait StreamSource {
    fn image_stream(&self, scale: ScaleFactor) -> Result<AssetStream, ResolveError>;
}

/// What [`AssetDescriptor::acquire`] does when every capability misses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Degradation {
    /// Return the miss.
    #[default]
    Strict,
    /// Serve the placeholder instead.
    Placeholder,
}

// ============================================================================
// Descriptor
// ============================================================================

/// A reference bound to a resolver.
///
/// Equality and hashing use the reference only, so two descriptors for the
/// same asset are interchangeable as map keys regardless of which variant
/// they later resolve to.
#[derive(Clone)]
pub struct AssetDescriptor {
    reference: AssetReference,
    resolver: Arc<Resolver>,
}

impl AssetDescriptor {
    pub fn new(reference: AssetReference, resolver: Arc<Resolver>) -> Self {
        Self {
            reference,
            resolver,
        }
    }

    #[inline]
    pub fn reference(&self) -> &AssetReference {
        &self.reference
    }

    #[inline]
    pub fn resolver(&self) -> &Arc<Resolver> {
        &self.resolver
    }

    /// A new path provider. Every call returns a distinct instance.
    pub fn path_provider(&self) -> ScaledPathProvider {
        ScaledPathProvider {
            reference: self.reference.clone(),
            resolver: Arc::clone(&self.resolver),
        }
    }

    /// A new stream provider. Every call returns a distinct instance.
    pub fn stream_provider(&self) -> ScaledStreamProvider {
        ScaledStreamProvider {
            reference: self.reference.clone(),
            resolver: Arc::clone(&self.resolver),
        }
    }

    /// Obtain the asset at `scale` through whichever capability succeeds.
    ///
    /// Exactly one capability runs: the path capability when the reference
    /// maps onto the filesystem (and `policy.prefer_stream` is off), the
    /// stream capability otherwise. A failure is therefore reported once.
    pub fn acquire(
        &self,
        scale: ScaleFactor,
        degradation: Degradation,
        placeholder: &dyn PlaceholderProvider,
    ) -> Result<ResolvedAsset, ResolveError> {
        let use_path = !self.resolver.policy().prefer_stream
            && self.resolver.translator().maps_to_file(&self.reference);

        let result = if use_path {
            self.path_provider()
                .image_path(scale)
                .map(ResolvedAsset::Path)
        } else {
            self.stream_provider()
                .image_stream(scale)
                .map(ResolvedAsset::Stream)
        };

        match (result, degradation) {
            (Err(_), Degradation::Placeholder) => {
                Ok(ResolvedAsset::Stream(placeholder.placeholder()))
            }
            (result, _) => result,
        }
    }
}

impl PartialEq for AssetDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.reference == other.reference
    }
}

impl Eq for AssetDescriptor {}

impl Hash for AssetDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.reference.hash(state);
    }
}

impl fmt::Debug for AssetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AssetDescriptor")
            .field(&self.reference.as_str())
            .finish()
    }
}

// ============================================================================
// Providers
// ============================================================================

/// Path capability for one descriptor.
pub struct ScaledPathProvider {
    reference: AssetReference,
    resolver: Arc<Resolver>,
}

impl PathSource for ScaledPathProvider {
    fn image_path(&self, scale: ScaleFactor) -> Result<PathBuf, ResolveError> {
        self.resolver.resolve_path(&self.reference, scale)
    }
}

/// Stream capability for one descriptor.
pub struct ScaledStreamProvider {
    reference: AssetReference,
    resolver: Arc<Resolver>,
}

impl StreamSource for ScaledStreamProvider {
    fn image_stream(&self, scale: ScaleFactor) -> Result<AssetStream, ResolveError> {
        self.resolver.resolve_stream(&self.reference, scale)
    }
}
