//! Protocol translation.
//!
//! Turns an [`AssetReference`] into a concrete filesystem path or a buffered
//! byte stream. Two modes:
//!
//! - **standalone**: no locator; only `file:` references translate
//! - **hosted**: a [`BundleLocator`] maps bundle references to the
//!   filesystem first; unmapped references are tried as-is. Stream access
//!   also lets the locator open non-`file:` references itself
//!
//! Paths are only handed out after an existence check. Failures come back as
//! typed [`ResolveError`]s; diagnostics are emitted according to the
//! caller's [`Expectation`].

mod locator;
mod stream;

pub use locator::{BundleLocator, DirectoryLocator, LocatedReader};
pub use stream::{AssetStream, StreamOrigin};

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::ResolveError;
use crate::logger::{LogSink, Severity, TerminalSink};
use crate::reference::{AssetReference, BundleSchemes, SchemeKind};
use crate::suffix::has_density_suffix;

/// How the caller regards a failed translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    /// The primary (100%) asset; a miss is always reported.
    Baseline,
    /// A derived density variant; a miss is normal.
    HighDensity,
}

/// Reference to filesystem/stream translator.
#[derive(Clone)]
pub struct Translator {
    locator: Option<Arc<dyn BundleLocator>>,
    schemes: BundleSchemes,
    sink: Arc<dyn LogSink>,
    log_missing_high_density: bool,
}

impl Translator {
    /// Translator without a locator (file-scheme only).
    pub fn standalone() -> Self {
        Self {
            locator: None,
            schemes: BundleSchemes::default(),
            sink: Arc::new(TerminalSink),
            log_missing_high_density: false,
        }
    }

    /// Translator that consults `locator` before touching the filesystem.
    pub fn hosted(locator: Arc<dyn BundleLocator>) -> Self {
        Self {
            locator: Some(locator),
            ..Self::standalone()
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_schemes(mut self, schemes: BundleSchemes) -> Self {
        self.schemes = schemes;
        self
    }

    /// Report missing `@1.5x`/`@2x` files as warnings.
    pub fn with_missing_variant_log(mut self, enabled: bool) -> Self {
        self.log_missing_high_density = enabled;
        self
    }

    #[inline]
    pub fn is_hosted(&self) -> bool {
        self.locator.is_some()
    }

    #[inline]
    pub fn schemes(&self) -> &BundleSchemes {
        &self.schemes
    }

    #[inline]
    pub fn sink(&self) -> &Arc<dyn LogSink> {
        &self.sink
    }

    /// Resolve `reference` to an existing file.
    pub fn to_path(
        &self,
        reference: &AssetReference,
        expect: Expectation,
    ) -> Result<PathBuf, ResolveError> {
        let result = self
            .locate_file(reference)
            .and_then(|(located, path)| existing_file(&located, path));
        self.report(result, reference, expect)
    }

    /// Open `reference` as a buffered stream.
    ///
    /// In hosted mode the locator may serve non-`file:` references directly;
    /// otherwise the reference is located on disk and opened.
    pub fn open_stream(
        &self,
        reference: &AssetReference,
        expect: Expectation,
    ) -> Result<AssetStream, ResolveError> {
        let result = match self.open_hosted(reference) {
            Some(result) => result,
            None => self.locate_file(reference).and_then(|(located, path)| {
                let path = existing_file(&located, path)?;
                AssetStream::open_file(located.clone(), &path).map_err(|source| {
                    ResolveError::Missing {
                        reference: located,
                        source,
                    }
                })
            }),
        };
        self.report(result, reference, expect)
    }

    /// Whether `reference` maps onto the filesystem. Never logs.
    pub fn maps_to_file(&self, reference: &AssetReference) -> bool {
        self.locate_file(reference).is_ok()
    }

    /// Let the locator serve a non-`file:` reference as bytes.
    fn open_hosted(
        &self,
        reference: &AssetReference,
    ) -> Option<Result<AssetStream, ResolveError>> {
        let locator = self.locator.as_ref()?;
        if self.schemes.classify(reference) == SchemeKind::File {
            return None;
        }
        let opened = locator.open(reference)?;
        Some(
            opened
                .map(|reader| AssetStream::from_reader(reference.clone(), reader))
                .map_err(|source| ResolveError::Missing {
                    reference: reference.clone(),
                    source,
                }),
        )
    }

    /// Map a reference onto a `file:` reference and its filesystem path.
    ///
    /// Only bundle schemes are handed to the locator.
    fn locate_file(
        &self,
        reference: &AssetReference,
    ) -> Result<(AssetReference, PathBuf), ResolveError> {
        let located = match self.schemes.classify(reference) {
            SchemeKind::File | SchemeKind::Other => reference.clone(),
            SchemeKind::Opaque => {
                return Err(ResolveError::translation(reference, "opaque reference"));
            }
            SchemeKind::Bundle => match &self.locator {
                Some(locator) => locator
                    .locate(reference)
                    .unwrap_or_else(|| reference.clone()),
                None => {
                    return Err(ResolveError::translation(
                        reference,
                        "bundle scheme needs a bundle locator",
                    ));
                }
            },
        };

        match located.to_file_path() {
            Some(path) => Ok((located, path)),
            None => Err(ResolveError::translation(
                reference,
                format!("no filesystem mapping for `{}:`", located.scheme()),
            )),
        }
    }

    /// Emit diagnostics for a failed translation and pass the result through.
    pub(crate) fn report<T>(
        &self,
        result: Result<T, ResolveError>,
        requested: &AssetReference,
        expect: Expectation,
    ) -> Result<T, ResolveError> {
        if let Err(err) = &result {
            match expect {
                Expectation::Baseline => {
                    let cause = std::error::Error::source(err);
                    self.sink.log(Severity::Error, &err.to_string(), cause);
                }
                Expectation::HighDensity => {
                    if self.log_missing_high_density && has_density_suffix(requested.path()) {
                        self.sink.log(
                            Severity::Warning,
                            &format!("High-resolution image missing: {requested}"),
                            std::error::Error::source(err),
                        );
                    }
                }
            }
        }
        result
    }
}

fn existing_file(located: &AssetReference, path: PathBuf) -> Result<PathBuf, ResolveError> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(ResolveError::missing(located))
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::standalone()
    }
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("hosted", &self.is_hosted())
            .field("schemes", &self.schemes)
            .field("log_missing_high_density", &self.log_missing_high_density)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
