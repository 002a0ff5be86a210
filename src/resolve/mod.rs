//! Resolution orchestration.
//!
//! Runs the fallback chain for a (reference, scale) pair and returns the
//! first candidate the [`Translator`] can satisfy:
//!
//! ```text
//! scale 100:  reference ──────────────────────────────▶ translate (Baseline)
//!
//! scale 150/200:
//!   1. TryScaleSuffix    derive(reference)            ▶ translate (HighDensity)
//!   2. TryOverridePath   derive(override(reference))  ▶ translate (HighDensity)
//!   3. Fail              NotFound { tried }
//! ```
//!
//! The chain is identical for both capabilities; only the final
//! translation step differs (`to_path` vs `open_stream`).

mod override_root;
pub mod trace;

#[cfg(test)]
mod tests;

pub use override_root::OverrideRoot;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cache::ResolutionCache;
use crate::config::Policy;
use crate::error::ResolveError;
use crate::reference::AssetReference;
use crate::scale::ScaleFactor;
use crate::suffix::SuffixRule;
use crate::translate::{AssetStream, Expectation, Translator};

use trace::TraceSpan;

// ============================================================================
// Resolved Asset
// ============================================================================

/// Concrete outcome of a successful lookup: a path or a stream, never both.
#[derive(Debug)]
pub enum ResolvedAsset {
    /// Existing file on disk.
    Path(PathBuf),
    /// Open, buffered bytes. The caller closes it by dropping.
    Stream(AssetStream),
}

impl ResolvedAsset {
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(path) => Some(path),
            Self::Stream(_) => None,
        }
    }

    pub fn into_stream(self) -> Option<AssetStream> {
        match self {
            Self::Stream(stream) => Some(stream),
            Self::Path(_) => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Stream(stream) if stream.is_placeholder())
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Stateless fallback-chain runner.
///
/// Configuration is fixed at construction; sharing one resolver between
/// threads (behind an `Arc`) is safe.
#[derive(Debug)]
pub struct Resolver {
    translator: Translator,
    policy: Policy,
    rule: SuffixRule,
    overrides: Arc<[OverrideRoot]>,
    cache: Option<ResolutionCache>,
}

impl Resolver {
    pub fn new(translator: Translator) -> Self {
        let policy = Policy::default();
        Self {
            translator,
            rule: policy.suffix_rule(),
            policy,
            overrides: Arc::from([]),
            cache: None,
        }
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.rule = policy.suffix_rule();
        self.policy = policy;
        self
    }

    pub fn with_overrides(mut self, overrides: impl Into<Arc<[OverrideRoot]>>) -> Self {
        self.overrides = overrides.into();
        self
    }

    /// Memoize path lookups per (reference, scale).
    pub fn with_cache(mut self) -> Self {
        self.cache = Some(ResolutionCache::new());
        self
    }

    #[inline]
    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    #[inline]
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    #[inline]
    pub fn overrides(&self) -> &[OverrideRoot] {
        &self.overrides
    }

    #[inline]
    pub fn cache(&self) -> Option<&ResolutionCache> {
        self.cache.as_ref()
    }

    /// High-density candidates for `reference`, in the order they are tried.
    ///
    /// Lazily derived: a candidate is only computed once the previous one
    /// has been rejected. Empty for the baseline scale, for opaque or
    /// already suffixed references, and when high-density lookups are
    /// disabled.
    pub fn candidates<'a>(
        &'a self,
        reference: &'a AssetReference,
        scale: ScaleFactor,
    ) -> impl Iterator<Item = AssetReference> + 'a {
        let enabled = self.policy.high_density && !scale.is_baseline();
        let direct = enabled
            .then(|| self.rule.derive(reference, scale))
            .flatten();
        let overridden = self
            .overrides
            .iter()
            .take_while(move |_| enabled)
            .filter_map(move |root| root.apply(reference))
            .filter_map(move |themed| self.rule.derive(&themed, scale));
        direct.into_iter().chain(overridden)
    }

    /// Resolve to an existing file path.
    pub fn resolve_path(
        &self,
        reference: &AssetReference,
        scale: ScaleFactor,
    ) -> Result<PathBuf, ResolveError> {
        match &self.cache {
            Some(cache) => cache.get_or_insert_with(reference, scale, || {
                self.run(reference, scale, |candidate, expect| {
                    self.translator.to_path(candidate, expect)
                })
            }),
            None => self.run(reference, scale, |candidate, expect| {
                self.translator.to_path(candidate, expect)
            }),
        }
    }

    /// Resolve to an open stream.
    ///
    /// With `policy.probe_format`, candidates whose header is not a known
    /// image format are skipped as [`ResolveError::UnsupportedFormat`]
    /// without a diagnostic. A header that cannot be read is reported like
    /// any other failed open.
    pub fn resolve_stream(
        &self,
        reference: &AssetReference,
        scale: ScaleFactor,
    ) -> Result<AssetStream, ResolveError> {
        self.run(reference, scale, |candidate, expect| {
            let mut stream = self.translator.open_stream(candidate, expect)?;
            if self.policy.probe_format {
                match stream.probe_format() {
                    Ok(Some(_)) => {}
                    Ok(None) => {
                        return Err(ResolveError::UnsupportedFormat {
                            reference: candidate.clone(),
                        });
                    }
                    Err(source) => {
                        let err = ResolveError::Missing {
                            reference: candidate.clone(),
                            source,
                        };
                        return self.translator.report(Err(err), candidate, expect);
                    }
                }
            }
            Ok(stream)
        })
    }

    /// Run the fallback chain with `attempt` as the translation step.
    fn run<T>(
        &self,
        reference: &AssetReference,
        scale: ScaleFactor,
        attempt: impl Fn(&AssetReference, Expectation) -> Result<T, ResolveError>,
    ) -> Result<T, ResolveError> {
        let _span = TraceSpan::start(self.policy.trace);

        if scale.is_baseline() {
            return attempt(reference, Expectation::Baseline).map_err(|err| match err {
                ResolveError::Missing { reference, source } => {
                    ResolveError::UnexpectedIo { reference, source }
                }
                other => other,
            });
        }

        let mut tried = Vec::new();
        for candidate in self.candidates(reference, scale) {
            match attempt(&candidate, Expectation::HighDensity) {
                Ok(found) => return Ok(found),
                Err(_) => tried.push(candidate),
            }
        }

        Err(ResolveError::NotFound {
            reference: reference.clone(),
            scale,
            tried,
        })
    }
}
