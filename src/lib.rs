//! dpix - scale-aware image asset resolver.
//!
//! Given a logical image reference and a display scale (100%, 150%, 200%),
//! find the best matching asset: the `@1.5x`/`@2x` variant next to the
//! original, the same variant under an override root, or a definitive miss.
//!
//! ```ignore
//! use dpix::{AssetReference, ResolverConfig, ScaleFactor, TerminalSink};
//!
//! let config = ResolverConfig::discover(Path::new("dpix.toml"), &cwd)?;
//! let resolver = config.build_resolver(Arc::new(TerminalSink));
//! let icon = AssetReference::parse("bundle://org.example.ui/icons/save.png")?;
//! let path = resolver.resolve_path(&icon, ScaleFactor::Double)?;
//! ```
//!
//! # Module Structure
//!
//! ```text
//! reference/   AssetReference normalization, scheme classification
//! scale        ScaleFactor
//! suffix       @1.5x / @2x candidate derivation
//! translate/   reference -> path/stream, bundle locators
//! resolve/     fallback chain, override roots, trace
//! cache        (reference, scale) memoization
//! descriptor   AssetDescriptor + path/stream capabilities
//! placeholder  stand-in imagery for misses
//! config/      dpix.toml
//! logger       log!/debug! macros, diagnostic sinks
//! ```

pub mod logger;

pub mod cache;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod placeholder;
pub mod reference;
pub mod resolve;
pub mod scale;
pub mod suffix;
pub mod translate;

pub use cache::ResolutionCache;
pub use config::{ConfigError, Policy, ResolverConfig};
pub use descriptor::{AssetDescriptor, Degradation, PathSource, StreamSource};
pub use error::ResolveError;
pub use logger::{LogSink, MemorySink, Severity, TerminalSink};
pub use placeholder::{BuiltinPlaceholder, PlaceholderProvider};
pub use reference::{AssetReference, ReferenceError};
pub use resolve::{OverrideRoot, ResolvedAsset, Resolver};
pub use scale::ScaleFactor;
pub use suffix::SuffixRule;
pub use translate::{AssetStream, BundleLocator, DirectoryLocator, Expectation, Translator};
