//! Fallback chain tests.

use std::fs;
use std::io::{self, BufReader, Cursor, Read};
use std::sync::Arc;

use tempfile::TempDir;

use super::*;
use crate::logger::{MemorySink, Severity};
use crate::translate::{BundleLocator, DirectoryLocator, LocatedReader, StreamOrigin};

const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

struct Fixture {
    dir: TempDir,
    sink: Arc<MemorySink>,
}

impl Fixture {
    fn new(files: &[&str]) -> Self {
        let dir = TempDir::new().unwrap();
        for rel in files {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, PNG_HEADER).unwrap();
        }
        Self {
            dir,
            sink: Arc::new(MemorySink::new()),
        }
    }

    fn reference(&self, rel: &str) -> AssetReference {
        AssetReference::from_path(&self.dir.path().join(rel)).unwrap()
    }

    fn translator(&self) -> Translator {
        Translator::standalone().with_sink(self.sink.clone())
    }

    fn resolver(&self) -> Resolver {
        Resolver::new(self.translator())
    }

    fn hosted(&self, locator: impl BundleLocator + 'static) -> Resolver {
        Resolver::new(Translator::hosted(Arc::new(locator)).with_sink(self.sink.clone()))
    }
}

/// Serves assets that have no filesystem location.
struct InMemoryBundle {
    assets: Vec<(AssetReference, &'static [u8])>,
}

impl InMemoryBundle {
    fn new(assets: &[(&str, &'static [u8])]) -> Self {
        Self {
            assets: assets
                .iter()
                .map(|(input, bytes)| (AssetReference::parse(input).unwrap(), *bytes))
                .collect(),
        }
    }
}

impl BundleLocator for InMemoryBundle {
    fn locate(&self, _reference: &AssetReference) -> Option<AssetReference> {
        None
    }

    fn open(&self, reference: &AssetReference) -> Option<io::Result<LocatedReader>> {
        let (_, bytes) = self.assets.iter().find(|(known, _)| known == reference)?;
        Some(Ok(Box::new(Cursor::new(*bytes))))
    }
}

/// Opens successfully, then fails on the first read.
struct UnreadableBundle;

struct FailingRead;

impl Read for FailingRead {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("device detached"))
    }
}

impl BundleLocator for UnreadableBundle {
    fn locate(&self, _reference: &AssetReference) -> Option<AssetReference> {
        None
    }

    fn open(&self, _reference: &AssetReference) -> Option<io::Result<LocatedReader>> {
        Some(Ok(Box::new(BufReader::new(FailingRead))))
    }
}

// ============================================================================
// Path resolution
// ============================================================================

#[test]
fn test_baseline_returns_reference_itself() {
    let fx = Fixture::new(&["icons/save.png", "icons/save@2x.png"]);
    let path = fx
        .resolver()
        .resolve_path(&fx.reference("icons/save.png"), ScaleFactor::Baseline)
        .unwrap();
    assert_eq!(path, fx.dir.path().join("icons/save.png"));
    assert!(fx.sink.is_empty());
}

#[test]
fn test_one_and_half_picks_matching_suffix() {
    let fx = Fixture::new(&["icons/save.png", "icons/save@1.5x.png", "icons/save@2x.png"]);
    let resolver = fx.resolver();
    let reference = fx.reference("icons/save.png");

    let path = resolver
        .resolve_path(&reference, ScaleFactor::OneAndHalf)
        .unwrap();
    assert_eq!(path, fx.dir.path().join("icons/save@1.5x.png"));

    let path = resolver.resolve_path(&reference, ScaleFactor::Double).unwrap();
    assert_eq!(path, fx.dir.path().join("icons/save@2x.png"));
}

#[test]
fn test_one_and_half_only_generates_its_own_candidate() {
    let fx = Fixture::new(&["icons/save.png", "icons/save@1.5x.png"]);
    let resolver = fx.resolver();
    let reference = fx.reference("icons/save.png");

    let candidates: Vec<_> = resolver
        .candidates(&reference, ScaleFactor::OneAndHalf)
        .collect();
    assert_eq!(candidates, vec![fx.reference("icons/save@1.5x.png")]);
    assert!(candidates.iter().all(|c| !c.as_str().contains("@2x")));

    let path = resolver
        .resolve_path(&reference, ScaleFactor::OneAndHalf)
        .unwrap();
    assert_eq!(path, fx.dir.path().join("icons/save@1.5x.png"));
    assert!(fx.sink.is_empty());
}

#[test]
fn test_suffixed_reference_is_not_suffixed_again() {
    let fx = Fixture::new(&["icons/save@2x.png", "modern/icons/save@2x@2x.png"]);
    let resolver = fx
        .resolver()
        .with_overrides(vec![OverrideRoot::new("icons", "modern/icons")]);
    let reference = fx.reference("icons/save@2x.png");

    for scale in ScaleFactor::ALL {
        assert_eq!(resolver.candidates(&reference, scale).count(), 0);
    }
    let err = resolver
        .resolve_path(&reference, ScaleFactor::Double)
        .unwrap_err();
    assert!(matches!(err, ResolveError::NotFound { ref tried, .. } if tried.is_empty()));

    // The suffixed file itself still resolves as a baseline asset
    let path = resolver
        .resolve_path(&reference, ScaleFactor::Baseline)
        .unwrap();
    assert_eq!(path, fx.dir.path().join("icons/save@2x.png"));
}

#[test]
fn test_missing_variant_is_not_found_without_logging() {
    let fx = Fixture::new(&["icons/save.png"]);
    let reference = fx.reference("icons/save.png");

    let err = fx
        .resolver()
        .resolve_path(&reference, ScaleFactor::Double)
        .unwrap_err();
    match err {
        ResolveError::NotFound {
            reference: original,
            scale,
            tried,
        } => {
            assert_eq!(original, reference);
            assert_eq!(scale, ScaleFactor::Double);
            assert_eq!(tried, vec![fx.reference("icons/save@2x.png")]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(fx.sink.is_empty());
}

#[test]
fn test_missing_baseline_logs_exactly_once() {
    let fx = Fixture::new(&[]);
    let err = fx
        .resolver()
        .resolve_path(&fx.reference("icons/gone.png"), ScaleFactor::Baseline)
        .unwrap_err();
    assert!(err.is_unexpected());
    assert_eq!(fx.sink.len(), 1);
    assert_eq!(fx.sink.count(Severity::Error), 1);
}

#[test]
fn test_missing_variant_warning_when_enabled() {
    let fx = Fixture::new(&["icons/save.png"]);
    let resolver = Resolver::new(fx.translator().with_missing_variant_log(true));
    assert!(resolver
        .resolve_path(&fx.reference("icons/save.png"), ScaleFactor::Double)
        .is_err());

    let records = fx.sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].severity, Severity::Warning);
    assert!(records[0].message.contains("save@2x.png"));
}

#[test]
fn test_high_density_disabled() {
    let fx = Fixture::new(&["icons/save.png", "icons/save@2x.png"]);
    let policy = Policy {
        high_density: false,
        ..Policy::default()
    };
    let resolver = fx.resolver().with_policy(policy);
    let reference = fx.reference("icons/save.png");

    assert_eq!(resolver.candidates(&reference, ScaleFactor::Double).count(), 0);
    let err = resolver
        .resolve_path(&reference, ScaleFactor::Double)
        .unwrap_err();
    assert!(matches!(err, ResolveError::NotFound { ref tried, .. } if tried.is_empty()));
}

#[test]
fn test_gif_as_png_policy() {
    let fx = Fixture::new(&["anim/spinner.gif", "anim/spinner@2x.png"]);
    let reference = fx.reference("anim/spinner.gif");

    assert!(fx
        .resolver()
        .resolve_path(&reference, ScaleFactor::Double)
        .is_err());

    let policy = Policy {
        gif_as_png: true,
        ..Policy::default()
    };
    let path = fx
        .resolver()
        .with_policy(policy)
        .resolve_path(&reference, ScaleFactor::Double)
        .unwrap();
    assert_eq!(path, fx.dir.path().join("anim/spinner@2x.png"));
}

// ============================================================================
// Overrides
// ============================================================================

#[test]
fn test_override_root_fallback() {
    let fx = Fixture::new(&["icons/save.png", "modern/icons/save@2x.png"]);
    let resolver = fx
        .resolver()
        .with_overrides(vec![OverrideRoot::new("icons", "modern/icons")]);
    let reference = fx.reference("icons/save.png");

    let candidates: Vec<_> = resolver.candidates(&reference, ScaleFactor::Double).collect();
    assert_eq!(
        candidates,
        vec![
            fx.reference("icons/save@2x.png"),
            fx.reference("modern/icons/save@2x.png"),
        ]
    );

    let path = resolver.resolve_path(&reference, ScaleFactor::Double).unwrap();
    assert_eq!(path, fx.dir.path().join("modern/icons/save@2x.png"));
}

#[test]
fn test_direct_variant_wins_over_override() {
    let fx = Fixture::new(&["icons/save@2x.png", "modern/icons/save@2x.png"]);
    let resolver = fx
        .resolver()
        .with_overrides(vec![OverrideRoot::new("icons", "modern/icons")]);
    let path = resolver
        .resolve_path(&fx.reference("icons/save.png"), ScaleFactor::Double)
        .unwrap();
    assert_eq!(path, fx.dir.path().join("icons/save@2x.png"));
}

#[test]
fn test_override_not_applied_at_baseline() {
    let fx = Fixture::new(&["modern/icons/save.png"]);
    let resolver = fx
        .resolver()
        .with_overrides(vec![OverrideRoot::new("icons", "modern/icons")]);
    assert!(resolver
        .resolve_path(&fx.reference("icons/save.png"), ScaleFactor::Baseline)
        .is_err());
}

#[test]
fn test_opaque_reference_has_no_candidates() {
    let fx = Fixture::new(&[]);
    let resolver = fx
        .resolver()
        .with_overrides(vec![OverrideRoot::new("icons", "modern/icons")]);
    let reference = AssetReference::parse("memory:icons/save.png").unwrap();
    for scale in ScaleFactor::ALL {
        assert_eq!(resolver.candidates(&reference, scale).count(), 0);
    }
}

// ============================================================================
// Bundles
// ============================================================================

#[test]
fn test_bundle_reference_through_locator() {
    let fx = Fixture::new(&["ui/icons/save.png", "ui/icons/save@2x.png"]);
    let locator = DirectoryLocator::new().with_root("org.example.ui", fx.dir.path().join("ui"));
    let resolver = Resolver::new(Translator::hosted(Arc::new(locator)).with_sink(fx.sink.clone()));
    let reference = AssetReference::parse("bundle://org.example.ui/icons/save.png").unwrap();

    let path = resolver.resolve_path(&reference, ScaleFactor::Double).unwrap();
    assert_eq!(path, fx.dir.path().join("ui/icons/save@2x.png"));
    assert!(fx.sink.is_empty());
}

#[test]
fn test_locator_only_sees_bundle_schemes() {
    let fx = Fixture::new(&["ui/icons/save.png", "ui/icons/save@2x.png"]);
    let locator = DirectoryLocator::new().with_root("org.example.ui", fx.dir.path().join("ui"));
    let resolver = fx.hosted(locator);

    let web = AssetReference::parse("https://org.example.ui/icons/save.png").unwrap();
    let err = resolver
        .resolve_path(&web, ScaleFactor::Baseline)
        .unwrap_err();
    assert!(matches!(err, ResolveError::Translation { .. }));
    assert_eq!(fx.sink.count(Severity::Error), 1);

    assert!(resolver.resolve_path(&web, ScaleFactor::Double).is_err());
    assert!(resolver.resolve_stream(&web, ScaleFactor::Baseline).is_err());
}

#[test]
fn test_standalone_bundle_reference_fails_cleanly() {
    let fx = Fixture::new(&[]);
    let reference = AssetReference::parse("bundle://org.example.ui/icons/save.png").unwrap();
    let err = fx
        .resolver()
        .resolve_path(&reference, ScaleFactor::Baseline)
        .unwrap_err();
    assert!(matches!(err, ResolveError::Translation { .. }));
}

// ============================================================================
// Streams
// ============================================================================

#[test]
fn test_stream_resolution() {
    let fx = Fixture::new(&["icons/save.png", "icons/save@2x.png"]);
    let reference = fx.reference("icons/save.png");
    let mut stream = fx
        .resolver()
        .resolve_stream(&reference, ScaleFactor::Double)
        .unwrap();
    assert_eq!(
        stream.origin(),
        &StreamOrigin::Reference(fx.reference("icons/save@2x.png"))
    );

    let mut bytes = Vec::new();
    stream.read_to_end(&mut bytes).unwrap();
    assert_eq!(bytes, PNG_HEADER);
}

#[test]
fn test_stream_skips_unrecognized_bytes() {
    let fx = Fixture::new(&["icons/save.png"]);
    fs::write(fx.dir.path().join("icons/save@2x.png"), b"not an image").unwrap();
    let reference = fx.reference("icons/save.png");

    let err = fx
        .resolver()
        .resolve_stream(&reference, ScaleFactor::Double)
        .unwrap_err();
    assert!(matches!(err, ResolveError::NotFound { .. }));

    let policy = Policy {
        probe_format: false,
        ..Policy::default()
    };
    assert!(fx
        .resolver()
        .with_policy(policy)
        .resolve_stream(&reference, ScaleFactor::Double)
        .is_ok());
}

#[test]
fn test_baseline_stream_reports_unsupported_format() {
    let fx = Fixture::new(&[]);
    fs::create_dir_all(fx.dir.path().join("icons")).unwrap();
    fs::write(fx.dir.path().join("icons/readme.png"), b"plain text").unwrap();
    let err = fx
        .resolver()
        .resolve_stream(&fx.reference("icons/readme.png"), ScaleFactor::Baseline)
        .unwrap_err();
    assert!(matches!(err, ResolveError::UnsupportedFormat { .. }));
}

#[test]
fn test_directory_is_not_a_stream() {
    let fx = Fixture::new(&[]);
    fs::create_dir_all(fx.dir.path().join("icons/save.png")).unwrap();

    let err = fx
        .resolver()
        .resolve_stream(&fx.reference("icons/save.png"), ScaleFactor::Baseline)
        .unwrap_err();
    assert!(err.is_unexpected());
    assert_eq!(fx.sink.len(), 1);
    assert_eq!(fx.sink.count(Severity::Error), 1);
}

#[test]
fn test_unreadable_baseline_stream_is_logged() {
    let fx = Fixture::new(&[]);
    let reference = AssetReference::parse("memory:splash.png").unwrap();

    let err = fx
        .hosted(UnreadableBundle)
        .resolve_stream(&reference, ScaleFactor::Baseline)
        .unwrap_err();
    assert!(err.is_unexpected());
    let records = fx.sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].severity, Severity::Error);
    assert_eq!(records[0].cause.as_deref(), Some("device detached"));
}

#[test]
fn test_host_served_streams_without_files() {
    let fx = Fixture::new(&[]);
    let resolver = fx.hosted(InMemoryBundle::new(&[
        ("memory:splash.png", PNG_HEADER),
        ("bundle://org.example.ui/icons/save@2x.png", PNG_HEADER),
    ]));

    let splash = AssetReference::parse("memory:splash.png").unwrap();
    let stream = resolver
        .resolve_stream(&splash, ScaleFactor::Baseline)
        .unwrap();
    assert_eq!(stream.origin(), &StreamOrigin::Reference(splash.clone()));
    assert_eq!(stream.into_bytes().unwrap(), PNG_HEADER);
    assert!(resolver.resolve_path(&splash, ScaleFactor::Baseline).is_err());

    let save = AssetReference::parse("bundle://org.example.ui/icons/save.png").unwrap();
    let stream = resolver.resolve_stream(&save, ScaleFactor::Double).unwrap();
    assert_eq!(
        stream.origin(),
        &StreamOrigin::Reference(
            AssetReference::parse("bundle://org.example.ui/icons/save@2x.png").unwrap()
        )
    );
}

// ============================================================================
// Cache and concurrency
// ============================================================================

#[test]
fn test_cached_resolution_matches_uncached() {
    let fx = Fixture::new(&["icons/save.png", "icons/save@2x.png"]);
    let reference = fx.reference("icons/save.png");
    let cached = fx.resolver().with_cache();

    for scale in ScaleFactor::ALL {
        let expected = fx.resolver().resolve_path(&reference, scale).ok();
        assert_eq!(cached.resolve_path(&reference, scale).ok(), expected);
        assert_eq!(cached.resolve_path(&reference, scale).ok(), expected);
    }
    assert_eq!(cached.cache().map(ResolutionCache::len), Some(3));
}

#[test]
fn test_cached_miss_survives_new_file() {
    let fx = Fixture::new(&["icons/save.png"]);
    let reference = fx.reference("icons/save.png");
    let resolver = fx.resolver().with_cache();

    assert!(resolver.resolve_path(&reference, ScaleFactor::Double).is_err());
    fs::write(fx.dir.path().join("icons/save@2x.png"), PNG_HEADER).unwrap();
    assert!(resolver.resolve_path(&reference, ScaleFactor::Double).is_err());

    resolver.cache().unwrap().invalidate(&reference);
    assert!(resolver.resolve_path(&reference, ScaleFactor::Double).is_ok());
}

#[test]
fn test_concurrent_resolution_is_consistent() {
    let fx = Fixture::new(&["icons/save.png", "icons/save@1.5x.png"]);
    let resolver = fx.resolver().with_cache();
    let reference = fx.reference("icons/save.png");
    let expected: Vec<_> = ScaleFactor::ALL
        .iter()
        .map(|&scale| resolver.resolve_path(&reference, scale).ok())
        .collect();

    std::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for _ in 0..16 {
                    let got: Vec<_> = ScaleFactor::ALL
                        .iter()
                        .map(|&scale| resolver.resolve_path(&reference, scale).ok())
                        .collect();
                    assert_eq!(got, expected);
                }
            });
        }
    });
}

#[test]
fn test_resolved_asset_accessors() {
    let path = ResolvedAsset::Path(PathBuf::from("/a/icon.png"));
    assert_eq!(path.as_path(), Some(Path::new("/a/icon.png")));
    assert!(!path.is_placeholder());
    assert!(path.into_stream().is_none());

    let stream = ResolvedAsset::Stream(AssetStream::from_bytes(
        StreamOrigin::Placeholder,
        PNG_HEADER,
    ));
    assert!(stream.is_placeholder());
    assert!(stream.as_path().is_none());
}
