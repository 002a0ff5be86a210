//! `resolve` and `derive` command implementations.
//!
//! References are resolved in parallel against one shared resolver; output
//! order always matches input order.

use std::io::Read;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use serde::Serialize;

use dpix::translate::StreamOrigin;
use dpix::{
    AssetDescriptor, AssetReference, BuiltinPlaceholder, Degradation, PlaceholderProvider,
    ResolveError, ResolvedAsset, Resolver, ScaleFactor, StreamSource, log,
};

use super::args::ResolveArgs;
use super::plural_count;

/// Outcome for a single reference
#[derive(Debug, Serialize)]
pub struct ResolveOutcome {
    pub reference: String,
    pub scale: u32,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tried: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Found,
    Placeholder,
    Missing,
    Invalid,
}

impl ResolveOutcome {
    fn new(reference: impl Into<String>, scale: ScaleFactor, status: Status) -> Self {
        Self {
            reference: reference.into(),
            scale: scale.percent(),
            status,
            path: None,
            bytes: None,
            format: None,
            tried: Vec::new(),
            error: None,
        }
    }
}

/// Execute resolve command
pub fn run_resolve(args: &ResolveArgs, resolver: Resolver) -> Result<()> {
    let resolver = Arc::new(if args.cache {
        resolver.with_cache()
    } else {
        resolver
    });

    let outcomes: Vec<ResolveOutcome> = args
        .refs
        .par_iter()
        .map(|input| resolve_one(input, args, &resolver))
        .collect();

    if args.json {
        let formatted = if args.pretty {
            serde_json::to_string_pretty(&outcomes)?
        } else {
            serde_json::to_string(&outcomes)?
        };
        println!("{formatted}");
    } else {
        for outcome in &outcomes {
            print_outcome(outcome);
        }
    }

    let missing = outcomes
        .iter()
        .filter(|o| matches!(o.status, Status::Missing | Status::Invalid))
        .count();
    if missing > 0 {
        bail!(
            "{} of {} unresolved",
            plural_count(missing, "reference"),
            outcomes.len()
        );
    }
    Ok(())
}

fn resolve_one(input: &str, args: &ResolveArgs, resolver: &Arc<Resolver>) -> ResolveOutcome {
    let reference = match AssetReference::parse(input) {
        Ok(reference) => reference,
        Err(err) => {
            let mut outcome = ResolveOutcome::new(input, args.scale, Status::Invalid);
            outcome.error = Some(err.to_string());
            return outcome;
        }
    };

    let descriptor = AssetDescriptor::new(reference, Arc::clone(resolver));
    let degradation = if args.placeholder {
        Degradation::Placeholder
    } else {
        Degradation::Strict
    };

    let result = if args.stream {
        match descriptor.stream_provider().image_stream(args.scale) {
            Ok(stream) => Ok(ResolvedAsset::Stream(stream)),
            Err(_) if args.placeholder => {
                Ok(ResolvedAsset::Stream(BuiltinPlaceholder.placeholder()))
            }
            Err(err) => Err(err),
        }
    } else {
        descriptor.acquire(args.scale, degradation, &BuiltinPlaceholder)
    };

    let name = descriptor.reference().as_str();
    match result {
        Ok(asset) => describe_asset(name, args.scale, asset),
        Err(err) => describe_miss(name, args.scale, &err),
    }
}

fn describe_asset(name: &str, scale: ScaleFactor, asset: ResolvedAsset) -> ResolveOutcome {
    let status = if asset.is_placeholder() {
        Status::Placeholder
    } else {
        Status::Found
    };
    let mut outcome = ResolveOutcome::new(name, scale, status);

    match asset {
        ResolvedAsset::Path(path) => outcome.path = Some(path.display().to_string()),
        ResolvedAsset::Stream(mut stream) => {
            if let StreamOrigin::Reference(source) = stream.origin() {
                outcome.path = Some(source.to_string());
            }
            outcome.format = stream
                .probe_format()
                .ok()
                .flatten()
                .map(|format| format!("{format:?}").to_ascii_lowercase());

            let mut bytes = Vec::new();
            match stream.read_to_end(&mut bytes) {
                Ok(len) => outcome.bytes = Some(len),
                Err(err) => {
                    outcome.status = Status::Missing;
                    outcome.error = Some(err.to_string());
                }
            }
        }
    }
    outcome
}

fn describe_miss(name: &str, scale: ScaleFactor, err: &ResolveError) -> ResolveOutcome {
    let mut outcome = ResolveOutcome::new(name, scale, Status::Missing);
    if let ResolveError::NotFound { tried, .. } = err {
        outcome.tried = tried.iter().map(ToString::to_string).collect();
    }
    outcome.error = Some(err.to_string());
    outcome
}

fn print_outcome(outcome: &ResolveOutcome) {
    match outcome.status {
        Status::Found | Status::Placeholder => {
            let target = outcome.path.as_deref().unwrap_or("<placeholder>");
            match outcome.bytes {
                Some(bytes) => log!("found"; "{} -> {} ({} bytes)", outcome.reference, target, bytes),
                None => log!("found"; "{} -> {}", outcome.reference, target),
            }
        }
        Status::Missing | Status::Invalid => {
            log!("error"; "{}", outcome.error.as_deref().unwrap_or(&outcome.reference));
            for candidate in &outcome.tried {
                log!("resolve"; "  tried {}", candidate);
            }
        }
    }
}

/// Execute derive command
pub fn run_derive(input: &str, scale: ScaleFactor, resolver: &Resolver) -> Result<()> {
    let reference =
        AssetReference::parse(input).with_context(|| format!("invalid reference `{input}`"))?;

    let candidates: Vec<_> = resolver.candidates(&reference, scale).collect();
    if candidates.is_empty() {
        log!("resolve"; "no {} candidate for {}", scale, reference);
        return Ok(());
    }
    for candidate in candidates {
        println!("{candidate}");
    }
    Ok(())
}
