//! Resolution error taxonomy.
//!
//! Every variant is a degradable "not found" outcome: callers decide whether
//! to fall back to the baseline asset, a placeholder, or give up. The variants
//! only differ in what they tell a human reading the diagnostics.

use std::io;

use thiserror::Error;

use crate::reference::AssetReference;
use crate::scale::ScaleFactor;

#[derive(Debug, Error)]
pub enum ResolveError {
    /// Nothing in the fallback chain exists for this scale.
    #[error("no {scale} variant of `{reference}`")]
    NotFound {
        reference: AssetReference,
        scale: ScaleFactor,
        /// Candidates that were attempted, in order
        tried: Vec<AssetReference>,
    },

    /// A single candidate is absent or could not be opened.
    #[error("`{reference}` is not available")]
    Missing {
        reference: AssetReference,
        #[source]
        source: io::Error,
    },

    /// The bytes are not a recognized image format.
    #[error("`{reference}` is not a supported image format")]
    UnsupportedFormat { reference: AssetReference },

    /// The scheme cannot be translated to a path or stream.
    #[error("cannot translate `{reference}`: {reason}")]
    Translation {
        reference: AssetReference,
        reason: String,
    },

    /// The baseline (100%) asset itself is missing.
    #[error("baseline asset `{reference}` is missing")]
    UnexpectedIo {
        reference: AssetReference,
        #[source]
        source: io::Error,
    },
}

impl ResolveError {
    /// The reference this error is about.
    pub fn reference(&self) -> &AssetReference {
        match self {
            Self::NotFound { reference, .. }
            | Self::Missing { reference, .. }
            | Self::UnsupportedFormat { reference }
            | Self::Translation { reference, .. }
            | Self::UnexpectedIo { reference, .. } => reference,
        }
    }

    /// All variants degrade to "asset not found" for resolution purposes.
    #[inline]
    pub const fn is_not_found(&self) -> bool {
        true
    }

    /// Whether this error signals a missing primary asset rather than a
    /// missing high-density variant.
    pub const fn is_unexpected(&self) -> bool {
        matches!(self, Self::UnexpectedIo { .. })
    }

    pub(crate) fn missing(reference: &AssetReference) -> Self {
        Self::Missing {
            reference: reference.clone(),
            source: io::ErrorKind::NotFound.into(),
        }
    }

    pub(crate) fn translation(reference: &AssetReference, reason: impl Into<String>) -> Self {
        Self::Translation {
            reference: reference.clone(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mentions_reference() {
        let reference = AssetReference::parse("file:///a/icon.png").unwrap();

        let err = ResolveError::missing(&reference);
        assert!(err.to_string().contains("file:///a/icon.png"));
        assert!(std::error::Error::source(&err).is_some());

        let err = ResolveError::NotFound {
            reference: reference.clone(),
            scale: ScaleFactor::Double,
            tried: vec![reference.clone()],
        };
        assert!(err.to_string().contains("200%"));
        assert!(!err.is_unexpected());
        assert_eq!(err.reference(), &reference);
    }
}
