use thiserror::Error;

// -----------------------------------------------------------------------------
// Result

/// Alias for `Result<T, ResolveError>`, used throughout the resolver.
pub type Result<T, E = ResolveError> = core::result::Result<T, E>;

// -----------------------------------------------------------------------------
// ResolveError

/// A fatal resolution failure.
///
/// Every variant aborts the current resolution call; nothing is retried
/// internally. Callers are expected to surface these as configuration
/// errors, not to recover from them.
///
/// Non-fatal anomalies are recorded as [`Warning`]s on the session instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResolveError {
    /// The shape of a type cannot be mapped to XML at all.
    ///
    /// Detected when the descriptor table first sees the type, but raised
    /// lazily the first time the mapping graph actually needs to
    /// materialize it. `trail` records the member chain that reached the
    /// type, innermost last.
    #[error("type `{type_name}` cannot be mapped: {reason}")]
    UnsupportedType {
        type_name: String,
        reason: String,
        trail: Vec<String>,
    },

    /// A derived type redeclares a base member with an incompatible
    /// declared type or accessor shape.
    #[error("member `{member}` of `{derived}` redeclares `{base}::{member}` with an incompatible XML shape")]
    InvalidOverride {
        derived: String,
        base: String,
        member: String,
    },

    /// Two distinct definitions claim the same (name, namespace) key in
    /// one scope.
    #[error("duplicate definition for `{name}` in namespace `{namespace}`")]
    DuplicateDefinition { name: String, namespace: String },

    /// A declared name is not legal as an XML qualified name, e.g. an
    /// attribute name with a prefix other than the reserved `xml:`.
    #[error("`{name}` is not a valid XML attribute name")]
    InvalidAccessorName { name: String },
}

// -----------------------------------------------------------------------------
// Warning

/// Classifies a [`Warning`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum WarningKind {
    /// An identical definition was inserted twice and merged to one node.
    DuplicateMerged,
    /// A derived member matched its declaring base member and reuses the
    /// base mapping instead of creating a duplicate.
    MemberHidden,
    /// A declared default value was kept on a type that never omits
    /// values, so it will not round-trip.
    DefaultIgnored,
}

/// A non-fatal anomaly recorded during resolution.
///
/// Warnings accumulate on the session and never abort a resolve call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    kind: WarningKind,
    detail: String,
}

impl Warning {
    #[inline]
    pub(crate) fn new(kind: WarningKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    /// Returns the warning classification.
    #[inline]
    pub const fn kind(&self) -> WarningKind {
        self.kind
    }

    /// Returns the human-readable detail text.
    #[inline]
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl core::fmt::Display for Warning {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.detail)
    }
}
