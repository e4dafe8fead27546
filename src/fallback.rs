//! Ordered fallback resolution of scalar fields
//!
//! Each resolver walks its candidates in decreasing precedence and picks
//! the first present value. The string variants skip
//! explicitly-present-but-empty candidates; the no-default variant fails
//! with the logical field name when nothing is left.

/// Raised when a required field has no candidate value in any layer.
#[derive(Debug, thiserror::Error)]
#[error("no value provided for required field '{field}'")]
pub struct MissingValueError {
    pub field: String,
}

/// First present boolean candidate, or the hard default.
pub fn fallback_bool(default: bool, candidates: &[Option<bool>]) -> bool {
    candidates.iter().flatten().next().copied().unwrap_or(default)
}

/// First present, non-empty string candidate, or the hard default. An
/// explicitly-present-but-empty string counts as absent, so resolved
/// fields can never silently end up empty.
pub fn fallback_string_with_default(default: &str, candidates: &[Option<&str>]) -> String {
    candidates
        .iter()
        .flatten()
        .find(|s| !s.is_empty())
        .map_or_else(|| default.to_string(), |s| (*s).to_string())
}

/// First present, non-empty string candidate. There is no default: an
/// exhausted chain is a configuration error attributed to `field`.
pub fn fallback_string(
    field: &str,
    candidates: &[Option<&str>],
) -> Result<String, MissingValueError> {
    candidates
        .iter()
        .flatten()
        .find(|s| !s.is_empty())
        .map(|s| (*s).to_string())
        .ok_or_else(|| MissingValueError {
            field: field.to_string(),
        })
}
