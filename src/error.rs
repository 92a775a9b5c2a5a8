use thiserror::Error;

// ---------------------------------------------------------------------------
// Parse-level errors
// ---------------------------------------------------------------------------

/// Fatal parse failures. Malformed individual lines are *not* errors — they
/// are skipped during parsing and only reduce the number of records produced.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The input bytes could not be decoded as text.
    #[error("input could not be decoded as UTF-8 text")]
    Decode(#[from] std::str::Utf8Error),

    /// Parsing succeeded but produced zero particle records. Surfaced only
    /// through [`ParticleSet::require_non_empty`](crate::ParticleSet::require_non_empty);
    /// whether an empty result is fatal is the caller's decision.
    #[error("no particle data found in file")]
    EmptyResult,
}
