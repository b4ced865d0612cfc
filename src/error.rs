//! Error types for the docpipe library.

use thiserror::Error;

/// Main error type for the docpipe library.
///
/// Every failure in the pipeline maps to exactly one of these variants.
/// Nothing is retried internally; the binary turns any variant into a
/// non-zero exit with the Display message.
#[derive(Error, Debug)]
pub enum DocpipeError {
    /// No usable identity source was available.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The local input document is absent, unreadable, or empty.
    #[error("cannot read input document {path}: {reason}")]
    Input { path: String, reason: String },

    /// Job creation was rejected or the submission transport failed.
    #[error("job submission failed: {0}")]
    Submission(String),

    /// Namespace or object retrieval failed for a reason other than absence.
    #[error("object storage error: {0}")]
    Storage(String),

    /// The expected output object is absent. Either the extraction job has
    /// not finished writing its result, or the derived key does not match
    /// the service's output-path scheme.
    #[error("output object not found at {container}/{key}: the extraction job has not finished writing, or the derived key is wrong")]
    NotFound { container: String, key: String },

    /// The fetched output blob is not a well-formed JSON object.
    #[error("cannot parse extraction output: {0}")]
    Parse(String),
}

/// Result type for the docpipe library.
pub type Result<T> = std::result::Result<T, DocpipeError>;
