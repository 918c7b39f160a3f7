use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors raised while building, submitting, or settling a cycle attempt.
///
/// All of these are caught at the attempt boundary: they abort the one
/// attempt that raised them and never the sibling attempts of the same tick.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("quote failed for {from} -> {to}: {reason}")]
    QuoteFailed {
        from: String,
        to: String,
        reason: String,
    },

    #[error("no adapter registered for venue {0}")]
    UnknownVenue(String),

    #[error("failed to build swap instructions: {0}")]
    SwapBuildFailed(String),

    #[error("transaction rejected by ledger: {reason}")]
    SubmissionRejected { reason: String },

    #[error("transaction not found after {polls} confirmation polls: {signature}")]
    ConfirmationTimeout { signature: String, polls: u32 },

    #[error("no {token} account for settlement balance check")]
    MissingAccount { token: String },

    #[error("could not recover leg outputs from transaction logs: {0}")]
    LogParse(String),
}

/// Errors in the pool/route data itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("unknown venue prefix in pool id '{0}'")]
    UnknownVenuePrefix(String),

    #[error("malformed pool id '{0}': expected VENUE_TOKENA_TOKENB")]
    MalformedPoolId(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Pool(#[from] PoolError),

    /// Startup-phase inconsistency (e.g. the feed has no initial snapshot).
    /// The only error class allowed to terminate the process.
    #[error("inconsistent state: {0}")]
    StateInconsistency(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
