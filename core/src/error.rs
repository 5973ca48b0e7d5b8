use thiserror::Error;

/// Errors raised while consuming raw trace lines.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("no events in input")]
    EmptyInput,
    #[error("malformed stamp at line {line}: {reason}")]
    MalformedStamp { line: usize, reason: String },
    #[error("duplicate event for host {host:?} at time {time} (line {line})")]
    DuplicateEvent {
        line: usize,
        host: String,
        time: u64,
    },
}

impl ParseError {
    /// Zero-based input line the error points at, when it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::EmptyInput => None,
            Self::MalformedStamp { line, .. } | Self::DuplicateEvent { line, .. } => Some(*line),
        }
    }
}

/// Lifecycle violations on the builder. Each operation is legal in exactly
/// one phase; calling it from any other phase yields one of these.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    #[error("log already parsed")]
    AlreadyParsed,
    #[error("no log parsed yet")]
    NotParsed,
    #[error("edges already generated")]
    EdgesAlreadyGenerated,
    #[error("edges not generated yet")]
    EdgesNotGenerated,
}

/// Top-level error for the build pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    State(#[from] StateError),
}
