use crate::BoxError;
use http::header::InvalidHeaderValue;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispositionError {
    #[error("the disposition must be either \"attachment\" or \"inline\", got: {value}")]
    InvalidDisposition { value: String },

    #[error("the filename fallback must only contain printable ascii characters")]
    NonAsciiFallback,

    #[error("the filename fallback cannot contain the \"%\" character")]
    PercentInFallback,

    #[error("the filename and the fallback cannot contain the \"/\" and \"\\\" characters")]
    PathSeparator,

    #[error("invalid header value: {source}")]
    InvalidHeaderValue {
        #[from]
        source: InvalidHeaderValue,
    },
}

impl DispositionError {
    pub fn invalid_disposition<S: ToString>(str: S) -> Self {
        Self::InvalidDisposition { value: str.to_string() }
    }
}

/// Errors surfaced by a streaming body as its final frame.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("body producer error: {source}")]
    Producer { source: BoxError },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("body producer panicked")]
    Panicked,

    #[error("body producer was cancelled")]
    Cancelled,

    #[error("no tokio runtime available to run the body producer")]
    NoRuntime,
}

impl StreamError {
    pub fn producer<E: Into<BoxError>>(e: E) -> Self {
        Self::Producer { source: e.into() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
