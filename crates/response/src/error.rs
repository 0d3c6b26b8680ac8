use spreadsheet_http::BoxError;
use spreadsheet_http::error::DispositionError;
use std::io;
use thiserror::Error;

/// Errors raised while building a [`crate::SpreadsheetResponse`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("the writer {writer} is not supported")]
    UnsupportedWriter { writer: &'static str },

    #[error("invalid content disposition: {source}")]
    Disposition {
        #[from]
        source: DispositionError,
    },

    #[error("invalid header: {source}")]
    InvalidHeader {
        #[from]
        source: http::Error,
    },
}

impl Error {
    pub fn unsupported_writer(writer: &'static str) -> Self {
        Self::UnsupportedWriter { writer }
    }
}

/// Errors raised by a writer while saving into the response body.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("xlsx error: {source}")]
    Xlsx {
        #[from]
        source: rust_xlsxwriter::XlsxError,
    },

    #[error("csv error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("writer error: {source}")]
    Other { source: BoxError },
}

impl SaveError {
    pub fn other<E: Into<BoxError>>(e: E) -> Self {
        Self::Other { source: e.into() }
    }
}
