//! HTTP plumbing for streamed file downloads
//!
//! This crate provides the two pieces a download response needs from the HTTP side:
//! a `Content-Disposition` header that is safe for every client, and a response body
//! that runs a synchronous producer lazily and streams whatever it writes.
//!
//! # Features
//!
//! - `Content-Disposition` rendering with an ASCII fallback and an RFC 5987 `filename*`
//! - Lazy bodies: the producer runs when the body is first polled, never at construction
//! - Bounded-channel backpressure between the producer and the connection
//! - Producers run on tokio's blocking pool so they never stall the executor
//!
//! # Example
//!
//! ```no_run
//! use std::io::Write;
//! use http::Response;
//! use spreadsheet_http::body::SpreadsheetBody;
//! use spreadsheet_http::disposition::{ContentDisposition, DispositionType};
//!
//! let disposition = ContentDisposition::new(DispositionType::Attachment, "report.csv", "")?;
//! let body = SpreadsheetBody::new(|output| {
//!     output.write_all(b"a,b\n1,2\n")?;
//!     Ok(())
//! });
//!
//! let response = Response::builder()
//!     .header(http::header::CONTENT_TYPE, "text/csv")
//!     .header(http::header::CONTENT_DISPOSITION, disposition.to_header_value()?)
//!     .body(body)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Architecture
//!
//! - [`disposition`]: `Content-Disposition` validation and rendering
//! - [`body`]: the lazy [`body::SpreadsheetBody`] and its [`body::StreamConfig`]
//! - [`output`]: [`output::ResponseOutput`], the `std::io::Write` sink handed to producers
//! - [`error`]: [`error::DispositionError`] and [`error::StreamError`]

pub mod body;
pub mod disposition;
pub mod error;
pub mod output;

/// Error type producers may return; it is carried through [`error::StreamError::Producer`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
