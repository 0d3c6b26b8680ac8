//! Stream spreadsheets as HTTP download responses
//!
//! This crate turns a spreadsheet and a filename into an `http::Response` whose body is
//! produced by a spreadsheet writer while the response is being sent. The writer's MIME
//! type and extension come from a fixed table, and the filename is cleaned up into a
//! `Content-Disposition` that works for both modern and legacy clients.
//!
//! # Example
//!
//! ```no_run
//! use http::{Response, StatusCode};
//! use rust_xlsxwriter::Workbook;
//! use spreadsheet_response::{SpreadsheetBody, SpreadsheetResponse};
//!
//! fn export() -> Result<Response<SpreadsheetBody>, spreadsheet_response::Error> {
//!     let mut workbook = Workbook::new();
//!     let worksheet = workbook.add_worksheet();
//!     worksheet.write_string(0, 0, "Quarterly report").unwrap();
//!
//!     let response = SpreadsheetResponse::builder(workbook, "Report: Q3/2021")
//!         .status(StatusCode::OK)
//!         .header("x-report-id", "q3-2021")
//!         .build()?;
//!
//!     // Content-Type: application/vnd.openxmlformats-officedocument.spreadsheetml.sheet
//!     // Content-Disposition: attachment; filename="Report-Q3-2021.xlsx"; filename*=UTF-8''Report-%20Q3-2021.xlsx
//!     // Cache-Control: max-age=0
//!     Ok(response.into_http())
//! }
//! ```
//!
//! # Writers
//!
//! The default writer serializes the workbook as XLSX through `rust_xlsxwriter`.
//! [`writer::CsvWriter`] streams CSV through the `csv` crate. Any other format is served by
//! implementing [`writer::SpreadsheetWriter`]; a writer that reports no [`WriterKind`] is
//! rejected with [`Error::UnsupportedWriter`] when the response is built.
//!
//! # Streaming
//!
//! The writer runs on tokio's blocking pool the first time the body is polled, never while
//! the response is built. Its output is forwarded chunk by chunk; see
//! [`spreadsheet_http::body`] for the details and [`StreamConfig`] for tuning.

mod error;
mod response;

pub mod filename;
pub mod kind;
pub mod writer;

pub use error::Error;
pub use error::SaveError;
pub use kind::WriterDefaults;
pub use kind::WriterKind;
pub use response::SpreadsheetResponse;
pub use response::SpreadsheetResponseBuilder;
pub use spreadsheet_http::body::SpreadsheetBody;
pub use spreadsheet_http::body::StreamConfig;
pub use spreadsheet_http::disposition::DispositionType;
pub use writer::CsvWriter;
pub use writer::SpreadsheetWriter;
pub use writer::XlsxWriter;
