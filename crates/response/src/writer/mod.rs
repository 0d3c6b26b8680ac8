//! Spreadsheet writers and the lookup of their download defaults.
//!
//! A [`SpreadsheetWriter`] serializes a document into the response output stream. The
//! format work itself belongs to the wrapped libraries; writers only declare which
//! [`WriterKind`] they produce and push bytes into the [`ResponseOutput`].
//!
//! Formats without a built-in writer (XLS, ODS, HTML, PDF) are served by implementing the
//! trait and returning the matching kind:
//!
//! ```
//! use std::io::Write;
//! use spreadsheet_http::output::ResponseOutput;
//! use spreadsheet_response::writer::SpreadsheetWriter;
//! use spreadsheet_response::{SaveError, WriterKind};
//!
//! struct HtmlTable(String);
//!
//! impl SpreadsheetWriter for HtmlTable {
//!     fn kind(&self) -> Option<WriterKind> {
//!         Some(WriterKind::Html)
//!     }
//!
//!     fn save(&mut self, output: &mut ResponseOutput) -> Result<(), SaveError> {
//!         output.write_all(self.0.as_bytes())?;
//!         Ok(())
//!     }
//! }
//! ```

mod csv;
mod xlsx;

pub use self::csv::CsvWriter;
pub use self::csv::LineTerminator;
pub use self::xlsx::XlsxWriter;

use crate::error::{Error, SaveError};
use crate::kind::{WriterDefaults, WriterKind};
use spreadsheet_http::output::ResponseOutput;

/// Serializes a spreadsheet into an HTTP response body.
#[cfg_attr(test, mockall::automock)]
pub trait SpreadsheetWriter {
    /// The format this writer produces, `None` when it is not one of the served formats.
    fn kind(&self) -> Option<WriterKind>;

    /// Name used to identify the writer in errors.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Writes the whole document into `output`.
    ///
    /// Called at most once, from a blocking thread, when the response body is first polled.
    ///
    /// # Errors
    ///
    /// Any failure of the underlying library or of the output stream. It ends the
    /// response body with an error; nothing is retried.
    fn save(&mut self, output: &mut ResponseOutput) -> Result<(), SaveError>;
}

/// Resolves the kind a writer produces.
///
/// # Errors
///
/// [`Error::UnsupportedWriter`], naming the writer's type, when it produces no served format.
pub fn resolve_kind(writer: &dyn SpreadsheetWriter) -> Result<WriterKind, Error> {
    writer.kind().ok_or_else(|| Error::unsupported_writer(writer.type_name()))
}

/// Resolves the MIME type and extension a writer's output is served with.
///
/// # Errors
///
/// [`Error::UnsupportedWriter`], naming the writer's type, when it produces no served format.
pub fn resolve_defaults(writer: &dyn SpreadsheetWriter) -> Result<WriterDefaults, Error> {
    resolve_kind(writer).map(WriterKind::defaults)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NumbersWriter;

    impl SpreadsheetWriter for NumbersWriter {
        fn kind(&self) -> Option<WriterKind> {
            None
        }

        fn save(&mut self, _output: &mut ResponseOutput) -> Result<(), SaveError> {
            Ok(())
        }
    }

    #[test]
    fn test_resolve_every_kind() {
        for kind in WriterKind::ALL {
            let mut writer = MockSpreadsheetWriter::new();
            writer.expect_kind().return_const(Some(kind));

            assert_eq!(resolve_kind(&writer).unwrap(), kind);
            assert_eq!(resolve_defaults(&writer).unwrap(), kind.defaults());
        }
    }

    #[test]
    fn test_unsupported_writer_is_named() {
        let err = resolve_defaults(&NumbersWriter).unwrap_err();

        match &err {
            Error::UnsupportedWriter { writer } => assert!(writer.ends_with("NumbersWriter"), "{writer}"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().starts_with("the writer "));
        assert!(err.to_string().ends_with("NumbersWriter is not supported"));
    }

    #[test]
    fn test_unsupported_mock_writer() {
        let mut writer = MockSpreadsheetWriter::new();
        writer.expect_kind().return_const(None::<WriterKind>);
        writer.expect_type_name().return_const("OdtWriter");

        let err = resolve_kind(&writer).unwrap_err();
        assert_eq!(err.to_string(), "the writer OdtWriter is not supported");
    }

    #[test]
    fn test_builtin_writers_resolve() {
        let xlsx = XlsxWriter::new(rust_xlsxwriter::Workbook::new());
        assert_eq!(resolve_kind(&xlsx).unwrap(), WriterKind::Xlsx);

        let csv = CsvWriter::new();
        assert_eq!(resolve_kind(&csv).unwrap(), WriterKind::Csv);
    }
}
