//! Supported output formats and their download defaults.

use std::fmt;

/// A spreadsheet output format this crate knows how to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriterKind {
    Xlsx,
    Xls,
    Html,
    Pdf,
    Ods,
    Csv,
}

/// MIME type and file extension served for a [`WriterKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WriterDefaults {
    pub mime_type: &'static str,
    pub extension: &'static str,
}

impl WriterKind {
    pub const ALL: [WriterKind; 6] =
        [WriterKind::Xlsx, WriterKind::Xls, WriterKind::Html, WriterKind::Pdf, WriterKind::Ods, WriterKind::Csv];

    pub const fn defaults(self) -> WriterDefaults {
        match self {
            WriterKind::Xlsx => WriterDefaults {
                mime_type: "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                extension: "xlsx",
            },
            WriterKind::Xls => WriterDefaults { mime_type: "application/vnd.ms-excel", extension: "xls" },
            WriterKind::Html => WriterDefaults { mime_type: "text/html", extension: "html" },
            WriterKind::Pdf => WriterDefaults { mime_type: "application/pdf", extension: "pdf" },
            WriterKind::Ods => {
                WriterDefaults { mime_type: "application/vnd.oasis.opendocument.spreadsheet", extension: "ods" }
            }
            WriterKind::Csv => WriterDefaults { mime_type: "text/csv", extension: "csv" },
        }
    }

    #[inline]
    pub const fn mime_type(self) -> &'static str {
        self.defaults().mime_type
    }

    #[inline]
    pub const fn extension(self) -> &'static str {
        self.defaults().extension
    }

    /// Looks a kind up by file extension, ignoring ASCII case and one leading dot.
    pub fn from_extension(extension: &str) -> Option<WriterKind> {
        let extension = extension.strip_prefix('.').unwrap_or(extension);
        WriterKind::ALL.into_iter().find(|kind| kind.extension().eq_ignore_ascii_case(extension))
    }

    fn name(self) -> &'static str {
        match self {
            WriterKind::Xlsx => "XLSX",
            WriterKind::Xls => "XLS",
            WriterKind::Html => "HTML",
            WriterKind::Pdf => "PDF",
            WriterKind::Ods => "ODS",
            WriterKind::Csv => "CSV",
        }
    }
}

impl fmt::Display for WriterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
