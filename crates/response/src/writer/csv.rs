use crate::error::SaveError;
use crate::kind::WriterKind;
use crate::writer::SpreadsheetWriter;
use spreadsheet_http::output::ResponseOutput;
use std::io::Write;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Line ending written after each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineTerminator {
    #[default]
    Lf,
    Crlf,
}

/// Comma separated values writer backed by the `csv` crate.
///
/// Records are written straight into the response output as they are encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvWriter {
    rows: Vec<Vec<String>>,
    delimiter: u8,
    quote: u8,
    terminator: LineTerminator,
    bom: bool,
}

impl CsvWriter {
    pub fn new() -> Self {
        Self { rows: Vec::new(), delimiter: b',', quote: b'"', terminator: LineTerminator::Lf, bom: false }
    }

    pub fn from_rows<I, R, F>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = F>,
        F: Into<String>,
    {
        let mut writer = Self::new();
        for row in rows {
            writer.push_row(row);
        }
        writer
    }

    pub fn push_row<R, F>(&mut self, row: R)
    where
        R: IntoIterator<Item = F>,
        F: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    #[must_use]
    pub fn with_terminator(mut self, terminator: LineTerminator) -> Self {
        self.terminator = terminator;
        self
    }

    /// Prefix the output with a UTF-8 byte order mark, which Excel needs to detect UTF-8.
    #[must_use]
    pub fn with_bom(mut self, bom: bool) -> Self {
        self.bom = bom;
        self
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SpreadsheetWriter for CsvWriter {
    fn kind(&self) -> Option<WriterKind> {
        Some(WriterKind::Csv)
    }

    fn save(&mut self, output: &mut ResponseOutput) -> Result<(), SaveError> {
        if self.bom {
            output.write_all(UTF8_BOM)?;
        }

        let terminator = match self.terminator {
            LineTerminator::Lf => ::csv::Terminator::Any(b'\n'),
            LineTerminator::Crlf => ::csv::Terminator::CRLF,
        };

        let mut csv_writer = ::csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .quote(self.quote)
            .terminator(terminator)
            .flexible(true)
            .from_writer(&mut *output);

        for row in &self.rows {
            csv_writer.write_record(row)?;
        }

        csv_writer.flush()?;
        drop(csv_writer);
        output.flush()?;
        Ok(())
    }
}
