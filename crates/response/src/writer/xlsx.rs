use crate::error::SaveError;
use crate::kind::WriterKind;
use crate::writer::SpreadsheetWriter;
use rust_xlsxwriter::Workbook;
use spreadsheet_http::output::ResponseOutput;
use std::fmt;
use std::io::Write;
use tracing::debug;

/// Office Open XML writer backed by `rust_xlsxwriter`.
///
/// An xlsx file is a zip archive whose central directory is written last, so the library
/// needs a seekable sink. The archive is staged in memory and then copied into the
/// response in body-sized chunks.
pub struct XlsxWriter {
    workbook: Workbook,
}

impl XlsxWriter {
    pub fn new(workbook: Workbook) -> Self {
        Self { workbook }
    }

    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    pub fn workbook_mut(&mut self) -> &mut Workbook {
        &mut self.workbook
    }

    pub fn into_workbook(self) -> Workbook {
        self.workbook
    }
}

impl From<Workbook> for XlsxWriter {
    fn from(workbook: Workbook) -> Self {
        Self::new(workbook)
    }
}

impl SpreadsheetWriter for XlsxWriter {
    fn kind(&self) -> Option<WriterKind> {
        Some(WriterKind::Xlsx)
    }

    fn save(&mut self, output: &mut ResponseOutput) -> Result<(), SaveError> {
        let archive = self.workbook.save_to_buffer()?;
        debug!(bytes = archive.len(), "xlsx archive staged");

        output.write_all(&archive)?;
        output.flush()?;
        Ok(())
    }
}

impl fmt::Debug for XlsxWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XlsxWriter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use spreadsheet_http::body::{SpreadsheetBody, StreamConfig};

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_save_streams_zip_archive() {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "region").unwrap();
        worksheet.write_number(1, 0, 42).unwrap();

        let mut writer = XlsxWriter::from(workbook);
        let body = SpreadsheetBody::with_config(
            move |output| {
                writer.save(output)?;
                Ok(())
            },
            StreamConfig::new().with_chunk_size(512),
        );

        let bytes = body.collect().await.unwrap().to_bytes();
        assert!(bytes.len() > 512);
        assert_eq!(&bytes[..4], b"PK\x03\x04");
    }

    #[test]
    fn test_kind() {
        let writer = XlsxWriter::new(Workbook::new());
        assert_eq!(writer.kind(), Some(WriterKind::Xlsx));
        assert!(writer.type_name().ends_with("XlsxWriter"));
    }
}
