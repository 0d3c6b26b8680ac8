//! The spreadsheet download response.
//!
//! [`SpreadsheetResponse`] is a plain response descriptor: a status, the download headers,
//! and a lazy [`SpreadsheetBody`] that runs the chosen writer once the server starts
//! sending. It converts into an `http::Response`, which any `http_body`-based server can
//! write out.

use crate::error::Error;
use crate::filename::{enforce_extension, sanitize, sanitize_fallback};
use crate::kind::WriterKind;
use crate::writer::{SpreadsheetWriter, XlsxWriter, resolve_kind};
use http::header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, Response, StatusCode};
use rust_xlsxwriter::Workbook;
use spreadsheet_http::body::{SpreadsheetBody, StreamConfig};
use spreadsheet_http::disposition::{ContentDisposition, DispositionType};
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug)]
pub struct SpreadsheetResponse {
    status: StatusCode,
    headers: HeaderMap,
    kind: WriterKind,
    primary_filename: String,
    fallback_filename: String,
    body: SpreadsheetBody,
}

impl SpreadsheetResponse {
    /// Builds a response with every default: status 200, XLSX output, `attachment`.
    ///
    /// # Errors
    ///
    /// See [`SpreadsheetResponseBuilder::build`].
    pub fn new(workbook: Workbook, filename: impl Into<String>) -> Result<Self, Error> {
        Self::builder(workbook, filename).build()
    }

    pub fn builder(workbook: Workbook, filename: impl Into<String>) -> SpreadsheetResponseBuilder {
        SpreadsheetResponseBuilder::new(workbook, filename.into())
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn kind(&self) -> WriterKind {
        self.kind
    }

    /// The filename sent in `filename*`.
    pub fn primary_filename(&self) -> &str {
        &self.primary_filename
    }

    /// The ASCII filename sent in `filename`.
    pub fn fallback_filename(&self) -> &str {
        &self.fallback_filename
    }

    pub fn into_parts(self) -> (StatusCode, HeaderMap, SpreadsheetBody) {
        (self.status, self.headers, self.body)
    }

    pub fn into_http(self) -> Response<SpreadsheetBody> {
        let (status, headers, body) = self.into_parts();
        let mut response = Response::new(body);
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}

impl From<SpreadsheetResponse> for Response<SpreadsheetBody> {
    fn from(response: SpreadsheetResponse) -> Self {
        response.into_http()
    }
}

pub struct SpreadsheetResponseBuilder {
    workbook: Workbook,
    filename: String,
    status: StatusCode,
    writer: Option<Box<dyn SpreadsheetWriter + Send>>,
    disposition: DispositionType,
    extra_headers: Result<HeaderMap, http::Error>,
    stream_config: StreamConfig,
}

impl SpreadsheetResponseBuilder {
    fn new(workbook: Workbook, filename: String) -> Self {
        Self {
            workbook,
            filename,
            status: StatusCode::OK,
            writer: None,
            disposition: DispositionType::Attachment,
            extra_headers: Ok(HeaderMap::new()),
            stream_config: StreamConfig::default(),
        }
    }

    #[must_use]
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Serializes with `writer` instead of the default XLSX writer over the workbook.
    #[must_use]
    pub fn writer<W>(mut self, writer: W) -> Self
    where
        W: SpreadsheetWriter + Send + 'static,
    {
        self.writer = Some(Box::new(writer));
        self
    }

    #[must_use]
    pub fn disposition(mut self, disposition: DispositionType) -> Self {
        self.disposition = disposition;
        self
    }

    /// Sets an extra header. It replaces a computed header of the same name, as does a
    /// later call with the same name.
    ///
    /// Conversion errors are reported by [`build`](Self::build).
    #[must_use]
    pub fn header<K, V>(mut self, key: K, value: V) -> Self
    where
        HeaderName: TryFrom<K>,
        <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
    {
        self.extra_headers = self.extra_headers.and_then(|mut headers| {
            let name = HeaderName::try_from(key).map_err(Into::into)?;
            let value = HeaderValue::try_from(value).map_err(Into::into)?;
            headers.insert(name, value);
            Ok(headers)
        });
        self
    }

    /// Merges a whole header map; every name in `headers` replaces what was set before.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        if let Ok(extra_headers) = self.extra_headers.as_mut() {
            extra_headers.extend(headers);
        }
        self
    }

    #[must_use]
    pub fn stream_config(mut self, stream_config: StreamConfig) -> Self {
        self.stream_config = stream_config;
        self
    }

    /// Resolves the writer, computes the download headers and wires the lazy body.
    ///
    /// The writer is not invoked here; it runs once the body is first polled.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - the writer produces no served format ([`Error::UnsupportedWriter`])
    /// - an extra header name or value was invalid ([`Error::InvalidHeader`])
    pub fn build(self) -> Result<SpreadsheetResponse, Error> {
        let extra_headers = self.extra_headers?;
        let mut writer = match self.writer {
            Some(writer) => writer,
            None => Box::new(XlsxWriter::new(self.workbook)),
        };

        let kind = resolve_kind(writer.as_ref()).inspect_err(|e| warn!(cause = %e, "reject spreadsheet response"))?;
        let defaults = kind.defaults();

        let primary_filename = enforce_extension(&sanitize(&self.filename), defaults.extension);
        let fallback_filename = enforce_extension(&sanitize_fallback(&self.filename), defaults.extension);
        let disposition = ContentDisposition::new(self.disposition, primary_filename.as_str(), fallback_filename.as_str())?;

        let mut headers = HeaderMap::with_capacity(3 + extra_headers.len());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(defaults.mime_type));
        headers.insert(CONTENT_DISPOSITION, disposition.to_header_value()?);
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
        headers.extend(extra_headers);

        let body = SpreadsheetBody::with_config(
            move |output| {
                writer.save(output)?;
                Ok(())
            },
            self.stream_config,
        );

        debug!(
            %kind,
            status = self.status.as_u16(),
            filename = %primary_filename,
            fallback = %fallback_filename,
            "spreadsheet response built"
        );

        Ok(SpreadsheetResponse { status: self.status, headers, kind, primary_filename, fallback_filename, body })
    }
}

impl fmt::Debug for SpreadsheetResponseBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpreadsheetResponseBuilder")
            .field("filename", &self.filename)
            .field("status", &self.status)
            .field("custom_writer", &self.writer.is_some())
            .field("disposition", &self.disposition)
            .field("extra_headers", &self.extra_headers)
            .field("stream_config", &self.stream_config)
            .finish_non_exhaustive()
    }
}
