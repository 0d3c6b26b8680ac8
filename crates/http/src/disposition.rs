//! `Content-Disposition` header construction for downloads.
//!
//! A disposition carries two filenames: a quoted `filename` that only uses printable
//! ASCII, for clients that do not understand extended parameters, and a percent-encoded
//! UTF-8 `filename*` (RFC 5987 / RFC 6266) holding the real name.
//!
//! ```
//! use spreadsheet_http::disposition::{ContentDisposition, DispositionType};
//!
//! let disposition = ContentDisposition::new(DispositionType::Attachment, "résumé.xlsx", "r-sum-.xlsx").unwrap();
//! assert_eq!(
//!     disposition.to_string(),
//!     "attachment; filename=\"r-sum-.xlsx\"; filename*=UTF-8''r%C3%A9sum%C3%A9.xlsx"
//! );
//! ```

use crate::error::DispositionError;
use http::HeaderValue;
use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

/// How the client should present the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DispositionType {
    /// Save the body as a file.
    #[default]
    Attachment,
    /// Display the body in the browser if it can.
    Inline,
}

impl DispositionType {
    pub fn as_str(self) -> &'static str {
        match self {
            DispositionType::Attachment => "attachment",
            DispositionType::Inline => "inline",
        }
    }
}

impl fmt::Display for DispositionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DispositionType {
    type Err = DispositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "attachment" => Ok(DispositionType::Attachment),
            "inline" => Ok(DispositionType::Inline),
            other => Err(DispositionError::invalid_disposition(other)),
        }
    }
}

/// A validated `Content-Disposition` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDisposition {
    disposition: DispositionType,
    filename: String,
    fallback: String,
}

impl ContentDisposition {
    /// Validates both filenames and builds the disposition.
    ///
    /// An empty `fallback` means "use `filename`", which then has to satisfy the fallback rules.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - the fallback holds anything outside printable ASCII
    /// - the fallback contains `%`
    /// - either name contains `/` or `\`
    pub fn new(
        disposition: DispositionType,
        filename: impl Into<String>,
        fallback: impl Into<String>,
    ) -> Result<Self, DispositionError> {
        let filename = filename.into();
        let mut fallback = fallback.into();
        if fallback.is_empty() {
            fallback.clone_from(&filename);
        }

        if !fallback.bytes().all(|b| (0x20..=0x7e).contains(&b)) {
            return Err(DispositionError::NonAsciiFallback);
        }

        if fallback.contains('%') {
            return Err(DispositionError::PercentInFallback);
        }

        if has_path_separator(&filename) || has_path_separator(&fallback) {
            return Err(DispositionError::PathSeparator);
        }

        Ok(Self { disposition, filename, fallback })
    }

    pub fn disposition(&self) -> DispositionType {
        self.disposition
    }

    /// The UTF-8 filename, sent as `filename*`.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The ASCII filename, sent as `filename`.
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Renders the header value.
    ///
    /// # Errors
    ///
    /// Only fails if the rendered value is rejected by [`HeaderValue`], which validated
    /// filenames never trigger.
    pub fn to_header_value(&self) -> Result<HeaderValue, DispositionError> {
        Ok(HeaderValue::from_str(&self.to_string())?)
    }
}

impl fmt::Display for ContentDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}; filename=", self.disposition)?;
        write_quoted(f, &self.fallback)?;
        f.write_str("; filename*=UTF-8''")?;
        write_percent_encoded(f, &self.filename)
    }
}

fn has_path_separator(name: &str) -> bool {
    name.contains(['/', '\\'])
}

fn write_quoted<W: fmt::Write>(dst: &mut W, value: &str) -> fmt::Result {
    dst.write_char('"')?;
    for c in value.chars() {
        if c == '"' || c == '\\' {
            dst.write_char('\\')?;
        }
        dst.write_char(c)?;
    }
    dst.write_char('"')
}

// RFC 3986 unreserved characters pass through, every other byte becomes %XX
fn write_percent_encoded<W: fmt::Write>(dst: &mut W, value: &str) -> fmt::Result {
    for b in value.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
            dst.write_char(char::from(b))?;
        } else {
            write!(dst, "%{b:02X}")?;
        }
    }
    Ok(())
}

/// Percent-encodes `value` the way the `filename*` parameter carries it.
pub fn percent_encode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    // writing into a String cannot fail
    let _ = write_percent_encoded(&mut encoded, value);
    encoded
}
