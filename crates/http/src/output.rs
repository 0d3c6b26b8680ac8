//! The output stream a body producer writes into.
//!
//! [`ResponseOutput`] is a blocking [`std::io::Write`] sink. Writes are gathered into
//! chunks of at most `chunk_size` bytes and forwarded to the response body over a bounded
//! channel, so a producer that outruns the connection is parked instead of buffering
//! the whole document.

use bytes::{Bytes, BytesMut};
use std::io;
use std::io::Write;
use tokio::sync::mpsc;

#[derive(Debug)]
pub struct ResponseOutput {
    sender: mpsc::Sender<Bytes>,
    buffer: BytesMut,
    chunk_size: usize,
    written: u64,
}

impl ResponseOutput {
    pub(crate) fn new(sender: mpsc::Sender<Bytes>, chunk_size: usize) -> Self {
        Self { sender, buffer: BytesMut::with_capacity(chunk_size), chunk_size, written: 0 }
    }

    /// Total number of bytes accepted so far, including bytes not yet flushed.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    fn send_chunk(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let chunk = self.buffer.split().freeze();
        self.buffer.reserve(self.chunk_size);
        self.sender
            .blocking_send(chunk)
            .map_err(|_closed| io::Error::new(io::ErrorKind::BrokenPipe, "response body has been dropped"))
    }
}

impl Write for ResponseOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        let room = self.chunk_size - self.buffer.len();
        let n = room.min(buf.len());
        self.buffer.extend_from_slice(&buf[..n]);
        self.written += n as u64;

        if self.buffer.len() >= self.chunk_size {
            self.send_chunk()?;
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.send_chunk()
    }
}
