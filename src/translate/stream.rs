//! Buffered asset streams.

use std::borrow::Cow;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read};
use std::path::Path;

use image::ImageFormat;

use crate::reference::AssetReference;

/// Where a stream's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamOrigin {
    /// Opened from a (possibly located) reference.
    Reference(AssetReference),
    /// Served by a placeholder provider.
    Placeholder,
}

/// Readable, buffered image bytes.
///
/// The caller owns the stream; dropping it closes the underlying handle.
pub struct AssetStream {
    origin: StreamOrigin,
    reader: Box<dyn BufRead + Send>,
}

impl AssetStream {
    /// Open a file on disk.
    pub fn open_file(reference: AssetReference, path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            origin: StreamOrigin::Reference(reference),
            reader: Box::new(BufReader::new(file)),
        })
    }

    /// Wrap a reader opened by a bundle locator.
    pub fn from_reader(reference: AssetReference, reader: Box<dyn BufRead + Send>) -> Self {
        Self {
            origin: StreamOrigin::Reference(reference),
            reader,
        }
    }

    /// Serve bytes from memory.
    pub fn from_bytes(origin: StreamOrigin, bytes: impl Into<Cow<'static, [u8]>>) -> Self {
        Self {
            origin,
            reader: Box::new(Cursor::new(bytes.into())),
        }
    }

    #[inline]
    pub fn origin(&self) -> &StreamOrigin {
        &self.origin
    }

    #[inline]
    pub fn is_placeholder(&self) -> bool {
        matches!(self.origin, StreamOrigin::Placeholder)
    }

    /// Sniff the image format from the buffered header.
    ///
    /// Does not consume any bytes. Returns `Ok(None)` when the header does
    /// not match a known image signature.
    pub fn probe_format(&mut self) -> io::Result<Option<ImageFormat>> {
        let header = self.reader.fill_buf()?;
        Ok(image::guess_format(header).ok())
    }

    /// Drain the stream into memory.
    pub fn into_bytes(mut self) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.reader.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

impl Read for AssetStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl BufRead for AssetStream {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.reader.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt);
    }
}

impl fmt::Debug for AssetStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetStream")
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}
