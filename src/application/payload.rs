use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;
use std::io::SeekFrom;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt};

/// A random-access byte source a payload can be written from.
///
/// Seekability matters: large payloads are chunked tail-first, reading the
/// source from the end toward offset zero, so a plain forward stream is not
/// enough.
#[async_trait]
pub trait RandomAccess: Send {
    /// Total length in bytes.
    async fn size(&mut self) -> std::io::Result<u64>;

    /// Read exactly `len` bytes starting at `pos`.
    async fn read_range(&mut self, pos: u64, len: usize) -> std::io::Result<Bytes>;
}

/// Adapter turning any seekable async reader (e.g. `tokio::fs::File`) into
/// a [`RandomAccess`] source.
pub struct SeekSource<S>(S);

impl<S> SeekSource<S> {
    pub fn new(inner: S) -> Self {
        Self(inner)
    }
}

#[async_trait]
impl<S> RandomAccess for SeekSource<S>
where
    S: AsyncRead + AsyncSeek + Send + Unpin,
{
    async fn size(&mut self) -> std::io::Result<u64> {
        self.0.seek(SeekFrom::End(0)).await
    }

    async fn read_range(&mut self, pos: u64, len: usize) -> std::io::Result<Bytes> {
        self.0.seek(SeekFrom::Start(pos)).await?;
        let mut buf = vec![0u8; len];
        self.0.read_exact(&mut buf).await?;
        Ok(Bytes::from(buf))
    }
}

/// The data handed to a write.
///
/// Text is UTF-8 encoded before size classification; bytes and sources go
/// through the same policy.
pub enum Payload {
    Bytes(Bytes),
    Text(String),
    Source(Box<dyn RandomAccess>),
}

impl Payload {
    /// Wrap a seekable async reader as a payload source.
    pub fn from_source<S>(source: S) -> Self
    where
        S: AsyncRead + AsyncSeek + Send + Unpin + 'static,
    {
        Payload::Source(Box::new(SeekSource::new(source)))
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Payload::Text(text) => f.debug_tuple("Text").field(&text.len()).finish(),
            Payload::Source(_) => f.write_str("Source(..)"),
        }
    }
}

impl From<Bytes> for Payload {
    fn from(bytes: Bytes) -> Self {
        Payload::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Bytes(Bytes::from(bytes))
    }
}

impl From<&'static [u8]> for Payload {
    fn from(bytes: &'static [u8]) -> Self {
        Payload::Bytes(Bytes::from_static(bytes))
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}
