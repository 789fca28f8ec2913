use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::payload::Payload;
use crate::application::writer::{BlobWriter, WriteError};
use crate::domain::charset::{self, DEFAULT_CHARSET};
use crate::domain::chunk::Body;
use crate::domain::errors::DomainError;

/// A stored binary file: a content type plus a chunked body.
///
/// `size` is cached and always equals the byte length of `body`; both are
/// replaced together on every write, so a reader never sees a stale size
/// next to new bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct File {
    content_type: String,
    body: Body,
    size: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl File {
    /// Create an empty file with no content type.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            content_type: String::new(),
            body: Body::empty(),
            size: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the file's data.
    ///
    /// `None` is rejected with [`DomainError::NullPayload`]; the previous
    /// body, size and content type stay untouched on any error, including
    /// store failures mid-write.
    pub async fn set_data(
        &mut self,
        writer: &BlobWriter,
        payload: Option<Payload>,
        content_type: impl Into<String>,
    ) -> Result<(), WriteError> {
        let payload = payload.ok_or(DomainError::NullPayload)?;
        let (body, size) = writer.store_payload(payload).await?;
        self.body = body;
        self.size = size;
        self.content_type = content_type.into();
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Reconstitute the full payload.
    pub async fn data(&self, writer: &BlobWriter) -> Result<Bytes, WriteError> {
        writer.reconstitute(&self.body).await
    }

    /// Decode the stored bytes as text under the content type's declared
    /// charset (UTF-8 when none is declared).
    pub async fn text(&self, writer: &BlobWriter) -> Result<String, WriteError> {
        let charset = self.charset();
        let bytes = self.data(writer).await?;
        Ok(charset::decode(&bytes, &charset)?)
    }

    /// Encode `text` under the declared charset and store it, keeping the
    /// current content type.
    pub async fn set_text(&mut self, writer: &BlobWriter, text: &str) -> Result<(), WriteError> {
        let encoded = charset::encode(text, &self.charset())?;
        let content_type = self.content_type.clone();
        self.set_data(writer, Some(Payload::from(encoded)), content_type)
            .await
    }

    fn charset(&self) -> String {
        charset::charset_of(&self.content_type).unwrap_or_else(|| DEFAULT_CHARSET.to_string())
    }

    // Getters
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        self.content_type = content_type.into();
        self.updated_at = Utc::now();
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Default for File {
    fn default() -> Self {
        Self::new()
    }
}
