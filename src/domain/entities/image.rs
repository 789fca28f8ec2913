use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::application::payload::Payload;
use crate::application::writer::{BlobWriter, WriteError};
use crate::domain::entities::File;
use crate::domain::sniff;
use crate::domain::value_objects::Dimensions;

/// A stored image: a [`File`] body whose content type and pixel dimensions
/// are refreshed by the format sniffer on every write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    file: File,
    dimensions: Dimensions,
}

impl Image {
    pub fn new() -> Self {
        Self {
            file: File::new(),
            dimensions: Dimensions::UNKNOWN,
        }
    }

    /// Replace the image's data and re-sniff the exact bytes just written.
    ///
    /// Contract: a recognized format **overwrites** `content_type`
    /// unconditionally, even when the caller declared something else — a
    /// deliberately mislabeled GIF comes back as `image/gif`. When nothing
    /// matches, the declared type is kept as-is and the dimensions reset to
    /// unknown.
    pub async fn set_data(
        &mut self,
        writer: &BlobWriter,
        payload: Option<Payload>,
        content_type: impl Into<String>,
    ) -> Result<(), WriteError> {
        self.file.set_data(writer, payload, content_type).await?;

        let bytes = self.file.data(writer).await?;
        let info = sniff::sniff(&bytes);
        if info.is_recognized() {
            self.file.set_content_type(info.content_type.clone());
        }
        self.dimensions = info.dimensions();
        Ok(())
    }

    pub async fn data(&self, writer: &BlobWriter) -> Result<Bytes, WriteError> {
        self.file.data(writer).await
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn content_type(&self) -> &str {
        self.file.content_type()
    }

    pub fn size(&self) -> u64 {
        self.file.size()
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    /// Human-readable summary, e.g. `3 KB 16x16`.
    pub fn size_for_display(&self) -> String {
        format!("{} {}", byte_display(self.file.size()), self.dimensions)
    }
}

impl Default for Image {
    fn default() -> Self {
        Self::new()
    }
}

fn byte_display(size: u64) -> String {
    if size < 1024 {
        format!("{size} bytes")
    } else if size < 1024 * 1024 {
        format!("{} KB", size / 1024)
    } else {
        format!("{} MB", size / (1024 * 1024))
    }
}
