use bytes::Bytes;

use crate::application::payload::Payload;
use crate::application::writer::{BlobWriter, WriteError};
use crate::domain::entities::{File, Image};
use crate::domain::sniff;

/// Port for filename-based MIME guessing (external collaborator).
///
/// Returns `(content_type, encoding)`; an empty content type means no
/// guess.
pub trait MimeGuesser: Send + Sync {
    fn guess(&self, filename: &str, data: &[u8]) -> (String, Option<String>);
}

/// Default guesser: content-based magic detection via `infer`, with a small
/// extension map for the text types magic bytes cannot identify.
#[derive(Debug, Default, Clone)]
pub struct ContentTypeGuesser;

impl MimeGuesser for ContentTypeGuesser {
    fn guess(&self, filename: &str, data: &[u8]) -> (String, Option<String>) {
        if let Some(kind) = infer::get(data) {
            return (kind.mime_type().to_string(), None);
        }
        let extension = filename.rsplit('.').next().unwrap_or("");
        let content_type = match extension.to_ascii_lowercase().as_str() {
            "txt" => "text/plain",
            "htm" | "html" => "text/html",
            "css" => "text/css",
            "csv" => "text/csv",
            "xml" => "text/xml",
            "json" => "application/json",
            "js" => "text/javascript",
            "md" => "text/markdown",
            _ => "",
        };
        (content_type.to_string(), None)
    }
}

/// Either kind of stored object the upload path can produce.
#[derive(Debug, Clone)]
pub enum StoredObject {
    File(File),
    Image(Image),
}

impl StoredObject {
    pub fn content_type(&self) -> &str {
        match self {
            StoredObject::File(file) => file.content_type(),
            StoredObject::Image(image) => image.content_type(),
        }
    }

    pub fn size(&self) -> u64 {
        match self {
            StoredObject::File(file) => file.size(),
            StoredObject::Image(image) => image.size(),
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, StoredObject::Image(_))
    }
}

/// Upload-time classification: decides whether a payload becomes a plain
/// [`File`] or an [`Image`].
pub struct FileFactory<G = ContentTypeGuesser> {
    guesser: G,
}

impl Default for FileFactory {
    fn default() -> Self {
        Self {
            guesser: ContentTypeGuesser,
        }
    }
}

impl<G: MimeGuesser> FileFactory<G> {
    pub fn new(guesser: G) -> Self {
        Self { guesser }
    }

    /// Classify and store an upload.
    ///
    /// Resolution order: an empty declared type is filled from the image
    /// sniffer first, then from the filename-based guesser; a resolved
    /// `image/*` type constructs an [`Image`], anything else a [`File`].
    pub async fn create(
        &self,
        writer: &BlobWriter,
        filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<StoredObject, WriteError> {
        let mut content_type = content_type.to_string();
        if content_type.is_empty() && !data.is_empty() {
            let info = sniff::sniff(&data);
            if info.is_recognized() {
                content_type = info.content_type;
            }
        }
        if content_type.is_empty() {
            let (guessed, _encoding) = self.guesser.guess(filename, &data);
            content_type = guessed;
        }

        if content_type.starts_with("image/") {
            let mut image = Image::new();
            image
                .set_data(writer, Some(Payload::Bytes(data)), content_type)
                .await?;
            Ok(StoredObject::Image(image))
        } else {
            let mut file = File::new();
            file.set_data(writer, Some(Payload::Bytes(data)), content_type)
                .await?;
            Ok(StoredObject::File(file))
        }
    }
}

/// Strip any Windows or Unix directory prefix from an uploaded filename.
pub fn clean_file_name(filename: &str) -> &str {
    filename.rsplit(['\\', '/']).next().unwrap_or(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gif_16x16() -> Vec<u8> {
        let mut data = b"GIF89a".to_vec();
        data.extend_from_slice(&16u16.to_le_bytes());
        data.extend_from_slice(&16u16.to_le_bytes());
        data.extend_from_slice(&[0x00; 6]);
        data
    }

    #[tokio::test]
    async fn test_sniffed_image_without_declared_type() {
        let writer = BlobWriter::detached();
        let factory = FileFactory::default();

        let object = factory
            .create(&writer, "upload.bin", "", Bytes::from(gif_16x16()))
            .await
            .unwrap();

        assert!(object.is_image());
        assert_eq!(object.content_type(), "image/gif");
    }

    #[tokio::test]
    async fn test_declared_non_image_type_wins_over_guesser() {
        let writer = BlobWriter::detached();
        let factory = FileFactory::default();

        let object = factory
            .create(
                &writer,
                "notes.txt",
                "application/octet-stream",
                Bytes::from_static(b"plain text"),
            )
            .await
            .unwrap();

        assert!(!object.is_image());
        assert_eq!(object.content_type(), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_guesser_fallback_by_extension() {
        let writer = BlobWriter::detached();
        let factory = FileFactory::default();

        let object = factory
            .create(&writer, "notes.txt", "", Bytes::from_static(b"plain text"))
            .await
            .unwrap();

        assert!(!object.is_image());
        assert_eq!(object.content_type(), "text/plain");
    }

    #[tokio::test]
    async fn test_declared_image_type_builds_image_even_unsniffable() {
        let writer = BlobWriter::detached();
        let factory = FileFactory::default();

        let object = factory
            .create(
                &writer,
                "photo",
                "image/tiff",
                Bytes::from_static(b"not really a tiff"),
            )
            .await
            .unwrap();

        // Image entity, declared type kept, dimensions unknown.
        assert!(object.is_image());
        assert_eq!(object.content_type(), "image/tiff");
        match object {
            StoredObject::Image(image) => assert!(!image.dimensions().is_known()),
            StoredObject::File(_) => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_injected_guesser_is_used() {
        struct FixedGuesser;
        impl MimeGuesser for FixedGuesser {
            fn guess(&self, _filename: &str, _data: &[u8]) -> (String, Option<String>) {
                ("application/x-custom".to_string(), None)
            }
        }

        let writer = BlobWriter::detached();
        let factory = FileFactory::new(FixedGuesser);
        let object = factory
            .create(&writer, "anything", "", Bytes::from_static(b"data"))
            .await
            .unwrap();
        assert_eq!(object.content_type(), "application/x-custom");
    }

    #[test]
    fn test_clean_file_name() {
        assert_eq!(clean_file_name("C:\\dir\\subdir\\a.txt"), "a.txt");
        assert_eq!(clean_file_name("/tmp/upload/a.txt"), "a.txt");
        assert_eq!(clean_file_name("a.txt"), "a.txt");
    }
}
