//! Transcoding between stored bytes and text under a declared charset.
//!
//! The content type's `charset=` parameter drives both directions. Errors
//! distinguish a charset label the runtime does not know at all from a known
//! charset that cannot represent the data; both are recoverable, user-facing
//! conditions rather than internal faults.

use encoding_rs::Encoding;

use crate::domain::errors::DomainError;

pub const DEFAULT_CHARSET: &str = "utf-8";

/// Extract the `charset=` parameter from a content type, if present.
///
/// Handles optional whitespace and quoting: `text/plain; charset="UTF-8"`.
pub fn charset_of(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches('"');
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    })
}

fn lookup(charset: &str) -> Result<&'static Encoding, DomainError> {
    Encoding::for_label(charset.as_bytes()).ok_or_else(|| DomainError::UnknownCharset {
        charset: charset.to_string(),
    })
}

/// Decode stored bytes as text under `charset`.
pub fn decode(bytes: &[u8], charset: &str) -> Result<String, DomainError> {
    let encoding = lookup(charset)?;
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DomainError::InvalidText {
            charset: charset.to_string(),
        });
    }
    Ok(text.into_owned())
}

/// Encode text to bytes under `charset`.
pub fn encode(text: &str, charset: &str) -> Result<Vec<u8>, DomainError> {
    let encoding = lookup(charset)?;
    let (bytes, _, had_unmappable) = encoding.encode(text);
    if had_unmappable {
        return Err(DomainError::CharsetTooWeak {
            charset: charset.to_string(),
        });
    }
    Ok(bytes.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charset_of() {
        assert_eq!(
            charset_of("text/plain; charset=ISO-8859-1"),
            Some("ISO-8859-1".to_string())
        );
        assert_eq!(
            charset_of("text/plain;charset=\"utf-8\""),
            Some("utf-8".to_string())
        );
        assert_eq!(charset_of("text/plain"), None);
        assert_eq!(charset_of("text/plain; boundary=x"), None);
    }

    #[test]
    fn test_decode_utf8() {
        assert_eq!(decode("text ą".as_bytes(), "utf-8").unwrap(), "text ą");
    }

    #[test]
    fn test_decode_latin1() {
        // 0xFF is ÿ in ISO-8859-1, always decodable.
        assert_eq!(decode(&[0xFF], "ISO-8859-1").unwrap(), "ÿ");
    }

    #[test]
    fn test_unknown_charset_is_distinct() {
        let err = decode(b"abc", "NO-SUCH-CHARSET").unwrap_err();
        assert!(matches!(err, DomainError::UnknownCharset { .. }));
    }

    #[test]
    fn test_undecodable_bytes_under_known_charset() {
        let err = decode(&[0xFF, 0xFE, 0xFD], "utf-8").unwrap_err();
        assert!(matches!(err, DomainError::InvalidText { .. }));
    }

    #[test]
    fn test_encode_round_trip() {
        let bytes = encode("text ą", "utf-8").unwrap();
        assert_eq!(decode(&bytes, "utf-8").unwrap(), "text ą");
    }

    #[test]
    fn test_charset_too_weak() {
        // ą is not representable in ISO-8859-1.
        let err = encode("text ą", "ISO-8859-1").unwrap_err();
        assert!(matches!(err, DomainError::CharsetTooWeak { .. }));
    }

    #[test]
    fn test_encode_unknown_charset() {
        let err = encode("abc", "NO-SUCH-CHARSET").unwrap_err();
        assert!(matches!(err, DomainError::UnknownCharset { .. }));
    }
}
