use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Cannot set null data on a file")]
    NullPayload,

    #[error("Unsupported character set: {charset}")]
    UnknownCharset { charset: String },

    #[error("Stored bytes do not decode as {charset}")]
    InvalidText { charset: String },

    #[error("Character set {charset} cannot encode all characters in text")]
    CharsetTooWeak { charset: String },
}
