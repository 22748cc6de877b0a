// Copyright 2020-2026 MathxH Chen.
//
// Code is licensed under MIT Apache Dual License

use std::path::PathBuf;

/// Everything that can go wrong while loading inputs or processing a record.
///
/// A proof that decodes fine but does not satisfy the verification equations
/// is *not* an error; it is reported as [`crate::proof::Verdict::Invalid`].
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed key armor: {0}")]
    Armor(String),
    #[error("malformed DER structure: {0}")]
    Decoding(String),
    #[error("message of {length} bytes does not fit the {capacity} byte padding capacity")]
    Encoding { length: usize, capacity: usize },
    #[error("cannot frame challenge transcript: {0}")]
    Framing(String),
    #[error("cannot build the verification worker pool: {0}")]
    ThreadPool(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<simple_asn1::ASN1DecodeErr> for Error {
    fn from(err: simple_asn1::ASN1DecodeErr) -> Self {
        Error::Decoding(err.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::Decoding(format!("invalid base64: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
