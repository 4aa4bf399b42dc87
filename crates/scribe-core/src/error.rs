use thiserror::Error;

use crate::types::KeyId;

pub type ScribeResult<T> = Result<T, ScribeError>;

/// Structural problems with the keys or recipients handed to an operation.
#[derive(Debug, Error)]
pub enum InvalidArgument {
    #[error("signing key {0} doesn't have a private key")]
    MissingPrivateKey(KeyId),

    #[error("signing key {0} is encrypted")]
    EncryptedPrivateKey(KeyId),

    #[error("key {0} has no signing-capable key")]
    NoSigningKey(KeyId),

    #[error("cannot encrypt a message to key id {0} because it has no encryption keys")]
    NoEncryptionKey(KeyId),

    #[error("cannot encrypt a message without recipients")]
    NoRecipients,
}

#[derive(Debug, Error)]
pub enum ScribeError {
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),

    #[error("cannot encrypt because recipient set shares no common algorithms")]
    NoCommonAlgorithm,

    #[error("codec error: {0}")]
    Codec(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("random source failure: {0}")]
    RandomSource(#[from] rand::Error),

    #[error("config error: {0}")]
    Config(String),
}

impl ScribeError {
    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    /// True for failures caused by the caller's keys or recipient list.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}
