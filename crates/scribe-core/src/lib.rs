pub mod config;
pub mod error;
pub mod types;

pub use config::{ArmorConfig, EncryptionConfig, ScribeConfig, SigningConfig};
pub use error::{InvalidArgument, ScribeError, ScribeResult};
pub use types::{
    AlgorithmId, CipherFunction, Fingerprint, HashAlgorithm, KeyId, PublicKeyAlgorithm,
    SignatureType,
};
