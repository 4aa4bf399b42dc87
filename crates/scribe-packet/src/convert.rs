//! Mapping between scribe's algorithm registry and rPGP's types

use pgp::crypto::hash::HashAlgorithm as PgpHash;
use pgp::crypto::public_key::PublicKeyAlgorithm as PgpPublicKeyAlgorithm;
use pgp::crypto::sym::SymmetricKeyAlgorithm;
use pgp::packet::SignatureType as PgpSignatureType;
use scribe_core::{
    AlgorithmId, CipherFunction, Fingerprint, HashAlgorithm, KeyId, PublicKeyAlgorithm,
    ScribeError, SignatureType,
};

pub(crate) fn hash(hash: HashAlgorithm) -> PgpHash {
    PgpHash::from(hash.id())
}

pub(crate) fn cipher(cipher: CipherFunction) -> SymmetricKeyAlgorithm {
    SymmetricKeyAlgorithm::from(cipher.id())
}

pub(crate) fn public_key_algorithm(algorithm: PublicKeyAlgorithm) -> PgpPublicKeyAlgorithm {
    PgpPublicKeyAlgorithm::from(algorithm.id())
}

pub(crate) fn signature_type(sig_type: SignatureType) -> PgpSignatureType {
    match sig_type {
        SignatureType::Binary => PgpSignatureType::Binary,
        SignatureType::Text => PgpSignatureType::Text,
    }
}

pub(crate) fn key_id(id: &pgp::types::KeyId) -> KeyId {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(id.as_ref());
    KeyId(u64::from_be_bytes(bytes))
}

pub(crate) fn pgp_key_id(id: KeyId) -> pgp::types::KeyId {
    pgp::types::KeyId::from(id.to_bytes())
}

pub(crate) fn fingerprint(fp: &pgp::types::Fingerprint) -> Result<Fingerprint, ScribeError> {
    let bytes: [u8; 20] = fp
        .as_bytes()
        .try_into()
        .map_err(|_| ScribeError::codec(format!("not a v4 fingerprint: {fp:?}")))?;
    Ok(Fingerprint(bytes))
}

/// Wrap an rPGP failure as a codec error, naming the step that failed.
pub(crate) fn codec(context: &'static str) -> impl FnOnce(pgp::errors::Error) -> ScribeError {
    move |e| ScribeError::codec(format!("{context}: {e}"))
}
