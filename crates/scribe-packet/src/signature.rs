//! v4 signatures and one-pass signature packets
//!
//! A signature is built in three steps: `Signature::new` fixes the metadata,
//! `sign` consumes the message digest and seals it, `serialize` writes it.
//! The digest covers the message, the hashed part of the packet and a
//! six-byte final trailer:
//! ```text
//! message || 04 type pk hash len(hashed) hashed || 04 FF be32(len(trailer))
//! ```

use pgp::packet::{self, PacketTrait, SignatureConfig, Subpacket, SubpacketData};
use pgp::types::KeyDetails;
use scribe_core::{
    Fingerprint, HashAlgorithm, KeyId, PublicKeyAlgorithm, ScribeError, ScribeResult,
    SignatureType,
};
use std::io::Write;
use std::time::{Duration, UNIX_EPOCH};

use crate::convert;
use crate::hash::SignatureHasher;
use crate::key::{PrivateKey, PublicKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub sig_type: SignatureType,
    pub pub_key_algo: PublicKeyAlgorithm,
    pub hash: HashAlgorithm,
    pub creation_time: u32,
    pub issuer_key_id: KeyId,
    pub issuer_fingerprint: Fingerprint,
    config: SignatureConfig,
    sealed: Option<packet::Signature>,
}

impl Signature {
    /// Unsigned signature metadata for `issuer`.
    pub fn new(
        sig_type: SignatureType,
        issuer: &PublicKey,
        hash: HashAlgorithm,
        creation_time: u32,
    ) -> ScribeResult<Self> {
        let mut config = SignatureConfig::v4(
            convert::signature_type(sig_type),
            convert::public_key_algorithm(issuer.algorithm()),
            convert::hash(hash),
        );
        let created = UNIX_EPOCH + Duration::from_secs(creation_time.into());
        config.hashed_subpackets = vec![
            Subpacket::regular(SubpacketData::SignatureCreationTime(created.into()))
                .map_err(convert::codec("creation time subpacket"))?,
            Subpacket::regular(SubpacketData::IssuerFingerprint(
                issuer.packet().fingerprint(),
            ))
            .map_err(convert::codec("issuer fingerprint subpacket"))?,
        ];
        config.unhashed_subpackets = vec![Subpacket::regular(SubpacketData::Issuer(
            issuer.packet().key_id(),
        ))
        .map_err(convert::codec("issuer subpacket"))?];

        Ok(Self {
            sig_type,
            pub_key_algo: issuer.algorithm(),
            hash,
            creation_time,
            issuer_key_id: issuer.key_id(),
            issuer_fingerprint: issuer.fingerprint(),
            config,
            sealed: None,
        })
    }

    pub fn is_signed(&self) -> bool {
        self.sealed.is_some()
    }

    /// The first two octets of the signed digest.
    pub fn hash_prefix(&self) -> Option<[u8; 2]> {
        self.sealed
            .as_ref()
            .and_then(|s| s.signed_hash_value())
    }

    /// The sealed rPGP packet, once `sign` has run.
    pub fn packet(&self) -> Option<&packet::Signature> {
        self.sealed.as_ref()
    }

    /// Finish the digest in `hasher` and sign it with `signer`.
    pub fn sign(&mut self, hasher: SignatureHasher, signer: &PrivateKey) -> ScribeResult<()> {
        if hasher.hash_algorithm() != self.hash || hasher.signature_type() != self.sig_type {
            return Err(ScribeError::codec(format!(
                "hasher ({:?}, {:?}) does not match signature ({:?}, {:?})",
                hasher.hash_algorithm(),
                hasher.signature_type(),
                self.hash,
                self.sig_type
            )));
        }
        if signer.key_id() != self.issuer_key_id {
            return Err(ScribeError::codec(format!(
                "signing key {} is not the issuer {}",
                signer.key_id(),
                self.issuer_key_id
            )));
        }

        let mut digest = hasher.into_digest();
        let len = self
            .config
            .hash_signature_data(&mut digest)
            .map_err(convert::codec("hashing signature fields"))?;
        let trailer = self
            .config
            .trailer(len)
            .map_err(convert::codec("signature trailer"))?;
        digest.update(&trailer);
        let digest = digest.finalize();

        let value = signer.sign_digest(self.hash, &digest)?;
        let sealed = packet::Signature::from_config(self.config.clone(), [digest[0], digest[1]], value)
            .map_err(convert::codec("sealing signature"))?;
        self.sealed = Some(sealed);
        tracing::debug!(
            issuer = %self.issuer_key_id,
            hash = ?self.hash,
            sig_type = ?self.sig_type,
            "signature issued"
        );
        Ok(())
    }

    /// Write the signature packet. Fails if `sign` has not been called.
    pub fn serialize<W: Write>(&self, w: &mut W) -> ScribeResult<()> {
        let sealed = self
            .sealed
            .as_ref()
            .ok_or_else(|| ScribeError::codec("signature has not been signed"))?;
        sealed
            .to_writer_with_header(w)
            .map_err(convert::codec("writing signature"))
    }
}

/// Announces a signature that follows the signed data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnePassSignature {
    pub sig_type: SignatureType,
    pub hash: HashAlgorithm,
    pub pub_key_algo: PublicKeyAlgorithm,
    pub key_id: KeyId,
    /// False when another one-pass signature follows.
    pub is_last: bool,
}

impl OnePassSignature {
    pub fn serialize<W: Write>(&self, w: &mut W) -> ScribeResult<()> {
        let mut ops = packet::OnePassSignature::v3(
            convert::signature_type(self.sig_type),
            convert::hash(self.hash),
            convert::public_key_algorithm(self.pub_key_algo),
            convert::pgp_key_id(self.key_id),
        );
        if !self.is_last {
            ops.set_is_nested();
        }
        ops.to_writer_with_header(w)
            .map_err(convert::codec("writing one-pass signature"))
    }
}
