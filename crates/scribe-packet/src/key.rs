//! v4 key material: Ed25519 signing keys and Curve25519 ECDH encryption keys
//!
//! Wrappers over rPGP key packets that cache scribe's identifiers and limit
//! keys to the two algorithms the message layer handles. A private key may be
//! locked with a passphrase, in which case it cannot be used.

use pgp::crypto::public_key::PublicKeyAlgorithm as PgpPublicKeyAlgorithm;
use pgp::crypto::{ecdh, ed25519};
use pgp::packet::{self, PubKeyInner};
use pgp::types::{
    EcdhPublicParams, EddsaLegacyPublicParams, KeyDetails, KeyVersion, Password,
    PlainSecretParams, PublicKeyTrait, PublicParams, SecretKeyTrait, SecretParams,
    SignatureBytes,
};
use rand::rngs::OsRng;
use scribe_core::{
    Fingerprint, HashAlgorithm, InvalidArgument, KeyId, PublicKeyAlgorithm, ScribeError,
    ScribeResult,
};
use secrecy::{ExposeSecret, SecretString};
use std::time::{Duration, UNIX_EPOCH};
use zeroize::Zeroize;

use crate::convert;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    packet: packet::PublicKey,
    algorithm: PublicKeyAlgorithm,
    fingerprint: Fingerprint,
    created: u32,
}

impl PublicKey {
    /// Wrap a v4 EdDSA or ECDH public key packet.
    pub fn from_packet(packet: packet::PublicKey) -> ScribeResult<Self> {
        if packet.version() != KeyVersion::V4 {
            return Err(ScribeError::codec(format!(
                "unsupported key version {:?}",
                packet.version()
            )));
        }
        let algorithm = match packet.algorithm() {
            PgpPublicKeyAlgorithm::EdDSALegacy => PublicKeyAlgorithm::EdDsa,
            PgpPublicKeyAlgorithm::ECDH => PublicKeyAlgorithm::Ecdh,
            other => {
                return Err(ScribeError::codec(format!(
                    "unsupported public key algorithm {other:?}"
                )))
            }
        };
        let fingerprint = convert::fingerprint(&packet.fingerprint())?;
        let created = u32::try_from(packet.created_at().timestamp())
            .map_err(|_| ScribeError::codec("key creation time out of range"))?;
        Ok(Self {
            packet,
            algorithm,
            fingerprint,
            created,
        })
    }

    fn from_params(created: u32, params: PublicParams) -> ScribeResult<Self> {
        let algorithm = match params {
            PublicParams::ECDH(_) => PgpPublicKeyAlgorithm::ECDH,
            _ => PgpPublicKeyAlgorithm::EdDSALegacy,
        };
        let created_at = (UNIX_EPOCH + Duration::from_secs(created.into())).into();
        let inner = PubKeyInner::new(KeyVersion::V4, algorithm, created_at, None, params)
            .map_err(convert::codec("building public key"))?;
        let packet =
            packet::PublicKey::from_inner(inner).map_err(convert::codec("building public key"))?;
        Self::from_packet(packet)
    }

    /// An Ed25519 verifying key.
    pub fn ed25519(point: [u8; 32], created: u32) -> ScribeResult<Self> {
        let key = ed25519_dalek::VerifyingKey::from_bytes(&point)
            .map_err(|e| ScribeError::codec(format!("invalid Ed25519 point: {e}")))?;
        Self::from_params(
            created,
            PublicParams::EdDSALegacy(EddsaLegacyPublicParams::Ed25519 { key }),
        )
    }

    /// A Curve25519 ECDH key with SHA-256 / AES-128 KDF parameters.
    pub fn x25519(point: [u8; 32], created: u32) -> ScribeResult<Self> {
        Self::from_params(
            created,
            PublicParams::ECDH(EcdhPublicParams::Curve25519 {
                p: x25519_dalek::PublicKey::from(point),
                hash: pgp::crypto::hash::HashAlgorithm::Sha256,
                alg_sym: pgp::crypto::sym::SymmetricKeyAlgorithm::AES128,
            }),
        )
    }

    pub fn algorithm(&self) -> PublicKeyAlgorithm {
        self.algorithm
    }

    pub fn created(&self) -> u32 {
        self.created
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    pub fn key_id(&self) -> KeyId {
        self.fingerprint.key_id()
    }

    /// The underlying rPGP packet.
    pub fn packet(&self) -> &packet::PublicKey {
        &self.packet
    }
}

/// A public key together with its secret half.
#[derive(Clone)]
pub struct PrivateKey {
    public_key: PublicKey,
    packet: packet::SecretKey,
}

impl PrivateKey {
    /// Wrap a secret key packet, locked or not.
    pub fn from_packet(packet: packet::SecretKey) -> ScribeResult<Self> {
        let public_key = PublicKey::from_packet(packet.public_key().clone())?;
        Ok(Self { public_key, packet })
    }

    fn from_secret(public_key: PublicKey, secret: PlainSecretParams) -> ScribeResult<Self> {
        let packet = packet::SecretKey::new(public_key.packet.clone(), SecretParams::Plain(secret))
            .map_err(convert::codec("building secret key"))?;
        Ok(Self { public_key, packet })
    }

    /// An Ed25519 signing key from its 32-byte seed.
    pub fn ed25519(mut seed: [u8; 32], created: u32) -> ScribeResult<Self> {
        let secret = ed25519::SecretKey::try_from_bytes(seed, ed25519::Mode::EdDSALegacy);
        seed.zeroize();
        let secret = secret.map_err(convert::codec("building Ed25519 key"))?;
        let public_key = PublicKey::from_params(
            created,
            PublicParams::EdDSALegacy(EddsaLegacyPublicParams::from(&secret)),
        )?;
        Self::from_secret(public_key, PlainSecretParams::Ed25519Legacy(secret))
    }

    /// A Curve25519 ECDH key from its 32-byte scalar, clamped before use.
    pub fn x25519(mut scalar: [u8; 32], created: u32) -> ScribeResult<Self> {
        scalar[0] &= 248;
        scalar[31] &= 127;
        scalar[31] |= 64;
        let secret = ecdh::SecretKey::Curve25519(ecdh::Curve25519::from(
            x25519_dalek::StaticSecret::from(scalar),
        ));
        scalar.zeroize();
        let public_key = PublicKey::from_params(
            created,
            PublicParams::ECDH(EcdhPublicParams::from(&secret)),
        )?;
        Self::from_secret(public_key, PlainSecretParams::ECDH(secret))
    }

    /// Protect the secret half with `passphrase`.
    pub fn lock(&mut self, passphrase: &SecretString) -> ScribeResult<()> {
        let password = Password::from(passphrase.expose_secret());
        self.packet
            .set_password(OsRng, &password)
            .map_err(convert::codec("locking secret key"))
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn key_id(&self) -> KeyId {
        self.public_key.key_id()
    }

    /// True while the secret material is still encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.packet.secret_params().is_encrypted()
    }

    /// The underlying rPGP packet.
    pub fn packet(&self) -> &packet::SecretKey {
        &self.packet
    }

    /// Sign a finished message digest.
    pub fn sign_digest(&self, hash: HashAlgorithm, digest: &[u8]) -> ScribeResult<SignatureBytes> {
        if !self.public_key.algorithm().can_sign() {
            return Err(InvalidArgument::NoSigningKey(self.key_id()).into());
        }
        if self.is_encrypted() {
            return Err(InvalidArgument::EncryptedPrivateKey(self.key_id()).into());
        }
        self.packet
            .create_signature(&Password::empty(), convert::hash(hash), digest)
            .map_err(convert::codec("signing digest"))
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public_key", &self.public_key.key_id())
            .field("locked", &self.is_encrypted())
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
