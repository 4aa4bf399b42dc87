use serde::{Deserialize, Serialize};
use std::fmt;

/// An algorithm with a one-octet OpenPGP registry identifier.
pub trait AlgorithmId: Copy + Eq + fmt::Debug {
    fn id(self) -> u8;

    fn from_id(id: u8) -> Option<Self>;
}

/// Symmetric ciphers the engine can encrypt with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CipherFunction {
    Cast5,
    Aes128,
    Aes192,
    Aes256,
}

impl CipherFunction {
    /// Key size in bytes.
    pub const fn key_size(self) -> usize {
        match self {
            Self::Cast5 | Self::Aes128 => 16,
            Self::Aes192 => 24,
            Self::Aes256 => 32,
        }
    }

    /// Block size in bytes.
    pub const fn block_size(self) -> usize {
        match self {
            Self::Cast5 => 8,
            Self::Aes128 | Self::Aes192 | Self::Aes256 => 16,
        }
    }
}

impl AlgorithmId for CipherFunction {
    fn id(self) -> u8 {
        match self {
            Self::Cast5 => 3,
            Self::Aes128 => 7,
            Self::Aes192 => 8,
            Self::Aes256 => 9,
        }
    }

    fn from_id(id: u8) -> Option<Self> {
        match id {
            3 => Some(Self::Cast5),
            7 => Some(Self::Aes128),
            8 => Some(Self::Aes192),
            9 => Some(Self::Aes256),
            _ => None,
        }
    }
}

/// Hash algorithms usable for signatures, S2K and the ECDH KDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Sha1,
    Ripemd160,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    /// Digest length in bytes.
    pub const fn digest_size(self) -> usize {
        match self {
            Self::Sha1 | Self::Ripemd160 => 20,
            Self::Sha224 => 28,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }
}

impl AlgorithmId for HashAlgorithm {
    fn id(self) -> u8 {
        match self {
            Self::Sha1 => 2,
            Self::Ripemd160 => 3,
            Self::Sha256 => 8,
            Self::Sha384 => 9,
            Self::Sha512 => 10,
            Self::Sha224 => 11,
        }
    }

    fn from_id(id: u8) -> Option<Self> {
        match id {
            2 => Some(Self::Sha1),
            3 => Some(Self::Ripemd160),
            8 => Some(Self::Sha256),
            9 => Some(Self::Sha384),
            10 => Some(Self::Sha512),
            11 => Some(Self::Sha224),
            _ => None,
        }
    }
}

/// Public-key algorithms of the key material the engine handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublicKeyAlgorithm {
    /// ECDH over Curve25519 (encryption only)
    Ecdh,
    /// EdDSA over Ed25519 (signing only)
    EdDsa,
}

impl PublicKeyAlgorithm {
    pub const fn can_encrypt(self) -> bool {
        matches!(self, Self::Ecdh)
    }

    pub const fn can_sign(self) -> bool {
        matches!(self, Self::EdDsa)
    }
}

impl AlgorithmId for PublicKeyAlgorithm {
    fn id(self) -> u8 {
        match self {
            Self::Ecdh => 18,
            Self::EdDsa => 22,
        }
    }

    fn from_id(id: u8) -> Option<Self> {
        match id {
            18 => Some(Self::Ecdh),
            22 => Some(Self::EdDsa),
            _ => None,
        }
    }
}

/// What a signature binds: the raw octets, or text with canonical line endings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureType {
    Binary,
    Text,
}

impl SignatureType {
    pub const fn id(self) -> u8 {
        match self {
            Self::Binary => 0x00,
            Self::Text => 0x01,
        }
    }

    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0x00 => Some(Self::Binary),
            0x01 => Some(Self::Text),
            _ => None,
        }
    }
}

/// The low 64 bits of a v4 fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId(pub u64);

impl KeyId {
    pub fn to_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016X}", self.0)
    }
}

/// A v4 key fingerprint: SHA-1 over the public key packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(pub [u8; 20]);

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn key_id(&self) -> KeyId {
        let mut low = [0u8; 8];
        low.copy_from_slice(&self.0[12..]);
        KeyId(u64::from_be_bytes(low))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}
