//! scribe-packet: the OpenPGP wire format used by scribe
//!
//! Writer-side packet layer over rPGP (`pgp` crate):
//! - Literal data and SEIPD v1 (CFB + SHA-1 modification detection)
//! - Session key packets: ECDH/Curve25519 (PKESK) and S2K passphrase (SKESK)
//! - v4 signatures over Ed25519, one-pass signatures, text canonicalization
//! - ASCII armor with CRC-24
//!
//! Each writer collects its input and hands the finished buffer to rPGP's
//! packet constructors on `finish`.

pub mod armor;
mod convert;
pub mod encrypted;
pub mod hash;
pub mod key;
pub mod literal;
pub mod pkesk;
pub mod session;
pub mod signature;
pub mod skesk;

pub use armor::{ArmorWriter, Armored, BlockType};
pub use encrypted::{serialize_symmetrically_encrypted, EncryptedWriter};
pub use hash::SignatureHasher;
pub use key::{PrivateKey, PublicKey};
pub use literal::{serialize_literal, LiteralWriter};
pub use pkesk::serialize_encrypted_key;
pub use session::SessionKey;
pub use signature::{OnePassSignature, Signature};
pub use skesk::serialize_symmetric_key_encrypted;
