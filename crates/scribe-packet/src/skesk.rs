//! Symmetric-key encrypted session key packets (passphrase encryption)

use pgp::packet::{PacketHeader, PacketTrait, SymKeyEncryptedSessionKey};
use pgp::ser::Serialize;
use pgp::types::{StringToKey, Tag};
use rand::{CryptoRng, RngCore};
use scribe_core::{CipherFunction, HashAlgorithm, ScribeError, ScribeResult};
use secrecy::{ExposeSecret, SecretString};
use std::io::Write;

use crate::convert;
use crate::session::SessionKey;

/// Largest iteration count an iterated and salted S2K can express.
pub const MAX_S2K_COUNT: u32 = 65_011_712;

/// Coded form of an S2K iteration count: the smallest encodable count that is
/// at least `count`, saturating at the maximum.
pub fn encode_count(count: u32) -> u8 {
    (0..=u8::MAX)
        .find(|&c| decode_count(c) >= count)
        .unwrap_or(u8::MAX)
}

pub fn decode_count(c: u8) -> u32 {
    (16 + u32::from(c & 15)) << ((c >> 4) + 6)
}

/// Write a v4 symmetric-key encrypted session key packet and return the key
/// derived from `passphrase`. The packet carries no encrypted key: the
/// derived key is the session key.
///
/// SHA-1 and RIPEMD-160 are refused as S2K hashes; nothing is written then.
pub fn serialize_symmetric_key_encrypted<W: Write, R: RngCore + CryptoRng>(
    w: &mut W,
    rng: &mut R,
    passphrase: &SecretString,
    cipher: CipherFunction,
    s2k_hash: HashAlgorithm,
    s2k_count: u32,
) -> ScribeResult<SessionKey> {
    let (s2k, key) = derive(rng, passphrase, cipher, s2k_hash, s2k_count)?;
    write_packet(w, cipher, s2k)?;
    tracing::debug!(
        ?cipher,
        ?s2k_hash,
        count = decode_count(encode_count(s2k_count)),
        "passphrase session key packet written"
    );
    Ok(key)
}

/// Build the S2K specifier and derive the session key without writing.
fn derive<R: RngCore + CryptoRng>(
    rng: &mut R,
    passphrase: &SecretString,
    cipher: CipherFunction,
    s2k_hash: HashAlgorithm,
    s2k_count: u32,
) -> ScribeResult<(StringToKey, SessionKey)> {
    if matches!(s2k_hash, HashAlgorithm::Sha1 | HashAlgorithm::Ripemd160) {
        return Err(ScribeError::Config(format!(
            "{s2k_hash:?} is too weak for passphrase key derivation"
        )));
    }
    let mut salt = [0u8; 8];
    rng.try_fill_bytes(&mut salt)?;
    let s2k = StringToKey::IteratedAndSalted {
        hash_alg: convert::hash(s2k_hash),
        salt,
        count: encode_count(s2k_count),
    };
    let key = s2k
        .derive_key(passphrase.expose_secret().as_bytes(), cipher.key_size())
        .map_err(convert::codec("deriving passphrase key"))?;
    Ok((s2k, SessionKey::from_bytes(cipher, key)?))
}

fn write_packet<W: Write>(w: &mut W, cipher: CipherFunction, s2k: StringToKey) -> ScribeResult<()> {
    let len = u32::try_from(2 + s2k.write_len())
        .map_err(|_| ScribeError::codec("S2K specifier too long"))?;
    let packet = SymKeyEncryptedSessionKey::V4 {
        packet_header: PacketHeader::new_fixed(Tag::SymKeyEncryptedSessionKey, len),
        sym_algorithm: convert::cipher(cipher),
        s2k,
        encrypted_key: pgp::bytes::Bytes::new(),
    };
    packet
        .to_writer_with_header(w)
        .map_err(convert::codec("writing passphrase session key"))
}
