//! Public-key encrypted session key packets

use pgp::packet::{PacketTrait, PublicKeyEncryptedSessionKey};
use rand::{CryptoRng, RngCore};
use scribe_core::{InvalidArgument, ScribeResult};
use std::io::Write;

use crate::convert;
use crate::key::PublicKey;
use crate::session::SessionKey;

/// Encrypt `session_key` to `recipient` and write a v3 PKESK packet.
pub fn serialize_encrypted_key<W: Write, R: RngCore + CryptoRng>(
    w: &mut W,
    rng: &mut R,
    recipient: &PublicKey,
    session_key: &SessionKey,
) -> ScribeResult<()> {
    if !recipient.algorithm().can_encrypt() {
        return Err(InvalidArgument::NoEncryptionKey(recipient.key_id()).into());
    }

    let packet = PublicKeyEncryptedSessionKey::from_session_key_v3(
        &mut *rng,
        session_key.as_bytes(),
        convert::cipher(session_key.cipher()),
        recipient.packet(),
    )
    .map_err(convert::codec("encrypting session key"))?;
    packet
        .to_writer_with_header(w)
        .map_err(convert::codec("writing encrypted session key"))?;

    tracing::debug!(key_id = %recipient.key_id(), "session key encrypted to recipient");
    Ok(())
}
