//! Detached signatures
//!
//! The signer is resolved and checked first, then the message is hashed and
//! signed, and only then is anything written. A failed precondition leaves
//! the output untouched.

use scribe_core::{ScribeConfig, ScribeResult, SignatureType};
use scribe_packet::armor::BlockType;
use scribe_packet::{Signature, SignatureHasher};
use std::io::{self, Read, Write};

use crate::entity::{Capability, Entity};
use crate::sink::Sink;

/// Sign `message` with `signer` and write a binary detached signature to `w`.
pub fn detach_sign<W: Write, R: Read>(
    w: W,
    signer: &Entity,
    message: R,
    config: &ScribeConfig,
) -> ScribeResult<()> {
    detach_sign_with(w, signer, message, SignatureType::Binary, None, config)
}

/// Like [`detach_sign`], but line endings are canonicalized to CRLF before
/// hashing.
pub fn detach_sign_text<W: Write, R: Read>(
    w: W,
    signer: &Entity,
    message: R,
    config: &ScribeConfig,
) -> ScribeResult<()> {
    detach_sign_with(w, signer, message, SignatureType::Text, None, config)
}

/// [`detach_sign`] with an armored `PGP SIGNATURE` output.
pub fn armored_detach_sign<W: Write, R: Read>(
    w: W,
    signer: &Entity,
    message: R,
    config: &ScribeConfig,
) -> ScribeResult<()> {
    detach_sign_with(
        w,
        signer,
        message,
        SignatureType::Binary,
        Some(BlockType::Signature),
        config,
    )
}

/// [`detach_sign_text`] with an armored `PGP SIGNATURE` output.
pub fn armored_detach_sign_text<W: Write, R: Read>(
    w: W,
    signer: &Entity,
    message: R,
    config: &ScribeConfig,
) -> ScribeResult<()> {
    detach_sign_with(
        w,
        signer,
        message,
        SignatureType::Text,
        Some(BlockType::Signature),
        config,
    )
}

fn detach_sign_with<W: Write, R: Read>(
    w: W,
    signer: &Entity,
    mut message: R,
    sig_type: SignatureType,
    armor: Option<BlockType>,
    config: &ScribeConfig,
) -> ScribeResult<()> {
    let key = signer.key_for(Capability::Sign)?;
    let private_key = key.private_key()?;

    let hash = config.signing.hash;
    let mut signature = Signature::new(
        sig_type,
        key.public_key(),
        hash,
        config.signing.timestamp(),
    )?;
    let mut hasher = SignatureHasher::new(hash, sig_type)?;
    let hashed = io::copy(&mut message, &mut hasher)?;
    signature.sign(hasher, private_key)?;
    tracing::debug!(key_id = %key.key_id(), bytes = hashed, "message signed");

    let mut sink = Sink::open(w, armor, &config.armor)?;
    signature.serialize(&mut sink)?;
    sink.finish()?;
    Ok(())
}
