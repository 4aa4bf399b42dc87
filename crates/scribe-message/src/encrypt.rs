//! Hybrid and passphrase encryption
//!
//! Output layout:
//! ```text
//! [PKESK per recipient | SKESK]
//! SEIPD {
//!     [one-pass signature]
//!     literal data (hints + caller bytes)
//!     [signature]
//!     MDC
//! }
//! ```
//! All checks that can fail on the caller's keys or configuration run before
//! the first byte is written. An inline signature uses the negotiated hash,
//! but never one weaker than SHA-256.
//!
//! The returned [`MessageWriter`] must be finished; each layer's `finish`
//! consumes it and hands back the next outer one, so the literal packet,
//! signature, encrypted packet and armor always close in that order.

use rand::rngs::OsRng;
use scribe_core::{InvalidArgument, ScribeConfig, ScribeResult, SignatureType};
use scribe_packet::armor::BlockType;
use scribe_packet::{
    serialize_encrypted_key, serialize_literal, serialize_symmetric_key_encrypted,
    serialize_symmetrically_encrypted, EncryptedWriter, LiteralWriter, OnePassSignature,
    PrivateKey, SessionKey, Signature, SignatureHasher,
};
use secrecy::SecretString;
use std::io::{self, Write};

use crate::entity::{Capability, Entity, Key};
use crate::hints::FileHints;
use crate::negotiate::{negotiate, Preferences};
use crate::sink::Sink;

/// Signature computed over the literal content as it streams past.
struct InlineSignature<'k> {
    signature: Signature,
    hasher: SignatureHasher,
    signer: &'k PrivateKey,
}

/// The plaintext side of an encrypted message.
///
/// Everything written is encrypted into the message. Call [`finish`] once
/// the content is complete; dropping the writer instead leaves a truncated
/// message no reader will accept.
///
/// [`finish`]: MessageWriter::finish
#[must_use = "the message is truncated unless `finish` is called"]
pub struct MessageWriter<'k, W: Write> {
    literal: LiteralWriter<EncryptedWriter<Sink<W>>>,
    inline_signature: Option<InlineSignature<'k>>,
}

impl<'k, W: Write> MessageWriter<'k, W> {
    fn open(
        mut encrypted: EncryptedWriter<Sink<W>>,
        inline_signature: Option<InlineSignature<'k>>,
        hints: &FileHints,
    ) -> ScribeResult<Self> {
        if let Some(inline) = &inline_signature {
            let signature = &inline.signature;
            OnePassSignature {
                sig_type: signature.sig_type,
                hash: signature.hash,
                pub_key_algo: signature.pub_key_algo,
                key_id: signature.issuer_key_id,
                is_last: true,
            }
            .serialize(&mut encrypted)?;
        }
        let literal = serialize_literal(
            encrypted,
            hints.is_binary,
            &hints.file_name,
            hints.epoch_seconds,
        );
        Ok(Self {
            literal,
            inline_signature,
        })
    }

    /// Close every layer of the message and return the caller's writer.
    pub fn finish(self) -> ScribeResult<W> {
        let mut encrypted = self.literal.finish()?;
        if let Some(inline) = self.inline_signature {
            let mut signature = inline.signature;
            signature.sign(inline.hasher, inline.signer)?;
            signature.serialize(&mut encrypted)?;
        }
        let sink = encrypted.finish()?;
        sink.finish()
    }
}

impl<W: Write> Write for MessageWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.literal.write(buf)?;
        if let Some(inline) = &mut self.inline_signature {
            inline.hasher.write_all(&buf[..n])?;
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.literal.flush()
    }
}

/// Encrypt a message to `recipients`, optionally signing it with `signer`.
///
/// The cipher (and the signature hash) are negotiated from the recipients'
/// primary identity preferences. Returns the writer for the plaintext.
pub fn encrypt<'k, W: Write>(
    w: W,
    recipients: &[&Entity],
    signer: Option<&'k Entity>,
    hints: Option<&FileHints>,
    config: &ScribeConfig,
) -> ScribeResult<MessageWriter<'k, W>> {
    encrypt_with(w, recipients, signer, hints, None, config)
}

/// [`encrypt`] with an armored `PGP MESSAGE` output.
pub fn armored_encrypt<'k, W: Write>(
    w: W,
    recipients: &[&Entity],
    signer: Option<&'k Entity>,
    hints: Option<&FileHints>,
    config: &ScribeConfig,
) -> ScribeResult<MessageWriter<'k, W>> {
    encrypt_with(
        w,
        recipients,
        signer,
        hints,
        Some(BlockType::Message),
        config,
    )
}

fn encrypt_with<'k, W: Write>(
    w: W,
    recipients: &[&Entity],
    signer: Option<&'k Entity>,
    hints: Option<&FileHints>,
    armor: Option<BlockType>,
    config: &ScribeConfig,
) -> ScribeResult<MessageWriter<'k, W>> {
    if recipients.is_empty() {
        return Err(InvalidArgument::NoRecipients.into());
    }
    let encryption_keys = recipients
        .iter()
        .map(|r| r.key_for(Capability::Encrypt))
        .collect::<ScribeResult<Vec<Key<'_>>>>()?;
    let signing_key = signer
        .map(|s| -> ScribeResult<(Key<'k>, &'k PrivateKey)> {
            let key = s.key_for(Capability::Sign)?;
            Ok((key, key.private_key()?))
        })
        .transpose()?;

    let negotiated = negotiate(recipients.iter().map(|r| {
        r.primary_identity()
            .map(|i| Preferences {
                symmetric: &i.self_signature.preferred_symmetric,
                hash: &i.self_signature.preferred_hash,
            })
            .unwrap_or_default()
    }))?;
    let session_key = SessionKey::generate(&mut OsRng, negotiated.cipher)?;

    let signature_hash = negotiated.signature_hash();
    let inline_signature = signing_key
        .map(|(key, private_key)| -> ScribeResult<InlineSignature<'k>> {
            Ok(InlineSignature {
                signature: Signature::new(
                    SignatureType::Binary,
                    key.public_key(),
                    signature_hash,
                    config.signing.timestamp(),
                )?,
                hasher: SignatureHasher::new(signature_hash, SignatureType::Binary)?,
                signer: private_key,
            })
        })
        .transpose()?;

    let mut sink = Sink::open(w, armor, &config.armor)?;
    for key in &encryption_keys {
        serialize_encrypted_key(&mut sink, &mut OsRng, key.public_key(), &session_key)?;
    }
    let encrypted = serialize_symmetrically_encrypted(sink, &session_key);

    tracing::debug!(
        recipients = encryption_keys.len(),
        cipher = ?negotiated.cipher,
        signed = inline_signature.is_some(),
        signature_hash = ?inline_signature.as_ref().map(|s| s.signature.hash),
        "encrypted message opened"
    );
    let default_hints = FileHints::default();
    MessageWriter::open(
        encrypted,
        inline_signature,
        hints.unwrap_or(&default_hints),
    )
}

/// Encrypt a message under a key derived from `passphrase`.
pub fn symmetrically_encrypt<W: Write>(
    w: W,
    passphrase: &SecretString,
    hints: Option<&FileHints>,
    config: &ScribeConfig,
) -> ScribeResult<MessageWriter<'static, W>> {
    symmetrically_encrypt_with(w, passphrase, hints, None, config)
}

/// [`symmetrically_encrypt`] with an armored `PGP MESSAGE` output.
pub fn armored_symmetrically_encrypt<W: Write>(
    w: W,
    passphrase: &SecretString,
    hints: Option<&FileHints>,
    config: &ScribeConfig,
) -> ScribeResult<MessageWriter<'static, W>> {
    symmetrically_encrypt_with(w, passphrase, hints, Some(BlockType::Message), config)
}

fn symmetrically_encrypt_with<W: Write>(
    w: W,
    passphrase: &SecretString,
    hints: Option<&FileHints>,
    armor: Option<BlockType>,
    config: &ScribeConfig,
) -> ScribeResult<MessageWriter<'static, W>> {
    let encryption = &config.encryption;
    let mut skesk = Vec::new();
    let session_key = serialize_symmetric_key_encrypted(
        &mut skesk,
        &mut OsRng,
        passphrase,
        encryption.passphrase_cipher,
        encryption.s2k_hash,
        encryption.s2k_count,
    )?;

    let mut sink = Sink::open(w, armor, &config.armor)?;
    sink.write_all(&skesk)?;
    let encrypted = serialize_symmetrically_encrypted(sink, &session_key);

    let default_hints = FileHints::default();
    MessageWriter::open(encrypted, None, hints.unwrap_or(&default_hints))
}
