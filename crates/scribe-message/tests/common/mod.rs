//! Fixtures plus helpers that read scribe output back through rPGP's own
//! message parser, so every check runs through an independent reader.

#![allow(dead_code)]

use anyhow::{bail, ensure, Context, Result};
use pgp::composed::{
    Deserializable, Message, PlainSessionKey, SignedKeyDetails, SignedSecretKey,
    StandaloneSignature,
};
use pgp::packet::{DataMode, OnePassSignature, Packet, PacketParser, SymKeyEncryptedSessionKey};
use pgp::types::{EskType, KeyDetails, Password, Tag};
use scribe_core::ScribeConfig;
use scribe_message::{Entity, Identity, Subkey};
use scribe_packet::PrivateKey;

pub const KEY_CREATED: u32 = 1_600_000_000;
pub const SIGNED_AT: u32 = 1_700_000_000;

/// An entity plus its encryption subkey as an rPGP secret key.
pub struct TestRecipient {
    pub entity: Entity,
    pub secret_key: SignedSecretKey,
}

/// Ed25519 primary, X25519 encryption subkey, one primary identity carrying
/// the given preferences.
pub fn recipient(seed: u8, symmetric: &[u8], hash: &[u8]) -> TestRecipient {
    let subkey = PrivateKey::x25519([seed ^ 0x5A; 32], KEY_CREATED).unwrap();
    let secret_key = SignedSecretKey::new(
        subkey.packet().clone(),
        SignedKeyDetails::new(vec![], vec![], vec![], vec![]),
        vec![],
        vec![],
    );
    let entity = Entity::from_private_key(PrivateKey::ed25519([seed; 32], KEY_CREATED).unwrap())
        .with_identity(
            Identity::new(format!("user{seed} <user{seed}@example.org>"))
                .primary()
                .with_preferences(symmetric, hash),
        )
        .with_subkey(Subkey::private(subkey));
    TestRecipient { entity, secret_key }
}

/// A signing-only entity.
pub fn signer(seed: u8) -> Entity {
    Entity::from_private_key(PrivateKey::ed25519([seed; 32], KEY_CREATED).unwrap())
        .with_identity(Identity::new(format!("signer{seed}")).primary())
}

/// Config with a fixed signature timestamp, so signatures are reproducible.
pub fn fixed_config() -> ScribeConfig {
    let mut config = ScribeConfig::default();
    config.signing.creation_time = Some(SIGNED_AT);
    config
}

pub fn sample_data(size: usize) -> Vec<u8> {
    (0..size)
        .map(|i| (i.wrapping_mul(31) ^ (i >> 5)) as u8)
        .collect()
}

pub fn packets(data: &[u8]) -> Result<Vec<Packet>> {
    Ok(PacketParser::new(data).collect::<pgp::errors::Result<Vec<_>>>()?)
}

pub fn packet_tags(data: &[u8]) -> Result<Vec<Tag>> {
    use pgp::packet::PacketTrait;
    Ok(packets(data)?.iter().map(|p| p.tag()).collect())
}

/// The session key `recipient` recovers from its PKESK in `message`.
pub fn session_key(message: &[u8], recipient: &TestRecipient) -> Result<PlainSessionKey> {
    let own_id = recipient.secret_key.primary_key.key_id();
    for packet in packets(message)? {
        let Packet::PublicKeyEncryptedSessionKey(pkesk) = packet else {
            continue;
        };
        if pkesk.id()? != &own_id {
            continue;
        }
        return Ok(recipient.secret_key.decrypt_session_key(
            &Password::empty(),
            pkesk.values()?,
            EskType::V3_4,
        )??);
    }
    bail!("no PKESK for this recipient")
}

/// The first SKESK in `message`.
pub fn skesk(message: &[u8]) -> Result<SymKeyEncryptedSessionKey> {
    packets(message)?
        .into_iter()
        .find_map(|p| match p {
            Packet::SymKeyEncryptedSessionKey(p) => Some(p),
            _ => None,
        })
        .context("no SKESK packet")
}

/// The decrypted content of a message.
#[derive(Debug, Clone)]
pub struct Opened {
    pub is_binary: bool,
    pub file_name: String,
    pub epoch: u32,
    pub data: Vec<u8>,
    pub one_pass: Option<OnePassSignature>,
    /// Present once the inline signature verified.
    pub signature: Option<pgp::packet::Signature>,
}

fn read_message(mut msg: Message<'_>, signer: Option<&Entity>) -> Result<Opened> {
    let header = msg.literal_data_header().context("no literal data")?;
    let is_binary = header.mode() == DataMode::Binary;
    let file_name = String::from_utf8(header.file_name().to_vec())?;
    let epoch = u32::try_from(header.created().timestamp())?;
    let one_pass = match &msg {
        Message::SignedOnePass {
            one_pass_signature, ..
        } => Some(one_pass_signature.clone()),
        _ => None,
    };

    let data = msg.as_data_vec()?;
    let signature = match signer {
        Some(signer) => Some(msg.verify(signer.primary_key.packet())?.clone()),
        None => {
            ensure!(!msg.is_signed(), "unexpected signature");
            None
        }
    };
    Ok(Opened {
        is_binary,
        file_name,
        epoch,
        data,
        one_pass,
        signature,
    })
}

/// Decrypt a public-key encrypted message as `recipient`.
pub fn open_with_key(message: &[u8], recipient: &TestRecipient) -> Result<Opened> {
    let msg = Message::from_bytes(message)?.decrypt(&Password::empty(), &recipient.secret_key)?;
    read_message(msg, None)
}

/// Decrypt as `recipient` and verify the inline signature made by `signer`.
pub fn open_signed(
    message: &[u8],
    recipient: &TestRecipient,
    signer: &Entity,
) -> Result<Opened> {
    let msg = Message::from_bytes(message)?.decrypt(&Password::empty(), &recipient.secret_key)?;
    read_message(msg, Some(signer))
}

/// Dearmor and decrypt as `recipient`, returning the armor headers too.
pub fn open_armored_with_key(
    text: &str,
    recipient: &TestRecipient,
) -> Result<(Opened, pgp::armor::Headers)> {
    let (msg, headers) = Message::from_armor(text.as_bytes())?;
    let msg = msg.decrypt(&Password::empty(), &recipient.secret_key)?;
    Ok((read_message(msg, None)?, headers))
}

/// Decrypt a passphrase-encrypted message.
pub fn open_with_passphrase(message: &[u8], passphrase: &str) -> Result<Opened> {
    let msg = Message::from_bytes(message)?.decrypt_with_password(&Password::from(passphrase))?;
    read_message(msg, None)
}

/// Parse a detached signature (one packet) and verify it over `message`.
pub fn verify_detached(
    signature: &[u8],
    message: &[u8],
    signer: &Entity,
) -> Result<pgp::packet::Signature> {
    let mut parsed = packets(signature)?;
    ensure!(parsed.len() == 1, "expected a single packet, got {}", parsed.len());
    let Some(Packet::Signature(sig)) = parsed.pop() else {
        bail!("not a signature packet");
    };
    sig.verify(signer.primary_key.packet(), message)?;
    Ok(sig)
}

/// Verify an armored detached signature.
pub fn verify_armored_detached(
    text: &str,
    message: &[u8],
    signer: &Entity,
) -> Result<pgp::packet::Signature> {
    let (sig, _) = StandaloneSignature::from_armor_single(text.as_bytes())?;
    sig.verify(signer.primary_key.packet(), message)?;
    Ok(sig.signature)
}

pub fn created_at(sig: &pgp::packet::Signature) -> Option<u32> {
    sig.created()
        .and_then(|t| u32::try_from(t.timestamp()).ok())
}

/// Whether `sig` names `entity`'s primary key as issuer, by key id and by
/// fingerprint.
pub fn issued_by(sig: &pgp::packet::Signature, entity: &Entity) -> bool {
    let key = entity.primary_key.packet();
    sig.issuer() == vec![&key.key_id()] && sig.issuer_fingerprint() == vec![&key.fingerprint()]
}
