//! scribe-message: OpenPGP message construction
//!
//! Builds messages on top of the `scribe-packet` codec:
//! - Preference negotiation across recipients
//! - Detached signatures (binary or canonical text, optionally armored)
//! - Hybrid encryption to recipients, optionally signed
//! - Passphrase encryption

pub mod encrypt;
pub mod entity;
pub mod hints;
pub mod negotiate;
pub mod sign;
mod sink;

pub use encrypt::{
    armored_encrypt, armored_symmetrically_encrypt, encrypt, symmetrically_encrypt, MessageWriter,
};
pub use entity::{Capability, Entity, Identity, Key, KeyFlags, SelfSignature, Subkey};
pub use hints::{FileHints, CONSOLE_FILE_NAME};
pub use negotiate::{negotiate, AlgorithmSet, Negotiated, Preferences};
pub use sign::{armored_detach_sign, armored_detach_sign_text, detach_sign, detach_sign_text};
