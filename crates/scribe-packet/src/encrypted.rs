//! Symmetrically encrypted integrity-protected data (SEIPD v1)
//!
//! ```text
//! [tag 18][version 1] CFB( prefix(bs) || prefix[bs-2..bs] || data || D3 14 || SHA1(...) )
//! ```
//! The plaintext is collected in memory and sealed by rPGP on `finish`,
//! which also draws the random prefix.

use pgp::packet::{PacketTrait, SymEncryptedProtectedData};
use rand::rngs::OsRng;
use scribe_core::{CipherFunction, ScribeResult};
use std::io::{self, Write};
use zeroize::Zeroizing;

use crate::convert;
use crate::session::SessionKey;

/// Encrypts everything written to it into a SEIPD packet.
#[must_use = "nothing is encrypted until `finish` is called"]
pub struct EncryptedWriter<W: Write> {
    inner: W,
    cipher: CipherFunction,
    key: Zeroizing<Vec<u8>>,
    plaintext: Zeroizing<Vec<u8>>,
}

impl<W: Write> EncryptedWriter<W> {
    /// Encrypt the collected plaintext, write the packet and return the
    /// underlying writer.
    pub fn finish(mut self) -> ScribeResult<W> {
        let packet = SymEncryptedProtectedData::encrypt_seipdv1(
            OsRng,
            convert::cipher(self.cipher),
            &self.key,
            &self.plaintext,
        )
        .map_err(convert::codec("encrypting data"))?;
        packet
            .to_writer_with_header(&mut self.inner)
            .map_err(convert::codec("writing encrypted data"))?;
        tracing::trace!(
            cipher = ?self.cipher,
            len = self.plaintext.len(),
            "encrypted packet written"
        );
        Ok(self.inner)
    }
}

impl<W: Write> Write for EncryptedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.plaintext.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Start a SEIPD packet keyed by `session_key`.
pub fn serialize_symmetrically_encrypted<W: Write>(
    w: W,
    session_key: &SessionKey,
) -> EncryptedWriter<W> {
    EncryptedWriter {
        inner: w,
        cipher: session_key.cipher(),
        key: Zeroizing::new(session_key.as_bytes().to_vec()),
        plaintext: Zeroizing::new(Vec::new()),
    }
}
