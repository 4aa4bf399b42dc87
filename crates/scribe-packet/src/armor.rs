//! ASCII armor
//!
//! Format:
//! ```text
//! -----BEGIN PGP MESSAGE-----
//! Comment: optional headers
//!
//! wcBMA...base64, 64 columns...
//! =twTO
//! -----END PGP MESSAGE-----
//! ```
//! The `=` line is the base64 of the CRC-24 of the decoded payload. Encoding
//! and decoding are done by rPGP's armor module.

use pgp::armor::{Dearmor, Headers};
use scribe_core::{ScribeError, ScribeResult};
use std::collections::BTreeMap;
use std::io::{self, Read, Write};

use crate::convert;

pub use pgp::armor::BlockType;

/// Already-serialized packets handed to the armor encoder.
struct Payload<'a>(&'a [u8]);

impl pgp::ser::Serialize for Payload<'_> {
    fn to_writer<W: Write>(&self, w: &mut W) -> pgp::errors::Result<()> {
        w.write_all(self.0)?;
        Ok(())
    }

    fn write_len(&self) -> usize {
        self.0.len()
    }
}

/// Armor encoder. The BEGIN line, headers, body, checksum and END line are
/// all written by `finish`.
#[must_use = "nothing is armored until `finish` is called"]
pub struct ArmorWriter<W: Write> {
    inner: W,
    block_type: BlockType,
    headers: Headers,
    payload: Vec<u8>,
}

impl<W: Write> ArmorWriter<W> {
    /// Write the armored block and return the underlying writer.
    pub fn finish(mut self) -> ScribeResult<W> {
        let headers = (!self.headers.is_empty()).then_some(&self.headers);
        pgp::armor::write(
            &Payload(&self.payload),
            self.block_type,
            &mut self.inner,
            headers,
            true,
        )
        .map_err(convert::codec("writing armor"))?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for ArmorWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.payload.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Start an armored block of `block_type` with the given header lines.
/// Header keys and values that would break the line structure are refused.
pub fn encode<W: Write>(
    w: W,
    block_type: BlockType,
    headers: &BTreeMap<String, String>,
) -> ScribeResult<ArmorWriter<W>> {
    for (key, value) in headers {
        if key.is_empty() || key.contains([':', '\n', '\r']) || value.contains(['\n', '\r']) {
            return Err(ScribeError::Config(format!("invalid armor header {key:?}")));
        }
    }
    Ok(ArmorWriter {
        inner: w,
        block_type,
        headers: headers
            .iter()
            .map(|(k, v)| (k.clone(), vec![v.clone()]))
            .collect(),
        payload: Vec::new(),
    })
}

/// Parsed armor block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Armored {
    pub block_type: BlockType,
    pub headers: Headers,
    pub payload: Vec<u8>,
}

/// Decode a single armored block, verifying the checksum when present.
pub fn decode(s: &str) -> ScribeResult<Armored> {
    let mut dearmor = Dearmor::new(s.as_bytes());
    let mut payload = Vec::new();
    dearmor
        .read_to_end(&mut payload)
        .map_err(|e| ScribeError::codec(format!("armor: {e}")))?;
    let block_type = dearmor
        .typ
        .ok_or_else(|| ScribeError::codec("armor: missing BEGIN line"))?;
    Ok(Armored {
        block_type,
        headers: dearmor.headers,
        payload,
    })
}
