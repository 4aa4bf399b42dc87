//! Literal data packets

use pgp::packet::{LiteralData, PacketHeader, PacketTrait};
use pgp::types::Tag;
use scribe_core::{ScribeError, ScribeResult};
use std::io::{self, Write};

use crate::convert;

/// Longest file name a literal packet can carry.
pub const MAX_FILE_NAME_LEN: usize = 255;

/// Collects caller data for a literal data packet, written out by `finish`.
#[must_use = "the literal packet is not written until `finish` is called"]
pub struct LiteralWriter<W: Write> {
    inner: W,
    /// Format octet, name and date, followed by the data as it arrives.
    body: Vec<u8>,
}

impl<W: Write> LiteralWriter<W> {
    /// Write the packet and return the underlying writer.
    pub fn finish(mut self) -> ScribeResult<W> {
        let len = u32::try_from(self.body.len())
            .map_err(|_| ScribeError::codec("literal data exceeds 4 GiB"))?;
        let header = PacketHeader::new_fixed(Tag::LiteralData, len);
        let packet = LiteralData::try_from_reader(header, &self.body[..])
            .map_err(convert::codec("building literal packet"))?;
        packet
            .to_writer_with_header(&mut self.inner)
            .map_err(convert::codec("writing literal packet"))?;
        tracing::trace!(len, "literal packet written");
        Ok(self.inner)
    }
}

impl<W: Write> Write for LiteralWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Start a literal data packet. `file_name` is truncated to 255 bytes on a
/// character boundary; `epoch` is the modification time (0 if unknown).
pub fn serialize_literal<W: Write>(
    w: W,
    is_binary: bool,
    file_name: &str,
    epoch: u32,
) -> LiteralWriter<W> {
    let name = truncate_name(file_name);
    let mut body = Vec::with_capacity(6 + name.len());
    body.push(if is_binary { b'b' } else { b't' });
    body.push(name.len() as u8);
    body.extend_from_slice(name.as_bytes());
    body.extend_from_slice(&epoch.to_be_bytes());
    LiteralWriter { inner: w, body }
}

fn truncate_name(name: &str) -> &str {
    if name.len() <= MAX_FILE_NAME_LEN {
        return name;
    }
    let mut end = MAX_FILE_NAME_LEN;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}
