use scribe_core::{ArmorConfig, ScribeResult};
use scribe_packet::armor::{self, ArmorWriter, BlockType};
use std::io::{self, Write};

/// The caller's output, optionally wrapped in an armor block.
pub(crate) enum Sink<W: Write> {
    Plain(W),
    Armored(ArmorWriter<W>),
}

impl<W: Write> Sink<W> {
    /// Wrap `w`, armoring as `block` when set. Nothing reaches `w` before
    /// `finish`.
    pub(crate) fn open(w: W, block: Option<BlockType>, config: &ArmorConfig) -> ScribeResult<Self> {
        match block {
            Some(block) => Ok(Self::Armored(armor::encode(w, block, &config.headers)?)),
            None => Ok(Self::Plain(w)),
        }
    }

    /// Close the armor block, if any, and return the caller's writer.
    pub(crate) fn finish(self) -> ScribeResult<W> {
        match self {
            Self::Plain(mut w) => {
                w.flush()?;
                Ok(w)
            }
            Self::Armored(a) => a.finish(),
        }
    }
}

impl<W: Write> Write for Sink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Plain(w) => w.write(buf),
            Self::Armored(a) => a.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(w) => w.flush(),
            Self::Armored(a) => a.flush(),
        }
    }
}
