//! Digest contexts and the signature hashing stream

use scribe_core::{HashAlgorithm, ScribeError, ScribeResult, SignatureType};
use sha2::digest::DynDigest;
use std::io::{self, Write};

use crate::convert;

/// A fresh streaming digest context for `hash`.
pub fn new_hasher(hash: HashAlgorithm) -> ScribeResult<Box<dyn DynDigest + Send>> {
    convert::hash(hash)
        .new_hasher()
        .map_err(|e| ScribeError::codec(format!("digest context for {hash:?}: {e}")))
}

/// Digest context plus the stream that feeds it.
///
/// Binary signatures hash the bytes as written. Text signatures hash them with
/// every line ending (`\n`, `\r\n` or a lone `\r`) rewritten to CRLF. A CRLF
/// split across two writes is recognised.
pub struct SignatureHasher {
    hash: HashAlgorithm,
    sig_type: SignatureType,
    digest: Box<dyn DynDigest + Send>,
    pending_cr: bool,
}

impl SignatureHasher {
    pub fn new(hash: HashAlgorithm, sig_type: SignatureType) -> ScribeResult<Self> {
        Ok(Self {
            hash,
            sig_type,
            digest: new_hasher(hash)?,
            pending_cr: false,
        })
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash
    }

    pub fn signature_type(&self) -> SignatureType {
        self.sig_type
    }

    /// Stop canonicalizing and hand out the raw digest context, so the
    /// signature trailer can be appended verbatim.
    pub(crate) fn into_digest(mut self) -> Box<dyn DynDigest + Send> {
        if self.pending_cr {
            self.digest.update(b"\n");
        }
        self.digest
    }

    fn update_canonical(&mut self, buf: &[u8]) {
        let mut start = 0;
        for (i, &b) in buf.iter().enumerate() {
            match b {
                b'\n' => {
                    self.digest.update(&buf[start..i]);
                    if self.pending_cr {
                        self.digest.update(b"\n");
                    } else {
                        self.digest.update(b"\r\n");
                    }
                    self.pending_cr = false;
                    start = i + 1;
                }
                b'\r' => {
                    self.digest.update(&buf[start..i]);
                    if self.pending_cr {
                        self.digest.update(b"\n");
                    }
                    self.digest.update(b"\r");
                    self.pending_cr = true;
                    start = i + 1;
                }
                _ if self.pending_cr => {
                    self.digest.update(b"\n");
                    self.pending_cr = false;
                }
                _ => {}
            }
        }
        self.digest.update(&buf[start..]);
    }
}

impl Write for SignatureHasher {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.sig_type {
            SignatureType::Binary => self.digest.update(buf),
            SignatureType::Text => self.update_canonical(buf),
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
