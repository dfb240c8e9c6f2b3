//! Big-endian XDR reader.
//!
//! The reader is strict: booleans must be 0 or 1, padding must be zero,
//! and every variable-length field is checked against its declared maximum
//! before any allocation happens. Recursive types go through
//! [`XdrReader::nested`], which enforces a depth limit so hostile input
//! cannot blow the stack.

use bytes::Buf;

use super::error::{XdrError, XdrResult};
use super::writer::padding_for;
use super::XdrCodec;
use crate::config::DEFAULT_DEPTH_LIMIT;

/// Cursor over an encoded byte slice.
#[derive(Debug)]
pub struct XdrReader<'a> {
    buf: &'a [u8],
    depth: u32,
    depth_limit: u32,
}

impl<'a> XdrReader<'a> {
    /// Creates a reader with the default nesting limit.
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_depth_limit(buf, DEFAULT_DEPTH_LIMIT)
    }

    /// Creates a reader that refuses to nest recursive values deeper
    /// than `depth_limit`.
    pub fn with_depth_limit(buf: &'a [u8], depth_limit: u32) -> Self {
        Self {
            buf,
            depth: 0,
            depth_limit,
        }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// Fails unless the whole input has been consumed.
    pub fn finish(&self) -> XdrResult<()> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(XdrError::TrailingBytes(n)),
        }
    }

    fn need(&self, n: usize) -> XdrResult<()> {
        if self.buf.remaining() < n {
            return Err(XdrError::UnexpectedEof {
                needed: n,
                remaining: self.buf.remaining(),
            });
        }
        Ok(())
    }

    pub fn read_u32(&mut self) -> XdrResult<u32> {
        self.need(4)?;
        Ok(self.buf.get_u32())
    }

    pub fn read_i32(&mut self) -> XdrResult<i32> {
        self.need(4)?;
        Ok(self.buf.get_i32())
    }

    pub fn read_u64(&mut self) -> XdrResult<u64> {
        self.need(8)?;
        Ok(self.buf.get_u64())
    }

    pub fn read_i64(&mut self) -> XdrResult<i64> {
        self.need(8)?;
        Ok(self.buf.get_i64())
    }

    pub fn read_bool(&mut self) -> XdrResult<bool> {
        match self.read_u32()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(XdrError::malformed(
                "bool",
                format!("expected 0 or 1, got {}", other),
            )),
        }
    }

    /// Reads a union discriminant.
    pub fn read_discriminant(&mut self) -> XdrResult<i32> {
        self.read_i32()
    }

    fn skip_padding(&mut self, len: usize) -> XdrResult<()> {
        let pad = padding_for(len);
        self.need(pad)?;
        if self.buf[..pad].iter().any(|&b| b != 0) {
            return Err(XdrError::malformed("opaque", "non-zero padding"));
        }
        self.buf.advance(pad);
        Ok(())
    }

    /// Reads `N` bytes of fixed-length opaque data plus padding.
    pub fn read_fixed_opaque<const N: usize>(&mut self) -> XdrResult<[u8; N]> {
        self.need(N)?;
        let mut out = [0u8; N];
        self.buf.copy_to_slice(&mut out);
        self.skip_padding(N)?;
        Ok(out)
    }

    /// Reads length-prefixed opaque data bounded by `max` bytes.
    pub fn read_var_opaque(&mut self, max: u32, kind: &'static str) -> XdrResult<Vec<u8>> {
        let len = self.read_u32()?;
        if len > max {
            return Err(XdrError::malformed(
                kind,
                format!("length {} exceeds maximum of {}", len, max),
            ));
        }
        let len = len as usize;
        self.need(len)?;
        let out = self.buf[..len].to_vec();
        self.buf.advance(len);
        self.skip_padding(len)?;
        Ok(out)
    }

    /// Reads a length-prefixed UTF-8 string bounded by `max` bytes.
    pub fn read_string(&mut self, max: u32, kind: &'static str) -> XdrResult<String> {
        let bytes = self.read_var_opaque(max, kind)?;
        String::from_utf8(bytes).map_err(|_| XdrError::malformed(kind, "not valid UTF-8"))
    }

    pub fn read_optional<T: XdrCodec>(&mut self) -> XdrResult<Option<T>> {
        if self.read_bool()? {
            Ok(Some(T::decode(self)?))
        } else {
            Ok(None)
        }
    }

    /// Reads a counted array of at most `max` elements.
    pub fn read_array<T: XdrCodec>(&mut self, max: u32, kind: &'static str) -> XdrResult<Vec<T>> {
        let count = self.read_u32()?;
        if count > max {
            return Err(XdrError::malformed(
                kind,
                format!("{} elements exceeds maximum of {}", count, max),
            ));
        }
        // Every element occupies at least four bytes; reject impossible
        // counts before reserving memory for them.
        let count = count as usize;
        self.need(count.saturating_mul(4))?;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(T::decode(self)?);
        }
        Ok(items)
    }

    /// Runs `f` one nesting level deeper.
    pub fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> XdrResult<T>) -> XdrResult<T> {
        if self.depth >= self.depth_limit {
            return Err(XdrError::DepthLimitExceeded(self.depth_limit));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}
