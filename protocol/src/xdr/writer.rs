//! Big-endian XDR writer.
//!
//! Every primitive is written in network byte order. Opaque data and
//! strings are zero-padded to a 4-byte boundary. Variable-length fields
//! carry a `u32` length prefix and are checked against their declared
//! maximum before a single byte is written.

use bytes::{BufMut, BytesMut};

use super::error::{XdrError, XdrResult};
use super::XdrCodec;

/// Number of zero bytes needed to pad `len` up to a multiple of four.
#[inline]
pub(crate) fn padding_for(len: usize) -> usize {
    (4 - (len % 4)) % 4
}

/// Accumulates the wire form of one value.
#[derive(Debug, Default)]
pub struct XdrWriter {
    buf: BytesMut,
}

impl XdrWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consumes the writer and returns the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf.to_vec()
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.put_u32(value);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.put_i32(value);
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buf.put_u64(value);
    }

    pub fn write_i64(&mut self, value: i64) {
        self.buf.put_i64(value);
    }

    /// Booleans are a 4-byte 0 or 1.
    pub fn write_bool(&mut self, value: bool) {
        self.buf.put_u32(u32::from(value));
    }

    /// Writes a union discriminant.
    pub fn write_discriminant(&mut self, value: i32) {
        self.buf.put_i32(value);
    }

    /// Writes fixed-length opaque data followed by its padding.
    pub fn write_fixed_opaque(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
        self.buf.put_bytes(0, padding_for(bytes.len()));
    }

    /// Writes variable-length opaque data: length prefix, bytes, padding.
    ///
    /// Fails with a validation error when `bytes` exceeds `max`.
    pub fn write_var_opaque(&mut self, bytes: &[u8], max: u32, field: &'static str) -> XdrResult<()> {
        let len = checked_len(bytes.len(), max, field)?;
        self.buf.put_u32(len);
        self.write_fixed_opaque(bytes);
        Ok(())
    }

    /// Strings share the opaque layout; the bound is in bytes, not chars.
    pub fn write_string(&mut self, value: &str, max: u32, field: &'static str) -> XdrResult<()> {
        self.write_var_opaque(value.as_bytes(), max, field)
    }

    /// Optional values are a boolean presence flag followed by the value.
    pub fn write_optional<T: XdrCodec>(&mut self, value: Option<&T>) -> XdrResult<()> {
        match value {
            Some(v) => {
                self.write_bool(true);
                v.encode(self)
            }
            None => {
                self.write_bool(false);
                Ok(())
            }
        }
    }

    /// Variable-length arrays: element count then each element.
    pub fn write_array<T: XdrCodec>(&mut self, items: &[T], max: u32, field: &'static str) -> XdrResult<()> {
        let len = checked_len(items.len(), max, field)?;
        self.buf.put_u32(len);
        for item in items {
            item.encode(self)?;
        }
        Ok(())
    }
}

fn checked_len(len: usize, max: u32, field: &'static str) -> XdrResult<u32> {
    match u32::try_from(len) {
        Ok(n) if n <= max => Ok(n),
        _ => Err(XdrError::validation(
            field,
            format!("length {} exceeds maximum of {}", len, max),
        )),
    }
}
