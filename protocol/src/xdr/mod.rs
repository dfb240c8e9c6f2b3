//! # XDR Wire Codec
//!
//! The ledger speaks XDR: big-endian integers, unions as a 4-byte
//! discriminant followed by the arm's payload, and every variable-length
//! field padded to a 4-byte boundary. This module holds the primitives every
//! ledger structure is built from.
//!
//! ```text
//! error.rs  : XdrError, the one error type of the codec
//! writer.rs : XdrWriter (BufMut-backed, checks length bounds)
//! reader.rs : XdrReader (Buf-backed, strict, depth-guarded)
//! serde_support.rs: serde helpers for hex bytes and address strings
//! ```
//!
//! Every ledger type implements [`XdrCodec`], which gives it binary and
//! base64 entry points for free.

pub mod error;
pub mod reader;
pub mod serde_support;
pub mod writer;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

pub use error::{XdrError, XdrResult};
pub use reader::XdrReader;
pub use writer::XdrWriter;

/// A value with a canonical XDR wire form.
///
/// Implementors provide `encode` and `decode`; the byte-slice and base64
/// entry points are derived from them.
pub trait XdrCodec: Sized {
    /// Appends this value's wire form to `w`.
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()>;

    /// Reads one value from `r`.
    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self>;

    /// Encodes to a fresh byte vector.
    fn to_xdr(&self) -> XdrResult<Vec<u8>> {
        let mut w = XdrWriter::new();
        self.encode(&mut w)?;
        Ok(w.into_bytes())
    }

    /// Decodes exactly one value; leftover input is an error.
    fn from_xdr(bytes: &[u8]) -> XdrResult<Self> {
        let mut r = XdrReader::new(bytes);
        let value = Self::decode(&mut r)?;
        r.finish()?;
        Ok(value)
    }

    /// Encodes and wraps in standard base64, for JSON fields and request bodies.
    fn to_xdr_base64(&self) -> XdrResult<String> {
        Ok(BASE64.encode(self.to_xdr()?))
    }

    /// Inverse of [`to_xdr_base64`](Self::to_xdr_base64).
    fn from_xdr_base64(encoded: &str) -> XdrResult<Self> {
        let bytes = BASE64.decode(encoded.trim())?;
        Self::from_xdr(&bytes)
    }
}

// ---------------------------------------------------------------------------
// Primitive impls (so arrays and optionals of integers just work)
// ---------------------------------------------------------------------------

impl XdrCodec for u32 {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        w.write_u32(*self);
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        r.read_u32()
    }
}

impl XdrCodec for i32 {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        w.write_i32(*self);
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        r.read_i32()
    }
}

impl XdrCodec for u64 {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        w.write_u64(*self);
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        r.read_u64()
    }
}

impl XdrCodec for i64 {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        w.write_i64(*self);
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        r.read_i64()
    }
}

impl XdrCodec for bool {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        w.write_bool(*self);
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        r.read_bool()
    }
}

// ---------------------------------------------------------------------------
// ExtensionPoint
// ---------------------------------------------------------------------------

/// Reserved forward-compatibility slot with no versions defined yet.
///
/// Always encodes as discriminant 0. Any other value on decode means the
/// data was produced by a newer protocol than this model understands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
pub struct ExtensionPoint;

impl XdrCodec for ExtensionPoint {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        w.write_discriminant(0);
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        match r.read_discriminant()? {
            0 => Ok(ExtensionPoint),
            v => Err(XdrError::unknown("ExtensionPoint", v)),
        }
    }
}

/// Reads a `union switch (int v) { case 0: void; case N: T }` extension link.
///
/// Returns `None` for discriminant 0, decodes `T` for `version`, and
/// rejects everything else. Nothing beyond the discriminant is read when
/// the link is absent.
pub fn read_extension<T: XdrCodec>(
    r: &mut XdrReader<'_>,
    version: i32,
    kind: &'static str,
) -> XdrResult<Option<T>> {
    match r.read_discriminant()? {
        0 => Ok(None),
        v if v == version => Ok(Some(T::decode(r)?)),
        v => Err(XdrError::unknown(kind, v)),
    }
}

/// Writes an extension link: 0 when absent, else `version` then the payload.
pub fn write_extension<T: XdrCodec>(w: &mut XdrWriter, version: i32, ext: Option<&T>) -> XdrResult<()> {
    match ext {
        None => {
            w.write_discriminant(0);
            Ok(())
        }
        Some(v) => {
            w.write_discriminant(version);
            v.encode(w)
        }
    }
}

// ---------------------------------------------------------------------------
// xdr_enum!: plain XDR enums
// ---------------------------------------------------------------------------

/// Declares a field-less XDR enum with its wire values and a codec that
/// rejects unknown values.
macro_rules! xdr_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ::serde::Serialize, ::serde::Deserialize)]
        #[repr(i32)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant = $value ),+
        }

        impl $name {
            /// All variants in wire order.
            pub const VARIANTS: &'static [$name] = &[$($name::$variant),+];

            /// Maps a wire value back to a variant.
            pub fn from_i32(value: i32) -> Option<Self> {
                match value {
                    $( v if v == $value => Some($name::$variant), )+
                    _ => None,
                }
            }

            /// The wire value of this variant.
            pub fn as_i32(self) -> i32 {
                self as i32
            }
        }

        impl $crate::xdr::XdrCodec for $name {
            fn encode(&self, w: &mut $crate::xdr::XdrWriter) -> $crate::xdr::XdrResult<()> {
                w.write_discriminant(self.as_i32());
                Ok(())
            }

            fn decode(r: &mut $crate::xdr::XdrReader<'_>) -> $crate::xdr::XdrResult<Self> {
                let value = r.read_discriminant()?;
                Self::from_i32(value)
                    .ok_or_else(|| $crate::xdr::XdrError::unknown(stringify!($name), value))
            }
        }
    };
}

pub(crate) use xdr_enum;

#[cfg(test)]
mod tests {
    use super::*;

    xdr_enum! {
        enum Color {
            Red = 0,
            Blue = 7,
        }
    }

    #[test]
    fn xdr_enum_round_trips_and_rejects_unknown() {
        let bytes = Color::Blue.to_xdr().unwrap();
        assert_eq!(bytes, vec![0, 0, 0, 7]);
        assert_eq!(Color::from_xdr(&bytes).unwrap(), Color::Blue);
        assert_eq!(Color::VARIANTS.len(), 2);
        assert_eq!(
            Color::from_xdr(&[0, 0, 0, 3]),
            Err(XdrError::unknown("Color", 3))
        );
    }

    #[test]
    fn base64_entry_points() {
        let encoded = 42u32.to_xdr_base64().unwrap();
        assert_eq!(encoded, "AAAAKg==");
        assert_eq!(u32::from_xdr_base64(&encoded).unwrap(), 42);
        assert!(matches!(
            u32::from_xdr_base64("not base64!"),
            Err(XdrError::Base64(_))
        ));
    }

    #[test]
    fn from_xdr_rejects_trailing_bytes() {
        assert_eq!(
            u32::from_xdr(&[0, 0, 0, 1, 0, 0, 0, 0]),
            Err(XdrError::TrailingBytes(4))
        );
    }

    #[test]
    fn extension_link_absent_reads_only_discriminant() {
        let bytes = [0, 0, 0, 0, 0xAA];
        let mut r = XdrReader::new(&bytes);
        let ext: Option<u32> = read_extension(&mut r, 1, "Test.ext").unwrap();
        assert!(ext.is_none());
        assert_eq!(r.remaining(), 1);
    }

    #[test]
    fn extension_link_with_wrong_version_is_unknown() {
        let bytes = [0, 0, 0, 2, 0, 0, 0, 5];
        let mut r = XdrReader::new(&bytes);
        let result: XdrResult<Option<u32>> = read_extension(&mut r, 1, "Test.ext");
        assert_eq!(result, Err(XdrError::unknown("Test.ext", 2)));
    }

    #[test]
    fn extension_point_is_always_zero() {
        assert_eq!(ExtensionPoint.to_xdr().unwrap(), vec![0, 0, 0, 0]);
        assert!(ExtensionPoint::from_xdr(&[0, 0, 0, 1]).is_err());
    }
}
