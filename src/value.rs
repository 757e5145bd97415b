//! Typed attribute values: the tagged union of RP66 V1 primitive values that
//! an [`crate::attribute::Attribute`] can carry, and their wire encoding.

use crate::datetime::DlisDateTime;
use crate::error::{Error, Result};
use crate::reference::{validate_ident, ObName, ObjRef};
use crate::repcode::RepresentationCode;
use itertools::Itertools;
use smallvec::SmallVec;
use std::fmt;
use std::io::Write;

/// Inline capacity for a value's `SmallVec` backing store.
///
/// Most attributes and frame channels carry a single scalar; this avoids a
/// heap allocation for the overwhelmingly common case while still allowing
/// arbitrarily long vectors (e.g. a `UVARI` count of 200, or a multi-sample
/// waveform channel).
const INLINE: usize = 2;

/// A small vector of `T`, used as the backing store for every
/// [`AttributeValue`] variant.
pub type C<T> = SmallVec<[T; INLINE]>;

/// The RP66 V1 wire charset restriction shared by `UNITS` values:
/// `[A-Za-z0-9 \-./(),]*`.
fn validate_units(s: &str) -> Result<()> {
    if !s.is_ascii() {
        return Err(Error::CharsetViolation {
            what: "UNITS",
            detail: format!("{s:?} contains non-ASCII bytes"),
        });
    }
    if let Some(bad) = s.bytes().find(|&b| {
        !(b.is_ascii_alphanumeric() || b == b' ' || matches!(b, b'-' | b'.' | b'/' | b'(' | b')' | b','))
    }) {
        return Err(Error::CharsetViolation {
            what: "UNITS",
            detail: format!("{s:?} contains disallowed byte {bad:#04x}"),
        });
    }
    Ok(())
}

/// A multi-valued, representation-code-tagged attribute value.
///
/// Each variant corresponds to exactly one [`RepresentationCode`] and holds
/// zero or more values of that code's natural Rust type. An empty vector
/// represents an attribute whose value is absent at the count level (the
/// value component itself is then omitted from the wire form; see
/// [`crate::attribute`]).
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    FShort(C<f32>),
    FSingl(C<f32>),
    FDoubl(C<f64>),
    SShort(C<i8>),
    SNorm(C<i16>),
    SLong(C<i32>),
    UShort(C<u8>),
    UNorm(C<u16>),
    ULong(C<u32>),
    UVari(C<u32>),
    Ident(C<String>),
    Ascii(C<String>),
    DTime(C<DlisDateTime>),
    OBName(C<ObName>),
    ObjRef(C<ObjRef>),
    Units(C<String>),
    Status(C<bool>),
}

impl AttributeValue {
    /// Construct a single-valued `AttributeValue` from anything that knows
    /// how to describe its own representation code and wire encoding.
    pub fn scalar(value: impl Into<AttributeValue>) -> Self {
        value.into()
    }

    /// This value's representation code.
    pub fn representation_code(&self) -> RepresentationCode {
        use AttributeValue::*;
        match self {
            FShort(_) => RepresentationCode::FShort,
            FSingl(_) => RepresentationCode::FSingl,
            FDoubl(_) => RepresentationCode::FDoubl,
            SShort(_) => RepresentationCode::SShort,
            SNorm(_) => RepresentationCode::SNorm,
            SLong(_) => RepresentationCode::SLong,
            UShort(_) => RepresentationCode::UShort,
            UNorm(_) => RepresentationCode::UNorm,
            ULong(_) => RepresentationCode::ULong,
            UVari(_) => RepresentationCode::UVari,
            Ident(_) => RepresentationCode::Ident,
            Ascii(_) => RepresentationCode::Ascii,
            DTime(_) => RepresentationCode::DTime,
            OBName(_) => RepresentationCode::OBName,
            ObjRef(_) => RepresentationCode::ObjRef,
            Units(_) => RepresentationCode::Units,
            Status(_) => RepresentationCode::Status,
        }
    }

    /// The number of individual values carried (the `count`).
    pub fn len(&self) -> usize {
        use AttributeValue::*;
        match self {
            FShort(v) => v.len(),
            FSingl(v) => v.len(),
            FDoubl(v) => v.len(),
            SShort(v) => v.len(),
            SNorm(v) => v.len(),
            SLong(v) => v.len(),
            UShort(v) => v.len(),
            UNorm(v) => v.len(),
            ULong(v) => v.len(),
            UVari(v) => v.len(),
            Ident(v) => v.len(),
            Ascii(v) => v.len(),
            DTime(v) => v.len(),
            OBName(v) => v.len(),
            ObjRef(v) => v.len(),
            Units(v) => v.len(),
            Status(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write the UVARI encoding of `n`, per RP66 V1 Appendix B.19:
    /// one byte if `n < 128`, two bytes (high bits `10`) if `n < 16384`,
    /// four bytes (high bits `11`) otherwise.
    pub fn write_uvari<W: Write>(mut out: W, n: u32) -> Result<()> {
        if n < 128 {
            out.write_all(&[n as u8])?;
        } else if n < 16_384 {
            let v = (n as u16) | 0b1000_0000_0000_0000;
            out.write_all(&v.to_be_bytes())?;
        } else if n < 1_073_741_824 {
            let v = n | 0b1100_0000_0000_0000_0000_0000_0000_0000;
            out.write_all(&v.to_be_bytes())?;
        } else {
            return Err(Error::ValueOutOfRange {
                code: RepresentationCode::UVari,
                detail: format!("{n} does not fit in a 30-bit UVARI"),
            });
        }
        Ok(())
    }

    /// Write an `IDENT`-shaped field: a one-byte length followed by the
    /// ASCII bytes. Used for `IDENT` itself, for `OBNAME.name`, and for
    /// `OBJREF.object_type` and `UNITS`, all of which share this shape.
    pub(crate) fn write_ident_like<W: Write>(mut out: W, what: &'static str, s: &str) -> Result<()> {
        validate_ident(what, s)?;
        out.write_all(&[s.len() as u8])?;
        out.write_all(s.as_bytes())?;
        Ok(())
    }

    fn write_ascii<W: Write>(mut out: W, s: &str) -> Result<()> {
        if !s.is_ascii() {
            return Err(Error::CharsetViolation {
                what: "ASCII",
                detail: format!("{s:?} contains non-ASCII bytes"),
            });
        }
        if s.len() > u32::MAX as usize {
            return Err(Error::ValueOutOfRange {
                code: RepresentationCode::Ascii,
                detail: "string exceeds UVARI length prefix".into(),
            });
        }
        Self::write_uvari(&mut out, s.len() as u32)?;
        out.write_all(s.as_bytes())?;
        Ok(())
    }

    fn write_obname<W: Write>(mut out: W, v: &ObName) -> Result<()> {
        Self::write_uvari(&mut out, v.origin_reference)?;
        out.write_all(&[v.copy_number])?;
        Self::write_ident_like(&mut out, "OBNAME.name", &v.name)?;
        Ok(())
    }

    /// Encode every value in this attribute, back to back, with no
    /// separators and no leading count: callers that need the count (as
    /// part of an attribute's characteristics) write it themselves via
    /// [`AttributeValue::len`].
    pub fn encode<W: Write>(&self, mut out: W) -> Result<()> {
        use AttributeValue::*;
        match self {
            FShort(vs) => {
                for v in vs {
                    // RP66 V1 FSHORT is a reduced 16-bit float: 1 sign bit,
                    // 4 exponent bits (bias 15... as VAX-style, not IEEE
                    // half), 11 mantissa bits. No producer in the reference
                    // implementation this crate is grounded on ever emits
                    // FSHORT; we encode it as the upper 16 bits of the
                    // IEEE-754 f32 representation, which preserves sign and
                    // most exponent range and is documented here as a
                    // deliberate simplification rather than a literal
                    // VAX F-float reproduction.
                    let bits = (v.to_bits() >> 16) as u16;
                    out.write_all(&bits.to_be_bytes())?;
                }
            }
            FSingl(vs) => {
                for v in vs {
                    out.write_all(&v.to_be_bytes())?;
                }
            }
            FDoubl(vs) => {
                for v in vs {
                    out.write_all(&v.to_be_bytes())?;
                }
            }
            SShort(vs) => {
                for v in vs {
                    out.write_all(&v.to_be_bytes())?;
                }
            }
            SNorm(vs) => {
                for v in vs {
                    out.write_all(&v.to_be_bytes())?;
                }
            }
            SLong(vs) => {
                for v in vs {
                    out.write_all(&v.to_be_bytes())?;
                }
            }
            UShort(vs) => {
                for v in vs {
                    out.write_all(&v.to_be_bytes())?;
                }
            }
            UNorm(vs) => {
                for v in vs {
                    out.write_all(&v.to_be_bytes())?;
                }
            }
            ULong(vs) => {
                for v in vs {
                    out.write_all(&v.to_be_bytes())?;
                }
            }
            UVari(vs) => {
                for v in vs {
                    Self::write_uvari(&mut out, *v)?;
                }
            }
            Ident(vs) => {
                for v in vs {
                    Self::write_ident_like(&mut out, "IDENT", v)?;
                }
            }
            Ascii(vs) => {
                for v in vs {
                    Self::write_ascii(&mut out, v)?;
                }
            }
            DTime(vs) => {
                for v in vs {
                    out.write_all(&v.to_bytes()?)?;
                }
            }
            OBName(vs) => {
                for v in vs {
                    Self::write_obname(&mut out, v)?;
                }
            }
            ObjRef(vs) => {
                for v in vs {
                    Self::write_ident_like(&mut out, "OBJREF.object_type", &v.object_type)?;
                    Self::write_obname(&mut out, &v.obname)?;
                }
            }
            Units(vs) => {
                for v in vs {
                    validate_units(v)?;
                    Self::write_ident_like(&mut out, "UNITS", v)?;
                }
            }
            Status(vs) => {
                for v in vs {
                    out.write_all(&[if *v { 1 } else { 0 }])?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use AttributeValue::*;
        match self {
            FShort(v) | FSingl(v) => write!(f, "{}", v.iter().join(", ")),
            FDoubl(v) => write!(f, "{}", v.iter().join(", ")),
            SShort(v) => write!(f, "{}", v.iter().join(", ")),
            SNorm(v) => write!(f, "{}", v.iter().join(", ")),
            SLong(v) => write!(f, "{}", v.iter().join(", ")),
            UShort(v) => write!(f, "{}", v.iter().join(", ")),
            UNorm(v) => write!(f, "{}", v.iter().join(", ")),
            ULong(v) | UVari(v) => write!(f, "{}", v.iter().join(", ")),
            Ident(v) | Ascii(v) | Units(v) => write!(f, "{}", v.iter().join(", ")),
            DTime(v) => write!(f, "{}", v.iter().map(|d| format!("{d:?}")).join(", ")),
            OBName(v) => write!(f, "{}", v.iter().join(", ")),
            ObjRef(v) => write!(f, "{}", v.iter().join(", ")),
            Status(v) => write!(f, "{}", v.iter().join(", ")),
        }
    }
}

macro_rules! impl_from_scalar {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for AttributeValue {
            fn from(v: $ty) -> Self {
                AttributeValue::$variant(C::from_elem(v, 1))
            }
        }
    };
}

impl_from_scalar!(i8, SShort);
impl_from_scalar!(i16, SNorm);
impl_from_scalar!(i32, SLong);
impl_from_scalar!(u8, UShort);
impl_from_scalar!(u16, UNorm);
impl_from_scalar!(u32, ULong);
impl_from_scalar!(f32, FSingl);
impl_from_scalar!(f64, FDoubl);
impl_from_scalar!(bool, Status);
impl_from_scalar!(DlisDateTime, DTime);
impl_from_scalar!(ObName, OBName);
impl_from_scalar!(ObjRef, ObjRef);

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::Ident(C::from_elem(v, 1))
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::Ident(C::from_elem(v.to_string(), 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uvari_one_byte() {
        let mut buf = Vec::new();
        AttributeValue::write_uvari(&mut buf, 127).unwrap();
        assert_eq!(buf, vec![127]);
    }

    #[test]
    fn uvari_two_byte() {
        let mut buf = Vec::new();
        AttributeValue::write_uvari(&mut buf, 200).unwrap();
        assert_eq!(buf, vec![0b1000_0000, 200]);
    }

    #[test]
    fn uvari_four_byte() {
        let mut buf = Vec::new();
        AttributeValue::write_uvari(&mut buf, 20_000).unwrap();
        assert_eq!(buf.len(), 4);
        assert_eq!(buf[0] & 0b1100_0000, 0b1100_0000);
        let v = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) & 0x3FFF_FFFF;
        assert_eq!(v, 20_000);
    }

    #[test]
    fn ulong_scalar_roundtrip_shape() {
        let av: AttributeValue = 42u32.into();
        assert_eq!(av.representation_code(), RepresentationCode::ULong);
        assert_eq!(av.len(), 1);
        let mut buf = Vec::new();
        av.encode(&mut buf).unwrap();
        assert_eq!(buf, 42u32.to_be_bytes());
    }

    #[test]
    fn units_rejects_disallowed_char() {
        let av = AttributeValue::Units(C::from_elem("ohm#m".to_string(), 1));
        let mut buf = Vec::new();
        assert!(av.encode(&mut buf).is_err());
    }
}
