//! RP66 V1 Appendix B representation codes.
//!
//! A representation code is a closed enumeration tagging the wire type of a
//! primitive value. This module only declares the codes that this writer
//! core needs to emit; decoding and the remaining Appendix B codes (e.g.
//! `FSING1`, `CSINGL`, `ATTREF`) are not part of this writer's scope.

use std::fmt;

/// A representation code, as found in RP66 V1 Appendix B.
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone, Ord, PartialOrd)]
pub enum RepresentationCode {
    /// 16-bit IEEE-like floating point, fixed width.
    FShort,
    /// 32-bit IEEE float.
    FSingl,
    /// 64-bit IEEE float.
    FDoubl,
    /// Signed 8-bit integer.
    SShort,
    /// Signed 16-bit integer.
    SNorm,
    /// Signed 32-bit integer.
    SLong,
    /// Unsigned 8-bit integer.
    UShort,
    /// Unsigned 16-bit integer.
    UNorm,
    /// Unsigned 32-bit integer.
    ULong,
    /// Unsigned variable-length integer (1, 2 or 4 bytes).
    UVari,
    /// Length-prefixed ASCII identifier, restricted charset, <= 255 bytes.
    Ident,
    /// Length-prefixed ASCII string.
    Ascii,
    /// Calendar date/time with millisecond resolution.
    DTime,
    /// Object name reference: (origin_reference, copy_number, name).
    OBName,
    /// Typed object reference: set_type + OBNAME.
    ObjRef,
    /// Measurement unit string, restricted charset.
    Units,
    /// Boolean 0/1.
    Status,
}

impl RepresentationCode {
    /// The numeric code written into the wire form of a template
    /// attribute, per RP66 V1 Appendix B.
    pub fn code(self) -> u8 {
        use RepresentationCode::*;
        match self {
            FShort => 1,
            FSingl => 2,
            FDoubl => 7,
            SShort => 12,
            SNorm => 13,
            SLong => 14,
            UShort => 15,
            UNorm => 16,
            ULong => 17,
            UVari => 18,
            Ident => 19,
            Ascii => 20,
            DTime => 21,
            OBName => 23,
            ObjRef => 24,
            Units => 27,
            Status => 26,
        }
    }

    /// The fixed wire width of this code in bytes, or `None` for
    /// variable-length codes (`UVARI`, `IDENT`, `ASCII`, `UNITS`, `OBNAME`,
    /// `OBJREF`).
    pub fn fixed_width(self) -> Option<usize> {
        use RepresentationCode::*;
        match self {
            FShort => Some(2),
            FSingl => Some(4),
            FDoubl => Some(8),
            SShort => Some(1),
            SNorm => Some(2),
            SLong => Some(4),
            UShort => Some(1),
            UNorm => Some(2),
            ULong => Some(4),
            DTime => Some(8),
            // STATUS reuses the USHORT wire form: a single 0/1 byte.
            Status => Some(1),
            UVari | Ident | Ascii | OBName | ObjRef | Units => None,
        }
    }
}

impl fmt::Display for RepresentationCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::RepresentationCode::*;

    #[test]
    fn codes_match_appendix_b() {
        assert_eq!(FShort.code(), 1);
        assert_eq!(FSingl.code(), 2);
        assert_eq!(FDoubl.code(), 7);
        assert_eq!(SShort.code(), 12);
        assert_eq!(SNorm.code(), 13);
        assert_eq!(SLong.code(), 14);
        assert_eq!(UShort.code(), 15);
        assert_eq!(UNorm.code(), 16);
        assert_eq!(ULong.code(), 17);
        assert_eq!(UVari.code(), 18);
        assert_eq!(Ident.code(), 19);
        assert_eq!(Ascii.code(), 20);
        assert_eq!(DTime.code(), 21);
        assert_eq!(OBName.code(), 23);
        assert_eq!(ObjRef.code(), 24);
        assert_eq!(Status.code(), 26);
        assert_eq!(Units.code(), 27);
    }
}
