//! Object identifiers: `OBNAME` and `OBJREF`.

use crate::error::{Error, Result};
use std::fmt;

/// Validate that `s` is ASCII and fits in the one-byte `IDENT` length
/// prefix. `IDENT` carries no charset restriction beyond plain ASCII; the
/// tighter, regex-specified restriction is specific to `UNITS`
/// (see [`crate::value`]).
pub fn validate_ident(what: &'static str, s: &str) -> Result<()> {
    if !s.is_ascii() {
        return Err(Error::CharsetViolation {
            what,
            detail: format!("{s:?} contains non-ASCII bytes"),
        });
    }
    if s.len() > 255 {
        return Err(Error::CharsetViolation {
            what,
            detail: format!("{s:?} is {} bytes, IDENT allows at most 255", s.len()),
        });
    }
    Ok(())
}

/// An `OBNAME`: the triple `(origin_reference, copy_number, name)` that
/// uniquely identifies an object within a logical file.
///
/// Quote (RP66 V1 §3.2.7): "an OBNAME ... consists of three components: an
/// Origin Reference, a Copy Number, and an Identifier (Name)".
#[derive(Debug, Eq, PartialEq, Hash, Clone)]
pub struct ObName {
    pub origin_reference: u32,
    pub copy_number: u8,
    pub name: String,
}

impl ObName {
    /// Build an `OBNAME`, validating `name` against the `IDENT` charset.
    ///
    /// `name` must be non-empty: an RP66 V1 Item name is an identifying
    /// reference other Items resolve by OBNAME, and an empty name cannot
    /// serve that purpose.
    ///
    /// `origin_reference` is normally left unset by callers building a
    /// graph and is instead assigned by [`crate::graph::LogicalFile`] when
    /// the graph is frozen for encoding.
    pub fn new(origin_reference: u32, copy_number: u8, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_ident("OBNAME.name", &name)?;
        if name.is_empty() {
            return Err(Error::CharsetViolation {
                what: "OBNAME.name",
                detail: "name must not be empty".into(),
            });
        }
        Ok(ObName {
            origin_reference,
            copy_number,
            name,
        })
    }
}

impl fmt::Display for ObName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}:{}", self.origin_reference, self.copy_number, self.name)
    }
}

/// An `OBJREF`: an `OBNAME` qualified by the IDENT name of the object set it
/// belongs to (e.g. `CHANNEL`, `FRAME`).
///
/// Quote (RP66 V1 §3.2.8): "an OBJREF ... consists of an Object Type and an
/// OBNAME".
#[derive(Debug, Eq, PartialEq, Hash, Clone)]
pub struct ObjRef {
    pub object_type: String,
    pub obname: ObName,
}

impl ObjRef {
    pub fn new(object_type: impl Into<String>, obname: ObName) -> Result<Self> {
        let object_type = object_type.into();
        validate_ident("OBJREF.object_type", &object_type)?;
        Ok(ObjRef { object_type, obname })
    }
}

impl fmt::Display for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.object_type, self.obname)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ascii_name() {
        assert!(ObName::new(0, 0, "DEPTH-1.a_b/c").is_ok());
        assert!(ObName::new(0, 0, "DEPTH CHANNEL").is_ok());
    }

    #[test]
    fn rejects_non_ascii() {
        let err = ObName::new(0, 0, "déepth").unwrap_err();
        assert!(matches!(err, Error::CharsetViolation { .. }));
    }

    #[test]
    fn rejects_overlong_name() {
        let long = "a".repeat(256);
        assert!(ObName::new(0, 0, long).is_err());
    }

    #[test]
    fn rejects_empty_name() {
        let err = ObName::new(0, 0, "").unwrap_err();
        assert!(matches!(err, Error::CharsetViolation { .. }));
    }
}
