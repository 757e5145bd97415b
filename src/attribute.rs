//! Attribute serialization: template form (once per Set) and occurrence
//! form (once per Item), per RP66 V1 §3.2.3 and the characteristics-byte
//! layout worked through in this crate's design notes.

use crate::repcode::RepresentationCode;
use crate::value::AttributeValue;
use crate::Result;
use std::io::Write;

/// Role-prefix bits shared by every attribute characteristics byte
/// (template or occurrence): `001` in the three most-significant bits.
const ATTRIBUTE_PREFIX: u8 = 0b001_00000;

/// An entry in a Set's attribute schema: the column definition shared by
/// every Item in that Set, written once as the template.
#[derive(Debug, Clone)]
pub struct AttributeSchema {
    pub label: String,
    pub representation_code: RepresentationCode,
    /// The template's declared element count. `1` unless the column is
    /// explicitly multivalued (e.g. a UVARI count=200 FSINGL array).
    pub count: usize,
    pub units: Option<String>,
}

impl AttributeSchema {
    pub fn new(label: impl Into<String>, representation_code: RepresentationCode) -> Self {
        AttributeSchema {
            label: label.into(),
            representation_code,
            count: 1,
            units: None,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    /// Emit this schema entry's template-form bytes.
    ///
    /// Characteristics byte: prefix `001`, then `label_present=1`,
    /// `count_present` (iff `count != 1`), `repcode_present=1`,
    /// `units_present` (iff units set), `value_present=0`.
    pub fn encode_template<W: Write>(&self, mut out: W) -> Result<()> {
        let count_present = self.count != 1;
        let units_present = self.units.is_some();
        let byte = ATTRIBUTE_PREFIX
            | (1 << 4)
            | ((count_present as u8) << 3)
            | (1 << 2)
            | ((units_present as u8) << 1);
        out.write_all(&[byte])?;
        AttributeValue::write_ident_like(&mut out, "attribute label", &self.label)?;
        if count_present {
            AttributeValue::write_uvari(&mut out, self.count as u32)?;
        }
        out.write_all(&[self.representation_code.code()])?;
        if let Some(units) = &self.units {
            AttributeValue::write_ident_like(&mut out, "UNITS", units)?;
        }
        Ok(())
    }
}

/// One Item's occurrence of an Attribute: the value (if present) that
/// fills in a column declared by the owning Set's [`AttributeSchema`].
///
/// An absent attribute (the column has no value for this Item) is
/// represented by `None` and encodes as the single byte `0x00`.
#[derive(Debug, Clone)]
pub struct Attribute {
    value: Option<AttributeValue>,
    /// An explicit element count, written only when it differs from the
    /// template's default of `1` — set automatically from the value's
    /// length unless overridden.
    explicit_count: bool,
}

impl Attribute {
    /// An attribute whose value is present, using whatever count is
    /// implied by the value's length.
    pub fn present(value: impl Into<AttributeValue>) -> Self {
        Attribute {
            value: Some(value.into()),
            explicit_count: false,
        }
    }

    /// An attribute whose value is present and whose count differs from
    /// the schema's template default, forcing `count_present=1` on the
    /// wire even if the count happens to equal the template's.
    pub fn present_with_explicit_count(value: impl Into<AttributeValue>) -> Self {
        Attribute {
            value: Some(value.into()),
            explicit_count: true,
        }
    }

    /// An attribute with no value for this Item.
    pub fn absent() -> Self {
        Attribute {
            value: None,
            explicit_count: false,
        }
    }

    pub fn value(&self) -> Option<&AttributeValue> {
        self.value.as_ref()
    }

    /// Emit this Item's occurrence-form bytes against `schema`.
    ///
    /// `count_present` and `value_present` follow whether the value's
    /// length differs from the schema's declared count (or was marked
    /// explicit); `repcode_present`/`units_present` are never set in
    /// occurrence form since this writer never emits a per-Item override
    /// of either (column-wide only). `label_present` is always `0`.
    pub fn encode_occurrence<W: Write>(&self, schema: &AttributeSchema, mut out: W) -> Result<()> {
        let Some(value) = &self.value else {
            out.write_all(&[0x00])?;
            return Ok(());
        };
        let count_present = self.explicit_count || value.len() != schema.count;
        let byte = ATTRIBUTE_PREFIX | ((count_present as u8) << 3) | 1;
        out.write_all(&[byte])?;
        if count_present {
            AttributeValue::write_uvari(&mut out, value.len() as u32)?;
        }
        value.encode(&mut out)?;
        Ok(())
    }
}

impl<T> From<T> for Attribute
where
    T: Into<AttributeValue>,
{
    fn from(v: T) -> Self {
        Attribute::present(v)
    }
}
