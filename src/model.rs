//! The EFLR object model: Sets (tables), Items (rows) and their attribute
//! schema, with generic template/object/attribute body encoding.

use crate::attribute::{Attribute, AttributeSchema};
use crate::error::Error;
use crate::reference::{validate_ident, ObName};
use crate::value::AttributeValue;
use crate::Result;
use std::io::Write;

/// The RP66 V1 Appendix A logical-record-type code carried by an EFLR's
/// LRS header.
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone)]
pub struct LogicalRecordType(pub u8);

impl LogicalRecordType {
    pub const FILE_HEADER: Self = Self(0);
    pub const ORIGIN: Self = Self(1);
    pub const AXIS: Self = Self(2);
    pub const CHANNEL: Self = Self(3);
    pub const FRAME: Self = Self(4);
    pub const STATIC: Self = Self(5);
    pub const SCRIPT: Self = Self(6);
    pub const UPDATE: Self = Self(7);
    pub const UPDATED_DATA_ID: Self = Self(8);
    pub const LONG_NAME: Self = Self(9);
    pub const SPECIFICATION: Self = Self(10);
    pub const DICTIONARY: Self = Self(11);
    /// The fixed logical-record-type of every IFLR FrameData row.
    pub const FRAME_DATA: Self = Self(0);
}

/// One row of an EFLR Set: a name and the populated Attribute occurrences,
/// positional against the owning Set's [`AttributeSchema`] list.
#[derive(Debug, Clone)]
pub struct Item {
    name: ObName,
    attributes: Vec<Attribute>,
}

impl Item {
    pub fn new(name: ObName, attributes: Vec<Attribute>) -> Self {
        Item { name, attributes }
    }

    pub fn name(&self) -> &ObName {
        &self.name
    }

    /// Assign this item's `origin_reference`, propagated from the owning
    /// Origin during [`crate::graph::LogicalFile::attach_origin_reference`].
    pub(crate) fn set_origin_reference(&mut self, origin_reference: u32) {
        self.name.origin_reference = origin_reference;
    }

    fn encode_body<W: Write>(&self, schema: &[AttributeSchema], mut out: W) -> Result<()> {
        out.write_all(&[0x70])?;
        AttributeValue::write_uvari(&mut out, self.name.origin_reference)?;
        out.write_all(&[self.name.copy_number])?;
        AttributeValue::write_ident_like(&mut out, "OBNAME.name", &self.name.name)?;
        for (attr, col) in self.attributes.iter().zip(schema) {
            attr.encode_occurrence(col, &mut out)?;
        }
        Ok(())
    }
}

/// A table of uniformly-shaped rows: the EFLR Set.
///
/// Invariants enforced at construction: `set_type` is fixed for the life
/// of the Set; every Item's attribute list matches the schema's length in
/// schema order; Item names are unique within the Set (by copy number and
/// name — `origin_reference` is shared across a single logical file and
/// assigned uniformly after the graph is built, see
/// [`crate::graph::LogicalFile`]).
#[derive(Debug, Clone)]
pub struct Set {
    set_type: String,
    set_name: Option<String>,
    logical_record_type: LogicalRecordType,
    schema: Vec<AttributeSchema>,
    items: Vec<Item>,
}

impl Set {
    pub fn new(
        set_type: impl Into<String>,
        logical_record_type: LogicalRecordType,
        schema: Vec<AttributeSchema>,
    ) -> Result<Self> {
        let set_type = set_type.into();
        validate_ident("Set.set_type", &set_type)?;
        Ok(Set {
            set_type,
            set_name: None,
            logical_record_type,
            schema,
            items: Vec::new(),
        })
    }

    pub fn with_set_name(mut self, set_name: impl Into<String>) -> Result<Self> {
        let set_name = set_name.into();
        validate_ident("Set.set_name", &set_name)?;
        self.set_name = Some(set_name);
        Ok(self)
    }

    pub fn set_type(&self) -> &str {
        &self.set_type
    }

    pub fn schema(&self) -> &[AttributeSchema] {
        &self.schema
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [Item] {
        &mut self.items
    }

    /// Add a row, validating it against the schema's shape (attribute
    /// count and, for present values, representation code) and against
    /// uniqueness of existing item names.
    pub fn add_item(&mut self, item: Item) -> Result<()> {
        if item.attributes.len() != self.schema.len() {
            return Err(Error::SchemaViolation {
                detail: format!(
                    "item {} has {} attributes, set {} declares {}",
                    item.name,
                    item.attributes.len(),
                    self.set_type,
                    self.schema.len()
                ),
            });
        }
        for (attr, column) in item.attributes.iter().zip(&self.schema) {
            if let Some(value) = attr.value() {
                if value.representation_code() != column.representation_code {
                    return Err(Error::SchemaViolation {
                        detail: format!(
                            "item {} attribute {}: set {} declares {:?}, got {:?}",
                            item.name,
                            column.label,
                            self.set_type,
                            column.representation_code,
                            value.representation_code()
                        ),
                    });
                }
            }
        }
        if self
            .items
            .iter()
            .any(|existing| existing.name.copy_number == item.name.copy_number && existing.name.name == item.name.name)
        {
            return Err(Error::SchemaViolation {
                detail: format!("duplicate item name {} in set {}", item.name, self.set_type),
            });
        }
        self.items.push(item);
        Ok(())
    }

    pub(crate) fn assign_origin_reference(&mut self, origin_reference: u32) {
        for item in &mut self.items {
            item.set_origin_reference(origin_reference);
        }
    }

    /// The set component byte and IDENT fields: `0xF8 IDENT(set_type)
    /// IDENT(set_name)` when named, else `0xF0 IDENT(set_type)`.
    fn encode_set_component<W: Write>(&self, mut out: W) -> Result<()> {
        match &self.set_name {
            Some(name) => {
                out.write_all(&[0xF8])?;
                AttributeValue::write_ident_like(&mut out, "Set.set_type", &self.set_type)?;
                AttributeValue::write_ident_like(&mut out, "Set.set_name", name)?;
            }
            None => {
                out.write_all(&[0xF0])?;
                AttributeValue::write_ident_like(&mut out, "Set.set_type", &self.set_type)?;
            }
        }
        Ok(())
    }

    /// The body bytes of this Set's EFLR: set component, template, then
    /// each Item's object component and occurrence-form attributes.
    pub fn encode_body(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.encode_set_component(&mut out)?;
        for column in &self.schema {
            column.encode_template(&mut out)?;
        }
        for item in &self.items {
            item.encode_body(&self.schema, &mut out)?;
        }
        Ok(out)
    }

    pub fn logical_record_type(&self) -> LogicalRecordType {
        self.logical_record_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repcode::RepresentationCode;

    fn channel_set() -> Set {
        let schema = vec![
            AttributeSchema::new("LONG-NAME", RepresentationCode::Ident),
            AttributeSchema::new("DIMENSION", RepresentationCode::ULong),
        ];
        Set::new("CHANNEL", LogicalRecordType::CHANNEL, schema).unwrap()
    }

    #[test]
    fn rejects_mismatched_attribute_count() {
        let mut set = channel_set();
        let item = Item::new(
            ObName::new(0, 0, "DEPT").unwrap(),
            vec![Attribute::present("DEPTH")],
        );
        assert!(set.add_item(item).is_err());
    }

    #[test]
    fn rejects_attribute_with_wrong_representation_code() {
        let mut set = channel_set();
        // DIMENSION is templated as ULong; an Ident value in that column
        // must be rejected rather than silently encoded under a template
        // entry that tells readers to expect a different wire type.
        let item = Item::new(
            ObName::new(0, 0, "DEPT").unwrap(),
            vec![Attribute::present("DEPTH"), Attribute::present(1u32)],
        );
        assert!(set.add_item(item).is_ok());

        let bad_item = Item::new(
            ObName::new(0, 0, "GR").unwrap(),
            vec![Attribute::present("GAMMA RAY"), Attribute::present("NOT A NUMBER")],
        );
        assert!(set.add_item(bad_item).is_err());
    }

    #[test]
    fn rejects_duplicate_item_names() {
        let mut set = channel_set();
        let make = || {
            Item::new(
                ObName::new(0, 0, "DEPT").unwrap(),
                vec![Attribute::present("DEPTH"), Attribute::present(1u32)],
            )
        };
        set.add_item(make()).unwrap();
        assert!(set.add_item(make()).is_err());
    }

    #[test]
    fn encodes_set_component_with_name() {
        let set = channel_set().with_set_name("Channels").unwrap();
        let body = set.encode_body().unwrap();
        assert_eq!(body[0], 0xF8);
    }

    #[test]
    fn encodes_set_component_without_name() {
        let body = channel_set().encode_body().unwrap();
        assert_eq!(body[0], 0xF0);
    }
}
