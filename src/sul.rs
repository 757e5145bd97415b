//! The Storage Unit Label and the FILE-HEADER logical record: the two
//! fixed-layout, dictionary-controlled records that open every DLIS file.
//!
//! Both have a bespoke body layout rather than the generic
//! template/object/attribute encoding used by [`crate::model::Set`]; they
//! still share the LRS-header machinery in [`crate::lrb`].

use crate::error::Error;
use crate::lrb::LogicalRecordBytes;
use crate::model::LogicalRecordType;
use crate::reference::validate_ident;
use crate::Result;

fn right_justified(value: &str, width: usize, pad: u8) -> Result<Vec<u8>> {
    if value.len() > width {
        return Err(Error::SchemaViolation {
            detail: format!("{value:?} is longer than the {width}-byte field that holds it"),
        });
    }
    let mut out = vec![pad; width];
    out[width - value.len()..].copy_from_slice(value.as_bytes());
    Ok(out)
}

fn left_justified(value: &str, width: usize, pad: u8) -> Result<Vec<u8>> {
    if value.len() > width {
        return Err(Error::SchemaViolation {
            detail: format!("{value:?} is longer than the {width}-byte field that holds it"),
        });
    }
    let mut out = vec![pad; width];
    out[..value.len()].copy_from_slice(value.as_bytes());
    Ok(out)
}

/// The 80-byte ASCII header that opens every DLIS file, ahead of any
/// Visible Record.
#[derive(Debug, Clone)]
pub struct StorageUnitLabel {
    pub sequence_number: u32,
    pub max_record_length: u16,
    pub storage_set_identifier: String,
}

impl StorageUnitLabel {
    pub fn new(storage_set_identifier: impl Into<String>, max_record_length: u16) -> Result<Self> {
        let storage_set_identifier = storage_set_identifier.into();
        if !storage_set_identifier.is_ascii() {
            return Err(Error::CharsetViolation {
                what: "storage set identifier",
                detail: format!("{storage_set_identifier:?} contains non-ASCII bytes"),
            });
        }
        Ok(StorageUnitLabel {
            sequence_number: 1,
            max_record_length,
            storage_set_identifier,
        })
    }

    pub fn with_sequence_number(mut self, sequence_number: u32) -> Self {
        self.sequence_number = sequence_number;
        self
    }

    /// Render the fixed 80-byte layout: sequence-number(4) ‖ "V1.00"(5) ‖
    /// "RECORD"(6) ‖ max-record-length(5) ‖ storage-set-identifier(60).
    pub fn to_bytes(&self) -> Result<[u8; 80]> {
        let mut out = [0u8; 80];
        let seq = right_justified(&self.sequence_number.to_string(), 4, b'0')?;
        out[0..4].copy_from_slice(&seq);
        out[4..9].copy_from_slice(b"V1.00");
        out[9..15].copy_from_slice(b"RECORD");
        let len = right_justified(&self.max_record_length.to_string(), 5, b' ')?;
        out[15..20].copy_from_slice(&len);
        let id = left_justified(&self.storage_set_identifier, 60, b' ')?;
        out[20..80].copy_from_slice(&id);
        Ok(out)
    }
}

/// The `FILE-HEADER` logical record: a single-Item EFLR that is always the
/// first LRB emitted after the SUL.
///
/// Body layout is fixed regardless of content: set component for
/// `FILE-HEADER`, a two-attribute template (`SEQUENCE-NUMBER`, `ID`), one
/// object (`OBNAME(0, 0, "0")`), and the two occurrence values — a
/// 10-character right-justified decimal sequence number and a
/// 65-character left-justified identifier. Total body: 120 bytes; with
/// the 4-byte LRS header, 124 bytes.
#[derive(Debug, Clone)]
pub struct FileHeader {
    pub sequence_number: u32,
    pub identifier: String,
}

const SEQUENCE_NUMBER_WIDTH: usize = 10;
const IDENTIFIER_WIDTH: usize = 65;

impl FileHeader {
    pub fn new(identifier: impl Into<String>) -> Result<Self> {
        let identifier = identifier.into();
        validate_ident("FileHeader.identifier", &identifier)?;
        if identifier.is_empty() {
            return Err(Error::SchemaViolation {
                detail: "FileHeader identifier must not be empty".into(),
            });
        }
        if identifier.len() > IDENTIFIER_WIDTH {
            return Err(Error::SchemaViolation {
                detail: format!(
                    "FileHeader identifier {identifier:?} exceeds the {IDENTIFIER_WIDTH}-byte field"
                ),
            });
        }
        Ok(FileHeader {
            sequence_number: 1,
            identifier,
        })
    }

    pub fn with_sequence_number(mut self, sequence_number: u32) -> Self {
        self.sequence_number = sequence_number;
        self
    }

    fn encode_body(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(120);
        // Set component: FILE-HEADER, no set name.
        out.push(0xF0);
        out.push(11);
        out.extend_from_slice(b"FILE-HEADER");

        // Template: SEQUENCE-NUMBER then ID, both ASCII-typed (repcode 20).
        out.push(0x34);
        out.push(15);
        out.extend_from_slice(b"SEQUENCE-NUMBER");
        out.push(20);

        out.push(0x34);
        out.push(2);
        out.extend_from_slice(b"ID");
        out.push(20);

        // Object: OBNAME(0, 0, "0").
        out.push(0x70);
        out.push(0); // UVARI(origin_reference = 0)
        out.push(0); // USHORT(copy_number = 0)
        out.push(1);
        out.push(b'0');

        // Occurrence: SEQUENCE-NUMBER value.
        out.push(0x21);
        out.push(SEQUENCE_NUMBER_WIDTH as u8);
        let seq = right_justified(&self.sequence_number.to_string(), SEQUENCE_NUMBER_WIDTH, b' ')?;
        out.extend_from_slice(&seq);

        // Occurrence: ID value.
        out.push(0x21);
        out.push(IDENTIFIER_WIDTH as u8);
        let id = left_justified(&self.identifier, IDENTIFIER_WIDTH, b' ')?;
        out.extend_from_slice(&id);

        debug_assert_eq!(out.len(), 120);
        Ok(out)
    }

    pub fn to_logical_record_bytes(&self) -> Result<LogicalRecordBytes> {
        Ok(LogicalRecordBytes::new(
            self.encode_body()?,
            true,
            LogicalRecordType::FILE_HEADER.0,
        ))
    }
}
