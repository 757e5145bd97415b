//! Logical Record Bytes: the unpacked body of one complete logical record
//! (an EFLR Set or one IFLR FrameData row), together with the machinery to
//! cut it into Logical Record Segment byte slices.
//!
//! This is the boundary between the object model (§[`crate::model`],
//! [`crate::iflr`]) and the visible-record segmenter
//! ([`crate::segment`]): the model only ever produces a flat body plus a
//! logical-record-type tag, and every header/padding/predecessor-successor
//! byte is constructed uniformly here.

use crate::error::Error;
use crate::Result;

/// The minimum LRS body size the segmenter is allowed to emit for a split
/// segment; see [`crate::segment`].
pub const MIN_BODY: usize = 12;
/// Size, in bytes, of both the Visible Record header and the LRS header.
pub const HS: usize = 4;

/// One complete logical record, not yet split into segments.
#[derive(Debug, Clone)]
pub struct LogicalRecordBytes {
    body: Vec<u8>,
    is_eflr: bool,
    logical_record_type: u8,
}

impl LogicalRecordBytes {
    pub fn new(body: Vec<u8>, is_eflr: bool, logical_record_type: u8) -> Self {
        LogicalRecordBytes {
            body,
            is_eflr,
            logical_record_type,
        }
    }

    /// The number of body bytes, i.e. the length the segmenter must
    /// account for across one or more segments.
    pub fn size(&self) -> usize {
        self.body.len()
    }

    pub fn is_eflr(&self) -> bool {
        self.is_eflr
    }

    /// Build one Logical Record Segment: a `len`-byte slice of the body
    /// starting at `from`, framed with a freshly computed 4-byte LRS
    /// header (and, if `len` is odd, a single `0x01` pad byte with
    /// `has_padding` set).
    ///
    /// `has_predecessor`/`has_successor` are supplied by the caller, which
    /// alone knows this segment's position among any siblings: whole
    /// (unsplit) records pass `(false, false)`; for a split record the
    /// first segment passes `(false, true)`, interior segments
    /// `(true, true)`, and the last `(true, false)`.
    pub fn segment(&self, from: usize, len: usize, has_predecessor: bool, has_successor: bool) -> Result<Vec<u8>> {
        if from + len > self.body.len() {
            return Err(Error::FrameShape {
                detail: format!(
                    "segment range {}..{} exceeds logical record body of {} bytes",
                    from,
                    from + len,
                    self.body.len()
                ),
            });
        }
        let has_padding = len % 2 == 1;
        let total_len = HS + len + (has_padding as usize);
        let mut out = Vec::with_capacity(total_len);
        out.extend_from_slice(&(total_len as u16).to_be_bytes());
        let mut attrs = 0u8;
        if self.is_eflr {
            attrs |= 0b1000_0000;
        }
        if has_predecessor {
            attrs |= 0b0100_0000;
        }
        if has_successor {
            attrs |= 0b0010_0000;
        }
        if has_padding {
            attrs |= 0b0000_0001;
        }
        out.push(attrs);
        out.push(self.logical_record_type);
        out.extend_from_slice(&self.body[from..from + len]);
        if has_padding {
            out.push(0x01);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_segment_pads_odd_body() {
        let lrb = LogicalRecordBytes::new(vec![1, 2, 3], true, 0);
        let seg = lrb.segment(0, 3, false, false).unwrap();
        // header(4) + body(3) + pad(1) = 8
        assert_eq!(seg.len(), 8);
        assert_eq!(u16::from_be_bytes([seg[0], seg[1]]), 8);
        assert_eq!(seg[2] & 0b1000_0000, 0b1000_0000);
        assert_eq!(seg[2] & 0b0000_0001, 0b0000_0001);
        assert_eq!(seg.last(), Some(&0x01));
    }

    #[test]
    fn split_segments_set_predecessor_successor_bits() {
        let lrb = LogicalRecordBytes::new(vec![0u8; 20], false, 5);
        let first = lrb.segment(0, 12, false, true).unwrap();
        let last = lrb.segment(12, 8, true, false).unwrap();
        assert_eq!(first[2] & 0b0110_0000, 0b0010_0000);
        assert_eq!(last[2] & 0b0110_0000, 0b0100_0000);
    }
}
