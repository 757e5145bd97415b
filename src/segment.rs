//! The visible-record segmenter: the streaming state machine that packs a
//! sequence of [`LogicalRecordBytes`] into fixed-maximum-size Visible
//! Records, splitting a logical record across Visible Record boundaries
//! when it does not fit in the space remaining.
//!
//! Grounded in the same streaming-fragmenter shape as a PDU writer that
//! packs an arbitrarily large data stream into fixed-size network PDUs,
//! emitting a frame as soon as it fills rather than buffering the whole
//! input up front.

use crate::error::Error;
use crate::lrb::{LogicalRecordBytes, HS, MIN_BODY};
use crate::Result;
use std::io::Write;

/// Default visible record length used by [`crate::writer::write_dlis`]
/// when the caller does not override it.
pub const DEFAULT_VISIBLE_RECORD_LENGTH: u16 = 8192;

/// Streaming packer from logical records to the final Visible Record byte
/// stream.
///
/// Call [`Segmenter::write_lrb`] once per logical record, in file order,
/// then [`Segmenter::finish`] to flush the last partial Visible Record and
/// recover the underlying writer.
pub struct Segmenter<W: Write> {
    out: W,
    max_body: usize,
    current_body: Vec<u8>,
    current_size: usize,
}

impl<W: Write> Segmenter<W> {
    /// `visible_record_length` must be even and in `[20, 16384]`.
    pub fn new(out: W, visible_record_length: u16) -> Result<Self> {
        if visible_record_length < 20 || visible_record_length > 16384 || visible_record_length % 2 != 0 {
            return Err(Error::ValueOutOfRange {
                code: crate::repcode::RepresentationCode::UNorm,
                detail: format!(
                    "visible_record_length {visible_record_length} must be even and in [20, 16384]"
                ),
            });
        }
        Ok(Segmenter {
            out,
            max_body: visible_record_length as usize - HS,
            current_body: Vec::new(),
            current_size: 0,
        })
    }

    /// Pack one complete logical record into the stream, splitting it
    /// across as many Visible Records as needed.
    pub fn write_lrb(&mut self, lrb: &LogicalRecordBytes) -> Result<()> {
        let mut position = 0usize;
        let mut remaining = lrb.size();
        while remaining > 0 {
            assert!(
                self.current_size <= self.max_body,
                "visible record body exceeded max_body: segmenter invariant violated"
            );
            let space = self.max_body - self.current_size - HS;
            if remaining <= space {
                let has_predecessor = position > 0;
                let seg = lrb.segment(position, remaining, has_predecessor, false)?;
                self.current_body.extend_from_slice(&seg);
                self.current_size += HS + remaining + (remaining % 2);
                position += remaining;
                remaining = 0;
            } else {
                let mut seg_size = space.min(remaining);
                let mut future = remaining - seg_size;
                // A tail shorter than MIN_BODY can't be its own segment;
                // give some of this segment's bytes back to the tail so
                // both halves clear the minimum, rather than writing
                // nothing and looping on an unchanged `remaining`.
                if future > 0 && future < MIN_BODY && seg_size > MIN_BODY {
                    let giveback = (MIN_BODY - future).min(seg_size - MIN_BODY);
                    seg_size -= giveback;
                    future += giveback;
                }
                if seg_size >= MIN_BODY && future >= MIN_BODY {
                    let has_predecessor = position > 0;
                    let seg = lrb.segment(position, seg_size, has_predecessor, true)?;
                    self.current_body.extend_from_slice(&seg);
                    self.current_size += seg_size + HS;
                    position += seg_size;
                    remaining = future;
                } else if self.current_body.is_empty() {
                    // Even a fresh, empty Visible Record can't hold a
                    // valid split of what's left: the configured
                    // visible_record_length is too small for this record.
                    return Err(Error::ValueOutOfRange {
                        code: crate::repcode::RepresentationCode::UNorm,
                        detail: format!(
                            "visible_record_length leaves {space} bytes of body space, too \
                             small to split the {remaining} remaining bytes of this logical \
                             record into two segments of at least {MIN_BODY} bytes each"
                        ),
                    });
                }
                self.flush()?;
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if self.current_body.is_empty() {
            return Ok(());
        }
        let total_len = self.current_size + HS;
        self.out.write_all(&(total_len as u16).to_be_bytes())?;
        self.out.write_all(&[0xFF, 0x01])?;
        self.out.write_all(&self.current_body)?;
        self.current_body.clear();
        self.current_size = 0;
        Ok(())
    }

    /// Flush any partial Visible Record and return the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_odd_vrl() {
        assert!(Segmenter::new(Vec::new(), 21).is_err());
    }

    #[test]
    fn rejects_vrl_below_minimum() {
        assert!(Segmenter::new(Vec::new(), 19).is_err());
    }

    #[test]
    fn rejects_vrl_above_maximum() {
        assert!(Segmenter::new(Vec::new(), 8193).is_err());
    }

    #[test]
    fn single_small_record_fits_one_visible_record() {
        let lrb = LogicalRecordBytes::new(vec![0u8; 12], true, 0);
        let mut seg = Segmenter::new(Vec::new(), 8192).unwrap();
        seg.write_lrb(&lrb).unwrap();
        let out = seg.finish().unwrap();
        // VR header (4) + LRS (4 header + 12 body) = 20
        assert_eq!(out.len(), 20);
        assert_eq!(u16::from_be_bytes([out[0], out[1]]), 20);
        assert_eq!(&out[2..4], &[0xFF, 0x01]);
    }

    #[test]
    fn large_record_splits_across_visible_records() {
        // VRL=20 -> max_body=16, per-segment space after VR header+LRS
        // header leaves 12 bytes body, exactly MIN_BODY. A body length
        // divisible by 12 lands every split exactly on the boundary
        // instead of leaving a sub-MIN_BODY tail.
        let body = vec![0xAAu8; 996];
        let lrb = LogicalRecordBytes::new(body, false, 0);
        let mut seg = Segmenter::new(Vec::new(), 20).unwrap();
        seg.write_lrb(&lrb).unwrap();
        let out = seg.finish().unwrap();

        // Reconstruct the body by walking VR/LRS headers and stripping pad.
        let mut i = 0;
        let mut reconstructed = Vec::new();
        let mut first_bits = None;
        let mut last_bits = None;
        while i < out.len() {
            let vr_len = u16::from_be_bytes([out[i], out[i + 1]]) as usize;
            let vr_end = i + vr_len;
            let mut j = i + 4;
            while j < vr_end {
                let lrs_len = u16::from_be_bytes([out[j], out[j + 1]]) as usize;
                let attrs = out[j + 2];
                let body_start = j + 4;
                let has_padding = attrs & 0b0000_0001 != 0;
                let body_len = lrs_len - 4 - (has_padding as usize);
                reconstructed.extend_from_slice(&out[body_start..body_start + body_len]);
                let pred_succ = attrs & 0b0110_0000;
                if first_bits.is_none() {
                    first_bits = Some(pred_succ);
                }
                last_bits = Some(pred_succ);
                j += lrs_len;
            }
            i = vr_end;
        }
        assert_eq!(reconstructed, vec![0xAAu8; 996]);
        assert_eq!(first_bits, Some(0b0010_0000));
        assert_eq!(last_bits, Some(0b0100_0000));
    }

    #[test]
    fn split_rebalances_a_tail_shorter_than_min_body() {
        // VRL=8192 -> max_body=8188, fresh space=8184. A 8190-byte record
        // leaves a 6-byte tail if the first segment greedily takes all
        // 8184 bytes of space; shrinking that segment by 6 bytes brings
        // the tail up to exactly MIN_BODY so both halves are valid.
        let body = vec![0x42u8; 8190];
        let lrb = LogicalRecordBytes::new(body, false, 0);
        let mut seg = Segmenter::new(Vec::new(), 8192).unwrap();
        seg.write_lrb(&lrb).unwrap();
        let out = seg.finish().unwrap();

        let mut reconstructed = Vec::new();
        let mut i = 0;
        let mut vr_count = 0;
        while i < out.len() {
            vr_count += 1;
            let vr_len = u16::from_be_bytes([out[i], out[i + 1]]) as usize;
            let vr_end = i + vr_len;
            let mut j = i + 4;
            while j < vr_end {
                let lrs_len = u16::from_be_bytes([out[j], out[j + 1]]) as usize;
                let attrs = out[j + 2];
                let has_padding = attrs & 0b0000_0001 != 0;
                let body_start = j + 4;
                let body_len = lrs_len - 4 - (has_padding as usize);
                reconstructed.extend_from_slice(&out[body_start..body_start + body_len]);
                j += lrs_len;
            }
            i = vr_end;
        }
        assert_eq!(vr_count, 2, "the rebalanced split should still land in two visible records");
        assert_eq!(reconstructed, vec![0x42u8; 8190]);
    }

    #[test]
    fn rejects_record_with_no_valid_split_at_minimum_vrl() {
        // At VRL=20 every fresh visible record offers exactly MIN_BODY of
        // space, so a split can only succeed when it lands exactly on a
        // multiple of MIN_BODY. 1000 is not, and no rebalancing is
        // possible when the available space already equals MIN_BODY, so
        // this must fail fast instead of looping.
        let body = vec![0xAAu8; 1000];
        let lrb = LogicalRecordBytes::new(body, false, 0);
        let mut seg = Segmenter::new(Vec::new(), 20).unwrap();
        assert!(seg.write_lrb(&lrb).is_err());
    }
}
