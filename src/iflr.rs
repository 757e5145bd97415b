//! IFLR FrameData: one row of sample values belonging to a Frame.

use crate::error::Error;
use crate::reference::ObName;
use crate::repcode::RepresentationCode;
use crate::value::AttributeValue;
use crate::Result;
use std::io::Write;

/// The shape a Frame declares for one of its channels: the representation
/// code and element count every FrameData row must supply for that column.
#[derive(Debug, Clone, Copy)]
pub struct ChannelSpec {
    pub representation_code: RepresentationCode,
    /// Number of elements per sample (the channel's `dimension`); `1` for
    /// a scalar channel.
    pub dimension: usize,
}

/// One row of channel values for a Frame.
///
/// Quote (§3): "reference to the Frame (by OBNAME), a frame-number
/// (UVARI, 1-based, monotonically increasing per frame), and a packed row
/// of channel values."
#[derive(Debug, Clone)]
pub struct FrameData {
    frame: ObName,
    frame_number: u32,
    values: Vec<AttributeValue>,
}

impl FrameData {
    pub fn new(frame: ObName, frame_number: u32, values: Vec<AttributeValue>) -> Result<Self> {
        if frame_number == 0 {
            return Err(Error::FrameShape {
                detail: "frame_number is 1-based and must be >= 1".into(),
            });
        }
        Ok(FrameData {
            frame,
            frame_number,
            values,
        })
    }

    pub fn frame_number(&self) -> u32 {
        self.frame_number
    }

    /// Check this row's channel values against the Frame's declared
    /// column shapes; used by the producer before a row is handed to the
    /// segmenter.
    pub fn validate_against(&self, channels: &[ChannelSpec]) -> Result<()> {
        if self.values.len() != channels.len() {
            return Err(Error::FrameShape {
                detail: format!(
                    "frame {} row {} has {} channel values, frame declares {}",
                    self.frame,
                    self.frame_number,
                    self.values.len(),
                    channels.len()
                ),
            });
        }
        for (value, spec) in self.values.iter().zip(channels) {
            if value.representation_code() != spec.representation_code {
                return Err(Error::FrameShape {
                    detail: format!(
                        "frame {} row {}: channel expects {:?}, got {:?}",
                        self.frame,
                        self.frame_number,
                        spec.representation_code,
                        value.representation_code()
                    ),
                });
            }
            if value.len() != spec.dimension {
                return Err(Error::FrameShape {
                    detail: format!(
                        "frame {} row {}: channel expects dimension {}, got {}",
                        self.frame,
                        self.frame_number,
                        spec.dimension,
                        value.len()
                    ),
                });
            }
        }
        Ok(())
    }

    /// Body: `OBNAME(frame) UVARI(frame_number)` then each channel value
    /// in row-major order.
    pub fn encode_body(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        AttributeValue::write_uvari(&mut out, self.frame.origin_reference)?;
        out.write_all(&[self.frame.copy_number])?;
        AttributeValue::write_ident_like(&mut out, "OBNAME.name", &self.frame.name)?;
        AttributeValue::write_uvari(&mut out, self.frame_number)?;
        for value in &self.values {
            value.encode(&mut out)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::C;

    fn frame_ref() -> ObName {
        ObName::new(1, 0, "MAIN").unwrap()
    }

    #[test]
    fn rejects_zero_frame_number() {
        assert!(FrameData::new(frame_ref(), 0, vec![]).is_err());
    }

    #[test]
    fn validates_channel_shape() {
        let row = FrameData::new(
            frame_ref(),
            1,
            vec![AttributeValue::FDoubl(C::from_elem(1.0, 1))],
        )
        .unwrap();
        let ok = [ChannelSpec {
            representation_code: RepresentationCode::FDoubl,
            dimension: 1,
        }];
        assert!(row.validate_against(&ok).is_ok());

        let wrong_dim = [ChannelSpec {
            representation_code: RepresentationCode::FDoubl,
            dimension: 2,
        }];
        assert!(row.validate_against(&wrong_dim).is_err());
    }

    #[test]
    fn encodes_body_with_monotonic_frame_number() {
        let row = FrameData::new(
            frame_ref(),
            42,
            vec![AttributeValue::ULong(C::from_elem(7, 1))],
        )
        .unwrap();
        let body = row.encode_body().unwrap();
        // OBNAME(1,0,"MAIN") = UVARI(1)=1byte + USHORT(0)=1byte + IDENT("MAIN")=1+4 = 7 bytes
        assert_eq!(body[0], 1);
        assert_eq!(body[1], 0);
        assert_eq!(body[2], 4);
        assert_eq!(&body[3..7], b"MAIN");
        assert_eq!(body[7], 42); // UVARI(42), one byte
        assert_eq!(u32::from_be_bytes([body[8], body[9], body[10], body[11]]), 7);
    }
}
