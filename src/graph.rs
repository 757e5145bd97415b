//! The typed object graph: an Origin, the ordered metadata Sets that
//! follow it, and the Frame blocks that supply FrameData rows.
//!
//! The graph itself is assembled by an external builder layer (out of
//! scope for this crate); what lives here is the minimal structure this
//! core needs in order to assign origin references and produce the
//! logical-record stream in file order.

use crate::error::Error;
use crate::iflr::{ChannelSpec, FrameData};
use crate::lrb::LogicalRecordBytes;
use crate::model::Set;
use crate::sul::FileHeader;
use crate::Result;

type RowIter = Box<dyn Iterator<Item = Result<FrameData>>>;

/// One Frame's metadata Set together with the channel shapes its rows
/// must match and a (possibly lazy) source of those rows.
///
/// The row source is boxed so that large sample arrays can be streamed
/// from a backing store one row at a time rather than materialized as a
/// single in-memory `Vec`; see [`FrameBlock::from_rows`] for the common
/// case of an already-materialized row list.
pub struct FrameBlock {
    frame_set: Set,
    channels: Vec<ChannelSpec>,
    rows: RowIter,
}

impl FrameBlock {
    /// Build a Frame block from an eagerly materialized row list.
    pub fn from_rows(frame_set: Set, channels: Vec<ChannelSpec>, rows: Vec<FrameData>) -> Self {
        FrameBlock {
            frame_set,
            channels,
            rows: Box::new(rows.into_iter().map(Ok)),
        }
    }

    /// Build a Frame block from a lazy row producer, e.g. one pulling
    /// samples from a backing numeric array on demand.
    pub fn from_iter(
        frame_set: Set,
        channels: Vec<ChannelSpec>,
        rows: impl Iterator<Item = Result<FrameData>> + 'static,
    ) -> Self {
        FrameBlock {
            frame_set,
            channels,
            rows: Box::new(rows),
        }
    }
}

/// The complete, origin-stamped description of one DLIS logical file.
pub struct LogicalFile {
    file_header: FileHeader,
    origin: Set,
    metadata_sets: Vec<Set>,
    frames: Vec<FrameBlock>,
    origin_reference: Option<u32>,
    storage_set_identifier: String,
}

impl LogicalFile {
    /// `origin` must be an `ORIGIN`-type [`Set`] with exactly one Item, per
    /// RP66 V1's single-origin-per-logical-file convention.
    /// `storage_set_identifier` becomes the SUL's storage-set-identifier
    /// field (user-provided text, space-padded to 60 bytes).
    pub fn new(
        storage_set_identifier: impl Into<String>,
        file_header: FileHeader,
        origin: Set,
    ) -> Result<Self> {
        if origin.items().len() != 1 {
            return Err(Error::OriginMissing {
                detail: format!(
                    "origin set must have exactly one item, found {}",
                    origin.items().len()
                ),
            });
        }
        Ok(LogicalFile {
            file_header,
            origin,
            metadata_sets: Vec::new(),
            frames: Vec::new(),
            origin_reference: None,
            storage_set_identifier: storage_set_identifier.into(),
        })
    }

    pub fn add_metadata_set(&mut self, set: Set) {
        self.metadata_sets.push(set);
    }

    pub fn storage_set_identifier(&self) -> &str {
        &self.storage_set_identifier
    }

    pub fn add_frame(&mut self, frame: FrameBlock) {
        self.frames.push(frame);
    }

    /// `AttachOriginReference`: propagate `file_set_number` to every EFLR
    /// Item and every FrameData row in the graph. Precondition:
    /// `file_set_number > 0`.
    pub fn attach_origin_reference(&mut self, file_set_number: u32) -> Result<()> {
        if file_set_number == 0 {
            return Err(Error::ValueOutOfRange {
                code: crate::repcode::RepresentationCode::ULong,
                detail: "file_set_number must be > 0".into(),
            });
        }
        self.origin.assign_origin_reference(file_set_number);
        for set in &mut self.metadata_sets {
            set.assign_origin_reference(file_set_number);
        }
        for frame in &mut self.frames {
            frame.frame_set.assign_origin_reference(file_set_number);
        }
        self.origin_reference = Some(file_set_number);
        Ok(())
    }

    /// `LogicalRecordIter`: yields the FileHeader, the Origin Set, every
    /// other metadata Set in insertion order, then for each Frame in
    /// order, its Frame Set followed by its FrameData rows in ascending
    /// frame-number order.
    ///
    /// Must be called after [`LogicalFile::attach_origin_reference`];
    /// returns `OriginMissing` otherwise.
    pub fn logical_record_iter(self) -> Result<LogicalRecordIter> {
        if self.origin_reference.is_none() {
            return Err(Error::OriginMissing {
                detail: "file_set_number was never assigned before encoding".into(),
            });
        }
        Ok(LogicalRecordIter {
            file_header: Some(self.file_header),
            origin: Some(self.origin),
            metadata_sets: self.metadata_sets.into_iter(),
            frames: self.frames.into_iter(),
            current_frame: None,
        })
    }
}

enum FrameState {
    PendingSet {
        frame_set: Set,
        channels: Vec<ChannelSpec>,
        rows: RowIter,
    },
    EmittingRows {
        channels: Vec<ChannelSpec>,
        rows: RowIter,
    },
}

/// The lazy sequence of logical records making up a DLIS file, in file
/// order, not counting the Storage Unit Label (written separately by
/// [`crate::writer::write_dlis`]).
pub struct LogicalRecordIter {
    file_header: Option<FileHeader>,
    origin: Option<Set>,
    metadata_sets: std::vec::IntoIter<Set>,
    frames: std::vec::IntoIter<FrameBlock>,
    current_frame: Option<FrameState>,
}

fn encode_set(set: &Set) -> Result<LogicalRecordBytes> {
    set.encode_body()
        .map(|body| LogicalRecordBytes::new(body, true, set.logical_record_type().0))
}

impl Iterator for LogicalRecordIter {
    type Item = Result<LogicalRecordBytes>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(file_header) = self.file_header.take() {
            return Some(file_header.to_logical_record_bytes());
        }
        if let Some(origin) = self.origin.take() {
            return Some(encode_set(&origin));
        }
        if let Some(set) = self.metadata_sets.next() {
            return Some(encode_set(&set));
        }
        loop {
            match self.current_frame.take() {
                Some(FrameState::PendingSet {
                    frame_set,
                    channels,
                    rows,
                }) => {
                    let result = encode_set(&frame_set);
                    self.current_frame = Some(FrameState::EmittingRows { channels, rows });
                    return Some(result);
                }
                Some(FrameState::EmittingRows { channels, mut rows }) => {
                    if let Some(row) = rows.next() {
                        self.current_frame = Some(FrameState::EmittingRows { channels: channels.clone(), rows });
                        return Some(row.and_then(|row| {
                            row.validate_against(&channels)?;
                            row.encode_body().map(|body| LogicalRecordBytes::new(body, false, 0))
                        }));
                    }
                    self.current_frame = None;
                    continue;
                }
                None => match self.frames.next() {
                    Some(frame) => {
                        self.current_frame = Some(FrameState::PendingSet {
                            frame_set: frame.frame_set,
                            channels: frame.channels,
                            rows: frame.rows,
                        });
                        continue;
                    }
                    None => return None,
                },
            }
        }
    }
}
