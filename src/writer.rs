//! The single entry point external callers use to turn a [`LogicalFile`]
//! into bytes on disk: validates configuration, runs the one-time origin
//! assignment pass, drives the lazy logical-record sequence through the
//! visible-record segmenter, and writes the result to `path`.

use crate::graph::LogicalFile;
use crate::segment::{Segmenter, DEFAULT_VISIBLE_RECORD_LENGTH};
use crate::sul::StorageUnitLabel;
use crate::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Write `graph` to `path` as a complete DLIS file.
///
/// `file_set_number` is propagated to every Item and FrameData row via
/// [`LogicalFile::attach_origin_reference`] before any bytes are produced.
/// `visible_record_length` defaults to 8192 when `None`; it must be even
/// and in `[20, 16384]`.
///
/// Fails with `OriginMissing` if `graph`'s Origin is missing its
/// `file_set_number`, propagates any codec or schema error encountered
/// while encoding a logical record, and wraps the underlying file I/O in
/// `Io`. On error, any partially written file is left on disk; callers
/// wanting atomic replace should write to a temporary path and rename on
/// success.
#[instrument(skip(graph), fields(path = %path.as_ref().display()))]
pub fn write_dlis(
    mut graph: LogicalFile,
    path: impl AsRef<Path>,
    file_set_number: u32,
    visible_record_length: Option<u16>,
) -> Result<()> {
    let vrl = visible_record_length.unwrap_or(DEFAULT_VISIBLE_RECORD_LENGTH);
    debug!(vrl, file_set_number, "starting DLIS encode");

    graph.attach_origin_reference(file_set_number)?;
    let sul = StorageUnitLabel::new(graph.storage_set_identifier().to_string(), vrl)?;

    let file = File::create(path.as_ref())?;
    let mut out = BufWriter::new(file);
    out.write_all(&sul.to_bytes()?)?;

    let mut segmenter = Segmenter::new(&mut out, vrl)?;
    let mut record_count = 0usize;
    for lrb in graph.logical_record_iter()? {
        segmenter.write_lrb(&lrb?)?;
        record_count += 1;
    }
    segmenter.finish()?;
    out.flush()?;

    info!(record_count, "finished DLIS encode");
    Ok(())
}
