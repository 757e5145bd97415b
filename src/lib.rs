#![deny(trivial_casts, trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(missing_debug_implementations, unused_qualifications, unused_import_braces)]

//! This is the core writer library for the RP66 V1 "DLIS" well-log binary
//! file format. It contains the representation-code codec, the EFLR/IFLR
//! object model, the logical-record byte producer and the visible-record
//! segmenter that together turn a typed, in-memory well-log description into
//! a byte-exact DLIS file.
//!
//! Building the typed object graph itself (adding channels, frames,
//! origins), reading DLIS files back, and the surrounding CLI/host are
//! explicitly out of scope for this crate; see the top-level [`writer`]
//! module for the single entry point that external callers are expected to
//! use.

pub mod attribute;
pub mod datetime;
pub mod error;
pub mod graph;
pub mod iflr;
pub mod lrb;
pub mod model;
pub mod reference;
pub mod repcode;
pub mod segment;
pub mod sul;
pub mod value;
pub mod writer;

pub use attribute::{Attribute, AttributeSchema};
pub use datetime::{DlisDateTime, TimeZone};
pub use error::{Error, Result};
pub use graph::{FrameBlock, LogicalFile, LogicalRecordIter};
pub use iflr::{ChannelSpec, FrameData};
pub use model::{Item, LogicalRecordType, Set};
pub use reference::{ObName, ObjRef};
pub use repcode::RepresentationCode;
pub use segment::{Segmenter, DEFAULT_VISIBLE_RECORD_LENGTH};
pub use value::AttributeValue;
pub use writer::write_dlis;
