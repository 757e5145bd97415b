//! RP66 V1 `DTIME` calendar values.

use crate::error::{Error, Result};
use chrono::{Datelike, NaiveDateTime, Timelike};

/// The time zone tag carried by a [`DlisDateTime`], per RP66 V1 Appendix B.21.
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone)]
pub enum TimeZone {
    /// Local Standard Time (the default).
    LocalStandard,
    /// Local Daylight Saving Time.
    LocalDaylight,
    /// Greenwich Mean Time / UTC.
    Utc,
}

impl TimeZone {
    fn nibble(self) -> u8 {
        match self {
            TimeZone::LocalStandard => 0,
            TimeZone::LocalDaylight => 1,
            TimeZone::Utc => 2,
        }
    }
}

impl Default for TimeZone {
    fn default() -> Self {
        TimeZone::LocalStandard
    }
}

/// A calendar date/time with millisecond resolution, as encoded by the
/// `DTIME` representation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DlisDateTime {
    pub year: u16,
    pub time_zone: TimeZone,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millisecond: u16,
}

impl DlisDateTime {
    /// Construct a `DTIME` value from its calendar fields, defaulting the
    /// time zone to Local Standard Time.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        millisecond: u16,
    ) -> Self {
        DlisDateTime {
            year,
            time_zone: TimeZone::default(),
            month,
            day,
            hour,
            minute,
            second,
            millisecond,
        }
    }

    /// Attach a non-default time zone tag to this value.
    pub fn with_time_zone(mut self, time_zone: TimeZone) -> Self {
        self.time_zone = time_zone;
        self
    }

    /// Validate the value against the `DTIME` range constraints and return
    /// the 8 big-endian bytes of its wire form.
    ///
    /// Quote (RP66 V1 Appendix B.21):
    /// `USHORT(year-1900) USHORT((tz<<4)|month) USHORT(day) USHORT(hour)
    /// USHORT(minute) USHORT(second) UNORM(milliseconds)`.
    pub fn to_bytes(self) -> Result<[u8; 8]> {
        if self.year < 1900 || self.year >= 2155 {
            return Err(Error::ValueOutOfRange {
                code: crate::repcode::RepresentationCode::DTime,
                detail: format!("year {} is outside [1900, 2155)", self.year),
            });
        }
        let mut out = [0u8; 8];
        out[0] = (self.year - 1900) as u8;
        out[1] = (self.time_zone.nibble() << 4) | (self.month & 0x0F);
        out[2] = self.day;
        out[3] = self.hour;
        out[4] = self.minute;
        out[5] = self.second;
        out[6..8].copy_from_slice(&self.millisecond.to_be_bytes());
        Ok(out)
    }
}

impl From<NaiveDateTime> for DlisDateTime {
    fn from(dt: NaiveDateTime) -> Self {
        DlisDateTime::new(
            dt.year() as u16,
            dt.month() as u8,
            dt.day() as u8,
            dt.hour() as u8,
            dt.minute() as u8,
            dt.second() as u8,
            (dt.and_utc().timestamp_subsec_millis()) as u16,
        )
    }
}
