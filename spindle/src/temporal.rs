//! Tick based time kinds. A tick is 100 nanoseconds; absolute points in time count ticks since
//! 0001-01-01T00:00:00 in the proleptic Gregorian calendar.

use crate::error::{DecodeError, EncodeError};
use crate::primitive::{fixed, Primitive};
use chrono::{FixedOffset, NaiveDateTime, TimeZone, Utc};

pub const TICKS_PER_SECOND: i64 = 10_000_000;
pub const TICKS_PER_MINUTE: i64 = 60 * TICKS_PER_SECOND;
const NANOS_PER_TICK: i64 = 100;

/// Seconds between 0001-01-01 and the unix epoch.
const UNIX_EPOCH_SECONDS: i64 = 62_135_596_800;

const KIND_SHIFT: u32 = 62;
const TICKS_MASK: u64 = (1 << KIND_SHIFT) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateTimeKind {
    Unspecified,
    Utc,
    Local,
}

/// A point in time stored as a tick count in the low 62 bits and a [`DateTimeKind`] in the top
/// two bits. The raw value is what goes over the wire, so decoding and re-encoding is lossless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DateTime(u64);

impl DateTime {
    /// Last tick of 9999-12-31.
    pub const MAX_TICKS: u64 = 3_155_378_975_999_999_999;

    pub fn new(ticks: u64, kind: DateTimeKind) -> Option<DateTime> {
        if ticks > Self::MAX_TICKS {
            return None;
        }
        let kind = match kind {
            DateTimeKind::Unspecified => 0,
            DateTimeKind::Utc => 1,
            DateTimeKind::Local => 2,
        };
        Some(DateTime(ticks | kind << KIND_SHIFT))
    }

    pub const fn from_raw(raw: u64) -> DateTime {
        DateTime(raw)
    }

    pub const fn to_raw(self) -> u64 {
        self.0
    }

    pub fn ticks(&self) -> u64 {
        self.0 & TICKS_MASK
    }

    /// Both upper kind values denote local time.
    pub fn kind(&self) -> DateTimeKind {
        match self.0 >> KIND_SHIFT {
            0 => DateTimeKind::Unspecified,
            1 => DateTimeKind::Utc,
            _ => DateTimeKind::Local,
        }
    }

    pub fn from_naive(value: &NaiveDateTime, kind: DateTimeKind) -> Option<DateTime> {
        let utc = value.and_utc();
        let seconds = utc.timestamp().checked_add(UNIX_EPOCH_SECONDS)?;
        let ticks = seconds
            .checked_mul(TICKS_PER_SECOND)?
            .checked_add(utc.timestamp_subsec_nanos() as i64 / NANOS_PER_TICK)?;
        DateTime::new(u64::try_from(ticks).ok()?, kind)
    }

    /// The wall clock reading, ignoring the kind.
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        let ticks = self.ticks() as i64;
        let seconds = ticks / TICKS_PER_SECOND - UNIX_EPOCH_SECONDS;
        let nanos = (ticks % TICKS_PER_SECOND * NANOS_PER_TICK) as u32;
        chrono::DateTime::from_timestamp(seconds, nanos).map(|d| d.naive_utc())
    }

    pub fn from_utc(value: &chrono::DateTime<Utc>) -> Option<DateTime> {
        DateTime::from_naive(&value.naive_utc(), DateTimeKind::Utc)
    }

    /// Interprets the clock reading as UTC, whatever the kind.
    pub fn to_utc(&self) -> Option<chrono::DateTime<Utc>> {
        self.to_naive().map(|naive| naive.and_utc())
    }
}

impl Primitive for DateTime {
    const WIDTH: usize = 8;

    fn put(self, dst: &mut [u8]) -> Result<(), EncodeError> {
        self.0.put(dst)
    }

    fn get(src: &[u8]) -> Result<Self, DecodeError> {
        u64::get(src).map(DateTime)
    }
}

/// A signed duration in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeSpan(pub i64);

impl TimeSpan {
    pub const fn ticks(self) -> i64 {
        self.0
    }

    pub fn from_duration(value: &chrono::Duration) -> Option<TimeSpan> {
        let ticks = value
            .num_seconds()
            .checked_mul(TICKS_PER_SECOND)?
            .checked_add(value.subsec_nanos() as i64 / NANOS_PER_TICK)?;
        Some(TimeSpan(ticks))
    }

    pub fn to_duration(self) -> chrono::Duration {
        chrono::Duration::seconds(self.0 / TICKS_PER_SECOND)
            + chrono::Duration::nanoseconds(self.0 % TICKS_PER_SECOND * NANOS_PER_TICK)
    }
}

impl Primitive for TimeSpan {
    const WIDTH: usize = 8;

    fn put(self, dst: &mut [u8]) -> Result<(), EncodeError> {
        self.0.put(dst)
    }

    fn get(src: &[u8]) -> Result<Self, DecodeError> {
        i64::get(src).map(TimeSpan)
    }
}

/// A clock reading together with its offset from UTC in minutes. The clock reading is the local
/// time at that offset and carries the unspecified kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DateTimeOffset {
    pub date_time: DateTime,
    pub offset_minutes: i16,
}

impl DateTimeOffset {
    pub fn from_chrono(value: &chrono::DateTime<FixedOffset>) -> Option<DateTimeOffset> {
        let date_time = DateTime::from_naive(&value.naive_local(), DateTimeKind::Unspecified)?;
        let offset_minutes = i16::try_from(value.offset().local_minus_utc() / 60).ok()?;
        Some(DateTimeOffset { date_time, offset_minutes })
    }

    pub fn to_chrono(&self) -> Option<chrono::DateTime<FixedOffset>> {
        let offset = FixedOffset::east_opt(self.offset_minutes as i32 * 60)?;
        offset.from_local_datetime(&self.date_time.to_naive()?).single()
    }
}

impl Primitive for DateTimeOffset {
    const WIDTH: usize = 10;

    fn put(self, dst: &mut [u8]) -> Result<(), EncodeError> {
        self.date_time.put(&mut dst[..8])?;
        self.offset_minutes.put(&mut dst[8..10])
    }

    fn get(src: &[u8]) -> Result<Self, DecodeError> {
        Ok(DateTimeOffset {
            date_time: DateTime::get(&src[..8])?,
            offset_minutes: i16::from_le_bytes(fixed(&src[8..10])),
        })
    }
}
