use serde::{Serialize, Serializer};

use crate::clock::Clock;
use crate::error::Result;

/// One `ZLOGGEDDATA` row joined with its logged time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawRow {
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    /// `Z_FOK_TIMESTAMP`, only used to order rows inside one second.
    pub zfok_timestamp: i64,
    pub value: f64,
}

impl RawRow {
    pub fn new(timestamp: i64, zfok_timestamp: i64, value: f64) -> Self {
        Self {
            timestamp,
            zfok_timestamp,
            value,
        }
    }
}

/// An output record that can be grouped by coarse timestamp and given a
/// fine timestamp by the interpolator.
pub trait Sample: Serialize {
    /// CSV header, in the same order as the serialized fields.
    const HEADER: &'static [&'static str];

    fn coarse_timestamp(&self) -> i64;

    fn set_fine_timestamp(&mut self, fine: String);
}

/// Writes a value as a plain shortest decimal (`1`, `0.0000001`), never in
/// exponent form.
fn plain_decimal<S: Serializer>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EcgSample {
    pub time: String,
    pub timestamp: i64,
    pub z_fok_timestamp: i64,
    #[serde(serialize_with = "plain_decimal")]
    pub value: f64,
    pub detailed_timestamp: String,
}

impl EcgSample {
    pub fn from_row(row: &RawRow, clock: Clock) -> Result<Self> {
        Ok(Self {
            time: clock.format_coarse(row.timestamp)?,
            timestamp: row.timestamp,
            z_fok_timestamp: row.zfok_timestamp,
            value: row.value,
            detailed_timestamp: String::new(),
        })
    }
}

impl Sample for EcgSample {
    const HEADER: &'static [&'static str] = &[
        "time",
        "timestamp",
        "z_fok_timestamp",
        "value",
        "detailed_timestamp",
    ];

    fn coarse_timestamp(&self) -> i64 {
        self.timestamp
    }

    fn set_fine_timestamp(&mut self, fine: String) {
        self.detailed_timestamp = fine;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccelSample {
    pub time: String,
    pub timestamp: i64,
    pub zfok_timestamp: i64,
    #[serde(serialize_with = "plain_decimal")]
    pub x: f64,
    #[serde(serialize_with = "plain_decimal")]
    pub y: f64,
    #[serde(serialize_with = "plain_decimal")]
    pub z: f64,
    pub detailed_timestamp: String,
}

impl AccelSample {
    /// Builds one sample from an axis triple. Identity comes from the first row.
    pub fn from_triple(rows: &[RawRow; 3], clock: Clock) -> Result<Self> {
        let [first, second, third] = rows;
        Ok(Self {
            time: clock.format_coarse(first.timestamp)?,
            timestamp: first.timestamp,
            zfok_timestamp: first.zfok_timestamp,
            x: first.value,
            y: second.value,
            z: third.value,
            detailed_timestamp: String::new(),
        })
    }
}

impl Sample for AccelSample {
    const HEADER: &'static [&'static str] = &[
        "time",
        "timestamp",
        "zfok_timestamp",
        "x",
        "y",
        "z",
        "detailed_timestamp",
    ];

    fn coarse_timestamp(&self) -> i64 {
        self.timestamp
    }

    fn set_fine_timestamp(&mut self, fine: String) {
        self.detailed_timestamp = fine;
    }
}
