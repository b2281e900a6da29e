//! Error type shared by the chart, lunar and almanac layers.

use thiserror::Error;

use crate::date::Date;

/// Errors surfaced to callers of this crate.
///
/// Precision limits (dates near a solar term or a double-hour edge) are not
/// errors; they are reported as [`crate::bazi::Warning`]s on a successful
/// chart.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid Gregorian date: {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: i32, day: i32 },

    #[error("cannot parse date: {0:?}")]
    ParseDate(String),

    #[error("invalid time of day: {hour:02}:{minute:02}")]
    InvalidTime { hour: u32, minute: u32 },

    #[error("year {0} is outside the supported range 1900..=2099")]
    OutOfRange(i32),

    #[error("{0} is outside the lunar calendar range 1900-01-31..=2099-12-31")]
    LunarOutOfRange(Date),

    #[error("lunar date {year}/{month}/{day} (leap: {leap}) does not exist")]
    InvalidLunarDate {
        year: i32,
        month: u32,
        day: u32,
        leap: bool,
    },

    #[error("unknown city: {0}")]
    UnknownCity(String),

    #[error("longitude {0} is outside -180..=180")]
    InvalidLongitude(f64),

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
