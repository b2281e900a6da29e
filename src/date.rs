//! Calendar-independant date.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::ops::{Add, Sub};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// A calendar-independant date.
///
/// Supported range begins from January 1, 4713 BC, proleptic Julian calendar.
///
/// Parses from and serializes to ISO 8601 (`YYYY-MM-DD`, Gregorian).
///
/// ```
/// use sizhu::Date;
///
/// let date: Date = "2024-02-10".parse().unwrap();
/// assert_eq!(Date::from_gregorian(2024, 2, 10), Some(date));
/// assert_eq!("2024-02-10", date.to_string());
/// assert!("2024-02-30".parse::<Date>().is_err());
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Date {
    jdn: u32,
}

impl Date {
    /// Creates a `Date` with a Julian day number (JDN).
    pub fn from_jdn(jdn: u32) -> Self {
        Self { jdn }
    }
    /// Returns the Julian day number (JDN) of the date.
    pub fn jdn(&self) -> u32 {
        self.jdn
    }

    /// Creates a `Date` with a Gregorian calendar date.
    ///
    /// `year` should be an astronomical year number, i.e. 1 BC is `0`, 2
    /// BC is `-1`, etc.
    ///
    /// Returns `None` if the month or day does not exist in that year (e.g.
    /// February 30), or if the result date is out of supported range.
    ///
    /// # Example
    ///
    /// ```
    /// use sizhu::Date;
    ///
    /// let date = Date::from_gregorian(2000, 1, 1).unwrap();
    /// assert_eq!(2451545, date.jdn());
    /// assert_eq!(None, Date::from_gregorian(2023, 2, 29));
    /// ```
    pub fn from_gregorian(year: i32, month: i32, day: i32) -> Option<Self> {
        if !(1..=12).contains(&month) || day < 1 || day > days_in_month(year, month) {
            return None;
        }
        let (y, m, d) = (year, month, day);
        u32::try_from(
            (1461 * (y + 4800 + (m - 14) / 12)) / 4 + (367 * (m - 2 - 12 * ((m - 14) / 12))) / 12
                - (3 * ((y + 4900 + (m - 14) / 12) / 100)) / 4
                + d
                - 32075,
        )
        .map(Self::from_jdn)
        .ok()
    }
    /// Represents the date in Gregorian calendar.
    ///
    /// Returns in `(year, month, day)` format.
    ///
    /// # Example
    ///
    /// ```
    /// use sizhu::Date;
    ///
    /// let date = Date::from_jdn(2451545);
    /// assert_eq!((2000, 1, 1), date.gregorian());
    /// ```
    pub fn gregorian(&self) -> (i32, i32, i32) {
        // JDNs of supported years are far below 2**31
        let jdn = self.jdn as i32;
        let f = jdn + 1401 + (((4 * jdn + 274277) / 146097) * 3) / 4 - 38;
        let e = 4 * f + 3;
        let g = (e % 1461) / 4;
        let h = 5 * g + 2;
        let day = (h % 153) / 5 + 1;
        let month = (h / 153 + 2) % 12 + 1;
        let year = e / 1461 - 4716 + (12 + 2 - month) / 12;
        (year, month, day)
    }
    /// Formats the date in ISO 8601 format.
    ///
    /// # Example
    ///
    /// ```
    /// use sizhu::Date;
    ///
    /// let date = Date::from_gregorian(2000, 1, 1).unwrap();
    /// assert_eq!("2000-01-01", date.iso_gregorian());
    /// ```
    pub fn iso_gregorian(&self) -> String {
        let (y, m, d) = self.gregorian();
        format!("{:04}-{:02}-{:02}", y, m, d)
    }

    /// Returns the day of week of the date, in ISO-8601 numbering (i.e.
    /// `1..=7` for Monday through Sunday)
    ///
    /// # Example
    ///
    /// ```
    /// use sizhu::Date;
    ///
    /// let date = Date::from_gregorian(2000, 1, 1).unwrap();
    /// assert_eq!(6, date.day_of_week()); // Saturday
    /// ```
    pub fn day_of_week(&self) -> i32 {
        (self.jdn % 7 + 1) as i32
    }
    /// Returns the ordinal day of the date within its Gregorian year,
    /// `1..=366`.
    ///
    /// # Example
    ///
    /// ```
    /// use sizhu::Date;
    ///
    /// let date = Date::from_gregorian(1990, 6, 15).unwrap();
    /// assert_eq!(166, date.ordinal());
    /// ```
    pub fn ordinal(&self) -> i32 {
        let (y, m, d) = self.gregorian();
        ordinal_day_number(m, d, YearType::from_gregorian(y))
    }
    /// Returns the Chinese sexagenary day number of the date, numbered from 1
    /// (甲子) to 60 (癸亥).
    ///
    /// # Example
    ///
    /// ```
    /// use sizhu::Date;
    ///
    /// let date = Date::from_gregorian(2000, 1, 1).unwrap();
    /// assert_eq!(55, date.sexagenary()); // 戊午
    /// ```
    pub fn sexagenary(&self) -> i32 {
        ((self.jdn + 49) % 60 + 1) as i32
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.iso_gregorian())
    }
}

impl FromStr for Date {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || Error::ParseDate(s.to_owned());
        let mut parts = s.trim().splitn(3, '-');
        let mut next = || -> Result<i32, Error> {
            parts
                .next()
                .and_then(|p| p.parse().ok())
                .ok_or_else(malformed)
        };
        let (year, month, day) = (next()?, next()?, next()?);
        Date::from_gregorian(year, month, day).ok_or(Error::InvalidDate { year, month, day })
    }
}

impl Serialize for Date {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.iso_gregorian())
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Add<i32> for Date {
    type Output = Date;
    fn add(self, rhs: i32) -> Self::Output {
        Date::from_jdn(if rhs >= 0 {
            self.jdn + rhs as u32
        } else {
            self.jdn - rhs.wrapping_neg() as u32
        })
    }
}
impl Sub<Date> for Date {
    type Output = i32;
    fn sub(self, rhs: Date) -> Self::Output {
        self.jdn as i32 - rhs.jdn as i32
    }
}

/// Indicates whether a year is a leap year or common year.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum YearType {
    Common,
    Leap,
}

impl YearType {
    /// Determines if `year` is a leap year in Gregorian calendar.
    pub fn from_gregorian(year: i32) -> Self {
        if year % 4 == 0 && year % 100 != 0 || year % 400 == 0 {
            Self::Leap
        } else {
            Self::Common
        }
    }
    /// Returns `true` if `self` is `Leap`, otherwise `false`.
    pub fn is_leap(&self) -> bool {
        matches!(self, YearType::Leap)
    }
}

fn days_in_month(year: i32, month: i32) -> i32 {
    match month {
        2 => 28 + YearType::from_gregorian(year).is_leap() as i32,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

fn ordinal_day_number(month: i32, day: i32, year_type: YearType) -> i32 {
    day + match month {
        1 => 0,
        2 => 31,
        _ => 59 + (153 * (month - 3) + 2) / 5 + year_type.is_leap() as i32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        let date = Date::from_jdn(2440588);
        assert_eq!(2440588, date.jdn());
    }

    #[test]
    fn from_gregorian() {
        let date = Date::from_gregorian(1970, 1, 1).unwrap();
        assert_eq!(2440588, date.jdn());
        let date = Date::from_gregorian(2021, 9, 8).unwrap();
        assert_eq!(2459466, date.jdn());
        let date = Date::from_gregorian(1900, 1, 1).unwrap();
        assert_eq!(2415021, date.jdn());
    }

    #[test]
    fn parse() {
        assert_eq!(Date::from_gregorian(1990, 6, 15), "1990-06-15".parse().ok());
        assert!(matches!("1990/06/15".parse::<Date>(), Err(Error::ParseDate(_))));
        assert!(matches!("1990-06".parse::<Date>(), Err(Error::ParseDate(_))));
        assert!(matches!(
            "1990-13-01".parse::<Date>(),
            Err(Error::InvalidDate { month: 13, .. })
        ));
    }

    #[test]
    fn rejects_nonexistent_dates() {
        for (y, m, d) in [
            (2023, 2, 29),
            (1900, 2, 29),
            (2021, 4, 31),
            (2021, 13, 1),
            (2021, 0, 10),
            (2021, 1, 0),
        ] {
            assert_eq!(None, Date::from_gregorian(y, m, d), "{y:04}-{m:02}-{d:02}");
        }
        assert!(Date::from_gregorian(2000, 2, 29).is_some());
    }

    #[test]
    fn to_gregorian() {
        let date = Date::from_jdn(2440588);
        assert_eq!((1970, 1, 1), date.gregorian());
        let date = Date::from_jdn(2459466);
        assert_eq!((2021, 9, 8), date.gregorian());
        let date = Date::from_jdn(2451545);
        assert_eq!((2000, 1, 1), date.gregorian());
    }

    #[test]
    fn to_day_of_week() {
        let date = Date::from_gregorian(1970, 1, 1).unwrap();
        assert_eq!(4, date.day_of_week());
        let date = Date::from_gregorian(2021, 9, 8).unwrap();
        assert_eq!(3, date.day_of_week());
    }

    #[test]
    fn to_sexagenary() {
        let date = Date::from_gregorian(1970, 1, 1).unwrap();
        assert_eq!(18, date.sexagenary());
        let date = Date::from_gregorian(2021, 9, 8).unwrap();
        assert_eq!(56, date.sexagenary());
        // 1900-01-01 is 甲戌
        let date = Date::from_gregorian(1900, 1, 1).unwrap();
        assert_eq!(11, date.sexagenary());
    }

    #[test]
    fn to_ordinal() {
        for ((y, m, d), expected) in [
            ((2021, 1, 1), 1),
            ((2021, 3, 1), 60),
            ((2020, 3, 1), 61),
            ((2020, 12, 31), 366),
        ] {
            let date = Date::from_gregorian(y, m, d).unwrap();
            assert_eq!(expected, date.ordinal(), "{y:04}-{m:02}-{d:02}");
        }
    }

    #[test]
    fn iso_format() {
        assert_eq!(
            "2021-09-08",
            Date::from_gregorian(2021, 9, 8).unwrap().iso_gregorian()
        );
    }
}

#[cfg(test)]
mod tests_priv {
    use super::*;

    #[test]
    fn priv_ordinal_day_number() {
        use YearType::*;
        assert_eq!(1, ordinal_day_number(1, 1, Common));
        assert_eq!(256, ordinal_day_number(9, 13, Common));
        assert_eq!(366, ordinal_day_number(12, 31, Leap));
    }

    #[test]
    fn priv_days_in_month() {
        assert_eq!(29, days_in_month(2000, 2));
        assert_eq!(28, days_in_month(1900, 2));
        assert_eq!(30, days_in_month(2021, 11));
    }
}
