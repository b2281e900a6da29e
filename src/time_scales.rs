//! Deals with the two time scales pillar computation cares about: standard
//! civil time of China (UTC+8) and local apparent solar time ("true solar
//! time", 真太陽時).
//!
//! Both are carried as [`Civil`], a Julian date read off a clock face. A
//! [`Correction`] shifts a standard-time reading onto a clock that keeps
//! local apparent solar time at some longitude.

use std::fmt::{self, Display};
use std::ops::Sub;

use serde::{Deserialize, Serialize};

use crate::date::Date;

/// Longitude of the meridian UTC+8 is based on, in degrees east.
pub const STANDARD_MERIDIAN: f64 = 120.0;

const SECONDS_PER_DAY: f64 = 86400.0;

/// A clock reading as a Julian date: midnight of a date falls on
/// `jdn - 0.5`.
///
/// The reading is in UTC+8 standard time unless it came out of
/// [`Correction::apply`], in which case it is local apparent solar time.
///
/// # Example
///
/// ```
/// use sizhu::time_scales::Civil;
///
/// let t = Civil::from_gregorian(2000, 1, 1, 12, 0).unwrap();
/// assert_eq!(2451545.0, t.0);
/// assert_eq!((2000, 1, 1), t.date().gregorian());
/// assert_eq!(12.0, t.hours());
/// ```
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Civil(pub f64);

impl Civil {
    /// Returns `None` for nonexistent dates or times of day.
    pub fn from_gregorian(year: i32, month: i32, day: i32, hour: u32, minute: u32) -> Option<Self> {
        Self::from_date(Date::from_gregorian(year, month, day)?, hour, minute)
    }
    /// Returns `None` unless `hour < 24` and `minute < 60`.
    pub fn from_date(date: Date, hour: u32, minute: u32) -> Option<Self> {
        if hour >= 24 || minute >= 60 {
            return None;
        }
        Some(Self(
            date.jdn() as f64 - 0.5 + (hour * 60 + minute) as f64 / 1440.0,
        ))
    }
    /// The date shown by the clock.
    pub fn date(&self) -> Date {
        self.split().0
    }
    /// Hours since midnight, `0.0..24.0`, to the nearest second.
    pub fn hours(&self) -> f64 {
        self.split().1 as f64 / 3600.0
    }
    /// Hour and minute shown by the clock, truncating seconds.
    pub fn hm(&self) -> (u32, u32) {
        let secs = self.split().1;
        (secs / 3600, secs % 3600 / 60)
    }
    pub fn add_minutes(self, minutes: f64) -> Self {
        Self(self.0 + minutes / 1440.0)
    }
    pub fn add_days(self, days: f64) -> Self {
        Self(self.0 + days)
    }

    // Rounded to whole seconds so that readings built from exact minutes
    // never land a hair before the minute they name.
    fn split(&self) -> (Date, u32) {
        let total = ((self.0 + 0.5) * SECONDS_PER_DAY).round() as i64;
        let secs_per_day = SECONDS_PER_DAY as i64;
        (
            Date::from_jdn(total.div_euclid(secs_per_day) as u32),
            total.rem_euclid(secs_per_day) as u32,
        )
    }
}

impl Sub for Civil {
    /// Difference in days.
    type Output = f64;
    fn sub(self, rhs: Civil) -> f64 {
        self.0 - rhs.0
    }
}

impl Display for Civil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m) = self.hm();
        write!(f, "{} {:02}:{:02}", self.date().iso_gregorian(), h, m)
    }
}

/// Minutes a clock at `longitude` (degrees east) runs ahead of the UTC+8
/// standard meridian in local mean time, 4 minutes per degree.
pub fn longitude_minutes(longitude: f64) -> f64 {
    (longitude - STANDARD_MERIDIAN) * 4.0
}

/// Equation of time in minutes, apparent minus mean solar time.
///
/// Uses the approximation `E = 9.87 sin 2B − 7.53 cos B − 1.5 sin B`,
/// `B = 360° × (N − 81) / 365`, `N` the ordinal day of the year.
///
/// # Example
///
/// ```
/// use sizhu::Date;
/// use sizhu::time_scales::equation_of_time;
///
/// // early November: sundial runs about a quarter hour fast
/// let e = equation_of_time(Date::from_gregorian(2021, 11, 3).unwrap());
/// assert!((15.0..17.5).contains(&e));
/// ```
pub fn equation_of_time(date: Date) -> f64 {
    let b = (360.0 / 365.0 * (date.ordinal() - 81) as f64).to_radians();
    9.87 * (2.0 * b).sin() - 7.53 * b.cos() - 1.5 * b.sin()
}

/// The offset between standard time and true solar time at a longitude.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    pub longitude: f64,
    /// Longitude part, minutes.
    pub longitude_minutes: f64,
    /// Equation of time part, minutes.
    pub equation_of_time: f64,
}

impl Correction {
    /// The correction for standard-time reading `at` at `longitude`.
    pub fn new(at: Civil, longitude: f64) -> Self {
        Self {
            longitude,
            longitude_minutes: longitude_minutes(longitude),
            equation_of_time: equation_of_time(at.date()),
        }
    }
    /// Total signed correction in minutes; positive means true solar time is
    /// later than the clock.
    pub fn total_minutes(&self) -> f64 {
        self.longitude_minutes + self.equation_of_time
    }
    /// Shifts a standard-time reading to true solar time.
    ///
    /// # Example
    ///
    /// ```
    /// use sizhu::time_scales::{Civil, Correction};
    ///
    /// let noon = Civil::from_gregorian(1990, 6, 15, 12, 0).unwrap();
    /// let solar = Correction::new(noon, 116.4074).apply(noon);
    /// assert_eq!((11, 45), solar.hm());
    /// ```
    pub fn apply(&self, at: Civil) -> Civil {
        at.add_minutes(self.total_minutes())
    }
    /// Human readable note on the correction for a place name.
    pub fn advice(&self, place: &str) -> String {
        let total = self.total_minutes();
        if total.abs() < 1.0 {
            return "真太阳时校正量小于1分钟，可忽略不计。".to_owned();
        }
        format!(
            "根据{}的经度({}°E)，真太阳时比标准时间{}{:.1}分钟。",
            place,
            self.longitude,
            if total > 0.0 { "晚" } else { "早" },
            total.abs()
        )
    }
}

/// Whether `hours` (since midnight) lies within `tolerance` hours of a
/// double-hour (時辰) edge. Edges fall on odd hours, 23:00 being the start
/// of 子.
pub fn near_double_hour_edge(hours: f64, tolerance: f64) -> bool {
    let into_slot = (hours + 1.0).rem_euclid(2.0);
    into_slot < tolerance || 2.0 - into_slot < tolerance
}

/// A city with known coordinates, degrees north and east.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct City {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

pub const CITIES: &[City] = &[
    City { name: "北京", latitude: 39.9042, longitude: 116.4074 },
    City { name: "上海", latitude: 31.2304, longitude: 121.4737 },
    City { name: "广州", latitude: 23.1291, longitude: 113.2644 },
    City { name: "深圳", latitude: 22.5431, longitude: 114.0579 },
    City { name: "成都", latitude: 30.5728, longitude: 104.0668 },
    City { name: "武汉", latitude: 30.5928, longitude: 114.3055 },
    City { name: "西安", latitude: 34.3416, longitude: 108.9398 },
    City { name: "南京", latitude: 32.0603, longitude: 118.7969 },
    City { name: "杭州", latitude: 30.2741, longitude: 120.1551 },
    City { name: "重庆", latitude: 29.5630, longitude: 106.5516 },
    City { name: "香港", latitude: 22.3193, longitude: 114.1694 },
    City { name: "台北", latitude: 25.0330, longitude: 121.5654 },
    City { name: "哈尔滨", latitude: 45.8038, longitude: 126.5349 },
    City { name: "乌鲁木齐", latitude: 43.8256, longitude: 87.6168 },
    City { name: "拉萨", latitude: 29.6548, longitude: 91.1406 },
];

/// Looks up a city by its Chinese name.
pub fn city(name: &str) -> Option<&'static City> {
    CITIES.iter().find(|c| c.name == name)
}

/// Correction advice for a named city, as shown next to a birth time.
pub fn city_advice(name: &str, at: Civil) -> String {
    match city(name) {
        Some(c) => Correction::new(at, c.longitude).advice(name),
        None => format!("城市\"{}\"不在数据库中，无法进行真太阳时校正。", name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn civil_roundtrip() {
        let t = Civil::from_gregorian(1990, 6, 15, 13, 0).unwrap();
        assert_eq!((1990, 6, 15), t.date().gregorian());
        assert_eq!(13.0, t.hours());
        assert_eq!((13, 0), t.hm());
        assert_eq!("1990-06-15 13:00", t.to_string());
        let late = Civil::from_gregorian(2001, 2, 28, 23, 59).unwrap();
        assert_eq!((23, 59), late.hm());
        assert_eq!((2001, 3, 1), late.add_minutes(1.0).date().gregorian());
    }

    #[test]
    fn civil_rejects_bad_time() {
        assert!(Civil::from_gregorian(2000, 1, 1, 24, 0).is_none());
        assert!(Civil::from_gregorian(2000, 1, 1, 12, 60).is_none());
        assert!(Civil::from_gregorian(2000, 2, 30, 12, 0).is_none());
    }

    #[test]
    fn beijing_mid_june() {
        let at = Civil::from_gregorian(1990, 6, 15, 12, 0).unwrap();
        let lng = city("北京").unwrap().longitude;
        let c = Correction::new(at, lng);
        assert!((c.longitude_minutes + 14.37).abs() < 0.01);
        assert!(c.equation_of_time.abs() < 2.0);
        assert!((-16.0..-13.0).contains(&c.total_minutes()));
        assert!(c.advice("北京").starts_with("根据北京的经度"));
    }

    #[test]
    fn equation_of_time_extremes() {
        // mid February: sundial slow by about 14 minutes
        let feb = equation_of_time(Date::from_gregorian(2021, 2, 11).unwrap());
        assert!((-15.5..-12.5).contains(&feb), "{feb}");
        let nov = equation_of_time(Date::from_gregorian(2021, 11, 3).unwrap());
        assert!((15.0..17.5).contains(&nov), "{nov}");
    }

    #[test]
    fn negligible_correction_advice() {
        let at = Civil::from_gregorian(2021, 4, 15, 8, 0).unwrap();
        let c = Correction::new(at, 120.0);
        assert!(c.total_minutes().abs() < 1.0);
        assert_eq!("真太阳时校正量小于1分钟，可忽略不计。", c.advice("杭州"));
    }

    #[test]
    fn double_hour_edges() {
        assert!(near_double_hour_edge(12.9, 0.5));
        assert!(near_double_hour_edge(13.2, 0.5));
        assert!(near_double_hour_edge(22.8, 0.5));
        assert!(near_double_hour_edge(23.1, 0.5));
        assert!(!near_double_hour_edge(12.0, 0.5));
        assert!(!near_double_hour_edge(11.75, 0.5));
        assert!(!near_double_hour_edge(0.0, 0.5));
    }

    #[test]
    fn unknown_city() {
        assert!(city("东京").is_none());
        let at = Civil::from_gregorian(2000, 1, 1, 12, 0).unwrap();
        assert_eq!(
            "城市\"东京\"不在数据库中，无法进行真太阳时校正。",
            city_advice("东京", at)
        );
        assert_eq!(87.6168, city("乌鲁木齐").unwrap().longitude);
    }
}
