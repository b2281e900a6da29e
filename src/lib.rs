//! Four Pillars (八字) charts and the calendar facts around them.
//!
//! A birth instant and place are turned into the year, month, day and hour
//! pillars of the sexagenary cycle. Year and month follow the solar terms,
//! the hour follows true solar time at the birth place. The chart is then
//! classified: ten gods, life stages, elemental strength, luck cycles and
//! auspicious/inauspicious deities.
//!
//! The same machinery backs a perpetual calendar: Chinese lunar dates for
//! 1900 to 2099, the 24 solar terms, and the daily almanac (黃曆).
//!
//! # Examples
//!
//! Basic usage with [`Date`]:
//!
//! ```
//! use sizhu::Date;
//!
//! let date = Date::from_gregorian(2000, 1, 1).unwrap();
//!
//! assert_eq!(6, date.day_of_week()); // Saturday
//! assert_eq!(2451545, date.jdn());
//! ```
//!
//! Chinese lunar calendar:
//!
//! ```
//! use sizhu::Date;
//! use sizhu::chinese::lunar::{LunarDate, Month::*};
//!
//! let date = Date::from_gregorian(2000, 1, 1).unwrap();
//! let lunar = LunarDate::from_date(date).unwrap();
//!
//! assert_eq!((1999, Common(11), 25), (lunar.year, lunar.month, lunar.day));
//! assert_eq!("一九九九年冬月廿五", lunar.to_string());
//! ```
//!
//! A chart:
//!
//! ```
//! use sizhu::{Config, generate_chart};
//! use sizhu::bazi::{BirthTime, ChartRequest, Gender, Location};
//!
//! let request = ChartRequest::new("张三", Gender::Male, BirthTime::new(1990, 6, 15, 12, 0))
//!     .with_location(Location::City("北京".into()));
//! let chart = generate_chart(&request, &Config::default()).unwrap();
//!
//! assert_eq!("庚午 壬午 辛亥 甲午", chart.to_string());
//! for warning in &chart.warnings {
//!     println!("{warning}");
//! }
//! ```
//!
//! The crate logs through [`tracing`] and never installs a subscriber.

pub mod bazi;
pub mod chinese;
pub mod config;
pub mod date;
pub mod error;
pub mod huangli;
pub mod record;
pub mod time_scales;

pub use bazi::{Chart, ChartRequest, generate_chart};
pub use config::Config;
pub use date::{Date, YearType};
pub use error::{Error, Result};
pub use huangli::Almanac;
