//! 農曆換算
//!
//! 基於預制月長表，覆蓋農曆 1900 年正月初一（公曆 1900-01-31）至公曆 2099 年末。
//!
//! # 用例
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
//! assert_eq!(date, lunar.to_date().unwrap());
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::{Branch, GanZhi, fmt};
use crate::date::Date;
use crate::error::{Error, Result};

/// 月名，`Common` 為平月，`Leap` 為閏月。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Month {
    Common(u32),
    Leap(u32),
}

impl Month {
    /// 取得月序號，無論平閏。
    pub fn num(&self) -> u32 {
        use Month::*;
        *match self {
            Common(v) | Leap(v) => v,
        }
    }
    /// 閏月為 `true`，平月為 `false`
    pub fn is_leap(&self) -> bool {
        matches!(self, Self::Leap(_))
    }
    /// 取得月名的文本形式，十一、十二月稱「冬月」「腊月」。
    pub fn name(&self) -> String {
        fmt::month(*self)
    }
}

pub const FIRST_YEAR: i32 = 1900;
pub const LAST_YEAR: i32 = 2099;

/// 每年一項：第 0..=3 位為閏月月份（0 表示無閏月），第 4..=15 位自高到低依次為
/// 正月至臘月是否為大月（30 日），第 16 位為閏月是否為大月。
const LUNAR_INFO: [u32; 200] = [
    0x04bd8, 0x04ae0, 0x0a570, 0x054d5, 0x0d260, 0x0d950, 0x16554, 0x056a0, 0x09ad0, 0x055d2,
    0x04ae0, 0x0a5b6, 0x0a4d0, 0x0d250, 0x1d255, 0x0b540, 0x0d6a0, 0x0ada2, 0x095b0, 0x14977,
    0x04970, 0x0a4b0, 0x0b4b5, 0x06a50, 0x06d40, 0x1ab54, 0x02b60, 0x09570, 0x052f2, 0x04970,
    0x06566, 0x0d4a0, 0x0ea50, 0x06e95, 0x05ad0, 0x02b60, 0x186e3, 0x092e0, 0x1c8d7, 0x0c950,
    0x0d4a0, 0x1d8a6, 0x0b550, 0x056a0, 0x1a5b4, 0x025d0, 0x092d0, 0x0d2b2, 0x0a950, 0x0b557,
    0x06ca0, 0x0b550, 0x15355, 0x04da0, 0x0a5b0, 0x14573, 0x052b0, 0x0a9a8, 0x0e950, 0x06aa0,
    0x0aea6, 0x0ab50, 0x04b60, 0x0aae4, 0x0a570, 0x05260, 0x0f263, 0x0d950, 0x05b57, 0x056a0,
    0x096d0, 0x04dd5, 0x04ad0, 0x0a4d0, 0x0d4d4, 0x0d250, 0x0d558, 0x0b540, 0x0b6a0, 0x195a6,
    0x095b0, 0x049b0, 0x0a974, 0x0a4b0, 0x0b27a, 0x06a50, 0x06d40, 0x0af46, 0x0ab60, 0x09570,
    0x04af5, 0x04970, 0x064b0, 0x074a3, 0x0ea50, 0x06b58, 0x055c0, 0x0ab60, 0x096d5, 0x092e0,
    0x0c960, 0x0d954, 0x0d4a0, 0x0da50, 0x07552, 0x056a0, 0x0abb7, 0x025d0, 0x092d0, 0x0cab5,
    0x0a950, 0x0b4a0, 0x0baa4, 0x0ad50, 0x055d9, 0x04ba0, 0x0a5b0, 0x15176, 0x052b0, 0x0a930,
    0x07954, 0x06aa0, 0x0ad50, 0x05b52, 0x04b60, 0x0a6e6, 0x0a4e0, 0x0d260, 0x0ea65, 0x0d530,
    0x05aa0, 0x076a3, 0x096d0, 0x04afb, 0x04ad0, 0x0a4d0, 0x1d0b6, 0x0d250, 0x0d520, 0x0dd45,
    0x0b5a0, 0x056d0, 0x055b2, 0x049b0, 0x0a577, 0x0a4b0, 0x0aa50, 0x1b255, 0x06d20, 0x0ada0,
    0x14b63, 0x09370, 0x049f8, 0x04970, 0x064b0, 0x168a6, 0x0ea50, 0x06b20, 0x1a6c4, 0x0aae0,
    0x0a2e0, 0x0d2e3, 0x0c960, 0x0d557, 0x0d4a0, 0x0da50, 0x05d55, 0x056a0, 0x0a6d0, 0x055d4,
    0x052d0, 0x0a9b8, 0x0a950, 0x0b4a0, 0x0b6a6, 0x0ad50, 0x055a0, 0x0aba4, 0x0a5b0, 0x052b0,
    0x0b273, 0x06930, 0x07337, 0x06aa0, 0x0ad50, 0x14b55, 0x04b60, 0x0a570, 0x054e4, 0x0d160,
    0x0e968, 0x0d520, 0x0daa0, 0x16aa6, 0x056d0, 0x04ae0, 0x0a9d4, 0x0a2d0, 0x0d150, 0x0f252,
];

/// 農曆 1900 年正月初一，即公曆 1900-01-31。
fn anchor() -> Date {
    Date::from_jdn(2415051)
}

fn info(year: i32) -> u32 {
    LUNAR_INFO[(year - FIRST_YEAR) as usize]
}

/// 某農曆年的閏月月份，無閏月則為 `None`。
///
/// # Panics
///
/// 若 `year` 不在 `1900..=2099` 間則 panic。
pub fn leap_month(year: i32) -> Option<u32> {
    match info(year) & 0xf {
        0 => None,
        m => Some(m),
    }
}

/// 某農曆年各月（含閏月）及其日數，按時間順序排列。
///
/// # Panics
///
/// 若 `year` 不在 `1900..=2099` 間則 panic。
pub fn months(year: i32) -> impl Iterator<Item = (Month, u32)> {
    let info = info(year);
    let leap = info & 0xf;
    let leap_days = if info & 0x10000 != 0 { 30 } else { 29 };
    (1..=12u32).flat_map(move |m| {
        let days = if info & (0x10000 >> m) != 0 { 30 } else { 29 };
        let common = Some((Month::Common(m), days));
        let leap = (leap == m).then_some((Month::Leap(m), leap_days));
        common.into_iter().chain(leap)
    })
}

/// 某農曆年的總日數。
///
/// # Panics
///
/// 若 `year` 不在 `1900..=2099` 間則 panic。
pub fn year_days(year: i32) -> u32 {
    months(year).map(|(_, d)| d).sum()
}

/// 農曆日期。
///
/// 序列化時另附 `is_leap`、`zodiac` 與 `sexagenary_year`（農曆年干支）三項，反序列化時忽略。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize)]
pub struct LunarDate {
    pub year: i32,
    pub month: Month,
    pub day: u32,
}

impl LunarDate {
    /// 公曆轉農曆。
    ///
    /// 早於 1900-01-31 或晚於 2099-12-31 的日期返回 [`Error::LunarOutOfRange`]。
    pub fn from_date(date: Date) -> Result<Self> {
        if date < anchor() || date.gregorian().0 > LAST_YEAR {
            return Err(Error::LunarOutOfRange(date));
        }
        let mut offset = (date - anchor()) as u32;
        let mut year = FIRST_YEAR;
        loop {
            let days = year_days(year);
            if offset < days {
                break;
            }
            offset -= days;
            year += 1;
        }
        for (month, days) in months(year) {
            if offset < days {
                return Ok(Self {
                    year,
                    month,
                    day: offset + 1,
                });
            }
            offset -= days;
        }
        unreachable!("offset exceeds the length of lunar year {}", year)
    }

    /// 檢查並構造農曆日期。
    ///
    /// # 用例
    ///
    /// ```
    /// use sizhu::chinese::lunar::{LunarDate, Month::*};
    ///
    /// assert!(LunarDate::new(2023, Leap(2), 30).is_err()); // 闰二月小
    /// assert!(LunarDate::new(2023, Leap(3), 1).is_err());
    /// assert!(LunarDate::new(2023, Leap(2), 29).is_ok());
    /// ```
    pub fn new(year: i32, month: Month, day: u32) -> Result<Self> {
        let invalid = || Error::InvalidLunarDate {
            year,
            month: month.num(),
            day,
            leap: month.is_leap(),
        };
        if !(FIRST_YEAR..=LAST_YEAR).contains(&year) {
            return Err(Error::OutOfRange(year));
        }
        let (_, days) = months(year)
            .find(|(m, _)| *m == month)
            .ok_or_else(invalid)?;
        if day == 0 || day > days {
            return Err(invalid());
        }
        Ok(Self { year, month, day })
    }

    /// 農曆轉公曆。
    pub fn to_date(&self) -> Result<Date> {
        let this = Self::new(self.year, self.month, self.day)?;
        let mut offset: u32 = (FIRST_YEAR..this.year).map(year_days).sum();
        offset += months(this.year)
            .take_while(|(m, _)| *m != this.month)
            .map(|(_, d)| d)
            .sum::<u32>();
        Ok(anchor() + (offset + this.day - 1) as i32)
    }

    pub fn is_leap(&self) -> bool {
        self.month.is_leap()
    }
    /// 農曆年的生肖。
    pub fn zodiac(&self) -> &'static str {
        Branch::from_index((self.year - 4).rem_euclid(12) as usize).zodiac()
    }
    /// 農曆年的干支（以正月初一為歲首，不同於以立春為界的年柱）。
    pub fn ganzhi(&self) -> GanZhi {
        GanZhi::for_year(self.year)
    }
    pub fn year_name(&self) -> String {
        fmt::year(self.year)
    }
    pub fn month_name(&self) -> String {
        self.month.name()
    }
    pub fn day_name(&self) -> String {
        fmt::day(self.day)
    }
}

impl Display for LunarDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{}年{}{}",
            self.year_name(),
            self.month_name(),
            self.day_name()
        )
    }
}

impl Serialize for LunarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("LunarDate", 6)?;
        s.serialize_field("year", &self.year)?;
        s.serialize_field("month", &self.month)?;
        s.serialize_field("day", &self.day)?;
        s.serialize_field("is_leap", &self.is_leap())?;
        s.serialize_field("zodiac", self.zodiac())?;
        s.serialize_field("sexagenary_year", &self.ganzhi().to_string())?;
        s.end()
    }
}

/// 公曆轉農曆，同 [`LunarDate::from_date`]。
pub fn solar_to_lunar(date: Date) -> Result<LunarDate> {
    LunarDate::from_date(date)
}

/// 農曆轉公曆。`leap` 指所給月是否為閏月。
///
/// # 用例
///
/// ```
/// use sizhu::chinese::lunar::lunar_to_solar;
///
/// let date = lunar_to_solar(2024, 1, 1, false).unwrap();
/// assert_eq!((2024, 2, 10), date.gregorian());
/// ```
pub fn lunar_to_solar(year: i32, month: u32, day: u32, leap: bool) -> Result<Date> {
    let month = if leap {
        Month::Leap(month)
    } else {
        Month::Common(month)
    };
    LunarDate::new(year, month, day)?.to_date()
}
