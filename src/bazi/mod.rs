//! 四柱排盤
//!
//! Note: 為方便處理諸多術語，本模塊文檔用中文。
//!
//! 流程：出生時刻按所在地經度與均時差校正為真太陽時，以節氣定年柱、月柱，
//! 以日數定日柱，以真太陽時定時柱；再以日干為日主，推十神、十二長生、五行強弱、大運與神煞。
//!
//! # 用例
//!
//! ```
//! use sizhu::Config;
//! use sizhu::bazi::{self, BirthTime, ChartRequest, Gender, Location};
//!
//! let request = ChartRequest::new("张三", Gender::Male, BirthTime::new(1990, 6, 15, 12, 0))
//!     .with_location(Location::City("北京".into()));
//! let chart = bazi::generate_chart(&request, &Config::default()).unwrap();
//!
//! assert_eq!("庚午 壬午 辛亥 甲午", chart.to_string());
//! assert_eq!("辛", chart.day_master.to_string());
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::chinese::ephemeris::{self, SolarTerm};
use crate::chinese::{Branch, GanZhi, Stem};
use crate::config::Config;
use crate::date::Date;
use crate::error::{Error, Result};
use crate::time_scales::{self, Civil, Correction};

pub mod deity;
pub mod luck;
pub mod report;
mod strength;
mod ten_god;

pub use deity::{Deity, DeityKind, Influence};
pub use luck::{Direction, LuckCycle};
pub use strength::{DOMINANT_THRESHOLD, ElementCounts, Strength, Verdict};
pub use ten_god::{LifeStage, TenGod};

/// 排盤支持的公曆年份。
pub const SUPPORTED_YEARS: std::ops::RangeInclusive<i32> = 1900..=2099;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// 乾造（男）或坤造（女）。
    pub fn chart_name(self) -> &'static str {
        match self {
            Self::Male => "乾造",
            Self::Female => "坤造",
        }
    }
}

/// 出生地：已知城市名，或經緯度（度，東經、北緯為正）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Location {
    City(String),
    Coordinates { longitude: f64, latitude: f64 },
}

/// 出生時刻，北京時間，精確到分。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct BirthTime {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: u32,
    pub minute: u32,
}

impl BirthTime {
    pub fn new(year: i32, month: i32, day: i32, hour: u32, minute: u32) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
        }
    }

    /// 檢查並換算為鐘面時刻。
    pub fn civil(&self) -> Result<Civil> {
        let date =
            Date::from_gregorian(self.year, self.month, self.day).ok_or(Error::InvalidDate {
                year: self.year,
                month: self.month,
                day: self.day,
            })?;
        if !SUPPORTED_YEARS.contains(&self.year) {
            return Err(Error::OutOfRange(self.year));
        }
        Civil::from_date(date, self.hour, self.minute).ok_or(Error::InvalidTime {
            hour: self.hour,
            minute: self.minute,
        })
    }
}

impl Display for BirthTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute
        )
    }
}

/// 排盤請求。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRequest {
    pub name: String,
    pub gender: Gender,
    pub birth: BirthTime,
    pub location: Option<Location>,
}

impl ChartRequest {
    pub fn new(name: impl Into<String>, gender: Gender, birth: BirthTime) -> Self {
        Self {
            name: name.into(),
            gender,
            birth,
            location: None,
        }
    }
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

/// 柱位。[`Position::Whole`] 表示作用於全局、不屬某一柱。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Position {
    Year,
    Month,
    Day,
    Hour,
    Whole,
}

impl Position {
    /// 四柱，按年月日時排列。
    pub const PILLARS: [Position; 4] = [Self::Year, Self::Month, Self::Day, Self::Hour];

    pub fn name(self) -> &'static str {
        match self {
            Self::Year => "年",
            Self::Month => "月",
            Self::Day => "日",
            Self::Hour => "时",
            Self::Whole => "全局",
        }
    }
}

/// 一柱干支及其相對日主的十神、藏干十神與長生。
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Pillar {
    pub ganzhi: GanZhi,
    pub ten_god: TenGod,
    /// 與 [`Branch::hidden_stems`] 一一對應
    pub hidden_gods: Vec<TenGod>,
    pub life_stage: LifeStage,
}

impl Pillar {
    pub fn new(ganzhi: GanZhi, day_master: Stem) -> Self {
        Self {
            ganzhi,
            ten_god: TenGod::of(day_master, ganzhi.stem),
            hidden_gods: ganzhi
                .branch
                .hidden_stems()
                .iter()
                .map(|&s| TenGod::of(day_master, s))
                .collect(),
            life_stage: LifeStage::of(day_master, ganzhi.branch),
        }
    }
}

/// 排盤提示：結果仍有效，但可能因精度所限而有誤。
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum Warning {
    /// 真太陽時校正量較大，分鐘，正值表示真太陽時較鐘面晚
    SolarTimeCorrection { minutes: f64 },
    /// 臨近節氣，月柱可能有誤
    NearSolarTerm { term: SolarTerm, days: f64 },
    /// 臨近時辰交界，時柱可能有誤
    HourBoundary { branch: Branch },
}

impl Display for Warning {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::SolarTimeCorrection { minutes } => write!(
                f,
                "真太阳时校正: {}{:.1}分钟",
                if *minutes > 0.0 { "晚" } else { "早" },
                minutes.abs()
            ),
            Self::NearSolarTerm { term, days } => write!(
                f,
                "节气交接期: 在{}节气{}天内，月柱可能有误",
                term,
                days.abs().round()
            ),
            Self::HourBoundary { branch } => {
                let (start, end) = branch.hour_range();
                write!(
                    f,
                    "时辰边界: 当前时间在{:02}:00-{:02}:00边界附近，时柱可能有误",
                    start, end
                )
            }
        }
    }
}

/// 一人一時的命盤。生成後不再改動。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub gender: Gender,
    pub birth: BirthTime,
    /// 排盤所用的真太陽時（無出生地時即鐘面時刻）
    pub solar_time: Civil,
    pub correction: Option<Correction>,
    pub year: Pillar,
    pub month: Pillar,
    pub day: Pillar,
    pub hour: Pillar,
    pub day_master: Stem,
    pub element_counts: ElementCounts,
    pub strength: Strength,
    pub luck_cycles: Vec<LuckCycle>,
    pub warnings: Vec<Warning>,
    pub deities: Vec<Deity>,
}

impl Chart {
    /// 四柱，按年月日時排列。
    pub fn pillars(&self) -> [&Pillar; 4] {
        [&self.year, &self.month, &self.day, &self.hour]
    }
    pub fn ganzhis(&self) -> [GanZhi; 4] {
        self.pillars().map(|p| p.ganzhi)
    }
    pub fn deity_summary(&self) -> String {
        deity::summary(&self.deities)
    }
}

/// 四柱干支，以空格分隔。
impl Display for Chart {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let [y, m, d, h] = self.ganzhis();
        write!(f, "{} {} {} {}", y, m, d, h)
    }
}

/// 由（已校正的）時刻定四柱干支。
///
/// 日柱按鐘面日期計，子時不換日。
///
/// # 用例
///
/// ```
/// use sizhu::bazi::four_pillars;
/// use sizhu::time_scales::Civil;
///
/// let at = Civil::from_gregorian(1984, 2, 2, 8, 30).unwrap();
/// let [y, m, d, h] = four_pillars(at);
/// // 立春前，仍属癸亥年丑月
/// assert_eq!("癸亥", y.to_string());
/// assert_eq!("乙丑", m.to_string());
/// assert_eq!("丙寅", d.to_string());
/// assert_eq!("壬辰", h.to_string());
/// ```
pub fn four_pillars(at: Civil) -> [GanZhi; 4] {
    let day = GanZhi::for_day(at.date());
    [
        ephemeris::year_ganzhi(at),
        ephemeris::month_ganzhi(at),
        day,
        GanZhi::for_hour(day.stem, Branch::for_hour(at.hours())),
    ]
}

/// 一日十二時辰的時柱，自子時起。
pub fn hour_pillars(date: Date) -> [GanZhi; 12] {
    let day_stem = GanZhi::for_day(date).stem;
    Branch::ALL.map(|b| GanZhi::for_hour(day_stem, b))
}

/// 出生地對應的真太陽時校正量。未知城市且非嚴格模式時不校正。
fn correction_for(location: &Location, at: Civil, config: &Config) -> Result<Option<Correction>> {
    match location {
        Location::City(name) => match time_scales::city(name) {
            Some(city) => Ok(Some(Correction::new(at, city.longitude))),
            None if config.strict_city => Err(Error::UnknownCity(name.clone())),
            None => {
                warn!(city = %name, "unknown city, skipping true solar time correction");
                Ok(None)
            }
        },
        Location::Coordinates { longitude, .. } => {
            if !(-180.0..=180.0).contains(longitude) {
                return Err(Error::InvalidLongitude(*longitude));
            }
            Ok(Some(Correction::new(at, *longitude)))
        }
    }
}

/// 排盤。
///
/// 除 `id` 與 `created_at` 外，結果只取決於輸入。
pub fn generate_chart(request: &ChartRequest, config: &Config) -> Result<Chart> {
    let clock = request.birth.civil()?;
    let correction = match &request.location {
        Some(location) => correction_for(location, clock, config)?,
        None => None,
    };
    let solar_time = correction.map_or(clock, |c| c.apply(clock));

    let ganzhis = four_pillars(solar_time);
    let [year, month, day, hour] = ganzhis;
    let day_master = day.stem;

    let mut warnings = Vec::new();
    if let Some(c) = correction {
        let minutes = c.total_minutes();
        if minutes.abs() >= config.correction_warning_minutes {
            warnings.push(Warning::SolarTimeCorrection { minutes });
        }
    }
    if let Some(near) = ephemeris::near_term(solar_time, config.solar_term_tolerance_days) {
        warnings.push(Warning::NearSolarTerm {
            term: near.term,
            days: near.days,
        });
    }
    if time_scales::near_double_hour_edge(
        solar_time.hours(),
        config.hour_boundary_tolerance_hours,
    ) {
        warnings.push(Warning::HourBoundary {
            branch: hour.branch,
        });
    }

    let element_counts = ElementCounts::tally(&ganzhis);
    let strength = Strength::assess(&element_counts, day_master.element());
    let direction = Direction::of(request.gender, year.stem);
    let luck_cycles = luck::cycles(month, direction, day_master);
    let deities = deity::all_deities(day_master, year.branch, &ganzhis);

    debug!(
        name = %request.name,
        birth = %request.birth,
        solar_time = %solar_time,
        year = %year,
        month = %month,
        day = %day,
        hour = %hour,
        verdict = strength.verdict.name(),
        warnings = warnings.len(),
        "chart generated"
    );

    Ok(Chart {
        id: Uuid::new_v4().to_string(),
        created_at: Utc::now(),
        name: request.name.clone(),
        gender: request.gender,
        birth: request.birth,
        solar_time,
        correction,
        year: Pillar::new(year, day_master),
        month: Pillar::new(month, day_master),
        day: Pillar::new(day, day_master),
        hour: Pillar::new(hour, day_master),
        day_master,
        element_counts,
        strength,
        luck_cycles,
        warnings,
        deities,
    })
}
