//! 節氣時刻
//!
//! 以 1900 年小寒（北京時間 1900-01-06 02:05）為基點，按回歸年均勻分割推算二十四節氣：
//!
//! ```text
//! 時刻(年, 序號) = 基點 + (年 − 1900) × 365.2422 日 + 序號 × 365.2422 / 24 日
//! ```
//!
//! 此為線性近似而非真實曆表，極端年份誤差可達一日左右，故排盤時於節氣前後給出提示。
//! 下游只依賴 [`term_instant`] 的簽名，日後可替換為按太陽黃經計算的算法。
//!
//! # 用例
//!
//! ```
//! use sizhu::chinese::Branch;
//! use sizhu::chinese::ephemeris::{self, SolarTerm};
//! use sizhu::time_scales::Civil;
//!
//! let t = ephemeris::term_instant(2024, SolarTerm::LiChun);
//! assert_eq!((2024, 2, 5), t.date().gregorian());
//!
//! let at = Civil::from_gregorian(2024, 3, 1, 12, 0).unwrap();
//! assert_eq!(Branch::Yin, ephemeris::month_branch(at));
//! assert_eq!("丙寅", ephemeris::month_ganzhi(at).to_string());
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{Branch, GanZhi};
use crate::time_scales::Civil;

/// 回歸年日數。
pub const TROPICAL_YEAR: f64 = 365.2422;

/// 基點：1900 年小寒，北京時間 1900-01-06 02:05。
const BASE: Civil = Civil(2415026.0 - 0.5 + 125.0 / 1440.0);

/// 二十四節氣，自小寒起按公曆年內次序排列。偶數序號為「節」，是月柱的分界。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum SolarTerm {
    XiaoHan,
    DaHan,
    LiChun,
    YuShui,
    JingZhe,
    ChunFen,
    QingMing,
    GuYu,
    LiXia,
    XiaoMan,
    MangZhong,
    XiaZhi,
    XiaoShu,
    DaShu,
    LiQiu,
    ChuShu,
    BaiLu,
    QiuFen,
    HanLu,
    ShuangJiang,
    LiDong,
    XiaoXue,
    DaXue,
    DongZhi,
}

impl SolarTerm {
    pub const ALL: [SolarTerm; 24] = {
        use SolarTerm::*;
        [
            XiaoHan, DaHan, LiChun, YuShui, JingZhe, ChunFen, QingMing, GuYu, LiXia, XiaoMan,
            MangZhong, XiaZhi, XiaoShu, DaShu, LiQiu, ChuShu, BaiLu, QiuFen, HanLu, ShuangJiang,
            LiDong, XiaoXue, DaXue, DongZhi,
        ]
    };
    const NAMES: [&str; 24] = [
        "小寒", "大寒", "立春", "雨水", "惊蛰", "春分", "清明", "谷雨", "立夏", "小满", "芒种", "夏至",
        "小暑", "大暑", "立秋", "处暑", "白露", "秋分", "寒露", "霜降", "立冬", "小雪", "大雪", "冬至",
    ];

    pub fn index(self) -> usize {
        self as usize
    }
    /// 按 24 取模。
    pub fn from_index(idx: usize) -> Self {
        Self::ALL[idx % 24]
    }
    pub fn name(self) -> &'static str {
        Self::NAMES[self.index()]
    }
    /// 是否為「節」（交節即換月）。
    pub fn is_entry(self) -> bool {
        self.index() % 2 == 0
    }
    /// 節氣所在月的月支：小寒、大寒屬丑月，立春、雨水屬寅月，餘類推。
    pub fn branch(self) -> Branch {
        Branch::from_index(self.index() / 2 + 1)
    }
}

impl Display for SolarTerm {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.name())
    }
}

/// 某公元年某節氣的近似時刻（北京時間）。
pub fn term_instant(year: i32, term: SolarTerm) -> Civil {
    BASE.add_days((year - 1900) as f64 * TROPICAL_YEAR + term.index() as f64 * TROPICAL_YEAR / 24.0)
}

/// 一個公元年內的全部節氣時刻。
#[derive(Debug, Clone)]
pub struct YearTerms {
    pub year: i32,
    /// 按 [`SolarTerm::ALL`] 次序排列
    pub instants: [Civil; 24],
}

const CACHED_YEARS: std::ops::RangeInclusive<i32> = 1899..=2100;

static CACHE: LazyLock<Vec<YearTerms>> = LazyLock::new(|| {
    trace!(
        "building solar term tables for {}..={}",
        CACHED_YEARS.start(),
        CACHED_YEARS.end()
    );
    CACHED_YEARS.map(YearTerms::compute).collect()
});

impl YearTerms {
    fn compute(year: i32) -> Self {
        Self {
            year,
            instants: SolarTerm::ALL.map(|t| term_instant(year, t)),
        }
    }

    /// 取得公元 `year` 年的節氣表。1899 至 2100 年的表只算一次。
    pub fn of(year: i32) -> YearTerms {
        if CACHED_YEARS.contains(&year) {
            trace!(year, "solar term table hit");
            CACHE[(year - CACHED_YEARS.start()) as usize].clone()
        } else {
            Self::compute(year)
        }
    }

    pub fn instant(&self, term: SolarTerm) -> Civil {
        self.instants[term.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (SolarTerm, Civil)> + '_ {
        SolarTerm::ALL.into_iter().zip(self.instants.iter().copied())
    }

    /// 最後一個不晚於 `at` 的「節」。
    fn last_entry_before(&self, at: Civil) -> Option<(SolarTerm, Civil)> {
        self.iter()
            .filter(|(t, i)| t.is_entry() && *i <= at)
            .last()
    }
}

/// 月柱所跨的節氣區間。
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MonthSpan {
    pub branch: Branch,
    /// 開啟本月的「節」
    pub start: (SolarTerm, Civil),
    /// 結束本月的「節」
    pub end: (SolarTerm, Civil),
}

/// `at` 所在節氣月的起止。
///
/// 當年小寒之前（1 月初）仍屬上一年大雪所開的子月。
pub fn month_span(at: Civil) -> MonthSpan {
    let year = at.date().gregorian().0;
    let (start_year, start) = match YearTerms::of(year).last_entry_before(at) {
        Some(start) => (year, start),
        None => (
            year - 1,
            (SolarTerm::DaXue, term_instant(year - 1, SolarTerm::DaXue)),
        ),
    };
    let (end_year, end) = match start.0.index() + 2 {
        24 => (start_year + 1, SolarTerm::XiaoHan),
        n => (start_year, SolarTerm::from_index(n)),
    };
    MonthSpan {
        branch: start.0.branch(),
        start,
        end: (end, term_instant(end_year, end)),
    }
}

/// `at` 所在節氣月的月支。
pub fn month_branch(at: Civil) -> Branch {
    month_span(at).branch
}

/// 以立春為歲首的年份：立春之前算作上一年。
///
/// # 用例
///
/// ```
/// use sizhu::chinese::ephemeris::effective_year;
/// use sizhu::time_scales::Civil;
///
/// assert_eq!(1899, effective_year(Civil::from_gregorian(1900, 1, 20, 12, 0).unwrap()));
/// assert_eq!(1900, effective_year(Civil::from_gregorian(1900, 2, 20, 12, 0).unwrap()));
/// ```
pub fn effective_year(at: Civil) -> i32 {
    let year = at.date().gregorian().0;
    if at < term_instant(year, SolarTerm::LiChun) {
        year - 1
    } else {
        year
    }
}

/// 年柱，以立春為界。
pub fn year_ganzhi(at: Civil) -> GanZhi {
    GanZhi::for_year(effective_year(at))
}

/// 月柱：節氣定月支，五虎遁定月干。
pub fn month_ganzhi(at: Civil) -> GanZhi {
    GanZhi::for_month(year_ganzhi(at).stem, month_branch(at))
}

/// 臨近的節氣。
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearTerm {
    pub term: SolarTerm,
    /// 節氣時刻減 `at` 的日數，正值表示節氣尚未到來
    pub days: f64,
}

/// 若 `at` 距某節氣不超過 `tolerance_days` 日，返回最近的一個。
///
/// 檢查當年二十四節氣，並順帶檢查相鄰兩年，以便容差較大時跨年仍能發現。
pub fn near_term(at: Civil, tolerance_days: f64) -> Option<NearTerm> {
    let year = at.date().gregorian().0;
    (year - 1..=year + 1)
        .flat_map(|y| {
            let terms = YearTerms::of(y);
            terms.iter().collect::<Vec<_>>()
        })
        .map(|(term, instant)| NearTerm {
            term,
            days: instant - at,
        })
        .filter(|n| n.days.abs() <= tolerance_days)
        .min_by(|a, b| a.days.abs().total_cmp(&b.days.abs()))
}

/// 時刻在 `at` 前後 12 小時內的節氣。
///
/// # 用例
///
/// ```
/// use sizhu::chinese::ephemeris::{term_on, SolarTerm};
/// use sizhu::time_scales::Civil;
///
/// let noon = Civil::from_gregorian(2024, 2, 5, 12, 0).unwrap();
/// assert_eq!(Some(SolarTerm::LiChun), term_on(noon).map(|(t, _)| t));
/// ```
pub fn term_on(at: Civil) -> Option<(SolarTerm, Civil)> {
    let year = at.date().gregorian().0;
    (year - 1..=year + 1)
        .flat_map(|y| YearTerms::of(y).iter().collect::<Vec<_>>())
        .find(|(_, instant)| (*instant - at).abs() < 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn civil(y: i32, m: i32, d: i32, h: u32) -> Civil {
        Civil::from_gregorian(y, m, d, h, 0).unwrap()
    }

    #[test]
    fn base_instant() {
        let t = term_instant(1900, SolarTerm::XiaoHan);
        assert_eq!("1900-01-06 02:05", t.to_string());
        assert_eq!(SolarTerm::XiaoHan, SolarTerm::from_index(24));
    }

    #[test]
    fn term_branches() {
        assert_eq!(Branch::Chou, SolarTerm::XiaoHan.branch());
        assert_eq!(Branch::Chou, SolarTerm::DaHan.branch());
        assert_eq!(Branch::Yin, SolarTerm::LiChun.branch());
        assert_eq!(Branch::Zi, SolarTerm::DaXue.branch());
        assert_eq!(Branch::Zi, SolarTerm::DongZhi.branch());
        assert!(SolarTerm::MangZhong.is_entry());
        assert!(!SolarTerm::XiaZhi.is_entry());
        assert_eq!("芒种", SolarTerm::MangZhong.to_string());
    }

    #[test]
    fn terms_are_ordered_within_year() {
        for year in [1900, 1950, 2024, 2099] {
            let terms = YearTerms::of(year);
            assert_eq!(year, terms.year);
            for pair in terms.instants.windows(2) {
                let gap = pair[1] - pair[0];
                assert!((gap - TROPICAL_YEAR / 24.0).abs() < 1e-6);
            }
            assert_eq!(year, terms.instant(SolarTerm::XiaoHan).date().gregorian().0);
            assert_eq!(year, terms.instant(SolarTerm::DongZhi).date().gregorian().0);
        }
    }

    #[test]
    fn late_january_1900() {
        let at = civil(1900, 1, 20, 12);
        assert_eq!(Branch::Chou, month_branch(at));
        assert_eq!("己亥", year_ganzhi(at).to_string());
        assert_eq!("丁丑", month_ganzhi(at).to_string());
    }

    #[test]
    fn before_xiaohan_is_zi_month() {
        let at = civil(2024, 1, 2, 12);
        let span = month_span(at);
        assert_eq!(Branch::Zi, span.branch);
        assert_eq!(SolarTerm::DaXue, span.start.0);
        assert_eq!((2023, 12), {
            let (y, m, _) = span.start.1.date().gregorian();
            (y, m)
        });
        assert_eq!(SolarTerm::XiaoHan, span.end.0);
        assert_eq!(2024, span.end.1.date().gregorian().0);
        assert_eq!("甲子", month_ganzhi(at).to_string());
    }

    #[test]
    fn december_spans_into_next_year() {
        let span = month_span(civil(2023, 12, 25, 12));
        assert_eq!(Branch::Zi, span.branch);
        assert_eq!(SolarTerm::XiaoHan, span.end.0);
        assert_eq!(2024, span.end.1.date().gregorian().0);
    }

    #[test]
    fn spans_contain_instant() {
        for (y, m, d) in [(2000, 1, 3), (2000, 2, 10), (2010, 6, 6), (2050, 12, 31)] {
            let at = civil(y, m, d, 8);
            let span = month_span(at);
            assert!(span.start.1 <= at && at < span.end.1, "{y}-{m}-{d}");
            assert!(span.start.0.is_entry() && span.end.0.is_entry());
        }
    }

    #[test]
    fn month_stems_follow_five_tigers() {
        // 2024 甲辰年：寅月丙寅，午月庚午
        assert_eq!("丙寅", month_ganzhi(civil(2024, 2, 20, 0)).to_string());
        assert_eq!("庚午", month_ganzhi(civil(2024, 6, 20, 0)).to_string());
    }

    #[test]
    fn near_terms() {
        let lichun = term_instant(2024, SolarTerm::LiChun);
        let near = near_term(lichun.add_days(-1.0), 3.0).unwrap();
        assert_eq!(SolarTerm::LiChun, near.term);
        assert!((near.days - 1.0).abs() < 1e-6);
        assert!(near_term(lichun.add_days(7.5), 3.0).is_none());
        // 12 月 31 日離次年小寒 5 日餘
        let near = near_term(civil(2023, 12, 31, 12), 6.0).unwrap();
        assert_eq!(SolarTerm::XiaoHan, near.term);
    }

    #[test]
    fn term_on_day() {
        let t = term_instant(2010, SolarTerm::QiuFen);
        assert_eq!(Some(SolarTerm::QiuFen), term_on(t.add_days(0.3)).map(|x| x.0));
        assert!(term_on(t.add_days(0.6)).is_none());
    }
}
