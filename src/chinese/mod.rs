//! Chinese calendar
//!
//! Note: 為方便處理諸多術語，本模塊文檔用中文。
//!
//! 本模塊提供干支、五行等靜態表（[`Stem`]、[`Branch`]、[`Element`]），
//! 節氣近似算法（[`ephemeris`]），以及基於預制月長表的農曆換算（[`lunar`]）。

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::date::Date;

pub mod ephemeris;
pub mod fmt;
pub mod lunar;

/// 五行，按相生次序排列：木生火、火生土、土生金、金生水、水生木。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Wood,
        Element::Fire,
        Element::Earth,
        Element::Metal,
        Element::Water,
    ];

    /// 相生次序中的序號，`0..5`。
    pub fn index(self) -> usize {
        self as usize
    }
    /// 依序號取五行，序號按 5 取模。
    pub fn from_index(idx: usize) -> Self {
        Self::ALL[idx % 5]
    }
    /// 我生者（食傷）。
    pub fn generates(self) -> Self {
        Self::from_index(self.index() + 1)
    }
    /// 我克者（財）。
    pub fn controls(self) -> Self {
        Self::from_index(self.index() + 2)
    }
    /// 克我者（官殺）。
    pub fn controlled_by(self) -> Self {
        Self::from_index(self.index() + 3)
    }
    /// 生我者（印）。
    pub fn generated_by(self) -> Self {
        Self::from_index(self.index() + 4)
    }
    /// 以 `self` 為本位，`other` 與之的生克關係。
    ///
    /// # 用例
    ///
    /// ```
    /// use sizhu::chinese::{Element, Relation};
    ///
    /// assert_eq!(Relation::Generates, Element::Wood.relation_to(Element::Fire));
    /// assert_eq!(Relation::GeneratedBy, Element::Wood.relation_to(Element::Water));
    /// ```
    pub fn relation_to(self, other: Element) -> Relation {
        match (other.index() + 5 - self.index()) % 5 {
            0 => Relation::Same,
            1 => Relation::Generates,
            2 => Relation::Controls,
            3 => Relation::ControlledBy,
            _ => Relation::GeneratedBy,
        }
    }
    pub fn name(self) -> &'static str {
        ["木", "火", "土", "金", "水"][self.index()]
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

/// 五行生克關係，自本位視之。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Relation {
    /// 同我
    Same,
    /// 我生
    Generates,
    /// 我克
    Controls,
    /// 克我
    ControlledBy,
    /// 生我
    GeneratedBy,
}

/// 陰陽
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    Yang,
    Yin,
}

impl Polarity {
    fn of_index(idx: usize) -> Self {
        if idx % 2 == 0 { Self::Yang } else { Self::Yin }
    }
    pub fn name(self) -> &'static str {
        match self {
            Self::Yang => "阳",
            Self::Yin => "阴",
        }
    }
}

/// 天干
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Stem {
    Jia,
    Yi,
    Bing,
    Ding,
    Wu,
    Ji,
    Geng,
    Xin,
    Ren,
    Gui,
}

const STEM_CHARS: [char; 10] = ['甲', '乙', '丙', '丁', '戊', '己', '庚', '辛', '壬', '癸'];

impl Stem {
    pub const ALL: [Stem; 10] = [
        Stem::Jia,
        Stem::Yi,
        Stem::Bing,
        Stem::Ding,
        Stem::Wu,
        Stem::Ji,
        Stem::Geng,
        Stem::Xin,
        Stem::Ren,
        Stem::Gui,
    ];

    /// 序號，甲為 0。
    pub fn index(self) -> usize {
        self as usize
    }
    /// 依序號取天干，序號按 10 取模。
    pub fn from_index(idx: usize) -> Self {
        Self::ALL[idx % 10]
    }
    pub fn from_char(c: char) -> Option<Self> {
        STEM_CHARS.iter().position(|&s| s == c).map(Self::from_index)
    }
    pub fn char(self) -> char {
        STEM_CHARS[self.index()]
    }
    /// 甲乙木、丙丁火、戊己土、庚辛金、壬癸水。
    pub fn element(self) -> Element {
        Element::from_index(self.index() / 2)
    }
    /// 陽干陰干相間。
    pub fn polarity(self) -> Polarity {
        Polarity::of_index(self.index())
    }
}

impl Display for Stem {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.char())
    }
}

/// 地支
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Branch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

const BRANCH_CHARS: [char; 12] = [
    '子', '丑', '寅', '卯', '辰', '巳', '午', '未', '申', '酉', '戌', '亥',
];

const BRANCH_ELEMENTS: [Element; 12] = {
    use Element::*;
    [
        Water, Earth, Wood, Wood, Earth, Fire, Fire, Earth, Metal, Metal, Earth, Water,
    ]
};

/// 地支藏干，本氣在前。
const HIDDEN_STEMS: [&[Stem]; 12] = {
    use Stem::*;
    [
        &[Gui],
        &[Ji, Gui, Xin],
        &[Jia, Bing, Wu],
        &[Yi],
        &[Wu, Yi, Gui],
        &[Bing, Geng, Wu],
        &[Ding, Ji],
        &[Ji, Ding, Yi],
        &[Geng, Ren, Wu],
        &[Xin],
        &[Wu, Xin, Ding],
        &[Ren, Jia],
    ]
};

const ZODIAC: [&str; 12] = [
    "鼠", "牛", "虎", "兔", "龙", "蛇", "马", "羊", "猴", "鸡", "狗", "猪",
];

impl Branch {
    pub const ALL: [Branch; 12] = [
        Branch::Zi,
        Branch::Chou,
        Branch::Yin,
        Branch::Mao,
        Branch::Chen,
        Branch::Si,
        Branch::Wu,
        Branch::Wei,
        Branch::Shen,
        Branch::You,
        Branch::Xu,
        Branch::Hai,
    ];

    /// 序號，子為 0。
    pub fn index(self) -> usize {
        self as usize
    }
    /// 依序號取地支，序號按 12 取模。
    pub fn from_index(idx: usize) -> Self {
        Self::ALL[idx % 12]
    }
    pub fn from_char(c: char) -> Option<Self> {
        BRANCH_CHARS.iter().position(|&b| b == c).map(Self::from_index)
    }
    pub fn char(self) -> char {
        BRANCH_CHARS[self.index()]
    }
    pub fn element(self) -> Element {
        BRANCH_ELEMENTS[self.index()]
    }
    pub fn polarity(self) -> Polarity {
        Polarity::of_index(self.index())
    }
    /// 生肖
    pub fn zodiac(self) -> &'static str {
        ZODIAC[self.index()]
    }
    /// 藏干，一至三個，本氣在前。
    pub fn hidden_stems(self) -> &'static [Stem] {
        HIDDEN_STEMS[self.index()]
    }
    /// 六沖，即相隔六位之支。
    pub fn opposite(self) -> Self {
        Self::from_index(self.index() + 6)
    }
    /// 以寅為首的序號（寅月為正月），用於月令與建除。
    pub fn month_offset(self) -> usize {
        (self.index() + 10) % 12
    }
    /// 取鐘點所在時辰。`hours` 為當日小時數（可含小數），23 時起為子時。
    ///
    /// # 用例
    ///
    /// ```
    /// use sizhu::chinese::Branch;
    ///
    /// assert_eq!(Branch::Zi, Branch::for_hour(23.5));
    /// assert_eq!(Branch::Zi, Branch::for_hour(0.2));
    /// assert_eq!(Branch::Wu, Branch::for_hour(12.9));
    /// assert_eq!(Branch::Wei, Branch::for_hour(13.0));
    /// ```
    pub fn for_hour(hours: f64) -> Self {
        Self::from_index(((hours + 1.0) / 2.0).floor().rem_euclid(12.0) as usize)
    }
    /// 時辰的起止鐘點，如子時為 `(23, 1)`。
    pub fn hour_range(self) -> (u32, u32) {
        let start = (self.index() as u32 * 2 + 23) % 24;
        (start, (start + 2) % 24)
    }
}

impl Display for Branch {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.char())
    }
}

/// 干支，六十甲子之一。
///
/// 天干與地支序號奇偶必同，故只有 60 種組合；[`GanZhi::new`] 拒絕其餘 60 種。
///
/// # 用例
///
/// ```
/// use sizhu::chinese::{Branch, GanZhi, Stem};
///
/// let gz = GanZhi::new(Stem::Jia, Branch::Zi).unwrap();
/// assert_eq!(0, gz.index());
/// assert_eq!("乙丑", gz.next().to_string());
/// assert!(GanZhi::new(Stem::Jia, Branch::Chou).is_none());
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct GanZhi {
    pub stem: Stem,
    pub branch: Branch,
}

impl GanZhi {
    pub fn new(stem: Stem, branch: Branch) -> Option<Self> {
        (stem.index() % 2 == branch.index() % 2).then_some(Self { stem, branch })
    }
    /// 依六十甲子序號（甲子為 0）取干支，序號按 60 取模。
    pub fn from_index(idx: usize) -> Self {
        Self {
            stem: Stem::from_index(idx),
            branch: Branch::from_index(idx),
        }
    }
    /// 六十甲子序號，甲子為 0。
    pub fn index(&self) -> usize {
        (6 * self.stem.index() + 60 - 5 * self.branch.index()) % 60
    }
    /// 按天干分組的序號：`天干序號 × 6 + 地支序號 / 2`，亦為 `0..60` 的雙射。
    pub fn stem_major_index(&self) -> usize {
        self.stem.index() * 6 + self.branch.index() / 2
    }
    /// 在六十甲子中前移（`steps` 為負則後移）。
    pub fn offset(&self, steps: i32) -> Self {
        Self::from_index((self.index() as i32 + steps).rem_euclid(60) as usize)
    }
    pub fn next(&self) -> Self {
        self.offset(1)
    }
    pub fn prev(&self) -> Self {
        self.offset(-1)
    }
    /// 某公元年（以該年立春後為準）的干支，1984 年為甲子。
    pub fn for_year(year: i32) -> Self {
        Self::from_index((year - 4).rem_euclid(60) as usize)
    }
    /// 某日的干支。1900-01-01 為甲戌，即 `(距該日日數 + 10) mod 60`。
    pub fn for_day(date: Date) -> Self {
        Self::from_index(date.sexagenary() as usize - 1)
    }
    /// 五鼠遁：依日干推時干。
    ///
    /// # 用例
    ///
    /// ```
    /// use sizhu::chinese::{Branch, GanZhi, Stem};
    ///
    /// // 甲日子时为甲子，乙日子时为丙子
    /// assert_eq!(Stem::Jia, GanZhi::for_hour(Stem::Jia, Branch::Zi).stem);
    /// assert_eq!(Stem::Bing, GanZhi::for_hour(Stem::Yi, Branch::Zi).stem);
    /// ```
    pub fn for_hour(day_stem: Stem, hour_branch: Branch) -> Self {
        let stem = Stem::from_index((day_stem.index() % 5) * 2 + hour_branch.index());
        Self {
            stem,
            branch: hour_branch,
        }
    }
    /// 五虎遁：依年干推月干，寅月起。
    ///
    /// 甲己之年丙作首，乙庚之歲戊為頭，丙辛之歲庚寅上，丁壬壬寅順行流，戊癸甲寅好追求。
    ///
    /// # 用例
    ///
    /// ```
    /// use sizhu::chinese::{Branch, GanZhi, Stem};
    ///
    /// assert_eq!("丙寅", GanZhi::for_month(Stem::Jia, Branch::Yin).to_string());
    /// assert_eq!("丁丑", GanZhi::for_month(Stem::Ji, Branch::Chou).to_string());
    /// ```
    pub fn for_month(year_stem: Stem, month_branch: Branch) -> Self {
        const FIRST_MONTH_STEM: [usize; 10] = [2, 4, 6, 8, 0, 2, 4, 6, 8, 0];
        let stem = Stem::from_index(FIRST_MONTH_STEM[year_stem.index()] + month_branch.month_offset());
        Self {
            stem,
            branch: month_branch,
        }
    }
}

impl Display for GanZhi {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}{}", self.stem, self.branch)
    }
}

/// 取得所給公元年的干支。
///
/// # 用例
///
/// ```
/// use sizhu::chinese::sexagenary_for_year;
///
/// assert_eq!("甲子", sexagenary_for_year(1984).to_string());
/// assert_eq!("庚辰", sexagenary_for_year(2000).to_string());
/// ```
pub fn sexagenary_for_year(year: i32) -> GanZhi {
    GanZhi::for_year(year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn stem_attributes() {
        assert_eq!(Element::Wood, Stem::Jia.element());
        assert_eq!(Polarity::Yin, Stem::Yi.polarity());
        assert_eq!(Element::Water, Stem::Gui.element());
        assert_eq!(Polarity::Yang, Stem::Ren.polarity());
        assert_eq!(Some(Stem::Geng), Stem::from_char('庚'));
        assert_eq!(None, Stem::from_char('子'));
    }

    #[test]
    fn branch_attributes() {
        assert_eq!(Element::Water, Branch::Zi.element());
        assert_eq!(Polarity::Yang, Branch::Zi.polarity());
        assert_eq!(Polarity::Yin, Branch::Hai.polarity());
        assert_eq!("马", Branch::Wu.zodiac());
        assert_eq!(&[Stem::Ji, Stem::Gui, Stem::Xin], Branch::Chou.hidden_stems());
        assert_eq!(Branch::Wu, Branch::Zi.opposite());
        assert_eq!(0, Branch::Yin.month_offset());
        assert_eq!(11, Branch::Chou.month_offset());
        assert_eq!((23, 1), Branch::Zi.hour_range());
        assert_eq!((11, 13), Branch::Wu.hour_range());
    }

    #[test]
    fn relations() {
        use Relation::*;
        let fire = Element::Fire;
        assert_eq!(Same, fire.relation_to(Element::Fire));
        assert_eq!(Generates, fire.relation_to(Element::Earth));
        assert_eq!(Controls, fire.relation_to(Element::Metal));
        assert_eq!(ControlledBy, fire.relation_to(Element::Water));
        assert_eq!(GeneratedBy, fire.relation_to(Element::Wood));
        for el in Element::ALL {
            assert_eq!(Generates, el.relation_to(el.generates()));
            assert_eq!(Controls, el.relation_to(el.controls()));
            assert_eq!(ControlledBy, el.relation_to(el.controlled_by()));
            assert_eq!(GeneratedBy, el.relation_to(el.generated_by()));
        }
    }

    #[test]
    fn hour_branches() {
        for (hours, std) in [
            (23.0, Branch::Zi),
            (0.99, Branch::Zi),
            (1.0, Branch::Chou),
            (11.0, Branch::Wu),
            (11.75, Branch::Wu),
            (21.5, Branch::Hai),
            (22.99, Branch::Hai),
        ] {
            assert_eq!(std, Branch::for_hour(hours), "{hours}");
        }
    }

    #[test]
    fn year_sexagenary() {
        for (std, year) in [("甲子", 1984), ("己亥", 1899), ("庚子", 1900), ("庚午", 1990)] {
            assert_eq!(std, sexagenary_for_year(year).to_string());
        }
    }

    proptest! {
        #[test]
        fn index_roundtrip(idx in 0usize..60) {
            let gz = GanZhi::from_index(idx);
            prop_assert_eq!(idx, gz.index());
            prop_assert_eq!(gz.stem.index() % 2, gz.branch.index() % 2);
            prop_assert!(GanZhi::new(gz.stem, gz.branch).is_some());
        }

        #[test]
        fn stem_major_index_is_bijective(a in 0usize..60, b in 0usize..60) {
            let (ga, gb) = (GanZhi::from_index(a), GanZhi::from_index(b));
            prop_assert!(ga.stem_major_index() < 60);
            prop_assert_eq!(a == b, ga.stem_major_index() == gb.stem_major_index());
        }

        #[test]
        fn derived_pillars_keep_parity(s in 0usize..10, b in 0usize..12) {
            let stem = Stem::from_index(s);
            let branch = Branch::from_index(b);
            let hour = GanZhi::for_hour(stem, branch);
            let month = GanZhi::for_month(stem, branch);
            prop_assert_eq!(hour.stem.index() % 2, hour.branch.index() % 2);
            prop_assert_eq!(month.stem.index() % 2, month.branch.index() % 2);
        }
    }
}
