//! 五行計數與日主強弱

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::chinese::{Element, GanZhi};

/// 四柱八字中各五行出現的次數。
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ElementCounts {
    pub wood: u32,
    pub fire: u32,
    pub earth: u32,
    pub metal: u32,
    pub water: u32,
}

impl ElementCounts {
    /// 統計各柱天干與地支（各計一次，不含藏干）。
    ///
    /// # 用例
    ///
    /// ```
    /// use sizhu::bazi::ElementCounts;
    /// use sizhu::chinese::{Element, GanZhi};
    ///
    /// // 甲子：木一、水一
    /// let counts = ElementCounts::tally(&[GanZhi::from_index(0)]);
    /// assert_eq!(1, counts.get(Element::Wood));
    /// assert_eq!(1, counts.get(Element::Water));
    /// assert_eq!(2, counts.total());
    /// ```
    pub fn tally(pillars: &[GanZhi]) -> Self {
        let mut counts = Self::default();
        for gz in pillars {
            *counts.get_mut(gz.stem.element()) += 1;
            *counts.get_mut(gz.branch.element()) += 1;
        }
        counts
    }
    pub fn get(&self, el: Element) -> u32 {
        match el {
            Element::Wood => self.wood,
            Element::Fire => self.fire,
            Element::Earth => self.earth,
            Element::Metal => self.metal,
            Element::Water => self.water,
        }
    }
    fn get_mut(&mut self, el: Element) -> &mut u32 {
        match el {
            Element::Wood => &mut self.wood,
            Element::Fire => &mut self.fire,
            Element::Earth => &mut self.earth,
            Element::Metal => &mut self.metal,
            Element::Water => &mut self.water,
        }
    }
    pub fn total(&self) -> u32 {
        Element::ALL.iter().map(|&el| self.get(el)).sum()
    }
}

/// 按木火土金水的次序展示，如 `木2 火1 土3 金1 水1`。
impl Display for ElementCounts {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (i, el) in Element::ALL.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}{}", el, self.get(*el))?;
        }
        Ok(())
    }
}

/// 日主強弱的結論。
///
/// 現行評分只會得出 [`Verdict::Dominant`] 或 [`Verdict::Weak`]；從格與中和保留作結論集合的一部分，
/// 尚無判定規則。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// 身強
    Dominant,
    /// 身弱
    Weak,
    /// 從格
    Dependent,
    /// 中和
    Balanced,
}

impl Verdict {
    pub fn name(self) -> &'static str {
        match self {
            Self::Dominant => "身强",
            Self::Weak => "身弱",
            Self::Dependent => "从格",
            Self::Balanced => "中和",
        }
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

/// 分數高於此值為身強。
pub const DOMINANT_THRESHOLD: u32 = 25;

/// 日主強弱與喜忌。
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Strength {
    pub score: u32,
    pub verdict: Verdict,
    /// 喜用神
    pub favorable: Vec<Element>,
    /// 忌神
    pub unfavorable: Vec<Element>,
}

impl Strength {
    /// 同我者每個計 10 分，生我者每個計 8 分。
    ///
    /// 身強喜我生、我克，忌同我、生我；身弱反之，喜同我、生我，忌我克、克我。
    ///
    /// # 用例
    ///
    /// ```
    /// use sizhu::bazi::{ElementCounts, Strength, Verdict};
    /// use sizhu::chinese::Element;
    ///
    /// let counts = ElementCounts { wood: 2, fire: 1, earth: 2, metal: 1, water: 2 };
    /// let s = Strength::assess(&counts, Element::Wood);
    /// assert_eq!(36, s.score);
    /// assert_eq!(Verdict::Dominant, s.verdict);
    /// assert_eq!(vec![Element::Fire, Element::Earth], s.favorable);
    /// ```
    pub fn assess(counts: &ElementCounts, day_master: Element) -> Self {
        let resource = day_master.generated_by();
        let score = counts.get(day_master) * 10 + counts.get(resource) * 8;
        if score > DOMINANT_THRESHOLD {
            Self {
                score,
                verdict: Verdict::Dominant,
                favorable: vec![day_master.generates(), day_master.controls()],
                unfavorable: vec![day_master, resource],
            }
        } else {
            Self {
                score,
                verdict: Verdict::Weak,
                favorable: vec![day_master, resource],
                unfavorable: vec![day_master.controls(), day_master.controlled_by()],
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn tally_counts_eight_slots() {
        let pillars = [0, 13, 26, 39].map(GanZhi::from_index);
        let counts = ElementCounts::tally(&pillars);
        assert_eq!(8, counts.total());
        // 甲子 丁丑 庚寅 癸卯
        assert_eq!("木3 火1 土1 金1 水2", counts.to_string());
    }

    #[test]
    fn weak_at_threshold() {
        // 10 + 8 × 2 = 26 > 25；10 + 8 = 18
        let strong = ElementCounts { fire: 1, wood: 2, ..Default::default() };
        assert_eq!(Verdict::Dominant, Strength::assess(&strong, Element::Fire).verdict);
        let weak = ElementCounts { fire: 1, wood: 1, water: 6, ..Default::default() };
        let s = Strength::assess(&weak, Element::Fire);
        assert_eq!(18, s.score);
        assert_eq!(Verdict::Weak, s.verdict);
        assert_eq!(vec![Element::Fire, Element::Wood], s.favorable);
        assert_eq!(vec![Element::Metal, Element::Water], s.unfavorable);
        assert_eq!("身弱", s.verdict.to_string());
    }

    #[test]
    fn same_counts_same_strength() {
        // 甲子 丁丑 庚寅 癸卯 與 甲寅 乙巳 辛亥 戊子：日主同為金，五行計數相同
        let a = [0, 13, 26, 39].map(GanZhi::from_index);
        let b = [50, 41, 47, 24].map(GanZhi::from_index);
        assert_ne!(a, b);
        assert_ne!(a[2].stem, b[2].stem);
        let (ca, cb) = (ElementCounts::tally(&a), ElementCounts::tally(&b));
        assert_eq!(ca, cb);
        let el = a[2].stem.element();
        assert_eq!(el, b[2].stem.element());
        let s = Strength::assess(&ca, el);
        assert_eq!(s, Strength::assess(&cb, el));
        assert_eq!(18, s.score);
        assert_eq!(Verdict::Weak, s.verdict);
    }

    fn counts() -> impl Strategy<Value = ElementCounts> {
        prop::array::uniform5(0u32..=8).prop_map(|[wood, fire, earth, metal, water]| {
            ElementCounts { wood, fire, earth, metal, water }
        })
    }

    proptest! {
        #[test]
        fn depends_only_on_counts(p in prop::array::uniform4(0usize..60)) {
            // 年時兩柱互換：八字不同，五行計數與日主相同
            let a = p.map(GanZhi::from_index);
            let b = [a[3], a[1], a[2], a[0]];
            let el = a[2].stem.element();
            prop_assert_eq!(
                Strength::assess(&ElementCounts::tally(&a), el),
                Strength::assess(&ElementCounts::tally(&b), el)
            );
        }

        #[test]
        fn favorable_and_unfavorable_are_disjoint(c in counts(), el in 0usize..5) {
            let s = Strength::assess(&c, Element::from_index(el));
            prop_assert!(matches!(s.verdict, Verdict::Dominant | Verdict::Weak));
            prop_assert!(s.favorable.iter().all(|e| !s.unfavorable.contains(e)));
        }
    }
}
