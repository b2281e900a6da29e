//! 十神與十二長生

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::chinese::{Branch, Polarity, Relation, Stem};

/// 十神：他干與日主的五行生克關係，再按陰陽同異分為兩種。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum TenGod {
    /// 比肩
    Peer,
    /// 劫財
    RobWealth,
    /// 食神
    EatingGod,
    /// 傷官
    HurtingOfficer,
    /// 偏財
    IndirectWealth,
    /// 正財
    DirectWealth,
    /// 七殺
    SevenKillings,
    /// 正官
    DirectOfficer,
    /// 偏印
    IndirectResource,
    /// 正印
    DirectResource,
}

impl TenGod {
    /// 以 `day_master` 為日主，取 `other` 的十神。
    ///
    /// # 用例
    ///
    /// ```
    /// use sizhu::bazi::TenGod;
    /// use sizhu::chinese::Stem;
    ///
    /// assert_eq!(TenGod::Peer, TenGod::of(Stem::Jia, Stem::Jia));
    /// assert_eq!(TenGod::DirectOfficer, TenGod::of(Stem::Jia, Stem::Xin));
    /// assert_eq!("正官", TenGod::of(Stem::Jia, Stem::Xin).name());
    /// ```
    pub fn of(day_master: Stem, other: Stem) -> Self {
        use TenGod::*;
        let (same, different) = match day_master.element().relation_to(other.element()) {
            Relation::Same => (Peer, RobWealth),
            Relation::GeneratedBy => (IndirectResource, DirectResource),
            Relation::Generates => (EatingGod, HurtingOfficer),
            Relation::Controls => (IndirectWealth, DirectWealth),
            Relation::ControlledBy => (SevenKillings, DirectOfficer),
        };
        if day_master.polarity() == other.polarity() {
            same
        } else {
            different
        }
    }

    pub fn name(self) -> &'static str {
        use TenGod::*;
        match self {
            Peer => "比肩",
            RobWealth => "劫财",
            EatingGod => "食神",
            HurtingOfficer => "伤官",
            IndirectWealth => "偏财",
            DirectWealth => "正财",
            SevenKillings => "七杀",
            DirectOfficer => "正官",
            IndirectResource => "偏印",
            DirectResource => "正印",
        }
    }
}

impl Display for TenGod {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.name())
    }
}

/// 十二長生。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum LifeStage {
    /// 長生
    Birth,
    /// 沐浴
    Bath,
    /// 冠帶
    Crown,
    /// 臨官
    Office,
    /// 帝旺
    Peak,
    /// 衰
    Decline,
    /// 病
    Sickness,
    /// 死
    Death,
    /// 墓
    Tomb,
    /// 絕
    Extinction,
    /// 胎
    Conception,
    /// 養
    Nurture,
}

impl LifeStage {
    pub const ALL: [LifeStage; 12] = {
        use LifeStage::*;
        [
            Birth, Bath, Crown, Office, Peak, Decline, Sickness, Death, Tomb, Extinction,
            Conception, Nurture,
        ]
    };

    /// 天干行至某地支時所處的階段。陽干自長生之地順行，陰干逆行。
    ///
    /// # 用例
    ///
    /// ```
    /// use sizhu::bazi::LifeStage;
    /// use sizhu::chinese::{Branch, Stem};
    ///
    /// assert_eq!(LifeStage::Birth, LifeStage::of(Stem::Jia, Branch::Hai));
    /// assert_eq!(LifeStage::Peak, LifeStage::of(Stem::Jia, Branch::Mao));
    /// assert_eq!(LifeStage::Bath, LifeStage::of(Stem::Yi, Branch::Si));
    /// ```
    pub fn of(stem: Stem, branch: Branch) -> Self {
        // 長生之地，按天干次序
        const BIRTH: [Branch; 10] = [
            Branch::Hai,
            Branch::Wu,
            Branch::Yin,
            Branch::You,
            Branch::Yin,
            Branch::You,
            Branch::Si,
            Branch::Zi,
            Branch::Shen,
            Branch::Mao,
        ];
        let birth = BIRTH[stem.index()].index();
        let steps = match stem.polarity() {
            Polarity::Yang => branch.index() + 12 - birth,
            Polarity::Yin => birth + 12 - branch.index(),
        };
        Self::ALL[steps % 12]
    }

    pub fn name(self) -> &'static str {
        const NAMES: [&str; 12] = [
            "长生", "沐浴", "冠带", "临官", "帝旺", "衰", "病", "死", "墓", "绝", "胎", "养",
        ];
        NAMES[self as usize]
    }
}

impl Display for LifeStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_gods_of_jia() {
        use TenGod::*;
        for (c, std) in [
            ('甲', Peer),
            ('乙', RobWealth),
            ('丙', EatingGod),
            ('丁', HurtingOfficer),
            ('戊', IndirectWealth),
            ('己', DirectWealth),
            ('庚', SevenKillings),
            ('辛', DirectOfficer),
            ('壬', IndirectResource),
            ('癸', DirectResource),
        ] {
            assert_eq!(std, TenGod::of(Stem::Jia, Stem::from_char(c).unwrap()), "{c}");
        }
    }

    #[test]
    fn ten_gods_of_yin_stem() {
        // 癸水日主：壬為劫財，丙為正財，己為七殺
        assert_eq!(TenGod::RobWealth, TenGod::of(Stem::Gui, Stem::Ren));
        assert_eq!(TenGod::DirectWealth, TenGod::of(Stem::Gui, Stem::Bing));
        assert_eq!(TenGod::SevenKillings, TenGod::of(Stem::Gui, Stem::Ji));
    }

    #[test]
    fn life_stage_cycles() {
        // 丙戊同起寅，丁己同起酉
        for b in Branch::ALL {
            assert_eq!(LifeStage::of(Stem::Bing, b), LifeStage::of(Stem::Wu, b));
            assert_eq!(LifeStage::of(Stem::Ding, b), LifeStage::of(Stem::Ji, b));
        }
        assert_eq!(LifeStage::Tomb, LifeStage::of(Stem::Geng, Branch::Chou));
        assert_eq!(LifeStage::Nurture, LifeStage::of(Stem::Xin, Branch::Chou));
        assert_eq!(LifeStage::Peak, LifeStage::of(Stem::Gui, Branch::Hai));
        assert_eq!(LifeStage::Nurture, LifeStage::of(Stem::Ren, Branch::Wei));
        assert_eq!("帝旺", LifeStage::Peak.to_string());
    }

    #[test]
    fn each_stem_visits_every_stage_once() {
        for s in Stem::ALL {
            let mut seen: Vec<_> = Branch::ALL.iter().map(|&b| LifeStage::of(s, b) as usize).collect();
            seen.sort();
            assert_eq!((0..12).collect::<Vec<_>>(), seen);
        }
    }
}
