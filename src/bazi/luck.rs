//! 大運

use serde::{Deserialize, Serialize};

use super::{Gender, TenGod};
use crate::chinese::{GanZhi, Polarity, Stem};

/// 每步大運的年數。
pub const YEARS_PER_CYCLE: u32 = 10;
/// 排出的大運步數。
pub const CYCLE_COUNT: usize = 8;

/// 大運順排或逆排。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// 陽年生男、陰年生女順排，其餘逆排。
    pub fn of(gender: Gender, year_stem: Stem) -> Self {
        match (gender, year_stem.polarity()) {
            (Gender::Male, Polarity::Yang) | (Gender::Female, Polarity::Yin) => Self::Forward,
            _ => Self::Backward,
        }
    }
    fn step(self) -> i32 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }
}

/// 一步大運。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct LuckCycle {
    pub start_age: u32,
    pub ganzhi: GanZhi,
    /// 大運天干對日主的十神
    pub ten_god: TenGod,
}

/// 自月柱起，每十年進（退）一位，排出八步大運。
///
/// # 用例
///
/// ```
/// use sizhu::bazi::{luck, Direction};
/// use sizhu::chinese::{GanZhi, Stem};
///
/// let month = GanZhi::from_index(2); // 丙寅
/// let cycles = luck::cycles(month, Direction::Forward, Stem::Jia);
/// assert_eq!(8, cycles.len());
/// assert_eq!(10, cycles[0].start_age);
/// assert_eq!("丁卯", cycles[0].ganzhi.to_string());
/// assert_eq!("甲戌", cycles[7].ganzhi.to_string());
/// ```
pub fn cycles(month: GanZhi, direction: Direction, day_master: Stem) -> Vec<LuckCycle> {
    (1..=CYCLE_COUNT as i32)
        .map(|i| {
            let ganzhi = month.offset(i * direction.step());
            LuckCycle {
                start_age: i as u32 * YEARS_PER_CYCLE,
                ganzhi,
                ten_god: TenGod::of(day_master, ganzhi.stem),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn direction_rule() {
        assert_eq!(Direction::Forward, Direction::of(Gender::Male, Stem::Geng));
        assert_eq!(Direction::Backward, Direction::of(Gender::Male, Stem::Ji));
        assert_eq!(Direction::Forward, Direction::of(Gender::Female, Stem::Ji));
        assert_eq!(Direction::Backward, Direction::of(Gender::Female, Stem::Geng));
    }

    #[test]
    fn backward_from_jia_zi() {
        let cycles = cycles(GanZhi::from_index(0), Direction::Backward, Stem::Wu);
        assert_eq!("癸亥", cycles[0].ganzhi.to_string());
        assert_eq!("丙辰", cycles[7].ganzhi.to_string());
        assert_eq!(TenGod::DirectWealth, cycles[0].ten_god);
        assert_eq!(80, cycles[7].start_age);
    }

    proptest! {
        #[test]
        fn stems_and_branches_step_by_one(month in 0usize..60, forward: bool, dm in 0usize..10) {
            let direction = if forward { Direction::Forward } else { Direction::Backward };
            let month = GanZhi::from_index(month);
            let cycles = cycles(month, direction, Stem::from_index(dm));
            let (stem_step, branch_step) = if forward { (1, 1) } else { (9, 11) };
            let mut prev = month;
            for (i, c) in cycles.iter().enumerate() {
                prop_assert_eq!((i as u32 + 1) * 10, c.start_age);
                prop_assert_eq!((prev.stem.index() + stem_step) % 10, c.ganzhi.stem.index());
                prop_assert_eq!((prev.branch.index() + branch_step) % 12, c.ganzhi.branch.index());
                prop_assert_eq!(c.ganzhi.stem.index() % 2, c.ganzhi.branch.index() % 2);
                prev = c.ganzhi;
            }
        }
    }
}
