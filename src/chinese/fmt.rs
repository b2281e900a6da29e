//! 格式化日期相關功能

use super::lunar::Month;

/// 漢數字，第 `1..=9` 項分別為「一」到「九」。為便於格式化日期，第 0 項為「十」。
pub const NUM_CHINESE: &[&str] = &["十", "一", "二", "三", "四", "五", "六", "七", "八", "九"];

/// 取得年份的逐位漢字寫法，零寫作「〇」。
///
/// # 用例
///
/// ```
/// use sizhu::chinese;
///
/// assert_eq!("一九〇〇", chinese::fmt::year(1900));
/// assert_eq!("二〇二四", chinese::fmt::year(2024));
/// ```
pub fn year(y: i32) -> String {
    const DIGITS: [char; 10] = ['〇', '一', '二', '三', '四', '五', '六', '七', '八', '九'];
    y.unsigned_abs()
        .to_string()
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| DIGITS[d as usize])
        .collect()
}

/// 取得月名（含「月」字）。十一、十二月稱「冬月」「腊月」。
///
/// # 用例
///
/// ```
/// use sizhu::chinese::{self, lunar::Month::*};
///
/// assert_eq!("冬月", chinese::fmt::month(Common(11)));
/// assert_eq!("闰正月", chinese::fmt::month(Leap(1)));
/// ```
///
/// # Panics
///
/// 若月序號不在 `1..=12` 間則 panic。
pub fn month(m: Month) -> String {
    let mut rt = String::new();
    if m.is_leap() {
        rt += "闰";
    }
    let num = m.num();
    rt += match num {
        1 => "正",
        2..=9 => NUM_CHINESE[num as usize],
        10 => "十",
        11 => "冬",
        12 => "腊",
        _ => panic!("month {} not in 1..=12", num),
    };
    rt += "月";
    rt
}

/// 取得日名，前十日為「初一」到「初十」，第 21 至 29 日為「廿一」到「廿九」。
///
/// # 用例
///
/// ```
/// use sizhu::chinese;
///
/// assert_eq!("初十", chinese::fmt::day(10));
/// assert_eq!("廿五", chinese::fmt::day(25));
/// assert_eq!("三十", chinese::fmt::day(30));
/// ```
///
/// # Panics
///
/// 若日序號不在 `1..=30` 間則 panic。
pub fn day(d: u32) -> String {
    match d {
        1..=10 => "初",
        11..=19 => "十",
        20 => "二",
        21..=29 => "廿",
        30 => "三",
        _ => panic!("day {} not in 1..=30", d),
    }
    .to_owned()
        + NUM_CHINESE[(d % 10) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year() {
        assert_eq!("二〇九九", year(2099));
    }

    #[test]
    fn test_month() {
        for (std, m) in [
            ("正月", Month::Common(1)),
            ("五月", Month::Common(5)),
            ("十月", Month::Common(10)),
            ("腊月", Month::Common(12)),
            ("闰六月", Month::Leap(6)),
        ] {
            assert_eq!(std, month(m));
        }
    }

    #[test]
    fn test_day() {
        for (std, d) in [
            ("初一", 1),
            ("初十", 10),
            ("十一", 11),
            ("二十", 20),
            ("廿一", 21),
            ("三十", 30),
        ] {
            assert_eq!(std, day(d));
        }
    }
}
