//! 命盤摘要與批文分項
//!
//! 批文由外部的文本生成服務撰寫，本模塊只負責把命盤整理為固定格式的摘要，
//! 並列出需要撰寫的各個分項。

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult, Write};

use serde::{Deserialize, Serialize};

use super::{Chart, Pillar};
use crate::chinese::Element;

/// 批文分項。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportSection {
    Summary,
    Career,
    Wealth,
    Relationship,
    Health,
    Children,
    Education,
    Social,
    Yearly,
    Advice,
}

impl ReportSection {
    pub const ALL: [ReportSection; 10] = {
        use ReportSection::*;
        [
            Summary, Career, Wealth, Relationship, Health, Children, Education, Social, Yearly,
            Advice,
        ]
    };

    /// 存檔所用的鍵，如 `career`。
    pub fn key(self) -> &'static str {
        use ReportSection::*;
        match self {
            Summary => "summary",
            Career => "career",
            Wealth => "wealth",
            Relationship => "relationship",
            Health => "health",
            Children => "children",
            Education => "education",
            Social => "social",
            Yearly => "yearly",
            Advice => "advice",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }

    pub fn title(self) -> &'static str {
        use ReportSection::*;
        match self {
            Summary => "命局总评",
            Career => "事业运势",
            Wealth => "财富运势",
            Relationship => "婚姻情感",
            Health => "健康养生",
            Children => "子女运势",
            Education => "学业运势",
            Social => "人际关系",
            Yearly => "流年运势",
            Advice => "人生建议",
        }
    }

    /// 交給文本生成服務的提示語。
    pub fn prompt(self, chart: &Chart) -> String {
        format!("请根据以下八字命盘给出{}分析：\n\n{}", self.title(), digest(chart))
    }
}

impl Display for ReportSection {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.title())
    }
}

fn join(elements: &[Element]) -> String {
    elements.iter().map(|e| e.name()).collect::<Vec<_>>().join("、")
}

fn pillar_line(out: &mut String, label: &str, pillar: &Pillar, with_ten_god: bool) {
    if with_ten_god {
        let _ = writeln!(out, "{}：{}（{}）", label, pillar.ganzhi, pillar.ten_god);
    } else {
        let _ = writeln!(out, "{}：{}", label, pillar.ganzhi);
    }
}

/// 命盤摘要，逐行依次為命主、日元、格局、喜用神、忌神、五行分布與四柱。日柱不注十神。
///
/// 結果只取決於命盤內容。
pub fn digest(chart: &Chart) -> String {
    let dm = chart.day_master;
    let mut out = String::new();
    let _ = writeln!(out, "命主：{}（{}）", chart.name, chart.gender.chart_name());
    let _ = writeln!(out, "日元：{}{}（{}）", dm, dm.element(), dm.polarity().name());
    let _ = writeln!(
        out,
        "格局：{}（强度{}分）",
        chart.strength.verdict, chart.strength.score
    );
    let _ = writeln!(out, "喜用神：{}", join(&chart.strength.favorable));
    let _ = writeln!(out, "忌神：{}", join(&chart.strength.unfavorable));
    let _ = writeln!(out, "五行分布：{}", chart.element_counts);
    pillar_line(&mut out, "年柱", &chart.year, true);
    pillar_line(&mut out, "月柱", &chart.month, true);
    pillar_line(&mut out, "日柱", &chart.day, false);
    pillar_line(&mut out, "时柱", &chart.hour, true);
    out.truncate(out.trim_end().len());
    out
}

/// 撰寫批文的服務。返回的文字原樣存檔，不作解析。
pub trait Narrator {
    type Error;

    fn narrate(&mut self, section: ReportSection, prompt: &str) -> Result<String, Self::Error>;
}

/// 依次撰寫各分項，返回以 [`ReportSection::key`] 為鍵的批文。遇錯即止。
pub fn narrate_all<N: Narrator>(
    chart: &Chart,
    sections: &[ReportSection],
    narrator: &mut N,
) -> Result<BTreeMap<String, String>, N::Error> {
    sections
        .iter()
        .map(|&section| {
            let text = narrator.narrate(section, &section.prompt(chart))?;
            Ok((section.key().to_owned(), text))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use crate::bazi::{BirthTime, ChartRequest, Gender, Location, generate_chart};

    fn beijing() -> Chart {
        let request = ChartRequest::new("李四", Gender::Female, BirthTime::new(1990, 6, 15, 12, 0))
            .with_location(Location::City("北京".into()));
        generate_chart(&request, &Config::default()).unwrap()
    }

    #[test]
    fn digest_layout() {
        let expected = "\
命主：李四（坤造）
日元：辛金（阴）
格局：身弱（强度20分）
喜用神：金、土
忌神：木、火
五行分布：木1 火3 土0 金2 水2
年柱：庚午（劫财）
月柱：壬午（伤官）
日柱：辛亥
时柱：甲午（正财）";
        assert_eq!(expected, digest(&beijing()));
    }

    #[test]
    fn prompt_wraps_digest() {
        let chart = beijing();
        let prompt = ReportSection::Career.prompt(&chart);
        assert!(prompt.starts_with("请根据以下八字命盘给出事业运势分析：\n\n命主：李四"));
        assert!(prompt.ends_with("时柱：甲午（正财）"));
    }

    #[test]
    fn section_keys() {
        for s in ReportSection::ALL {
            assert_eq!(Some(s), ReportSection::from_key(s.key()));
        }
        assert_eq!(None, ReportSection::from_key("analysis"));
        assert_eq!("\"relationship\"", serde_json::to_string(&ReportSection::Relationship).unwrap());
    }

    struct Echo(usize);

    impl Narrator for Echo {
        type Error = String;

        fn narrate(&mut self, section: ReportSection, prompt: &str) -> Result<String, String> {
            self.0 += 1;
            if section == ReportSection::Yearly {
                return Err("quota".into());
            }
            Ok(format!("{}:{}", section.title(), prompt.lines().count()))
        }
    }

    #[test]
    fn narrate_sections() {
        let chart = beijing();
        let mut echo = Echo(0);
        let texts = narrate_all(&chart, &ReportSection::ALL[..3], &mut echo).unwrap();
        assert_eq!(3, texts.len());
        assert_eq!("事业运势:12", texts["career"]);

        let mut echo = Echo(0);
        let err = narrate_all(&chart, &ReportSection::ALL, &mut echo).unwrap_err();
        assert_eq!("quota", err);
        assert_eq!(9, echo.0);
    }
}
