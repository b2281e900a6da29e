//! 神煞
//!
//! 每種神煞各有一張查找表，依日干、年支或月支查出應驗的地支（天德、月德另含天干），
//! 四柱中凡相符者即在該柱記一次。同一柱可帶多種神煞，同一神煞也可見於多柱。

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use super::Position;
use crate::chinese::{Branch, GanZhi, Stem};

/// 神煞種類，按排查次序排列。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum DeityKind {
    /// 天乙貴人
    TianYi,
    /// 文昌貴人
    WenChang,
    /// 桃花
    TaoHua,
    /// 驛馬
    YiMa,
    /// 華蓋
    HuaGai,
    /// 將星
    JiangXing,
    /// 羊刃
    YangRen,
    /// 亡神
    WangShen,
    /// 劫煞
    JieSha,
    /// 災煞
    ZaiSha,
    /// 天德貴人
    TianDe,
    /// 月德貴人
    YueDe,
    /// 福星貴人
    FuXing,
    /// 太極貴人
    TaiJi,
    /// 紅鸞
    HongLuan,
    /// 天喜
    TianXi,
    /// 孤辰
    GuChen,
    /// 寡宿
    GuaSu,
}

impl DeityKind {
    pub const ALL: [DeityKind; 18] = {
        use DeityKind::*;
        [
            TianYi, WenChang, TaoHua, YiMa, HuaGai, JiangXing, YangRen, WangShen, JieSha, ZaiSha,
            TianDe, YueDe, FuXing, TaiJi, HongLuan, TianXi, GuChen, GuaSu,
        ]
    };

    pub fn name(self) -> &'static str {
        use DeityKind::*;
        match self {
            TianYi => "天乙贵人",
            WenChang => "文昌贵人",
            TaoHua => "桃花",
            YiMa => "驿马",
            HuaGai => "华盖",
            JiangXing => "将星",
            YangRen => "羊刃",
            WangShen => "亡神",
            JieSha => "劫煞",
            ZaiSha => "灾煞",
            TianDe => "天德贵人",
            YueDe => "月德贵人",
            FuXing => "福星贵人",
            TaiJi => "太极贵人",
            HongLuan => "红鸾",
            TianXi => "天喜",
            GuChen => "孤辰",
            GuaSu => "寡宿",
        }
    }

    pub fn influence(self) -> Influence {
        use DeityKind::*;
        match self {
            TianYi | WenChang | JiangXing | TianDe | YueDe | FuXing | TaiJi | HongLuan | TianXi => {
                Influence::Auspicious
            }
            YangRen | WangShen | JieSha | ZaiSha | GuChen | GuaSu => Influence::Inauspicious,
            TaoHua | YiMa | HuaGai => Influence::Neutral,
        }
    }

    fn meaning(self) -> &'static str {
        use DeityKind::*;
        match self {
            TianYi => "贵人相助，逢凶化吉",
            WenChang => "聪明好学，文采出众",
            TaoHua => "人缘佳，异性缘好",
            YiMa => "变动、旅行、搬迁",
            HuaGai => "艺术天赋、宗教缘分、孤独",
            JiangXing => "领导才能、权威",
            YangRen => "强势、暴躁、易受伤",
            WangShen => "灾祸、官非、破财",
            JieSha => "破财、小人、意外",
            ZaiSha => "疾病、意外、灾祸",
            TianDe => "逢凶化吉，一生少灾",
            YueDe => "心性仁慈，多得福荫",
            FuXing => "福禄丰厚，衣食无忧",
            TaiJi => "悟性过人，好钻研玄学",
            HongLuan => "婚恋喜庆",
            TianXi => "喜事临门",
            GuChen => "性情孤僻，六亲缘薄",
            GuaSu => "孤独，婚姻多阻",
        }
    }
}

impl Display for DeityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

/// 吉凶
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Influence {
    Auspicious,
    Inauspicious,
    Neutral,
}

impl Influence {
    pub fn name(self) -> &'static str {
        match self {
            Self::Auspicious => "吉",
            Self::Inauspicious => "凶",
            Self::Neutral => "平",
        }
    }
}

/// 命盤上的一個神煞。
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Deity {
    pub kind: DeityKind,
    pub description: String,
    pub influence: Influence,
    pub position: Position,
}

impl Deity {
    pub fn new(kind: DeityKind, position: Position) -> Self {
        Self {
            kind,
            description: format!("{}出现在{}柱，主{}", kind.name(), position.name(), kind.meaning()),
            influence: kind.influence(),
            position,
        }
    }
}

/// 三合局之首（申子辰 → 申，寅午戌 → 寅，巳酉丑 → 巳，亥卯未 → 亥），用於以年支查的神煞。
fn triad(b: Branch) -> usize {
    use Branch::*;
    match b {
        Shen | Zi | Chen => 0,
        Yin | Wu | Xu => 1,
        Si | You | Chou => 2,
        Hai | Mao | Wei => 3,
    }
}

/// 依三合局排列的表，次序同 [`triad`]。
fn by_triad(kind: DeityKind) -> Option<[Branch; 4]> {
    use Branch::*;
    use DeityKind::*;
    Some(match kind {
        TaoHua => [You, Mao, Wu, Zi],
        YiMa => [Yin, Shen, Hai, Si],
        HuaGai => [Chen, Xu, Chou, Wei],
        JiangXing => [Zi, Wu, You, Mao],
        WangShen => [Hai, Si, Shen, Yin],
        JieSha => [Si, Hai, Yin, Shen],
        ZaiSha => [Wu, Zi, Mao, You],
        _ => return None,
    })
}

/// 以日干查的神煞所應的地支。
fn by_day_master(kind: DeityKind, dm: Stem) -> &'static [Branch] {
    use crate::chinese::Branch as B;
    use DeityKind::*;
    use Stem::*;
    match (kind, dm) {
        (TianYi, Jia | Wu | Geng) => &[B::Chou, B::Wei],
        (TianYi, Yi | Ji) => &[B::Zi, B::Shen],
        (TianYi, Bing | Ding) => &[B::Hai, B::You],
        (TianYi, Ren | Gui) => &[B::Mao, B::Si],
        (TianYi, Xin) => &[B::Wu, B::Yin],

        (WenChang, Jia) => &[B::Si],
        (WenChang, Yi) => &[B::Wu],
        (WenChang, Bing | Wu) => &[B::Shen],
        (WenChang, Ding | Ji) => &[B::You],
        (WenChang, Geng) => &[B::Hai],
        (WenChang, Xin) => &[B::Zi],
        (WenChang, Ren) => &[B::Yin],
        (WenChang, Gui) => &[B::Mao],

        (YangRen, Jia) => &[B::Mao],
        (YangRen, Bing | Wu) => &[B::Wu],
        (YangRen, Geng) => &[B::You],
        (YangRen, Ren) => &[B::Zi],
        (YangRen, Yi) => &[B::Yin],
        (YangRen, Ding | Ji) => &[B::Si],
        (YangRen, Xin) => &[B::Shen],
        (YangRen, Gui) => &[B::Hai],

        (FuXing, Jia | Bing) => &[B::Yin, B::Zi],
        (FuXing, Yi | Gui) => &[B::Chou, B::Mao],
        (FuXing, Wu) => &[B::Shen],
        (FuXing, Ji) => &[B::Wei],
        (FuXing, Ding) => &[B::Hai],
        (FuXing, Geng) => &[B::Wu],
        (FuXing, Xin) => &[B::Si],
        (FuXing, Ren) => &[B::Chen],

        (TaiJi, Jia | Yi) => &[B::Zi, B::Wu],
        (TaiJi, Bing | Ding) => &[B::Mao, B::You],
        (TaiJi, Wu | Ji) => &[B::Chen, B::Xu, B::Chou, B::Wei],
        (TaiJi, Geng | Xin) => &[B::Yin, B::Hai],
        (TaiJi, Ren | Gui) => &[B::Si, B::Shen],

        _ => &[],
    }
}

/// 以年支查的其餘神煞所應的地支。
fn by_year_branch(kind: DeityKind, yb: Branch) -> Vec<Branch> {
    use Branch::*;
    use DeityKind::*;
    if let Some(table) = by_triad(kind) {
        return vec![table[triad(yb)]];
    }
    // 紅鸞：子年卯、丑年寅……逆行；天喜與之相沖
    let hong_luan = Branch::from_index(15 - yb.index());
    // 孤辰寡宿按方局：亥子丑、寅卯辰、巳午未、申酉戌
    let season = (yb.index() + 1) % 12 / 3;
    match kind {
        HongLuan => vec![hong_luan],
        TianXi => vec![hong_luan.opposite()],
        GuChen => vec![[Yin, Si, Shen, Hai][season]],
        GuaSu => vec![[Xu, Chou, Chen, Wei][season]],
        _ => Vec::new(),
    }
}

/// 天德：以月支查，所應為天干或地支。
enum Mark {
    Stem(Stem),
    Branch(Branch),
}

fn tian_de(month: Branch) -> Mark {
    use Branch::*;
    match month {
        Yin => Mark::Stem(Stem::Ding),
        Mao => Mark::Branch(Shen),
        Chen => Mark::Stem(Stem::Ren),
        Si => Mark::Stem(Stem::Xin),
        Wu => Mark::Branch(Hai),
        Wei => Mark::Stem(Stem::Jia),
        Shen => Mark::Stem(Stem::Gui),
        You => Mark::Branch(Yin),
        Xu => Mark::Stem(Stem::Bing),
        Hai => Mark::Stem(Stem::Yi),
        Zi => Mark::Branch(Si),
        Chou => Mark::Stem(Stem::Geng),
    }
}

/// 月德：寅午戌月丙，申子辰月壬，亥卯未月甲，巳酉丑月庚。
fn yue_de(month: Branch) -> Stem {
    [Stem::Ren, Stem::Bing, Stem::Geng, Stem::Jia][triad(month)]
}

fn applies(kind: DeityKind, dm: Stem, yb: Branch, mb: Branch, pillar: GanZhi) -> bool {
    use DeityKind::*;
    match kind {
        TianYi | WenChang | YangRen | FuXing | TaiJi => {
            by_day_master(kind, dm).contains(&pillar.branch)
        }
        TianDe => match tian_de(mb) {
            Mark::Stem(s) => pillar.stem == s,
            Mark::Branch(b) => pillar.branch == b,
        },
        YueDe => pillar.stem == yue_de(mb),
        _ => by_year_branch(kind, yb).contains(&pillar.branch),
    }
}

/// 排查四柱（年、月、日、時）的全部神煞，按種類次序、再按柱序輸出，不去重。
///
/// # 用例
///
/// ```
/// use sizhu::bazi::{deity, DeityKind, Position};
/// use sizhu::chinese::{GanZhi, Stem};
///
/// // 甲日主，日柱甲午、月柱乙丑
/// let pillars = [56, 1, 30, 12].map(GanZhi::from_index);
/// let found = deity::all_deities(Stem::Jia, pillars[0].branch, &pillars);
/// assert!(found.iter().any(|d| d.kind == DeityKind::TianYi && d.position == Position::Month));
/// ```
pub fn all_deities(day_master: Stem, year_branch: Branch, pillars: &[GanZhi; 4]) -> Vec<Deity> {
    let month_branch = pillars[1].branch;
    DeityKind::ALL
        .iter()
        .flat_map(|&kind| {
            Position::PILLARS
                .iter()
                .zip(pillars)
                .filter(move |(_, gz)| applies(kind, day_master, year_branch, month_branch, **gz))
                .map(move |(&pos, _)| Deity::new(kind, pos))
        })
        .collect()
}

/// 吉、凶、平各自的數目。
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    pub auspicious: usize,
    pub inauspicious: usize,
    pub neutral: usize,
}

pub fn tally(deities: &[Deity]) -> Tally {
    let mut t = Tally::default();
    for d in deities {
        match d.influence {
            Influence::Auspicious => t.auspicious += 1,
            Influence::Inauspicious => t.inauspicious += 1,
            Influence::Neutral => t.neutral += 1,
        }
    }
    t
}

/// 一句話概括神煞，如「命带3个神煞：吉神2个（天乙贵人、文昌贵人），中性神煞1个」。
pub fn summary(deities: &[Deity]) -> String {
    let t = tally(deities);
    let names = |inf: Influence| {
        deities
            .iter()
            .filter(|d| d.influence == inf)
            .map(|d| d.kind.name())
            .collect::<Vec<_>>()
            .join("、")
    };
    let mut parts = Vec::new();
    if t.auspicious > 0 {
        parts.push(format!("吉神{}个（{}）", t.auspicious, names(Influence::Auspicious)));
    }
    if t.inauspicious > 0 {
        parts.push(format!("凶煞{}个（{}）", t.inauspicious, names(Influence::Inauspicious)));
    }
    if t.neutral > 0 {
        parts.push(format!("中性神煞{}个", t.neutral));
    }
    format!("命带{}个神煞：{}", deities.len(), parts.join("，"))
}
