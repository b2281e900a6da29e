//! 黃曆
//!
//! Note: 為方便處理諸多術語，本模塊文檔用中文。
//!
//! 逐日查表所得的宜忌信息：值日星宿、建除十二神、納音、沖煞、胎神、彭祖百忌，以及十二時辰吉凶。
//! 各項均只取決於日期（或由日期推得的日干支與月支）。
//!
//! 當日吉神、凶神以日期簡單散列選取，並非依傳統神煞規則推算，僅作占位。
//!
//! # 用例
//!
//! ```
//! use sizhu::Date;
//! use sizhu::huangli::Almanac;
//!
//! let almanac = Almanac::for_date(Date::from_gregorian(2024, 2, 10).unwrap()).unwrap();
//! assert_eq!("甲辰", almanac.day.to_string());
//! assert_eq!("满", almanac.officer.name());
//! assert_eq!("覆灯火", almanac.nayin);
//! assert_eq!("冲狗", almanac.conflict);
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Serialize;
use tracing::debug;

use crate::bazi::{Influence, SUPPORTED_YEARS, hour_pillars};
use crate::chinese::ephemeris::{self, SolarTerm};
use crate::chinese::lunar::LunarDate;
use crate::chinese::{Branch, GanZhi, Stem};
use crate::date::Date;
use crate::error::{Error, Result};
use crate::time_scales::Civil;

/// 二十八宿，東方青龍起，北方玄武、西方白虎、南方朱雀依次。
const MANSIONS: [(&str, Influence); 28] = {
    use Influence::{Auspicious as J, Inauspicious as X};
    [
        ("角", J), ("亢", X), ("氐", X), ("房", J), ("心", X), ("尾", J), ("箕", J),
        ("斗", J), ("牛", X), ("女", X), ("虚", X), ("危", X), ("室", J), ("壁", J),
        ("奎", X), ("娄", J), ("胃", J), ("昴", X), ("毕", J), ("觜", X), ("参", J),
        ("井", J), ("鬼", X), ("柳", X), ("星", X), ("张", J), ("翼", X), ("轸", J),
    ]
};

/// 值日星宿。2000-01-01 為角宿，逐日輪轉。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
pub struct Mansion {
    pub name: &'static str,
    pub fortune: Influence,
}

impl Mansion {
    pub fn for_date(date: Date) -> Self {
        let epoch = Date::from_jdn(2451545);
        let (name, fortune) = MANSIONS[(date - epoch).rem_euclid(28) as usize];
        Self { name, fortune }
    }
}

/// 建除十二神。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
pub enum Officer {
    Jian,
    Chu,
    Man,
    Ping,
    Ding,
    Zhi,
    Po,
    Wei,
    Cheng,
    Shou,
    Kai,
    Bi,
}

struct OfficerAdvice {
    name: &'static str,
    suitable: &'static [&'static str],
    avoid: &'static [&'static str],
}

const OFFICERS: [OfficerAdvice; 12] = [
    OfficerAdvice {
        name: "建",
        suitable: &["出行", "上任", "会友", "上书", "见工"],
        avoid: &["动土", "开仓", "嫁娶", "纳采"],
    },
    OfficerAdvice {
        name: "除",
        suitable: &["除服", "疗病", "出行", "拆卸", "入宅"],
        avoid: &["求官", "上任", "嫁娶"],
    },
    OfficerAdvice {
        name: "满",
        suitable: &["祈福", "祭祀", "结亲", "开市", "交易"],
        avoid: &["服药", "求医", "栽种", "下葬"],
    },
    OfficerAdvice {
        name: "平",
        suitable: &["祭祀", "修填", "涂泥", "余事勿取"],
        avoid: &["诸事不宜"],
    },
    OfficerAdvice {
        name: "定",
        suitable: &["祭祀", "祈福", "订盟", "纳采", "冠笄"],
        avoid: &["诉讼", "出行", "安葬"],
    },
    OfficerAdvice {
        name: "执",
        suitable: &["祭祀", "祈福", "求医", "捕捉", "畋猎"],
        avoid: &["移徙", "出行", "嫁娶"],
    },
    OfficerAdvice {
        name: "破",
        suitable: &["破屋", "坏垣", "求医", "治病"],
        avoid: &["诸事不宜"],
    },
    OfficerAdvice {
        name: "危",
        suitable: &["安床", "经络", "酝酿", "造仓"],
        avoid: &["登高", "出行", "乘船"],
    },
    OfficerAdvice {
        name: "成",
        suitable: &["开市", "交易", "纳财", "开仓", "出货"],
        avoid: &["诉讼", "安葬"],
    },
    OfficerAdvice {
        name: "收",
        suitable: &["祭祀", "求财", "签约", "嫁娶", "订盟"],
        avoid: &["开市", "安葬", "动土"],
    },
    OfficerAdvice {
        name: "开",
        suitable: &["开市", "交易", "求财", "见贵", "嫁娶"],
        avoid: &["安葬", "修坟"],
    },
    OfficerAdvice {
        name: "闭",
        suitable: &["祭祀", "祈福", "筑堤", "埋葬", "余事勿取"],
        avoid: &["开市", "出行", "求财"],
    },
];

impl Officer {
    pub const ALL: [Officer; 12] = {
        use Officer::*;
        [Jian, Chu, Man, Ping, Ding, Zhi, Po, Wei, Cheng, Shou, Kai, Bi]
    };

    /// 月建之日為建，其後逐日順行。
    ///
    /// # 用例
    ///
    /// ```
    /// use sizhu::chinese::Branch;
    /// use sizhu::huangli::Officer;
    ///
    /// assert_eq!(Officer::Jian, Officer::of(Branch::Yin, Branch::Yin));
    /// assert_eq!(Officer::Bi, Officer::of(Branch::Yin, Branch::Chou));
    /// ```
    pub fn of(month_branch: Branch, day_branch: Branch) -> Self {
        let diff = day_branch.month_offset() + 12 - month_branch.month_offset();
        Self::ALL[diff % 12]
    }
    fn advice(self) -> &'static OfficerAdvice {
        &OFFICERS[self as usize]
    }
    pub fn name(self) -> &'static str {
        self.advice().name
    }
    pub fn suitable(self) -> &'static [&'static str] {
        self.advice().suitable
    }
    pub fn avoid(self) -> &'static [&'static str] {
        self.advice().avoid
    }
}

impl Display for Officer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

/// 六十甲子納音，按天干分組，組內地支依次遞進兩位。
const NAYIN: [&str; 60] = [
    "海中金", "大溪水", "覆灯火", "沙中金", "泉中水", "山头火", // 甲
    "海中金", "大溪水", "覆灯火", "沙中金", "泉中水", "山头火", // 乙
    "涧下水", "炉中火", "沙中土", "天河水", "山下火", "屋上土", // 丙
    "涧下水", "炉中火", "沙中土", "天河水", "山下火", "屋上土", // 丁
    "霹雳火", "城头土", "大林木", "天上火", "大驿土", "平地木", // 戊
    "霹雳火", "城头土", "大林木", "天上火", "大驿土", "平地木", // 己
    "壁上土", "松柏木", "白蜡金", "路旁土", "石榴木", "钗钏金", // 庚
    "壁上土", "松柏木", "白蜡金", "路旁土", "石榴木", "钗钏金", // 辛
    "桑柘木", "金箔金", "长流水", "杨柳木", "剑锋金", "大海水", // 壬
    "桑柘木", "金箔金", "长流水", "杨柳木", "剑锋金", "大海水", // 癸
];

/// 干支的納音。
///
/// # 用例
///
/// ```
/// use sizhu::chinese::GanZhi;
/// use sizhu::huangli::nayin;
///
/// assert_eq!("海中金", nayin(GanZhi::from_index(0)));
/// assert_eq!("大海水", nayin(GanZhi::from_index(59)));
/// ```
pub fn nayin(gz: GanZhi) -> &'static str {
    NAYIN[gz.stem_major_index()]
}

/// 胎神占方，按六十甲子次序。
const FETAL_GOD: [&str; 60] = [
    "占门碓外东南", "碓磨厕外东南", "厨灶炉外正南", "仓库门外正南", "房床栖外正南",
    "占房床外正南", "占碓磨外正南", "厨灶厕外西南", "仓库炉外西南", "房床门外西南",
    "门鸡栖外西南", "碓磨床外西南", "厨灶碓外正西", "仓库厕外正西", "房床炉外正西",
    "占大门外西北", "碓磨栖外西北", "厨灶床外西北", "仓库碓外西北", "房床厕外西北",
    "占房炉外正北", "碓磨门外正北", "厨灶栖外正北", "仓库床外正北", "房床碓外正北",
    "占门厕外东北", "碓磨炉外东北", "厨灶门外东北", "仓库栖外东北", "房床床外东北",
    "占房碓外正东", "碓磨厕外正东", "厨灶炉外正东", "仓库门外正东", "房床栖外正东",
    "占门床外东南", "碓磨碓外东南", "厨灶厕外东南", "仓库炉外东南", "房床门外东南",
    "占房栖外正南", "碓磨床外正南", "厨灶碓外正南", "仓库厕外正南", "房床炉外正南",
    "占大门外西南", "碓磨栖外西南", "厨灶床外西南", "仓库碓外西南", "房床厕外西南",
    "占房炉外正西", "碓磨门外正西", "厨灶栖外正西", "仓库床外正西", "房床碓外正西",
    "占门厕外西北", "碓磨炉外西北", "厨灶门外西北", "仓库栖外西北", "房床床外西北",
];

pub fn fetal_god(day: GanZhi) -> &'static str {
    FETAL_GOD[day.index()]
}

const PENGZU_STEM: [&str; 10] = [
    "甲不开仓财物耗散",
    "乙不栽植千株不长",
    "丙不修灶必见灾殃",
    "丁不剃头头必生疮",
    "戊不受田田主不祥",
    "己不破券二比并亡",
    "庚不经络织机虚张",
    "辛不合酱主人不尝",
    "壬不汲水更难提防",
    "癸不词讼理弱敌强",
];

const PENGZU_BRANCH: [&str; 12] = [
    "子不问卜自惹祸殃",
    "丑不冠带主不还乡",
    "寅不祭祀神鬼不尝",
    "卯不穿井水泉不香",
    "辰不哭泣必主重丧",
    "巳不远行财物伏藏",
    "午不苫盖屋主更张",
    "未不服药毒气入肠",
    "申不安床鬼祟入房",
    "酉不会客醉坐颠狂",
    "戌不吃犬作怪上床",
    "亥不嫁娶不利新郎",
];

/// 彭祖百忌：日干一句，日支一句。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
pub struct Pengzu {
    pub stem: &'static str,
    pub branch: &'static str,
}

impl Pengzu {
    pub fn of(stem: Stem, branch: Branch) -> Self {
        Self {
            stem: PENGZU_STEM[stem.index()],
            branch: PENGZU_BRANCH[branch.index()],
        }
    }
}

impl Display for Pengzu {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} {}", self.stem, self.branch)
    }
}

/// 沖：六沖之支的生肖，如子日「冲马」。
pub fn conflict(day_branch: Branch) -> String {
    format!("冲{}", day_branch.opposite().zodiac())
}

/// 煞方：申子辰煞南，亥卯未煞西，寅午戌煞北，巳酉丑煞東。
pub fn sha(day_branch: Branch) -> String {
    const DIRECTIONS: [&str; 4] = ["南", "东", "北", "西"];
    format!("煞{}", DIRECTIONS[day_branch.index() % 4])
}

const AUSPICIOUS_GODS: [&str; 40] = [
    "天德", "月德", "天德合", "月德合", "天赦", "天愿", "月恩", "四相", "时德", "民日",
    "三合", "临日", "天马", "时阳", "生气", "益后", "青龙", "明堂", "金匮", "天喜",
    "福生", "续世", "阳德", "阴德", "司命", "鸣吠", "鸣吠对", "母仓", "不将", "五富",
    "圣心", "普护", "六仪", "玉宇", "解神", "驿马", "天后", "天巫", "月空", "敬安",
];

const INAUSPICIOUS_GODS: [&str; 40] = [
    "月破", "大耗", "灾煞", "天火", "厌对", "招摇", "血忌", "天贼", "五虚", "土符",
    "归忌", "血支", "游祸", "重日", "天牢", "往亡", "月煞", "月虚", "四击", "九空",
    "天刑", "天吏", "致死", "五墓", "白虎", "大煞", "劫煞", "地囊", "天狗", "土瘟",
    "刀砧", "河魁", "往亡", "死神", "孤辰", "寡宿", "勾陈", "元武", "朱雀", "螣蛇",
];

/// 當日神煞之一及其釋義。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
pub struct DayGod {
    pub name: &'static str,
    pub description: &'static str,
}

impl DayGod {
    fn auspicious(name: &'static str) -> Self {
        let description = match name {
            "天德" => "上天之德，百事皆宜",
            "月德" => "月亮之德，逢凶化吉",
            "天赦" => "上天赦免，消灾解厄",
            "天愿" => "天遂人愿，心想事成",
            "三合" => "三方和合，贵人相助",
            "青龙" => "吉神之首，万事大吉",
            "明堂" => "光明正大，公正无私",
            "金匮" => "财富丰盈，聚财纳福",
            "天喜" => "喜庆之神，婚姻美满",
            "生气" => "生机勃勃，活力充沛",
            _ => "吉祥之神，宜进行各种活动",
        };
        Self { name, description }
    }

    fn inauspicious(name: &'static str) -> Self {
        let description = match name {
            "月破" => "月亮破损，诸事不宜",
            "大耗" => "大耗钱财，破财之兆",
            "灾煞" => "灾祸降临，小心意外",
            "血忌" => "忌见血光，手术不宜",
            "白虎" => "凶神之首，主伤灾病",
            "天狗" => "天狗食日，易生口舌",
            "劫煞" => "劫财之煞，防偷防盗",
            "死神" => "死亡之神，疾病凶险",
            "勾陈" => "纠缠不清，官司是非",
            _ => "凶煞之神，需谨慎避让",
        };
        Self { name, description }
    }
}

/// 以 `seed` 的倍數在表中取 `count` 項，去重後保持取出次序。
fn pick(table: &'static [&'static str], seed: usize, count: usize) -> Vec<&'static str> {
    let mut picked = Vec::with_capacity(count);
    for i in 1..=count {
        let name = table[seed * i % table.len()];
        if !picked.contains(&name) {
            picked.push(name);
        }
    }
    picked
}

/// 散列種子：日 + 月序（一月為 0）× 31。
fn god_seed(date: Date) -> usize {
    let (_, month, day) = date.gregorian();
    (day + (month - 1) * 31) as usize
}

/// 當日吉神（占位算法）。
pub fn auspicious_gods(date: Date) -> Vec<DayGod> {
    let seed = god_seed(date);
    pick(&AUSPICIOUS_GODS, seed, 3 + seed % 3)
        .into_iter()
        .map(DayGod::auspicious)
        .collect()
}

/// 當日凶神（占位算法）。
pub fn inauspicious_gods(date: Date) -> Vec<DayGod> {
    let seed = god_seed(date) + 7;
    pick(&INAUSPICIOUS_GODS, seed, 2 + seed % 3)
        .into_iter()
        .map(DayGod::inauspicious)
        .collect()
}

/// 時辰相對日支的吉凶：相同或相沖為凶，相隔三、四、八、九位為吉，餘為平。
pub fn hour_fortune(hour: Branch, day: Branch) -> Influence {
    match hour.index().abs_diff(day.index()) {
        0 | 6 => Influence::Inauspicious,
        3 | 4 | 8 | 9 => Influence::Auspicious,
        _ => Influence::Neutral,
    }
}

/// 時辰的值神與宜忌，不隨日期改變。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
pub struct HourDetail {
    pub star: &'static str,
    pub fortune: Influence,
    pub suitable: &'static [&'static str],
    pub avoid: &'static [&'static str],
    pub conflict: &'static str,
    pub sha: &'static str,
}

const HOUR_DETAILS: [HourDetail; 12] = {
    use Influence::{Auspicious as J, Inauspicious as X};
    const fn d(
        star: &'static str,
        fortune: Influence,
        suitable: &'static [&'static str],
        avoid: &'static [&'static str],
        conflict: &'static str,
        sha: &'static str,
    ) -> HourDetail {
        HourDetail {
            star,
            fortune,
            suitable,
            avoid,
            conflict,
            sha,
        }
    }
    [
        d("金匮", J, &["祈福", "祭祀", "酬神", "出行", "嫁娶"], &["开光", "修造", "安葬"], "冲马", "煞南"),
        d("天德", J, &["祭祀", "祈福", "斋醮", "酬神", "修造", "作灶"], &["开市", "安葬", "嫁娶"], "冲羊", "煞东"),
        d("白虎", X, &["出行", "求财", "见贵", "订婚", "嫁娶"], &["祭祀", "祈福", "斋醮", "开光"], "冲猴", "煞北"),
        d("玉堂", J, &["修造", "盖屋", "移徙", "安床", "入宅", "开市"], &["开光", "作灶", "安葬"], "冲鸡", "煞西"),
        d("天牢", X, &["祭祀", "祈福", "求嗣", "斋醮", "订婚"], &["赴任", "出行", "修造", "动土"], "冲狗", "煞南"),
        d("玄武", X, &["订婚", "嫁娶", "安床", "移徙", "入宅"], &["祭祀", "祈福", "斋醮", "开光"], "冲猪", "煞东"),
        d("司命", J, &["祭祀", "祈福", "斋醮", "酬神", "订婚", "嫁娶"], &["开光", "修造", "安葬"], "冲鼠", "煞北"),
        d("勾陈", X, &["祭祀", "祈福", "求嗣", "斋醮", "开市"], &["开光", "安床", "嫁娶"], "冲牛", "煞西"),
        d("青龙", J, &["祈福", "嫁娶", "安床", "移徙", "入宅", "开市"], &["开光", "修造", "动土"], "冲虎", "煞南"),
        d("明堂", J, &["修造", "盖屋", "移徙", "作灶", "安床", "入宅"], &["祭祀", "祈福", "开光"], "冲兔", "煞东"),
        d("天刑", X, &["祭祀", "祈福", "酬神", "求财", "见贵"], &["赴任", "出行", "修造", "动土"], "冲龙", "煞北"),
        d("朱雀", X, &["订婚", "嫁娶", "安床", "移徙", "修造"], &["祭祀", "祈福", "开光", "斋醮"], "冲蛇", "煞西"),
    ]
};

pub fn hour_detail(hour: Branch) -> &'static HourDetail {
    &HOUR_DETAILS[hour.index()]
}

/// 一日中的一個時辰。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
pub struct Hour {
    pub ganzhi: GanZhi,
    /// 起止鐘點
    pub range: (u32, u32),
    /// 相對日支的吉凶
    pub fortune: Influence,
    pub detail: &'static HourDetail,
}

/// 一日的黃曆。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Almanac {
    pub date: Date,
    /// 農曆日期。農曆表始於 1900-01-31，此前的日子為 `None`
    pub lunar: Option<LunarDate>,
    /// 當日正午所屬的年、月干支（以節氣為界）
    pub year: GanZhi,
    pub month: GanZhi,
    pub day: GanZhi,
    /// 當日交節的節氣
    pub solar_term: Option<SolarTerm>,
    pub mansion: Mansion,
    pub officer: Officer,
    pub nayin: &'static str,
    pub conflict: String,
    pub sha: String,
    pub fetal_god: &'static str,
    pub pengzu: Pengzu,
    pub auspicious_gods: Vec<DayGod>,
    pub inauspicious_gods: Vec<DayGod>,
    pub hours: [Hour; 12],
}

impl Almanac {
    /// 查一日的黃曆，支持 1900 至 2099 年。
    pub fn for_date(date: Date) -> Result<Self> {
        let year = date.gregorian().0;
        if !SUPPORTED_YEARS.contains(&year) {
            return Err(Error::OutOfRange(year));
        }
        let lunar = LunarDate::from_date(date).ok();
        let noon = Civil::from_date(date, 12, 0).ok_or(Error::OutOfRange(year))?;
        let day = GanZhi::for_day(date);
        let month = ephemeris::month_ganzhi(noon);
        let solar_term = ephemeris::term_on(noon).map(|(term, _)| term);
        debug!(%date, %day, "almanac computed");

        let hours = hour_pillars(date).map(|ganzhi| Hour {
            ganzhi,
            range: ganzhi.branch.hour_range(),
            fortune: hour_fortune(ganzhi.branch, day.branch),
            detail: hour_detail(ganzhi.branch),
        });

        Ok(Self {
            date,
            lunar,
            year: ephemeris::year_ganzhi(noon),
            month,
            day,
            solar_term,
            mansion: Mansion::for_date(date),
            officer: Officer::of(month.branch, day.branch),
            nayin: nayin(day),
            conflict: conflict(day.branch),
            sha: sha(day.branch),
            fetal_god: fetal_god(day),
            pengzu: Pengzu::of(day.stem, day.branch),
            auspicious_gods: auspicious_gods(date),
            inauspicious_gods: inauspicious_gods(date),
            hours,
        })
    }

    /// 吉時，即相對日支為吉的時辰。
    pub fn lucky_hours(&self) -> impl Iterator<Item = &Hour> {
        self.hours
            .iter()
            .filter(|h| h.fortune == Influence::Auspicious)
    }
}
