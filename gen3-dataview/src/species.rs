pub const NUM_NATIONAL: u16 = 386;

const REGIONAL_INTERNAL_START: u16 = 277;
const REGIONAL_INTERNAL_END: u16 = 411;

/// National Dex numbers of internal ids 277..=411, in internal order.
#[rustfmt::skip]
static REGIONAL_INTERNAL_TO_NATIONAL: [u16; (REGIONAL_INTERNAL_END - REGIONAL_INTERNAL_START + 1) as usize] = [
    252, 253, 254, 255, 256, 257, 258, 259, 260, 261,
    262, 263, 264, 265, 266, 267, 268, 269, 270, 271,
    272, 273, 274, 275, 290, 291, 292, 276, 277, 285,
    286, 327, 278, 279, 283, 284, 320, 321, 300, 301,
    352, 343, 344, 299, 324, 302, 339, 340, 370, 341,
    342, 349, 350, 318, 319, 328, 329, 330, 296, 297,
    309, 310, 322, 323, 363, 364, 365, 331, 332, 361,
    362, 337, 338, 298, 325, 326, 311, 312, 303, 307,
    308, 333, 334, 360, 355, 356, 315, 287, 288, 289,
    316, 317, 357, 293, 294, 295, 366, 367, 368, 359,
    353, 354, 336, 335, 369, 304, 305, 306, 351, 313,
    314, 345, 346, 347, 348, 280, 281, 282, 371, 372,
    373, 374, 375, 376, 377, 378, 379, 382, 383, 384,
    380, 381, 385, 386, 358,
];

pub fn is_valid_internal(id: u16) -> bool {
    (1..=251).contains(&id) || (REGIONAL_INTERNAL_START..=REGIONAL_INTERNAL_END).contains(&id)
}

pub fn internal_to_national(id: u16) -> Option<u16> {
    match id {
        1..=251 => Some(id),
        REGIONAL_INTERNAL_START..=REGIONAL_INTERNAL_END => {
            Some(REGIONAL_INTERNAL_TO_NATIONAL[(id - REGIONAL_INTERNAL_START) as usize])
        }
        _ => None,
    }
}

pub fn national_to_internal(national: u16) -> Option<u16> {
    match national {
        1..=251 => Some(national),
        252..=NUM_NATIONAL => REGIONAL_INTERNAL_TO_NATIONAL
            .iter()
            .position(|n| *n == national)
            .map(|i| i as u16 + REGIONAL_INTERNAL_START),
        _ => None,
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash, serde::Serialize, serde::Deserialize)]
pub enum GrowthRate {
    Erratic,
    Fast,
    MediumFast,
    MediumSlow,
    Slow,
    Fluctuating,
}

const ERR: GrowthRate = GrowthRate::Erratic;
const FST: GrowthRate = GrowthRate::Fast;
const MFS: GrowthRate = GrowthRate::MediumFast;
const MSL: GrowthRate = GrowthRate::MediumSlow;
const SLW: GrowthRate = GrowthRate::Slow;

#[rustfmt::skip]
static GROWTH_RATES: [GrowthRate; NUM_NATIONAL as usize] = [
    MSL, MSL, MSL, MSL, MSL, MSL, MSL, MSL, MSL, MFS, // 1-10
    MFS, MFS, MFS, MFS, MFS, MSL, MSL, MSL, MFS, MFS, // 11-20
    MFS, MFS, MFS, MFS, MFS, MFS, MFS, MFS, MSL, MSL, // 21-30
    MSL, MSL, MSL, MSL, FST, FST, MFS, MFS, FST, FST, // 31-40
    MFS, MFS, MSL, MSL, MSL, MFS, MFS, MFS, MFS, MFS, // 41-50
    MFS, MFS, MFS, MFS, MFS, MFS, MFS, SLW, SLW, FST, // 51-60
    MSL, MSL, MSL, MSL, MSL, MSL, MSL, MSL, MSL, MSL, // 61-70
    MSL, SLW, SLW, MSL, MSL, MSL, MFS, MFS, MFS, MFS, // 71-80
    MFS, MFS, MFS, MFS, MFS, MFS, MFS, MFS, MFS, SLW, // 81-90
    SLW, MSL, MSL, MSL, MFS, MFS, MFS, MFS, MFS, MFS, // 91-100
    MFS, SLW, SLW, MFS, MFS, MFS, MFS, MFS, MFS, MFS, // 101-110
    SLW, SLW, FST, MFS, MFS, MFS, MFS, MFS, MFS, SLW, // 111-120
    SLW, MFS, MFS, MFS, MFS, MFS, SLW, SLW, SLW, SLW, // 121-130
    SLW, MFS, MFS, MFS, MFS, MFS, MFS, MFS, MFS, MFS, // 131-140
    MFS, SLW, SLW, SLW, SLW, SLW, SLW, SLW, SLW, SLW, // 141-150
    MSL, MSL, MSL, MSL, MSL, MSL, MSL, MSL, MSL, MSL, // 151-160
    MFS, MFS, MFS, MFS, FST, FST, FST, FST, MFS, SLW, // 161-170
    SLW, MFS, FST, FST, FST, FST, MFS, MFS, MSL, MSL, // 171-180
    MSL, MSL, FST, FST, MFS, MSL, MSL, MSL, MSL, FST, // 181-190
    MSL, MSL, MFS, MFS, MFS, MFS, MFS, MSL, MFS, FST, // 191-200
    MFS, MFS, MFS, MFS, MFS, MFS, MSL, MFS, FST, FST, // 201-210
    MFS, MFS, MSL, SLW, MSL, MFS, MFS, MFS, MFS, SLW, // 211-220
    SLW, FST, MFS, MFS, FST, SLW, SLW, SLW, SLW, MFS, // 221-230
    MFS, MFS, MFS, SLW, FST, MFS, MFS, MFS, MFS, MFS, // 231-240
    SLW, FST, SLW, SLW, SLW, SLW, SLW, SLW, SLW, SLW, // 241-250
    MSL, MSL, MSL, MSL, MSL, MSL, MSL, MSL, MSL, MSL, // 251-260
    MFS, MFS, MFS, MFS, MFS, MFS, MFS, MFS, MFS, MSL, // 261-270
    MSL, MSL, MSL, MSL, MSL, MSL, MSL, MFS, MFS, SLW, // 271-280
    SLW, SLW, MFS, MFS, ERR, ERR, SLW, SLW, SLW, ERR, // 281-290
    ERR, ERR, MSL, MSL, MSL, ERR, ERR, FST, MFS, FST, // 291-300
    FST, MSL, FST, SLW, SLW, SLW, MFS, MFS, SLW, SLW, // 301-310
    MFS, MFS, ERR, ERR, MSL, ERR, ERR, SLW, SLW, ERR, // 311-320
    ERR, MFS, MFS, MFS, FST, FST, FST, MSL, MSL, MSL, // 321-330
    MSL, MSL, ERR, ERR, ERR, ERR, FST, FST, MFS, MFS, // 331-340
    ERR, ERR, MFS, MFS, ERR, ERR, ERR, ERR, ERR, ERR, // 341-350
    MFS, MSL, FST, FST, FST, FST, SLW, FST, MSL, MFS, // 351-360
    MFS, MFS, MSL, MSL, MSL, ERR, ERR, ERR, SLW, FST, // 361-370
    SLW, SLW, SLW, SLW, SLW, SLW, SLW, SLW, SLW, SLW, // 371-380
    SLW, SLW, SLW, SLW, SLW, SLW, // 381-386
];

pub fn growth_rate(national: u16) -> GrowthRate {
    national
        .checked_sub(1)
        .and_then(|i| GROWTH_RATES.get(i as usize))
        .copied()
        .unwrap_or(GrowthRate::MediumFast)
}

impl GrowthRate {
    /// Total experience needed to reach `level`.
    pub fn experience_for_level(self, level: u8) -> u32 {
        let n = level.clamp(1, 100) as i64;
        if n == 1 {
            return 0;
        }
        let cube = n * n * n;
        let exp = match self {
            GrowthRate::Fast => cube * 4 / 5,
            GrowthRate::MediumFast => cube,
            GrowthRate::MediumSlow => cube * 6 / 5 - 15 * n * n + 100 * n - 140,
            GrowthRate::Slow => cube * 5 / 4,
            GrowthRate::Erratic => match n {
                i64::MIN..=50 => cube * (100 - n) / 50,
                51..=68 => cube * (150 - n) / 100,
                69..=98 => cube * ((1911 - 10 * n) / 3) / 500,
                _ => cube * (160 - n) / 100,
            },
            GrowthRate::Fluctuating => match n {
                i64::MIN..=15 => cube * ((n + 1) / 3 + 24) / 50,
                16..=36 => cube * (n + 14) / 50,
                _ => cube * (n / 2 + 32) / 50,
            },
        };
        exp.max(0) as u32
    }

    pub fn level_for_experience(self, experience: u32) -> u8 {
        (2..=100)
            .take_while(|level| self.experience_for_level(*level) <= experience)
            .last()
            .unwrap_or(1)
    }
}

#[rustfmt::skip]
pub static NATURE_NAMES: [&str; 25] = [
    "Hardy", "Lonely", "Brave", "Adamant", "Naughty",
    "Bold", "Docile", "Relaxed", "Impish", "Lax",
    "Timid", "Hasty", "Serious", "Jolly", "Naive",
    "Modest", "Mild", "Quiet", "Bashful", "Rash",
    "Calm", "Gentle", "Sassy", "Careful", "Quirky",
];

pub fn nature(personality: u32) -> u8 {
    (personality % 25) as u8
}

/// Stats a nature can raise or lower. HP is never affected.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash, serde::Serialize, serde::Deserialize)]
pub enum Stat {
    Attack,
    Defense,
    Speed,
    SpAttack,
    SpDefense,
}

impl Stat {
    const NATURE_ORDER: [Stat; 5] = [Stat::Attack, Stat::Defense, Stat::Speed, Stat::SpAttack, Stat::SpDefense];
}

/// The `(raised, lowered)` stats of `nature`, or `None` for the five neutral natures and
/// out-of-range values.
pub fn nature_modifiers(nature: u8) -> Option<(Stat, Stat)> {
    if nature >= 25 {
        return None;
    }

    let raised = Stat::NATURE_ORDER[(nature / 5) as usize];
    let lowered = Stat::NATURE_ORDER[(nature % 5) as usize];
    if raised == lowered {
        return None;
    }
    Some((raised, lowered))
}
