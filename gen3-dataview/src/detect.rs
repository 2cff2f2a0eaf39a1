use byteorder::ByteOrder;

use crate::layout::{self, Layout};
use crate::save::{read_u32, SectionMap};
use crate::{pokemon, species};

pub const MAX_MONEY: u32 = 999_999;
const MAX_PLAUSIBLE_EXPERIENCE: u32 = 2_000_000;

/// One piece of evidence for a layout.
#[derive(PartialEq, Eq, Debug, Clone, Copy, serde::Serialize)]
pub enum Signal {
    /// The team size at the layout's offset is 1 to 6.
    TeamSize(Layout),
    /// The first record at the layout's team offset decodes to a plausible species and experience.
    LeadRecord(Layout),
    /// The FireRed/LeafGreen version word is 0 or 1.
    FrlgGameCode,
    /// The FireRed/LeafGreen key decrypts the money field to a valid amount.
    FrlgMoney,
    /// The Ruby/Sapphire/Emerald key is zero and the money field is a valid plaintext amount.
    PlaintextMoney,
    /// The Ruby/Sapphire/Emerald key is non-zero and decrypts the money field to a valid amount.
    EncryptedMoney,
    /// The FireRed/LeafGreen rival name field looks like text. Only consulted to break a tie.
    RivalName,
}

impl Signal {
    pub fn layout(self) -> Layout {
        match self {
            Signal::TeamSize(layout) | Signal::LeadRecord(layout) => layout,
            Signal::FrlgGameCode | Signal::FrlgMoney | Signal::RivalName => Layout::FireRedLeafGreen,
            Signal::PlaintextMoney => Layout::RubySapphire,
            Signal::EncryptedMoney => Layout::Emerald,
        }
    }

    pub fn weight(self) -> u32 {
        match self {
            Signal::TeamSize(_) => 2,
            Signal::LeadRecord(_) => 3,
            Signal::FrlgGameCode | Signal::FrlgMoney | Signal::PlaintextMoney | Signal::EncryptedMoney => 2,
            Signal::RivalName => 1,
        }
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy, Default, serde::Serialize)]
pub struct Scores {
    pub frlg: u32,
    pub rs: u32,
    pub e: u32,
}

impl Scores {
    pub fn get(&self, layout: Layout) -> u32 {
        match layout {
            Layout::FireRedLeafGreen => self.frlg,
            Layout::RubySapphire => self.rs,
            Layout::Emerald => self.e,
        }
    }

    fn add(&mut self, signal: Signal) {
        let score = match signal.layout() {
            Layout::FireRedLeafGreen => &mut self.frlg,
            Layout::RubySapphire => &mut self.rs,
            Layout::Emerald => &mut self.e,
        };
        *score += signal.weight();
    }

    fn top(&self) -> u32 {
        self.frlg.max(self.rs).max(self.e)
    }

    /// The unique highest-scoring layout, or Ruby/Sapphire on any tie.
    fn winner(&self) -> Layout {
        let top = self.top();
        let mut leaders = Layout::ALL.into_iter().filter(|layout| self.get(*layout) == top);
        match (leaders.next(), leaders.next()) {
            (Some(layout), None) => layout,
            _ => Layout::RubySapphire,
        }
    }
}

#[derive(PartialEq, Eq, Debug, Clone, serde::Serialize)]
pub struct Detection {
    pub layout: Layout,
    pub scores: Scores,
    pub signals: Vec<Signal>,
}

impl Detection {
    /// The winning layout's score.
    pub fn confidence(&self) -> u32 {
        self.scores.get(self.layout)
    }

    /// How far the winning layout leads the best other layout. Zero means the tie-break decided.
    pub fn margin(&self) -> u32 {
        let runner_up = Layout::ALL
            .into_iter()
            .filter(|layout| *layout != self.layout)
            .map(|layout| self.scores.get(layout))
            .max()
            .unwrap_or(0);
        self.confidence().saturating_sub(runner_up)
    }
}

fn plausible_record(buf: &[u8], offset: usize) -> bool {
    let record = match buf.get(offset..offset + pokemon::BOX_RECORD_SIZE) {
        Some(record) => record,
        None => {
            return false;
        }
    };

    let personality = byteorder::LittleEndian::read_u32(&record[0..4]);
    if personality == 0 || personality == 0xffffffff {
        return false;
    }

    let logical = match pokemon::decrypt_payload(record) {
        Some(logical) => logical,
        None => {
            return false;
        }
    };
    let species_id = byteorder::LittleEndian::read_u16(&logical[0..2]);
    let experience = byteorder::LittleEndian::read_u32(&logical[4..8]);
    species::is_valid_internal(species_id) && experience < MAX_PLAUSIBLE_EXPERIENCE
}

fn looks_like_text(bytes: &[u8]) -> bool {
    bytes.iter().filter(|b| **b >= 0xa1).count() >= 3
}

fn collect_signals(buf: &[u8], sections: &SectionMap) -> Vec<Signal> {
    let mut signals = vec![];
    let section0 = sections.get(0);
    let section1 = sections.get(1);

    if let Some(section1) = section1 {
        // Ruby/Sapphire and Emerald share team offsets, so both collect the same team evidence.
        for layout in [Layout::FireRedLeafGreen, Layout::RubySapphire, Layout::Emerald] {
            let offsets = layout.offsets();
            let team_size = match read_u32(buf, section1 + offsets.team_size) {
                Some(team_size) => team_size,
                None => continue,
            };
            if (1..=6).contains(&team_size) {
                signals.push(Signal::TeamSize(layout));
            }
            if team_size >= 1 && plausible_record(buf, section1 + offsets.team_data) {
                signals.push(Signal::LeadRecord(layout));
            }
        }
    }

    if let Some(section0) = section0 {
        if matches!(read_u32(buf, section0 + layout::FRLG_GAME_CODE), Some(0 | 1)) {
            signals.push(Signal::FrlgGameCode);
        }
    }

    if let (Some(section0), Some(section1)) = (section0, section1) {
        let frlg = &layout::FRLG;
        if let (Some(key), Some(money)) = (
            frlg.security_key.and_then(|o| read_u32(buf, section0 + o)),
            read_u32(buf, section1 + frlg.money),
        ) {
            if key != 0 && money ^ key <= MAX_MONEY {
                signals.push(Signal::FrlgMoney);
            }
        }

        let e = &layout::E;
        if let (Some(key), Some(money)) = (
            e.security_key.and_then(|o| read_u32(buf, section0 + o)),
            read_u32(buf, section1 + e.money),
        ) {
            if key == 0 {
                if money <= MAX_MONEY {
                    signals.push(Signal::PlaintextMoney);
                }
            } else if money ^ key <= MAX_MONEY {
                signals.push(Signal::EncryptedMoney);
            }
        }
    }

    signals
}

/// Scores every layout against the save and picks the most likely one.
///
/// The rival name check runs only when FireRed/LeafGreen shares the top score. A tie that survives
/// it resolves to Ruby/Sapphire, whose inventory carries no encryption.
pub fn detect(buf: &[u8], sections: &SectionMap) -> Detection {
    let mut signals = collect_signals(buf, sections);
    let mut scores = Scores::default();
    for signal in signals.iter() {
        scores.add(*signal);
    }

    if scores.frlg == scores.top() {
        if let Some(rival) = layout::FRLG
            .rival_name
            .and_then(|o| sections.get(0).map(|s| s + o))
            .and_then(|o| buf.get(o..o + layout::RIVAL_NAME_SIZE))
        {
            if looks_like_text(rival) {
                signals.push(Signal::RivalName);
                scores.add(Signal::RivalName);
            }
        }
    }

    let layout = scores.winner();
    log::info!(
        "detected {} (FRLG={}, RS={}, E={})",
        layout,
        scores.frlg,
        scores.rs,
        scores.e
    );

    Detection {
        layout,
        scores,
        signals,
    }
}
