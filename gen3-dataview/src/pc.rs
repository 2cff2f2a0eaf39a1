use crate::pokemon::{self, PokemonRecord};
use crate::save::{SectionMap, SECTION_SIZES};

pub const NUM_BOXES: usize = 14;
pub const BOX_SIZE: usize = 30;
pub const NUM_SLOTS: usize = NUM_BOXES * BOX_SIZE;

pub const FIRST_SECTION: u16 = 5;
pub const LAST_SECTION: u16 = 13;

const CURSOR_SIZE: usize = 4;

#[derive(PartialEq, Eq, Debug, Clone, serde::Serialize)]
pub struct BoxedPokemon {
    /// 1-indexed.
    pub box_number: u8,
    /// 1-indexed.
    pub slot: u8,
    pub pokemon: PokemonRecord,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy, serde::Serialize)]
pub struct BoxSummary {
    pub box_number: u8,
    pub filled: usize,
    pub empty: usize,
    pub first_empty: Option<u8>,
}

#[derive(PartialEq, Eq, Debug, Clone, Default, serde::Serialize)]
pub struct Storage {
    /// The box the PC cursor last had open, 1-indexed.
    pub current_box: u8,
    pub pokemon: Vec<BoxedPokemon>,
}

impl Storage {
    /// The 30 slots of `box_number` (1 to 14). Out-of-range boxes have no slots.
    pub fn box_slots(&self, box_number: u8) -> Vec<Option<&BoxedPokemon>> {
        if !(1..=NUM_BOXES as u8).contains(&box_number) {
            return vec![];
        }

        let mut slots = vec![None; BOX_SIZE];
        for p in self.pokemon.iter().filter(|p| p.box_number == box_number) {
            slots[p.slot as usize - 1] = Some(p);
        }
        slots
    }

    pub fn summary(&self) -> Vec<BoxSummary> {
        (1..=NUM_BOXES as u8)
            .map(|box_number| {
                let slots = self.box_slots(box_number);
                let filled = slots.iter().filter(|s| s.is_some()).count();
                BoxSummary {
                    box_number,
                    filled,
                    empty: BOX_SIZE - filled,
                    first_empty: slots.iter().position(|s| s.is_none()).map(|i| i as u8 + 1),
                }
            })
            .collect()
    }
}

/// Concatenates the bodies of sections 5 to 13. Missing sections are zero-filled so every later
/// record keeps its index.
pub fn storage_buffer(buf: &[u8], sections: &SectionMap) -> Vec<u8> {
    let mut out = Vec::with_capacity(
        SECTION_SIZES[FIRST_SECTION as usize..=LAST_SECTION as usize].iter().sum(),
    );
    for id in FIRST_SECTION..=LAST_SECTION {
        let size = SECTION_SIZES[id as usize];
        match sections.body(buf, id) {
            Some(body) => out.extend_from_slice(body),
            None => out.resize(out.len() + size, 0),
        }
    }
    out
}

pub fn slot_position(index: usize) -> (u8, u8) {
    ((index / BOX_SIZE + 1) as u8, (index % BOX_SIZE + 1) as u8)
}

pub fn read(buf: &[u8], sections: &SectionMap) -> Storage {
    let storage = storage_buffer(buf, sections);
    let current_box = storage[0].min(NUM_BOXES as u8 - 1) + 1;

    let pokemon = storage[CURSOR_SIZE..]
        .chunks_exact(pokemon::BOX_RECORD_SIZE)
        .take(NUM_SLOTS)
        .enumerate()
        .filter_map(|(i, record)| {
            let (box_number, slot) = slot_position(i);
            Some(BoxedPokemon {
                box_number,
                slot,
                pokemon: pokemon::decode_boxed(record)?,
            })
        })
        .collect();

    Storage { current_box, pokemon }
}
