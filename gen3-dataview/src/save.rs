use byteorder::ByteOrder;

pub const SAVE_SIZE: usize = 0x20000;
pub const SLOT_SIZE: usize = 0xe000;
pub const SECTION_SIZE: usize = 0x1000;
pub const NUM_SECTIONS: usize = 14;

pub const SECTION_ID_OFFSET: usize = 0x0ff4;
pub const CHECKSUM_OFFSET: usize = 0x0ff6;
pub const SAVE_INDEX_OFFSET: usize = 0x0ffc;

/// Payload length covered by each section id's checksum.
#[rustfmt::skip]
pub const SECTION_SIZES: [usize; NUM_SECTIONS] = [
    3884, 3968, 3968, 3968, 3848,
    3968, 3968, 3968, 3968, 3968, 3968, 3968, 3968,
    2000,
];

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("invalid size: {0} bytes")]
    InvalidSize(usize),

    #[error("save is blank: neither slot has a valid section id")]
    Blank,

    #[error("no valid sections in slot {0:?}")]
    NoValidSections(Slot),
}

pub(crate) fn read_u8(buf: &[u8], offset: usize) -> Option<u8> {
    buf.get(offset).copied()
}

pub(crate) fn read_u16(buf: &[u8], offset: usize) -> Option<u16> {
    buf.get(offset..offset.checked_add(2)?).map(byteorder::LittleEndian::read_u16)
}

pub(crate) fn read_u32(buf: &[u8], offset: usize) -> Option<u32> {
    buf.get(offset..offset.checked_add(4)?).map(byteorder::LittleEndian::read_u32)
}

#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash, serde::Serialize, serde::Deserialize)]
pub enum Slot {
    A,
    B,
}

impl Slot {
    pub fn base(self) -> usize {
        match self {
            Slot::A => 0,
            Slot::B => SLOT_SIZE,
        }
    }
}

pub fn read_save_index(buf: &[u8], slot: Slot) -> Option<u32> {
    read_u32(buf, slot.base() + SAVE_INDEX_OFFSET)
}

/// Picks the slot written most recently.
///
/// Counters are compared modulo 2^32: a gap wider than 0x80000000 means the smaller counter has
/// wrapped and is actually the newer one. If either counter is unreadable, slot A is used.
/// The choice never falls back to the older slot, even when the newer one maps no sections.
pub fn locate(buf: &[u8]) -> Slot {
    let (a, b) = match (read_save_index(buf, Slot::A), read_save_index(buf, Slot::B)) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            return Slot::A;
        }
    };

    if a > b {
        if a - b > 0x80000000 {
            Slot::B
        } else {
            Slot::A
        }
    } else if b - a > 0x80000000 {
        Slot::A
    } else {
        Slot::B
    }
}

fn section_id_at(buf: &[u8], offset: usize) -> Option<u16> {
    read_u16(buf, offset + SECTION_ID_OFFSET).filter(|id| (*id as usize) < NUM_SECTIONS)
}

/// A slot is live when its first window carries a valid section id and the slot is not entirely
/// zeroed. Erased flash reads back as all 0x00 or all 0xff; the latter never has a valid id.
fn is_live(buf: &[u8], slot: Slot) -> bool {
    let base = slot.base();
    section_id_at(buf, base).is_some()
        && buf
            .get(base..(base + SLOT_SIZE).min(buf.len()))
            .map(|window| window.iter().any(|b| *b != 0))
            .unwrap_or(false)
}

/// A save is blank only when neither slot is live.
pub fn is_blank(buf: &[u8]) -> bool {
    !is_live(buf, Slot::A) && !is_live(buf, Slot::B)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SectionMap {
    offsets: [Option<usize>; NUM_SECTIONS],
}

impl SectionMap {
    pub fn get(&self, id: u16) -> Option<usize> {
        self.offsets.get(id as usize).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.offsets.iter().filter(|o| o.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn missing(&self) -> Vec<u16> {
        (0..NUM_SECTIONS as u16).filter(|id| self.get(*id).is_none()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, usize)> + '_ {
        self.offsets
            .iter()
            .enumerate()
            .filter_map(|(id, offset)| offset.map(|offset| (id as u16, offset)))
    }

    /// The checksummed payload of section `id`, if the section is present.
    pub fn body<'a>(&self, buf: &'a [u8], id: u16) -> Option<&'a [u8]> {
        let offset = self.get(id)?;
        buf.get(offset..offset + SECTION_SIZES[id as usize])
    }
}

/// Maps section ids to absolute offsets for the 14 windows of `slot`.
///
/// Windows carrying an out-of-range id are skipped; a repeated id keeps the last window seen.
pub fn map_sections(buf: &[u8], slot: Slot) -> SectionMap {
    let mut map = SectionMap::default();

    for i in 0..NUM_SECTIONS {
        let offset = slot.base() + i * SECTION_SIZE;
        match read_u16(buf, offset + SECTION_ID_OFFSET) {
            Some(id) if (id as usize) < NUM_SECTIONS => {
                map.offsets[id as usize] = Some(offset);
            }
            Some(id) => {
                log::warn!("slot {:?}: invalid section id {} at window {}", slot, id, i);
            }
            None => {
                log::warn!("slot {:?}: window {} is out of bounds", slot, i);
            }
        }
    }

    let missing = map.missing();
    if !missing.is_empty() {
        log::warn!("slot {:?}: missing sections {:?}", slot, missing);
    }

    map
}

/// Sums the payload as little-endian words and folds the result to 16 bits.
pub fn compute_section_checksum(body: &[u8]) -> u16 {
    let sum = body
        .chunks_exact(4)
        .map(byteorder::LittleEndian::read_u32)
        .fold(0u32, |acc, word| acc.wrapping_add(word));
    ((sum >> 16) as u16).wrapping_add(sum as u16)
}

pub fn stored_section_checksum(buf: &[u8], offset: usize) -> Option<u16> {
    read_u16(buf, offset + CHECKSUM_OFFSET)
}

pub fn verify_checksum(buf: &[u8], offset: usize, id: u16) -> bool {
    let size = match SECTION_SIZES.get(id as usize) {
        Some(size) => *size,
        None => {
            return false;
        }
    };

    match (buf.get(offset..offset + size), stored_section_checksum(buf, offset)) {
        (Some(body), Some(stored)) => compute_section_checksum(body) == stored,
        _ => false,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ChecksumMismatch {
    pub section_id: u16,
    pub offset: usize,
    pub stored: u16,
    pub computed: u16,
}

/// Recomputes every mapped section's checksum.
///
/// Mismatches are reported, never fatal: lightly corrupted saves are still read in full.
pub fn check_sections(buf: &[u8], sections: &SectionMap) -> Vec<ChecksumMismatch> {
    sections
        .iter()
        .filter_map(|(id, offset)| {
            let body = sections.body(buf, id)?;
            let stored = stored_section_checksum(buf, offset)?;
            let computed = compute_section_checksum(body);
            if stored == computed {
                return None;
            }
            log::warn!(
                "section {} at {:#06x}: checksum mismatch (stored {:#06x}, computed {:#06x})",
                id,
                offset,
                stored,
                computed
            );
            Some(ChecksumMismatch {
                section_id: id,
                offset,
                stored,
                computed,
            })
        })
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ValidationReport {
    pub missing_sections: Vec<u16>,
    pub checksum_mismatches: Vec<ChecksumMismatch>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.missing_sections.is_empty() && self.checksum_mismatches.is_empty()
    }
}

pub fn validate(buf: &[u8], sections: &SectionMap) -> ValidationReport {
    ValidationReport {
        missing_sections: sections.missing(),
        checksum_mismatches: check_sections(buf, sections),
    }
}
