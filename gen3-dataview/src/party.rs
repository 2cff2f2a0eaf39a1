use crate::layout::Layout;
use crate::pokemon::{self, PokemonRecord};
use crate::save::{read_u32, SectionMap};

pub const MAX_PARTY_SIZE: usize = 6;

/// The stored team size. Anything above six is treated as an empty team.
pub fn team_size(buf: &[u8], sections: &SectionMap, layout: Layout) -> usize {
    let raw = match sections.get(1).and_then(|s| read_u32(buf, s + layout.offsets().team_size)) {
        Some(raw) => raw,
        None => {
            return 0;
        }
    };

    if raw as usize > MAX_PARTY_SIZE {
        log::debug!("team size {} out of range, treating as empty", raw);
        return 0;
    }
    raw as usize
}

/// Decodes the party from Section 1, skipping empty and invalid records.
pub fn read(buf: &[u8], sections: &SectionMap, layout: Layout) -> Vec<PokemonRecord> {
    let section1 = match sections.get(1) {
        Some(offset) => offset,
        None => {
            return vec![];
        }
    };

    let team_data = section1 + layout.offsets().team_data;
    (0..team_size(buf, sections, layout))
        .filter_map(|i| {
            let offset = team_data + i * pokemon::PARTY_RECORD_SIZE;
            pokemon::decode_party(buf.get(offset..offset + pokemon::PARTY_RECORD_SIZE)?)
        })
        .collect()
}
