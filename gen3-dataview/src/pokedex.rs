use crate::layout;
use crate::save::SectionMap;
use crate::species::NUM_NATIONAL;

type Bits = bitvec::vec::BitVec<u8, bitvec::order::Lsb0>;

/// National Dex numbers in regional Pokédex order.
#[rustfmt::skip]
pub static REGIONAL_DEX: [u16; 202] = [
    252, 253, 254, 255, 256, 257, 258, 259, 260, 261,
    262, 263, 264, 265, 266, 267, 268, 269, 270, 271,
    272, 273, 274, 275, 276, 277, 278, 279, 280, 281,
    282, 283, 284, 285, 286, 287, 288, 289, 63, 64,
    65, 290, 291, 292, 293, 294, 295, 296, 297, 118,
    119, 129, 130, 298, 183, 184, 74, 75, 76, 299,
    300, 301, 41, 42, 169, 72, 73, 302, 303, 304,
    305, 306, 66, 67, 68, 307, 308, 309, 310, 311,
    312, 81, 82, 100, 101, 313, 314, 43, 44, 45,
    182, 84, 85, 315, 316, 317, 318, 319, 320, 321,
    322, 323, 218, 219, 324, 88, 89, 109, 110, 325,
    326, 27, 28, 327, 227, 328, 329, 330, 331, 332,
    333, 334, 335, 336, 337, 338, 339, 340, 341, 342,
    343, 344, 345, 346, 347, 348, 174, 39, 40, 349,
    350, 351, 120, 121, 352, 353, 354, 355, 356, 357,
    358, 359, 37, 38, 172, 25, 26, 54, 55, 360,
    202, 177, 178, 203, 231, 232, 127, 214, 111, 112,
    361, 362, 363, 364, 365, 366, 367, 368, 369, 222,
    170, 171, 370, 116, 117, 230, 371, 372, 373, 374,
    375, 376, 377, 378, 379, 380, 381, 382, 383, 384,
    385, 386,
];

/// 1-indexed position of `national` in the regional Pokédex.
pub fn regional_number(national: u16) -> Option<u16> {
    REGIONAL_DEX.iter().position(|n| *n == national).map(|i| i as u16 + 1)
}

fn unpack(bytes: &[u8]) -> Bits {
    let mut bits = Bits::from_slice(bytes);
    bits.resize(NUM_NATIONAL as usize, false);
    bits
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PokedexState {
    seen: Bits,
    owned: Bits,
}

impl Default for PokedexState {
    fn default() -> Self {
        Self {
            seen: unpack(&[]),
            owned: unpack(&[]),
        }
    }
}

impl PokedexState {
    /// Bit `i` of each field marks National Dex number `i + 1`.
    pub fn from_bitfields(seen: &[u8], owned: &[u8]) -> Self {
        Self {
            seen: unpack(seen),
            owned: unpack(owned),
        }
    }

    fn test(bits: &Bits, national: u16) -> bool {
        national
            .checked_sub(1)
            .and_then(|i| bits.get(i as usize))
            .map(|b| *b)
            .unwrap_or(false)
    }

    pub fn is_seen(&self, national: u16) -> bool {
        Self::test(&self.seen, national)
    }

    pub fn is_owned(&self, national: u16) -> bool {
        Self::test(&self.owned, national)
    }

    pub fn seen(&self) -> Vec<u16> {
        self.seen.iter_ones().map(|i| i as u16 + 1).collect()
    }

    pub fn owned(&self) -> Vec<u16> {
        self.owned.iter_ones().map(|i| i as u16 + 1).collect()
    }

    pub fn seen_count(&self) -> usize {
        self.seen.count_ones()
    }

    pub fn owned_count(&self) -> usize {
        self.owned.count_ones()
    }

    /// Seen species that belong to the regional Pokédex, in regional order.
    pub fn regional_seen(&self) -> Vec<u16> {
        REGIONAL_DEX.iter().copied().filter(|n| self.is_seen(*n)).collect()
    }

    pub fn regional_owned(&self) -> Vec<u16> {
        REGIONAL_DEX.iter().copied().filter(|n| self.is_owned(*n)).collect()
    }
}

/// Reads the owned and seen bitfields from Section 0. A missing section reads as an empty Pokédex.
pub fn read(buf: &[u8], sections: &SectionMap) -> PokedexState {
    let section0 = match sections.get(0) {
        Some(offset) => offset,
        None => {
            return PokedexState::default();
        }
    };

    let field = |offset: usize| buf.get(section0 + offset..section0 + offset + layout::POKEDEX_SIZE).unwrap_or(&[]);
    PokedexState::from_bitfields(field(layout::POKEDEX_SEEN), field(layout::POKEDEX_OWNED))
}
