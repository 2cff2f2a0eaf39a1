use byteorder::ByteOrder;

use crate::{species, text};

pub const HEADER_SIZE: usize = 0x20;
pub const PAYLOAD_SIZE: usize = 48;
pub const BLOCK_SIZE: usize = 12;
pub const BOX_RECORD_SIZE: usize = 80;
pub const PARTY_RECORD_SIZE: usize = 100;

pub const NICKNAME_SIZE: usize = 10;
pub const OT_NAME_SIZE: usize = 7;

pub const PAYLOAD_OFFSET: usize = HEADER_SIZE;
pub const RECORD_CHECKSUM_OFFSET: usize = 0x1c;

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Block {
    Growth = 0,
    Attacks = 1,
    Evs = 2,
    Misc = 3,
}

/// `PERMUTATIONS[personality % 24][block]` is the physical 12-byte slot holding that logical block.
#[rustfmt::skip]
pub static PERMUTATIONS: [[u8; 4]; 24] = [
    [0, 1, 2, 3], [0, 1, 3, 2], [0, 2, 1, 3], [0, 3, 1, 2], [0, 2, 3, 1], [0, 3, 2, 1],
    [1, 0, 2, 3], [1, 0, 3, 2], [2, 0, 1, 3], [3, 0, 1, 2], [2, 0, 3, 1], [3, 0, 2, 1],
    [1, 2, 0, 3], [1, 3, 0, 2], [2, 1, 0, 3], [3, 1, 0, 2], [2, 3, 0, 1], [3, 2, 0, 1],
    [1, 2, 3, 0], [1, 3, 2, 0], [2, 1, 3, 0], [3, 1, 2, 0], [2, 3, 1, 0], [3, 2, 1, 0],
];

pub fn block_position(personality: u32, block: Block) -> usize {
    PERMUTATIONS[(personality % 24) as usize][block as usize] as usize
}

/// XORs every little-endian word of the payload with `personality ^ ot_id`.
///
/// The cipher is its own inverse.
pub fn crypt(payload: &mut [u8; PAYLOAD_SIZE], personality: u32, ot_id: u32) {
    let key = personality ^ ot_id;
    for word in payload.chunks_exact_mut(4) {
        let v = byteorder::LittleEndian::read_u32(word) ^ key;
        byteorder::LittleEndian::write_u32(word, v);
    }
}

/// Reorders a decrypted payload from physical storage order into growth, attacks, EVs, misc order.
pub fn unshuffle(physical: &[u8; PAYLOAD_SIZE], personality: u32) -> [u8; PAYLOAD_SIZE] {
    let order = &PERMUTATIONS[(personality % 24) as usize];
    let mut logical = [0u8; PAYLOAD_SIZE];
    for (block, position) in order.iter().enumerate() {
        let position = *position as usize;
        logical[block * BLOCK_SIZE..][..BLOCK_SIZE].copy_from_slice(&physical[position * BLOCK_SIZE..][..BLOCK_SIZE]);
    }
    logical
}

pub fn shuffle(logical: &[u8; PAYLOAD_SIZE], personality: u32) -> [u8; PAYLOAD_SIZE] {
    let order = &PERMUTATIONS[(personality % 24) as usize];
    let mut physical = [0u8; PAYLOAD_SIZE];
    for (block, position) in order.iter().enumerate() {
        let position = *position as usize;
        physical[position * BLOCK_SIZE..][..BLOCK_SIZE].copy_from_slice(&logical[block * BLOCK_SIZE..][..BLOCK_SIZE]);
    }
    physical
}

/// Wrapping sum of the payload's 24 little-endian halfwords.
pub fn payload_checksum(payload: &[u8; PAYLOAD_SIZE]) -> u16 {
    payload
        .chunks_exact(2)
        .map(byteorder::LittleEndian::read_u16)
        .fold(0u16, |acc, v| acc.wrapping_add(v))
}

/// Decrypts the payload of an 80- or 100-byte record and returns it in logical block order.
pub fn decrypt_payload(record: &[u8]) -> Option<[u8; PAYLOAD_SIZE]> {
    let personality = crate::save::read_u32(record, 0x00)?;
    let ot_id = crate::save::read_u32(record, 0x04)?;
    let mut payload: [u8; PAYLOAD_SIZE] = record.get(PAYLOAD_OFFSET..PAYLOAD_OFFSET + PAYLOAD_SIZE)?.try_into().ok()?;
    crypt(&mut payload, personality, ot_id);
    Some(unshuffle(&payload, personality))
}

/// Inverse of [`decrypt_payload`]: writes `logical` into `record` shuffled and encrypted under the
/// personality and OT id already present in the header, and updates the header checksum.
pub fn encrypt_payload(record: &mut [u8], logical: &[u8; PAYLOAD_SIZE]) {
    let personality = byteorder::LittleEndian::read_u32(&record[0x00..0x04]);
    let ot_id = byteorder::LittleEndian::read_u32(&record[0x04..0x08]);
    byteorder::LittleEndian::write_u16(
        &mut record[RECORD_CHECKSUM_OFFSET..][..2],
        payload_checksum(logical),
    );
    let mut physical = shuffle(logical, personality);
    crypt(&mut physical, personality, ot_id);
    record[PAYLOAD_OFFSET..][..PAYLOAD_SIZE].copy_from_slice(&physical);
}

pub fn is_shiny(personality: u32, ot_id: u32) -> bool {
    let public_id = ot_id & 0xffff;
    let secret_id = ot_id >> 16;
    (public_id ^ secret_id ^ (personality & 0xffff) ^ (personality >> 16)) < 8
}

#[repr(packed, C)]
#[derive(bytemuck::AnyBitPattern, Clone, Copy)]
struct RawHeader {
    personality: u32,
    ot_id: u32,
    nickname: [u8; NICKNAME_SIZE],
    language: u16,
    ot_name: [u8; OT_NAME_SIZE],
    markings: u8,
    checksum: u16,
    _unknown: u16,
}
const _: () = assert!(std::mem::size_of::<RawHeader>() == HEADER_SIZE);

#[repr(packed, C)]
#[derive(bytemuck::AnyBitPattern, Clone, Copy)]
struct RawGrowth {
    species: u16,
    held_item: u16,
    experience: u32,
    pp_bonuses: u8,
    friendship: u8,
    _unused: u16,
}
const _: () = assert!(std::mem::size_of::<RawGrowth>() == BLOCK_SIZE);

#[repr(packed, C)]
#[derive(bytemuck::AnyBitPattern, Clone, Copy)]
struct RawAttacks {
    moves: [u16; 4],
    pp: [u8; 4],
}
const _: () = assert!(std::mem::size_of::<RawAttacks>() == BLOCK_SIZE);

#[repr(packed, C)]
#[derive(bytemuck::AnyBitPattern, Clone, Copy)]
struct RawEvs {
    evs: [u8; 6],
    contest: [u8; 6],
}
const _: () = assert!(std::mem::size_of::<RawEvs>() == BLOCK_SIZE);

#[repr(packed, C)]
#[derive(bytemuck::AnyBitPattern, Clone, Copy, c2rust_bitfields::BitfieldStruct)]
struct RawMisc {
    pokerus: u8,
    met_location: u8,

    #[bitfield(name = "met_level", ty = "u8", bits = "0..=6")]
    #[bitfield(name = "origin_game", ty = "u8", bits = "7..=10")]
    #[bitfield(name = "ball", ty = "u8", bits = "11..=14")]
    #[bitfield(name = "ot_gender", ty = "bool", bits = "15..=15")]
    origins: [u8; 2],

    #[bitfield(name = "iv_hp", ty = "u8", bits = "0..=4")]
    #[bitfield(name = "iv_attack", ty = "u8", bits = "5..=9")]
    #[bitfield(name = "iv_defense", ty = "u8", bits = "10..=14")]
    #[bitfield(name = "iv_speed", ty = "u8", bits = "15..=19")]
    #[bitfield(name = "iv_sp_attack", ty = "u8", bits = "20..=24")]
    #[bitfield(name = "iv_sp_defense", ty = "u8", bits = "25..=29")]
    #[bitfield(name = "is_egg", ty = "bool", bits = "30..=30")]
    #[bitfield(name = "ability_slot", ty = "u8", bits = "31..=31")]
    ivs_egg_ability: [u8; 4],

    ribbons: u32,
}
const _: () = assert!(std::mem::size_of::<RawMisc>() == BLOCK_SIZE);

#[repr(packed, C)]
#[derive(bytemuck::AnyBitPattern, Clone, Copy)]
struct RawBattleStats {
    status: u32,
    level: u8,
    pokerus_remaining: u8,
    current_hp: u16,
    max_hp: u16,
    attack: u16,
    defense: u16,
    speed: u16,
    sp_attack: u16,
    sp_defense: u16,
}
const _: () = assert!(std::mem::size_of::<RawBattleStats>() == PARTY_RECORD_SIZE - BOX_RECORD_SIZE);

fn block<T: bytemuck::AnyBitPattern>(logical: &[u8; PAYLOAD_SIZE], block: Block) -> T {
    bytemuck::pod_read_unaligned(&logical[block as usize * BLOCK_SIZE..][..BLOCK_SIZE])
}

#[derive(PartialEq, Eq, Debug, Clone, Copy, Default, serde::Serialize)]
pub struct Stats<T> {
    pub hp: T,
    pub attack: T,
    pub defense: T,
    pub speed: T,
    pub sp_attack: T,
    pub sp_defense: T,
}

impl<T: Copy> Stats<T> {
    fn from_slice(v: &[T; 6]) -> Self {
        Self {
            hp: v[0],
            attack: v[1],
            defense: v[2],
            speed: v[3],
            sp_attack: v[4],
            sp_defense: v[5],
        }
    }

    pub fn to_array(&self) -> [T; 6] {
        [self.hp, self.attack, self.defense, self.speed, self.sp_attack, self.sp_defense]
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy, Default, serde::Serialize)]
pub struct ContestStats {
    pub cool: u8,
    pub beauty: u8,
    pub cute: u8,
    pub smart: u8,
    pub tough: u8,
    pub feel: u8,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy, serde::Serialize)]
pub struct Origins {
    pub met_level: u8,
    pub game: u8,
    pub ball: u8,
    pub ot_female: bool,
}

/// Live stats carried only by party records.
#[derive(PartialEq, Eq, Debug, Clone, Copy, serde::Serialize)]
pub struct BattleStats {
    pub status: u32,
    pub level: u8,
    pub pokerus_remaining: u8,
    pub current_hp: u16,
    pub max_hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub speed: u16,
    pub sp_attack: u16,
    pub sp_defense: u16,
}

#[derive(PartialEq, Eq, Debug, Clone, serde::Serialize)]
pub struct PokemonRecord {
    pub personality: u32,
    pub ot_id: u32,
    pub nickname: String,
    pub language: u16,
    pub ot_name: String,
    pub markings: u8,
    pub checksum: u16,
    pub checksum_valid: bool,

    /// Species id as stored on disk.
    pub species_id: u16,
    /// National Dex number, absent when the stored id is outside the valid ranges.
    pub national_dex: Option<u16>,
    pub held_item: u16,
    pub experience: u32,
    pub pp_bonuses: u8,
    pub friendship: u8,

    pub moves: [u16; 4],
    pub pp: [u8; 4],

    pub evs: Stats<u8>,
    pub contest: ContestStats,

    pub pokerus: u8,
    pub met_location: u8,
    pub origins: Origins,
    pub ivs: Stats<u8>,
    pub is_egg: bool,
    pub ability_slot: u8,
    pub ribbons: u32,

    pub level: u8,
    pub nature: u8,
    pub is_shiny: bool,
    pub battle: Option<BattleStats>,
}

impl PokemonRecord {
    pub fn public_id(&self) -> u16 {
        self.ot_id as u16
    }

    pub fn secret_id(&self) -> u16 {
        (self.ot_id >> 16) as u16
    }

    pub fn nature_name(&self) -> &'static str {
        species::NATURE_NAMES[self.nature as usize]
    }

    /// The stat this nature raises and the one it lowers, if any.
    pub fn nature_modifiers(&self) -> Option<(species::Stat, species::Stat)> {
        species::nature_modifiers(self.nature)
    }

    pub fn known_moves(&self) -> impl Iterator<Item = (u16, u8)> + '_ {
        self.moves
            .iter()
            .zip(self.pp.iter())
            .filter(|(m, _)| **m != 0)
            .map(|(m, pp)| (*m, *pp))
    }
}

fn decode_record(record: &[u8]) -> Option<PokemonRecord> {
    let header = bytemuck::pod_read_unaligned::<RawHeader>(record.get(..HEADER_SIZE)?);
    let personality = header.personality;
    let ot_id = header.ot_id;
    if personality == 0 || personality == 0xffffffff {
        return None;
    }

    let logical = decrypt_payload(record)?;
    let growth = block::<RawGrowth>(&logical, Block::Growth);
    let attacks = block::<RawAttacks>(&logical, Block::Attacks);
    let evs = block::<RawEvs>(&logical, Block::Evs);
    let misc = block::<RawMisc>(&logical, Block::Misc);

    let species_id = growth.species;
    if !misc.is_egg() && !species::is_valid_internal(species_id) {
        return None;
    }
    let national_dex = species::internal_to_national(species_id);
    if let Some(national) = national_dex {
        if national != species_id {
            log::debug!("species {} stored as internal id {}", national, species_id);
        }
    }

    let checksum = header.checksum;
    let experience = growth.experience;
    let contest = evs.contest;
    let growth_rate = national_dex.map(species::growth_rate).unwrap_or(species::GrowthRate::MediumFast);

    Some(PokemonRecord {
        personality,
        ot_id,
        nickname: text::decode(&header.nickname),
        language: header.language,
        ot_name: text::decode(&header.ot_name),
        markings: header.markings,
        checksum,
        checksum_valid: payload_checksum(&logical) == checksum,

        species_id,
        national_dex,
        held_item: growth.held_item,
        experience,
        pp_bonuses: growth.pp_bonuses,
        friendship: growth.friendship,

        moves: attacks.moves,
        pp: attacks.pp,

        evs: Stats::from_slice(&evs.evs),
        contest: ContestStats {
            cool: contest[0],
            beauty: contest[1],
            cute: contest[2],
            smart: contest[3],
            tough: contest[4],
            feel: contest[5],
        },

        pokerus: misc.pokerus,
        met_location: misc.met_location,
        origins: Origins {
            met_level: misc.met_level(),
            game: misc.origin_game(),
            ball: misc.ball(),
            ot_female: misc.ot_gender(),
        },
        ivs: Stats {
            hp: misc.iv_hp(),
            attack: misc.iv_attack(),
            defense: misc.iv_defense(),
            speed: misc.iv_speed(),
            sp_attack: misc.iv_sp_attack(),
            sp_defense: misc.iv_sp_defense(),
        },
        is_egg: misc.is_egg(),
        ability_slot: misc.ability_slot(),
        ribbons: misc.ribbons,

        level: growth_rate.level_for_experience(experience),
        nature: species::nature(personality),
        is_shiny: is_shiny(personality, ot_id),
        battle: None,
    })
}

/// Decodes an 80-byte storage record. Empty and invalid slots yield `None`.
pub fn decode_boxed(record: &[u8]) -> Option<PokemonRecord> {
    decode_record(record.get(..BOX_RECORD_SIZE)?)
}

/// Decodes a 100-byte party record, including its plaintext battle trailer.
pub fn decode_party(record: &[u8]) -> Option<PokemonRecord> {
    let record = record.get(..PARTY_RECORD_SIZE)?;
    let mut pokemon = decode_record(&record[..BOX_RECORD_SIZE])?;
    let raw = bytemuck::pod_read_unaligned::<RawBattleStats>(&record[BOX_RECORD_SIZE..]);
    let battle = BattleStats {
        status: raw.status,
        level: raw.level,
        pokerus_remaining: raw.pokerus_remaining,
        current_hp: raw.current_hp,
        max_hp: raw.max_hp,
        attack: raw.attack,
        defense: raw.defense,
        speed: raw.speed,
        sp_attack: raw.sp_attack,
        sp_defense: raw.sp_defense,
    };
    if (1..=100).contains(&battle.level) {
        pokemon.level = battle.level;
    }
    pokemon.battle = Some(battle);
    Some(pokemon)
}
