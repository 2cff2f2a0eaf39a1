#![allow(dead_code)]

use byteorder::ByteOrder;

use gen3_dataview::layout::{self, Layout, Pocket};
use gen3_dataview::pokemon;
use gen3_dataview::save::{self, Slot};
use gen3_dataview::text;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A Pokémon record assembled in plaintext and encrypted on output.
#[derive(Clone, Debug)]
pub struct RecordBuilder {
    pub personality: u32,
    pub ot_id: u32,
    pub nickname: String,
    pub ot_name: String,
    pub species_id: u16,
    pub held_item: u16,
    pub experience: u32,
    pub friendship: u8,
    pub moves: [u16; 4],
    pub pp: [u8; 4],
    pub evs: [u8; 6],
    pub ivs: [u8; 6],
    pub is_egg: bool,
    pub level: u8,
    pub current_hp: u16,
    pub max_hp: u16,
}

impl RecordBuilder {
    pub fn new(personality: u32, ot_id: u32, species_id: u16) -> Self {
        Self {
            personality,
            ot_id,
            nickname: "MON".to_string(),
            ot_name: "ASH".to_string(),
            species_id,
            held_item: 0,
            experience: 0,
            friendship: 70,
            moves: [33, 0, 0, 0],
            pp: [35, 0, 0, 0],
            evs: [0; 6],
            ivs: [0; 6],
            is_egg: false,
            level: 0,
            current_hp: 0,
            max_hp: 0,
        }
    }

    pub fn nickname(mut self, nickname: &str) -> Self {
        self.nickname = nickname.to_string();
        self
    }

    pub fn experience(mut self, experience: u32) -> Self {
        self.experience = experience;
        self
    }

    pub fn level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn hp(mut self, current_hp: u16, max_hp: u16) -> Self {
        self.current_hp = current_hp;
        self.max_hp = max_hp;
        self
    }

    pub fn logical(&self) -> [u8; pokemon::PAYLOAD_SIZE] {
        let mut logical = [0u8; pokemon::PAYLOAD_SIZE];
        byteorder::LittleEndian::write_u16(&mut logical[0..2], self.species_id);
        byteorder::LittleEndian::write_u16(&mut logical[2..4], self.held_item);
        byteorder::LittleEndian::write_u32(&mut logical[4..8], self.experience);
        logical[9] = self.friendship;
        for (i, m) in self.moves.iter().enumerate() {
            byteorder::LittleEndian::write_u16(&mut logical[12 + i * 2..][..2], *m);
        }
        logical[20..24].copy_from_slice(&self.pp);
        logical[24..30].copy_from_slice(&self.evs);
        let ivs = self
            .ivs
            .iter()
            .enumerate()
            .fold(0u32, |acc, (i, iv)| acc | ((*iv as u32 & 0x1f) << (i * 5)))
            | (self.is_egg as u32) << 30;
        byteorder::LittleEndian::write_u32(&mut logical[40..44], ivs);
        logical
    }

    pub fn box_bytes(&self) -> [u8; pokemon::BOX_RECORD_SIZE] {
        let mut record = [0u8; pokemon::BOX_RECORD_SIZE];
        byteorder::LittleEndian::write_u32(&mut record[0x00..0x04], self.personality);
        byteorder::LittleEndian::write_u32(&mut record[0x04..0x08], self.ot_id);
        record[0x08..0x12].copy_from_slice(&text::encode(&self.nickname, pokemon::NICKNAME_SIZE));
        byteorder::LittleEndian::write_u16(&mut record[0x12..0x14], 0x0202);
        record[0x14..0x1b].copy_from_slice(&text::encode(&self.ot_name, pokemon::OT_NAME_SIZE));
        pokemon::encrypt_payload(&mut record, &self.logical());
        record
    }

    pub fn party_bytes(&self) -> [u8; pokemon::PARTY_RECORD_SIZE] {
        let mut record = [0u8; pokemon::PARTY_RECORD_SIZE];
        record[..pokemon::BOX_RECORD_SIZE].copy_from_slice(&self.box_bytes());
        record[0x54] = self.level;
        byteorder::LittleEndian::write_u16(&mut record[0x56..0x58], self.current_hp);
        byteorder::LittleEndian::write_u16(&mut record[0x58..0x5a], self.max_hp);
        record
    }
}

/// Builds a synthetic save image for one layout.
#[derive(Clone)]
pub struct SaveBuilder {
    pub layout: Layout,
    pub slot: Slot,
    pub save_index: u32,
    /// Window that holds section 0. Real saves rotate sections on every write.
    pub rotation: usize,
    pub missing: Vec<u16>,
    pub corrupt_checksums: Vec<u16>,
    key: u32,
    bodies: Vec<Vec<u8>>,
}

impl SaveBuilder {
    pub fn new(layout: Layout) -> Self {
        let mut builder = Self {
            layout,
            slot: Slot::A,
            save_index: 1,
            rotation: 0,
            missing: vec![],
            corrupt_checksums: vec![],
            key: 0,
            bodies: save::SECTION_SIZES.iter().map(|size| vec![0u8; *size]).collect(),
        };
        match layout {
            Layout::FireRedLeafGreen => {
                builder.put_u32(0, layout::FRLG_GAME_CODE, 0);
                builder.security_key(0x2b7d_19e4);
            }
            Layout::Emerald => {
                builder.put_u32(0, layout::FRLG_GAME_CODE, 0x5e5e_5e5e);
                builder.security_key(0x8c41_a35f);
            }
            Layout::RubySapphire => {
                builder.put_u32(0, layout::FRLG_GAME_CODE, 0x5e5e_5e5e);
            }
        }
        builder
    }

    pub fn section_mut(&mut self, id: u16) -> &mut [u8] {
        &mut self.bodies[id as usize]
    }

    pub fn put_u16(&mut self, id: u16, offset: usize, v: u16) {
        byteorder::LittleEndian::write_u16(&mut self.section_mut(id)[offset..][..2], v);
    }

    pub fn put_u32(&mut self, id: u16, offset: usize, v: u32) {
        byteorder::LittleEndian::write_u32(&mut self.section_mut(id)[offset..][..4], v);
    }

    pub fn key(&self) -> u32 {
        self.key
    }

    /// Call before writing money or items; values already written are not re-encrypted.
    pub fn security_key(&mut self, key: u32) -> &mut Self {
        self.key = key;
        if let Some(offset) = self.layout.offsets().security_key {
            self.put_u32(0, offset, key);
        }
        self
    }

    pub fn trainer(&mut self, name: &str, female: bool, public_id: u16, secret_id: u16) -> &mut Self {
        self.section_mut(0)[..layout::TRAINER_NAME_SIZE].copy_from_slice(&text::encode(name, layout::TRAINER_NAME_SIZE));
        self.section_mut(0)[layout::TRAINER_GENDER] = female as u8;
        self.put_u16(0, layout::TRAINER_PUBLIC_ID, public_id);
        self.put_u16(0, layout::TRAINER_SECRET_ID, secret_id);
        self
    }

    pub fn playtime(&mut self, hours: u16, minutes: u8, seconds: u8, frames: u8) -> &mut Self {
        self.put_u16(0, layout::PLAYTIME, hours);
        let body = self.section_mut(0);
        body[layout::PLAYTIME + 2] = minutes;
        body[layout::PLAYTIME + 3] = seconds;
        body[layout::PLAYTIME + 4] = frames;
        self
    }

    pub fn rival(&mut self, name: &str) -> &mut Self {
        let offset = layout::FRLG.rival_name.unwrap_or(0x0a98);
        self.section_mut(0)[offset..offset + layout::RIVAL_NAME_SIZE]
            .copy_from_slice(&text::encode(name, layout::RIVAL_NAME_SIZE));
        self
    }

    pub fn money(&mut self, amount: u32) -> &mut Self {
        let offset = self.layout.offsets().money;
        let key = self.key;
        self.put_u32(1, offset, amount ^ key);
        self
    }

    pub fn item(&mut self, pocket: Pocket, slot: usize, item_id: u16, quantity: u16) -> &mut Self {
        let p = self.layout.offsets().pocket(pocket);
        assert!(slot < p.slots);
        let key = match (self.layout, pocket) {
            (Layout::RubySapphire, _) => 0,
            _ => self.key as u16,
        };
        self.put_u16(1, p.offset + slot * 4, item_id);
        self.put_u16(1, p.offset + slot * 4 + 2, quantity ^ key);
        self
    }

    pub fn raw_team_size(&mut self, size: u32) -> &mut Self {
        let offset = self.layout.offsets().team_size;
        self.put_u32(1, offset, size);
        self
    }

    pub fn party(&mut self, members: &[RecordBuilder]) -> &mut Self {
        self.raw_team_size(members.len() as u32);
        let base = self.layout.offsets().team_data;
        for (i, member) in members.iter().enumerate() {
            let offset = base + i * pokemon::PARTY_RECORD_SIZE;
            self.section_mut(1)[offset..offset + pokemon::PARTY_RECORD_SIZE].copy_from_slice(&member.party_bytes());
        }
        self
    }

    /// Places a record at storage index `index` (box `index / 30 + 1`), splitting it across
    /// sections when it straddles a boundary.
    pub fn boxed(&mut self, index: usize, member: &RecordBuilder) -> &mut Self {
        let bytes = member.box_bytes();
        let mut pos = 4 + index * pokemon::BOX_RECORD_SIZE;
        let mut id = 5u16;
        while pos >= save::SECTION_SIZES[id as usize] {
            pos -= save::SECTION_SIZES[id as usize];
            id += 1;
        }
        let mut written = 0;
        while written < bytes.len() {
            let body = self.section_mut(id);
            let n = (body.len() - pos).min(bytes.len() - written);
            body[pos..pos + n].copy_from_slice(&bytes[written..written + n]);
            written += n;
            pos = 0;
            id += 1;
        }
        self
    }

    pub fn current_box(&mut self, box_number: u8) -> &mut Self {
        self.section_mut(5)[0] = box_number - 1;
        self
    }

    pub fn dex(&mut self, seen: &[u16], owned: &[u16]) -> &mut Self {
        for (offset, list) in [(layout::POKEDEX_SEEN, seen), (layout::POKEDEX_OWNED, owned)] {
            for n in list {
                let i = *n as usize - 1;
                self.section_mut(0)[offset + i / 8] |= 1 << (i % 8);
            }
        }
        self
    }

    pub fn badges(&mut self, byte: u8) -> &mut Self {
        self.section_mut(2)[0x03fd] = byte;
        self
    }

    fn write_slot(&self, buf: &mut [u8], slot: Slot) {
        for window in 0..save::NUM_SECTIONS {
            let id = ((window + save::NUM_SECTIONS - self.rotation) % save::NUM_SECTIONS) as u16;
            let offset = slot.base() + window * save::SECTION_SIZE;
            let page = &mut buf[offset..offset + save::SECTION_SIZE];
            page.fill(0);
            if self.missing.contains(&id) {
                byteorder::LittleEndian::write_u16(&mut page[save::SECTION_ID_OFFSET..][..2], 0xffff);
                continue;
            }
            let body = &self.bodies[id as usize];
            page[..body.len()].copy_from_slice(body);
            let mut checksum = save::compute_section_checksum(body);
            if self.corrupt_checksums.contains(&id) {
                checksum ^= 0x5555;
            }
            byteorder::LittleEndian::write_u16(&mut page[save::SECTION_ID_OFFSET..][..2], id);
            byteorder::LittleEndian::write_u16(&mut page[save::CHECKSUM_OFFSET..][..2], checksum);
            byteorder::LittleEndian::write_u32(&mut page[save::SAVE_INDEX_OFFSET..][..4], self.save_index);
        }
    }

    /// Writes this save into its slot and leaves the other slot erased.
    pub fn build(&self) -> Vec<u8> {
        let mut buf = vec![0xffu8; save::SAVE_SIZE];
        self.write_slot(&mut buf, self.slot);
        buf
    }

    /// Writes this save into its slot and `stale` into the other one.
    pub fn build_over(&self, stale: &SaveBuilder) -> Vec<u8> {
        let mut buf = self.build();
        let other = match self.slot {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        };
        stale.write_slot(&mut buf, other);
        buf
    }
}
