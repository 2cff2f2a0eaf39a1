use crate::layout::{self, Layout};
use crate::save::{read_u16, read_u32, read_u8, SectionMap};
use crate::text;

#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash, serde::Serialize, serde::Deserialize)]
pub enum Gender {
    Male,
    Female,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy, Default, serde::Serialize)]
pub struct Playtime {
    pub hours: u16,
    pub minutes: u8,
    pub seconds: u8,
    pub frames: u8,
}

impl std::fmt::Display for Playtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:03}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

#[derive(PartialEq, Eq, Debug, Clone, serde::Serialize)]
pub struct TrainerProfile {
    pub name: String,
    pub gender: Gender,
    pub public_id: u16,
    pub secret_id: u16,
    pub playtime: Playtime,
    /// FireRed/LeafGreen version word: 0 for FireRed, 1 for LeafGreen.
    pub game_code: u32,
    pub rival_name: Option<String>,
}

impl TrainerProfile {
    pub fn ot_id(&self) -> u32 {
        (self.secret_id as u32) << 16 | self.public_id as u32
    }

    pub fn display_id(&self) -> String {
        format!("{:05}", self.public_id)
    }

    pub fn display_full_id(&self) -> String {
        format!("{:05}-{:05}", self.public_id, self.secret_id)
    }
}

/// Reads the trainer card from Section 0. `None` when the section is missing.
pub fn read(buf: &[u8], sections: &SectionMap, layout: Layout) -> Option<TrainerProfile> {
    let body = sections.body(buf, 0)?;

    let name = text::decode(&body[layout::TRAINER_NAME..][..layout::TRAINER_NAME_SIZE]);
    let gender = match read_u8(body, layout::TRAINER_GENDER)? {
        1 => Gender::Female,
        _ => Gender::Male,
    };

    let rival_name = layout
        .offsets()
        .rival_name
        .and_then(|offset| body.get(offset..offset + layout::RIVAL_NAME_SIZE))
        .map(text::decode)
        .filter(|name| name.chars().count() >= 2);

    let profile = TrainerProfile {
        name,
        gender,
        public_id: read_u16(body, layout::TRAINER_PUBLIC_ID)?,
        secret_id: read_u16(body, layout::TRAINER_SECRET_ID)?,
        playtime: Playtime {
            hours: read_u16(body, layout::PLAYTIME)?,
            minutes: read_u8(body, layout::PLAYTIME + 2)?,
            seconds: read_u8(body, layout::PLAYTIME + 3)?,
            frames: read_u8(body, layout::PLAYTIME + 4)?,
        },
        game_code: read_u32(body, layout::FRLG_GAME_CODE)?,
        rival_name,
    };
    Some(profile)
}

#[rustfmt::skip]
pub static BADGE_NAMES: [&str; 8] = [
    "Stone", "Knuckle", "Dynamo", "Heat", "Balance", "Feather", "Mind", "Rain",
];

/// Gym badges, stored with badge 1 in the high bit.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default, serde::Serialize)]
pub struct Badges(pub u8);

impl Badges {
    /// Whether badge `n` (0 for the first) has been earned.
    pub fn has(&self, n: usize) -> bool {
        n < 8 && self.0 & (0x80 >> n) != 0
    }

    pub fn count(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn earned(&self) -> Vec<&'static str> {
        (0..8).filter(|n| self.has(*n)).map(|n| BADGE_NAMES[n]).collect()
    }
}

/// Only Emerald's badge byte location is known.
pub fn read_badges(buf: &[u8], sections: &SectionMap, layout: Layout) -> Option<Badges> {
    let offset = layout.offsets().badges?;
    let section2 = sections.get(2)?;
    read_u8(buf, section2 + offset).map(Badges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::{self, Slot};
    use byteorder::ByteOrder;

    fn image() -> Vec<u8> {
        let mut buf = vec![0u8; save::SAVE_SIZE];
        for window in 0..save::NUM_SECTIONS {
            let offset = window * save::SECTION_SIZE;
            byteorder::LittleEndian::write_u16(&mut buf[offset + save::SECTION_ID_OFFSET..][..2], window as u16);
        }
        buf
    }

    #[test]
    fn test_read_profile() {
        let mut buf = image();
        buf[0..7].copy_from_slice(&text::encode("MAY", 7));
        buf[0x08] = 1;
        byteorder::LittleEndian::write_u16(&mut buf[0x0a..], 4321);
        byteorder::LittleEndian::write_u16(&mut buf[0x0c..], 8765);
        byteorder::LittleEndian::write_u16(&mut buf[0x0e..], 12);
        buf[0x10] = 34;
        buf[0x11] = 5;
        buf[0x12] = 59;

        let sections = save::map_sections(&buf, Slot::A);
        let profile = read(&buf, &sections, Layout::Emerald).unwrap();
        assert_eq!(profile.name, "MAY");
        assert_eq!(profile.gender, Gender::Female);
        assert_eq!(profile.public_id, 4321);
        assert_eq!(profile.secret_id, 8765);
        assert_eq!(profile.ot_id(), 8765 << 16 | 4321);
        assert_eq!(profile.display_id(), "04321");
        assert_eq!(profile.display_full_id(), "04321-08765");
        assert_eq!(profile.playtime.to_string(), "012:34:05");
        assert_eq!(profile.playtime.frames, 59);
        assert_eq!(profile.rival_name, None);
    }

    #[test]
    fn test_rival_name_only_on_frlg() {
        let mut buf = image();
        buf[0x0a98..0x0a98 + 7].copy_from_slice(&text::encode("BLUE", 7));
        let sections = save::map_sections(&buf, Slot::A);
        assert_eq!(
            read(&buf, &sections, Layout::FireRedLeafGreen).unwrap().rival_name.as_deref(),
            Some("BLUE")
        );
        assert_eq!(read(&buf, &sections, Layout::RubySapphire).unwrap().rival_name, None);

        buf[0x0a98..0x0a98 + 7].copy_from_slice(&text::encode("B", 7));
        assert_eq!(read(&buf, &sections, Layout::FireRedLeafGreen).unwrap().rival_name, None);
    }

    #[test]
    fn test_missing_section_zero() {
        let mut buf = image();
        byteorder::LittleEndian::write_u16(&mut buf[save::SECTION_ID_OFFSET..][..2], 0xffff);
        let sections = save::map_sections(&buf, Slot::A);
        assert!(read(&buf, &sections, Layout::Emerald).is_none());
    }

    #[test]
    fn test_badges() {
        let mut buf = image();
        buf[2 * save::SECTION_SIZE + 0x3fd] = 0b1010_0001;
        let sections = save::map_sections(&buf, Slot::A);
        let badges = read_badges(&buf, &sections, Layout::Emerald).unwrap();
        assert_eq!(badges.count(), 3);
        assert!(badges.has(0));
        assert!(!badges.has(1));
        assert!(badges.has(7));
        assert!(!badges.has(8));
        assert_eq!(badges.earned(), vec!["Stone", "Dynamo", "Rain"]);
        assert!(read_badges(&buf, &sections, Layout::RubySapphire).is_none());
    }
}
