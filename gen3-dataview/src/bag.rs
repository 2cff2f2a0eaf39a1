use crate::detect::MAX_MONEY;
use crate::items;
use crate::layout::{Layout, Pocket};
use crate::save::{read_u16, read_u32, SectionMap};

pub const MAX_QUANTITY: u16 = 999;

#[derive(PartialEq, Eq, Debug, Clone, Copy, serde::Serialize)]
pub struct ItemStack {
    pub item_id: u16,
    pub quantity: u16,
}

impl ItemStack {
    pub fn name(&self) -> std::borrow::Cow<'static, str> {
        items::display_name(self.item_id)
    }

    pub fn category(&self) -> items::Category {
        items::category(self.item_id)
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Default, serde::Serialize)]
pub struct Bag {
    pub items: Vec<ItemStack>,
    pub key_items: Vec<ItemStack>,
    pub balls: Vec<ItemStack>,
    pub tms_hms: Vec<ItemStack>,
    pub berries: Vec<ItemStack>,
}

impl Bag {
    pub fn pocket(&self, pocket: Pocket) -> &[ItemStack] {
        match pocket {
            Pocket::Items => &self.items,
            Pocket::KeyItems => &self.key_items,
            Pocket::Balls => &self.balls,
            Pocket::TmHm => &self.tms_hms,
            Pocket::Berries => &self.berries,
        }
    }

    fn pocket_mut(&mut self, pocket: Pocket) -> &mut Vec<ItemStack> {
        match pocket {
            Pocket::Items => &mut self.items,
            Pocket::KeyItems => &mut self.key_items,
            Pocket::Balls => &mut self.balls,
            Pocket::TmHm => &mut self.tms_hms,
            Pocket::Berries => &mut self.berries,
        }
    }

    pub fn total(&self) -> usize {
        Pocket::ALL.iter().map(|p| self.pocket(*p).len()).sum()
    }

    pub fn quantity_of(&self, item_id: u16) -> u32 {
        Pocket::ALL
            .iter()
            .flat_map(|p| self.pocket(*p).iter())
            .filter(|s| s.item_id == item_id)
            .map(|s| s.quantity as u32)
            .sum()
    }
}

/// The 32-bit security key for `layout`. Ruby/Sapphire never encrypts, so its key is zero.
pub fn security_key(buf: &[u8], sections: &SectionMap, layout: Layout) -> u32 {
    layout
        .offsets()
        .security_key
        .and_then(|offset| read_u32(buf, sections.get(0)? + offset))
        .unwrap_or(0)
}

fn pocket_key(layout: Layout, pocket: Pocket, key: u32) -> u16 {
    match (layout, pocket) {
        // Ruby/Sapphire key items are stored raw.
        (Layout::RubySapphire, Pocket::KeyItems) => 0,
        _ => key as u16,
    }
}

/// Decodes one pocket's `(item id, quantity)` slots, dropping empty and implausible ones.
pub fn read_pocket(buf: &[u8], offset: usize, slots: usize, key: u16) -> Vec<ItemStack> {
    (0..slots)
        .map_while(|i| {
            let slot = offset + i * 4;
            Some((read_u16(buf, slot)?, read_u16(buf, slot + 2)? ^ key))
        })
        .filter(|(item_id, _)| *item_id != 0 && *item_id != 0xffff)
        .filter_map(|(item_id, quantity)| {
            if !(1..=items::MAX_ITEM_ID).contains(&item_id) || !(1..=MAX_QUANTITY).contains(&quantity) {
                log::debug!("dropping item slot: id={} quantity={}", item_id, quantity);
                return None;
            }
            Some(ItemStack { item_id, quantity })
        })
        .collect()
}

/// Reads all five pockets from Section 1. A missing section reads as an empty bag.
pub fn read(buf: &[u8], sections: &SectionMap, layout: Layout) -> Bag {
    let mut bag = Bag::default();
    let section1 = match sections.get(1) {
        Some(offset) => offset,
        None => {
            return bag;
        }
    };

    let key = security_key(buf, sections, layout);
    let offsets = layout.offsets();
    for pocket in Pocket::ALL {
        let p = offsets.pocket(pocket);
        *bag.pocket_mut(pocket) = read_pocket(buf, section1 + p.offset, p.slots, pocket_key(layout, pocket, key));
    }
    bag
}

/// Reads money from Section 1, decrypted with the full 32-bit key and clamped to 999,999.
pub fn read_money(buf: &[u8], sections: &SectionMap, layout: Layout) -> u32 {
    let raw = match sections.get(1).and_then(|s| read_u32(buf, s + layout.offsets().money)) {
        Some(raw) => raw,
        None => {
            return 0;
        }
    };

    let money = raw ^ security_key(buf, sections, layout);
    if money > MAX_MONEY {
        log::debug!("clamping money {} to {}", money, MAX_MONEY);
        return MAX_MONEY;
    }
    money
}
