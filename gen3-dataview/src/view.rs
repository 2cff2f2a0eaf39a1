use crate::bag::{self, Bag};
use crate::config::Config;
use crate::detect::{self, Detection};
use crate::layout::Layout;
use crate::party;
use crate::pc::{self, BoxSummary, BoxedPokemon, Storage};
use crate::pokedex::{self, PokedexState};
use crate::pokemon::PokemonRecord;
use crate::save::{self, SectionMap, Slot, ValidationReport};
use crate::trainer::{self, Badges, TrainerProfile};

/// A loaded save image.
///
/// Everything past slot selection and layout detection is decoded on first access and cached.
/// Cached reads are safe to share between threads; [`Save::reload`] takes `&mut self`.
pub struct Save {
    buf: Vec<u8>,
    config: Config,
    slot: Slot,
    save_index: u32,
    sections: SectionMap,
    detection: Detection,
    layout: Layout,

    validation: once_cell::sync::OnceCell<ValidationReport>,
    trainer: once_cell::sync::OnceCell<Option<TrainerProfile>>,
    party: once_cell::sync::OnceCell<Vec<PokemonRecord>>,
    storage: once_cell::sync::OnceCell<Storage>,
    bag: once_cell::sync::OnceCell<Bag>,
    money: once_cell::sync::OnceCell<u32>,
    pokedex: once_cell::sync::OnceCell<PokedexState>,
}

impl Save {
    pub fn new(buf: &[u8]) -> Result<Self, save::Error> {
        Self::with_config(buf, &Config::default())
    }

    pub fn with_config(buf: &[u8], config: &Config) -> Result<Self, save::Error> {
        if buf.len() < save::SAVE_SIZE {
            return Err(save::Error::InvalidSize(buf.len()));
        }

        if save::is_blank(buf) {
            return Err(save::Error::Blank);
        }

        let slot = save::locate(buf);
        let save_index = save::read_save_index(buf, slot).unwrap_or(0);
        let sections = save::map_sections(buf, slot);
        if sections.is_empty() {
            return Err(save::Error::NoValidSections(slot));
        }
        log::info!(
            "using slot {:?} (save index {}, {} sections)",
            slot,
            save_index,
            sections.len()
        );

        let detection = detect::detect(buf, &sections);
        let layout = match config.layout {
            Some(layout) => {
                if layout != detection.layout {
                    log::info!("layout forced to {} over detected {}", layout, detection.layout);
                }
                layout
            }
            None => detection.layout,
        };

        let save = Self {
            buf: buf.to_vec(),
            config: config.clone(),
            slot,
            save_index,
            sections,
            detection,
            layout,

            validation: once_cell::sync::OnceCell::new(),
            trainer: once_cell::sync::OnceCell::new(),
            party: once_cell::sync::OnceCell::new(),
            storage: once_cell::sync::OnceCell::new(),
            bag: once_cell::sync::OnceCell::new(),
            money: once_cell::sync::OnceCell::new(),
            pokedex: once_cell::sync::OnceCell::new(),
        };

        if save.config.verify_checksums {
            save.validate();
        }

        Ok(save)
    }

    /// Replaces the image, dropping every cached result. The current config is kept.
    ///
    /// On error the previous image stays loaded.
    pub fn reload(&mut self, buf: &[u8]) -> Result<(), save::Error> {
        *self = Self::with_config(buf, &self.config)?;
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn detection(&self) -> &Detection {
        &self.detection
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    pub fn save_index(&self) -> u32 {
        self.save_index
    }

    pub fn sections(&self) -> &SectionMap {
        &self.sections
    }

    /// Missing sections and checksum mismatches. Never fails; mismatched sections are still read.
    pub fn validate(&self) -> &ValidationReport {
        self.validation.get_or_init(|| save::validate(&self.buf, &self.sections))
    }

    pub fn trainer(&self) -> Option<&TrainerProfile> {
        self.trainer
            .get_or_init(|| trainer::read(&self.buf, &self.sections, self.layout))
            .as_ref()
    }

    pub fn party(&self) -> &[PokemonRecord] {
        self.party.get_or_init(|| party::read(&self.buf, &self.sections, self.layout))
    }

    pub fn storage(&self) -> &Storage {
        self.storage.get_or_init(|| pc::read(&self.buf, &self.sections))
    }

    pub fn boxes(&self) -> &[BoxedPokemon] {
        &self.storage().pokemon
    }

    pub fn box_slots(&self, box_number: u8) -> Vec<Option<&BoxedPokemon>> {
        self.storage().box_slots(box_number)
    }

    pub fn box_summary(&self) -> Vec<BoxSummary> {
        self.storage().summary()
    }

    pub fn bag(&self) -> &Bag {
        self.bag.get_or_init(|| bag::read(&self.buf, &self.sections, self.layout))
    }

    pub fn money(&self) -> u32 {
        *self.money.get_or_init(|| bag::read_money(&self.buf, &self.sections, self.layout))
    }

    pub fn pokedex(&self) -> &PokedexState {
        self.pokedex.get_or_init(|| pokedex::read(&self.buf, &self.sections))
    }

    pub fn badges(&self) -> Option<Badges> {
        trainer::read_badges(&self.buf, &self.sections, self.layout)
    }
}
