mod common;

use common::{RecordBuilder, SaveBuilder};
use gen3_dataview::detect::Signal;
use gen3_dataview::{Config, Layout, Save};

#[test]
fn frlg_save_with_single_party_member() {
    common::init_logging();
    let mut builder = SaveBuilder::new(Layout::FireRedLeafGreen);
    builder.party(&[RecordBuilder::new(0xdead_beef, 0x1234_abcd, 25).nickname("PIKACHU").level(12)]);

    let save = Save::new(&builder.build()).expect("failed to load save");
    assert_eq!(save.layout(), Layout::FireRedLeafGreen);
    assert_eq!(save.detection().confidence(), 7);
    assert!(save.detection().margin() > 0);

    let party = save.party();
    assert_eq!(party.len(), 1);
    assert_eq!(party[0].national_dex, Some(25));
    assert_eq!(party[0].level, 12);
    assert_eq!(party[0].nickname, "PIKACHU");
    assert!(party[0].checksum_valid);
}

#[test]
fn ruby_sapphire_money_is_plaintext() {
    let mut builder = SaveBuilder::new(Layout::RubySapphire);
    builder.money(10000);
    let buf = builder.build();

    // Section 1 sits in window 1 of slot A.
    let offset = gen3_dataview::save::SECTION_SIZE + Layout::RubySapphire.offsets().money;
    assert_eq!(&buf[offset..offset + 4], &[0x10, 0x27, 0x00, 0x00]);

    let save = Save::new(&buf).expect("failed to load save");
    assert_eq!(save.layout(), Layout::RubySapphire);
    assert!(save.detection().signals.contains(&Signal::PlaintextMoney));
    assert_eq!(save.money(), 10000);
}

#[test]
fn emerald_money_is_encrypted() {
    let mut builder = SaveBuilder::new(Layout::Emerald);
    builder.money(3000);
    builder.party(&[RecordBuilder::new(0x0102_0304, 0x0506_0708, 1).level(5)]);
    let key = builder.key();
    let buf = builder.build();

    let offset = gen3_dataview::save::SECTION_SIZE + Layout::Emerald.offsets().money;
    assert_ne!(&buf[offset..offset + 4], &3000u32.to_le_bytes());
    assert_eq!(
        u32::from_le_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]]),
        3000 ^ key
    );

    let save = Save::new(&buf).expect("failed to load save");
    assert_eq!(save.layout(), Layout::Emerald);
    assert!(save.detection().signals.contains(&Signal::EncryptedMoney));
    assert_eq!(save.money(), 3000);
}

#[test]
fn frlg_money_uses_its_own_key() {
    let mut builder = SaveBuilder::new(Layout::FireRedLeafGreen);
    builder.money(123_456);

    let save = Save::new(&builder.build()).expect("failed to load save");
    assert_eq!(save.layout(), Layout::FireRedLeafGreen);
    assert!(save.detection().signals.contains(&Signal::FrlgMoney));
    assert!(save.detection().signals.contains(&Signal::FrlgGameCode));
    assert_eq!(save.money(), 123_456);
}

#[test]
fn rival_name_breaks_frlg_tie() {
    let builder = SaveBuilder::new(Layout::FireRedLeafGreen);
    let save = Save::new(&builder.build()).expect("failed to load save");
    assert_eq!(save.detection().scores.frlg, save.detection().scores.rs);
    assert_eq!(save.layout(), Layout::RubySapphire);

    let mut builder = SaveBuilder::new(Layout::FireRedLeafGreen);
    builder.rival("GARY");
    let save = Save::new(&builder.build()).expect("failed to load save");
    assert!(save.detection().signals.contains(&Signal::RivalName));
    assert_eq!(save.layout(), Layout::FireRedLeafGreen);
    assert_eq!(
        save.trainer().and_then(|t| t.rival_name.as_deref()),
        Some("GARY")
    );
}

#[test]
fn forced_layout_overrides_detection() {
    let mut builder = SaveBuilder::new(Layout::RubySapphire);
    builder.money(500);
    let config = Config {
        layout: Some(Layout::Emerald),
        ..Config::default()
    };

    let save = Save::with_config(&builder.build(), &config).expect("failed to load save");
    assert_eq!(save.detection().layout, Layout::RubySapphire);
    assert_eq!(save.layout(), Layout::Emerald);
    assert_eq!(save.config(), &config);
}

#[test]
fn detection_is_deterministic() {
    let mut builder = SaveBuilder::new(Layout::Emerald);
    builder.money(42);
    let buf = builder.build();

    let first = Save::new(&buf).expect("failed to load save");
    let second = Save::new(&buf).expect("failed to load save");
    assert_eq!(first.detection(), second.detection());
}
