pub mod bag;
pub mod config;
pub mod detect;
pub mod items;
pub mod layout;
pub mod party;
pub mod pc;
pub mod pokedex;
pub mod pokemon;
pub mod save;
pub mod species;
pub mod text;
pub mod trainer;
mod view;

pub use config::Config;
pub use layout::Layout;
pub use view::Save;

#[cfg(target_endian = "big")]
compile_error!("Big endian architectures are not currently supported");
