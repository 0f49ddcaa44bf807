pub mod arcane;
pub mod character;
pub mod core_api;
pub mod dice;
pub mod extract;
pub mod markup;
pub mod normalize;
pub mod pipeline;
pub mod segment;
pub mod source;
pub mod special;
pub mod split;
pub mod tables;

pub use character::{Armor, Character, Power, Trait, Vehicle, Weapon};
pub use core_api::{CoreError, CoreErrorCode, Engine, ParseIssue, Sheet, SheetFormat};
pub use tables::ParserTables;

/// Parse a character page with the built-in tables.
///
/// A page without a recognised content container yields an empty character;
/// use [`Engine::parse_markup`] to see why.
pub fn parse_from_markup(html: &str) -> Character {
    Engine::new().parse_markup(html).character
}

/// Parse pasted or extracted sheet text with the built-in tables.
pub fn parse_from_plain_text(text: &str) -> Character {
    Engine::new().parse_text(text).character
}
