//! Per-section field extractors.
//!
//! Every extractor has the same shape: it takes the character built so far,
//! one located section and the lookup tables, and returns the updated
//! character. A section that yields nothing leaves the character unchanged.

use crate::character::Character;
use crate::segment::Section;
use crate::tables::ParserTables;

pub mod armor;
pub mod lists;
pub mod powers;
pub mod preamble;
pub mod stats;
pub mod traits;
pub mod vehicles;
pub mod weapons;

pub type Extractor = fn(Character, &Section, &ParserTables) -> Character;

/// `none`, `-` and empty entries mean "nothing here".
pub(crate) fn is_placeholder_entry(entry: &str) -> bool {
    let entry = entry.trim().trim_end_matches('.').trim();
    entry.is_empty() || entry == "-" || entry.eq_ignore_ascii_case("none")
}
