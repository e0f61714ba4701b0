//! Item variant classification
//!
//! Maps a draft item's category onto the branch tag the sequencer uses.

use crate::core::types::ItemVariant;
use crate::models::Item;

const FLAT_TYPE: &str = "flat";
const SHARE_TYPE: &str = "share";

/// Classify an item by its category type name
///
/// Total and side-effect free: an item without a category, or with an
/// unknown or blank type name, is `Other`.
pub fn classify(item: &Item) -> ItemVariant {
    match item.category_type().map(str::trim) {
        Some(name) if name.eq_ignore_ascii_case(FLAT_TYPE) => ItemVariant::Flat,
        Some(name) if name.eq_ignore_ascii_case(SHARE_TYPE) => ItemVariant::Share,
        _ => ItemVariant::Other,
    }
}
