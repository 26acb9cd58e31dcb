//! Icon asset paths for creatures and items.
//!
//! Creature icons are referenced by the record's `image` field verbatim; item
//! icons go through [`item_icon_filename`]. When a base directory is known the
//! files are checked and missing ones are hidden rather than reported.

use crate::filename::item_icon_filename;
use std::path::PathBuf;

pub const CREATURE_ICON_DIR: &str = "mob_icons";
pub const ITEM_ICON_DIR: &str = "item_icons";

#[derive(Debug, Clone, Default)]
pub struct AssetRoots {
    base: Option<PathBuf>,
}

impl AssetRoots {
    pub fn new(base: Option<PathBuf>) -> Self {
        Self { base }
    }

    /// Path of a creature icon, or `None` when the record has no image or the
    /// file is missing.
    pub fn creature_icon(&self, image: &str) -> Option<String> {
        if image.is_empty() {
            return None;
        }
        self.available(format!("{CREATURE_ICON_DIR}/{image}"))
    }

    /// Path of an item icon, or `None` when the file is missing.
    pub fn item_icon(&self, item_name: &str) -> Option<String> {
        let filename = item_icon_filename(item_name);
        if filename.is_empty() {
            return None;
        }
        self.available(format!("{ITEM_ICON_DIR}/{filename}"))
    }

    fn available(&self, relative: String) -> Option<String> {
        match &self.base {
            Some(base) if !base.join(&relative).is_file() => None,
            _ => Some(relative),
        }
    }
}
