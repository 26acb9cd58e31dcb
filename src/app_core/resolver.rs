//! Detail resolution: turns a confirmed name into a renderer-independent view.
//!
//! A name is tried as a creature first, then as an item (reverse lookup of
//! its holders), and otherwise reported as a miss with the original casing.

use crate::assets::AssetRoots;
use crate::model::Entity;
use crate::search_index::LookupIndex;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// A navigable cross-reference on a detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub label: String,
    /// Name passed back to [`resolve`] when the link is followed.
    pub target: String,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatureView {
    pub name: String,
    pub image: Option<String>,
    pub level: i64,
    pub hp: i64,
    pub mp: i64,
    pub exp: i64,
    pub notes: Option<String>,
    pub drops: Vec<Link>,
    pub locations: Vec<String>,
    pub episode: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub name: String,
    pub icon: Option<String>,
    pub holders: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailView {
    /// Nothing chosen yet.
    Welcome,
    Creature(CreatureView),
    Item(ItemView),
    NotFound { term: String },
    LoadFailed { message: String },
}

impl DetailView {
    /// Links in display order; indices into this slice identify links.
    pub fn links(&self) -> &[Link] {
        match self {
            DetailView::Creature(view) => &view.drops,
            DetailView::Item(view) => &view.holders,
            _ => &[],
        }
    }

    pub fn title(&self) -> String {
        match self {
            DetailView::Welcome => "Lookup".to_string(),
            DetailView::Creature(view) => view.name.clone(),
            DetailView::Item(view) => format!("Item: {}", view.name),
            DetailView::NotFound { .. } => "No results".to_string(),
            DetailView::LoadFailed { .. } => "Error".to_string(),
        }
    }
}

/// Resolves `name` against the index.
pub fn resolve(index: &LookupIndex, name: &str, assets: &AssetRoots) -> DetailView {
    if let Some(entity) = index.entity(name) {
        log::debug!("resolved {:?} as creature", name);
        return DetailView::Creature(creature_view(entity, assets));
    }

    let holders = index.holders(&name.to_lowercase());
    if !holders.is_empty() {
        log::debug!("resolved {:?} as item with {} holders", name, holders.len());
        return DetailView::Item(ItemView {
            name: name.to_string(),
            icon: assets.item_icon(name),
            holders: holders
                .into_iter()
                .map(|holder| Link {
                    label: holder.name.clone(),
                    target: holder.name.clone(),
                    icon: assets.creature_icon(&holder.image),
                })
                .collect(),
        });
    }

    log::debug!("no results for {:?}", name);
    DetailView::NotFound {
        term: name.to_string(),
    }
}

fn creature_view(entity: &Entity, assets: &AssetRoots) -> CreatureView {
    CreatureView {
        name: entity.name.clone(),
        image: assets.creature_icon(&entity.image),
        level: entity.level,
        hp: entity.hp,
        mp: entity.mp,
        exp: entity.exp,
        notes: non_empty(plain_text(&entity.notes)),
        drops: entity
            .drops
            .iter()
            .map(|drop| Link {
                label: drop.clone(),
                target: drop.clone(),
                icon: assets.item_icon(drop),
            })
            .collect(),
        locations: entity.locations.clone(),
        episode: non_empty(plain_text(&entity.episode)),
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}

static LINE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>|</(p|div|li|h[1-6])\s*>").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static BLANK_LINES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Converts rich-text markup into plain text for terminal display.
pub fn plain_text(markup: &str) -> String {
    let broken = LINE_BREAK_RE.replace_all(markup, "\n");
    let stripped = TAG_RE.replace_all(&broken, "");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    let lines: Vec<&str> = decoded.lines().map(str::trim_end).collect();
    BLANK_LINES_RE
        .replace_all(lines.join("\n").trim(), "\n\n")
        .into_owned()
}

impl fmt::Display for DetailView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetailView::Welcome => writeln!(f, "Type a creature or item name to search."),
            DetailView::Creature(view) => {
                writeln!(f, "{}", view.name)?;
                if let Some(image) = &view.image {
                    writeln!(f, "  icon: {image}")?;
                }
                writeln!(
                    f,
                    "  Level: {}  HP: {}  MP: {}  EXP: {}",
                    view.level, view.hp, view.mp, view.exp
                )?;
                if let Some(notes) = &view.notes {
                    writeln!(f)?;
                    writeln!(f, "{notes}")?;
                }
                writeln!(f)?;
                writeln!(f, "Drops:")?;
                for drop in &view.drops {
                    writeln!(f, "  - {}", drop.label)?;
                }
                writeln!(f)?;
                writeln!(f, "Locations:")?;
                for location in &view.locations {
                    writeln!(f, "  - {location}")?;
                }
                if let Some(episode) = &view.episode {
                    writeln!(f)?;
                    writeln!(f, "{episode}")?;
                }
                Ok(())
            }
            DetailView::Item(view) => {
                writeln!(f, "Item: {}", view.name)?;
                if let Some(icon) = &view.icon {
                    writeln!(f, "  icon: {icon}")?;
                }
                writeln!(f)?;
                writeln!(f, "Dropped by:")?;
                for holder in &view.holders {
                    writeln!(f, "  - {}", holder.label)?;
                }
                Ok(())
            }
            DetailView::NotFound { term } => writeln!(f, "No results found for \"{term}\""),
            DetailView::LoadFailed { message } => writeln!(f, "{message}"),
        }
    }
}
