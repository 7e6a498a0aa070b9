// 📚 Item Entity - Catalog records
//
// Items are loaded once and never change during a run. The only mutable
// fact about an item ("who holds it") lives on the member side.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type ItemId = u32;

// ============================================================================
// CATEGORY TAG
// ============================================================================

/// Lending classification of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryTag {
    Normal,
    Referenced,
    Rare,
    Limited,
}

impl CategoryTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryTag::Normal => "normal",
            CategoryTag::Referenced => "referenced",
            CategoryTag::Rare => "rare",
            CategoryTag::Limited => "limited",
        }
    }
}

impl fmt::Display for CategoryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(CategoryTag::Normal),
            "referenced" => Ok(CategoryTag::Referenced),
            "rare" => Ok(CategoryTag::Rare),
            "limited" => Ok(CategoryTag::Limited),
            other => Err(other.to_string()),
        }
    }
}

// ============================================================================
// ITEM KIND
// ============================================================================

/// Kind-specific descriptive fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Book {
        author: String,
        genre: String,
    },
    Magazine {
        publisher: String,
        category: String,
    },
    Dvd {
        director: String,
        category: String,
        runtime: String,
    },
}

// ============================================================================
// ITEM
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub tag: CategoryTag,
    pub kind: ItemKind,
}

impl Item {
    pub fn new(id: ItemId, title: impl Into<String>, tag: CategoryTag, kind: ItemKind) -> Self {
        Item {
            id,
            title: title.into(),
            tag,
            kind,
        }
    }

    /// Kind-specific description shown under the status line in reports
    pub fn info_line(&self) -> String {
        match &self.kind {
            ItemKind::Book { author, genre } => format!("Author: {} Genre: {}", author, genre),
            ItemKind::Magazine {
                publisher,
                category,
            } => format!("Publisher: {} Category: {}", publisher, category),
            ItemKind::Dvd {
                director,
                category,
                runtime,
            } => format!(
                "Director: {} Category: {} Runtime: {}",
                director, category, runtime
            ),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
