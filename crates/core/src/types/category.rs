//! Product categories.
//!
//! The catalog is split into a fixed set of categories, each with its own page.
//! The slug is what gets stored in the `category` field of a document and what
//! appears in URLs.

use serde::{Deserialize, Serialize};

/// Error returned when a string is not a known category slug.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct CategoryError(pub String);

/// A catalog category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Puertas,
    Portones,
    Gondolas,
    Estanterias,
    Rejas,
    Escaleras,
    Muebles,
    Accesorios,
}

impl Category {
    /// Every category, in navigation order.
    pub const ALL: [Self; 8] = [
        Self::Puertas,
        Self::Portones,
        Self::Gondolas,
        Self::Estanterias,
        Self::Rejas,
        Self::Escaleras,
        Self::Muebles,
        Self::Accesorios,
    ];

    /// The slug stored in documents and used in URLs.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Puertas => "puertas",
            Self::Portones => "portones",
            Self::Gondolas => "gondolas",
            Self::Estanterias => "estanterias",
            Self::Rejas => "rejas",
            Self::Escaleras => "escaleras",
            Self::Muebles => "muebles",
            Self::Accesorios => "accesorios",
        }
    }

    /// Display title for page headings.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Puertas => "Puertas",
            Self::Portones => "Portones",
            Self::Gondolas => "Góndolas",
            Self::Estanterias => "Estanterías",
            Self::Rejas => "Rejas",
            Self::Escaleras => "Escaleras",
            Self::Muebles => "Muebles",
            Self::Accesorios => "Accesorios",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryError;

    /// Exact slug match only; no case folding or prefix matching.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.slug() == s)
            .ok_or_else(|| CategoryError(s.to_owned()))
    }
}
