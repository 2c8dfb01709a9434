//! Known product fields
//!
//! The gateway only lets clients filter and sort on this fixed set. Text fields
//! are matched exactly (and sorted) through their `.keyword` sub-field, which
//! the default dynamic mapping creates alongside the analyzed field.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductField {
    Title,
    Brand,
    Price,
    Stock,
}

impl ProductField {
    pub const ALL: [ProductField; 4] = [Self::Title, Self::Brand, Self::Price, Self::Stock];

    /// Look up a field by its public name. Names are case-sensitive.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "title" => Some(Self::Title),
            "brand" => Some(Self::Brand),
            "price" => Some(Self::Price),
            "stock" => Some(Self::Stock),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Brand => "brand",
            Self::Price => "price",
            Self::Stock => "stock",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Self::Title | Self::Brand => FieldKind::Text,
            Self::Price | Self::Stock => FieldKind::Integer,
        }
    }

    /// Whether the free-text term is matched against this field.
    pub fn is_full_text(self) -> bool {
        self.kind() == FieldKind::Text
    }

    /// Engine path used for exact-match filters and sorting.
    pub fn exact_path(self) -> &'static str {
        match self {
            Self::Title => "title.keyword",
            Self::Brand => "brand.keyword",
            Self::Price => "price",
            Self::Stock => "stock",
        }
    }

    pub fn full_text_fields() -> impl Iterator<Item = ProductField> {
        Self::ALL.into_iter().filter(|f| f.is_full_text())
    }
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
