//! Sort direction and list ordering keys.

use serde::{Deserialize, Serialize};

/// Generic sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sort {
    #[default]
    Desc,
    Asc,
}

impl Sort {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "desc" => Some(Self::Desc),
            "asc" => Some(Self::Asc),
            _ => None,
        }
    }
}

/// Ordering key for ticket listings (`sortBy` query parameter).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketSortBy {
    /// Creation time. Newest first is the default listing contract.
    #[default]
    Date,
    /// Student name, alphabetical.
    Student,
}

impl TicketSortBy {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "date" => Some(Self::Date),
            "student" => Some(Self::Student),
            _ => None,
        }
    }
}
