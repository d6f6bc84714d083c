use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::app::GalleryError;

/// The rovers the photos endpoint knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rover {
    #[default]
    Curiosity,
    Opportunity,
    Spirit,
    Perseverance,
}

impl Rover {
    pub const ALL: [Rover; 4] = [
        Rover::Curiosity,
        Rover::Opportunity,
        Rover::Spirit,
        Rover::Perseverance,
    ];

    /// Path segment used by the API.
    pub fn slug(self) -> &'static str {
        match self {
            Rover::Curiosity => "curiosity",
            Rover::Opportunity => "opportunity",
            Rover::Spirit => "spirit",
            Rover::Perseverance => "perseverance",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Rover::Curiosity => "Curiosity",
            Rover::Opportunity => "Opportunity",
            Rover::Spirit => "Spirit",
            Rover::Perseverance => "Perseverance",
        }
    }

    /// Upper sol shown as an input hint. Never enforced.
    pub fn max_sol_hint(self) -> u32 {
        match self {
            Rover::Curiosity => 4000,
            Rover::Opportunity => 5111,
            Rover::Spirit => 2208,
            Rover::Perseverance => 1000,
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|r| *r == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|r| *r == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Rover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Rover {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| GalleryError::UnknownRover(s.to_string()))
    }
}
