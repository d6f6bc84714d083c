use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single rover photograph as returned by the photos endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: u64,
    pub sol: u32,
    pub camera: Camera,
    pub img_src: String,
    pub earth_date: NaiveDate,
    pub rover: RoverInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub id: u64,
    pub name: String,
    pub rover_id: u64,
    pub full_name: String,
}

/// Rover metadata embedded in every photo.
///
/// Each photo carries its own copy; two photos of the same rover are not
/// required to agree. Dates are kept as sent since they are only displayed
/// and a bad one must not fail the whole page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoverInfo {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub landing_date: Option<String>,
    #[serde(default)]
    pub launch_date: Option<String>,
    pub status: String,
}

/// Envelope of `GET /rovers/{rover}/photos`.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoPage {
    pub photos: Vec<Photo>,
}

impl Photo {
    /// Short date for cards, e.g. `2015-05-30`.
    pub fn short_date(&self) -> String {
        self.earth_date.format("%Y-%m-%d").to_string()
    }

    /// Long date for the enlarged view, e.g. `May 30, 2015`.
    pub fn long_date(&self) -> String {
        self.earth_date.format("%B %-d, %Y").to_string()
    }
}

impl RoverInfo {
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }
}
