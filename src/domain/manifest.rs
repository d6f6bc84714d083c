use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Mission manifest from `GET /manifests/{rover}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    pub landing_date: NaiveDate,
    pub launch_date: NaiveDate,
    pub status: String,
    pub max_sol: u32,
    pub max_date: NaiveDate,
    pub total_photos: u64,
    #[serde(default)]
    pub photos: Vec<ManifestSol>,
}

/// Photo counts for one sol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestSol {
    pub sol: u32,
    pub earth_date: NaiveDate,
    pub total_photos: u64,
    #[serde(default)]
    pub cameras: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestEnvelope {
    pub photo_manifest: Manifest,
}

impl Manifest {
    /// The most recent `limit` sols that have at least one photo, newest first.
    pub fn recent_sols(&self, limit: usize) -> Vec<&ManifestSol> {
        let mut sols: Vec<&ManifestSol> =
            self.photos.iter().filter(|s| s.total_photos > 0).collect();
        sols.sort_by(|a, b| b.sol.cmp(&a.sol));
        sols.truncate(limit);
        sols
    }

    pub fn sol(&self, sol: u32) -> Option<&ManifestSol> {
        self.photos.iter().find(|s| s.sol == sol)
    }
}
