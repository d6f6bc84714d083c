pub mod manifest;
pub mod photo;
pub mod query;
pub mod rover;

pub use manifest::{Manifest, ManifestSol};
pub use photo::{Camera, Photo, RoverInfo};
pub use query::{FeedQuery, DEFAULT_SOL};
pub use rover::Rover;
