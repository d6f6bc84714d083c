pub mod http_client;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{Photo, Rover};

pub use http_client::HttpPhotoClient;

/// Source of rover photos, one page per call.
///
/// Implementations do not validate `sol` or `page`; an empty vector means the
/// upstream has no photos for that page.
#[async_trait]
pub trait PhotoFetcher {
    async fn fetch(&self, rover: Rover, sol: u32, page: u32) -> Result<Vec<Photo>>;
}
