use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::app::{GalleryError, Result};
use crate::config::ApiConfig;
use crate::domain::manifest::ManifestEnvelope;
use crate::domain::photo::PhotoPage;
use crate::domain::{Manifest, Photo, Rover};
use crate::fetcher::PhotoFetcher;

pub struct HttpPhotoClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl HttpPhotoClient {
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("solgrid/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base_url = Url::parse(&api.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(GalleryError::Config(format!(
                "API base URL cannot take a path: {}",
                api.base_url
            )));
        }

        Ok(Self {
            client,
            base_url,
            api_key: api.api_key.clone(),
        })
    }

    /// `{base}/rovers/{rover}/photos?api_key=..&sol=..&page=..`
    pub fn photos_url(&self, rover: Rover, sol: u32, page: u32) -> Url {
        let mut url = self.endpoint(&["rovers", rover.slug(), "photos"]);
        url.query_pairs_mut()
            .append_pair("api_key", &self.api_key)
            .append_pair("sol", &sol.to_string())
            .append_pair("page", &page.to_string());
        url
    }

    /// `{base}/manifests/{rover}?api_key=..`
    pub fn manifest_url(&self, rover: Rover) -> Url {
        let mut url = self.endpoint(&["manifests", rover.slug()]);
        url.query_pairs_mut().append_pair("api_key", &self.api_key);
        url
    }

    pub async fn fetch_manifest(&self, rover: Rover) -> Result<Manifest> {
        let url = self.manifest_url(rover);
        let envelope: ManifestEnvelope = self.get_json(url).await?;
        Ok(envelope.photo_manifest)
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`, so the segments are always available.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!("GET {}", redact(&url));

        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GalleryError::Status {
                status: status.as_u16(),
                url: redact(&url),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl PhotoFetcher for HttpPhotoClient {
    async fn fetch(&self, rover: Rover, sol: u32, page: u32) -> Result<Vec<Photo>> {
        let url = self.photos_url(rover, sol, page);
        let page_body: PhotoPage = self.get_json(url).await?;
        tracing::debug!(
            "Fetched {} photos for {} sol {} page {}",
            page_body.photos.len(),
            rover.slug(),
            sol,
            page
        );
        Ok(page_body.photos)
    }
}

/// URL without the API key, for logs and error messages.
fn redact(url: &Url) -> String {
    let mut clean = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "api_key")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if pairs.is_empty() {
        clean.set_query(None);
    } else {
        clean.query_pairs_mut().clear().extend_pairs(pairs);
    }
    clean.to_string()
}
