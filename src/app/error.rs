use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request to {url} failed with status {status}")]
    Status { status: u16, url: String },

    #[error("Response decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown rover: {0}")]
    UnknownRover(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl GalleryError {
    /// True when the request never produced a usable HTTP response.
    pub fn is_transport(&self) -> bool {
        match self {
            GalleryError::Http(e) => e.status().is_none(),
            GalleryError::Io(_) => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, GalleryError>;
