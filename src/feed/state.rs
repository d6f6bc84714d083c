use crate::domain::{FeedQuery, Photo};

pub const NO_PHOTOS_MESSAGE: &str = "No photos found for this sol. Try a different sol day.";
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch photos. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    /// No query has been loaded yet.
    Idle,
    LoadingInitial,
    LoadingMore,
    /// Not loading, photos are shown (possibly with an error banner).
    Ready,
    /// The first page of the query came back empty.
    Empty,
    /// The first page failed and there is nothing to show.
    Errored,
}

impl FeedPhase {
    pub fn is_loading(self) -> bool {
        matches!(self, FeedPhase::LoadingInitial | FeedPhase::LoadingMore)
    }
}

/// Everything the presentation layer reads about the feed.
#[derive(Debug, Clone)]
pub struct FeedState {
    pub query: FeedQuery,
    /// Photos in page-arrival order. Not deduplicated.
    pub photos: Vec<Photo>,
    /// Last page that was appended successfully.
    pub page: u32,
    pub phase: FeedPhase,
    pub error: Option<String>,
    pub has_more: bool,
}

impl FeedState {
    pub fn new(query: FeedQuery) -> Self {
        Self {
            query,
            photos: Vec::new(),
            page: 1,
            phase: FeedPhase::Idle,
            error: None,
            has_more: true,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase.is_loading()
    }

    pub fn can_load_more(&self) -> bool {
        self.phase == FeedPhase::Ready && self.has_more
    }

    /// Error shown over existing photos rather than instead of them.
    pub fn banner(&self) -> Option<&str> {
        if self.photos.is_empty() {
            None
        } else {
            self.error.as_deref()
        }
    }

    /// Start over for a new query.
    pub(crate) fn reset(&mut self, query: FeedQuery) {
        *self = Self::new(query);
    }
}
