use tracing::{debug, info, warn};

use crate::app::Result;
use crate::domain::{FeedQuery, Photo, Rover};
use crate::feed::state::{FeedPhase, FeedState, FETCH_FAILED_MESSAGE, NO_PHOTOS_MESSAGE};
use crate::fetcher::PhotoFetcher;

/// A fetch the caller must perform for the machine.
///
/// `generation` changes on every query change, so two requests for the same
/// (rover, sol, page) issued on either side of a query change never compare
/// equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub query: FeedQuery,
    pub page: u32,
}

#[derive(Debug)]
pub enum FeedMessage {
    SelectRover(Rover),
    SelectSol(u32),
    /// Reload the current query from page 1.
    Reload,
    LoadMore,
    Retry,
    Completed {
        request: FetchRequest,
        result: Result<Vec<Photo>>,
    },
}

pub struct FeedMachine {
    state: FeedState,
    generation: u64,
    in_flight: Option<FetchRequest>,
    last_failed: Option<FetchRequest>,
}

impl FeedMachine {
    pub fn new(query: FeedQuery) -> Self {
        Self {
            state: FeedState::new(query),
            generation: 0,
            in_flight: None,
            last_failed: None,
        }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn query(&self) -> FeedQuery {
        self.state.query
    }

    /// The request whose completion will be applied, if any.
    pub fn in_flight(&self) -> Option<FetchRequest> {
        self.in_flight
    }

    pub fn can_retry(&self) -> bool {
        self.last_failed.is_some() && self.state.error.is_some() && !self.state.is_loading()
    }

    /// Apply one message. Returns the fetch to issue, if the message starts one.
    pub fn update(&mut self, msg: FeedMessage) -> Option<FetchRequest> {
        match msg {
            FeedMessage::SelectRover(rover) => {
                if rover == self.state.query.rover {
                    return None;
                }
                self.start_query(FeedQuery::new(rover, self.state.query.sol))
            }
            FeedMessage::SelectSol(sol) => {
                let sol = sol.max(1);
                if sol == self.state.query.sol {
                    return None;
                }
                self.start_query(FeedQuery::new(self.state.query.rover, sol))
            }
            FeedMessage::Reload => self.start_query(self.state.query),
            FeedMessage::LoadMore => {
                if !self.state.can_load_more() {
                    debug!(
                        "Ignoring load more in {:?} (has_more={})",
                        self.state.phase, self.state.has_more
                    );
                    return None;
                }
                let page = self.state.page + 1;
                Some(self.issue(page, FeedPhase::LoadingMore))
            }
            FeedMessage::Retry => {
                if !self.can_retry() {
                    return None;
                }
                let failed = self.last_failed.take()?;
                let phase = if failed.page > self.state.page {
                    FeedPhase::LoadingMore
                } else {
                    FeedPhase::LoadingInitial
                };
                info!(
                    "Retrying {} sol {} page {}",
                    failed.query.rover.slug(),
                    failed.query.sol,
                    failed.page
                );
                Some(self.issue(failed.page, phase))
            }
            FeedMessage::Completed { request, result } => {
                self.complete(request, result);
                None
            }
        }
    }

    /// Apply `msg` and perform any resulting fetch inline.
    ///
    /// Used where there is no event loop to deliver completions, such as the
    /// CLI and tests.
    pub async fn dispatch(&mut self, fetcher: &(dyn PhotoFetcher + Send + Sync), msg: FeedMessage) {
        if let Some(request) = self.update(msg) {
            let result = fetcher
                .fetch(request.query.rover, request.query.sol, request.page)
                .await;
            self.update(FeedMessage::Completed { request, result });
        }
    }

    fn start_query(&mut self, query: FeedQuery) -> Option<FetchRequest> {
        info!("Loading {} sol {}", query.rover.slug(), query.sol);
        self.generation += 1;
        self.last_failed = None;
        self.state.reset(query);
        Some(self.issue(1, FeedPhase::LoadingInitial))
    }

    fn issue(&mut self, page: u32, phase: FeedPhase) -> FetchRequest {
        let request = FetchRequest {
            generation: self.generation,
            query: self.state.query,
            page,
        };
        self.state.phase = phase;
        self.state.error = None;
        // Any new fetch supersedes the remembered failure.
        self.last_failed = None;
        self.in_flight = Some(request);
        request
    }

    fn complete(&mut self, request: FetchRequest, result: Result<Vec<Photo>>) {
        if self.in_flight != Some(request) {
            debug!(
                "Dropping stale response for {} sol {} page {} (generation {})",
                request.query.rover.slug(),
                request.query.sol,
                request.page,
                request.generation
            );
            return;
        }
        self.in_flight = None;

        let loading_more = self.state.phase == FeedPhase::LoadingMore;

        match result {
            Ok(photos) if photos.is_empty() => {
                self.state.has_more = false;
                if loading_more {
                    debug!("No more photos after page {}", self.state.page);
                    self.state.phase = FeedPhase::Ready;
                } else {
                    self.state.error = Some(NO_PHOTOS_MESSAGE.to_string());
                    self.state.phase = FeedPhase::Empty;
                }
            }
            Ok(photos) => {
                info!("Received {} photos for page {}", photos.len(), request.page);
                if loading_more {
                    self.state.photos.extend(photos);
                    self.state.page = request.page;
                } else {
                    self.state.photos = photos;
                    self.state.page = 1;
                    self.state.has_more = true;
                }
                self.state.phase = FeedPhase::Ready;
            }
            Err(e) => {
                let kind = if e.is_transport() { "transport" } else { "response" };
                warn!("Fetching page {} failed ({}): {}", request.page, kind, e);
                self.state.error = Some(FETCH_FAILED_MESSAGE.to_string());
                self.state.phase = if self.state.photos.is_empty() {
                    FeedPhase::Errored
                } else {
                    FeedPhase::Ready
                };
                self.last_failed = Some(request);
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::app::GalleryError;
    use crate::domain::photo::tests::sample_photo;

    /// Fetcher that replays scripted results and records every call.
    #[derive(Default)]
    pub struct ScriptedFetcher {
        results: Mutex<VecDeque<Result<Vec<Photo>>>>,
        pub calls: Mutex<Vec<(Rover, u32, u32)>>,
    }

    impl ScriptedFetcher {
        pub fn new(results: Vec<Result<Vec<Photo>>>) -> Self {
            Self {
                results: Mutex::new(results.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<(Rover, u32, u32)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PhotoFetcher for ScriptedFetcher {
        async fn fetch(&self, rover: Rover, sol: u32, page: u32) -> Result<Vec<Photo>> {
            self.calls.lock().unwrap().push((rover, sol, page));
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    pub fn photos(ids: std::ops::Range<u64>) -> Vec<Photo> {
        ids.map(sample_photo).collect()
    }

    fn failure() -> Result<Vec<Photo>> {
        Err(GalleryError::Status {
            status: 503,
            url: "https://example.com".into(),
        })
    }

    fn curiosity_1000() -> FeedMachine {
        FeedMachine::new(FeedQuery::new(Rover::Curiosity, 1000))
    }

    fn ids(machine: &FeedMachine) -> Vec<u64> {
        machine.state().photos.iter().map(|p| p.id).collect()
    }

    #[tokio::test]
    async fn test_initial_load_fills_list() {
        // 25 photos on page 1 of curiosity sol 1000.
        let fetcher = ScriptedFetcher::new(vec![Ok(photos(0..25))]);
        let mut machine = curiosity_1000();

        machine.dispatch(&fetcher, FeedMessage::Reload).await;

        let state = machine.state();
        assert_eq!(state.photos.len(), 25);
        assert!(state.has_more);
        assert_eq!(state.page, 1);
        assert_eq!(state.phase, FeedPhase::Ready);
        assert!(state.error.is_none());
        assert_eq!(fetcher.calls(), vec![(Rover::Curiosity, 1000, 1)]);
    }

    #[tokio::test]
    async fn test_empty_load_more_ends_feed_quietly() {
        let fetcher = ScriptedFetcher::new(vec![Ok(photos(0..25)), Ok(Vec::new())]);
        let mut machine = curiosity_1000();

        machine.dispatch(&fetcher, FeedMessage::Reload).await;
        machine.dispatch(&fetcher, FeedMessage::LoadMore).await;

        let state = machine.state();
        assert_eq!(state.photos.len(), 25);
        assert!(!state.has_more);
        assert_eq!(state.page, 1);
        assert_eq!(state.phase, FeedPhase::Ready);
        assert!(state.error.is_none());
        assert_eq!(state.banner(), None);
        assert_eq!(fetcher.calls()[1], (Rover::Curiosity, 1000, 2));
    }

    #[tokio::test]
    async fn test_empty_first_page_is_empty_state() {
        let fetcher = ScriptedFetcher::new(vec![Ok(Vec::new())]);
        let mut machine = FeedMachine::new(FeedQuery::new(Rover::Perseverance, 1));

        machine.dispatch(&fetcher, FeedMessage::Reload).await;

        let state = machine.state();
        assert!(state.photos.is_empty());
        assert!(!state.has_more);
        assert_eq!(state.phase, FeedPhase::Empty);
        assert_eq!(state.error.as_deref(), Some(NO_PHOTOS_MESSAGE));
        assert!(!machine.can_retry());
    }

    #[tokio::test]
    async fn test_initial_failure_then_retry_repeats_request() {
        let fetcher = ScriptedFetcher::new(vec![failure(), Ok(photos(0..3))]);
        let mut machine = curiosity_1000();

        machine.dispatch(&fetcher, FeedMessage::Reload).await;
        {
            let state = machine.state();
            assert_eq!(state.phase, FeedPhase::Errored);
            assert_eq!(state.error.as_deref(), Some(FETCH_FAILED_MESSAGE));
            assert!(state.photos.is_empty());
            assert!(machine.can_retry());
        }

        machine.dispatch(&fetcher, FeedMessage::Retry).await;

        let calls = fetcher.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
        assert_eq!(machine.state().phase, FeedPhase::Ready);
        assert_eq!(machine.state().photos.len(), 3);
        assert!(machine.state().error.is_none());
    }

    #[test]
    fn test_retry_reproduces_failed_request() {
        let mut machine = curiosity_1000();
        let first = machine.update(FeedMessage::Reload).unwrap();
        machine.update(FeedMessage::Completed {
            request: first,
            result: Ok(photos(0..10)),
        });

        let more = machine.update(FeedMessage::LoadMore).unwrap();
        machine.update(FeedMessage::Completed {
            request: more,
            result: failure(),
        });

        let retry = machine.update(FeedMessage::Retry).unwrap();
        assert_eq!(retry, more);
        assert_eq!(machine.state().phase, FeedPhase::LoadingMore);
        assert_eq!(machine.state().photos.len(), 10);
    }

    #[tokio::test]
    async fn test_failed_load_more_keeps_photos_and_shows_banner() {
        let fetcher = ScriptedFetcher::new(vec![Ok(photos(0..25)), failure()]);
        let mut machine = curiosity_1000();

        machine.dispatch(&fetcher, FeedMessage::Reload).await;
        machine.dispatch(&fetcher, FeedMessage::LoadMore).await;

        let state = machine.state();
        assert_eq!(state.phase, FeedPhase::Ready);
        assert_eq!(state.photos.len(), 25);
        assert_eq!(state.page, 1);
        assert!(state.has_more);
        assert_eq!(state.banner(), Some(FETCH_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn test_page_advances_only_on_successful_load_more() {
        let fetcher = ScriptedFetcher::new(vec![
            Ok(photos(0..5)),
            Ok(photos(5..10)),
            failure(),
            Ok(photos(10..15)),
            Ok(Vec::new()),
        ]);
        let mut machine = curiosity_1000();

        machine.dispatch(&fetcher, FeedMessage::Reload).await;
        assert_eq!(machine.state().page, 1);

        machine.dispatch(&fetcher, FeedMessage::LoadMore).await;
        assert_eq!(machine.state().page, 2);

        machine.dispatch(&fetcher, FeedMessage::LoadMore).await;
        assert_eq!(machine.state().page, 2);

        machine.dispatch(&fetcher, FeedMessage::Retry).await;
        assert_eq!(machine.state().page, 3);

        machine.dispatch(&fetcher, FeedMessage::LoadMore).await;
        assert_eq!(machine.state().page, 3);
        assert!(!machine.state().has_more);

        let pages: Vec<u32> = fetcher.calls().iter().map(|c| c.2).collect();
        assert_eq!(pages, vec![1, 2, 3, 3, 4]);
        assert_eq!(ids(&machine), (0..15).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_load_more_after_end_never_fetches() {
        let fetcher = ScriptedFetcher::new(vec![Ok(photos(0..25)), Ok(Vec::new())]);
        let mut machine = curiosity_1000();

        machine.dispatch(&fetcher, FeedMessage::Reload).await;
        machine.dispatch(&fetcher, FeedMessage::LoadMore).await;
        let calls = fetcher.calls().len();

        for _ in 0..5 {
            machine.dispatch(&fetcher, FeedMessage::LoadMore).await;
        }
        assert_eq!(fetcher.calls().len(), calls);
    }

    #[test]
    fn test_retry_disarmed_once_failed_page_loads() {
        let mut machine = curiosity_1000();
        let first = machine.update(FeedMessage::Reload).unwrap();
        machine.update(FeedMessage::Completed {
            request: first,
            result: Ok(photos(0..5)),
        });
        let failed = machine.update(FeedMessage::LoadMore).unwrap();
        machine.update(FeedMessage::Completed {
            request: failed,
            result: failure(),
        });
        assert!(machine.can_retry());

        // Load more again instead of retrying; this time it works.
        let more = machine.update(FeedMessage::LoadMore).unwrap();
        assert!(!machine.can_retry());
        machine.update(FeedMessage::Completed {
            request: more,
            result: Ok(photos(5..10)),
        });

        assert!(!machine.can_retry());
        assert!(machine.update(FeedMessage::Retry).is_none());
        let state = machine.state();
        assert_eq!(state.phase, FeedPhase::Ready);
        assert_eq!(state.page, 2);
        assert_eq!(state.photos.len(), 10);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_load_more_while_loading_is_dropped() {
        let mut machine = curiosity_1000();
        let first = machine.update(FeedMessage::Reload).unwrap();
        assert!(machine.update(FeedMessage::LoadMore).is_none());

        machine.update(FeedMessage::Completed {
            request: first,
            result: Ok(photos(0..5)),
        });
        let more = machine.update(FeedMessage::LoadMore).unwrap();
        assert_eq!(more.page, 2);
        assert!(machine.update(FeedMessage::LoadMore).is_none());
        assert!(machine.update(FeedMessage::Retry).is_none());
        assert_eq!(machine.in_flight(), Some(more));
    }

    #[test]
    fn test_load_more_in_idle_or_errored_is_noop() {
        let mut machine = curiosity_1000();
        assert!(machine.update(FeedMessage::LoadMore).is_none());

        let first = machine.update(FeedMessage::Reload).unwrap();
        machine.update(FeedMessage::Completed {
            request: first,
            result: failure(),
        });
        assert_eq!(machine.state().phase, FeedPhase::Errored);
        assert!(machine.update(FeedMessage::LoadMore).is_none());
    }

    #[tokio::test]
    async fn test_query_change_replaces_previous_photos() {
        let fetcher = ScriptedFetcher::new(vec![
            Ok(photos(0..25)),
            Ok(photos(25..30)),
            Ok(photos(100..104)),
        ]);
        let mut machine = curiosity_1000();

        machine.dispatch(&fetcher, FeedMessage::Reload).await;
        machine.dispatch(&fetcher, FeedMessage::LoadMore).await;
        assert_eq!(machine.state().photos.len(), 30);

        machine
            .dispatch(&fetcher, FeedMessage::SelectRover(Rover::Spirit))
            .await;

        assert_eq!(ids(&machine), (100..104).collect::<Vec<_>>());
        assert_eq!(machine.state().page, 1);
        assert_eq!(machine.query(), FeedQuery::new(Rover::Spirit, 1000));
        assert_eq!(fetcher.calls()[2], (Rover::Spirit, 1000, 1));
    }

    #[test]
    fn test_query_change_resets_has_more_and_error() {
        let mut machine = curiosity_1000();
        let first = machine.update(FeedMessage::Reload).unwrap();
        machine.update(FeedMessage::Completed {
            request: first,
            result: Ok(Vec::new()),
        });
        assert!(!machine.state().has_more);
        assert!(machine.state().error.is_some());

        let next = machine.update(FeedMessage::SelectSol(1001)).unwrap();
        assert_eq!(next.page, 1);
        assert_eq!(next.query.sol, 1001);
        assert!(machine.state().has_more);
        assert!(machine.state().error.is_none());
        assert!(machine.state().photos.is_empty());
        assert_eq!(machine.state().phase, FeedPhase::LoadingInitial);
    }

    #[test]
    fn test_selecting_current_values_is_noop() {
        let mut machine = curiosity_1000();
        assert!(machine.update(FeedMessage::SelectRover(Rover::Curiosity)).is_none());
        assert!(machine.update(FeedMessage::SelectSol(1000)).is_none());
        assert_eq!(machine.state().phase, FeedPhase::Idle);
    }

    #[test]
    fn test_zero_sol_is_treated_as_one() {
        let mut machine = curiosity_1000();
        let request = machine.update(FeedMessage::SelectSol(0)).unwrap();
        assert_eq!(request.query.sol, 1);
    }

    #[test]
    fn test_stale_response_after_sol_change_is_ignored() {
        let mut machine = curiosity_1000();
        let old = machine.update(FeedMessage::Reload).unwrap();
        let new = machine.update(FeedMessage::SelectSol(1001)).unwrap();

        // Old sol resolves after the new one was issued.
        machine.update(FeedMessage::Completed {
            request: old,
            result: Ok(photos(0..25)),
        });
        assert!(machine.state().photos.is_empty());
        assert_eq!(machine.state().phase, FeedPhase::LoadingInitial);
        assert_eq!(machine.in_flight(), Some(new));

        machine.update(FeedMessage::Completed {
            request: new,
            result: Ok(photos(50..52)),
        });
        assert_eq!(ids(&machine), vec![50, 51]);
        assert_eq!(machine.query().sol, 1001);
    }

    #[test]
    fn test_stale_response_after_new_query_finished_is_ignored() {
        let mut machine = curiosity_1000();
        let old = machine.update(FeedMessage::Reload).unwrap();
        let new = machine.update(FeedMessage::SelectRover(Rover::Opportunity)).unwrap();

        machine.update(FeedMessage::Completed {
            request: new,
            result: Ok(photos(0..3)),
        });
        machine.update(FeedMessage::Completed {
            request: old,
            result: failure(),
        });

        let state = machine.state();
        assert_eq!(state.phase, FeedPhase::Ready);
        assert!(state.error.is_none());
        assert_eq!(state.photos.len(), 3);
        assert!(!machine.can_retry());
    }

    #[test]
    fn test_stale_response_for_same_query_values_is_ignored() {
        // Sol 1000 → 1001 → 1000: the first request has the same query and
        // page as the last one but belongs to an older generation.
        let mut machine = curiosity_1000();
        let first = machine.update(FeedMessage::Reload).unwrap();
        machine.update(FeedMessage::SelectSol(1001)).unwrap();
        let third = machine.update(FeedMessage::SelectSol(1000)).unwrap();

        assert_eq!(first.query, third.query);
        assert_eq!(first.page, third.page);
        assert_ne!(first, third);

        machine.update(FeedMessage::Completed {
            request: first,
            result: Ok(photos(0..9)),
        });
        assert!(machine.state().photos.is_empty());
        assert_eq!(machine.state().phase, FeedPhase::LoadingInitial);
    }

    #[test]
    fn test_stale_load_more_after_query_change_is_ignored() {
        let mut machine = curiosity_1000();
        let first = machine.update(FeedMessage::Reload).unwrap();
        machine.update(FeedMessage::Completed {
            request: first,
            result: Ok(photos(0..5)),
        });
        let more = machine.update(FeedMessage::LoadMore).unwrap();
        let switched = machine.update(FeedMessage::SelectRover(Rover::Spirit)).unwrap();

        machine.update(FeedMessage::Completed {
            request: more,
            result: Ok(photos(5..10)),
        });
        assert!(machine.state().photos.is_empty());

        machine.update(FeedMessage::Completed {
            request: switched,
            result: Ok(photos(20..22)),
        });
        assert_eq!(ids(&machine), vec![20, 21]);
        assert_eq!(machine.state().page, 1);
    }

    #[test]
    fn test_duplicate_ids_across_pages_are_kept() {
        let mut machine = curiosity_1000();
        let first = machine.update(FeedMessage::Reload).unwrap();
        machine.update(FeedMessage::Completed {
            request: first,
            result: Ok(photos(0..3)),
        });
        let more = machine.update(FeedMessage::LoadMore).unwrap();
        machine.update(FeedMessage::Completed {
            request: more,
            result: Ok(photos(2..4)),
        });
        assert_eq!(ids(&machine), vec![0, 1, 2, 2, 3]);
    }

    #[test]
    fn test_completion_applied_once() {
        let mut machine = curiosity_1000();
        let first = machine.update(FeedMessage::Reload).unwrap();
        machine.update(FeedMessage::Completed {
            request: first,
            result: Ok(photos(0..3)),
        });
        machine.update(FeedMessage::Completed {
            request: first,
            result: Ok(photos(10..13)),
        });
        assert_eq!(ids(&machine), vec![0, 1, 2]);
    }
}
