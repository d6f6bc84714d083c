use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::feed::machine::{FeedMessage, FetchRequest};
use crate::fetcher::PhotoFetcher;

const CHANNEL_CAPACITY: usize = 16;

/// Runs fetches off the UI loop and reports back as `FeedMessage::Completed`.
///
/// Requests are never cancelled. The machine ignores results it no longer
/// wants.
#[derive(Clone)]
pub struct FetchWorker {
    fetcher: Arc<dyn PhotoFetcher + Send + Sync>,
    tx: mpsc::Sender<FeedMessage>,
}

impl FetchWorker {
    pub fn new(
        fetcher: Arc<dyn PhotoFetcher + Send + Sync>,
    ) -> (Self, mpsc::Receiver<FeedMessage>) {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        (Self { fetcher, tx }, rx)
    }

    pub fn spawn(&self, request: FetchRequest) -> JoinHandle<()> {
        let fetcher = self.fetcher.clone();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let result = fetcher
                .fetch(request.query.rover, request.query.sol, request.page)
                .await;
            if let Err(e) = tx.send(FeedMessage::Completed { request, result }).await {
                warn!("Dropping fetch result, receiver closed: {}", e);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::app::Result;
    use crate::domain::{FeedQuery, Photo, Rover};
    use crate::feed::machine::tests::photos;
    use crate::feed::{FeedMachine, FeedPhase};

    /// Answers per sol; sols with a gate wait until it is opened.
    struct GatedFetcher {
        answers: HashMap<u32, Vec<Photo>>,
        gates: HashMap<u32, Arc<Notify>>,
    }

    #[async_trait]
    impl PhotoFetcher for GatedFetcher {
        async fn fetch(&self, _rover: Rover, sol: u32, _page: u32) -> Result<Vec<Photo>> {
            if let Some(gate) = self.gates.get(&sol) {
                gate.notified().await;
            }
            Ok(self.answers.get(&sol).cloned().unwrap_or_default())
        }
    }

    fn apply(machine: &mut FeedMachine, msg: FeedMessage, worker: &FetchWorker) {
        if let Some(request) = machine.update(msg) {
            worker.spawn(request);
        }
    }

    #[tokio::test]
    async fn test_completion_is_delivered() {
        let fetcher = GatedFetcher {
            answers: HashMap::from([(1000, photos(0..4))]),
            gates: HashMap::new(),
        };
        let (worker, mut rx) = FetchWorker::new(Arc::new(fetcher));
        let mut machine = FeedMachine::new(FeedQuery::default());

        apply(&mut machine, FeedMessage::Reload, &worker);
        let msg = rx.recv().await.unwrap();
        apply(&mut machine, msg, &worker);

        assert_eq!(machine.state().phase, FeedPhase::Ready);
        assert_eq!(machine.state().photos.len(), 4);
    }

    #[tokio::test]
    async fn test_old_sol_resolving_late_does_not_win() {
        let gate = Arc::new(Notify::new());
        let fetcher = GatedFetcher {
            answers: HashMap::from([(1000, photos(0..25)), (1001, photos(500..503))]),
            gates: HashMap::from([(1000, gate.clone())]),
        };
        let (worker, mut rx) = FetchWorker::new(Arc::new(fetcher));
        let mut machine = FeedMachine::new(FeedQuery::new(Rover::Curiosity, 1000));

        apply(&mut machine, FeedMessage::Reload, &worker);
        apply(&mut machine, FeedMessage::SelectSol(1001), &worker);

        // Sol 1001 is ungated and arrives first.
        let msg = rx.recv().await.unwrap();
        apply(&mut machine, msg, &worker);
        assert_eq!(machine.state().photos.len(), 3);

        gate.notify_one();
        let msg = rx.recv().await.unwrap();
        assert!(matches!(
            msg,
            FeedMessage::Completed { request, .. } if request.query.sol == 1000
        ));
        apply(&mut machine, msg, &worker);

        let state = machine.state();
        assert_eq!(state.query.sol, 1001);
        assert_eq!(state.phase, FeedPhase::Ready);
        let ids: Vec<u64> = state.photos.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![500, 501, 502]);
    }

    #[tokio::test]
    async fn test_closed_receiver_does_not_panic() {
        let fetcher = GatedFetcher {
            answers: HashMap::new(),
            gates: HashMap::new(),
        };
        let (worker, rx) = FetchWorker::new(Arc::new(fetcher));
        drop(rx);

        let mut machine = FeedMachine::new(FeedQuery::default());
        let request = machine.update(FeedMessage::Reload).unwrap();
        tokio_test::assert_ok!(worker.spawn(request).await);
    }
}
